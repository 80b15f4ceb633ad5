//! In-memory mesh: nodes, elements and named node/element groups.
//!
//! Every collection keeps declaration order; ids and group names are indexed
//! for lookup. The mesh is filled once by [`crate::MeshBuilder`] and only
//! read afterwards.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;
use thiserror::Error;

/// A mesh node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Node ID as written in the deck
    pub id: i32,
    /// X, Y, Z coordinates
    pub coords: [f64; 3],
}

impl Node {
    pub fn new(id: i32, coords: [f64; 3]) -> Self {
        Self { id, coords }
    }
}

/// A mesh element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    /// Element ID as written in the deck
    pub id: i32,
    /// CalculiX element type, upper case (e.g. `C3D20`)
    pub element_type: String,
    /// Node IDs in deck order
    pub nodes: Vec<i32>,
}

impl Element {
    pub fn new(id: i32, element_type: impl Into<String>, nodes: Vec<i32>) -> Self {
        Self {
            id,
            element_type: element_type.into(),
            nodes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GroupKind {
    /// `*NSET`
    Node,
    /// `*ELSET`
    Element,
}

impl Display for GroupKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupKind::Node => f.write_str("NSET"),
            GroupKind::Element => f.write_str("ELSET"),
        }
    }
}

/// A named set of node or element IDs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub name: String,
    pub kind: GroupKind,
    /// Member IDs in insertion order
    pub members: Vec<i32>,
}

impl Group {
    pub fn new(name: impl Into<String>, kind: GroupKind, members: Vec<i32>) -> Self {
        Self {
            name: name.into(),
            kind,
            members,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("element {element} references non-existent node {node}")]
    MissingElementNode { element: i32, node: i32 },

    #[error("{kind} {group} references non-existent member {member}")]
    MissingGroupMember {
        group: String,
        kind: GroupKind,
        member: i32,
    },
}

/// Complete mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    nodes: Vec<Node>,
    node_index: HashMap<i32, usize>,
    elements: Vec<Element>,
    element_index: HashMap<i32, usize>,
    node_groups: Vec<Group>,
    element_groups: Vec<Group>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node. Returns `false` and keeps the first definition when the
    /// ID is already taken.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.node_index.contains_key(&node.id) {
            return false;
        }
        self.node_index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Adds an element. Returns `false` and keeps the first definition when
    /// the ID is already taken.
    pub fn add_element(&mut self, element: Element) -> bool {
        if self.element_index.contains_key(&element.id) {
            return false;
        }
        self.element_index.insert(element.id, self.elements.len());
        self.elements.push(element);
        true
    }

    /// Appends `members` to the group called `name` (case-insensitive),
    /// creating it when absent. Returns `true` if an existing group grew.
    pub fn extend_group(&mut self, kind: GroupKind, name: &str, members: &[i32]) -> bool {
        let groups = match kind {
            GroupKind::Node => &mut self.node_groups,
            GroupKind::Element => &mut self.element_groups,
        };
        match groups.iter_mut().find(|g| g.name.eq_ignore_ascii_case(name)) {
            Some(existing) => {
                existing.members.extend_from_slice(members);
                true
            }
            None => {
                groups.push(Group::new(name, kind, members.to_vec()));
                false
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn node_groups(&self) -> &[Group] {
        &self.node_groups
    }

    pub fn element_groups(&self) -> &[Group] {
        &self.element_groups
    }

    /// Node groups followed by element groups.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.node_groups.iter().chain(self.element_groups.iter())
    }

    pub fn node(&self, id: i32) -> Option<&Node> {
        self.node_index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn element(&self, id: i32) -> Option<&Element> {
        self.element_index.get(&id).map(|&i| &self.elements[i])
    }

    pub fn contains_node(&self, id: i32) -> bool {
        self.node_index.contains_key(&id)
    }

    pub fn contains_element(&self, id: i32) -> bool {
        self.element_index.contains_key(&id)
    }

    pub fn node_group(&self, name: &str) -> Option<&Group> {
        self.node_groups
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }

    pub fn element_group(&self, name: &str) -> Option<&Group> {
        self.element_groups
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// No nodes and no elements: nothing worth converting.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.elements.is_empty()
    }

    /// Checks that every element and group reference resolves.
    pub fn validate(&self) -> Result<(), MeshError> {
        for element in &self.elements {
            if let Some(&node) = element.nodes.iter().find(|&&n| !self.contains_node(n)) {
                return Err(MeshError::MissingElementNode {
                    element: element.id,
                    node,
                });
            }
        }
        for group in self.groups() {
            let resolves = |id: i32| match group.kind {
                GroupKind::Node => self.contains_node(id),
                GroupKind::Element => self.contains_element(id),
            };
            if let Some(&member) = group.members.iter().find(|&&m| !resolves(m)) {
                return Err(MeshError::MissingGroupMember {
                    group: group.name.clone(),
                    kind: group.kind,
                    member,
                });
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> MeshSummary {
        MeshSummary {
            nodes: self.nodes.len(),
            node_groups: self.node_groups.len(),
            elements: self.elements.len(),
            element_groups: self.element_groups.len(),
        }
    }
}

/// Entity counts of a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeshSummary {
    pub nodes: usize,
    pub node_groups: usize,
    pub elements: usize,
    pub element_groups: usize,
}

impl Display for MeshSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} nodes, {} nsets, {} elements, {} elsets",
            self.nodes, self.node_groups, self.elements, self.element_groups
        )
    }
}
