//! Mesh reader: builds a [`Mesh`] from the mesh cards of a parsed deck.
//!
//! Cards are read in four passes (nodes, node sets, elements, element sets)
//! so that sets and elements may refer to entities declared further down the
//! deck. Bad data never aborts the build; it is reported through a throttled
//! warning log and the offending entity is dropped.

use std::fmt::Display;

use ccx_inp::{Card, Deck};
use tracing::{error, warn};

use crate::element_nodes::{NodeCount, element_node_count};
use crate::mesh::{Element, GroupKind, Mesh, Node};

/// Warnings logged before the reader goes quiet.
const WARNING_LIMIT: usize = 10;

#[derive(Debug, Default)]
struct WarningLog {
    count: usize,
}

impl WarningLog {
    fn warn(&mut self, message: impl Display) {
        if self.count < WARNING_LIMIT {
            warn!("{message}");
        } else if self.count == WARNING_LIMIT {
            warn!("Message limit reached!");
        }
        self.count += 1;
    }
}

/// Builds a mesh from a parsed input deck
#[derive(Debug, Default)]
pub struct MeshBuilder {
    mesh: Mesh,
    warnings: WarningLog,
    duplicated_sets: Vec<(GroupKind, String)>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from the given deck.
    pub fn build_from_deck(deck: &Deck) -> Mesh {
        let mut builder = Self::new();
        builder.process_deck(deck);
        builder.into_mesh()
    }

    pub fn process_deck(&mut self, deck: &Deck) {
        if deck.cards.is_empty() {
            self.warnings.warn("Nothing to parse!");
            return;
        }

        for card in cards_named(deck, "NODE") {
            self.process_node_card(card);
        }
        for card in cards_named(deck, "NSET") {
            self.process_set_card(card, GroupKind::Node);
        }
        for card in cards_named(deck, "ELEMENT") {
            self.process_element_card(card);
        }
        for card in cards_named(deck, "ELSET") {
            self.process_set_card(card, GroupKind::Element);
        }
    }

    /// Number of warnings raised so far, including the ones not logged.
    pub fn warning_count(&self) -> usize {
        self.warnings.count
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }

    fn process_node_card(&mut self, card: &Card) {
        let mut added = Vec::new();
        let mut duplicated = Vec::new();

        for line in &card.data_lines {
            let fields = split_fields(line);
            let Some((id, values)) = fields.split_first() else {
                continue;
            };
            let Ok(id) = id.parse::<i32>() else {
                self.warnings.warn(format!("Invalid node line: {line}"));
                continue;
            };
            let values: Result<Vec<f64>, _> = values.iter().map(|v| v.parse::<f64>()).collect();
            let Ok(values) = values else {
                self.warnings
                    .warn(format!("Invalid coordinates for node {id}: {line}"));
                continue;
            };
            if values.len() > 3 {
                self.warnings.warn("Direction cosines are not supported.");
            }

            let mut coords = [0.0; 3];
            for (slot, value) in coords.iter_mut().zip(values) {
                *slot = value;
            }

            if self.mesh.add_node(Node::new(id, coords)) {
                added.push(id);
            } else {
                duplicated.push(id);
            }
        }

        if !duplicated.is_empty() {
            self.warnings.warn(format!("Duplicated nodes: {duplicated:?}."));
        }
        if let Some(name) = card.parameter("NSET") {
            self.extend_group(GroupKind::Node, name, &added);
        }
    }

    fn process_element_card(&mut self, card: &Card) {
        let Some(element_type) = card.parameter("TYPE").map(str::to_ascii_uppercase) else {
            self.warnings.warn(format!(
                "*ELEMENT on line {} has no TYPE and is skipped.",
                card.line_start
            ));
            return;
        };
        let required = match element_node_count(&element_type) {
            NodeCount::Fixed(count) => count,
            NodeCount::Variable => 0,
            NodeCount::Unknown => {
                error!("Unknown element type - {element_type}.");
                0
            }
        };

        let mut added = Vec::new();
        let mut duplicated = Vec::new();
        let mut lines = card.data_lines.iter();

        while let Some(line) = lines.next() {
            // A node list may continue on the following data lines.
            let mut fields = split_fields(line);
            while fields.len() < required + 1 {
                match lines.next() {
                    Some(next) => fields.extend(split_fields(next)),
                    None => break,
                }
            }

            if let Some(element) = self.read_element(&element_type, &fields) {
                let id = element.id;
                if self.mesh.add_element(element) {
                    added.push(id);
                } else {
                    duplicated.push(id);
                }
            }
        }

        if !duplicated.is_empty() {
            self.warnings
                .warn(format!("Duplicated elements {duplicated:?}."));
        }
        if let Some(name) = card.parameter("ELSET") {
            self.extend_group(GroupKind::Element, &name.to_ascii_uppercase(), &added);
        }
    }

    fn read_element(&mut self, element_type: &str, fields: &[&str]) -> Option<Element> {
        let (id, node_fields) = fields.split_first()?;
        let Ok(id) = id.parse::<i32>() else {
            self.warnings.warn(format!("Invalid element id: {id}"));
            return None;
        };

        let mut nodes = Vec::with_capacity(node_fields.len());
        let mut complete = true;
        for field in node_fields {
            let Ok(mut node) = field.parse::<i32>() else {
                self.warnings
                    .warn(format!("Element {id} has invalid node {field}."));
                complete = false;
                continue;
            };
            if node == 0 {
                // Network elements leave end nodes blank; use the middle one.
                node = node_fields
                    .get(1)
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(node);
            }
            if self.mesh.contains_node(node) {
                nodes.push(node);
            } else {
                self.warnings.warn(format!(
                    "Element {id} has no node {node} and will be removed."
                ));
                complete = false;
            }
        }

        complete.then(|| Element::new(id, element_type, nodes))
    }

    fn process_set_card(&mut self, card: &Card, kind: GroupKind) {
        let key = match kind {
            GroupKind::Node => "NSET",
            GroupKind::Element => "ELSET",
        };
        // *NSET names are upper-cased like keywords; *ELSET names keep the deck spelling.
        let Some(name) = card.parameter(key).map(|name| match kind {
            GroupKind::Node => name.to_ascii_uppercase(),
            GroupKind::Element => name.to_string(),
        }) else {
            return;
        };

        let mut members = Vec::new();
        let mut missing = Vec::new();

        if card.has_flag("GENERATE") {
            for line in &card.data_lines {
                let Some(range) = generate_range(line) else {
                    self.warnings
                        .warn(format!("{kind} {name} - invalid GENERATE line: {line}"));
                    continue;
                };
                for id in range {
                    if self.contains(kind, id) {
                        members.push(id);
                    } else {
                        missing.push(id);
                    }
                }
            }
        } else {
            let mut duplicated = Vec::new();
            for line in &card.data_lines {
                for field in split_fields(line) {
                    match field.parse::<i32>() {
                        Ok(id) if !self.contains(kind, id) => missing.push(id),
                        Ok(id) if members.contains(&id) => duplicated.push(id),
                        Ok(id) => members.push(id),
                        Err(_) => match self.group_members(kind, field) {
                            Some(nested) => members.extend(nested),
                            None => self.warnings.warn(format!("There is no {kind} {field}.")),
                        },
                    }
                }
            }
            if !duplicated.is_empty() {
                let noun = member_noun(kind);
                self.warnings
                    .warn(format!("{kind} {name} - duplicated {noun} {duplicated:?}."));
            }
        }

        if !missing.is_empty() {
            let noun = member_noun(kind);
            self.warnings
                .warn(format!("{kind} {name} - mesh hasn't {noun} {missing:?}."));
        }
        self.extend_group(kind, &name, &members);
    }

    fn contains(&self, kind: GroupKind, id: i32) -> bool {
        match kind {
            GroupKind::Node => self.mesh.contains_node(id),
            GroupKind::Element => self.mesh.contains_element(id),
        }
    }

    fn group_members(&self, kind: GroupKind, name: &str) -> Option<Vec<i32>> {
        let group = match kind {
            GroupKind::Node => self.mesh.node_group(name),
            GroupKind::Element => self.mesh.element_group(name),
        };
        group.map(|g| g.members.clone())
    }

    fn extend_group(&mut self, kind: GroupKind, name: &str, members: &[i32]) {
        if !self.mesh.extend_group(kind, name, members) {
            return;
        }
        let key = (kind, name.to_ascii_uppercase());
        if !self.duplicated_sets.contains(&key) {
            self.warnings.warn(format!("Duplicated set name {name}!"));
            self.duplicated_sets.push(key);
        }
    }
}

fn member_noun(kind: GroupKind) -> &'static str {
    match kind {
        GroupKind::Node => "nodes",
        GroupKind::Element => "elements",
    }
}

fn cards_named<'a>(deck: &'a Deck, keyword: &'a str) -> impl Iterator<Item = &'a Card> {
    deck.cards
        .iter()
        .filter(move |card| card.normalized_keyword() == keyword)
}

/// Splits a data line on commas and blanks, dropping empty fields left by
/// trailing commas.
fn split_fields(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect()
}

fn generate_range(line: &str) -> Option<impl Iterator<Item = i32>> {
    let fields: Vec<i32> = split_fields(line)
        .into_iter()
        .map(|f| f.parse::<i32>())
        .collect::<Result<_, _>>()
        .ok()?;
    let (start, stop, step) = match fields.as_slice() {
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] if *step > 0 => (*start, *stop, *step),
        _ => return None,
    };
    Some((start..=stop).step_by(step as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(input: &str) -> (Mesh, usize) {
        let deck = Deck::parse_str(input).expect("deck should parse");
        let mut builder = MeshBuilder::new();
        builder.process_deck(&deck);
        let warnings = builder.warning_count();
        (builder.into_mesh(), warnings)
    }

    #[test]
    fn builds_nodes_elements_and_sets() {
        let (mesh, warnings) = build(
            r#"
*NODE, NSET=Nall
1, 0.0, 0.0, 0.0
2, 1.0, 0.0, 0.0
3, 1.0, 1.0, 0.0
*ELEMENT, TYPE=CPS3, ELSET=Eall
1, 1, 2, 3
*NSET, NSET=FIX
1, 2
*ELSET, ELSET=LOAD
1
"#,
        );

        assert_eq!(warnings, 0);
        assert_eq!(mesh.nodes().len(), 3);
        assert_eq!(mesh.elements()[0].element_type, "CPS3");
        assert_eq!(mesh.elements()[0].nodes, vec![1, 2, 3]);
        let nsets: Vec<&str> = mesh.node_groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(nsets, vec!["Nall", "FIX"]);
        assert_eq!(mesh.element_group("eall").map(|g| g.members.clone()), Some(vec![1]));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn set_names_follow_card_casing() {
        let (mesh, _) = build(
            r#"
*NODE, NSET=Nall
1, 0, 0, 0
2, 1, 0, 0
*NSET, NSET=Fix
1
*ELEMENT, TYPE=B31, ELSET=Beams
1, 1, 2
*ELSET, ELSET=Load
1
"#,
        );
        let nsets: Vec<&str> = mesh.node_groups().iter().map(|g| g.name.as_str()).collect();
        let elsets: Vec<&str> = mesh.element_groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(nsets, vec!["Nall", "FIX"]);
        assert_eq!(elsets, vec!["BEAMS", "Load"]);
    }

    #[test]
    fn non_ascii_element_type_is_read_as_unknown() {
        let (mesh, warnings) = build("*NODE
1,0,0,0
2,1,0,0
*ELEMENT, TYPE=CAXAé
1, 1, 2
");
        assert_eq!(warnings, 0);
        assert_eq!(mesh.elements()[0].element_type, "CAXAé");
        assert_eq!(mesh.elements()[0].nodes, vec![1, 2]);
    }

    #[test]
    fn pads_missing_coordinates_and_drops_extra_ones() {
        let (mesh, warnings) = build("*NODE\n1, 2.5, -1.0\n2, 1, 2, 3, 0.5, 0.5, 0.5\n");
        assert_eq!(mesh.node(1).map(|n| n.coords), Some([2.5, -1.0, 0.0]));
        assert_eq!(mesh.node(2).map(|n| n.coords), Some([1.0, 2.0, 3.0]));
        assert_eq!(warnings, 1);
    }

    #[test]
    fn reads_element_node_lists_spanning_lines() {
        let mut input = String::from("*NODE\n");
        for id in 1..=20 {
            input.push_str(&format!("{id}, {id}.0, 0.0, 0.0\n"));
        }
        input.push_str("*ELEMENT, TYPE=C3D20R\n");
        input.push_str("1, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15,\n");
        input.push_str("16, 17, 18, 19, 20\n");

        let (mesh, warnings) = build(&input);
        assert_eq!(warnings, 0);
        assert_eq!(mesh.elements().len(), 1);
        assert_eq!(mesh.elements()[0].nodes, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn elements_may_reference_nodes_declared_later() {
        let (mesh, _) = build("*ELEMENT, TYPE=B31\n1, 1, 2\n*NODE\n1, 0, 0, 0\n2, 1, 0, 0\n");
        assert_eq!(mesh.elements().len(), 1);
    }

    #[test]
    fn drops_elements_with_unknown_nodes() {
        let (mesh, warnings) = build("*NODE\n1,0,0,0\n2,1,0,0\n*ELEMENT, TYPE=B31\n1, 1, 2\n2, 2, 9\n");
        let ids: Vec<i32> = mesh.elements().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(warnings, 1);
    }

    #[test]
    fn network_element_blank_node_takes_middle_node() {
        let (mesh, _) = build("*NODE\n1,0,0,0\n2,1,0,0\n3,2,0,0\n*ELEMENT, TYPE=D\n1, 0, 1, 2\n");
        assert_eq!(mesh.elements()[0].nodes, vec![1, 1, 2]);
    }

    #[test]
    fn duplicated_ids_keep_first_definition() {
        let (mesh, warnings) = build("*NODE\n1,0,0,0\n1,5,5,5\n");
        assert_eq!(mesh.nodes().len(), 1);
        assert_eq!(mesh.node(1).map(|n| n.coords), Some([0.0, 0.0, 0.0]));
        assert_eq!(warnings, 1);
    }

    #[test]
    fn generate_sets_and_nested_set_names() {
        let (mesh, warnings) = build(
            r#"
*NODE
1,0,0,0
2,1,0,0
3,2,0,0
4,3,0,0
*NSET, NSET=ODD, GENERATE
1, 4, 2
*NSET, NSET=ALL
ODD, 2, 4
*NSET, NSET=BAD
7, NOPE
"#,
        );
        assert_eq!(mesh.node_group("ODD").map(|g| g.members.clone()), Some(vec![1, 3]));
        assert_eq!(
            mesh.node_group("ALL").map(|g| g.members.clone()),
            Some(vec![1, 3, 2, 4])
        );
        assert_eq!(mesh.node_group("BAD").map(|g| g.members.len()), Some(0));
        assert_eq!(warnings, 2);
    }

    #[test]
    fn same_set_name_merges_and_warns_once() {
        let (mesh, warnings) = build(
            "*NODE\n1,0,0,0\n2,1,0,0\n3,2,0,0\n*NSET,NSET=A\n1\n*NSET,NSET=a\n2\n*NSET,NSET=A\n3\n",
        );
        assert_eq!(mesh.node_groups().len(), 1);
        assert_eq!(mesh.node_groups()[0].members, vec![1, 2, 3]);
        assert_eq!(warnings, 1);
    }

    #[test]
    fn warnings_are_counted_past_the_log_limit() {
        let mut input = String::from("*NODE\n1,0,0,0\n*ELEMENT, TYPE=B31\n");
        for id in 1..=15 {
            input.push_str(&format!("{id}, 1, 99\n"));
        }
        let (mesh, warnings) = build(&input);
        assert!(mesh.elements().is_empty());
        assert_eq!(warnings, 15);
    }

    #[test]
    fn empty_deck_gives_empty_mesh() {
        let (mesh, warnings) = build("");
        assert!(mesh.is_empty());
        assert_eq!(warnings, 1);
    }

    #[test]
    fn splits_on_commas_and_blanks() {
        assert_eq!(split_fields("1, 2,3 ,, 4,"), vec!["1", "2", "3", "4"]);
        assert_eq!(generate_range("10, 14, 2").map(|r| r.collect::<Vec<_>>()), Some(vec![10, 12, 14]));
        assert!(generate_range("1, 5, 0").is_none());
    }
}
