//! Mesh model for the INP to UNV converter.
//!
//! [`Mesh`] holds nodes, elements and named node/element groups in
//! declaration order. [`MeshBuilder`] fills it from a parsed `.inp` deck.

mod builder;
mod element_nodes;
mod mesh;

pub use builder::MeshBuilder;
pub use element_nodes::{NodeCount, base_element_type, element_node_count};
pub use mesh::{Element, Group, GroupKind, Mesh, MeshError, MeshSummary, Node};
