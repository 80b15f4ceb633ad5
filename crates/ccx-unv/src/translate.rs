//! Element translation: CalculiX elements to UNV element records.

use ccx_model::{Element, Mesh};
use serde::Serialize;
use tracing::warn;

use crate::connectivity::remap_indices;
use crate::element_types::{classify, is_beam};
use crate::error::{Result, UnvError};

/// An element ready for dataset 2412.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRecord {
    pub id: i32,
    /// UNV FE descriptor id
    pub code: u32,
    /// Node IDs in UNV order
    pub nodes: Vec<i32>,
}

impl ElementRecord {
    pub fn is_beam(&self) -> bool {
        is_beam(self.code)
    }
}

/// An element left out of the output because UNV has no matching type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedElement {
    pub id: i32,
    pub element_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    /// Records in mesh element order
    pub elements: Vec<ElementRecord>,
    pub skipped: Vec<SkippedElement>,
}

/// Classifies and reorders every element of `mesh`.
///
/// Elements without a UNV type are logged and skipped. A node list that does
/// not fit its connectivity map is an error.
pub fn translate(mesh: &Mesh) -> Result<Translation> {
    let mut translation = Translation::default();

    for element in mesh.elements() {
        let Some(code) = classify(&element.element_type) else {
            warn!(
                "Element {} of type {} has no UNV equivalent and is skipped.",
                element.id, element.element_type
            );
            translation.skipped.push(SkippedElement {
                id: element.id,
                element_type: element.element_type.clone(),
            });
            continue;
        };

        translation.elements.push(ElementRecord {
            id: element.id,
            code,
            nodes: unv_node_order(element)?,
        });
    }

    Ok(translation)
}

/// Element nodes in UNV order.
pub fn unv_node_order(element: &Element) -> Result<Vec<i32>> {
    let permutation = remap_indices(&element.element_type);
    let count = element.nodes.len();
    let mismatch = || UnvError::ConnectivityMismatch {
        element: element.id,
        element_type: element.element_type.clone(),
        nodes: count,
        expected: permutation.len(),
    };

    if count > permutation.len() {
        return Err(mismatch());
    }
    permutation[..count]
        .iter()
        .map(|&position| element.nodes.get(position - 1).copied().ok_or_else(&mismatch))
        .collect()
}
