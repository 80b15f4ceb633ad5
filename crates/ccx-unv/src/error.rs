//! Error types for ccx-unv

use ccx_inp::ParseError;
use ccx_model::MeshError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, UnvError>;

#[derive(Error, Debug)]
pub enum UnvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Invalid mesh: {0}")]
    Mesh(#[from] MeshError),

    #[error(
        "element {element} of type {element_type} has {nodes} nodes but its connectivity map covers {expected}"
    )]
    ConnectivityMismatch {
        element: i32,
        element_type: String,
        nodes: usize,
        expected: usize,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
