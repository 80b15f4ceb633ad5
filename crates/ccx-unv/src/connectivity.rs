//! Node ordering maps between CalculiX and UNV elements.
//!
//! Linear elements list their nodes the same way in both formats. Quadratic
//! elements differ: UNV walks the element boundary corner, midside, corner,
//! ... while CalculiX lists all corners first. For output position `i`, the
//! permutation gives the 1-based CalculiX position to read from.

use ccx_model::base_element_type;

/// Largest node count any map covers.
pub const MAX_ELEMENT_NODES: usize = 20;

const IDENTITY: [usize; MAX_ELEMENT_NODES] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20,
];

const TRI6: [usize; 6] = [1, 4, 2, 5, 3, 6];
const QUAD8: [usize; 8] = [1, 5, 2, 6, 3, 7, 4, 8];
const TET10: [usize; 10] = [1, 5, 2, 6, 3, 7, 8, 9, 10, 4];
const WEDGE15: [usize; 15] = [1, 7, 2, 8, 3, 9, 13, 14, 15, 4, 10, 5, 11, 6, 12];
const HEX20: [usize; 20] = [
    1, 9, 2, 10, 3, 11, 4, 12, 17, 18, 19, 20, 5, 13, 6, 14, 7, 15, 8, 16,
];

/// Element shapes whose node order needs remapping.
///
/// Plane stress, plane strain, membrane and axisymmetric elements share the
/// node order of the shell element with the same node count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectivityFamily {
    /// `S6`, `CPS6`, `CPE6`, `M3D6`, `CAX6`
    Tri6,
    /// `S8`, `CPS8`, `CPE8`, `M3D8`, `CAX8`
    Quad8,
    /// `C3D10`
    Tet10,
    /// `C3D15`
    Wedge15,
    /// `C3D20`
    Hex20,
}

impl ConnectivityFamily {
    pub const ALL: [ConnectivityFamily; 5] = [
        ConnectivityFamily::Tri6,
        ConnectivityFamily::Quad8,
        ConnectivityFamily::Tet10,
        ConnectivityFamily::Wedge15,
        ConnectivityFamily::Hex20,
    ];

    pub fn from_element_type(element_type: &str) -> Option<Self> {
        Self::from_base_type(element_type)
            .or_else(|| Self::from_base_type(base_element_type(element_type)))
    }

    fn from_base_type(base: &str) -> Option<Self> {
        match base {
            "S6" | "CPS6" | "CPE6" | "M3D6" | "CAX6" => Some(ConnectivityFamily::Tri6),
            "S8" | "CPS8" | "CPE8" | "M3D8" | "CAX8" => Some(ConnectivityFamily::Quad8),
            "C3D10" => Some(ConnectivityFamily::Tet10),
            "C3D15" => Some(ConnectivityFamily::Wedge15),
            "C3D20" => Some(ConnectivityFamily::Hex20),
            _ => None,
        }
    }

    pub fn permutation(self) -> &'static [usize] {
        match self {
            ConnectivityFamily::Tri6 => &TRI6,
            ConnectivityFamily::Quad8 => &QUAD8,
            ConnectivityFamily::Tet10 => &TET10,
            ConnectivityFamily::Wedge15 => &WEDGE15,
            ConnectivityFamily::Hex20 => &HEX20,
        }
    }

    pub fn node_count(self) -> usize {
        self.permutation().len()
    }
}

/// 1-based source positions in UNV output order.
///
/// Types without a family map keep their order: the identity `1..=20` is
/// returned, to be cut to the element's node count.
pub fn remap_indices(element_type: &str) -> &'static [usize] {
    ConnectivityFamily::from_element_type(element_type)
        .map_or(&IDENTITY[..], ConnectivityFamily::permutation)
}
