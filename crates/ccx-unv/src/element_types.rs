//! UNV element type codes (FE descriptor ids of dataset 2412) and their
//! CalculiX counterparts.
//!
//! The table is declared in the UNV direction, one row per descriptor id in
//! ascending order. Several UNV ids share one CalculiX type (rods, straight
//! and tapered beams all become `B31`/`B32`); looking a CalculiX type up
//! therefore goes through a reverse index in which the lowest id wins.

use std::collections::HashMap;
use std::sync::LazyLock;

use ccx_model::base_element_type;

/// Descriptor ids below this are beam-like; their element records carry an
/// extra beam descriptor line.
pub const BEAM_CODE_LIMIT: u32 = 33;

/// A row of the UNV element taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnvElementType {
    pub code: u32,
    /// CalculiX type written for this id, `None` when CalculiX has no such element.
    pub calculix: Option<&'static str>,
    pub description: &'static str,
}

const fn row(
    code: u32,
    calculix: Option<&'static str>,
    description: &'static str,
) -> UnvElementType {
    UnvElementType {
        code,
        calculix,
        description,
    }
}

#[rustfmt::skip]
pub const UNV_ELEMENT_TYPES: &[UnvElementType] = &[
    row(11,  Some("B31"),      "Rod"),
    row(21,  Some("B31"),      "Linear beam"),
    row(22,  Some("B32"),      "Tapered beam"),
    row(23,  Some("B32"),      "Curved beam"),
    row(24,  Some("B32"),      "Parabolic beam"),
    row(31,  Some("B31"),      "Straight pipe"),
    row(32,  Some("B32"),      "Curved pipe"),
    row(41,  Some("CPS3"),     "Plane stress linear triangle"),
    row(42,  Some("CPS6"),     "Plane stress parabolic triangle"),
    row(43,  None,             "Plane stress cubic triangle"),
    row(44,  Some("CPS4"),     "Plane stress linear quadrilateral"),
    row(45,  Some("CPS8"),     "Plane stress parabolic quadrilateral"),
    row(46,  None,             "Plane strain cubic quadrilateral"),
    row(51,  Some("CPE3"),     "Plane strain linear triangle"),
    row(52,  Some("CPE6"),     "Plane strain parabolic triangle"),
    row(53,  None,             "Plane strain cubic triangle"),
    row(54,  Some("CPE4"),     "Plane strain linear quadrilateral"),
    row(55,  Some("CPE8"),     "Plane strain parabolic quadrilateral"),
    row(56,  None,             "Plane strain cubic quadrilateral"),
    row(61,  Some("M3D3"),     "Plate linear triangle"),
    row(62,  Some("M3D6"),     "Plate parabolic triangle"),
    row(63,  None,             "Plate cubic triangle"),
    row(64,  Some("M3D4"),     "Plate linear quadrilateral"),
    row(65,  Some("M3D8"),     "Plate parabolic quadrilateral"),
    row(66,  None,             "Plate cubic quadrilateral"),
    row(71,  Some("M3D4"),     "Membrane linear quadrilateral"),
    row(72,  Some("M3D6"),     "Membrane parabolic triangle"),
    row(73,  None,             "Membrane cubic triangle"),
    row(74,  Some("M3D3"),     "Membrane linear triangle"),
    row(75,  Some("M3D8"),     "Membrane parabolic quadrilateral"),
    row(76,  None,             "Membrane cubic quadrilateral"),
    row(81,  Some("CAX3"),     "Axisymmetric solid linear triangle"),
    row(82,  Some("CAX6"),     "Axisymmetric solid parabolic triangle"),
    row(84,  Some("CAX4"),     "Axisymmetric solid linear quadrilateral"),
    row(85,  Some("CAX8"),     "Axisymmetric solid parabolic quadrilateral"),
    row(91,  Some("S3"),       "Thin shell linear triangle"),
    row(92,  Some("S6"),       "Thin shell parabolic triangle"),
    row(93,  None,             "Thin shell cubic triangle"),
    row(94,  Some("S4"),       "Thin shell linear quadrilateral"),
    row(95,  Some("S8"),       "Thin shell parabolic quadrilateral"),
    row(96,  None,             "Thin shell cubic quadrilateral"),
    row(106, None,             "Thick shell cubic brick"),
    row(111, Some("C3D4"),     "Solid linear tetrahedron"),
    row(112, Some("C3D6"),     "Solid linear wedge"),
    row(113, Some("C3D15"),    "Solid parabolic wedge"),
    row(114, None,             "Solid cubic wedge"),
    row(115, Some("C3D8"),     "Solid linear brick"),
    row(116, Some("C3D20"),    "Solid parabolic brick"),
    row(117, None,             "Solid cubic brick"),
    row(118, Some("C3D10"),    "Solid parabolic tetrahedron"),
    row(121, None,             "Rigid bar"),
    row(122, None,             "Rigid element"),
    row(136, Some("SPRINGA"),  "Node to node translational spring"),
    row(137, Some("SPRINGA"),  "Node to node rotational spring"),
    row(138, Some("SPRINGA"),  "Node to ground translational spring"),
    row(139, Some("SPRINGA"),  "Node to ground rotational spring"),
    row(141, Some("DASHPOTA"), "Node to node damper"),
    row(142, Some("DASHPOTA"), "Node to ground damper"),
    row(151, Some("GAPUNI"),   "Node to node gap"),
    row(152, Some("GAPUNI"),   "Node to ground gap"),
    row(161, Some("MASS"),     "Lumped mass"),
    row(171, None,             "Axisymmetric linear shell"),
    row(172, None,             "Axisymmetric parabolic shell"),
    row(181, None,             "Constraint"),
    row(191, None,             "Plastic cold runner"),
    row(192, None,             "Plastic hot runner"),
    row(193, None,             "Plastic water line"),
    row(194, None,             "Plastic fountain"),
    row(195, None,             "Plastic baffle"),
    row(196, None,             "Plastic rod heater"),
    row(201, None,             "Linear node-to-node interface"),
    row(202, None,             "Linear edge-to-edge interface"),
    row(203, None,             "Parabolic edge-to-edge interface"),
    row(204, None,             "Linear face-to-face interface"),
    row(208, None,             "Parabolic face-to-face interface"),
    row(212, None,             "Linear axisymmetric interface"),
    row(213, None,             "Parabolic axisymmetric interface"),
    row(221, None,             "Linear rigid surface"),
    row(222, None,             "Parabolic rigid surface"),
    row(231, None,             "Axisymmetric linear rigid surface"),
    row(232, None,             "Axisymmetric parabolic rigid surface"),
];

/// CalculiX type -> lowest UNV descriptor id declaring it.
static CALCULIX_TO_UNV: LazyLock<HashMap<&'static str, u32>> = LazyLock::new(|| {
    let mut index = HashMap::new();
    for entry in UNV_ELEMENT_TYPES {
        if let Some(calculix) = entry.calculix {
            index
                .entry(calculix)
                .and_modify(|code: &mut u32| *code = (*code).min(entry.code))
                .or_insert(entry.code);
        }
    }
    index
});

/// UNV descriptor id for a CalculiX element type.
///
/// Variant spellings (`C3D8R`, `S4R`, `C3D10T`, ...) fall back to their base
/// type. `None` means the UNV taxonomy has no equivalent.
pub fn classify(element_type: &str) -> Option<u32> {
    CALCULIX_TO_UNV
        .get(element_type)
        .or_else(|| CALCULIX_TO_UNV.get(base_element_type(element_type)))
        .copied()
}

pub fn lookup(code: u32) -> Option<&'static UnvElementType> {
    UNV_ELEMENT_TYPES
        .binary_search_by_key(&code, |entry| entry.code)
        .ok()
        .map(|i| &UNV_ELEMENT_TYPES[i])
}

/// CalculiX type written for a UNV descriptor id.
pub fn calculix_type(code: u32) -> Option<&'static str> {
    lookup(code).and_then(|entry| entry.calculix)
}

/// Rods, beams and pipes.
pub fn is_beam(code: u32) -> bool {
    code < BEAM_CODE_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_declared_in_ascending_code_order() {
        assert!(
            UNV_ELEMENT_TYPES
                .windows(2)
                .all(|pair| pair[0].code < pair[1].code)
        );
    }

    #[test]
    fn classifies_solid_and_shell_types() {
        assert_eq!(classify("C3D20"), Some(116));
        assert_eq!(classify("C3D10"), Some(118));
        assert_eq!(classify("C3D8"), Some(115));
        assert_eq!(classify("S8"), Some(95));
        assert_eq!(classify("CAX6"), Some(82));
        assert_eq!(classify("CPE4"), Some(54));
    }

    #[test]
    fn shared_types_resolve_to_the_lowest_code() {
        assert_eq!(classify("B31"), Some(11));
        assert_eq!(classify("B32"), Some(22));
        assert_eq!(classify("M3D4"), Some(64));
        assert_eq!(classify("M3D3"), Some(61));
        assert_eq!(classify("SPRINGA"), Some(136));
        assert_eq!(classify("DASHPOTA"), Some(141));
        assert_eq!(classify("GAPUNI"), Some(151));
    }

    #[test]
    fn variant_spellings_use_their_base_type() {
        assert_eq!(classify("C3D20R"), Some(116));
        assert_eq!(classify("C3D8I"), Some(115));
        assert_eq!(classify("S4R"), Some(94));
        assert_eq!(classify("CPS8R"), Some(45));
        assert_eq!(classify("C3D10T"), Some(118));
    }

    #[test]
    fn types_without_unv_equivalent_are_absent() {
        for element_type in ["T3D2", "C3D27", "S8R5", "GAPSPHER", "DCOUP3D", "FOO"] {
            assert_eq!(classify(element_type), None, "{element_type}");
        }
    }

    #[test]
    fn classification_round_trips_to_the_declared_type() {
        let declared: Vec<&str> = UNV_ELEMENT_TYPES
            .iter()
            .filter_map(|entry| entry.calculix)
            .collect();
        for element_type in declared {
            let code = classify(element_type).expect("declared type classifies");
            assert_eq!(calculix_type(code), Some(element_type));
        }
    }

    #[test]
    fn beam_codes_stop_below_plane_elements() {
        assert!(is_beam(11));
        assert!(is_beam(32));
        assert!(!is_beam(41));
        assert!(!is_beam(136));
        assert_eq!(lookup(116).map(|e| e.description), Some("Solid parabolic brick"));
        assert!(lookup(105).is_none());
        assert_eq!(calculix_type(201), None);
    }
}
