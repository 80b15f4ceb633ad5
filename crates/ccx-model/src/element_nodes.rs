//! Node counts of CalculiX element types.

/// Types whose trailing letters are part of the name rather than a variant
/// suffix.
const UNSTRIPPED: &[&str] = &[
    "MASS", "DASHPOTA", "ITSUNI", "ITSCYL", "GAPSPHER", "DGAP", "JOINTC",
];

/// Variant suffix letters (reduced integration, hybrid, incompatible modes, ...).
const SUFFIX_LETTERS: &str = "ABCEHILMNOPRSTVW";

#[rustfmt::skip]
const NODE_COUNTS: &[(&str, usize)] = &[
    ("AC1D2", 2), ("AC1D3", 3), ("AC2D3", 3), ("AC2D4", 4), ("AC2D6", 6), ("AC2D8", 8),
    ("ACAX3", 3), ("ACAX4", 4), ("ACAX6", 6), ("ACAX8", 8),
    ("AC3D4", 4), ("AC3D5", 5), ("AC3D6", 6), ("AC3D8", 8), ("AC3D10", 10), ("AC3D15", 15),
    ("AC3D20", 20),
    ("ACIN2D2", 2), ("ACIN2D3", 3), ("ACIN3D3", 3), ("ACIN3D4", 4), ("ACIN3D6", 6),
    ("ACIN3D8", 8), ("ACINAX2", 2), ("ACINAX3", 3),
    ("ASI1", 1), ("ASI2", 2), ("ASI2D2", 2), ("ASI2D3", 3), ("ASI3", 3), ("ASI3D3", 3),
    ("ASI3D4", 4), ("ASI3D6", 6), ("ASI3D8", 8), ("ASI4", 4), ("ASI8", 8),
    ("B21", 2), ("B22", 3), ("B23", 2), ("B31", 2), ("B32", 3), ("B33", 2),
    ("C3D4", 4), ("C3D5", 5), ("C3D6", 6), ("C3D8", 8), ("C3D10", 10), ("C3D15", 15),
    ("C3D20", 20), ("C3D27", 27),
    ("CCL9", 9), ("CCL12", 12), ("CCL18", 18), ("CCL24", 24),
    ("CIN3D12", 12), ("CIN3D18", 18), ("CIN3D8", 8),
    ("CAX3", 3), ("CAX4", 4), ("CAX6", 6), ("CAX8", 8), ("CAXA4", 4), ("CAXA8", 8),
    ("CINPE4", 4), ("CINPE5", 5), ("CINPS4", 4), ("CINPS5", 5), ("CINAX4", 4), ("CINAX5", 5),
    ("CPE3", 3), ("CPE4", 4), ("CPE6", 6), ("CPE8", 8),
    ("CPEG3", 3), ("CPEG4", 4), ("CPEG6", 6), ("CPEG8", 8),
    ("CPS3", 3), ("CPS4", 4), ("CPS6", 6), ("CPS8", 8),
    ("CONN3D2", 2), ("CONN2D2", 2),
    ("COH2D4", 4), ("COH3D6", 6), ("COH3D8", 8), ("COHAX4", 4),
    ("CGAX3", 3), ("CGAX4", 4), ("CGAX6", 6), ("CGAX8", 8),
    ("D", 3), ("DS3", 3), ("DS4", 4), ("DS6", 6), ("DS8", 8),
    ("DASHPOTA", 2), ("DASHPOT1", 1), ("DASHPOT2", 2),
    ("DC1D2", 2), ("DC1D3", 3), ("DC2D3", 3), ("DC2D4", 4), ("DC2D6", 6), ("DC2D8", 8),
    ("DC3D4", 4), ("DC3D6", 6), ("DC3D8", 8), ("DC3D10", 10), ("DC3D15", 15), ("DC3D20", 20),
    ("DSAX1", 2), ("DSAX2", 3), ("DCAX3", 3), ("DCAX4", 4), ("DCAX6", 6), ("DCAX8", 8),
    ("DCOUP2D", 1), ("DCOUP3D", 1),
    ("DCC1D2", 2), ("DCC1D2D", 2), ("DCC2D4", 4), ("DCC2D4D", 4), ("DCC3D8", 8),
    ("DCC3D8D", 8), ("DCCAX4", 4), ("DCCAX4D", 4), ("DCCAX2", 2), ("DCCAX2D", 2),
    ("DGAP", 2), ("DRAG2D", 1), ("DRAG3D", 2),
    ("EC3D8", 8), ("ELBOW31", 2), ("ELBOW32", 3),
    ("EMC2D3", 3), ("EMC2D4", 4), ("EMC3D4", 4), ("EMC3D8", 8),
    ("F3D8", 8), ("F3D6", 6), ("F3D4", 4),
    ("FP2D2", 2), ("FPC2D2", 2), ("FPC3D2", 2), ("FP3D2", 2), ("FRAME2D", 2), ("FRAME3D", 3),
    ("GAPCY", 2), ("GAPSPHER", 2), ("GAPU", 2),
    ("GK2D2", 2), ("GK3D2", 2), ("GK3D4", 4), ("GK3D6", 6), ("GK3D8", 8), ("GK3D12", 12),
    ("GK3D18", 18), ("GKAX2", 2), ("GKAX4", 4), ("GKAX6", 6),
    ("GKPS4", 4), ("GKPS6", 6), ("GKPE4", 4), ("GKPE6", 6),
    ("HEATC", 1),
    ("IRS21", 3), ("ISL21", 2), ("ISL22", 3), ("ITT21", 1), ("ITT31", 1),
    ("ITSUNI", 2), ("ITSCYL", 2),
    ("JOINTC", 2), ("JOINT2D", 2), ("JOINT3D", 2),
    ("LS3", 3), ("LS6", 6),
    ("M3D3", 3), ("M3D4", 4), ("M3D6", 6), ("M3D8", 8), ("M3D9", 9),
    ("MASS", 1), ("MAX1", 2), ("MAX2", 3), ("MCL6", 6), ("MCL9", 9), ("MGAX1", 2), ("MGAX2", 3),
    ("PC3D", 1), ("PD3D", 1),
    ("PIPE21", 2), ("PIPE22", 3), ("PIPE31", 2), ("PIPE32", 3),
    ("PSI24", 4), ("PSI34", 4), ("PSI26", 6), ("PSI36", 6),
    ("Q3D4", 4), ("Q3D6", 6), ("Q3D8", 8), ("Q3D10", 10), ("Q3D20", 20),
    ("RAX2", 2), ("ROTARY", 1), ("R2D2", 2), ("R3D3", 3), ("R3D4", 4), ("RB2D2", 2), ("RB3D2", 2),
    ("S3", 3), ("S4", 4), ("S4R5", 4), ("S6", 6), ("S8", 8), ("S8R5", 8), ("S9R5", 9),
    ("SAX1", 2), ("SAX2", 3),
    ("SAXA11", 2), ("SAXA12", 2), ("SAXA13", 2), ("SAXA14", 2),
    ("SAXA21", 3), ("SAXA22", 3), ("SAXA23", 3), ("SAXA24", 3),
    ("SC6", 6), ("SC8", 8),
    ("SFMGAX1", 2), ("SFMGAX2", 2), ("SFM3D3", 3), ("SFM3D4", 4), ("SFM3D6", 6), ("SFM3D8", 8),
    ("SFMAX1", 2), ("SFMAX2", 3), ("SFMCL6", 6), ("SFMCL9", 9),
    ("STRI3", 3), ("STRI65", 6),
    ("SPRING", 2), ("SPRING1", 1), ("SPRING2", 2),
    ("T2D2", 2), ("T2D3", 3), ("T3D2", 2), ("T3D3", 3),
    ("WARP2D3", 3), ("WARP2D4", 4),
];

/// How many nodes an element of a given type lists in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCount {
    Fixed(usize),
    /// Substructures and user elements: whatever the data line holds.
    Variable,
    Unknown,
}

/// Strips variant suffix letters, e.g. `C3D8R` -> `C3D8`, `SPRINGA` -> `SPRING`.
///
/// Names whose last letters are part of the type (`MASS`, `DASHPOTA`, ...)
/// come back unchanged.
pub fn base_element_type(element_type: &str) -> &str {
    if UNSTRIPPED.contains(&element_type) {
        return element_type;
    }
    let base = element_type.trim_end_matches(|c: char| SUFFIX_LETTERS.contains(c));
    if base.starts_with("CAXA") {
        return base.get(..5).unwrap_or(base);
    }
    base
}

pub fn element_node_count(element_type: &str) -> NodeCount {
    if element_type.starts_with(['Z', 'U']) || element_type.starts_with("VU") {
        return NodeCount::Variable;
    }
    let base = base_element_type(element_type);
    NODE_COUNTS
        .iter()
        .find(|(name, _)| *name == base)
        .map_or(NodeCount::Unknown, |&(_, count)| NodeCount::Fixed(count))
}
