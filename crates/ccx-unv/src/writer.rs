//! I-DEAS Universal file writer.
//!
//! Output consists of the units/coordinate-system preamble followed by three
//! datasets: 2411 (nodes), 2412 (elements) and 2467 (node and element groups).
//! Every field is fixed width; readers rely on exact columns.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use ccx_model::{Group, GroupKind, Mesh, Node};
use tracing::debug;

use crate::error::Result;
use crate::translate::{ElementRecord, Translation};

/// Units (dataset 164) and global coordinate system (dataset 2420).
pub const HEADER: &str = "    -1
   164
         1  SI: Meter (newton)         2
    1.0000000000000000E+0    1.0000000000000000E+0    1.0000000000000000E+0
    2.7314999999999998E+2
    -1
    -1
  2420
         1
SMESH_Mesh
         1         0         0
Global Cartesian Coordinate System
    1.0000000000000000E+0    0.0000000000000000E+0    0.0000000000000000E+0
    0.0000000000000000E+0    1.0000000000000000E+0    0.0000000000000000E+0
    0.0000000000000000E+0    0.0000000000000000E+0    1.0000000000000000E+0
    0.0000000000000000E+0    0.0000000000000000E+0    0.0000000000000000E+0
    -1
    -1
";

pub const DATASET_NODES: u32 = 2411;
pub const DATASET_ELEMENTS: u32 = 2412;
pub const DATASET_GROUPS: u32 = 2467;

const DELIMITER: &str = "    -1";

/// Node ids per line in an element record.
const NODES_PER_LINE: usize = 8;
/// Member records per line in a group.
const MEMBERS_PER_LINE: usize = 2;

/// Node record: export and displacement coordinate systems, color.
const NODE_COORD_SYSTEM: i32 = 1;
const NODE_COLOR: i32 = 11;

/// Element record: physical and material property tables, color.
const ELEMENT_PHYSICAL_PROPERTY: i32 = 2;
const ELEMENT_MATERIAL_PROPERTY: i32 = 1;
const ELEMENT_COLOR: i32 = 7;

/// Beam descriptor: orientation node, fore and aft cross sections.
const BEAM_DESCRIPTOR: [i32; 3] = [0, 1, 1];

fn group_entity_code(kind: GroupKind) -> i32 {
    match kind {
        GroupKind::Node => 7,
        GroupKind::Element => 8,
    }
}

/// Formats `value` like C's `%.16E`: sign only when negative, a signed
/// exponent of at least two digits.
pub fn format_exponential(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }

    let formatted = format!("{value:.16E}");
    match formatted.split_once('E') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}E{sign}{digits:0>2}")
        }
        None => formatted,
    }
}

/// Streams a mesh into UNV datasets.
pub struct UnvWriter<W: Write> {
    out: W,
}

impl<W: Write> UnvWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Preamble, nodes, translated elements, then all groups.
    pub fn write_mesh(&mut self, mesh: &Mesh, translation: &Translation) -> Result<()> {
        self.write_header()?;
        self.write_nodes(mesh.nodes())?;
        self.write_elements(&translation.elements)?;
        let groups: Vec<&Group> = mesh.groups().collect();
        self.write_groups(&groups)?;
        Ok(())
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.out.write_all(HEADER.as_bytes())?;
        Ok(())
    }

    pub fn write_nodes(&mut self, nodes: &[Node]) -> Result<()> {
        self.begin_dataset(DATASET_NODES)?;
        for node in nodes {
            writeln!(
                self.out,
                "{:>10}{:>10}{:>10}{:>10}",
                node.id, NODE_COORD_SYSTEM, NODE_COORD_SYSTEM, NODE_COLOR
            )?;
            let [x, y, z] = node.coords.map(format_exponential);
            writeln!(self.out, "{x:>25}{y:>25}{z:>25}")?;
        }
        debug!("{} nodes written", nodes.len());
        self.end_dataset(2)
    }

    pub fn write_elements(&mut self, elements: &[ElementRecord]) -> Result<()> {
        self.begin_dataset(DATASET_ELEMENTS)?;
        for element in elements {
            writeln!(
                self.out,
                "{:>10}{:>10}{:>10}{:>10}{:>10}{:>10}",
                element.id,
                element.code,
                ELEMENT_PHYSICAL_PROPERTY,
                ELEMENT_MATERIAL_PROPERTY,
                ELEMENT_COLOR,
                element.nodes.len()
            )?;
            if element.is_beam() {
                let [orientation, fore, aft] = BEAM_DESCRIPTOR;
                writeln!(self.out, "{orientation:>10}{fore:>10}{aft:>10}")?;
            }
            for line in element.nodes.chunks(NODES_PER_LINE) {
                for node in line {
                    write!(self.out, "{node:>10}")?;
                }
                writeln!(self.out)?;
            }
            if element.nodes.is_empty() {
                writeln!(self.out)?;
            }
        }
        debug!("{} elements written", elements.len());
        self.end_dataset(2)
    }

    /// Groups are numbered from 1 in the order given.
    pub fn write_groups(&mut self, groups: &[&Group]) -> Result<()> {
        self.begin_dataset(DATASET_GROUPS)?;
        for (index, group) in groups.iter().enumerate() {
            writeln!(
                self.out,
                "{:>10}{:>10}{:>10}{:>10}{:>10}{:>10}{:>10}{:>10}",
                index + 1,
                0,
                0,
                0,
                0,
                0,
                0,
                group.members.len()
            )?;
            writeln!(self.out, "{}", group.name)?;

            let entity = group_entity_code(group.kind);
            for line in group.members.chunks(MEMBERS_PER_LINE) {
                for member in line {
                    write!(self.out, "{entity:>10}{member:>10}{:>10}{:>10}", 0, 0)?;
                }
                writeln!(self.out)?;
            }
        }
        debug!("{} groups written", groups.len());
        self.end_dataset(1)
    }

    fn begin_dataset(&mut self, dataset: u32) -> Result<()> {
        writeln!(self.out, "{dataset:>6}")?;
        Ok(())
    }

    fn end_dataset(&mut self, delimiters: usize) -> Result<()> {
        for _ in 0..delimiters {
            writeln!(self.out, "{DELIMITER}")?;
        }
        Ok(())
    }
}

/// Writes `mesh` to a UNV file at `path`, creating parent directories.
pub fn write_unv(path: impl AsRef<Path>, mesh: &Mesh, translation: &Translation) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let mut writer = UnvWriter::new(BufWriter::new(File::create(path)?));
    writer.write_mesh(mesh, translation)?;
    writer.into_inner().flush()?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
