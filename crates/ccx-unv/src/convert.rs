//! Whole-file conversion: read the deck, build the mesh, translate, write.

use std::path::{Path, PathBuf};

use ccx_inp::Deck;
use ccx_model::{Mesh, MeshBuilder};
use tracing::{info, warn};

use crate::error::Result;
use crate::report::ConversionReport;
use crate::translate::translate;
use crate::writer::write_unv;

/// `mesh.inp` -> `mesh.unv`, next to the input.
pub fn output_path_for(input: impl AsRef<Path>) -> PathBuf {
    input.as_ref().with_extension("unv")
}

/// Converts the deck at `input` (with its includes) to a UNV file at `output`.
pub fn convert(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<ConversionReport> {
    let input = input.as_ref();
    info!("Reading {}", display_name(input));

    let deck = Deck::parse_file_with_includes(input)?;
    let mesh = MeshBuilder::build_from_deck(&deck);
    info!("Mesh parser: {}", mesh.summary());

    let mut report = convert_mesh(&mesh, output)?;
    report.input = Some(input.to_path_buf());
    Ok(report)
}

/// Writes an already built mesh. An empty mesh produces no file.
pub fn convert_mesh(mesh: &Mesh, output: impl AsRef<Path>) -> Result<ConversionReport> {
    let output = output.as_ref();
    let mut report = ConversionReport {
        input: None,
        output: output.to_path_buf(),
        written: false,
        mesh: mesh.summary(),
        elements_written: 0,
        groups_written: 0,
        skipped: Vec::new(),
    };

    if mesh.is_empty() {
        warn!("Mesh is empty, nothing to convert.");
        return Ok(report);
    }

    mesh.validate()?;
    let translation = translate(mesh)?;

    info!("Writing {}", display_name(output));
    write_unv(output, mesh, &translation)?;

    report.written = true;
    report.elements_written = translation.elements.len();
    report.groups_written = mesh.groups().count();
    report.skipped = translation.skipped;
    Ok(report)
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
