//! Feeder table template generation.
//!
//! The template lists every distinct component key of a board with an empty
//! feeder slot and the profile's default nozzle, speed and height, ready to
//! be filled in by hand and loaded back with [`FeederTable::from_path`].
//!
//! [`FeederTable::from_path`]: crate::feeders::FeederTable::from_path

use std::io::Write;
use std::path::Path;

use crate::components::component_keys;
use crate::error::{Error, Result};
use crate::placement::{ComponentKey, PlacementReader};
use crate::profile::TemplateDefaults;

pub const TEMPLATE_HEADER: [&str; 5] = ["Component", "Feeder", "Nozzle", "Speed", "Height"];

pub fn write_template<W: Write>(
    keys: &[ComponentKey],
    defaults: &TemplateDefaults,
    writer: W,
) -> csv::Result<()> {
    let mut out = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    out.write_record(TEMPLATE_HEADER)?;
    for key in keys {
        out.write_record([
            key.as_str(),
            "",
            defaults.nozzle.as_str(),
            defaults.speed.as_str(),
            defaults.height.as_str(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

/// Enumerates the components of `input` and overwrites `output` with a
/// template feeder table. Returns the keys written.
pub fn generate_template(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    defaults: &TemplateDefaults,
) -> Result<Vec<ComponentKey>> {
    let output = output.as_ref();
    let keys = component_keys(PlacementReader::open(input)?)?;

    let mut buf = Vec::new();
    write_template(&keys, defaults, &mut buf).map_err(|e| Error::csv_write(output, e))?;
    std::fs::write(output, buf).map_err(|e| Error::io(output, e))?;
    tracing::info!(path = ?output, components = keys.len(), "wrote feeder template");
    Ok(keys)
}
