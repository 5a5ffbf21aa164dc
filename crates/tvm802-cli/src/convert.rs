use std::path::Path;

use tvm802_core::{
    generate_machine_file, generate_template, Error, FeederTable, Fiducial, Layout,
    MachineProfile,
};

use crate::error::CliError;

pub fn run_gen_feeders(
    input: &Path,
    feeders: &Path,
    profile: &MachineProfile,
) -> Result<(), CliError> {
    let keys = generate_template(input, feeders, &profile.template)
        .map_err(|e| classify(e, feeders))?;
    tracing::info!(components = keys.len(), "feeder template ready");
    Ok(())
}

pub fn run_convert(
    input: &Path,
    output: &Path,
    feeders: &Path,
    profile: &MachineProfile,
    layout: Layout,
) -> Result<(), CliError> {
    let table = FeederTable::from_path(feeders).map_err(|e| CliError::input(e.to_string()))?;
    let machine = generate_machine_file(input, &table, output, profile, layout)
        .map_err(|e| classify(e, output))?;

    for fiducial in [Fiducial::Mark1, Fiducial::Mark2] {
        if !machine.marks.get(fiducial).is_set() {
            tracing::warn!(
                designator = fiducial.designator(),
                "fiducial not found, mark disabled"
            );
        }
    }
    tracing::info!(
        rows = machine.rows.len(),
        unmapped = machine.unmapped.len(),
        "machine data ready"
    );
    Ok(())
}

/// Failures writing `output` are processing errors; everything else is bad
/// input.
fn classify(err: Error, output: &Path) -> CliError {
    match &err {
        Error::Io { path, .. } if path == output => CliError::processing(err.to_string()),
        _ => CliError::input(err.to_string()),
    }
}
