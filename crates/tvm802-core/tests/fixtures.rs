use std::path::PathBuf;

use tvm802_core::{
    component_keys, generate_machine_file, generate_template, read_placements, FeederTable, Layout,
    MachineFile, MachineProfile, PlacementReader, TemplateDefaults,
};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

#[test]
fn one_row_per_non_fiducial_placement_in_order() {
    let pos = workspace_root().join("fixtures/board.pos");
    let feeders = FeederTable::from_path(workspace_root().join("fixtures/feeders.csv")).unwrap();

    let placements = read_placements(&pos).unwrap();
    let expected: Vec<&str> = placements
        .iter()
        .filter(|p| p.fiducial().is_none())
        .map(|p| p.designator.as_str())
        .collect();

    let machine = MachineFile::build(
        PlacementReader::open(&pos).unwrap(),
        &feeders,
        &MachineProfile::default(),
    )
    .unwrap();
    let got: Vec<&str> = machine.rows.iter().map(|r| r.designator.as_str()).collect();
    assert_eq!(got, expected);
    assert_eq!(machine.marks.mark1.x, "101.6000");
    assert_eq!(machine.marks.mark2.y, "-101.6000");

    let unmapped: Vec<&str> = machine.unmapped.iter().map(|k| k.as_str()).collect();
    assert_eq!(
        unmapped,
        ["LED_0603_1608Metric LED_Red", "R_0603_1608Metric 330"]
    );
}

#[test]
fn template_keys_are_sorted_distinct_non_fiducial_keys() {
    let pos = workspace_root().join("fixtures/board.pos");
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("feeders.csv");

    let keys = generate_template(&pos, &out, &TemplateDefaults::default()).unwrap();
    let listed: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    assert_eq!(
        listed,
        [
            "C_0603_1608Metric 100n",
            "C_0805_2012Metric 4.7u",
            "LED_0603_1608Metric LED_Red",
            "LQFP-48_7x7mm_P0.5mm STM32F103C8Tx",
            "R_0603_1608Metric 10k",
            "R_0603_1608Metric 330",
        ]
    );

    let again = component_keys(PlacementReader::open(&pos).unwrap()).unwrap();
    assert_eq!(keys, again);

    let reloaded = FeederTable::from_path(&out).unwrap();
    assert_eq!(reloaded.len(), keys.len());
}

#[test]
fn unmodified_template_round_trips_to_default_fields() {
    let pos = workspace_root().join("fixtures/board.pos");
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("feeders.csv");
    let output = dir.path().join("board.csv");

    generate_template(&pos, &template, &TemplateDefaults::default()).unwrap();
    let feeders = FeederTable::from_path(&template).unwrap();
    let machine = generate_machine_file(
        &pos,
        &feeders,
        &output,
        &MachineProfile::default(),
        Layout::Machine,
    )
    .unwrap();

    assert!(machine.unmapped.is_empty());
    for row in &machine.rows {
        assert_eq!(row.nozzle, "1/2");
        assert_eq!(row.speed, "100");
        assert_eq!(row.height, "0.5");
        assert_eq!(row.feeder, "");
    }
    assert!(output.is_file());
}

#[test]
fn failed_read_leaves_existing_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.pos");
    let output = dir.path().join("board.csv");
    std::fs::write(&bad, "Ref,Val,Package,PosX,PosY,Rot\nC1,100n\n").unwrap();
    std::fs::write(&output, "previous").unwrap();

    let result = generate_machine_file(
        &bad,
        &FeederTable::new(),
        &output,
        &MachineProfile::default(),
        Layout::Machine,
    );
    assert!(result.is_err());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous");
}
