//! TVM802 machine file generation.
//!
//! The machine file is a quoted CSV: one header line, one line per placed
//! part, then a positional trailer holding the panel mark setup. The trailer
//! layout is fixed by the machine; only the set coordinates and the two
//! enable flags depend on the board.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::feeders::FeederTable;
use crate::placement::{ComponentKey, Fiducial, PlacementReader, PlacementRecord};
use crate::profile::MachineProfile;

pub const MACHINE_HEADER: [&str; 11] = [
    "Designator",
    "NozzleNum",
    "StackNum",
    "Mid X",
    "Mid Y",
    "Rotation",
    "Height",
    "Speed",
    "Vision",
    "Pressure",
    "Explanation",
];

/// Lines per mark block in the trailer.
pub const MARK_BLOCK_ROWS: usize = 50;

/// Trailer length: `Mark`, eight coordinate blocks, `Other` with its three
/// values, and two enable blocks of flag plus padding.
pub const TRAILER_ROWS: usize = 1 + 8 * MARK_BLOCK_ROWS + 1 + 3 + 2 * (MARK_BLOCK_ROWS + 1);

const UNSET: &str = "0.00";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// CRLF line endings followed by the mark trailer.
    #[default]
    Machine,
    /// LF line endings, data rows only.
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkPoint {
    pub x: String,
    pub y: String,
}

impl Default for MarkPoint {
    fn default() -> Self {
        Self {
            x: UNSET.to_string(),
            y: UNSET.to_string(),
        }
    }
}

impl MarkPoint {
    /// A mark placed exactly at `0.00, 0.00` is indistinguishable from an
    /// absent one and reads as unset.
    pub fn is_set(&self) -> bool {
        self.x != UNSET || self.y != UNSET
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marks {
    pub mark1: MarkPoint,
    pub mark2: MarkPoint,
}

impl Marks {
    pub fn get(&self, fiducial: Fiducial) -> &MarkPoint {
        match fiducial {
            Fiducial::Mark1 => &self.mark1,
            Fiducial::Mark2 => &self.mark2,
        }
    }

    fn get_mut(&mut self, fiducial: Fiducial) -> &mut MarkPoint {
        match fiducial {
            Fiducial::Mark1 => &mut self.mark1,
            Fiducial::Mark2 => &mut self.mark2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineRow {
    pub designator: String,
    pub nozzle: String,
    pub feeder: String,
    pub x: String,
    pub y: String,
    pub rotation: String,
    pub height: String,
    pub speed: String,
    pub vision: String,
    pub pressure: String,
    pub explanation: String,
}

impl MachineRow {
    fn fields(&self) -> [&str; 11] {
        [
            self.designator.as_str(),
            self.nozzle.as_str(),
            self.feeder.as_str(),
            self.x.as_str(),
            self.y.as_str(),
            self.rotation.as_str(),
            self.height.as_str(),
            self.speed.as_str(),
            self.vision.as_str(),
            self.pressure.as_str(),
            self.explanation.as_str(),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct MachineFile {
    pub rows: Vec<MachineRow>,
    pub marks: Marks,
    /// Keys with no feeder table entry, in sorted order.
    pub unmapped: BTreeSet<ComponentKey>,
    calibration: [String; 3],
}

impl MachineFile {
    /// Joins placement records against the feeder table.
    ///
    /// Every non-fiducial record yields exactly one row, in input order. A key
    /// missing from the table leaves nozzle, feeder, height and speed empty.
    pub fn build<I>(records: I, feeders: &FeederTable, profile: &MachineProfile) -> Result<Self>
    where
        I: IntoIterator<Item = Result<PlacementRecord>>,
    {
        let mut rows = Vec::new();
        let mut marks = Marks::default();
        let mut unmapped = BTreeSet::new();

        for record in records {
            let record = record?;
            if let Some(fiducial) = record.fiducial() {
                tracing::debug!(
                    designator = %record.designator,
                    x = %record.x,
                    y = %record.y,
                    "fiducial mark"
                );
                *marks.get_mut(fiducial) = MarkPoint {
                    x: record.x,
                    y: record.y,
                };
                continue;
            }

            let key = record.key();
            let slot = feeders.lookup(&key);
            tracing::debug!(
                designator = %record.designator,
                key = %key,
                mapped = slot.is_some(),
                "feeder lookup"
            );
            let (nozzle, feeder, height, speed) = match slot {
                Some(s) => (
                    s.nozzle.clone(),
                    s.feeder.clone(),
                    s.height.clone(),
                    s.speed.clone(),
                ),
                None => {
                    unmapped.insert(key.clone());
                    Default::default()
                }
            };

            rows.push(MachineRow {
                nozzle,
                feeder,
                height,
                speed,
                designator: record.designator,
                x: record.x,
                y: record.y,
                rotation: record.rotation,
                vision: profile.vision.clone(),
                pressure: profile.pressure.clone(),
                explanation: key.to_string(),
            });
        }

        if !unmapped.is_empty() {
            let keys: Vec<&str> = unmapped.iter().map(ComponentKey::as_str).collect();
            tracing::warn!(count = keys.len(), keys = ?keys, "components without a feeder entry");
        }

        Ok(Self {
            rows,
            marks,
            unmapped,
            calibration: profile.calibration.clone(),
        })
    }

    /// The trailer values, one per output line.
    pub fn trailer(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(TRAILER_ROWS);
        out.push("Mark");

        // real X/Y for mark 1, then mark 2
        for _ in 0..4 {
            out.extend(std::iter::repeat_n(UNSET, MARK_BLOCK_ROWS));
        }

        for value in [
            &self.marks.mark1.x,
            &self.marks.mark1.y,
            &self.marks.mark2.x,
            &self.marks.mark2.y,
        ] {
            out.push(value.as_str());
            out.extend(std::iter::repeat_n(UNSET, MARK_BLOCK_ROWS - 1));
        }

        out.push("Other");
        out.extend(self.calibration.iter().map(String::as_str));

        for mark in [&self.marks.mark1, &self.marks.mark2] {
            out.push(if mark.is_set() { "True" } else { "False" });
            out.extend(std::iter::repeat_n("False", MARK_BLOCK_ROWS));
        }
        debug_assert_eq!(out.len(), TRAILER_ROWS);
        out
    }

    pub fn write_to<W: Write>(&self, writer: W, layout: Layout) -> csv::Result<()> {
        let terminator = match layout {
            Layout::Machine => csv::Terminator::CRLF,
            Layout::Plain => csv::Terminator::Any(b'\n'),
        };
        let mut out = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .terminator(terminator)
            .flexible(true)
            .from_writer(writer);

        out.write_record(MACHINE_HEADER)?;
        for row in &self.rows {
            out.write_record(row.fields())?;
        }
        if layout == Layout::Machine {
            for value in self.trailer() {
                out.write_record([value])?;
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Renders the whole file in memory, then replaces `path` with it.
    pub fn write_file(&self, path: impl AsRef<Path>, layout: Layout) -> Result<()> {
        let path = path.as_ref();
        let mut buf = Vec::new();
        self.write_to(&mut buf, layout)
            .map_err(|e| Error::csv_write(path, e))?;
        std::fs::write(path, buf).map_err(|e| Error::io(path, e))?;
        tracing::info!(path = ?path, rows = self.rows.len(), "wrote machine file");
        Ok(())
    }
}

/// Reads `input`, joins it against `feeders` and writes the machine file to
/// `output`.
pub fn generate_machine_file(
    input: impl AsRef<Path>,
    feeders: &FeederTable,
    output: impl AsRef<Path>,
    profile: &MachineProfile,
    layout: Layout,
) -> Result<MachineFile> {
    let machine = MachineFile::build(PlacementReader::open(input)?, feeders, profile)?;
    machine.write_file(output, layout)?;
    Ok(machine)
}
