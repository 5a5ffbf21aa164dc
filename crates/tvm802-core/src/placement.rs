//! KiCad position file (`.pos` CSV) reader.
//!
//! Columns are positional: designator, value, package, X, Y, rotation.
//! Anything after the rotation column (KiCad writes `Side`) is ignored.
//! Coordinates stay strings; they are copied to the machine file verbatim.

use std::borrow::Borrow;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Minimum number of columns a placement row must carry.
pub const PLACEMENT_COLUMNS: usize = 6;

/// `package + " " + value`, the join key into the feeder table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentKey(String);

impl ComponentKey {
    pub fn new(package: &str, value: &str) -> Self {
        Self(format!("{package} {value}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ComponentKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for ComponentKey {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl Borrow<str> for ComponentKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two reserved designators used as optical alignment marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fiducial {
    Mark1,
    Mark2,
}

impl Fiducial {
    pub fn from_designator(designator: &str) -> Option<Self> {
        match designator {
            "FID01" => Some(Self::Mark1),
            "FID02" => Some(Self::Mark2),
            _ => None,
        }
    }

    pub fn designator(self) -> &'static str {
        match self {
            Self::Mark1 => "FID01",
            Self::Mark2 => "FID02",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRecord {
    pub designator: String,
    pub value: String,
    pub package: String,
    pub x: String,
    pub y: String,
    pub rotation: String,
}

impl PlacementRecord {
    pub fn key(&self) -> ComponentKey {
        ComponentKey::new(&self.package, &self.value)
    }

    pub fn fiducial(&self) -> Option<Fiducial> {
        Fiducial::from_designator(&self.designator)
    }
}

/// Streaming reader over the rows of a placement list. The header row is
/// consumed up front.
pub struct PlacementReader<R: Read> {
    path: PathBuf,
    records: csv::StringRecordsIntoIter<R>,
}

impl PlacementReader<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::from_reader(path, file))
    }
}

impl<R: Read> PlacementReader<R> {
    /// `path` only labels diagnostics; nothing is opened.
    pub fn from_reader(path: impl Into<PathBuf>, reader: R) -> Self {
        let records = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader)
            .into_records();
        Self {
            path: path.into(),
            records,
        }
    }

    fn decode(&self, record: csv::StringRecord) -> Result<PlacementRecord> {
        if record.len() < PLACEMENT_COLUMNS {
            return Err(Error::ShortRow {
                path: self.path.clone(),
                line: record.position().map_or(0, |p| p.line()),
                expected: PLACEMENT_COLUMNS,
                found: record.len(),
            });
        }
        Ok(PlacementRecord {
            designator: record[0].to_string(),
            value: record[1].to_string(),
            package: record[2].to_string(),
            x: record[3].to_string(),
            y: record[4].to_string(),
            rotation: record[5].to_string(),
        })
    }
}

impl<R: Read> Iterator for PlacementReader<R> {
    type Item = Result<PlacementRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.records.next()?;
        Some(
            next.map_err(|e| Error::csv(&self.path, e))
                .and_then(|record| self.decode(record)),
        )
    }
}

/// Reads a whole placement file into memory.
pub fn read_placements(path: impl AsRef<Path>) -> Result<Vec<PlacementRecord>> {
    PlacementReader::open(path)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const POS: &str = "\
Ref,Val,Package,PosX,PosY,Rot,Side
C1,100n,C_0603,10.5000,-3.2500,90.0000,top
\"R1\",\"10k, 1%\",R_0603,1.0,2.0,0.0,top
FID01,FID,Fiducial,1.23,4.56,0,top
";

    fn read(input: &str) -> Result<Vec<PlacementRecord>> {
        PlacementReader::from_reader("test.pos", input.as_bytes()).collect()
    }

    #[test]
    fn skips_header_and_ignores_trailing_columns() {
        let rows = read(POS).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            PlacementRecord {
                designator: "C1".into(),
                value: "100n".into(),
                package: "C_0603".into(),
                x: "10.5000".into(),
                y: "-3.2500".into(),
                rotation: "90.0000".into(),
            }
        );
    }

    #[test]
    fn honours_csv_quoting() {
        let rows = read(POS).unwrap();
        assert_eq!(rows[1].designator, "R1");
        assert_eq!(rows[1].key().as_str(), "R_0603 10k, 1%");
    }

    #[test]
    fn key_is_package_then_value() {
        let rows = read(POS).unwrap();
        assert_eq!(rows[0].key(), ComponentKey::from("C_0603 100n"));
    }

    #[test]
    fn recognises_fiducials_exactly() {
        assert_eq!(Fiducial::from_designator("FID01"), Some(Fiducial::Mark1));
        assert_eq!(Fiducial::from_designator("FID02"), Some(Fiducial::Mark2));
        assert_eq!(Fiducial::from_designator("fid01"), None);
        assert_eq!(Fiducial::from_designator("FID03"), None);
        let rows = read(POS).unwrap();
        assert_eq!(rows[2].fiducial(), Some(Fiducial::Mark1));
        assert_eq!(rows[0].fiducial(), None);
    }

    #[test]
    fn short_row_reports_line() {
        let err = read("Ref,Val,Package,PosX,PosY,Rot\nC1,100n,C_0603,1.0\n").unwrap_err();
        match err {
            Error::ShortRow {
                line,
                expected,
                found,
                ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(expected, PLACEMENT_COLUMNS);
                assert_eq!(found, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_lines_between_rows_are_skipped() {
        let rows = read(
            "Ref,Val,Package,PosX,PosY,Rot\n\
             C1,100n,C_0603,1,2,0\n\
             \n\
             C2,100n,C_0603,3,4,0\n\
             \n",
        )
        .unwrap();
        let designators: Vec<&str> = rows.iter().map(|r| r.designator.as_str()).collect();
        assert_eq!(designators, ["C1", "C2"]);
    }

    #[test]
    fn whitespace_only_line_is_a_short_row() {
        let err = read("Ref,Val,Package,PosX,PosY,Rot\n \nC1,100n,C_0603,1,2,0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::ShortRow {
                line: 2,
                expected: PLACEMENT_COLUMNS,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn header_only_yields_nothing() {
        assert!(read("Ref,Val,Package,PosX,PosY,Rot\n").unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_placements("/definitely/not/here.pos").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
