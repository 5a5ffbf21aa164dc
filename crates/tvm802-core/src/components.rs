use std::collections::BTreeSet;

use crate::error::Result;
use crate::placement::{ComponentKey, PlacementRecord};

/// Collects the distinct component keys of a placement list, sorted.
/// Fiducial rows are skipped.
pub fn component_keys<I>(records: I) -> Result<Vec<ComponentKey>>
where
    I: IntoIterator<Item = Result<PlacementRecord>>,
{
    let mut keys = BTreeSet::new();
    for record in records {
        let record = record?;
        if record.fiducial().is_some() {
            continue;
        }
        keys.insert(record.key());
    }
    Ok(keys.into_iter().collect())
}
