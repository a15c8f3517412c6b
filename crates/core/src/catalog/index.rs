use chrono::{DateTime, Utc};

use crate::catalog::record::PlateRecord;

/// One category's full record set for the current load. A catalog is
/// rebuilt from its source every time it is needed and replaced
/// wholesale; there is no partial merge or write-back.
#[derive(Clone, Debug)]
pub struct Catalog {
    name: String,
    records: Vec<PlateRecord>,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    pub fn new(name: impl Into<String>, records: Vec<PlateRecord>) -> Self {
        Self { name: name.into(), records, loaded_at: Utc::now() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[PlateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Filters in source order and caps after filtering, so the result is
    /// deterministic for a given snapshot: first seen, first returned.
    pub fn search<F>(&self, predicate: F, max_results: usize) -> Vec<&PlateRecord>
    where
        F: Fn(&PlateRecord) -> bool,
    {
        self.records.iter().filter(|record| predicate(record)).take(max_results).collect()
    }
}
