use platey_core::{normalize, Catalog};

use crate::sources::{RecordSource, SourceError};

/// A freshly built catalog plus the number of rows that failed to
/// normalize. Malformed rows are skipped and counted, never fatal and
/// never surfaced per-row to the user.
#[derive(Debug)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub skipped: usize,
}

/// Fetches rows and builds the category's catalog. The whole catalog is
/// replaced on every call; a reload of an unchanged source yields the
/// same ordered records.
pub async fn load_catalog(
    source: &dyn RecordSource,
    category: &str,
) -> Result<LoadedCatalog, SourceError> {
    let rows = source.fetch_rows().await?;

    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for row in rows {
        match normalize(row) {
            Ok(record) => records.push(record),
            Err(error) => {
                skipped += 1;
                tracing::debug!(source_id = source.id(), error = %error, "skipping malformed row");
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(source_id = source.id(), skipped, "catalog load skipped malformed rows");
    }

    Ok(LoadedCatalog { catalog: Catalog::new(category, records), skipped })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use platey_core::RawRow;

    use super::load_catalog;
    use crate::sources::{RecordSource, SourceError};

    struct StaticSource {
        rows: Vec<RawRow>,
    }

    #[async_trait]
    impl RecordSource for StaticSource {
        fn id(&self) -> &str {
            "static"
        }

        async fn fetch_rows(&self) -> Result<Vec<RawRow>, SourceError> {
            Ok(self.rows.clone())
        }
    }

    fn five_rows_two_malformed() -> Vec<RawRow> {
        vec![
            RawRow::plate_only("А111АА"),
            RawRow::plate_only(""),
            RawRow::plate_only("В222ВВ"),
            RawRow::plate_only("—"),
            RawRow::plate_only("С333СС"),
        ]
    }

    #[tokio::test]
    async fn malformed_rows_are_skipped_and_counted() {
        let source = StaticSource { rows: five_rows_two_malformed() };

        let loaded = load_catalog(&source, "auto").await.expect("load");

        assert_eq!(loaded.catalog.len(), 3);
        assert_eq!(loaded.skipped, 2);
        let plates: Vec<&str> =
            loaded.catalog.records().iter().map(|record| record.plate.as_str()).collect();
        assert_eq!(plates, vec!["А111АА", "В222ВВ", "С333СС"]);
    }

    #[tokio::test]
    async fn reload_of_an_unchanged_source_is_idempotent() {
        let source = StaticSource { rows: five_rows_two_malformed() };

        let first = load_catalog(&source, "auto").await.expect("first load");
        let second = load_catalog(&source, "auto").await.expect("second load");

        assert_eq!(first.catalog.records(), second.catalog.records());
        assert_eq!(first.skipped, second.skipped);
    }
}
