use platey_core::config::{AppConfig, LoadOptions};
use platey_core::{digit_match, letter_match, DigitQuery, DigitStrategy, LetterQuery};
use platey_source::{CatalogProvider, SourceRegistry};

use super::CommandResult;

/// One-shot search against a configured catalog, for operators checking
/// inventory or comparing the two digit strategies from a shell.
pub fn run(category: &str, query: &str, letters: bool, strategy: Option<&str>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return CommandResult::failure("search", "config", error.to_string(), 2),
    };

    if config.binding(category).is_none() {
        let known = config.catalogs.iter().map(|b| b.name.as_str()).collect::<Vec<_>>().join(", ");
        return CommandResult::failure(
            "search",
            "unknown_category",
            format!("`{category}` is not a configured catalog (known: {known})"),
            2,
        );
    }

    let strategy = match strategy {
        Some(value) => match value.parse::<DigitStrategy>() {
            Ok(strategy) => strategy,
            Err(error) => {
                return CommandResult::failure("search", "strategy", error.to_string(), 2)
            }
        },
        None => config.search.digit_strategy,
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::failure("search", "runtime", error.to_string(), 1),
    };

    let registry = SourceRegistry::from_bindings(&config.catalogs);
    let loaded = match runtime.block_on(registry.load(category)) {
        Ok(loaded) => loaded,
        Err(error) => return CommandResult::failure("search", "source", error.to_string(), 1),
    };

    let hits: Vec<String> = if letters {
        let query = match LetterQuery::parse(query) {
            Ok(query) => query,
            Err(error) => return CommandResult::failure("search", "query", error.to_string(), 2),
        };
        loaded
            .catalog
            .search(|record| letter_match(record, &query), config.search.max_results)
            .iter()
            .map(|record| record.plate.clone())
            .collect()
    } else {
        let query = match DigitQuery::parse(query) {
            Ok(query) => query,
            Err(error) => return CommandResult::failure("search", "query", error.to_string(), 2),
        };
        loaded
            .catalog
            .search(|record| digit_match(record, &query, strategy), config.search.max_results)
            .iter()
            .map(|record| record.plate.clone())
            .collect()
    };

    CommandResult::success(
        "search",
        format!(
            "{} of {} records matched in `{category}` ({} skipped at load): {}",
            hits.len(),
            loaded.catalog.len(),
            loaded.skipped,
            if hits.is_empty() { "-".to_string() } else { hits.join(", ") }
        ),
    )
}
