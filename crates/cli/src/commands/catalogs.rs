use platey_core::config::{AppConfig, LoadOptions, SourceSpec};

use super::CommandResult;

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return CommandResult::failure("catalogs", "config", error.to_string(), 2),
    };

    let default_category = config.default_category().unwrap_or("<unset>").to_owned();
    let lines: Vec<String> = config
        .catalogs
        .iter()
        .map(|binding| {
            let source = match &binding.source {
                SourceSpec::Text { path } => format!("text file {}", path.display()),
                SourceSpec::Delimited { path, delimiter } => {
                    format!("delimited file {} (sep `{delimiter}`)", path.display())
                }
                SourceSpec::Sheet { url } => format!("sheet {url}"),
            };
            let marker = if binding.name == default_category { " [default]" } else { "" };
            format!("{} ({}): {source}{marker}", binding.name, binding.label)
        })
        .collect();

    CommandResult::success("catalogs", lines.join("; "))
}
