use std::path::Path;

use serde::Serialize;

use flightline_core::config::{AppConfig, LoadOptions};

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct ConfigView {
    currency: String,
    tax_rate: String,
    fuel_unit_price: String,
    log_level: String,
    log_format: String,
}

pub fn run(config_path: Option<&Path>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        require_file: config_path.is_some(),
    }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let view = ConfigView {
        currency: config.pricing.currency,
        tax_rate: config.pricing.tax_rate.to_string(),
        fuel_unit_price: config.pricing.fuel_unit_price.to_string(),
        log_level: config.logging.level,
        log_format: format!("{:?}", config.logging.format).to_lowercase(),
    };
    match serde_json::to_string_pretty(&view) {
        Ok(json) => CommandResult::raw(json),
        Err(error) => CommandResult::failure("config", "serialization", error.to_string(), 5),
    }
}
