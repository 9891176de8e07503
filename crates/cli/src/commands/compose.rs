use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use flightline_core::config::{AppConfig, LoadOptions};
use flightline_core::{
    calculate_fees, AdditionalService, ComposeRequest, DiscountLine, FeeCode, FuelOrder,
    PricingSnapshot,
};

use crate::commands::CommandResult;

/// One receipt's worth of caller-owned input: the fuel order plus the
/// per-receipt toggles a snapshot does not carry. Prices left unset
/// fall back to the configured defaults.
#[derive(Debug, Deserialize)]
pub struct ReceiptInput {
    pub fuel_order: FuelOrder,
    #[serde(default)]
    pub customer_is_caa: bool,
    #[serde(default)]
    pub fuel_unit_price: Option<Decimal>,
    #[serde(default = "default_true")]
    pub fuel_is_taxable: bool,
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    #[serde(default)]
    pub additional_services: Vec<AdditionalService>,
    #[serde(default)]
    pub manual_waivers: BTreeSet<FeeCode>,
    #[serde(default)]
    pub discounts: Vec<DiscountLine>,
    #[serde(default)]
    pub service_units: BTreeMap<FeeCode, Decimal>,
}

fn default_true() -> bool {
    true
}

pub fn run(snapshot_path: &Path, order_path: &Path, config_path: Option<&Path>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        require_file: config_path.is_some(),
    }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "compose",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let snapshot: PricingSnapshot = match read_json(snapshot_path) {
        Ok(snapshot) => snapshot,
        Err(message) => return CommandResult::failure("compose", "snapshot_read", message, 3),
    };
    let input: ReceiptInput = match read_json(order_path) {
        Ok(input) => input,
        Err(message) => return CommandResult::failure("compose", "order_read", message, 3),
    };

    let (catalog, overrides, tiers) = match snapshot.load() {
        Ok(loaded) => loaded,
        Err(error) => {
            return CommandResult::failure("compose", "snapshot_invalid", error.to_string(), 4);
        }
    };

    let request = ComposeRequest {
        fuel_order: &input.fuel_order,
        catalog: &catalog,
        overrides: &overrides,
        tiers: &tiers,
        additional_services: &input.additional_services,
        manual_waivers: &input.manual_waivers,
        discounts: &input.discounts,
        customer_is_caa: input.customer_is_caa,
        fuel_unit_price: input.fuel_unit_price.unwrap_or(config.pricing.fuel_unit_price),
        fuel_is_taxable: input.fuel_is_taxable,
        tax_rate: input.tax_rate.unwrap_or(config.pricing.tax_rate),
        service_units: &input.service_units,
    };

    match calculate_fees(&request) {
        Ok(composition) => {
            info!(
                line_items = composition.line_items.len(),
                grand_total = %composition.rollups.grand_total_amount,
                "composed receipt"
            );
            match serde_json::to_string_pretty(&composition) {
                Ok(json) => CommandResult::raw(json),
                Err(error) => CommandResult::failure(
                    "compose",
                    "serialization",
                    error.to_string(),
                    5,
                ),
            }
        }
        Err(error) => CommandResult::failure("compose", "engine", error.to_string(), 4),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("could not read `{}`: {error}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|error| format!("could not parse `{}`: {error}", path.display()))
}
