use std::fs;
use std::path::Path;

use tracing::info;

use flightline_core::snapshot::OverrideRecord;
use flightline_core::{ingest_overrides, OverrideStore, PricingSnapshot, Track};

use crate::commands::CommandResult;

/// Applies a bulk override CSV on top of a snapshot's existing
/// overrides and writes the merged snapshot back out. The ingest runs
/// against a scratch store, so a rejected row leaves the file intact.
pub fn run(snapshot_path: &Path, csv_path: &Path, out_path: Option<&Path>) -> CommandResult {
    let raw = match fs::read_to_string(snapshot_path) {
        Ok(raw) => raw,
        Err(error) => {
            return CommandResult::failure(
                "ingest-overrides",
                "snapshot_read",
                format!("could not read `{}`: {error}", snapshot_path.display()),
                3,
            );
        }
    };
    let snapshot: PricingSnapshot = match serde_json::from_str(&raw) {
        Ok(snapshot) => snapshot,
        Err(error) => {
            return CommandResult::failure(
                "ingest-overrides",
                "snapshot_parse",
                format!("could not parse `{}`: {error}", snapshot_path.display()),
                3,
            );
        }
    };

    let (catalog, mut store, tiers) = match snapshot.load() {
        Ok(loaded) => loaded,
        Err(error) => {
            return CommandResult::failure(
                "ingest-overrides",
                "snapshot_invalid",
                error.to_string(),
                4,
            );
        }
    };

    let csv_file = match fs::File::open(csv_path) {
        Ok(file) => file,
        Err(error) => {
            return CommandResult::failure(
                "ingest-overrides",
                "csv_read",
                format!("could not read `{}`: {error}", csv_path.display()),
                3,
            );
        }
    };

    let report = match ingest_overrides(csv_file, &catalog, &mut store) {
        Ok(report) => report,
        Err(error) => {
            return CommandResult::failure("ingest-overrides", "csv_row", error.to_string(), 4);
        }
    };

    let merged = rebuild_snapshot(&catalog, &store, tiers);
    let destination = out_path.unwrap_or(snapshot_path);
    let json = match serde_json::to_string_pretty(&merged) {
        Ok(json) => json,
        Err(error) => {
            return CommandResult::failure(
                "ingest-overrides",
                "serialization",
                error.to_string(),
                5,
            );
        }
    };
    if let Err(error) = fs::write(destination, json) {
        return CommandResult::failure(
            "ingest-overrides",
            "snapshot_write",
            format!("could not write `{}`: {error}", destination.display()),
            5,
        );
    }

    info!(
        rows = report.rows_read,
        standard = report.standard_upserts,
        caa = report.caa_upserts,
        "applied override file"
    );
    CommandResult::success(
        "ingest-overrides",
        format!(
            "{} rows applied ({} standard, {} CAA upserts) -> {}",
            report.rows_read,
            report.standard_upserts,
            report.caa_upserts,
            destination.display()
        ),
    )
}

fn rebuild_snapshot(
    catalog: &flightline_core::Catalog,
    store: &OverrideStore,
    tiers: Vec<flightline_core::WaiverTier>,
) -> PricingSnapshot {
    let overrides = store
        .iter()
        .map(|((aircraft_type_id, fee_rule_id), record)| OverrideRecord {
            aircraft_type_id: aircraft_type_id.clone(),
            fee_rule_id: fee_rule_id.clone(),
            override_value: record.value_for(Track::Standard),
            caa_override_value: record.value_for(Track::Caa),
        })
        .collect();

    PricingSnapshot {
        classifications: catalog.classifications().to_vec(),
        aircraft_types: catalog.aircraft_types().to_vec(),
        fee_rules: catalog.fee_rules().to_vec(),
        overrides,
        tiers,
    }
}
