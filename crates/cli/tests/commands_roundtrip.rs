//! File-in, JSON-out checks for the CLI command bodies.

use std::fs;

use flightline_cli::commands::{compose, ingest, validate};
use flightline_core::Composition;

const SNAPSHOT: &str = r#"{
    "classifications": [
        { "id": "light-jet", "name": "Light Jet" }
    ],
    "aircraft_types": [
        {
            "id": "citation-cj3",
            "name": "Citation CJ3",
            "classification_id": "light-jet",
            "base_min_fuel_gallons_for_waiver": "500"
        }
    ],
    "fee_rules": [
        {
            "id": "rule-ramp",
            "fee_code": "RAMP",
            "fee_name": "Ramp Fee",
            "applies_to_classification_id": "light-jet",
            "amount": "100.00",
            "currency": "USD",
            "is_taxable": true,
            "calculation_basis": "FIXED_PRICE",
            "is_potentially_waivable_by_fuel_uplift": true,
            "waiver_strategy": "SIMPLE_MULTIPLIER",
            "simple_waiver_multiplier": "1",
            "has_caa_override": false,
            "caa_override_amount": null
        }
    ],
    "overrides": [],
    "tiers": []
}"#;

const ORDER: &str = r#"{
    "fuel_order": {
        "fuel_type": "Jet A",
        "gallons_delivered": "500",
        "aircraft_type_id": "citation-cj3"
    },
    "fuel_unit_price": "6.00",
    "tax_rate": "0"
}"#;

#[test]
fn compose_emits_a_parseable_composition() {
    let dir = tempfile::tempdir().expect("tempdir");
    let snapshot_path = dir.path().join("schedule.json");
    let order_path = dir.path().join("order.json");
    fs::write(&snapshot_path, SNAPSHOT).expect("write snapshot");
    fs::write(&order_path, ORDER).expect("write order");

    let result = compose::run(&snapshot_path, &order_path, None);
    assert_eq!(result.exit_code, 0, "compose failed: {}", result.output);

    let composition: Composition =
        serde_json::from_str(&result.output).expect("composition parses");
    // 500 gal * 6.00 fuel, 100.00 ramp charged, waived at the threshold.
    assert_eq!(composition.rollups.grand_total_amount.to_string(), "3000.00");
    assert_eq!(composition.rollups.total_waivers_amount.to_string(), "-100.00");
}

#[test]
fn ingest_merges_overrides_and_writes_the_snapshot_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let snapshot_path = dir.path().join("schedule.json");
    let csv_path = dir.path().join("overrides.csv");
    fs::write(&snapshot_path, SNAPSHOT).expect("write snapshot");
    fs::write(
        &csv_path,
        "aircraft_type_name,fee_code,override_amount,override_caa_amount\n\
         Citation CJ3,RAMP,150.00,120.00\n",
    )
    .expect("write csv");

    let result = ingest::run(&snapshot_path, &csv_path, None);
    assert_eq!(result.exit_code, 0, "ingest failed: {}", result.output);

    let updated = fs::read_to_string(&snapshot_path).expect("snapshot rewritten");
    let snapshot: flightline_core::PricingSnapshot =
        serde_json::from_str(&updated).expect("updated snapshot parses");
    assert_eq!(snapshot.overrides.len(), 1);
    assert_eq!(snapshot.overrides[0].override_value.map(|v| v.to_string()), Some("150.00".into()));
    assert_eq!(
        snapshot.overrides[0].caa_override_value.map(|v| v.to_string()),
        Some("120.00".into())
    );
}

#[test]
fn ingest_rejects_unknown_rows_and_leaves_the_file_intact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let snapshot_path = dir.path().join("schedule.json");
    let csv_path = dir.path().join("overrides.csv");
    fs::write(&snapshot_path, SNAPSHOT).expect("write snapshot");
    fs::write(
        &csv_path,
        "aircraft_type_name,fee_code,override_amount\nGulfstream G650,RAMP,150.00\n",
    )
    .expect("write csv");

    let result = ingest::run(&snapshot_path, &csv_path, None);
    assert_ne!(result.exit_code, 0);
    assert_eq!(fs::read_to_string(&snapshot_path).expect("unchanged"), SNAPSHOT);
}

#[test]
fn validate_flags_referential_breakage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let snapshot_path = dir.path().join("schedule.json");
    let broken = SNAPSHOT.replace("\"classification_id\": \"light-jet\"", "\"classification_id\": \"heavy-jet\"");
    fs::write(&snapshot_path, broken).expect("write snapshot");

    let result = validate::run(&snapshot_path);
    assert_ne!(result.exit_code, 0);
    assert!(result.output.contains("snapshot_invalid"));
}
