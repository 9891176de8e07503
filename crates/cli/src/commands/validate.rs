use std::fs;
use std::path::Path;

use flightline_core::PricingSnapshot;

use crate::commands::CommandResult;

pub fn run(snapshot_path: &Path) -> CommandResult {
    let raw = match fs::read_to_string(snapshot_path) {
        Ok(raw) => raw,
        Err(error) => {
            return CommandResult::failure(
                "validate",
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
                "validate",
                "snapshot_parse",
                format!("could not parse `{}`: {error}", snapshot_path.display()),
                3,
            );
        }
    };

    let rule_count = snapshot.fee_rules.len();
    let tier_count = snapshot.tiers.len();
    let override_count = snapshot.overrides.len();
    match snapshot.load() {
        Ok(_) => CommandResult::success(
            "validate",
            format!(
                "snapshot ok: {rule_count} fee rules, {override_count} overrides, {tier_count} tiers"
            ),
        ),
        Err(error) => CommandResult::failure("validate", "snapshot_invalid", error.to_string(), 4),
    }
}
