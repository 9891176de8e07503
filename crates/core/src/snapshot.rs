use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::domain::aircraft::{AircraftClassification, AircraftType, AircraftTypeId};
use crate::domain::fee::{FeeRule, FeeRuleId};
use crate::domain::tier::WaiverTier;
use crate::errors::EngineError;
use crate::overrides::OverrideStore;

/// One override record as stored in a snapshot document, flattened to
/// a row so JSON round-trips cleanly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverrideRecord {
    pub aircraft_type_id: AircraftTypeId,
    pub fee_rule_id: FeeRuleId,
    #[serde(default)]
    pub override_value: Option<Decimal>,
    #[serde(default)]
    pub caa_override_value: Option<Decimal>,
}

/// The immutable per-request view the engine reads, as one serde
/// document. The CLI loads this from disk; services hand it over
/// per compose call. Edits elsewhere are visible only through a
/// fresh snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingSnapshot {
    pub classifications: Vec<AircraftClassification>,
    pub aircraft_types: Vec<AircraftType>,
    pub fee_rules: Vec<FeeRule>,
    #[serde(default)]
    pub overrides: Vec<OverrideRecord>,
    #[serde(default)]
    pub tiers: Vec<WaiverTier>,
}

impl PricingSnapshot {
    /// Builds the validated catalog and override store this snapshot
    /// describes. Fails on the first referential or field violation.
    pub fn load(self) -> Result<(Catalog, OverrideStore, Vec<WaiverTier>), EngineError> {
        let catalog = Catalog::new(self.classifications, self.aircraft_types, self.fee_rules);
        catalog.validate()?;

        let mut store = OverrideStore::default();
        for record in self.overrides {
            if catalog.aircraft_type(&record.aircraft_type_id).is_none() {
                return Err(EngineError::not_found(
                    "aircraft type",
                    record.aircraft_type_id.0.clone(),
                ));
            }
            if catalog.rule(&record.fee_rule_id).is_none() {
                return Err(EngineError::not_found("fee rule", record.fee_rule_id.0.clone()));
            }
            if let Some(value) = record.override_value {
                store.upsert_standard(
                    record.aircraft_type_id.clone(),
                    record.fee_rule_id.clone(),
                    value,
                )?;
            }
            if let Some(value) = record.caa_override_value {
                store.upsert_caa(record.aircraft_type_id, record.fee_rule_id, value)?;
            }
        }

        for tier in &self.tiers {
            tier.validate()?;
        }
        Ok((catalog, store, self.tiers))
    }
}
