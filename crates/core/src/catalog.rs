use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::domain::aircraft::{
    AircraftClassification, AircraftType, AircraftTypeId, ClassificationId,
};
use crate::domain::fee::{FeeCode, FeeRule, FeeRuleId};
use crate::errors::EngineError;

/// Immutable per-request view of the fee-rule catalog. Each compose
/// call reads one snapshot; edits made elsewhere become visible only
/// when the caller supplies a fresh catalog.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    classifications: Vec<AircraftClassification>,
    aircraft_types: Vec<AircraftType>,
    fee_rules: Vec<FeeRule>,
}

impl Catalog {
    pub fn new(
        classifications: Vec<AircraftClassification>,
        aircraft_types: Vec<AircraftType>,
        fee_rules: Vec<FeeRule>,
    ) -> Self {
        Self { classifications, aircraft_types, fee_rules }
    }

    pub fn classification(&self, id: &ClassificationId) -> Option<&AircraftClassification> {
        self.classifications.iter().find(|classification| &classification.id == id)
    }

    pub fn aircraft_type(&self, id: &AircraftTypeId) -> Option<&AircraftType> {
        self.aircraft_types.iter().find(|aircraft| &aircraft.id == id)
    }

    pub fn aircraft_type_by_name(&self, name: &str) -> Option<&AircraftType> {
        self.aircraft_types.iter().find(|aircraft| aircraft.name == name)
    }

    pub fn rule(&self, id: &FeeRuleId) -> Option<&FeeRule> {
        self.fee_rules.iter().find(|rule| &rule.id == id)
    }

    pub fn rule_by_code(&self, code: &FeeCode) -> Option<&FeeRule> {
        self.fee_rules.iter().find(|rule| &rule.fee_code == code)
    }

    /// Rules scoped to one classification, in stable catalog order.
    pub fn rules_for_classification<'a>(
        &'a self,
        id: &ClassificationId,
    ) -> impl Iterator<Item = &'a FeeRule> + 'a {
        let id = id.clone();
        self.fee_rules.iter().filter(move |rule| rule.applies_to_classification_id == id)
    }

    pub fn classifications(&self) -> &[AircraftClassification] {
        &self.classifications
    }

    pub fn aircraft_types(&self) -> &[AircraftType] {
        &self.aircraft_types
    }

    pub fn fee_rules(&self) -> &[FeeRule] {
        &self.fee_rules
    }

    /// Referential and field validation for the whole view. Runs once
    /// per snapshot load, before any resolution.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut seen_codes = BTreeSet::new();
        for rule in &self.fee_rules {
            rule.validate()?;
            if !seen_codes.insert(rule.fee_code.clone()) {
                return Err(EngineError::validation(
                    format!("fee_rule[{}].fee_code", rule.fee_code.0),
                    "fee codes must be unique across the catalog",
                ));
            }
            if self.classification(&rule.applies_to_classification_id).is_none() {
                return Err(EngineError::not_found(
                    "classification",
                    rule.applies_to_classification_id.0.clone(),
                ));
            }
        }
        for aircraft in &self.aircraft_types {
            if self.classification(&aircraft.classification_id).is_none() {
                return Err(EngineError::not_found(
                    "classification",
                    aircraft.classification_id.0.clone(),
                ));
            }
            if aircraft.base_min_fuel_gallons_for_waiver < Decimal::ZERO {
                return Err(EngineError::validation(
                    format!("aircraft_type[{}].base_min_fuel_gallons_for_waiver", aircraft.name),
                    "must not be negative",
                ));
            }
        }
        Ok(())
    }
}
