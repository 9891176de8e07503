use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::aircraft::ClassificationId;
use crate::errors::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeeRuleId(pub String);

/// Stable external identifier for a fee. Unique across the catalog and
/// immutable once referenced by receipts or waiver tiers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeeCode(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationBasis {
    FixedPrice,
    PerUnitService,
    NotApplicable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaiverStrategy {
    None,
    SimpleMultiplier,
    TieredMultiplier,
}

/// Which default/override hierarchy a resolution reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Track {
    Standard,
    Caa,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeeRule {
    pub id: FeeRuleId,
    pub fee_code: FeeCode,
    pub fee_name: String,
    pub applies_to_classification_id: ClassificationId,
    /// Classification-level default for the standard track.
    pub amount: Decimal,
    pub currency: String,
    pub is_taxable: bool,
    pub calculation_basis: CalculationBasis,
    pub is_potentially_waivable_by_fuel_uplift: bool,
    pub waiver_strategy: WaiverStrategy,
    pub simple_waiver_multiplier: Option<Decimal>,
    pub has_caa_override: bool,
    /// Classification-level default for the CAA track.
    pub caa_override_amount: Option<Decimal>,
}

impl FeeRule {
    /// Field-scoped validation, rejected before any resolution runs.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.amount < Decimal::ZERO {
            return Err(EngineError::validation(
                format!("fee_rule[{}].amount", self.fee_code.0),
                "must not be negative",
            ));
        }
        if let Some(caa_amount) = self.caa_override_amount {
            if caa_amount < Decimal::ZERO {
                return Err(EngineError::validation(
                    format!("fee_rule[{}].caa_override_amount", self.fee_code.0),
                    "must not be negative",
                ));
            }
        }
        match self.waiver_strategy {
            WaiverStrategy::SimpleMultiplier => match self.simple_waiver_multiplier {
                Some(multiplier) if multiplier > Decimal::ZERO => Ok(()),
                Some(_) => Err(EngineError::validation(
                    format!("fee_rule[{}].simple_waiver_multiplier", self.fee_code.0),
                    "must be greater than zero",
                )),
                None => Err(EngineError::validation(
                    format!("fee_rule[{}].simple_waiver_multiplier", self.fee_code.0),
                    "required when waiver_strategy is SIMPLE_MULTIPLIER",
                )),
            },
            WaiverStrategy::None | WaiverStrategy::TieredMultiplier => Ok(()),
        }
    }
}

/// Per-aircraft override record. The standard and CAA halves are
/// independent; a half whose flag is unset inherits the classification
/// default for that track.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeOverride {
    pub override_value: Option<Decimal>,
    pub is_override: bool,
    pub caa_override_value: Option<Decimal>,
    pub is_caa_override: bool,
}

impl FeeOverride {
    pub fn is_empty(&self) -> bool {
        !self.is_override && !self.is_caa_override
    }

    pub fn value_for(&self, track: Track) -> Option<Decimal> {
        match track {
            Track::Standard => self.is_override.then_some(self.override_value).flatten(),
            Track::Caa => self.is_caa_override.then_some(self.caa_override_value).flatten(),
        }
    }
}

/// Where a resolved value came from, surfaced so callers can render
/// inherited vs. overridden state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeValueSource {
    ClassificationDefault,
    AircraftOverride,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectiveFee {
    pub value: Decimal,
    pub source: FeeValueSource,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::aircraft::ClassificationId;
    use crate::errors::EngineError;

    use super::{
        CalculationBasis, FeeCode, FeeOverride, FeeRule, FeeRuleId, Track, WaiverStrategy,
    };

    fn rule(strategy: WaiverStrategy, multiplier: Option<Decimal>) -> FeeRule {
        FeeRule {
            id: FeeRuleId("rule-ramp".to_string()),
            fee_code: FeeCode("RAMP".to_string()),
            fee_name: "Ramp Fee".to_string(),
            applies_to_classification_id: ClassificationId("light-jet".to_string()),
            amount: Decimal::new(10_000, 2),
            currency: "USD".to_string(),
            is_taxable: true,
            calculation_basis: CalculationBasis::FixedPrice,
            is_potentially_waivable_by_fuel_uplift: true,
            waiver_strategy: strategy,
            simple_waiver_multiplier: multiplier,
            has_caa_override: false,
            caa_override_amount: None,
        }
    }

    #[test]
    fn simple_strategy_requires_positive_multiplier() {
        let missing = rule(WaiverStrategy::SimpleMultiplier, None);
        assert!(matches!(missing.validate(), Err(EngineError::Validation { .. })));

        let zero = rule(WaiverStrategy::SimpleMultiplier, Some(Decimal::ZERO));
        assert!(matches!(zero.validate(), Err(EngineError::Validation { .. })));

        let valid = rule(WaiverStrategy::SimpleMultiplier, Some(Decimal::ONE));
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn negative_amount_is_rejected() {
        let mut negative = rule(WaiverStrategy::None, None);
        negative.amount = Decimal::new(-1, 0);
        assert!(matches!(negative.validate(), Err(EngineError::Validation { .. })));
    }

    #[test]
    fn override_tracks_are_independent() {
        let record = FeeOverride {
            override_value: Some(Decimal::new(15_000, 2)),
            is_override: true,
            caa_override_value: None,
            is_caa_override: false,
        };
        assert_eq!(record.value_for(Track::Standard), Some(Decimal::new(15_000, 2)));
        assert_eq!(record.value_for(Track::Caa), None);
    }
}
