use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::fee::FeeCode;
use crate::errors::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaiverTierId(pub String);

/// A named fuel-uplift threshold that, once met, waives a set of fee
/// codes. Thresholds are multiples of the aircraft's minimum waiver
/// gallons, so one tier definition scales across airframes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaiverTier {
    pub id: WaiverTierId,
    pub name: String,
    pub fuel_uplift_multiplier: Decimal,
    pub fees_waived_codes: BTreeSet<FeeCode>,
    /// Tie-break only; lower number wins between equal multipliers.
    pub tier_priority: u32,
    pub is_caa_specific_tier: bool,
}

impl WaiverTier {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.fuel_uplift_multiplier <= Decimal::ZERO {
            return Err(EngineError::validation(
                format!("waiver_tier[{}].fuel_uplift_multiplier", self.name),
                "must be greater than zero",
            ));
        }
        if self.fees_waived_codes.is_empty() {
            return Err(EngineError::validation(
                format!("waiver_tier[{}].fees_waived_codes", self.name),
                "must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rust_decimal::Decimal;

    use crate::domain::fee::FeeCode;
    use crate::errors::EngineError;

    use super::{WaiverTier, WaiverTierId};

    fn tier(multiplier: Decimal, codes: &[&str]) -> WaiverTier {
        WaiverTier {
            id: WaiverTierId("tier-1".to_string()),
            name: "Tier 1".to_string(),
            fuel_uplift_multiplier: multiplier,
            fees_waived_codes: codes.iter().map(|code| FeeCode(code.to_string())).collect(),
            tier_priority: 10,
            is_caa_specific_tier: false,
        }
    }

    #[test]
    fn rejects_non_positive_multiplier() {
        let result = tier(Decimal::ZERO, &["RAMP"]).validate();
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn rejects_empty_code_set() {
        let empty = WaiverTier { fees_waived_codes: BTreeSet::new(), ..tier(Decimal::ONE, &[]) };
        assert!(matches!(empty.validate(), Err(EngineError::Validation { .. })));
    }

    #[test]
    fn accepts_well_formed_tier() {
        assert!(tier(Decimal::TWO, &["RAMP", "PARK"]).validate().is_ok());
    }
}
