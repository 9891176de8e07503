use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::fee::{FeeRule, WaiverStrategy};
use crate::domain::tier::WaiverTier;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaiverDecision {
    pub waived: bool,
    pub tier_used: Option<WaiverTier>,
}

impl WaiverDecision {
    fn not_waived() -> Self {
        Self { waived: false, tier_used: None }
    }
}

/// Decides whether one resolved fee is waived by the delivered fuel
/// uplift. All-or-nothing per fee; partial waivers do not exist.
///
/// Tier matching is exact on the CAA flag: CAA customers only match
/// CAA-specific tiers and non-CAA customers only match non-CAA tiers,
/// with no fallback between the sets. Among tiers whose threshold is
/// met, the largest multiplier wins (the most demanding threshold
/// actually reached is the best tier earned); equal multipliers fall
/// back to the smaller `tier_priority`.
pub fn evaluate(
    rule: &FeeRule,
    gallons_delivered: Decimal,
    base_min_gallons: Decimal,
    customer_is_caa: bool,
    tiers: &[WaiverTier],
) -> WaiverDecision {
    if !rule.is_potentially_waivable_by_fuel_uplift {
        return WaiverDecision::not_waived();
    }

    match rule.waiver_strategy {
        WaiverStrategy::None => WaiverDecision::not_waived(),
        WaiverStrategy::SimpleMultiplier => {
            let Some(multiplier) = rule.simple_waiver_multiplier else {
                return WaiverDecision::not_waived();
            };
            let required = base_min_gallons * multiplier;
            WaiverDecision { waived: gallons_delivered >= required, tier_used: None }
        }
        WaiverStrategy::TieredMultiplier => {
            let best = tiers
                .iter()
                .filter(|tier| tier.fees_waived_codes.contains(&rule.fee_code))
                .filter(|tier| tier.is_caa_specific_tier == customer_is_caa)
                .filter(|tier| gallons_delivered >= base_min_gallons * tier.fuel_uplift_multiplier)
                .min_by(|a, b| {
                    b.fuel_uplift_multiplier
                        .cmp(&a.fuel_uplift_multiplier)
                        .then(a.tier_priority.cmp(&b.tier_priority))
                });
            match best {
                Some(tier) => WaiverDecision { waived: true, tier_used: Some(tier.clone()) },
                None => WaiverDecision::not_waived(),
            }
        }
    }
}
