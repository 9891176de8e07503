use crate::domain::aircraft::AircraftType;
use crate::domain::fee::{EffectiveFee, FeeOverride, FeeRule, FeeValueSource, Track};
use crate::errors::EngineError;

/// Resolves the effective charge for one `(rule, aircraft, track)`
/// triple against an optional per-aircraft override record.
///
/// The two-level hierarchy is: classification default (on the rule,
/// per track) overridden by an aircraft-level value when that track's
/// flag is set. A track with no override half falls through to the
/// default, which is how editing `rule.amount` or
/// `rule.caa_override_amount` propagates to every aircraft in the
/// classification that has no override on that track.
pub fn resolve(
    rule: &FeeRule,
    aircraft_type: &AircraftType,
    override_record: Option<&FeeOverride>,
    track: Track,
) -> Result<EffectiveFee, EngineError> {
    if rule.applies_to_classification_id != aircraft_type.classification_id {
        return Err(EngineError::not_found("fee rule for classification", rule.fee_code.0.clone()));
    }

    if let Some(value) = override_record.and_then(|record| record.value_for(track)) {
        return Ok(EffectiveFee { value, source: FeeValueSource::AircraftOverride });
    }

    let base = match track {
        Track::Caa if rule.has_caa_override => {
            rule.caa_override_amount.unwrap_or(rule.amount)
        }
        Track::Caa | Track::Standard => rule.amount,
    };

    Ok(EffectiveFee { value: base, source: FeeValueSource::ClassificationDefault })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::aircraft::{AircraftType, AircraftTypeId, ClassificationId};
    use crate::domain::fee::{
        CalculationBasis, FeeCode, FeeOverride, FeeRule, FeeRuleId, FeeValueSource, Track,
        WaiverStrategy,
    };
    use crate::errors::EngineError;

    use super::resolve;

    fn aircraft(classification: &str) -> AircraftType {
        AircraftType {
            id: AircraftTypeId("citation-cj3".to_string()),
            name: "Citation CJ3".to_string(),
            classification_id: ClassificationId(classification.to_string()),
            base_min_fuel_gallons_for_waiver: Decimal::new(500, 0),
        }
    }

    fn ramp_rule() -> FeeRule {
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
            waiver_strategy: WaiverStrategy::None,
            simple_waiver_multiplier: None,
            has_caa_override: true,
            caa_override_amount: Some(Decimal::new(8_000, 2)),
        }
    }

    #[test]
    fn falls_through_to_classification_default_per_track() {
        let rule = ramp_rule();
        let aircraft = aircraft("light-jet");

        let standard = resolve(&rule, &aircraft, None, Track::Standard).expect("standard");
        assert_eq!(standard.value, Decimal::new(10_000, 2));
        assert_eq!(standard.source, FeeValueSource::ClassificationDefault);

        let caa = resolve(&rule, &aircraft, None, Track::Caa).expect("caa");
        assert_eq!(caa.value, Decimal::new(8_000, 2));
        assert_eq!(caa.source, FeeValueSource::ClassificationDefault);
    }

    #[test]
    fn caa_track_without_caa_default_reads_standard_amount() {
        let rule = FeeRule { has_caa_override: false, caa_override_amount: None, ..ramp_rule() };
        let resolved =
            resolve(&rule, &aircraft("light-jet"), None, Track::Caa).expect("caa fallback");
        assert_eq!(resolved.value, Decimal::new(10_000, 2));
    }

    #[test]
    fn aircraft_override_wins_only_on_its_own_track() {
        let rule = ramp_rule();
        let aircraft = aircraft("light-jet");
        let record = FeeOverride {
            override_value: Some(Decimal::new(15_000, 2)),
            is_override: true,
            caa_override_value: None,
            is_caa_override: false,
        };

        let standard =
            resolve(&rule, &aircraft, Some(&record), Track::Standard).expect("standard");
        assert_eq!(standard.value, Decimal::new(15_000, 2));
        assert_eq!(standard.source, FeeValueSource::AircraftOverride);

        let caa = resolve(&rule, &aircraft, Some(&record), Track::Caa).expect("caa");
        assert_eq!(caa.value, Decimal::new(8_000, 2));
        assert_eq!(caa.source, FeeValueSource::ClassificationDefault);
    }

    #[test]
    fn rejects_aircraft_outside_the_rule_classification() {
        let result = resolve(&ramp_rule(), &aircraft("heavy-jet"), None, Track::Standard);
        assert!(matches!(result, Err(EngineError::NotFound { .. })));
    }

    #[test]
    fn classification_default_edit_reaches_non_overridden_aircraft() {
        let mut rule = ramp_rule();
        let aircraft = aircraft("light-jet");

        rule.amount = Decimal::new(12_500, 2);
        let resolved = resolve(&rule, &aircraft, None, Track::Standard).expect("mass update");
        assert_eq!(resolved.value, Decimal::new(12_500, 2));
    }
}
