use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::domain::aircraft::AircraftTypeId;
use crate::domain::fee::{FeeOverride, FeeRuleId};
use crate::errors::EngineError;

pub type OverrideKey = (AircraftTypeId, FeeRuleId);

/// Per-aircraft override records, at most one per `(aircraft type,
/// fee rule)` pair with independent standard and CAA halves.
///
/// "Revert to default" is deletion of the track's half, never a
/// write-back of the base value; the resolver falls through to the
/// classification default on the next call. BTreeMap keeps iteration
/// order deterministic for snapshots and tests.
///
/// Snapshot files carry overrides as a flat record list; see
/// `snapshot::OverrideRecord`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverrideStore {
    records: BTreeMap<OverrideKey, FeeOverride>,
}

impl OverrideStore {
    pub fn get(&self, aircraft: &AircraftTypeId, rule: &FeeRuleId) -> Option<&FeeOverride> {
        self.records.get(&(aircraft.clone(), rule.clone()))
    }

    pub fn upsert_standard(
        &mut self,
        aircraft: AircraftTypeId,
        rule: FeeRuleId,
        value: Decimal,
    ) -> Result<(), EngineError> {
        if value < Decimal::ZERO {
            return Err(EngineError::validation("override_amount", "must not be negative"));
        }
        let record = self.records.entry((aircraft, rule)).or_default();
        record.override_value = Some(value);
        record.is_override = true;
        Ok(())
    }

    pub fn upsert_caa(
        &mut self,
        aircraft: AircraftTypeId,
        rule: FeeRuleId,
        value: Decimal,
    ) -> Result<(), EngineError> {
        if value < Decimal::ZERO {
            return Err(EngineError::validation("override_caa_amount", "must not be negative"));
        }
        let record = self.records.entry((aircraft, rule)).or_default();
        record.caa_override_value = Some(value);
        record.is_caa_override = true;
        Ok(())
    }

    pub fn clear_standard(&mut self, aircraft: &AircraftTypeId, rule: &FeeRuleId) {
        let key = (aircraft.clone(), rule.clone());
        if let Some(record) = self.records.get_mut(&key) {
            record.override_value = None;
            record.is_override = false;
            if record.is_empty() {
                self.records.remove(&key);
            }
        }
    }

    pub fn clear_caa(&mut self, aircraft: &AircraftTypeId, rule: &FeeRuleId) {
        let key = (aircraft.clone(), rule.clone());
        if let Some(record) = self.records.get_mut(&key) {
            record.caa_override_value = None;
            record.is_caa_override = false;
            if record.is_empty() {
                self.records.remove(&key);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OverrideKey, &FeeOverride)> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::aircraft::AircraftTypeId;
    use crate::domain::fee::{FeeRuleId, Track};
    use crate::errors::EngineError;

    use super::OverrideStore;

    fn key() -> (AircraftTypeId, FeeRuleId) {
        (AircraftTypeId("citation-cj3".to_string()), FeeRuleId("rule-ramp".to_string()))
    }

    #[test]
    fn upsert_then_clear_removes_the_record_entirely() {
        let (aircraft, rule) = key();
        let mut store = OverrideStore::default();
        store
            .upsert_standard(aircraft.clone(), rule.clone(), Decimal::new(15_000, 2))
            .expect("valid upsert");
        assert_eq!(store.len(), 1);

        store.clear_standard(&aircraft, &rule);
        assert!(store.get(&aircraft, &rule).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn clearing_one_track_leaves_the_other_intact() {
        let (aircraft, rule) = key();
        let mut store = OverrideStore::default();
        store
            .upsert_standard(aircraft.clone(), rule.clone(), Decimal::new(15_000, 2))
            .expect("standard upsert");
        store.upsert_caa(aircraft.clone(), rule.clone(), Decimal::new(12_000, 2)).expect("caa");

        store.clear_standard(&aircraft, &rule);
        let record = store.get(&aircraft, &rule).expect("record survives on the caa half");
        assert!(!record.is_override);
        assert_eq!(record.value_for(Track::Caa), Some(Decimal::new(12_000, 2)));
    }

    #[test]
    fn negative_amounts_are_rejected_per_track() {
        let (aircraft, rule) = key();
        let mut store = OverrideStore::default();
        let negative = Decimal::new(-1, 2);
        assert!(matches!(
            store.upsert_standard(aircraft.clone(), rule.clone(), negative),
            Err(EngineError::Validation { .. })
        ));
        assert!(matches!(
            store.upsert_caa(aircraft, rule, negative),
            Err(EngineError::Validation { .. })
        ));
        assert!(store.is_empty());
    }
}
