use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassificationId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AircraftTypeId(pub String);

/// Groups aircraft types and the fee rules that apply to them by default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftClassification {
    pub id: ClassificationId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AircraftType {
    pub id: AircraftTypeId,
    pub name: String,
    pub classification_id: ClassificationId,
    /// Threshold gallons used by waiver multipliers for this airframe.
    pub base_min_fuel_gallons_for_waiver: Decimal,
}
