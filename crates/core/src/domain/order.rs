use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::aircraft::AircraftTypeId;

/// Completed fuel delivery, read-only to the engine. The uplift
/// quantity is the trigger metric for waiver eligibility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelOrder {
    pub fuel_type: String,
    pub gallons_delivered: Decimal,
    pub aircraft_type_id: AircraftTypeId,
}
