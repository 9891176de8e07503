use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::fee::FeeCode;
use crate::domain::order::FuelOrder;
use crate::errors::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineItemId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceiptStatus {
    Draft,
    Finalized,
    Void,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineItemType {
    Fuel,
    Fee,
    Waiver,
    Tax,
    Discount,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaiverSource {
    Automatic,
    Manual,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLineItem {
    pub id: LineItemId,
    pub line_item_type: LineItemType,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Signed; negative for Waiver and Discount lines.
    pub amount: Decimal,
    pub fee_code_applied: Option<FeeCode>,
    pub waiver_source: Option<WaiverSource>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRollups {
    pub fuel_subtotal: Decimal,
    pub total_fees_amount: Decimal,
    pub total_waivers_amount: Decimal,
    pub tax_amount: Decimal,
    pub grand_total_amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    pub status: ReceiptStatus,
    pub customer_is_caa: bool,
    pub fuel_order: FuelOrder,
    pub line_items: Vec<ReceiptLineItem>,
    pub rollups: ReceiptRollups,
    pub created_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,
}

impl Receipt {
    /// Opens a draft receipt for a completed fuel order. Line items are
    /// empty until the first composition is applied.
    pub fn open(fuel_order: FuelOrder, customer_is_caa: bool) -> Self {
        Self {
            id: ReceiptId(Uuid::new_v4().to_string()),
            status: ReceiptStatus::Draft,
            customer_is_caa,
            fuel_order,
            line_items: Vec::new(),
            rollups: ReceiptRollups::default(),
            created_at: Utc::now(),
            finalized_at: None,
        }
    }

    pub fn can_transition_to(&self, next: ReceiptStatus) -> bool {
        matches!(
            (self.status, next),
            (ReceiptStatus::Draft, ReceiptStatus::Finalized)
                | (ReceiptStatus::Finalized, ReceiptStatus::Void)
        )
    }

    /// Replaces line items and rollups wholesale. Recomputation is
    /// total, never an incremental patch of the previous lines.
    pub fn apply(
        &mut self,
        line_items: Vec<ReceiptLineItem>,
        rollups: ReceiptRollups,
    ) -> Result<(), EngineError> {
        if self.status != ReceiptStatus::Draft {
            return Err(EngineError::Conflict { status: self.status });
        }
        self.line_items = line_items;
        self.rollups = rollups;
        Ok(())
    }

    /// Freezes line items; the one-way Draft -> Finalized transition.
    pub fn finalize(&mut self) -> Result<(), EngineError> {
        if !self.can_transition_to(ReceiptStatus::Finalized) {
            return Err(EngineError::Conflict { status: self.status });
        }
        self.status = ReceiptStatus::Finalized;
        self.finalized_at = Some(Utc::now());
        Ok(())
    }

    /// Finalized -> Void, terminal.
    pub fn void(&mut self) -> Result<(), EngineError> {
        if !self.can_transition_to(ReceiptStatus::Void) {
            return Err(EngineError::Conflict { status: self.status });
        }
        self.status = ReceiptStatus::Void;
        Ok(())
    }
}
