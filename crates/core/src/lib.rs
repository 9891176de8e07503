//! Fee schedule resolution and waiver computation for FBO fuel
//! receipts. The engine is a pure, synchronous function over an
//! immutable snapshot of the catalog, overrides, and waiver tiers;
//! persistence, transport, and rendering live with the caller.

pub mod catalog;
pub mod compose;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ingest;
pub mod overrides;
pub mod resolver;
pub mod snapshot;
pub mod waiver;

pub use catalog::Catalog;
pub use compose::{
    calculate_fees, compose, AdditionalService, ComposeRequest, Composition, CompositionTrace,
    DiscountLine, TraceStep,
};
pub use config::{AppConfig, ConfigError, LoadOptions, LogFormat};
pub use domain::aircraft::{
    AircraftClassification, AircraftType, AircraftTypeId, ClassificationId,
};
pub use domain::fee::{
    CalculationBasis, EffectiveFee, FeeCode, FeeOverride, FeeRule, FeeRuleId, FeeValueSource,
    Track, WaiverStrategy,
};
pub use domain::order::FuelOrder;
pub use domain::receipt::{
    LineItemId, LineItemType, Receipt, ReceiptId, ReceiptLineItem, ReceiptRollups, ReceiptStatus,
    WaiverSource,
};
pub use domain::tier::{WaiverTier, WaiverTierId};
pub use errors::EngineError;
pub use ingest::{ingest_overrides, IngestError, IngestReport, OverrideRow};
pub use overrides::OverrideStore;
pub use snapshot::{OverrideRecord, PricingSnapshot};
pub use waiver::WaiverDecision;
