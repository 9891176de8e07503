use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::errors::EngineError;
use crate::overrides::OverrideStore;

/// One row of the bulk override format: `aircraft_type_name,
/// fee_code, override_amount, override_caa_amount`. The CAA column is
/// optional; each present column maps to one upsert on its track.
#[derive(Clone, Debug, Deserialize)]
pub struct OverrideRow {
    pub aircraft_type_name: String,
    pub fee_code: String,
    #[serde(default)]
    pub override_amount: Option<Decimal>,
    #[serde(default)]
    pub override_caa_amount: Option<Decimal>,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("row {row}: {source}")]
    Malformed { row: usize, source: csv::Error },
    #[error("row {row}: {source}")]
    Rejected { row: usize, source: EngineError },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IngestReport {
    pub rows_read: usize,
    pub standard_upserts: usize,
    pub caa_upserts: usize,
}

/// Applies a tabular override file against the catalog. Unknown
/// aircraft or fee codes and negative amounts abort the ingest with
/// the offending row number; rows before the failure are already
/// applied, so callers should ingest into a scratch store and swap.
pub fn ingest_overrides<R: Read>(
    source: R,
    catalog: &Catalog,
    store: &mut OverrideStore,
) -> Result<IngestReport, IngestError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    let mut report = IngestReport::default();

    for (index, row) in reader.deserialize::<OverrideRow>().enumerate() {
        // Row numbers are 1-based and skip the header.
        let row_number = index + 1;
        let row = row.map_err(|source| IngestError::Malformed { row: row_number, source })?;
        report.rows_read += 1;

        let aircraft = catalog.aircraft_type_by_name(&row.aircraft_type_name).ok_or_else(|| {
            IngestError::Rejected {
                row: row_number,
                source: EngineError::not_found("aircraft type", row.aircraft_type_name.clone()),
            }
        })?;
        let rule = catalog
            .rule_by_code(&crate::domain::fee::FeeCode(row.fee_code.clone()))
            .ok_or_else(|| IngestError::Rejected {
                row: row_number,
                source: EngineError::not_found("fee rule", row.fee_code.clone()),
            })?;

        if let Some(amount) = row.override_amount {
            store
                .upsert_standard(aircraft.id.clone(), rule.id.clone(), amount)
                .map_err(|source| IngestError::Rejected { row: row_number, source })?;
            report.standard_upserts += 1;
        }
        if let Some(amount) = row.override_caa_amount {
            store
                .upsert_caa(aircraft.id.clone(), rule.id.clone(), amount)
                .map_err(|source| IngestError::Rejected { row: row_number, source })?;
            report.caa_upserts += 1;
        }
    }

    Ok(report)
}
