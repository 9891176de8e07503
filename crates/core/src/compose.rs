use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::domain::fee::{CalculationBasis, FeeCode, Track};
use crate::domain::order::FuelOrder;
use crate::domain::receipt::{
    LineItemId, LineItemType, ReceiptLineItem, ReceiptRollups, WaiverSource,
};
use crate::domain::tier::WaiverTier;
use crate::errors::EngineError;
use crate::overrides::OverrideStore;
use crate::resolver;
use crate::waiver;

/// Ad-hoc service added to the receipt outside the fee-rule catalog.
/// The composer treats it as an opaque fixed-price charge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdditionalService {
    pub code: FeeCode,
    pub description: String,
    pub price: Decimal,
    pub is_taxable: bool,
}

/// Externally supplied discount, appended unmodified after the tax
/// line. Amounts are expected to be negative.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscountLine {
    pub description: String,
    pub amount: Decimal,
}

/// Everything one composition reads. The engine is a pure function of
/// this value; concurrent compositions over different requests share
/// nothing.
#[derive(Clone, Debug)]
pub struct ComposeRequest<'a> {
    pub fuel_order: &'a FuelOrder,
    pub catalog: &'a Catalog,
    pub overrides: &'a OverrideStore,
    pub tiers: &'a [WaiverTier],
    pub additional_services: &'a [AdditionalService],
    /// Fee codes a CSR has manually waived. Re-applied idempotently on
    /// every recompute; manual presence skips automatic evaluation.
    pub manual_waivers: &'a BTreeSet<FeeCode>,
    pub discounts: &'a [DiscountLine],
    pub customer_is_caa: bool,
    pub fuel_unit_price: Decimal,
    pub fuel_is_taxable: bool,
    pub tax_rate: Decimal,
    /// Unit counts for PER_UNIT_SERVICE rules, keyed by fee code.
    /// Absent codes default to one unit.
    pub service_units: &'a BTreeMap<FeeCode, Decimal>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositionTrace {
    pub steps: Vec<TraceStep>,
}

impl CompositionTrace {
    fn push(&mut self, stage: &str, detail: impl Into<String>, amount: Decimal) {
        self.steps.push(TraceStep { stage: stage.to_string(), detail: detail.into(), amount });
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub line_items: Vec<ReceiptLineItem>,
    pub rollups: ReceiptRollups,
    pub trace: CompositionTrace,
}

struct ChargedFee {
    code: FeeCode,
    description: String,
    amount: Decimal,
    is_taxable: bool,
    /// False for ad-hoc services, which are never auto-waived.
    waiver_candidate: bool,
}

/// The public invocation boundary: idempotent, side-effect-free.
/// Callers persist the result.
pub fn calculate_fees(request: &ComposeRequest<'_>) -> Result<Composition, EngineError> {
    compose(request)
}

/// Assembles the FUEL/FEE/WAIVER/TAX/DISCOUNT line-item sequence and
/// rollups. Deterministic: identical inputs yield byte-identical
/// output, so line ids are sequence labels rather than random ids.
pub fn compose(request: &ComposeRequest<'_>) -> Result<Composition, EngineError> {
    validate_request(request)?;

    let aircraft_type = request
        .catalog
        .aircraft_type(&request.fuel_order.aircraft_type_id)
        .ok_or_else(|| {
            EngineError::not_found("aircraft type", request.fuel_order.aircraft_type_id.0.clone())
        })?;
    let track = if request.customer_is_caa { Track::Caa } else { Track::Standard };

    let mut trace = CompositionTrace::default();
    let mut lines = Vec::new();
    let mut next_line = 0u32;
    let mut line_id = move || {
        next_line += 1;
        LineItemId(format!("L{next_line:03}"))
    };

    // Step 1: the single fuel line.
    let gallons = request.fuel_order.gallons_delivered;
    let fuel_amount = gallons * request.fuel_unit_price;
    lines.push(ReceiptLineItem {
        id: line_id(),
        line_item_type: LineItemType::Fuel,
        description: format!("{} uplift", request.fuel_order.fuel_type),
        quantity: gallons,
        unit_price: request.fuel_unit_price,
        amount: fuel_amount,
        fee_code_applied: None,
        waiver_source: None,
    });
    trace.push("fuel", format!("{gallons} gal @ {}", request.fuel_unit_price), fuel_amount);

    // Steps 2-3: classification fees, then ad-hoc services.
    let mut charged = Vec::new();
    for rule in request.catalog.rules_for_classification(&aircraft_type.classification_id) {
        if rule.calculation_basis == CalculationBasis::NotApplicable {
            continue;
        }
        let override_record = request.overrides.get(&aircraft_type.id, &rule.id);
        let effective = resolver::resolve(rule, aircraft_type, override_record, track)?;

        let quantity = match rule.calculation_basis {
            CalculationBasis::PerUnitService => request
                .service_units
                .get(&rule.fee_code)
                .copied()
                .unwrap_or(Decimal::ONE),
            CalculationBasis::FixedPrice | CalculationBasis::NotApplicable => Decimal::ONE,
        };
        let amount = effective.value * quantity;

        lines.push(ReceiptLineItem {
            id: line_id(),
            line_item_type: LineItemType::Fee,
            description: rule.fee_name.clone(),
            quantity,
            unit_price: effective.value,
            amount,
            fee_code_applied: Some(rule.fee_code.clone()),
            waiver_source: None,
        });
        trace.push("fee", format!("{} ({:?})", rule.fee_code.0, effective.source), amount);
        charged.push(ChargedFee {
            code: rule.fee_code.clone(),
            description: rule.fee_name.clone(),
            amount,
            is_taxable: rule.is_taxable,
            waiver_candidate: true,
        });
    }

    for service in request.additional_services {
        lines.push(ReceiptLineItem {
            id: line_id(),
            line_item_type: LineItemType::Fee,
            description: service.description.clone(),
            quantity: Decimal::ONE,
            unit_price: service.price,
            amount: service.price,
            fee_code_applied: Some(service.code.clone()),
            waiver_source: None,
        });
        trace.push("service", service.code.0.clone(), service.price);
        charged.push(ChargedFee {
            code: service.code.clone(),
            description: service.description.clone(),
            amount: service.price,
            is_taxable: service.is_taxable,
            waiver_candidate: false,
        });
    }

    // Step 4: waiver lines, in charged-fee order. Manual waivers take
    // precedence and suppress the automatic evaluation for that code.
    let mut waived_taxable = Decimal::ZERO;
    for fee in &charged {
        let source = if request.manual_waivers.contains(&fee.code) {
            Some(WaiverSource::Manual)
        } else if fee.waiver_candidate {
            let rule = request
                .catalog
                .rule_by_code(&fee.code)
                .ok_or_else(|| EngineError::not_found("fee rule", fee.code.0.clone()))?;
            let decision = waiver::evaluate(
                rule,
                gallons,
                aircraft_type.base_min_fuel_gallons_for_waiver,
                request.customer_is_caa,
                request.tiers,
            );
            decision.waived.then_some(WaiverSource::Automatic)
        } else {
            None
        };

        if let Some(source) = source {
            lines.push(ReceiptLineItem {
                id: line_id(),
                line_item_type: LineItemType::Waiver,
                description: format!("Waiver: {}", fee.description),
                quantity: Decimal::ONE,
                unit_price: -fee.amount,
                amount: -fee.amount,
                fee_code_applied: Some(fee.code.clone()),
                waiver_source: Some(source),
            });
            trace.push("waiver", format!("{} ({source:?})", fee.code.0), -fee.amount);
            if fee.is_taxable {
                waived_taxable += fee.amount;
            }
        }
    }

    // Step 5: one tax line over the taxable subtotal, omitted at zero.
    let mut taxable_subtotal = if request.fuel_is_taxable { fuel_amount } else { Decimal::ZERO };
    taxable_subtotal += charged
        .iter()
        .filter(|fee| fee.is_taxable)
        .map(|fee| fee.amount)
        .sum::<Decimal>();
    taxable_subtotal -= waived_taxable;

    let tax_amount = (taxable_subtotal * request.tax_rate)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if !tax_amount.is_zero() {
        lines.push(ReceiptLineItem {
            id: line_id(),
            line_item_type: LineItemType::Tax,
            description: "Tax".to_string(),
            quantity: Decimal::ONE,
            unit_price: tax_amount,
            amount: tax_amount,
            fee_code_applied: None,
            waiver_source: None,
        });
        trace.push("tax", format!("{taxable_subtotal} @ {}", request.tax_rate), tax_amount);
    }

    // Step 6: externally supplied discounts, unmodified.
    for discount in request.discounts {
        lines.push(ReceiptLineItem {
            id: line_id(),
            line_item_type: LineItemType::Discount,
            description: discount.description.clone(),
            quantity: Decimal::ONE,
            unit_price: discount.amount,
            amount: discount.amount,
            fee_code_applied: None,
            waiver_source: None,
        });
        trace.push("discount", discount.description.clone(), discount.amount);
    }

    // Step 7: rollups from the emitted lines.
    let rollups = roll_up(&lines);
    trace.push("total", "sum of all line amounts", rollups.grand_total_amount);

    Ok(Composition { line_items: lines, rollups, trace })
}

fn roll_up(lines: &[ReceiptLineItem]) -> ReceiptRollups {
    let mut rollups = ReceiptRollups::default();
    for line in lines {
        match line.line_item_type {
            LineItemType::Fuel => rollups.fuel_subtotal += line.amount,
            LineItemType::Fee => rollups.total_fees_amount += line.amount,
            LineItemType::Waiver => rollups.total_waivers_amount += line.amount,
            LineItemType::Tax => rollups.tax_amount += line.amount,
            LineItemType::Discount => {}
        }
        rollups.grand_total_amount += line.amount;
    }
    rollups
}

fn validate_request(request: &ComposeRequest<'_>) -> Result<(), EngineError> {
    request.catalog.validate()?;
    for tier in request.tiers {
        tier.validate()?;
    }
    if request.fuel_order.gallons_delivered < Decimal::ZERO {
        return Err(EngineError::validation("gallons_delivered", "must not be negative"));
    }
    if request.tax_rate < Decimal::ZERO || request.tax_rate > Decimal::ONE {
        return Err(EngineError::validation("tax_rate", "must be within [0, 1]"));
    }
    for service in request.additional_services {
        if service.price < Decimal::ZERO {
            return Err(EngineError::validation(
                format!("additional_service[{}].price", service.code.0),
                "must not be negative",
            ));
        }
    }
    // A manual waiver is only meaningful on a charged, waivable rule
    // or an ad-hoc service on this receipt.
    for code in request.manual_waivers {
        let known_service =
            request.additional_services.iter().any(|service| &service.code == code);
        if known_service {
            continue;
        }
        match request.catalog.rule_by_code(code) {
            Some(rule) if rule.is_potentially_waivable_by_fuel_uplift => {}
            Some(_) => {
                return Err(EngineError::validation(
                    format!("manual_waivers[{}]", code.0),
                    "fee rule is not waivable by fuel uplift",
                ));
            }
            None => return Err(EngineError::not_found("fee rule", code.0.clone())),
        }
    }
    Ok(())
}
