use crate::core::engine::AffordabilityCalculator;
use crate::core::{InputField, RawInputs};
use crate::utils::error::{AffordError, Result};
use serde::Serialize;
use std::io::{Read, Write};

/// Name of the optional column labelling each scenario.
pub const SCENARIO_COLUMN: &str = "scenario";

/// One output line. Metric columns stay empty when the scenario is invalid.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchRecord {
    pub scenario: String,
    pub valid: bool,
    pub error: Option<String>,
    pub monthly_payment: Option<f64>,
    pub monthly_rate: Option<f64>,
    pub current_debt_ratio: Option<f64>,
    pub project_only_debt_ratio: Option<f64>,
    pub combined_debt_ratio: Option<f64>,
    pub capacity_from_income: Option<f64>,
    pub remaining_own_capacity: Option<f64>,
    pub rental_borrowing_capacity: Option<f64>,
    pub combined_capacity: Option<f64>,
    pub cash_flow: Option<f64>,
    pub gross_yield: Option<f64>,
    pub annuity_factor: Option<f64>,
    pub desired_yield: Option<f64>,
    pub target_price: Option<f64>,
    pub target_reduction_percent: Option<f64>,
    pub acceptable_monthly_payment: Option<f64>,
    pub acceptable_price: Option<f64>,
    pub minimum_reduction_percent: Option<f64>,
    pub is_rental_project: Option<bool>,
    pub show_target_price: Option<bool>,
    pub is_negotiation_required: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub valid: usize,
    pub invalid: usize,
}

pub fn evaluate(calculator: &AffordabilityCalculator, scenario: String, raw: &RawInputs) -> BatchRecord {
    match calculator.calculate(raw) {
        Ok(r) => BatchRecord {
            scenario,
            valid: true,
            error: None,
            monthly_payment: Some(r.monthly_payment),
            monthly_rate: Some(r.monthly_rate),
            current_debt_ratio: Some(r.current_debt_ratio),
            project_only_debt_ratio: Some(r.project_only_debt_ratio),
            combined_debt_ratio: Some(r.combined_debt_ratio),
            capacity_from_income: Some(r.capacity_from_income),
            remaining_own_capacity: Some(r.remaining_own_capacity),
            rental_borrowing_capacity: Some(r.rental_borrowing_capacity),
            combined_capacity: Some(r.combined_capacity),
            cash_flow: Some(r.cash_flow),
            gross_yield: Some(r.gross_yield),
            annuity_factor: Some(r.annuity_factor),
            desired_yield: Some(r.desired_yield),
            target_price: Some(r.target_price),
            target_reduction_percent: Some(r.target_reduction_percent),
            acceptable_monthly_payment: Some(r.acceptable_monthly_payment),
            acceptable_price: Some(r.acceptable_price),
            minimum_reduction_percent: Some(r.minimum_reduction_percent),
            is_rental_project: Some(r.visibility.is_rental_project),
            show_target_price: Some(r.visibility.show_target_price),
            is_negotiation_required: Some(r.visibility.is_negotiation_required),
        },
        Err(invalid) => BatchRecord {
            scenario,
            valid: false,
            error: Some(invalid.to_string()),
            ..BatchRecord::default()
        },
    }
}

/// Reads scenarios (one per row, input keys as headers) and writes one result
/// row per scenario. Invalid scenarios are reported in the output, not as errors.
pub fn run_csv<R: Read, W: Write>(
    calculator: &AffordabilityCalculator,
    input: R,
    output: W,
) -> Result<BatchSummary> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let headers = reader.headers()?.clone();

    let mut columns = Vec::new();
    let mut scenario_column = None;
    for (index, header) in headers.iter().enumerate() {
        if header == SCENARIO_COLUMN {
            scenario_column = Some(index);
            continue;
        }
        match header.parse::<InputField>() {
            Ok(field) => columns.push((index, field)),
            Err(e) => tracing::warn!("Ignoring column {}: {}", index + 1, e),
        }
    }

    if columns.is_empty() {
        return Err(AffordError::ConfigError {
            field: "batch.headers".to_string(),
            message: "no input column found; expected keys such as price, rent, rate, term".to_string(),
        });
    }

    let mut writer = csv::Writer::from_writer(output);
    let mut summary = BatchSummary::default();

    for (line, row) in reader.records().enumerate() {
        let row = row?;
        let mut raw = RawInputs::new();
        for &(index, field) in &columns {
            if let Some(value) = row.get(index) {
                raw.set(field, value);
            }
        }

        let scenario = scenario_column
            .and_then(|index| row.get(index))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| (line + 1).to_string());

        let record = evaluate(calculator, scenario, &raw);
        if record.valid {
            summary.valid += 1;
        } else {
            tracing::warn!(
                "Scenario {}: {}",
                record.scenario,
                record.error.as_deref().unwrap_or_default()
            );
            summary.invalid += 1;
        }
        writer.serialize(&record)?;
    }

    writer.flush()?;
    tracing::info!(
        "Evaluated {} scenarios ({} invalid)",
        summary.valid + summary.invalid,
        summary.invalid
    );
    Ok(summary)
}
