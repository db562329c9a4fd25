use crate::config::toml_config::{EngineConfig, RatioBounds};
use crate::core::{InputField, InvalidInput, RawInputs, ValidInputs};

/// Parses user-typed numeric text.
///
/// Surrounding whitespace and spaces used as thousands separators are ignored,
/// and a lone `,` is read as the decimal point. A `,` followed by exactly three
/// digits (`200,000`) could be either separator and is refused. Returns `None`
/// for anything that is not a finite number.
pub fn parse_number(text: &str) -> Option<f64> {
    let compact: String = text
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}' | '\t'))
        .collect();
    if compact.is_empty() {
        return None;
    }

    let normalized = if compact.matches(',').count() == 1 && !compact.contains('.') {
        let (_, decimals) = compact.split_once(',')?;
        if decimals.len() == 3 && decimals.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        compact.replace(',', ".")
    } else {
        compact
    };

    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn blank(raw: &RawInputs, field: InputField) -> bool {
    raw.get(field).map_or(true, |text| text.trim().is_empty())
}

fn read(raw: &RawInputs, field: InputField) -> Result<f64, InvalidInput> {
    let text = raw.get(field).unwrap_or_default();
    if blank(raw, field) {
        return Err(InvalidInput::new(field.key(), text, "a value is required"));
    }
    parse_number(text).ok_or_else(|| InvalidInput::new(field.key(), text, "not a finite number"))
}

fn read_positive(raw: &RawInputs, field: InputField) -> Result<f64, InvalidInput> {
    let value = read(raw, field)?;
    if value <= 0.0 {
        return Err(InvalidInput::new(
            field.key(),
            raw.get(field).unwrap_or_default(),
            "must be greater than 0",
        ));
    }
    Ok(value)
}

fn read_non_negative(raw: &RawInputs, field: InputField) -> Result<f64, InvalidInput> {
    let value = read(raw, field)?;
    if value < 0.0 {
        return Err(InvalidInput::new(
            field.key(),
            raw.get(field).unwrap_or_default(),
            "must not be negative",
        ));
    }
    Ok(value)
}

fn read_term(raw: &RawInputs) -> Result<u32, InvalidInput> {
    let field = InputField::Term;
    let value = read_positive(raw, field)?;
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(InvalidInput::new(
            field.key(),
            raw.get(field).unwrap_or_default(),
            "must be a whole number of months",
        ));
    }
    Ok(value as u32)
}

fn read_ratio(
    raw: &RawInputs,
    field: InputField,
    default: f64,
    bounds: RatioBounds,
) -> Result<f64, InvalidInput> {
    let value = if blank(raw, field) { default } else { read(raw, field)? };

    if bounds == RatioBounds::Strict && !(0.0..=1.0).contains(&value) {
        return Err(InvalidInput::new(
            field.key(),
            raw.get(field).unwrap_or_default(),
            "must be a fraction between 0 and 1",
        ));
    }
    Ok(value)
}

/// Classifies the whole vector: either every field is usable or the first
/// offending field is reported.
pub fn validate(raw: &RawInputs, config: &EngineConfig) -> Result<ValidInputs, InvalidInput> {
    let bounds = config.policy.ratio_bounds;

    Ok(ValidInputs {
        price: read_positive(raw, InputField::Price)?,
        rent: read_non_negative(raw, InputField::Rent)?,
        annual_rate_percent: read_positive(raw, InputField::Rate)?,
        term_months: read_term(raw)?,
        income: read_non_negative(raw, InputField::Income)?,
        current_monthly_debt: read_non_negative(raw, InputField::CurrentDebt)?,
        max_debt_ratio: read_ratio(
            raw,
            InputField::MaxDebtRatio,
            config.defaults.max_debt_ratio,
            bounds,
        )?,
        rent_inclusion_ratio: read_ratio(
            raw,
            InputField::RentInclusionRatio,
            config.defaults.rent_inclusion_ratio,
            bounds,
        )?,
    })
}
