use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier of one external input. The key doubles as the persistence key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InputField {
    Price,
    Rent,
    Rate,
    Term,
    Income,
    CurrentDebt,
    MaxDebtRatio,
    RentInclusionRatio,
}

impl InputField {
    pub const ALL: [InputField; 8] = [
        InputField::Price,
        InputField::Rent,
        InputField::Rate,
        InputField::Term,
        InputField::Income,
        InputField::CurrentDebt,
        InputField::MaxDebtRatio,
        InputField::RentInclusionRatio,
    ];

    pub fn key(self) -> &'static str {
        match self {
            InputField::Price => "price",
            InputField::Rent => "rent",
            InputField::Rate => "rate",
            InputField::Term => "term",
            InputField::Income => "income",
            InputField::CurrentDebt => "currentDebt",
            InputField::MaxDebtRatio => "maxDebtRatio",
            InputField::RentInclusionRatio => "rentInclusionRatio",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for InputField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InputField::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| format!("unknown input field: {}", s))
    }
}

/// Unvalidated input vector, as typed by the user or read back from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInputs {
    values: BTreeMap<InputField, String>,
}

impl RawInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a complete vector from numbers, in the order of the data model.
    #[allow(clippy::too_many_arguments)]
    pub fn from_values(
        price: f64,
        rent: f64,
        annual_rate_percent: f64,
        term_months: f64,
        income: f64,
        current_monthly_debt: f64,
        max_debt_ratio: f64,
        rent_inclusion_ratio: f64,
    ) -> Self {
        let numbers = [
            price,
            rent,
            annual_rate_percent,
            term_months,
            income,
            current_monthly_debt,
            max_debt_ratio,
            rent_inclusion_ratio,
        ];
        let mut raw = Self::new();
        for (field, value) in InputField::ALL.into_iter().zip(numbers) {
            raw.set(field, value.to_string());
        }
        raw
    }

    pub fn get(&self, field: InputField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: InputField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn with(mut self, field: InputField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn remove(&mut self, field: InputField) -> Option<String> {
        self.values.remove(&field)
    }

    /// Overlays every value present in `other`.
    pub fn merge(&mut self, other: &RawInputs) {
        for (field, value) in other.iter() {
            self.set(field, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (InputField, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }
}

/// Input vector that passed validation. Only the validator builds one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidInputs {
    pub price: f64,
    pub rent: f64,
    pub annual_rate_percent: f64,
    pub term_months: u32,
    pub income: f64,
    pub current_monthly_debt: f64,
    pub max_debt_ratio: f64,
    pub rent_inclusion_ratio: f64,
}

/// Which conditional result groups carry meaningful values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Visibility {
    pub is_rental_project: bool,
    pub show_target_price: bool,
    pub is_negotiation_required: bool,
}

/// Everything computed from one valid input vector.
///
/// Percentages are expressed in percent (4.8 means 4.8 %), debt ratios as
/// fractions. Nothing is clamped or rounded here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedResult {
    pub monthly_rate: f64,
    pub monthly_payment: f64,
    pub current_debt_ratio: f64,
    pub project_only_debt_ratio: f64,
    pub combined_debt_ratio: f64,
    pub capacity_from_income: f64,
    pub remaining_own_capacity: f64,
    pub rental_borrowing_capacity: f64,
    pub combined_capacity: f64,
    pub cash_flow: f64,
    pub gross_yield: f64,
    pub annuity_factor: f64,
    pub desired_yield: f64,
    pub target_price: f64,
    pub target_reduction_percent: f64,
    pub acceptable_monthly_payment: f64,
    pub acceptable_price: f64,
    pub minimum_reduction_percent: f64,
    pub visibility: Visibility,
}

/// Result of one recomputation: a full bundle, or the reason there is none.
pub type Outcome = std::result::Result<DerivedResult, crate::utils::error::InvalidInput>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_keys_round_trip() {
        for field in InputField::ALL {
            assert_eq!(field.key().parse::<InputField>().unwrap(), field);
        }
        assert!("interest".parse::<InputField>().is_err());
    }

    #[test]
    fn test_from_values_fills_every_field() {
        let raw = RawInputs::from_values(200000.0, 800.0, 3.5, 240.0, 3000.0, 200.0, 0.35, 0.7);
        assert_eq!(raw.get(InputField::Price), Some("200000"));
        assert_eq!(raw.get(InputField::Rate), Some("3.5"));
        assert_eq!(raw.iter().count(), InputField::ALL.len());
    }

    #[test]
    fn test_merge_overlays_values() {
        let mut base = RawInputs::new()
            .with(InputField::Price, "100000")
            .with(InputField::Rent, "500");
        base.merge(&RawInputs::new().with(InputField::Rent, "650"));
        assert_eq!(base.get(InputField::Price), Some("100000"));
        assert_eq!(base.get(InputField::Rent), Some("650"));
    }
}
