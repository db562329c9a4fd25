use crate::config::toml_config::{DisplayConfig, EngineConfig, SituationPolicy};
use crate::core::{DerivedResult, Outcome};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    Positive,
    Zero,
    Negative,
}

impl Sign {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Sign::Positive
        } else if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupId {
    Situation,
    Loan,
    Rental,
    TargetPrice,
    Negotiation,
}

impl GroupId {
    pub fn title(self) -> &'static str {
        match self {
            GroupId::Situation => "Current situation",
            GroupId::Loan => "Loan",
            GroupId::Rental => "Rental project",
            GroupId::TargetPrice => "Target price",
            GroupId::Negotiation => "Negotiation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub label: &'static str,
    pub value: String,
    /// Present on fields styled by sign (cash flow, remaining capacity).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign: Option<Sign>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub id: GroupId,
    pub rows: Vec<Row>,
}

/// Formats currency and percentages with the configured separators.
#[derive(Debug, Clone)]
pub struct NumberFormatter {
    display: DisplayConfig,
}

impl NumberFormatter {
    pub fn new(display: DisplayConfig) -> Self {
        Self { display }
    }

    pub fn unknown(&self) -> &str {
        &self.display.unknown
    }

    /// Two decimals, grouped thousands, trailing currency symbol.
    pub fn currency(&self, value: f64) -> String {
        let number = self.decimal(value, 2);
        if self.display.currency_symbol.is_empty() {
            number
        } else {
            format!("{} {}", number, self.display.currency_symbol)
        }
    }

    /// `value` is already in percent.
    pub fn percent(&self, value: f64) -> String {
        format!("{} %", self.decimal(value, self.display.percent_decimals))
    }

    /// `value` is a fraction, shown as a percentage.
    pub fn ratio(&self, value: f64) -> String {
        self.percent(value * 100.0)
    }

    fn decimal(&self, value: f64, decimals: usize) -> String {
        let formatted = format!("{:.*}", decimals, value.abs());
        let (int_part, frac_part) = formatted
            .split_once('.')
            .unwrap_or((formatted.as_str(), ""));

        let mut grouped = String::new();
        for (i, digit) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push_str(&self.display.thousands_separator);
            }
            grouped.push(digit);
        }

        let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
        let mut out = String::new();
        if value < 0.0 && !is_zero {
            out.push('-');
        }
        out.push_str(&grouped);
        if !frac_part.is_empty() {
            out.push_str(&self.display.decimal_separator);
            out.push_str(frac_part);
        }
        out
    }
}

/// What the presentation layer shows for one outcome: only visible groups,
/// every value already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub groups: Vec<Group>,
}

impl Report {
    pub fn build(outcome: &Outcome, config: &EngineConfig) -> Self {
        let fmt = NumberFormatter::new(config.display.clone());
        match outcome {
            Ok(result) => Self {
                valid: true,
                message: None,
                groups: visible_groups(result, &fmt),
            },
            Err(invalid) => {
                let groups = match config.policy.situation {
                    SituationPolicy::Always => vec![blank_situation(&fmt)],
                    SituationPolicy::HideWhenInvalid => Vec::new(),
                };
                Self {
                    valid: false,
                    message: Some(invalid.to_string()),
                    groups,
                }
            }
        }
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn is_visible(&self, id: GroupId) -> bool {
        self.group(id).is_some()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.message {
            writeln!(f, "! {}", message)?;
        }
        for group in &self.groups {
            writeln!(f, "[{}]", group.id.title())?;
            let width = group.rows.iter().map(|row| row.label.len()).max().unwrap_or(0);
            for row in &group.rows {
                writeln!(f, "  {:<width$}  {}", row.label, row.value, width = width)?;
            }
        }
        Ok(())
    }
}

fn row(label: &'static str, value: String) -> Row {
    Row {
        label,
        value,
        sign: None,
    }
}

fn signed_row(label: &'static str, value: String, raw: f64) -> Row {
    Row {
        label,
        value,
        sign: Some(Sign::of(raw)),
    }
}

const SITUATION_LABELS: [&str; 4] = [
    "Current debt ratio",
    "Capacity from income",
    "Remaining own capacity",
    "Combined debt ratio",
];

fn blank_situation(fmt: &NumberFormatter) -> Group {
    Group {
        id: GroupId::Situation,
        rows: SITUATION_LABELS
            .iter()
            .map(|&label| row(label, fmt.unknown().to_string()))
            .collect(),
    }
}

fn visible_groups(r: &DerivedResult, fmt: &NumberFormatter) -> Vec<Group> {
    let flags = r.visibility;

    let mut groups = vec![
        Group {
            id: GroupId::Situation,
            rows: vec![
                row(SITUATION_LABELS[0], fmt.ratio(r.current_debt_ratio)),
                row(SITUATION_LABELS[1], fmt.currency(r.capacity_from_income.max(0.0))),
                row(SITUATION_LABELS[2], fmt.currency(r.remaining_own_capacity)),
                row(SITUATION_LABELS[3], fmt.ratio(r.combined_debt_ratio)),
            ],
        },
        Group {
            id: GroupId::Loan,
            rows: vec![
                row("Monthly payment", fmt.currency(r.monthly_payment)),
                signed_row(
                    "Remaining capacity with project",
                    fmt.currency(r.combined_capacity),
                    r.combined_capacity,
                ),
            ],
        },
    ];

    if flags.is_rental_project {
        groups.push(Group {
            id: GroupId::Rental,
            rows: vec![
                signed_row("Cash flow", fmt.currency(r.cash_flow), r.cash_flow),
                row("Gross yield", fmt.percent(r.gross_yield)),
                row("Project debt ratio", fmt.ratio(r.project_only_debt_ratio)),
                row("Rental borrowing capacity", fmt.currency(r.rental_borrowing_capacity)),
            ],
        });
    }

    if flags.show_target_price {
        groups.push(Group {
            id: GroupId::TargetPrice,
            rows: vec![
                row("Desired yield", fmt.percent(r.desired_yield)),
                row("Target price", fmt.currency(r.target_price)),
                row("Reduction to target", fmt.percent(r.target_reduction_percent.max(0.0))),
            ],
        });
    }

    if flags.is_negotiation_required {
        groups.push(Group {
            id: GroupId::Negotiation,
            rows: vec![
                row("Acceptable monthly payment", fmt.currency(r.acceptable_monthly_payment.max(0.0))),
                row("Acceptable price", fmt.currency(r.acceptable_price)),
                row("Minimum reduction", fmt.percent(r.minimum_reduction_percent.max(0.0))),
            ],
        });
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::AffordabilityCalculator;
    use crate::core::{InputField, RawInputs};

    fn reference() -> RawInputs {
        RawInputs::from_values(200000.0, 800.0, 3.5, 240.0, 3000.0, 200.0, 0.35, 0.7)
    }

    #[test]
    fn test_currency_format() {
        let fmt = NumberFormatter::new(DisplayConfig::default());
        assert_eq!(fmt.currency(1159.9194), "1 159,92 €");
        assert_eq!(fmt.currency(-359.9194), "-359,92 €");
        assert_eq!(fmt.currency(-0.001), "0,00 €");
        assert_eq!(fmt.currency(1234567.0), "1 234 567,00 €");
    }

    #[test]
    fn test_percent_format() {
        let mut display = DisplayConfig::default();
        display.decimal_separator = ".".to_string();
        display.percent_decimals = 1;
        let fmt = NumberFormatter::new(display);
        assert_eq!(fmt.percent(4.8), "4.8 %");
        assert_eq!(fmt.ratio(0.0666667), "6.7 %");
    }

    #[test]
    fn test_valid_report_groups() {
        let outcome = AffordabilityCalculator::default().calculate(&reference());
        let report = Report::build(&outcome, &EngineConfig::default());

        assert!(report.valid);
        assert!(report.is_visible(GroupId::Situation));
        assert!(report.is_visible(GroupId::Rental));
        assert!(report.is_visible(GroupId::TargetPrice));
        assert!(report.is_visible(GroupId::Negotiation));

        let cash_flow = &report.group(GroupId::Rental).unwrap().rows[0];
        assert_eq!(cash_flow.value, "-359,92 €");
        assert_eq!(cash_flow.sign, Some(Sign::Negative));
    }

    #[test]
    fn test_non_rental_hides_rental_groups() {
        let raw = reference().with(InputField::Rent, "0");
        let outcome = AffordabilityCalculator::default().calculate(&raw);
        let report = Report::build(&outcome, &EngineConfig::default());

        assert!(!report.is_visible(GroupId::Rental));
        assert!(!report.is_visible(GroupId::TargetPrice));
        assert!(report.is_visible(GroupId::Loan));
    }

    #[test]
    fn test_invalid_report_shows_blank_situation() {
        let raw = reference().with(InputField::Price, "-1");
        let outcome = AffordabilityCalculator::default().calculate(&raw);
        let report = Report::build(&outcome, &EngineConfig::default());

        assert!(!report.valid);
        assert_eq!(report.groups.len(), 1);
        assert!(report
            .group(GroupId::Situation)
            .unwrap()
            .rows
            .iter()
            .all(|row| row.value == "-"));
        assert!(report.to_string().contains("price"));
    }

    #[test]
    fn test_invalid_report_can_hide_everything() {
        let mut config = EngineConfig::default();
        config.policy.situation = SituationPolicy::HideWhenInvalid;
        let outcome = AffordabilityCalculator::default().calculate(&RawInputs::new());
        let report = Report::build(&outcome, &config);

        assert!(report.groups.is_empty());
    }
}
