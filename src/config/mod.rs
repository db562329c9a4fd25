#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use crate::core::{ConfigProvider, InputField, RawInputs};
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "affordability")]
    #[command(about = "Loan, debt ratio and rental yield check for a property purchase")]
    pub struct CliConfig {
        #[arg(long, allow_hyphen_values = true, help = "Purchase price, e.g. 200000 or '200 000'")]
        pub price: Option<String>,

        #[arg(long, allow_hyphen_values = true, help = "Monthly rent, 0 if not rented out")]
        pub rent: Option<String>,

        #[arg(long, allow_hyphen_values = true, help = "Nominal annual interest rate in percent")]
        pub rate: Option<String>,

        #[arg(long, allow_hyphen_values = true, help = "Loan duration in months")]
        pub term: Option<String>,

        #[arg(long, allow_hyphen_values = true, help = "Monthly net income")]
        pub income: Option<String>,

        #[arg(long, allow_hyphen_values = true, help = "Existing monthly debt payments")]
        pub current_debt: Option<String>,

        #[arg(long, allow_hyphen_values = true, help = "Acceptable debt ratio, e.g. 0.35")]
        pub max_debt_ratio: Option<String>,

        #[arg(long, allow_hyphen_values = true, help = "Share of rent counted by lenders, e.g. 0.7")]
        pub rent_inclusion_ratio: Option<String>,

        #[arg(long, short, help = "Path to a TOML engine configuration")]
        pub config: Option<String>,

        #[arg(long, default_value = "affordability-inputs.txt")]
        pub store: String,

        #[arg(long, help = "Do not write the inputs back to the store")]
        pub no_save: bool,

        #[arg(long, help = "Print the result as JSON")]
        pub json: bool,

        #[arg(long, short, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        /// Values given on the command line; they override the stored ones.
        pub fn overrides(&self) -> RawInputs {
            let given = [
                (InputField::Price, &self.price),
                (InputField::Rent, &self.rent),
                (InputField::Rate, &self.rate),
                (InputField::Term, &self.term),
                (InputField::Income, &self.income),
                (InputField::CurrentDebt, &self.current_debt),
                (InputField::MaxDebtRatio, &self.max_debt_ratio),
                (InputField::RentInclusionRatio, &self.rent_inclusion_ratio),
            ];

            let mut raw = RawInputs::new();
            for (field, value) in given {
                if let Some(value) = value {
                    raw.set(field, value.clone());
                }
            }
            raw
        }
    }

    impl ConfigProvider for CliConfig {
        fn store_path(&self) -> &str {
            &self.store
        }

        fn persist_enabled(&self) -> bool {
            !self.no_save
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_path("store", &self.store)?;
            if let Some(config) = &self.config {
                validation::validate_path("config", config)?;
            }
            Ok(())
        }
    }

}
