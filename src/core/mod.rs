pub mod engine;
pub mod loan;
pub mod metrics;
pub mod validator;
pub mod visibility;

pub use crate::domain::model::{DerivedResult, InputField, Outcome, RawInputs, ValidInputs, Visibility};
pub use crate::domain::ports::{ConfigProvider, ResultObserver, Storage};
pub use crate::utils::error::{InvalidInput, Result};
