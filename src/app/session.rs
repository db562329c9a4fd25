use crate::adapters::persistence::InputStore;
use crate::core::engine::AffordabilityCalculator;
use crate::core::{ConfigProvider, InputField, Outcome, RawInputs, ResultObserver, Storage};
use crate::utils::error::Result;

/// Owns the current input snapshot and drives recomputation.
///
/// Every change recomputes from scratch, notifies the observers and, when the
/// outcome is valid, writes the inputs back to the store.
pub struct CalculatorSession<S: Storage> {
    calculator: AffordabilityCalculator,
    store: InputStore<S>,
    persist: bool,
    inputs: RawInputs,
    observers: Vec<Box<dyn ResultObserver>>,
    last: Option<Outcome>,
}

impl<S: Storage> CalculatorSession<S> {
    pub fn new(calculator: AffordabilityCalculator, store: InputStore<S>) -> Self {
        Self {
            calculator,
            store,
            persist: true,
            inputs: RawInputs::new(),
            observers: Vec::new(),
            last: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(
        calculator: AffordabilityCalculator,
        storage: S,
        config: &C,
    ) -> Self {
        let mut session = Self::new(calculator, InputStore::new(storage, config.store_path()));
        session.persist = config.persist_enabled();
        session
    }

    pub fn subscribe(&mut self, observer: Box<dyn ResultObserver>) {
        self.observers.push(observer);
    }

    pub fn inputs(&self) -> &RawInputs {
        &self.inputs
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last.as_ref()
    }

    /// Loads the stored inputs and computes once.
    pub async fn start(&mut self) -> Result<&Outcome> {
        self.start_with(&RawInputs::new()).await
    }

    /// Loads the stored inputs, lays `overrides` on top and computes once.
    pub async fn start_with(&mut self, overrides: &RawInputs) -> Result<&Outcome> {
        self.inputs = self.store.load().await?;
        self.inputs.merge(overrides);
        self.recompute().await
    }

    pub async fn set_field(&mut self, field: InputField, value: impl Into<String>) -> Result<&Outcome> {
        self.inputs.set(field, value);
        self.recompute().await
    }

    /// Applies several changes as a single event.
    pub async fn apply(&mut self, changes: &RawInputs) -> Result<&Outcome> {
        self.inputs.merge(changes);
        self.recompute().await
    }

    async fn recompute(&mut self) -> Result<&Outcome> {
        let outcome = self.calculator.calculate(&self.inputs);

        match &outcome {
            Ok(result) => tracing::debug!(
                "Recomputed: payment {:.2}, rental {}, negotiation {}",
                result.monthly_payment,
                result.visibility.is_rental_project,
                result.visibility.is_negotiation_required
            ),
            Err(invalid) => tracing::debug!("Inputs not usable: {}", invalid),
        }

        // observers and last_outcome() see the same outcome even if the save below fails
        let outcome = self.last.insert(outcome);
        for observer in &mut self.observers {
            observer.on_result(outcome);
        }

        if outcome.is_ok() && self.persist {
            self.store.save(&self.inputs).await?;
        }

        Ok(outcome)
    }
}
