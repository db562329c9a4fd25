#![cfg(feature = "cli")]

use affordability_engine::adapters::presentation::GroupId;
use affordability_engine::core::{Outcome, ResultObserver, Storage};
use affordability_engine::{
    AffordabilityCalculator, CalculatorSession, EngineConfig, InputField, InputStore, LocalStorage,
    RawInputs, Report,
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const STORE: &str = "inputs.txt";

fn reference() -> RawInputs {
    RawInputs::from_values(200000.0, 800.0, 3.5, 240.0, 3000.0, 200.0, 0.35, 0.7)
}

fn new_session(dir: &TempDir) -> CalculatorSession<LocalStorage> {
    CalculatorSession::new(
        AffordabilityCalculator::default(),
        InputStore::new(LocalStorage::new(dir.path()), STORE),
    )
}

struct Reports(Arc<Mutex<Vec<Report>>>);

impl ResultObserver for Reports {
    fn on_result(&mut self, outcome: &Outcome) {
        self.0
            .lock()
            .unwrap()
            .push(Report::build(outcome, &EngineConfig::default()));
    }
}

#[tokio::test]
async fn test_persisted_inputs_reproduce_the_same_result() {
    let dir = TempDir::new().unwrap();

    let mut first = new_session(&dir);
    let original = first.apply(&reference()).await.unwrap().clone().unwrap();

    let mut second = new_session(&dir);
    let reloaded = second.start().await.unwrap().clone().unwrap();

    assert_eq!(second.inputs(), first.inputs());
    assert_eq!(reloaded, original);
}

#[tokio::test]
async fn test_invalid_input_is_not_persisted() {
    let dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(dir.path());

    let mut session = new_session(&dir);
    session.apply(&reference()).await.unwrap();
    let saved = storage.read_file(STORE).await.unwrap();

    let outcome = session.set_field(InputField::Price, "-1").await.unwrap();
    assert!(outcome.is_err());
    assert_eq!(storage.read_file(STORE).await.unwrap(), saved);
}

#[tokio::test]
async fn test_fresh_store_starts_blank() {
    let dir = TempDir::new().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let mut session = new_session(&dir);
    session.subscribe(Box::new(Reports(seen.clone())));
    let outcome = session.start().await.unwrap();
    assert!(outcome.is_err());
    assert!(!LocalStorage::new(dir.path()).exists(STORE).await);

    let reports = seen.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert!(!reports[0].valid);
    assert!(reports[0].is_visible(GroupId::Situation));
    assert!(!reports[0].is_visible(GroupId::Rental));
}

#[tokio::test]
async fn test_command_line_values_override_stored_ones() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(STORE),
        "price=200000\nrent=800\nrate=3.5\nterm=240\nincome=3000\ncurrentDebt=200\n",
    )
    .unwrap();

    let mut session = new_session(&dir);
    let result = session
        .start_with(&RawInputs::new().with(InputField::Rent, "0"))
        .await
        .unwrap()
        .clone()
        .unwrap();

    assert!(!result.visibility.is_rental_project);
    let stored = std::fs::read_to_string(dir.path().join(STORE)).unwrap();
    assert!(stored.contains("rent=0\n"));
}
