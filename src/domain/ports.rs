use crate::domain::model::Outcome;
use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn store_path(&self) -> &str;
    fn persist_enabled(&self) -> bool;
}

/// Receives the outcome of every recomputation.
pub trait ResultObserver: Send {
    fn on_result(&mut self, outcome: &Outcome);
}
