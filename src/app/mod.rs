pub mod batch;
pub mod session;
