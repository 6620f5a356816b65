// Library target shared by the binary, benchmarks and integration tests.

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod logging;
pub mod session;
pub mod store;
pub mod ui;
