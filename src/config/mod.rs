//! Application configuration.
//!
//! `AppConfig` is built once in `run` from defaults and the environment, then
//! passed by reference. Nothing here changes after startup.

pub mod app;

pub use app::AppConfig;
