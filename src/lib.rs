//! Shared AWS helpers for the invoice-event Lambdas.
//!
//! Env-driven configuration, DynamoDB and S3 wrappers, tracing + Sentry
//! initialization, and invoice field parsing.

// Public modules
pub mod config;
pub mod constants;
pub mod db;
pub mod parse;
pub mod s3;
pub mod telemetry;

// Re-export commonly used types
pub use config::{ConfigError, DynamoDbConfig, LogLevel, Settings};
pub use db::{DbError, DynamoDb};
pub use s3::{S3Error, S3Store};
pub use telemetry::{capture_error, Telemetry};
