//! Names of the environment variables this crate reads.
//!
//! Lambdas that compose these helpers set the variables in their deployment
//! templates; the names live here so every consumer agrees on them.

/// Logging severity, one of `DEBUG`, `INFO`, `WARNING`, `ERROR`, `CRITICAL`.
pub const LOGGING_LEVEL_VAR: &str = "LOGGING_LEVEL";

/// Sentry DSN for error reporting. Unset disables Sentry.
pub const SENTRY_DSN_VAR: &str = "SENTRY_DSN";

/// JSON object with DynamoDB connection parameters (`region_name`,
/// `endpoint_url`, `aws_access_key_id`, `aws_secret_access_key`).
/// Unset falls back to the ambient AWS credential/region chain.
pub const DYNAMO_DB_CONFIG_VAR: &str = "DYNAMO_DB_CONFIG";
