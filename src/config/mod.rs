//! Configuration management module
//!
//! This module handles loading and validating configuration from
//! environment variables and .env files, and building AWS SDK clients
//! from it.

pub mod aws;
pub mod settings;

pub use aws::{build_aws_config, create_dynamodb_client, create_s3_client, AwsConfigBuilder};
pub use settings::{
    require_var, var_or_default, ConfigError, DynamoDbConfig, LogLevel, Settings,
};
