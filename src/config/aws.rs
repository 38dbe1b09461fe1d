//! AWS SDK configuration
//!
//! This module builds AWS SDK configuration for the DynamoDB and S3 clients,
//! supporting explicit credentials and custom endpoints for local testing
//! (DynamoDB Local, LocalStack).

use aws_config::{meta::region::RegionProviderChain, BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_sdk_dynamodb::Client as DynamoDbSdkClient;
use aws_sdk_s3::Client as S3SdkClient;

use crate::config::Settings;

/// Provider name recorded against credentials taken from `DYNAMO_DB_CONFIG`.
const CONFIG_CREDENTIALS_PROVIDER: &str = "DynamoDbConfig";

/// AWS configuration builder
///
/// Creates AWS SDK configuration with support for:
/// - Region from the DynamoDB config blob, falling back to the default chain
/// - Static credentials from the config blob, falling back to the ambient
///   provider chain (env vars, instance profile, etc.)
/// - Custom endpoint URLs for local testing
pub struct AwsConfigBuilder<'a> {
    settings: &'a Settings,
}

impl<'a> AwsConfigBuilder<'a> {
    /// Create a new AWS configuration builder
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Build the base AWS SDK configuration
    ///
    /// Used as the foundation for all AWS service clients. When a DynamoDB
    /// config blob is present its region takes precedence; otherwise the
    /// default provider chain decides.
    pub async fn build_sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(db) = &self.settings.dynamodb {
            let region_provider =
                RegionProviderChain::first_try(Region::new(db.region_name.clone()))
                    .or_default_provider();
            loader = loader.region(region_provider);
        }

        loader.load().await
    }

    /// Create a DynamoDB client.
    ///
    /// With a `DYNAMO_DB_CONFIG` blob present, the client is bound to the
    /// configured endpoint and static credentials; without one it uses the
    /// ambient chain. Construction is local and performs no network I/O.
    pub async fn build_dynamodb_client(&self) -> DynamoDbSdkClient {
        let sdk_config = self.build_sdk_config().await;

        if let Some(db) = &self.settings.dynamodb {
            tracing::info!(
                region = %db.region_name,
                endpoint = %db.endpoint_url,
                "Using explicit DynamoDB connection config"
            );

            let credentials = Credentials::new(
                db.aws_access_key_id.clone(),
                db.aws_secret_access_key.clone(),
                None,
                None,
                CONFIG_CREDENTIALS_PROVIDER,
            );

            let dynamodb_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config)
                .endpoint_url(&db.endpoint_url)
                .credentials_provider(credentials)
                .build();

            DynamoDbSdkClient::from_conf(dynamodb_config)
        } else {
            DynamoDbSdkClient::new(&sdk_config)
        }
    }

    /// Create an S3 client from the ambient AWS configuration.
    ///
    /// S3 carries no custom config blob; credentials and region come from
    /// the default provider chain.
    pub async fn build_s3_client(&self) -> S3SdkClient {
        let sdk_config = self.build_sdk_config().await;
        S3SdkClient::new(&sdk_config)
    }
}

/// Build AWS SDK config from settings (convenience function)
pub async fn build_aws_config(settings: &Settings) -> SdkConfig {
    AwsConfigBuilder::new(settings).build_sdk_config().await
}

/// Create a DynamoDB client from settings (convenience function)
pub async fn create_dynamodb_client(settings: &Settings) -> DynamoDbSdkClient {
    AwsConfigBuilder::new(settings).build_dynamodb_client().await
}

/// Create an S3 client from settings (convenience function)
pub async fn create_s3_client(settings: &Settings) -> S3SdkClient {
    AwsConfigBuilder::new(settings).build_s3_client().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DynamoDbConfig;

    fn local_settings() -> Settings {
        Settings {
            dynamodb: Some(DynamoDbConfig {
                region_name: "eu-west-1".to_string(),
                endpoint_url: "http://localhost:8000".to_string(),
                aws_access_key_id: "test".to_string(),
                aws_secret_access_key: "test".to_string(),
            }),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_sdk_config_uses_configured_region() {
        let config = build_aws_config(&local_settings()).await;

        assert!(config.region().is_some());
        assert_eq!(config.region().unwrap().as_ref(), "eu-west-1");
    }

    #[tokio::test]
    async fn test_dynamodb_client_with_explicit_config() {
        let _client = create_dynamodb_client(&local_settings()).await;
        // Client created with the configured endpoint and credentials
    }

    #[tokio::test]
    async fn test_dynamodb_client_with_ambient_config() {
        let _client = create_dynamodb_client(&Settings::default()).await;
        // Client created successfully from the ambient chain
    }

    #[tokio::test]
    async fn test_s3_client_creation() {
        let _client = create_s3_client(&Settings::default()).await;
        // Client created successfully
    }
}
