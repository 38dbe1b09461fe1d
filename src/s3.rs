//! S3 client wrapper
//!
//! Thin pass-through operations for object storage. The client uses the
//! ambient AWS credential/region chain; there is no custom S3 config blob.

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3SdkClient;
use thiserror::Error;

use crate::config::{create_s3_client, Settings};

/// Errors from the S3 wrapper operations.
#[derive(Debug, Error)]
pub enum S3Error {
    /// The SDK call failed; the message carries the full error context.
    #[error("S3 error: {0}")]
    Sdk(String),

    /// The object body stream could not be read to the end.
    #[error("S3 body read failed: {0}")]
    Body(String),
}

impl S3Error {
    fn sdk(err: impl std::error::Error) -> Self {
        S3Error::Sdk(DisplayErrorContext(&err).to_string())
    }
}

/// S3 client wrapper.
#[derive(Clone)]
pub struct S3Store {
    client: S3SdkClient,
}

impl S3Store {
    /// Wrap an existing SDK client.
    pub fn new(client: S3SdkClient) -> Self {
        Self { client }
    }

    /// Build a wrapper from settings.
    pub async fn connect(settings: &Settings) -> Self {
        Self::new(create_s3_client(settings).await)
    }

    /// Access the underlying SDK client for operations not wrapped here.
    pub fn client(&self) -> &S3SdkClient {
        &self.client
    }

    /// Download an object and return its full body.
    pub async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, S3Error> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(S3Error::sdk)?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| S3Error::Body(e.to_string()))?;

        Ok(body.into_bytes().to_vec())
    }

    /// Upload an object.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<(), S3Error> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(S3Error::sdk)?;

        Ok(())
    }

    /// List object keys under a prefix, following pagination to the end.
    pub async fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<String>, S3Error> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .set_prefix(prefix.map(String::from))
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(S3Error::sdk)?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(String::from)),
            );
        }
        Ok(keys)
    }
}
