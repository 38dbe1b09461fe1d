//! DynamoDB client wrapper
//!
//! Thin pass-through operations over the AWS DynamoDB SDK client, plus the
//! event-log helpers used by the invoice-processing Lambdas. SDK failures
//! are surfaced as-is inside [`DbError`]; there is no retry or backoff here,
//! the SDK owns that.

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbSdkClient;
use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{create_dynamodb_client, Settings};
use crate::db::attr::{self, AttrError};
use crate::telemetry;

/// Errors from the DynamoDB wrapper operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// The SDK call failed; the message carries the full error context.
    #[error("DynamoDB error: {0}")]
    Sdk(String),

    #[error("attribute conversion failed: {0}")]
    Convert(#[from] AttrError),

    #[error("{0} must be a JSON object")]
    NotAnObject(&'static str),
}

impl DbError {
    fn sdk(err: impl std::error::Error) -> Self {
        DbError::Sdk(DisplayErrorContext(&err).to_string())
    }
}

/// DynamoDB client wrapper.
///
/// Construct one per process (or per explicit config) and reuse it; the
/// underlying SDK client pools connections internally.
#[derive(Clone)]
pub struct DynamoDb {
    client: DynamoDbSdkClient,
}

impl DynamoDb {
    /// Wrap an existing SDK client.
    pub fn new(client: DynamoDbSdkClient) -> Self {
        Self { client }
    }

    /// Build a wrapper from settings (honors `DYNAMO_DB_CONFIG`).
    pub async fn connect(settings: &Settings) -> Self {
        Self::new(create_dynamodb_client(settings).await)
    }

    /// Access the underlying SDK client for operations not wrapped here.
    pub fn client(&self) -> &DynamoDbSdkClient {
        &self.client
    }

    /// Fetch an item by primary key. `key` is a JSON object mapping key
    /// attribute names to values.
    pub async fn get_item(
        &self,
        table: &str,
        key: &Value,
    ) -> Result<Option<Map<String, Value>>, DbError> {
        let key = json_object(key, "key")?;

        let result = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(attr::to_item(key)))
            .send()
            .await
            .map_err(DbError::sdk)?;

        match result.item {
            Some(item) => Ok(Some(attr::from_item(&item)?)),
            None => Ok(None),
        }
    }

    /// Store an item. `item` is a JSON object holding the full record.
    pub async fn put_item(&self, table: &str, item: &Value) -> Result<(), DbError> {
        let item = json_object(item, "item")?;

        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(attr::to_item(item)))
            .send()
            .await
            .map_err(DbError::sdk)?;

        Ok(())
    }

    /// Check whether a record with the given primary key exists.
    pub async fn record_exists(&self, table: &str, key: &Value) -> Result<bool, DbError> {
        Ok(self.get_item(table, key).await?.is_some())
    }

    /// Query items by key condition, following pagination to the end.
    ///
    /// `values` is a JSON object mapping `:placeholder` names used in the
    /// condition to their values.
    pub async fn query_items(
        &self,
        table: &str,
        key_condition: &str,
        values: &Value,
    ) -> Result<Vec<Map<String, Value>>, DbError> {
        let values = json_object(values, "values")?;

        let mut stream = self
            .client
            .query()
            .table_name(table)
            .key_condition_expression(key_condition)
            .set_expression_attribute_values(Some(attr::to_item(values)))
            .into_paginator()
            .items()
            .send();

        let mut items = Vec::new();
        while let Some(item) = stream.next().await {
            let item = item.map_err(DbError::sdk)?;
            items.push(attr::from_item(&item)?);
        }
        Ok(items)
    }

    /// Scan a table, optionally filtered, following pagination to the end.
    pub async fn scan_items(
        &self,
        table: &str,
        filter: Option<&str>,
        values: Option<&Value>,
    ) -> Result<Vec<Map<String, Value>>, DbError> {
        let values = match values {
            Some(values) => Some(attr::to_item(json_object(values, "values")?)),
            None => None,
        };

        let mut stream = self
            .client
            .scan()
            .table_name(table)
            .set_filter_expression(filter.map(String::from))
            .set_expression_attribute_values(values)
            .into_paginator()
            .items()
            .send();

        let mut items = Vec::new();
        while let Some(item) = stream.next().await {
            let item = item.map_err(DbError::sdk)?;
            items.push(attr::from_item(&item)?);
        }
        Ok(items)
    }

    /// Append an entry to the `log_messages` list of an event record.
    ///
    /// Best-effort by contract: a missing table/identifier/payload or a
    /// failed write is logged (and reported to Sentry) but never returned
    /// to the caller, so event logging can not break request processing.
    pub async fn append_event_log(
        &self,
        table: &str,
        identifier: &str,
        description: &str,
        payload: &Value,
    ) {
        if table.is_empty() || identifier.is_empty() || payload_is_empty(payload) {
            tracing::error!(
                table,
                identifier,
                %payload,
                "Event logging impossible due to empty value"
            );
            return;
        }

        let entry = AttributeValue::M(
            [
                (
                    "datetime".to_string(),
                    AttributeValue::S(Utc::now().to_rfc3339()),
                ),
                (
                    "description".to_string(),
                    AttributeValue::S(description.to_string()),
                ),
                (
                    "log_object".to_string(),
                    AttributeValue::S(payload.to_string()),
                ),
            ]
            .into(),
        );

        let result = self
            .client
            .update_item()
            .table_name(table)
            .key("identifier", AttributeValue::S(identifier.to_string()))
            .update_expression(
                "SET log_messages = list_append(if_not_exists(log_messages, :empty_list), :add_value)",
            )
            .expression_attribute_values(":empty_list", AttributeValue::L(Vec::new()))
            .expression_attribute_values(":add_value", AttributeValue::L(vec![entry]))
            .send()
            .await;

        if let Err(err) = result {
            tracing::error!(
                table,
                identifier,
                description,
                error = %DisplayErrorContext(&err),
                "Error logging event to db"
            );
            telemetry::capture_error(&err);
        }
    }

    /// Update an event record's processing outcome.
    ///
    /// Sets `message`, `status` and `processed_at`; `None` clears the
    /// corresponding attribute.
    pub async fn update_event(
        &self,
        table: &str,
        identifier: &str,
        status: Option<&str>,
        message: Option<&str>,
    ) -> Result<(), DbError> {
        self.client
            .update_item()
            .table_name(table)
            .key("identifier", AttributeValue::S(identifier.to_string()))
            .update_expression("SET message = :errorMessage, #st = :eventStatus, processed_at = :ts")
            .expression_attribute_names("#st", "status")
            .expression_attribute_values(":errorMessage", optional_string(message))
            .expression_attribute_values(":eventStatus", optional_string(status))
            .expression_attribute_values(":ts", AttributeValue::S(Utc::now().to_rfc3339()))
            .send()
            .await
            .map_err(DbError::sdk)?;

        Ok(())
    }
}

/// A payload that would log nothing: null, `""`, `{}` or `[]`.
fn payload_is_empty(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

fn optional_string(value: Option<&str>) -> AttributeValue {
    match value {
        Some(s) => AttributeValue::S(s.to_string()),
        None => AttributeValue::Null(true),
    }
}

fn json_object<'a>(
    value: &'a Value,
    what: &'static str,
) -> Result<&'a Map<String, Value>, DbError> {
    value.as_object().ok_or(DbError::NotAnObject(what))
}
