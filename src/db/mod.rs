//! Database module
//!
//! DynamoDB wrapper and JSON ⇄ attribute conversion.

pub mod attr;
pub mod dynamodb;

pub use attr::{from_attribute_value, from_item, to_attribute_value, to_item, AttrError};
pub use dynamodb::{DbError, DynamoDb};
