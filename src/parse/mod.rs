//! Invoice parsing utilities
//!
//! Free-text normalization helpers shared by the extraction Lambdas.

pub mod invoice;
pub mod money;

pub use invoice::{parse_invoice_period, parse_tax, InvalidInvoiceType, InvoiceType, TaxType};
pub use money::parse_money;
