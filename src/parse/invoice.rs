//! Invoice field parsing
//!
//! Invoice types, trimester periods and tax-code mapping used when pushing
//! extracted invoice data into txerpad.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unrecognized invoice type {0:?}")]
pub struct InvalidInvoiceType(String);

/// Invoice type as carried on event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceType {
    Sale,
    Purchase,
    SaleRectifying,
    PurchaseRectifying,
}

impl InvoiceType {
    pub const ALL: [InvoiceType; 4] = [
        InvoiceType::Sale,
        InvoiceType::Purchase,
        InvoiceType::SaleRectifying,
        InvoiceType::PurchaseRectifying,
    ];

    /// Wire value on event records.
    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceType::Sale => "venta",
            InvoiceType::Purchase => "compra",
            InvoiceType::SaleRectifying => "rectifica_venta",
            InvoiceType::PurchaseRectifying => "rectifica_compra",
        }
    }

    pub fn is_sale(self) -> bool {
        matches!(self, InvoiceType::Sale | InvoiceType::SaleRectifying)
    }

    pub fn is_purchase(self) -> bool {
        matches!(self, InvoiceType::Purchase | InvoiceType::PurchaseRectifying)
    }

    pub fn is_rectifying(self) -> bool {
        matches!(
            self,
            InvoiceType::SaleRectifying | InvoiceType::PurchaseRectifying
        )
    }
}

impl fmt::Display for InvoiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InvoiceType {
    type Err = InvalidInvoiceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "venta" => Ok(InvoiceType::Sale),
            "compra" => Ok(InvoiceType::Purchase),
            "rectifica_venta" => Ok(InvoiceType::SaleRectifying),
            "rectifica_compra" => Ok(InvoiceType::PurchaseRectifying),
            _ => Err(InvalidInvoiceType(s.to_string())),
        }
    }
}

/// Tax regime named on invoice lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxType {
    Iva,
    Irpf,
}

impl FromStr for TaxType {
    type Err = InvalidInvoiceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "IVA" => Ok(TaxType::Iva),
            "IRPF" => Ok(TaxType::Irpf),
            _ => Err(InvalidInvoiceType(s.to_string())),
        }
    }
}

/// Convert a trimester period ("1T".."4T") into a txerpad invoice period.
///
/// Sales periods take the year of the issue date. Purchase periods take
/// the current year, or the previous year when the named trimester has not
/// yet finished this year (purchases are booked after the trimester closes).
pub fn parse_invoice_period(
    period: &str,
    invoice_type: InvoiceType,
    issue_date: &str,
    date_format: &str,
) -> Option<String> {
    parse_invoice_period_at(
        period,
        invoice_type,
        issue_date,
        date_format,
        Utc::now().date_naive(),
    )
}

fn parse_invoice_period_at(
    period: &str,
    invoice_type: InvoiceType,
    issue_date: &str,
    date_format: &str,
    today: NaiveDate,
) -> Option<String> {
    if invoice_type.is_sale() {
        let issued = NaiveDate::parse_from_str(issue_date, date_format).ok()?;
        Some(format!("{}{}", period, issued.year()))
    } else if invoice_type.is_purchase() {
        let requested: u32 = period.replace('T', "").parse().ok()?;
        let current_trimester = (today.month() - 1) / 3;

        let year = if requested <= current_trimester {
            today.year()
        } else {
            today.year() - 1
        };
        Some(format!("{}{}", period, year))
    } else {
        None
    }
}

const IVA_SALES: &[(Decimal, &str)] = &[
    (dec!(0), "IVANOSUJETO"),
    (dec!(4), "IVAVENTASE4"),
    (dec!(10), "IVAVENTASE10"),
    (dec!(21), "IVAVENTASE21"),
];

const IVA_PURCHASES: &[(Decimal, &str)] = &[
    (dec!(0), "IVACOMPRASNOSUJETO"),
    (dec!(0.5), "IVACOMPRASRE05"),
    (dec!(1.4), "IVACOMPRASRE14"),
    (dec!(5.2), "IVACOMPRASRE52"),
    (dec!(4), "IVACOMPRASE4"),
    (dec!(10), "IVACOMPRASE10"),
    (dec!(21), "IVACOMPRASE21"),
];

const IRPF_SALES: &[(Decimal, &str)] = &[
    (dec!(1), "IRPFCUENTA1"),
    (dec!(2), "IRPFCUENTA2"),
    (dec!(7), "IRPFCUENTA7"),
    (dec!(15), "IRPFCUENTA15"),
    (dec!(19), "IRPFCUENTA19A"),
    (dec!(19.5), "IRPFCUENTA195A"),
    (dec!(20), "IRPFCUENTA20"),
    (dec!(21), "IRPFCUENTA21"),
];

const IRPF_PURCHASES: &[(Decimal, &str)] = &[
    (dec!(1), "RETIRPF1"),
    (dec!(2), "RETIRPF2"),
    (dec!(7), "RETIRPF7"),
    (dec!(15), "RETIRPF15"),
    (dec!(19), "RETIRPF19A"),
    (dec!(19.5), "RETIRPF195A"),
    (dec!(20), "RETIRPF20"),
    (dec!(21), "RETIRPF21"),
];

/// Map an invoice line's tax regime and rate to its txerpad tax code.
///
/// Returns `None` for rates outside the known tables.
pub fn parse_tax(invoice_type: InvoiceType, tax_type: TaxType, rate: Decimal) -> Option<&'static str> {
    let table = match (tax_type, invoice_type.is_sale()) {
        (TaxType::Iva, true) => IVA_SALES,
        (TaxType::Iva, false) => IVA_PURCHASES,
        (TaxType::Irpf, true) => IRPF_SALES,
        (TaxType::Irpf, false) => IRPF_PURCHASES,
    };

    table
        .iter()
        .find(|(table_rate, _)| *table_rate == rate)
        .map(|(_, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_type_round_trip() {
        for invoice_type in InvoiceType::ALL {
            assert_eq!(
                invoice_type.as_str().parse::<InvoiceType>().unwrap(),
                invoice_type
            );
        }
        assert!("donacion".parse::<InvoiceType>().is_err());
    }

    #[test]
    fn test_sale_classification() {
        assert!(InvoiceType::Sale.is_sale());
        assert!(InvoiceType::SaleRectifying.is_sale());
        assert!(!InvoiceType::Purchase.is_sale());
        assert!(InvoiceType::PurchaseRectifying.is_purchase());
        assert!(InvoiceType::SaleRectifying.is_rectifying());
        assert!(!InvoiceType::Sale.is_rectifying());
    }

    #[test]
    fn test_sale_period_uses_issue_year() {
        let today = NaiveDate::from_ymd_opt(2020, 5, 15).unwrap();
        assert_eq!(
            parse_invoice_period_at("2T", InvoiceType::Sale, "14/04/2019", "%d/%m/%Y", today),
            Some("2T2019".to_string())
        );
    }

    #[test]
    fn test_purchase_period_closed_trimester_is_current_year() {
        // In May the first trimester is closed.
        let today = NaiveDate::from_ymd_opt(2020, 5, 15).unwrap();
        assert_eq!(
            parse_invoice_period_at("1T", InvoiceType::Purchase, "14/04/2020", "%d/%m/%Y", today),
            Some("1T2020".to_string())
        );
    }

    #[test]
    fn test_purchase_period_open_trimester_is_previous_year() {
        // In May the second trimester is still running, so 2T means last year's.
        let today = NaiveDate::from_ymd_opt(2020, 5, 15).unwrap();
        assert_eq!(
            parse_invoice_period_at("2T", InvoiceType::Purchase, "14/04/2020", "%d/%m/%Y", today),
            Some("2T2019".to_string())
        );
    }

    #[test]
    fn test_sale_period_with_bad_date_is_none() {
        let today = NaiveDate::from_ymd_opt(2020, 5, 15).unwrap();
        assert_eq!(
            parse_invoice_period_at("1T", InvoiceType::Sale, "not-a-date", "%d/%m/%Y", today),
            None
        );
    }

    #[test]
    fn test_iva_sales_codes() {
        assert_eq!(
            parse_tax(InvoiceType::Sale, TaxType::Iva, dec!(21)),
            Some("IVAVENTASE21")
        );
        assert_eq!(
            parse_tax(InvoiceType::SaleRectifying, TaxType::Iva, dec!(0)),
            Some("IVANOSUJETO")
        );
    }

    #[test]
    fn test_iva_purchase_equivalence_surcharge_codes() {
        assert_eq!(
            parse_tax(InvoiceType::Purchase, TaxType::Iva, dec!(0.5)),
            Some("IVACOMPRASRE05")
        );
        assert_eq!(
            parse_tax(InvoiceType::Purchase, TaxType::Iva, dec!(5.2)),
            Some("IVACOMPRASRE52")
        );
    }

    #[test]
    fn test_irpf_codes() {
        assert_eq!(
            parse_tax(InvoiceType::Sale, TaxType::Irpf, dec!(19.5)),
            Some("IRPFCUENTA195A")
        );
        assert_eq!(
            parse_tax(InvoiceType::Purchase, TaxType::Irpf, dec!(15)),
            Some("RETIRPF15")
        );
    }

    #[test]
    fn test_unknown_rate_is_none() {
        assert_eq!(parse_tax(InvoiceType::Sale, TaxType::Iva, dec!(13)), None);
    }
}
