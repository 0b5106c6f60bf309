//! Pre-built Test Fixtures
//!
//! Ready-to-use bills and timestamps. Values are fixed so assertions can
//! compare against literals.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::BillId;
use domain_billing::{compute_total, Bill, BillContent, BillNumber, CreateBill};

use crate::builders::BillContentBuilder;

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard bill date (Jan 15, 2024 09:30 UTC)
    pub fn bill_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
    }

    /// Creation timestamp used by stored fixtures
    pub fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
    }
}

/// Fixture for bill test data
pub struct BillFixtures;

impl BillFixtures {
    /// Oil change: amount 100 plus tax 7.50, paid in cash
    pub fn oil_change_content() -> BillContent {
        BillContentBuilder::new()
            .with_customer("Somchai Jaidee", "0812345678")
            .with_item(0, "Oil change", dec!(100))
            .with_tax(0, dec!(7.50))
            .with_payment_method("cash")
            .build()
    }

    /// Oil change creation request
    pub fn oil_change() -> CreateBill {
        CreateBill::new(Self::oil_change_content())
    }

    /// Full service: every slot used, an extension and pass-through tax
    ///
    /// Total is 1000 + 200 + 350 + 50 + 70 + 14 = 1684.
    pub fn full_service_content() -> BillContent {
        BillContentBuilder::new()
            .with_customer("Suda Wongsa", "0898765432")
            .with_item(0, "Vehicle tax renewal", dec!(1000))
            .with_tax(0, dec!(70))
            .with_tax_pass_through(0, dec!(100))
            .with_item(1, "Inspection", dec!(200))
            .with_check(1, dec!(200))
            .with_item(2, "Compulsory insurance", dec!(350))
            .with_tax(2, dec!(14))
            .with_item(3, "Delivery", dec!(50))
            .with_registration(0, "1กข 1234")
            .with_reference(2, "POL-2024-0001", "policy")
            .with_extension(0, "N1", dec!(40))
            .with_payment_method("transfer")
            .with_description("Annual renewal package")
            .build()
    }

    /// A stored bill with the first bill number
    pub fn stored(id: i64) -> Bill {
        Self::stored_with_number(id, BillNumber::FIRST)
    }

    /// A stored oil-change bill carrying the given number
    pub fn stored_with_number(id: i64, bill_number: BillNumber) -> Bill {
        let mut content = Self::oil_change_content();
        content.apply_creation_defaults();

        let total = compute_total(&content).unwrap_or_default();

        Bill {
            id: BillId::new(id),
            bill_number,
            content,
            total,
            bill_date: TemporalFixtures::bill_date(),
            created_by: "staff-1".to_string(),
            created_at: TemporalFixtures::created_at(),
            updated_at: TemporalFixtures::created_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_fixture_total() {
        let bill = BillFixtures::stored(1);
        assert_eq!(bill.total, dec!(107.50));
        assert_eq!(bill.bill_number.to_string(), "1/0001");
    }

    #[test]
    fn test_full_service_is_valid() {
        let content = BillFixtures::full_service_content();
        assert!(content.validate_for_creation().is_ok());
        assert_eq!(compute_total(&content).unwrap(), dec!(1684));
    }
}
