//! Bill records
//!
//! A bill has four line-item slots. Each slot carries its own amount, tax,
//! tax pass-through ("taxgo") and check amounts alongside the descriptive
//! metadata printed next to it (car registration, reference). Two extension
//! slots hold ad-hoc surcharges.
//!
//! Only slot amounts and slot taxes make up the billed total; see
//! [`crate::total::compute_total`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::BillId;

use crate::bill_number::BillNumber;
use crate::error::BillingError;
use crate::total::{check_slot_amounts, compute_total};

/// Number of line-item slots on a bill
pub const LINE_ITEM_SLOTS: usize = 4;

/// Number of extension slots on a bill
pub const EXTENSION_SLOTS: usize = 2;

/// A reference attached to a line item (document number and its type)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub value: String,
    pub kind: String,
}

/// One line-item slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Service or product name
    pub name: String,
    /// Charged amount, counted in the total
    pub amount: Option<Decimal>,
    /// Tax amount, counted in the total
    pub tax: Option<Decimal>,
    /// Tax collected on behalf of a third party, not counted
    pub tax_pass_through: Option<Decimal>,
    /// Verification amount, not counted
    pub check: Option<Decimal>,
    pub car_registration: String,
    pub reference: Reference,
}

/// An ad-hoc surcharge, stored but never totalled
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    /// Surcharge type (e.g. "N1")
    pub label: String,
    pub amount: Option<Decimal>,
}

/// Everything on a bill a client may write
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillContent {
    pub customer_name: String,
    pub phone: String,
    pub items: [LineItem; LINE_ITEM_SLOTS],
    pub extensions: [Extension; EXTENSION_SLOTS],
    /// cash, transfer, credit_card or any other label
    pub payment_method: String,
    pub description: String,
}

impl BillContent {
    /// The mandatory first slot
    pub fn primary(&self) -> &LineItem {
        &self.items[0]
    }

    /// Checks the fields a new bill cannot go without
    ///
    /// # Errors
    ///
    /// `Validation` if the first item has no name or a missing/zero amount,
    /// or if any amount cannot be stored exactly
    pub fn validate_for_creation(&self) -> Result<(), BillingError> {
        let primary = self.primary();

        if primary.name.trim().is_empty() {
            return Err(BillingError::validation("name1 is required"));
        }

        match primary.amount {
            Some(amount) if !amount.is_zero() => {}
            _ => return Err(BillingError::validation("amount1 is required and must be non-zero")),
        }

        self.validate_amounts()
    }

    /// Checks every present amount against the storable scale and range
    pub fn validate_amounts(&self) -> Result<(), BillingError> {
        check_slot_amounts(
            self.items
                .iter()
                .map(|item| [item.amount, item.tax, item.tax_pass_through, item.check]),
            self.extensions.iter().map(|extension| extension.amount),
        )
    }

    /// Fills the optional numbers downstream consumers expect to be present
    ///
    /// Second-slot amount, first-slot tax and first-slot tax pass-through
    /// become zero when unset.
    pub fn apply_creation_defaults(&mut self) {
        self.items[1].amount.get_or_insert(Decimal::ZERO);
        self.items[0].tax.get_or_insert(Decimal::ZERO);
        self.items[0].tax_pass_through.get_or_insert(Decimal::ZERO);
    }
}

/// A persisted bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub bill_number: BillNumber,
    pub content: BillContent,
    /// Sum of slot amounts and slot taxes
    pub total: Decimal,
    /// Business date printed on the bill
    pub bill_date: DateTime<Utc>,
    /// Identity of the authenticated caller that created the bill
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    /// Recomputes the total from the current content
    ///
    /// # Errors
    ///
    /// `Validation` if the total falls outside the storable range; the
    /// stored total is left unchanged
    pub fn recalculate_total(&mut self) -> Result<(), BillingError> {
        self.total = compute_total(&self.content)?;
        Ok(())
    }

    /// Marks the bill as modified now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A bill ready to be inserted, before the store assigns its key
#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    pub bill_number: BillNumber,
    pub content: BillContent,
    pub total: Decimal,
    pub bill_date: DateTime<Utc>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewBill {
    /// Attaches the store-assigned key
    pub fn into_bill(self, id: BillId) -> Bill {
        Bill {
            id,
            bill_number: self.bill_number,
            content: self.content,
            total: self.total,
            bill_date: self.bill_date,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Input for creating a bill
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateBill {
    pub content: BillContent,
    /// Defaults to the creation time
    pub bill_date: Option<DateTime<Utc>>,
}

impl CreateBill {
    pub fn new(content: BillContent) -> Self {
        Self { content, bill_date: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn content(name: &str, amount: Option<Decimal>) -> BillContent {
        let mut content = BillContent::default();
        content.items[0].name = name.to_string();
        content.items[0].amount = amount;
        content
    }

    #[test]
    fn test_validate_accepts_named_nonzero_primary() {
        assert!(content("Oil change", Some(dec!(450))).validate_for_creation().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let err = content("  ", Some(dec!(450))).validate_for_creation().unwrap_err();
        assert!(matches!(err, BillingError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_zero_or_missing_amount() {
        assert!(content("Oil change", Some(Decimal::ZERO)).validate_for_creation().is_err());
        assert!(content("Oil change", None).validate_for_creation().is_err());
    }

    #[test]
    fn test_validate_rejects_amounts_that_would_be_rounded_or_overflow() {
        let mut sub_cent = content("Oil change", Some(dec!(450)));
        sub_cent.items[1].tax = Some(dec!(0.005));
        let err = sub_cent.validate_for_creation().unwrap_err();
        assert!(err.to_string().contains("tax2"));

        let mut huge = content("Oil change", Some(dec!(450)));
        huge.extensions[1].amount = Some(Decimal::new(1_000_000_000_000, 0));
        let err = huge.validate_for_creation().unwrap_err();
        assert!(err.to_string().contains("extension4"));

        let huge_primary = content("Oil change", Some(Decimal::new(7_000_000_000_000, 0)));
        assert!(matches!(
            huge_primary.validate_for_creation(),
            Err(BillingError::Validation(_))
        ));
    }

    #[test]
    fn test_creation_defaults_only_fill_unset() {
        let mut content = content("Oil change", Some(dec!(450)));
        content.items[0].tax = Some(dec!(31.5));
        content.apply_creation_defaults();

        assert_eq!(content.items[1].amount, Some(Decimal::ZERO));
        assert_eq!(content.items[0].tax, Some(dec!(31.5)));
        assert_eq!(content.items[0].tax_pass_through, Some(Decimal::ZERO));
        assert_eq!(content.items[2].amount, None);
        assert_eq!(content.items[1].tax, None);
    }
}
