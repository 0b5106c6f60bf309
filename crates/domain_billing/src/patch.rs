//! Partial bill updates
//!
//! A patch names only the fields a client sent. Merging follows a
//! presence rule: a text field overwrites only when the incoming value is
//! non-empty, a numeric field overwrites only when a value is present. A
//! field therefore cannot be cleared through a patch, only replaced.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::bill::{Bill, BillContent, Extension, LineItem, EXTENSION_SLOTS, LINE_ITEM_SLOTS};
use crate::error::BillingError;
use crate::total::check_slot_amounts;

/// Incoming changes for one line-item slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineItemPatch {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub tax_pass_through: Option<Decimal>,
    pub check: Option<Decimal>,
    pub car_registration: Option<String>,
    pub reference_value: Option<String>,
    pub reference_kind: Option<String>,
}

/// Incoming changes for one extension slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionPatch {
    pub label: Option<String>,
    pub amount: Option<Decimal>,
}

/// Incoming changes for a whole bill
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillPatch {
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub items: [LineItemPatch; LINE_ITEM_SLOTS],
    pub extensions: [ExtensionPatch; EXTENSION_SLOTS],
    pub payment_method: Option<String>,
    pub description: Option<String>,
    pub bill_date: Option<DateTime<Utc>>,
}

impl BillPatch {
    /// Rejects changes that would break a bill's creation invariants
    ///
    /// A first-slot amount sent as zero is an error, not a skipped field:
    /// only an absent `amount1` leaves the stored value in place.
    ///
    /// # Errors
    ///
    /// `Validation` if the first-slot amount is sent as zero, or if any
    /// sent amount cannot be stored exactly
    pub fn validate(&self) -> Result<(), BillingError> {
        if matches!(self.items[0].amount, Some(amount) if amount.is_zero()) {
            return Err(BillingError::validation("amount1 must be non-zero"));
        }

        check_slot_amounts(
            self.items
                .iter()
                .map(|item| [item.amount, item.tax, item.tax_pass_through, item.check]),
            self.extensions.iter().map(|extension| extension.amount),
        )
    }

    /// Merges the patch into a stored bill
    ///
    /// Does not recompute the total or touch timestamps; the service does
    /// that once the merge is complete.
    pub fn apply_to(&self, bill: &mut Bill) {
        self.apply_to_content(&mut bill.content);
        if let Some(date) = self.bill_date {
            bill.bill_date = date;
        }
    }

    /// Merges the patch into bill content
    pub fn apply_to_content(&self, content: &mut BillContent) {
        merge_text(&mut content.customer_name, &self.customer_name);
        merge_text(&mut content.phone, &self.phone);

        for (item, patch) in content.items.iter_mut().zip(&self.items) {
            patch.apply(item);
        }
        for (extension, patch) in content.extensions.iter_mut().zip(&self.extensions) {
            patch.apply(extension);
        }

        merge_text(&mut content.payment_method, &self.payment_method);
        merge_text(&mut content.description, &self.description);
    }
}

impl LineItemPatch {
    fn apply(&self, item: &mut LineItem) {
        merge_text(&mut item.name, &self.name);
        merge_amount(&mut item.amount, self.amount);
        merge_amount(&mut item.tax, self.tax);
        merge_amount(&mut item.tax_pass_through, self.tax_pass_through);
        merge_amount(&mut item.check, self.check);
        merge_text(&mut item.car_registration, &self.car_registration);
        merge_text(&mut item.reference.value, &self.reference_value);
        merge_text(&mut item.reference.kind, &self.reference_kind);
    }
}

impl ExtensionPatch {
    fn apply(&self, extension: &mut Extension) {
        merge_text(&mut extension.label, &self.label);
        merge_amount(&mut extension.amount, self.amount);
    }
}

fn merge_text(target: &mut String, incoming: &Option<String>) {
    if let Some(value) = incoming {
        if !value.is_empty() {
            target.clone_from(value);
        }
    }
}

fn merge_amount(target: &mut Option<Decimal>, incoming: Option<Decimal>) {
    if incoming.is_some() {
        *target = incoming;
    }
}
