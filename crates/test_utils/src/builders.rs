//! Test Data Builders
//!
//! Builder for bill content. Tests set only the slots they care about; the
//! defaults produce a valid bill with a single line item.

use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_billing::{BillContent, CreateBill};

/// Builder for constructing bill content
#[derive(Debug, Clone)]
pub struct BillContentBuilder {
    content: BillContent,
}

impl Default for BillContentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BillContentBuilder {
    /// Creates a builder with one 100.00 line item
    pub fn new() -> Self {
        let mut content = BillContent::default();
        content.customer_name = "Test Customer".to_string();
        content.phone = "0800000000".to_string();
        content.items[0].name = "Service".to_string();
        content.items[0].amount = Some(dec!(100));
        content.payment_method = "cash".to_string();
        Self { content }
    }

    /// Creates a builder with a generated customer name and phone
    pub fn random() -> Self {
        let name: String = Name().fake();
        let phone: String = PhoneNumber().fake();
        Self::new().with_customer(name, phone)
    }

    /// Starts from empty content, with no line items at all
    pub fn empty() -> Self {
        Self {
            content: BillContent::default(),
        }
    }

    pub fn with_customer(mut self, name: impl Into<String>, phone: impl Into<String>) -> Self {
        self.content.customer_name = name.into();
        self.content.phone = phone.into();
        self
    }

    /// Sets the name and amount of a line item slot (0-based)
    pub fn with_item(mut self, slot: usize, name: impl Into<String>, amount: Decimal) -> Self {
        self.content.items[slot].name = name.into();
        self.content.items[slot].amount = Some(amount);
        self
    }

    /// Clears a slot's amount
    pub fn without_amount(mut self, slot: usize) -> Self {
        self.content.items[slot].amount = None;
        self
    }

    pub fn with_tax(mut self, slot: usize, tax: Decimal) -> Self {
        self.content.items[slot].tax = Some(tax);
        self
    }

    pub fn with_tax_pass_through(mut self, slot: usize, amount: Decimal) -> Self {
        self.content.items[slot].tax_pass_through = Some(amount);
        self
    }

    pub fn with_check(mut self, slot: usize, amount: Decimal) -> Self {
        self.content.items[slot].check = Some(amount);
        self
    }

    pub fn with_registration(mut self, slot: usize, registration: impl Into<String>) -> Self {
        self.content.items[slot].car_registration = registration.into();
        self
    }

    pub fn with_reference(
        mut self,
        slot: usize,
        value: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        self.content.items[slot].reference.value = value.into();
        self.content.items[slot].reference.kind = kind.into();
        self
    }

    pub fn with_extension(mut self, slot: usize, label: impl Into<String>, amount: Decimal) -> Self {
        self.content.extensions[slot].label = label.into();
        self.content.extensions[slot].amount = Some(amount);
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.content.payment_method = method.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.content.description = description.into();
        self
    }

    pub fn build(self) -> BillContent {
        self.content
    }

    /// Builds a creation request from the content
    pub fn build_request(self) -> CreateBill {
        CreateBill::new(self.content)
    }
}
