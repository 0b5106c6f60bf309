//! Bill DTOs
//!
//! The wire format keeps the flat field names the billing clients send:
//! slot fields are numbered `name1..4`, `amount1..4` and so on, and the two
//! extension slots are spread over `extension1..4` (odd numbers hold the
//! label, even numbers the amount). Amounts travel as JSON numbers and unset
//! amounts are left out of responses.
//!
//! Clients cannot set `bill_number` or `total`; unknown fields are ignored.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::BillId;
use domain_billing::{Bill, BillContent, BillPatch, CreateBill, ExtensionPatch, LineItemPatch};

/// Request body for creating or updating a bill
///
/// On create every absent field starts out empty. On update absent or empty
/// text and absent amounts leave the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct BillRequest {
    #[validate(length(max = 255))]
    pub username: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[validate(length(max = 255))]
    pub name1: Option<String>,
    #[validate(length(max = 255))]
    pub name2: Option<String>,
    #[validate(length(max = 255))]
    pub name3: Option<String>,
    #[validate(length(max = 255))]
    pub name4: Option<String>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount1: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount2: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount3: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount4: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub tax1: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub tax2: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub tax3: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub tax4: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub taxgo1: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub taxgo2: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub taxgo3: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub taxgo4: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub check1: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub check2: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub check3: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub check4: Option<Decimal>,

    #[validate(length(max = 255))]
    pub extension1: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub extension2: Option<Decimal>,
    #[validate(length(max = 255))]
    pub extension3: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub extension4: Option<Decimal>,

    pub refer1: Option<String>,
    pub refer2: Option<String>,
    pub refer3: Option<String>,
    pub refer4: Option<String>,

    pub typerefer1: Option<String>,
    pub typerefer2: Option<String>,
    pub typerefer3: Option<String>,
    pub typerefer4: Option<String>,

    #[validate(length(max = 32))]
    pub car_registration1: Option<String>,
    #[validate(length(max = 32))]
    pub car_registration2: Option<String>,
    #[validate(length(max = 32))]
    pub car_registration3: Option<String>,
    #[validate(length(max = 32))]
    pub car_registration4: Option<String>,

    #[validate(length(max = 64))]
    pub payment_method: Option<String>,
    pub description: Option<String>,

    /// Business date of the bill
    pub date: Option<DateTime<Utc>>,
}

impl BillRequest {
    /// Converts the request into a partial update
    pub fn into_patch(self) -> BillPatch {
        BillPatch {
            customer_name: self.username,
            phone: self.phone,
            items: [
                LineItemPatch {
                    name: self.name1,
                    amount: self.amount1,
                    tax: self.tax1,
                    tax_pass_through: self.taxgo1,
                    check: self.check1,
                    car_registration: self.car_registration1,
                    reference_value: self.refer1,
                    reference_kind: self.typerefer1,
                },
                LineItemPatch {
                    name: self.name2,
                    amount: self.amount2,
                    tax: self.tax2,
                    tax_pass_through: self.taxgo2,
                    check: self.check2,
                    car_registration: self.car_registration2,
                    reference_value: self.refer2,
                    reference_kind: self.typerefer2,
                },
                LineItemPatch {
                    name: self.name3,
                    amount: self.amount3,
                    tax: self.tax3,
                    tax_pass_through: self.taxgo3,
                    check: self.check3,
                    car_registration: self.car_registration3,
                    reference_value: self.refer3,
                    reference_kind: self.typerefer3,
                },
                LineItemPatch {
                    name: self.name4,
                    amount: self.amount4,
                    tax: self.tax4,
                    tax_pass_through: self.taxgo4,
                    check: self.check4,
                    car_registration: self.car_registration4,
                    reference_value: self.refer4,
                    reference_kind: self.typerefer4,
                },
            ],
            extensions: [
                ExtensionPatch {
                    label: self.extension1,
                    amount: self.extension2,
                },
                ExtensionPatch {
                    label: self.extension3,
                    amount: self.extension4,
                },
            ],
            payment_method: self.payment_method,
            description: self.description,
            bill_date: self.date,
        }
    }

    /// Converts the request into a creation command
    pub fn into_create(self) -> CreateBill {
        let patch = self.into_patch();
        let mut content = BillContent::default();
        patch.apply_to_content(&mut content);

        CreateBill {
            content,
            bill_date: patch.bill_date,
        }
    }
}

/// Summary returned after a bill is created
#[derive(Debug, Serialize)]
pub struct BillCreatedResponse {
    pub id: BillId,
    pub bill_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Bill> for BillCreatedResponse {
    fn from(bill: &Bill) -> Self {
        Self {
            id: bill.id,
            bill_number: bill.bill_number.to_string(),
            total: bill.total,
            created_by: bill.created_by.clone(),
            created_at: bill.created_at,
        }
    }
}

/// Full bill representation
#[derive(Debug, Serialize)]
pub struct BillResponse {
    pub id: BillId,
    pub bill_number: String,
    pub username: String,
    pub phone: String,

    pub name1: String,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub amount1: Option<Decimal>,
    pub name2: String,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub amount2: Option<Decimal>,
    pub name3: String,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub amount3: Option<Decimal>,
    pub name4: String,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub amount4: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub tax1: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub tax2: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub tax3: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub tax4: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub taxgo1: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub taxgo2: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub taxgo3: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub taxgo4: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub check1: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub check2: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub check3: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub check4: Option<Decimal>,

    pub extension1: String,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub extension2: Option<Decimal>,
    pub extension3: String,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub extension4: Option<Decimal>,

    pub refer1: String,
    pub refer2: String,
    pub refer3: String,
    pub refer4: String,

    pub typerefer1: String,
    pub typerefer2: String,
    pub typerefer3: String,
    pub typerefer4: String,

    pub car_registration1: String,
    pub car_registration2: String,
    pub car_registration3: String,
    pub car_registration4: String,

    pub payment_method: String,
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Bill> for BillResponse {
    fn from(bill: &Bill) -> Self {
        let content = &bill.content;
        let [i1, i2, i3, i4] = &content.items;
        let [e1, e2] = &content.extensions;

        Self {
            id: bill.id,
            bill_number: bill.bill_number.to_string(),
            username: content.customer_name.clone(),
            phone: content.phone.clone(),

            name1: i1.name.clone(),
            amount1: i1.amount,
            name2: i2.name.clone(),
            amount2: i2.amount,
            name3: i3.name.clone(),
            amount3: i3.amount,
            name4: i4.name.clone(),
            amount4: i4.amount,

            tax1: i1.tax,
            tax2: i2.tax,
            tax3: i3.tax,
            tax4: i4.tax,

            taxgo1: i1.tax_pass_through,
            taxgo2: i2.tax_pass_through,
            taxgo3: i3.tax_pass_through,
            taxgo4: i4.tax_pass_through,

            check1: i1.check,
            check2: i2.check,
            check3: i3.check,
            check4: i4.check,

            extension1: e1.label.clone(),
            extension2: e1.amount,
            extension3: e2.label.clone(),
            extension4: e2.amount,

            refer1: i1.reference.value.clone(),
            refer2: i2.reference.value.clone(),
            refer3: i3.reference.value.clone(),
            refer4: i4.reference.value.clone(),

            typerefer1: i1.reference.kind.clone(),
            typerefer2: i2.reference.kind.clone(),
            typerefer3: i3.reference.kind.clone(),
            typerefer4: i4.reference.kind.clone(),

            car_registration1: i1.car_registration.clone(),
            car_registration2: i2.car_registration.clone(),
            car_registration3: i3.car_registration.clone(),
            car_registration4: i4.car_registration.clone(),

            payment_method: content.payment_method.clone(),
            description: content.description.clone(),
            date: bill.bill_date,
            total: bill.total,
            created_by: bill.created_by.clone(),
            created_at: bill.created_at,
            updated_at: bill.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_request_maps_numbered_fields_to_slots() {
        let request: BillRequest = serde_json::from_value(json!({
            "username": "Somchai",
            "name1": "Oil change",
            "amount1": 100,
            "tax1": 7.5,
            "taxgo3": 40,
            "extension1": "N1",
            "extension2": 15,
            "extension3": "N2",
            "refer2": "INV-7",
            "typerefer2": "invoice",
            "total": 999999,
            "bill_number": "9/9999"
        }))
        .unwrap();

        let create = request.into_create();
        let content = &create.content;
        assert_eq!(content.customer_name, "Somchai");
        assert_eq!(content.items[0].name, "Oil change");
        assert_eq!(content.items[0].amount, Some(dec!(100)));
        assert_eq!(content.items[0].tax, Some(dec!(7.5)));
        assert_eq!(content.items[2].tax_pass_through, Some(dec!(40)));
        assert_eq!(content.items[1].reference.value, "INV-7");
        assert_eq!(content.items[1].reference.kind, "invoice");
        assert_eq!(content.extensions[0].label, "N1");
        assert_eq!(content.extensions[0].amount, Some(dec!(15)));
        assert_eq!(content.extensions[1].label, "N2");
        assert_eq!(content.extensions[1].amount, None);
        assert!(create.bill_date.is_none());
    }

    #[test]
    fn test_null_amount_is_absent() {
        let request: BillRequest =
            serde_json::from_value(json!({ "amount2": null, "phone": "0812345678" })).unwrap();
        let patch = request.into_patch();

        assert_eq!(patch.items[1].amount, None);
        assert_eq!(patch.phone.as_deref(), Some("0812345678"));
        assert!(patch.customer_name.is_none());
    }

    #[test]
    fn test_overlong_registration_fails_validation() {
        let request = BillRequest {
            car_registration1: Some("X".repeat(40)),
            ..Default::default()
        };
        assert!(request.validate().is_err());
        assert!(BillRequest::default().validate().is_ok());
    }
}
