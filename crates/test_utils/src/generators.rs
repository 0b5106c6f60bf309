//! Property-Based Test Generators
//!
//! Proptest strategies producing values that satisfy the billing
//! invariants: bill numbers in range, two-decimal amounts, and content that
//! passes creation validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_billing::{BillContent, BillNumber, MAX_SEQ};

/// Strategy for valid bill numbers
pub fn bill_number_strategy() -> impl Strategy<Value = BillNumber> {
    (1u32..1_000_000, 1u16..=MAX_SEQ).prop_map(|(prefix, seq)| {
        BillNumber::new(prefix, seq).unwrap_or(BillNumber::FIRST)
    })
}

/// Strategy for positive amounts with two decimal places
pub fn positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for optional non-negative amounts
pub fn optional_amount_strategy() -> impl Strategy<Value = Option<Decimal>> + Clone {
    proptest::option::of((0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2)))
}

/// Strategy for content that passes creation validation
pub fn valid_content_strategy() -> impl Strategy<Value = BillContent> {
    (
        "[A-Za-z][A-Za-z ]{0,30}",
        positive_amount_strategy(),
        proptest::array::uniform4(optional_amount_strategy()),
        proptest::array::uniform3(optional_amount_strategy()),
        proptest::array::uniform2(optional_amount_strategy()),
    )
        .prop_map(|(name, amount1, taxes, other_amounts, extras)| {
            let mut content = BillContent::default();
            content.items[0].name = name;
            content.items[0].amount = Some(amount1);
            for (slot, amount) in other_amounts.into_iter().enumerate() {
                content.items[slot + 1].amount = amount;
            }
            for (item, tax) in content.items.iter_mut().zip(taxes) {
                item.tax = tax;
            }
            content.items[0].tax_pass_through = extras[0];
            content.extensions[0].amount = extras[1];
            content
        })
}
