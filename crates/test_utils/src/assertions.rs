//! Custom Test Assertions
//!
//! Assertion helpers for bills that give more meaningful failure messages
//! than a plain `assert_eq!` over the whole struct.

use rust_decimal::Decimal;

use domain_billing::{compute_total, Bill, BillContent, BillNumber};

/// Asserts that a bill's stored total equals the total of its content
pub fn assert_total_consistent(bill: &Bill) {
    let expected = compute_total(&bill.content)
        .unwrap_or_else(|e| panic!("Bill {} content has no valid total: {}", bill.bill_number, e));
    assert_eq!(
        bill.total, expected,
        "Bill {} has total {} but its content sums to {}",
        bill.bill_number, bill.total, expected
    );
}

/// Asserts that a bill's total equals an expected amount
pub fn assert_total_eq(bill: &Bill, expected: Decimal) {
    assert_eq!(
        bill.total, expected,
        "Bill {} total mismatch: actual={}, expected={}",
        bill.bill_number, bill.total, expected
    );
}

/// Asserts that `next` is the immediate successor of `previous`
pub fn assert_successor(previous: &BillNumber, next: &BillNumber) {
    let expected = previous
        .next()
        .unwrap_or_else(|e| panic!("{} has no successor: {}", previous, e));
    assert_eq!(
        *next, expected,
        "Expected {} to follow {}, got {}",
        expected, previous, next
    );
}

/// Asserts that bill numbers are strictly increasing
pub fn assert_strictly_increasing(numbers: &[BillNumber]) {
    for pair in numbers.windows(2) {
        assert!(
            pair[0] < pair[1],
            "Bill numbers not increasing: {} then {}",
            pair[0],
            pair[1]
        );
    }
}

/// Asserts that line items, extensions and payment details are unchanged
///
/// Compares slot by slot so a failure names the first differing slot.
pub fn assert_slots_unchanged(before: &BillContent, after: &BillContent) {
    for (slot, (b, a)) in before.items.iter().zip(after.items.iter()).enumerate() {
        assert_eq!(b, a, "Line item slot {} changed", slot + 1);
    }
    for (slot, (b, a)) in before.extensions.iter().zip(after.extensions.iter()).enumerate() {
        assert_eq!(b, a, "Extension slot {} changed", slot + 1);
    }
    assert_eq!(before.payment_method, after.payment_method, "Payment method changed");
    assert_eq!(before.description, after.description, "Description changed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::BillFixtures;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fixture_total_is_consistent() {
        let bill = BillFixtures::stored(1);
        assert_total_consistent(&bill);
        assert_total_eq(&bill, dec!(107.5));
    }

    #[test]
    #[should_panic(expected = "total mismatch")]
    fn test_total_mismatch_panics() {
        assert_total_eq(&BillFixtures::stored(1), dec!(1));
    }

    #[test]
    fn test_successor_across_prefix() {
        let last = BillNumber::new(3, 9999).unwrap();
        assert_successor(&last, &BillNumber::new(4, 1).unwrap());
    }

    #[test]
    #[should_panic(expected = "not increasing")]
    fn test_strictly_increasing_detects_repeat() {
        assert_strictly_increasing(&[BillNumber::FIRST, BillNumber::FIRST]);
    }
}
