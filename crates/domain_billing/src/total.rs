//! Bill total calculation and amount limits
//!
//! Stored amounts are fixed-point with two decimal places and stay below
//! [`AMOUNT_LIMIT`] in magnitude, matching the `NUMERIC(14, 2)` columns.
//! The total is held to the same limit.

use rust_decimal::Decimal;

use crate::bill::BillContent;
use crate::error::BillingError;

/// Decimal places kept for every amount
pub const MONEY_SCALE: u32 = 2;

/// Exclusive magnitude bound for amounts and totals (10^12)
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Checks that an amount can be stored without rounding or overflow
///
/// # Errors
///
/// `Validation` naming `field` if the amount has more than two decimal
/// places or reaches [`AMOUNT_LIMIT`]
pub fn check_amount(field: &str, amount: Decimal) -> Result<(), BillingError> {
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(BillingError::validation(format!(
            "{} must have at most {} decimal places",
            field, MONEY_SCALE
        )));
    }
    if amount.abs() >= AMOUNT_LIMIT {
        return Err(BillingError::validation(format!(
            "{} must be less than {} in magnitude",
            field, AMOUNT_LIMIT
        )));
    }
    Ok(())
}

/// Checks the amounts of every slot
///
/// Line items are given as `[amount, tax, taxgo, check]` and extensions as
/// their single amount. Errors name the field the way clients send it
/// (`amount1`, `taxgo3`, `extension2`).
pub(crate) fn check_slot_amounts(
    items: impl IntoIterator<Item = [Option<Decimal>; 4]>,
    extensions: impl IntoIterator<Item = Option<Decimal>>,
) -> Result<(), BillingError> {
    const ITEM_FIELDS: [&str; 4] = ["amount", "tax", "taxgo", "check"];

    for (slot, values) in items.into_iter().enumerate() {
        for (field, value) in ITEM_FIELDS.iter().zip(values) {
            if let Some(amount) = value {
                check_amount(&format!("{}{}", field, slot + 1), amount)?;
            }
        }
    }
    for (slot, value) in extensions.into_iter().enumerate() {
        if let Some(amount) = value {
            check_amount(&format!("extension{}", slot * 2 + 2), amount)?;
        }
    }
    Ok(())
}

/// Computes the billed total
///
/// Sums the amount and tax of every line-item slot, counting absent values
/// as zero. Tax pass-through, check and extension amounts are tracked
/// separately and never enter the total.
///
/// # Errors
///
/// `Validation` if the sum overflows or reaches [`AMOUNT_LIMIT`]
pub fn compute_total(content: &BillContent) -> Result<Decimal, BillingError> {
    let total = content
        .items
        .iter()
        .flat_map(|item| [item.amount, item.tax])
        .flatten()
        .try_fold(Decimal::ZERO, |sum, amount| sum.checked_add(amount))
        .ok_or_else(|| BillingError::validation("total is out of range"))?;

    check_amount("total", total)?;
    Ok(total)
}
