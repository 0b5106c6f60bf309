//! Service properties over generated content, backed by the in-memory store

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal_macros::dec;

use domain_billing::{BillService, BillingError, MockBillStore};
use test_utils::{
    assert_strictly_increasing, assert_total_consistent, valid_content_strategy, BillContentBuilder,
};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_created_bills_have_consistent_totals(contents in proptest::collection::vec(valid_content_strategy(), 1..8)) {
        runtime().block_on(async {
            let service = BillService::new(Arc::new(MockBillStore::new()));
            let mut numbers = Vec::new();

            for content in contents {
                let bill = service
                    .create(Some("staff-1"), domain_billing::CreateBill::new(content))
                    .await
                    .unwrap();
                assert_total_consistent(&bill);
                numbers.push(bill.bill_number);
            }

            assert_strictly_increasing(&numbers);
        });
    }
}

#[tokio::test]
async fn test_builder_request_without_primary_amount_is_rejected() {
    let service = BillService::new(Arc::new(MockBillStore::new()));
    let request = BillContentBuilder::random().without_amount(0).build_request();

    let err = service.create(Some("staff-1"), request).await.unwrap_err();
    assert!(matches!(err, BillingError::Validation(_)));
}

#[tokio::test]
async fn test_builder_request_with_extensions_excludes_them_from_total() {
    let service = BillService::new(Arc::new(MockBillStore::new()));
    let request = BillContentBuilder::new()
        .with_item(0, "Tyre change", dec!(800))
        .with_tax(0, dec!(56))
        .with_extension(0, "N1", dec!(300))
        .with_tax_pass_through(1, dec!(90))
        .build_request();

    let bill = service.create(Some("staff-1"), request).await.unwrap();
    assert_eq!(bill.total, dec!(856));
}
