//! Comprehensive tests for domain_billing

use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::BillId;
use domain_billing::{
    compute_total, BillContent, BillNumber, BillNumberSource, BillPatch, BillService,
    BillingError, CreateBill, MockBillStore, MAX_SEQ,
};

fn oil_change(amount: Decimal) -> CreateBill {
    let mut content = BillContent::default();
    content.customer_name = "Somchai".to_string();
    content.phone = "0812345678".to_string();
    content.items[0].name = "Oil change".to_string();
    content.items[0].amount = Some(amount);
    content.items[0].car_registration = "1กข 1234".to_string();
    content.payment_method = "cash".to_string();
    CreateBill::new(content)
}

fn service() -> (BillService, Arc<MockBillStore>) {
    let store = Arc::new(MockBillStore::new());
    (BillService::new(store.clone()), store)
}

/// Always hands out the same number
struct FixedNumber(BillNumber);

#[async_trait]
impl BillNumberSource for FixedNumber {
    async fn next_bill_number(&self) -> Result<BillNumber, BillingError> {
        Ok(self.0)
    }
}

// ============================================================================
// Bill Number Tests
// ============================================================================

mod bill_number_tests {
    use super::*;

    #[test]
    fn test_three_9999_rolls_to_four_0001() {
        let last: BillNumber = "3/9999".parse().unwrap();
        assert_eq!(BillNumber::following(Some(&last)).unwrap().to_string(), "4/0001");
    }

    #[test]
    fn test_serde_uses_text_form() {
        let number = BillNumber::new(5, 42).unwrap();
        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "\"5/0042\"");

        let back: BillNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, number);
        assert!(serde_json::from_str::<BillNumber>("\"5/42\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_successor_is_strictly_greater(prefix in 1u32..100_000, seq in 1u16..=MAX_SEQ) {
            let number = BillNumber::new(prefix, seq).unwrap();
            let next = number.next().unwrap();

            prop_assert!(next > number);
            if seq < MAX_SEQ {
                prop_assert_eq!(next.prefix(), prefix);
                prop_assert_eq!(next.seq(), seq + 1);
            } else {
                prop_assert_eq!(next.prefix(), prefix + 1);
                prop_assert_eq!(next.seq(), 1);
            }
        }

        #[test]
        fn prop_text_form_parses_back(prefix in 1u32..=u32::MAX, seq in 1u16..=MAX_SEQ) {
            let number = BillNumber::new(prefix, seq).unwrap();
            let text = number.to_string();
            prop_assert_eq!(text.split('/').nth(1).map(str::len), Some(4));
            prop_assert_eq!(text.parse::<BillNumber>().unwrap(), number);
        }
    }
}

// ============================================================================
// Total Tests
// ============================================================================

mod total_tests {
    use super::*;

    fn amount_strategy() -> impl Strategy<Value = Option<Decimal>> + Clone {
        proptest::option::of((0i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2)))
    }

    proptest! {
        #[test]
        fn prop_total_is_sum_of_present_amounts_and_taxes(
            amounts in proptest::array::uniform4(amount_strategy()),
            taxes in proptest::array::uniform4(amount_strategy()),
            others in proptest::array::uniform4(amount_strategy()),
        ) {
            let mut content = BillContent::default();
            for i in 0..4 {
                content.items[i].amount = amounts[i];
                content.items[i].tax = taxes[i];
                content.items[i].tax_pass_through = others[i];
                content.items[i].check = others[i];
            }
            content.extensions[0].amount = others[0];

            let expected: Decimal = amounts.iter().chain(taxes.iter()).flatten().copied().sum();
            prop_assert_eq!(compute_total(&content).unwrap(), expected);
        }
    }
}

// ============================================================================
// Service Tests
// ============================================================================

mod service_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_first_number_and_total() {
        let (service, _) = service();
        let mut request = oil_change(dec!(100));
        request.content.items[0].tax = Some(dec!(7.5));

        let bill = service.create(Some("staff-1"), request).await.unwrap();

        assert_eq!(bill.bill_number.to_string(), "1/0001");
        assert_eq!(bill.total, dec!(107.5));
        assert_eq!(bill.created_by, "staff-1");
        assert_eq!(bill.created_at, bill.updated_at);
        assert_eq!(bill.bill_date, bill.created_at);
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let (service, _) = service();
        let bill = service.create(Some("staff-1"), oil_change(dec!(100))).await.unwrap();

        assert_eq!(bill.content.items[1].amount, Some(Decimal::ZERO));
        assert_eq!(bill.content.items[0].tax, Some(Decimal::ZERO));
        assert_eq!(bill.content.items[0].tax_pass_through, Some(Decimal::ZERO));
        assert_eq!(bill.content.items[2].amount, None);
        assert_eq!(bill.content.items[3].tax, None);
    }

    #[tokio::test]
    async fn test_create_rejects_unstorable_amounts_before_numbering() {
        let (service, store) = service();

        let mut sub_cent = oil_change(dec!(0.005));
        sub_cent.content.items[1].amount = Some(dec!(0.005));
        let err = service.create(Some("staff-1"), sub_cent).await.unwrap_err();
        assert!(matches!(err, BillingError::Validation(_)));

        let mut overflowing = oil_change(Decimal::MAX);
        overflowing.content.items[1].amount = Some(Decimal::MAX);
        let err = service.create(Some("staff-1"), overflowing).await.unwrap_err();
        assert!(matches!(err, BillingError::Validation(_)));

        assert!(store.is_empty().await);
        let bill = service.create(Some("staff-1"), oil_change(dec!(0.01))).await.unwrap();
        assert_eq!(bill.bill_number, BillNumber::FIRST);
    }

    #[tokio::test]
    async fn test_sequential_creations_are_monotonic() {
        let (service, _) = service();
        let mut previous: Option<BillNumber> = None;

        for _ in 0..25 {
            let bill = service.create(Some("staff-1"), oil_change(dec!(10))).await.unwrap();
            if let Some(prev) = previous {
                assert!(bill.bill_number > prev);
                assert_eq!(bill.bill_number, prev.next().unwrap());
            }
            previous = Some(bill.bill_number);
        }

        assert_eq!(previous.unwrap().to_string(), "1/0025");
    }

    #[tokio::test]
    async fn test_create_rolls_prefix_from_seeded_store() {
        let store = Arc::new(MockBillStore::new());
        let seeding = BillService::with_number_source(
            store.clone(),
            Arc::new(FixedNumber(BillNumber::new(3, 9999).unwrap())),
        );
        seeding.create(Some("seed"), oil_change(dec!(1))).await.unwrap();

        let service = BillService::new(store);
        let bill = service.create(Some("staff-1"), oil_change(dec!(1))).await.unwrap();
        assert_eq!(bill.bill_number.to_string(), "4/0001");
    }

    #[tokio::test]
    async fn test_create_requires_identity() {
        let (service, store) = service();

        for caller in [None, Some(""), Some("   ")] {
            let err = service.create(caller, oil_change(dec!(100))).await.unwrap_err();
            assert!(matches!(err, BillingError::Unauthorized(_)));
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_rejects_zero_amount_or_empty_name() {
        let (service, store) = service();

        let mut fully_loaded = oil_change(Decimal::ZERO);
        fully_loaded.content.items[1].amount = Some(dec!(500));
        fully_loaded.content.items[0].tax = Some(dec!(35));
        let err = service.create(Some("staff-1"), fully_loaded).await.unwrap_err();
        assert!(matches!(err, BillingError::Validation(_)));
        assert!(!err.is_retryable());

        let mut unnamed = oil_change(dec!(100));
        unnamed.content.items[0].name = String::new();
        let err = service.create(Some("staff-1"), unnamed).await.unwrap_err();
        assert!(matches!(err, BillingError::Validation(_)));

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_number_is_conflict() {
        let store = Arc::new(MockBillStore::new());
        let service = BillService::with_number_source(
            store.clone(),
            Arc::new(FixedNumber(BillNumber::FIRST)),
        );

        let first = service.create(Some("staff-1"), oil_change(dec!(100))).await.unwrap();
        let err = service.create(Some("staff-2"), oil_change(dec!(999))).await.unwrap_err();

        assert!(matches!(err, BillingError::Conflict(_)));
        assert!(err.is_retryable());

        let stored = service.get(first.id).await.unwrap();
        assert_eq!(stored.total, dec!(100));
        assert_eq!(stored.created_by, "staff-1");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_with_unavailable_store_is_internal() {
        let (service, store) = service();
        store.set_unavailable(true);

        let err = service.create(Some("staff-1"), oil_change(dec!(100))).await.unwrap_err();
        assert!(matches!(err, BillingError::Internal(_)));
    }

    #[tokio::test]
    async fn test_update_phone_preserves_everything_else() {
        let (service, _) = service();
        let mut request = oil_change(dec!(100));
        request.content.items[0].tax = Some(dec!(7));
        request.content.items[2].check = Some(dec!(3));
        let created = service.create(Some("staff-1"), request).await.unwrap();

        let patch = BillPatch {
            phone: Some("0899999999".to_string()),
            ..Default::default()
        };
        let updated = service.update(created.id, patch).await.unwrap();

        let mut expected = created.content.clone();
        expected.phone = "0899999999".to_string();
        assert_eq!(updated.content, expected);
        assert_eq!(updated.total, created.total);
        assert_eq!(updated.bill_number, created.bill_number);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.created_by, created.created_by);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_amount_recomputes_total() {
        let (service, _) = service();
        let mut request = oil_change(dec!(100));
        request.content.items[1].amount = Some(dec!(50));
        request.content.items[3].tax = Some(dec!(5));
        let created = service.create(Some("staff-1"), request).await.unwrap();
        assert_eq!(created.total, dec!(155));

        let mut patch = BillPatch::default();
        patch.items[0].amount = Some(dec!(300));
        patch.items[0].tax_pass_through = Some(dec!(80));
        let updated = service.update(created.id, patch).await.unwrap();

        assert_eq!(updated.total, dec!(355));
        assert_eq!(service.get(created.id).await.unwrap().total, dec!(355));
    }

    #[tokio::test]
    async fn test_update_rejects_zero_primary_amount() {
        let (service, _) = service();
        let created = service.create(Some("staff-1"), oil_change(dec!(100))).await.unwrap();

        let mut patch = BillPatch::default();
        patch.items[0].amount = Some(Decimal::ZERO);
        let err = service.update(created.id, patch).await.unwrap_err();

        assert!(matches!(err, BillingError::Validation(_)));
        assert_eq!(service.get(created.id).await.unwrap().total, dec!(100));
    }

    #[tokio::test]
    async fn test_update_missing_bill() {
        let (service, _) = service();
        let err = service.update(BillId::new(404), BillPatch::default()).await.unwrap_err();
        assert!(matches!(err, BillingError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let (service, _) = service();
        let created = service.create(Some("staff-1"), oil_change(dec!(100))).await.unwrap();

        service.delete(created.id).await.unwrap();
        assert!(matches!(service.get(created.id).await, Err(BillingError::NotFound(_))));
        assert!(matches!(service.delete(created.id).await, Err(BillingError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_then_get_missing() {
        let (service, _) = service();
        let id = BillId::new(77);

        assert!(matches!(service.delete(id).await, Err(BillingError::NotFound(_))));
        assert!(matches!(service.get(id).await, Err(BillingError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_empty_and_populated() {
        let (service, _) = service();
        assert!(service.list().await.unwrap().is_empty());

        service.create(Some("staff-1"), oil_change(dec!(1))).await.unwrap();
        service.create(Some("staff-1"), oil_change(dec!(2))).await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 2);
    }
}
