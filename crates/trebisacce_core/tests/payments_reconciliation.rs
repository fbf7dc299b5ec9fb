use chrono::NaiveDate;
use rust_decimal::Decimal;
use trebisacce_core::db::open_db_in_memory;
use trebisacce_core::model::invoice::{InvoiceStatus, NewInvoice};
use trebisacce_core::model::max_amount;
use trebisacce_core::model::payment::{NewPayment, PaymentMethod, PaymentPatch};
use trebisacce_core::{
    DateRange, InvoiceService, PaymentFilter, PaymentService, ServiceError, SqliteRecordStore,
    ValidationError,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

fn issued_invoice(store: SqliteRecordStore<'_>, id: &str, total: i64) {
    InvoiceService::new(store)
        .create_invoice(NewInvoice {
            id: Some(id.to_string()),
            number: format!("F-{id}"),
            client_id: None,
            client_name: Some("Acme Corp".to_string()),
            date: day(20),
            status: InvoiceStatus::Issued,
            total: Decimal::from(total),
            created_at: None,
            updated_at: None,
        })
        .unwrap();
}

fn status_of(store: SqliteRecordStore<'_>, id: &str) -> InvoiceStatus {
    InvoiceService::new(store).invoice_snapshot(id).unwrap().status
}

#[test]
fn payments_move_invoice_between_issued_and_paid() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::new(&conn).without_seed();
    let payments = PaymentService::new(store);
    issued_invoice(store, "inv-100", 1000);

    let first = payments
        .create_payment(NewPayment::new("inv-100", day(21), Decimal::from(400), PaymentMethod::Cash))
        .unwrap();
    assert!(first.id.starts_with("pay-"));
    assert_eq!(status_of(store, "inv-100"), InvoiceStatus::Issued);

    let second = payments
        .create_payment(NewPayment::new(
            "inv-100",
            day(22),
            Decimal::from(600),
            PaymentMethod::normalize("Transferencia"),
        ))
        .unwrap();
    assert_eq!(second.method, PaymentMethod::Transfer);
    assert_eq!(status_of(store, "inv-100"), InvoiceStatus::Paid);
    assert_eq!(payments.paid_amount("inv-100").unwrap(), Decimal::from(1000));

    payments.remove_payment(&first.id).unwrap();
    assert_eq!(status_of(store, "inv-100"), InvoiceStatus::Issued);

    payments
        .update_payment(
            &second.id,
            PaymentPatch {
                amount: Some(Decimal::from(1200)),
                ..PaymentPatch::default()
            },
        )
        .unwrap();
    assert_eq!(status_of(store, "inv-100"), InvoiceStatus::Paid);
}

#[test]
fn moving_a_payment_reconciles_both_invoices() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::new(&conn).without_seed();
    let payments = PaymentService::new(store);
    issued_invoice(store, "inv-a", 500);
    issued_invoice(store, "inv-b", 500);

    let payment = payments
        .create_payment(NewPayment::new("inv-a", day(21), Decimal::from(500), PaymentMethod::Card))
        .unwrap();
    assert_eq!(status_of(store, "inv-a"), InvoiceStatus::Paid);
    assert_eq!(status_of(store, "inv-b"), InvoiceStatus::Issued);

    payments
        .update_payment(
            &payment.id,
            PaymentPatch {
                invoice_id: Some("inv-b".to_string()),
                ..PaymentPatch::default()
            },
        )
        .unwrap();
    assert_eq!(status_of(store, "inv-a"), InvoiceStatus::Issued);
    assert_eq!(status_of(store, "inv-b"), InvoiceStatus::Paid);
}

#[test]
fn draft_and_missing_invoices_reject_payments() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::new(&conn);
    let payments = PaymentService::new(store);

    let err = payments
        .create_payment(NewPayment::new("inv-003", day(21), Decimal::from(10), PaymentMethod::Cash))
        .unwrap_err();
    assert!(matches!(err, ServiceError::DraftInvoice(id) if id == "inv-003"));

    let err = payments
        .create_payment(NewPayment::new("inv-404", day(21), Decimal::from(10), PaymentMethod::Cash))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "Invoice", .. }));

    let err = payments
        .create_payment(NewPayment::new("  ", day(21), Decimal::from(10), PaymentMethod::Cash))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::InvoiceIdRequired)
    ));

    let err = payments
        .create_payment(NewPayment::new("inv-001", day(21), Decimal::ZERO, PaymentMethod::Cash))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::AmountNotPositive(_))
    ));

    // Rejected writes leave the list untouched.
    assert_eq!(payments.list_payments(&PaymentFilter::default()).unwrap().len(), 5);
}

#[test]
fn oversized_amounts_are_rejected_before_saving() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::new(&conn).without_seed();
    let payments = PaymentService::new(store);
    let invoices = InvoiceService::new(store);

    let err = invoices
        .create_invoice(NewInvoice {
            id: Some("inv-max".to_string()),
            number: "F-max".to_string(),
            client_id: None,
            client_name: None,
            date: day(20),
            status: InvoiceStatus::Issued,
            total: Decimal::MAX,
            created_at: None,
            updated_at: None,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::AmountTooLarge { field: "total", .. })
    ));

    invoices
        .create_invoice(NewInvoice {
            id: Some("inv-big".to_string()),
            number: "F-big".to_string(),
            client_id: None,
            client_name: None,
            date: day(20),
            status: InvoiceStatus::Issued,
            total: max_amount(),
            created_at: None,
            updated_at: None,
        })
        .unwrap();

    let huge = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);
    for _ in 0..2 {
        let err = payments
            .create_payment(NewPayment::new("inv-big", day(21), huge, PaymentMethod::Cash))
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::AmountTooLarge { field: "amount", .. })
        ));
    }
    assert!(payments.list_payments(&PaymentFilter::default()).unwrap().is_empty());
    assert_eq!(status_of(store, "inv-big"), InvoiceStatus::Issued);

    for _ in 0..2 {
        payments
            .create_payment(NewPayment::new("inv-big", day(21), max_amount(), PaymentMethod::Cash))
            .unwrap();
    }
    assert_eq!(payments.paid_amount("inv-big").unwrap(), max_amount() * Decimal::TWO);
    assert_eq!(status_of(store, "inv-big"), InvoiceStatus::Paid);
}

#[test]
fn deleted_invoice_is_skipped_during_reconciliation() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::new(&conn);
    let payments = PaymentService::new(store);

    InvoiceService::new(store).delete_invoice("inv-004").unwrap();
    assert_eq!(payments.remove_payment("pay-005").unwrap(), "pay-005");
    assert!(payments.payments_by_invoice("inv-004").unwrap().is_empty());
}

#[test]
fn seeded_payments_summaries() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::new(&conn);
    let payments = PaymentService::new(store);

    let listed = payments.list_payments(&PaymentFilter::default()).unwrap();
    assert!(listed.windows(2).all(|pair| pair[0].date >= pair[1].date));
    assert_eq!(listed[0].id, "pay-002");

    let by_invoice = payments.payments_by_invoice("inv-002").unwrap();
    assert_eq!(by_invoice.len(), 2);

    let summaries = payments
        .invoice_payment_summaries(&[
            "inv-001".to_string(),
            "inv-004".to_string(),
            "inv-404".to_string(),
        ])
        .unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries["inv-001"].paid_amount, Decimal::from(2100));
    assert_eq!(summaries["inv-001"].balance, Decimal::from(1350));
    assert_eq!(summaries["inv-004"].balance, Decimal::ZERO);

    let january_19 = payments.payments_summary(DateRange::between(day(19), day(19))).unwrap();
    assert_eq!(january_19.total, Decimal::from(1700));
    let methods: Vec<_> = january_19.by_method.iter().map(|m| m.method).collect();
    assert_eq!(methods, [PaymentMethod::Transfer, PaymentMethod::MercadoPago]);
}

#[test]
fn summary_serializes_camel_case_with_wire_methods() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::new(&conn);
    let summary = PaymentService::new(store)
        .payments_summary(DateRange::between(day(9), day(9)))
        .unwrap();

    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["byMethod"][0]["method"], "transfer");
    assert_eq!(value["total"], "980");
}
