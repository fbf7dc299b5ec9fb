use chrono::NaiveDate;
use rust_decimal::Decimal;
use trebisacce_core::db::kv::kv_get;
use trebisacce_core::db::open_db_in_memory;
use trebisacce_core::model::invoice::{Invoice, InvoicePatch, InvoiceStatus, NewInvoice};
use trebisacce_core::model::quote::{NewQuote, QuotePatch, QuoteStatus};
use trebisacce_core::model::Record;
use trebisacce_core::{
    InvoiceService, QuoteService, SalesAnalytics, ServiceError, SqliteRecordStore,
    ValidationError,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

fn new_invoice(number: &str, date: NaiveDate, total: i64) -> NewInvoice {
    NewInvoice {
        id: None,
        number: number.to_string(),
        client_id: Some("cli-003".to_string()),
        client_name: Some("Global Services".to_string()),
        date,
        status: InvoiceStatus::Draft,
        total: Decimal::from(total),
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn invoices_list_newest_first_with_creation_tiebreak() {
    let conn = open_db_in_memory().unwrap();
    let service = InvoiceService::new(SqliteRecordStore::new(&conn));

    let older = service
        .create_invoice(NewInvoice {
            created_at: Some(1_000),
            ..new_invoice("F-2025-0050", day(18), 100)
        })
        .unwrap();
    let newer = service
        .create_invoice(NewInvoice {
            created_at: Some(2_000),
            ..new_invoice("F-2025-0051", day(18), 100)
        })
        .unwrap();

    let listed = service.list_invoices().unwrap();
    let ids: Vec<_> = listed.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(&ids[..3], [newer.id.as_str(), older.id.as_str(), "inv-001"]);
    assert_eq!(ids.last(), Some(&"inv-004"));
}

#[test]
fn invoice_totals_must_be_positive() {
    let conn = open_db_in_memory().unwrap();
    let service = InvoiceService::new(SqliteRecordStore::new(&conn));

    let err = service
        .create_invoice(new_invoice("F-0", day(1), 0))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::TotalNotPositive(_))
    ));

    let err = service
        .update_invoice(
            "inv-001",
            InvoicePatch {
                total: Some(Decimal::from(-5)),
                ..InvoicePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(
        service.invoice_snapshot("inv-001").unwrap().total,
        Decimal::from(3450)
    );
}

#[test]
fn status_update_stamps_and_delete_removes() {
    let conn = open_db_in_memory().unwrap();
    let service = InvoiceService::new(SqliteRecordStore::new(&conn));

    let updated = service
        .update_invoice_status("inv-003", InvoiceStatus::Issued)
        .unwrap();
    assert_eq!(updated.status, InvoiceStatus::Issued);
    assert!(updated.updated_at.is_some());

    assert_eq!(service.delete_invoice("inv-003").unwrap(), "inv-003");
    let err = service.invoice_snapshot("inv-003").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "Invoice", .. }));
}

#[test]
fn invoices_persist_with_legacy_wire_shape() {
    let conn = open_db_in_memory().unwrap();
    let service = InvoiceService::new(SqliteRecordStore::new(&conn));
    service.list_invoices().unwrap();

    let raw = kv_get(&conn, Invoice::STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &value[0];
    assert_eq!(first["id"], "inv-001");
    assert_eq!(first["clientName"], "Acme Corp");
    assert_eq!(first["status"], "issued");
    assert_eq!(first["date"], "2025-01-18");
}

#[test]
fn quotes_keep_stored_order_and_accept_patches() {
    let conn = open_db_in_memory().unwrap();
    let service = QuoteService::new(SqliteRecordStore::new(&conn));

    let created = service
        .create_quote(NewQuote {
            id: None,
            number: "P-2025-011".to_string(),
            client_id: None,
            client_name: Some("Northwind".to_string()),
            date: day(2),
            status: QuoteStatus::Draft,
            total: Decimal::from(999),
        })
        .unwrap();
    assert!(created.id.starts_with("quo-"));

    let listed = service.list_quotes().unwrap();
    assert_eq!(listed[0].id, created.id);
    assert_eq!(listed.len(), 5);

    let sent = service
        .update_quote(
            &created.id,
            QuotePatch {
                status: Some(QuoteStatus::Sent),
                ..QuotePatch::default()
            },
        )
        .unwrap();
    assert_eq!(sent.status, QuoteStatus::Sent);
    assert_eq!(sent.total, Decimal::from(999));

    let err = service
        .update_quote("quo-missing", QuotePatch::default())
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "Quote", .. }));
}

#[test]
fn sales_overview_reflects_new_documents() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::new(&conn);
    let analytics = SalesAnalytics::new(store);

    let before = analytics.sales_overview().unwrap();
    assert_eq!(before.total_invoiced, Decimal::from(8820));
    assert_eq!(before.pending_invoices, 3);
    assert_eq!(before.open_quotes, 2);

    InvoiceService::new(store)
        .create_invoice(new_invoice("F-2025-0060", day(25), 180))
        .unwrap();
    let after = analytics.sales_overview().unwrap();
    assert_eq!(after.total_invoiced, Decimal::from(9000));
    assert_eq!(after.pending_invoices, 4);
    assert_eq!(after.invoice_count, 5);
    assert_eq!(after.latest_invoices.len(), 3);
    assert_eq!(after.latest_invoices[0].number, "F-2025-0060");

    let value = serde_json::to_value(&after).unwrap();
    assert_eq!(value["openQuotes"], 2);
    assert!(value["latestQuotes"].is_array());
}
