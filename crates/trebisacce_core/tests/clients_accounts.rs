use rust_decimal::Decimal;
use trebisacce_core::db::kv::kv_set;
use trebisacce_core::db::open_db_in_memory;
use trebisacce_core::model::account::{AccountKind, AccountPatch, NewAccount};
use trebisacce_core::model::client::{Client, ClientKind, ClientPatch, NewClient};
use trebisacce_core::model::transaction::{NewTransaction, Transaction, TransactionKind};
use trebisacce_core::model::Record;
use trebisacce_core::{
    AccountService, ClientListQuery, ClientService, InvoiceService, ServiceError,
    SqliteRecordStore, TransactionService, ValidationError,
};

fn new_client(name: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        ..NewClient::default()
    }
}

fn new_account(name: &str, currency: Option<&str>) -> NewAccount {
    NewAccount {
        id: None,
        name: name.to_string(),
        kind: AccountKind::Bank,
        currency: currency.map(str::to_string),
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn seeded_clients_filter_by_kind_and_search() {
    let conn = open_db_in_memory().unwrap();
    let service = ClientService::new(SqliteRecordStore::new(&conn));

    assert_eq!(service.list_clients(&ClientListQuery::default()).unwrap().len(), 6);

    let smb = service
        .list_clients(&ClientListQuery {
            kind: Some(ClientKind::SmallBusiness),
            ..ClientListQuery::default()
        })
        .unwrap();
    let ids: Vec<_> = smb.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["cli-002", "cli-004"]);

    let by_email = service
        .list_clients(&ClientListQuery {
            search: Some("DLP.com".to_string()),
            ..ClientListQuery::default()
        })
        .unwrap();
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].id, "cli-006");
}

#[test]
fn client_names_are_unique_after_normalization() {
    let conn = open_db_in_memory().unwrap();
    let service = ClientService::new(SqliteRecordStore::new(&conn));

    let err = service.create_client(new_client("  acme   CORP ")).unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateName { entity: "Client", .. }));

    let created = service.create_client(new_client("Nueva Empresa")).unwrap();
    assert!(created.id.starts_with("cli-"));
    assert_eq!(created.created_at, created.updated_at);

    let err = service
        .update_client(
            &created.id,
            ClientPatch {
                name: Some("northwind".to_string()),
                ..ClientPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateName { .. }));

    let renamed = service
        .update_client(
            &created.id,
            ClientPatch {
                email: Some("hola@nueva.com".to_string()),
                ..ClientPatch::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.email.as_deref(), Some("hola@nueva.com"));
}

#[test]
fn invalid_email_and_blank_name_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = ClientService::new(SqliteRecordStore::new(&conn).without_seed());

    let err = service
        .create_client(NewClient {
            email: Some("not-an-email".to_string()),
            ..new_client("Someone")
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::InvalidEmail(_))
    ));

    let err = service.create_client(new_client("   ")).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ValidationError::NameRequired)));
}

#[test]
fn name_lookup_resolves_or_creates() {
    let conn = open_db_in_memory().unwrap();
    let service = ClientService::new(SqliteRecordStore::new(&conn));

    let found = service.find_client_by_name("tech   solutions").unwrap().unwrap();
    assert_eq!(found.id, "cli-002");
    assert!(service.find_client_by_name("Nobody").unwrap().is_none());
    assert!(service.find_client_by_name("  ").unwrap().is_none());

    let existing = service.get_or_create_client_by_name("ACME CORP").unwrap();
    assert_eq!(existing.id, "cli-001");

    let created = service.get_or_create_client_by_name(" Kiosco Sur ").unwrap();
    assert_eq!(created.name, "Kiosco Sur");
    assert_eq!(created.kind, ClientKind::Company);
    assert_eq!(
        service.get_client_by_id(&created.id).unwrap().unwrap().name,
        "Kiosco Sur"
    );
}

#[test]
fn ambiguous_name_lookup_finds_nothing() {
    let conn = open_db_in_memory().unwrap();
    kv_set(
        &conn,
        Client::STORAGE_KEY,
        r#"[{"id":"cli-a","name":"Acme"},{"id":"cli-b","name":" acme "},{"id":"cli-c","name":"Kiosco"}]"#,
    )
    .unwrap();
    let service = ClientService::new(SqliteRecordStore::new(&conn));

    assert!(service.find_client_by_name("ACME").unwrap().is_none());
    assert_eq!(
        service.find_client_by_name("kiosco").unwrap().unwrap().id,
        "cli-c"
    );

    service.remove_client("cli-b").unwrap();
    assert_eq!(
        service.find_client_by_name("ACME").unwrap().unwrap().id,
        "cli-a"
    );
}

#[test]
fn clients_referenced_by_sales_documents_cannot_be_removed() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::new(&conn);
    let service = ClientService::new(store);
    InvoiceService::new(store).list_invoices().unwrap();

    let err = service.remove_client("cli-001").unwrap_err();
    assert!(matches!(err, ServiceError::InUse { entity: "Client", .. }));

    assert_eq!(service.remove_client("cli-006").unwrap(), "cli-006");
    assert!(service.get_client_by_id("cli-006").unwrap().is_none());

    let err = service.remove_client("cli-006").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
    let err = service.remove_client(" ").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::IdRequired("Client"))
    ));
}

#[test]
fn accounts_take_default_currency_and_uppercase_explicit_ones() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteRecordStore::new(&conn)).with_default_currency("USD");

    let defaulted = service.create_account(new_account("Banco Nación", None)).unwrap();
    assert_eq!(defaulted.currency, "USD");

    let explicit = service.create_account(new_account("Wise", Some(" eur "))).unwrap();
    assert_eq!(explicit.currency, "EUR");

    let err = service.create_account(new_account("caja", None)).unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateName { entity: "Account", .. }));

    let updated = service
        .update_account(
            &explicit.id,
            AccountPatch {
                name: Some("Wise EUR".to_string()),
                ..AccountPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "Wise EUR");
    assert_eq!(service.list_accounts().unwrap().len(), 5);
}

#[test]
fn accounts_with_ledger_history_cannot_be_removed() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::new(&conn).without_seed();
    let accounts = AccountService::new(store);
    let ledger = TransactionService::new(store);

    let used = accounts.create_account(new_account("Caja", None)).unwrap();
    let unused = accounts.create_account(new_account("Banco", None)).unwrap();
    ledger
        .create_transaction(NewTransaction::single(
            TransactionKind::Income,
            chrono::NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            Decimal::from(50),
            used.id.clone(),
        ))
        .unwrap();

    let err = accounts.remove_account(&used.id).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InUse {
            referenced_by: "transactions",
            ..
        }
    ));
    assert_eq!(accounts.remove_account(&unused.id).unwrap(), unused.id);
    assert!(accounts.get_account(&unused.id).unwrap().is_none());
}

#[test]
fn malformed_ledger_rows_do_not_hide_account_history() {
    let conn = open_db_in_memory().unwrap();
    kv_set(
        &conn,
        Transaction::STORAGE_KEY,
        r#"[{"id":"tx-bad","type":"refund","amount":"10","accountId":"acc-001"},
            {"id":"tx-ok","type":"income","date":"2025-01-12","amount":"80","accountId":"acc-002"}]"#,
    )
    .unwrap();
    let accounts = AccountService::new(SqliteRecordStore::new(&conn));

    let err = accounts.remove_account("acc-002").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InUse {
            entity: "Account",
            ..
        }
    ));
    assert_eq!(accounts.remove_account("acc-003").unwrap(), "acc-003");
}
