//! Subcommand definitions and dispatch.

use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use trebisacce_core::db::kv::{kv_delete, kv_keys};
use trebisacce_core::model::account::{AccountKind, AccountPatch, NewAccount};
use trebisacce_core::model::client::{ClientKind, ClientPatch, NewClient};
use trebisacce_core::model::decision::{DecisionPatch, DecisionStatus, NewDecision};
use trebisacce_core::model::invoice::{InvoicePatch, InvoiceStatus, NewInvoice};
use trebisacce_core::model::normalize::{normalize_amount, normalize_date};
use trebisacce_core::model::payment::{NewPayment, PaymentMethod, PaymentPatch};
use trebisacce_core::model::product::{NewProduct, ProductKind, ProductPatch};
use trebisacce_core::model::quote::{NewQuote, QuotePatch, QuoteStatus};
use trebisacce_core::model::transaction::{NewTransaction, TransactionKind, TransactionPatch};
use trebisacce_core::{
    AccountService, AppConfig, ClientListQuery, ClientService, DateRange, DecisionListQuery,
    DecisionService, InvoiceService, PaymentFilter, PaymentService, ProductListQuery,
    ProductService, QuoteService, SalesAnalytics, SqliteRecordStore, TransactionFilter,
    TransactionService, TreasuryAnalytics,
};

const STORAGE_PREFIX: &str = "trebisacce_";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Contacts: customers and suppliers.
    #[command(subcommand)]
    Clients(ClientsCommand),
    /// Treasury accounts.
    #[command(subcommand)]
    Accounts(AccountsCommand),
    /// Ledger entries.
    #[command(subcommand)]
    Tx(TxCommand),
    #[command(subcommand)]
    Invoices(InvoicesCommand),
    #[command(subcommand)]
    Quotes(QuotesCommand),
    /// Invoice payments; every change reconciles invoice status.
    #[command(subcommand)]
    Payments(PaymentsCommand),
    #[command(subcommand)]
    Products(ProductsCommand),
    /// Decision log.
    #[command(subcommand)]
    Decisions(DecisionsCommand),
    /// Dashboard aggregates.
    #[command(subcommand)]
    Overview(OverviewCommand),
    /// Raw key-value storage maintenance.
    #[command(subcommand)]
    Storage(StorageCommand),
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct RangeArgs {
    /// First day included.
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
    /// Last day included.
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
}

impl From<RangeArgs> for DateRange {
    fn from(value: RangeArgs) -> Self {
        DateRange {
            start: value.from,
            end: value.to,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ClientsCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_parser = parse_wire::<ClientKind>)]
        kind: Option<ClientKind>,
    },
    Show {
        id: String,
    },
    /// Resolves a contact by name; prints null when missing or ambiguous.
    Find {
        name: String,
    },
    /// Resolves a contact by name, creating it when missing.
    Ensure {
        name: String,
    },
    Add {
        name: String,
        #[arg(long, value_parser = parse_wire::<ClientKind>, default_value = "empresa")]
        kind: ClientKind,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_wire::<ClientKind>)]
        kind: Option<ClientKind>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AccountsCommand {
    List,
    Show {
        id: String,
    },
    Add {
        name: String,
        #[arg(long, value_parser = parse_wire::<AccountKind>, default_value = "cash")]
        kind: AccountKind,
        #[arg(long)]
        currency: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_wire::<AccountKind>)]
        kind: Option<AccountKind>,
        #[arg(long)]
        currency: Option<String>,
    },
    Remove {
        id: String,
    },
    /// Balance of every account derived from the whole ledger.
    Balances,
}

#[derive(Args, Debug, Default)]
pub struct TxFields {
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    reference: Option<String>,
    /// Id of a related record, e.g. an invoice.
    #[arg(long)]
    related: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TxCommand {
    List {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, value_parser = parse_wire::<TransactionKind>)]
        kind: Option<TransactionKind>,
        #[arg(long)]
        account: Option<String>,
    },
    /// Income or expense against one account.
    Add {
        #[arg(value_parser = parse_wire::<TransactionKind>)]
        kind: TransactionKind,
        #[arg(value_parser = parse_amount)]
        amount: Decimal,
        #[arg(long)]
        account: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[command(flatten)]
        fields: TxFields,
    },
    Transfer {
        #[arg(value_parser = parse_amount)]
        amount: Decimal,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[command(flatten)]
        fields: TxFields,
    },
    Update {
        id: String,
        #[arg(long, value_parser = parse_wire::<TransactionKind>)]
        kind: Option<TransactionKind>,
        #[arg(long, value_parser = parse_amount)]
        amount: Option<Decimal>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        account: Option<String>,
        #[arg(long = "from-account")]
        from_account: Option<String>,
        #[arg(long = "to-account")]
        to_account: Option<String>,
        #[command(flatten)]
        fields: TxFields,
    },
    Remove {
        id: String,
    },
    Summary {
        #[command(flatten)]
        range: RangeArgs,
    },
    Daily {
        #[command(flatten)]
        range: RangeArgs,
    },
    Categories {
        #[command(flatten)]
        range: RangeArgs,
    },
    IncomeByAccount {
        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum InvoicesCommand {
    List,
    Show {
        id: String,
    },
    Add {
        number: String,
        #[arg(value_parser = parse_amount)]
        total: Decimal,
        /// Contact name; created when unknown.
        #[arg(long)]
        client: Option<String>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_wire::<InvoiceStatus>, default_value = "draft")]
        status: InvoiceStatus,
    },
    Update {
        id: String,
        #[arg(long)]
        number: Option<String>,
        #[arg(long, value_parser = parse_amount)]
        total: Option<Decimal>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_wire::<InvoiceStatus>)]
        status: Option<InvoiceStatus>,
    },
    Remove {
        id: String,
    },
    /// Paid amount and outstanding balance per invoice.
    Balances {
        ids: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum QuotesCommand {
    List,
    Add {
        number: String,
        #[arg(value_parser = parse_amount)]
        total: Decimal,
        #[arg(long)]
        client: Option<String>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_wire::<QuoteStatus>, default_value = "draft")]
        status: QuoteStatus,
    },
    Update {
        id: String,
        #[arg(long)]
        number: Option<String>,
        #[arg(long, value_parser = parse_amount)]
        total: Option<Decimal>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_wire::<QuoteStatus>)]
        status: Option<QuoteStatus>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PaymentsCommand {
    List {
        #[arg(long)]
        invoice: Option<String>,
        #[command(flatten)]
        range: RangeArgs,
    },
    Add {
        invoice: String,
        #[arg(value_parser = parse_amount)]
        amount: Decimal,
        /// Free-form label such as `transferencia` or `mercado pago`.
        #[arg(long, value_parser = parse_method, default_value = "other")]
        method: PaymentMethod,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        reference: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        invoice: Option<String>,
        #[arg(long, value_parser = parse_amount)]
        amount: Option<Decimal>,
        #[arg(long, value_parser = parse_method)]
        method: Option<PaymentMethod>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        reference: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Remove {
        id: String,
    },
    Paid {
        invoice: String,
    },
    Summary {
        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProductsCommand {
    List {
        #[arg(long, value_parser = parse_wire::<ProductKind>)]
        kind: Option<ProductKind>,
        #[arg(long)]
        search: Option<String>,
        /// Only active entries.
        #[arg(long)]
        active: bool,
    },
    Add {
        name: String,
        #[arg(value_parser = parse_amount)]
        price: Decimal,
        #[arg(long, value_parser = parse_amount, default_value = "0")]
        cost: Decimal,
        #[arg(long, value_parser = parse_wire::<ProductKind>, default_value = "service")]
        kind: ProductKind,
        #[arg(long, default_value_t = 0)]
        stock: u32,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_amount)]
        price: Option<Decimal>,
        #[arg(long, value_parser = parse_amount)]
        cost: Option<Decimal>,
        #[arg(long, value_parser = parse_wire::<ProductKind>)]
        kind: Option<ProductKind>,
        #[arg(long)]
        stock: Option<u32>,
    },
    Activate {
        id: String,
    },
    Deactivate {
        id: String,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DecisionsCommand {
    List {
        #[arg(long, value_parser = parse_wire::<DecisionStatus>)]
        status: Option<DecisionStatus>,
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        title: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    Close {
        id: String,
    },
    Reopen {
        id: String,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum OverviewCommand {
    Treasury {
        #[command(flatten)]
        range: RangeArgs,
    },
    Sales,
}

#[derive(Subcommand, Debug)]
pub enum StorageCommand {
    /// Lists stored keys.
    Keys,
    /// Deletes every console list; the next read seeds them again.
    Reset,
}

pub fn run(command: Command, store: SqliteRecordStore<'_>, config: &AppConfig) -> Result<Value> {
    match command {
        Command::Clients(cmd) => clients(cmd, store),
        Command::Accounts(cmd) => accounts(cmd, store, config),
        Command::Tx(cmd) => ledger(cmd, store),
        Command::Invoices(cmd) => invoices(cmd, store),
        Command::Quotes(cmd) => quotes(cmd, store),
        Command::Payments(cmd) => payments(cmd, store),
        Command::Products(cmd) => products(cmd, store),
        Command::Decisions(cmd) => decisions(cmd, store),
        Command::Overview(cmd) => overview(cmd, store),
        Command::Storage(cmd) => storage(cmd, store),
    }
}

fn clients(cmd: ClientsCommand, store: SqliteRecordStore<'_>) -> Result<Value> {
    let service = ClientService::new(store);
    match cmd {
        ClientsCommand::List { search, kind } => {
            json(service.list_clients(&ClientListQuery { search, kind })?)
        }
        ClientsCommand::Show { id } => json(service.get_client_by_id(&id)?),
        ClientsCommand::Find { name } => json(service.find_client_by_name(&name)?),
        ClientsCommand::Ensure { name } => json(service.get_or_create_client_by_name(&name)?),
        ClientsCommand::Add {
            name,
            kind,
            email,
            phone,
            id,
        } => json(service.create_client(NewClient {
            id,
            name,
            kind,
            email,
            phone,
            created_at: None,
            updated_at: None,
        })?),
        ClientsCommand::Update {
            id,
            name,
            kind,
            email,
            phone,
        } => json(service.update_client(
            &id,
            ClientPatch {
                name,
                kind,
                email,
                phone,
                updated_at: None,
            },
        )?),
        ClientsCommand::Remove { id } => json(service.remove_client(&id)?),
    }
}

fn accounts(
    cmd: AccountsCommand,
    store: SqliteRecordStore<'_>,
    config: &AppConfig,
) -> Result<Value> {
    let service = AccountService::new(store).with_default_currency(&config.default_currency);
    match cmd {
        AccountsCommand::List => json(service.list_accounts()?),
        AccountsCommand::Show { id } => json(service.get_account(&id)?),
        AccountsCommand::Add {
            name,
            kind,
            currency,
        } => json(service.create_account(NewAccount {
            id: None,
            name,
            kind,
            currency,
            created_at: None,
            updated_at: None,
        })?),
        AccountsCommand::Update {
            id,
            name,
            kind,
            currency,
        } => json(service.update_account(
            &id,
            AccountPatch {
                name,
                kind,
                currency,
                updated_at: None,
            },
        )?),
        AccountsCommand::Remove { id } => json(service.remove_account(&id)?),
        AccountsCommand::Balances => {
            let ids: Vec<String> = service
                .list_accounts()?
                .into_iter()
                .map(|account| account.id)
                .collect();
            json(TransactionService::new(store).account_balances(&ids)?)
        }
    }
}

fn ledger(cmd: TxCommand, store: SqliteRecordStore<'_>) -> Result<Value> {
    let service = TransactionService::new(store);
    match cmd {
        TxCommand::List {
            range,
            kind,
            account,
        } => json(service.list_transactions(&TransactionFilter {
            range: range.into(),
            kind,
            account_id: account,
        })?),
        TxCommand::Add {
            kind,
            amount,
            account,
            date,
            fields,
        } => {
            if kind == TransactionKind::Transfer {
                bail!("use `tx transfer` for transfers between accounts");
            }
            let new = NewTransaction::single(kind, date.unwrap_or_else(today), amount, account);
            json(service.create_transaction(with_fields(new, fields))?)
        }
        TxCommand::Transfer {
            amount,
            from,
            to,
            date,
            fields,
        } => {
            let new = NewTransaction::transfer(date.unwrap_or_else(today), amount, from, to);
            json(service.create_transaction(with_fields(new, fields))?)
        }
        TxCommand::Update {
            id,
            kind,
            amount,
            date,
            account,
            from_account,
            to_account,
            fields,
        } => json(service.update_transaction(
            &id,
            TransactionPatch {
                date,
                kind,
                amount,
                account_id: account,
                from_account_id: from_account,
                to_account_id: to_account,
                category: fields.category,
                description: fields.description,
                reference: fields.reference,
                related_entity: fields.related,
                updated_at: None,
            },
        )?),
        TxCommand::Remove { id } => json(service.remove_transaction(&id)?),
        TxCommand::Summary { range } => {
            json(service.transactions_summary(&TransactionFilter::within(range.into()))?)
        }
        TxCommand::Daily { range } => {
            json(service.daily_net_series(&TransactionFilter::within(range.into()))?)
        }
        TxCommand::Categories { range } => {
            json(service.expense_by_category(&TransactionFilter::within(range.into()))?)
        }
        TxCommand::IncomeByAccount { range } => {
            json(service.income_by_account(&TransactionFilter::within(range.into()))?)
        }
    }
}

fn with_fields(mut new: NewTransaction, fields: TxFields) -> NewTransaction {
    new.category = fields.category;
    new.description = fields.description;
    new.reference = fields.reference;
    new.related_entity = fields.related;
    new
}

fn invoices(cmd: InvoicesCommand, store: SqliteRecordStore<'_>) -> Result<Value> {
    let service = InvoiceService::new(store);
    match cmd {
        InvoicesCommand::List => json(service.list_invoices()?),
        InvoicesCommand::Show { id } => json(service.invoice_snapshot(&id)?),
        InvoicesCommand::Add {
            number,
            total,
            client,
            date,
            status,
        } => {
            let (client_id, client_name) = resolve_client(store, client)?;
            json(service.create_invoice(NewInvoice {
                id: None,
                number,
                client_id,
                client_name,
                date: date.unwrap_or_else(today),
                status,
                total,
                created_at: None,
                updated_at: None,
            })?)
        }
        InvoicesCommand::Update {
            id,
            number,
            total,
            date,
            status,
        } => json(service.update_invoice(
            &id,
            InvoicePatch {
                number,
                date,
                status,
                total,
                ..InvoicePatch::default()
            },
        )?),
        InvoicesCommand::Remove { id } => json(service.delete_invoice(&id)?),
        InvoicesCommand::Balances { ids } => {
            let ids = if ids.is_empty() {
                service
                    .list_invoices()?
                    .into_iter()
                    .map(|invoice| invoice.id)
                    .collect()
            } else {
                ids
            };
            json(PaymentService::new(store).invoice_payment_summaries(&ids)?)
        }
    }
}

fn quotes(cmd: QuotesCommand, store: SqliteRecordStore<'_>) -> Result<Value> {
    let service = QuoteService::new(store);
    match cmd {
        QuotesCommand::List => json(service.list_quotes()?),
        QuotesCommand::Add {
            number,
            total,
            client,
            date,
            status,
        } => {
            let (client_id, client_name) = resolve_client(store, client)?;
            json(service.create_quote(NewQuote {
                id: None,
                number,
                client_id,
                client_name,
                date: date.unwrap_or_else(today),
                status,
                total,
            })?)
        }
        QuotesCommand::Update {
            id,
            number,
            total,
            date,
            status,
        } => json(service.update_quote(
            &id,
            QuotePatch {
                number,
                date,
                status,
                total,
                ..QuotePatch::default()
            },
        )?),
    }
}

/// Links a sales document to a contact, creating the contact when needed.
fn resolve_client(
    store: SqliteRecordStore<'_>,
    name: Option<String>,
) -> Result<(Option<String>, Option<String>)> {
    let Some(name) = name.filter(|value| !value.trim().is_empty()) else {
        return Ok((None, None));
    };
    let client = ClientService::new(store).get_or_create_client_by_name(&name)?;
    Ok((Some(client.id), Some(client.name)))
}

fn payments(cmd: PaymentsCommand, store: SqliteRecordStore<'_>) -> Result<Value> {
    let service = PaymentService::new(store);
    match cmd {
        PaymentsCommand::List { invoice, range } => json(service.list_payments(&PaymentFilter {
            invoice_id: invoice,
            range: range.into(),
        })?),
        PaymentsCommand::Add {
            invoice,
            amount,
            method,
            date,
            reference,
            notes,
        } => {
            let mut new = NewPayment::new(invoice, date.unwrap_or_else(today), amount, method);
            new.reference = reference;
            new.notes = notes;
            json(service.create_payment(new)?)
        }
        PaymentsCommand::Update {
            id,
            invoice,
            amount,
            method,
            date,
            reference,
            notes,
        } => json(service.update_payment(
            &id,
            PaymentPatch {
                invoice_id: invoice,
                date,
                amount,
                method,
                reference,
                notes,
                updated_at: None,
            },
        )?),
        PaymentsCommand::Remove { id } => json(service.remove_payment(&id)?),
        PaymentsCommand::Paid { invoice } => json(service.paid_amount(&invoice)?),
        PaymentsCommand::Summary { range } => json(service.payments_summary(range.into())?),
    }
}

fn products(cmd: ProductsCommand, store: SqliteRecordStore<'_>) -> Result<Value> {
    let service = ProductService::new(store);
    match cmd {
        ProductsCommand::List {
            kind,
            search,
            active,
        } => json(service.list_products(&ProductListQuery {
            kind,
            search,
            active: active.then_some(true),
        })?),
        ProductsCommand::Add {
            name,
            price,
            cost,
            kind,
            stock,
        } => json(service.create_product(NewProduct {
            id: None,
            name,
            kind,
            price,
            cost,
            stock,
            active: true,
        })?),
        ProductsCommand::Update {
            id,
            name,
            price,
            cost,
            kind,
            stock,
        } => json(service.update_product(
            &id,
            ProductPatch {
                name,
                kind,
                price,
                cost,
                stock,
                active: None,
            },
        )?),
        ProductsCommand::Activate { id } => json(service.set_product_active(&id, true)?),
        ProductsCommand::Deactivate { id } => json(service.set_product_active(&id, false)?),
        ProductsCommand::Remove { id } => json(service.remove_product(&id)?),
    }
}

fn decisions(cmd: DecisionsCommand, store: SqliteRecordStore<'_>) -> Result<Value> {
    let service = DecisionService::new(store);
    match cmd {
        DecisionsCommand::List { status, search } => {
            json(service.list_decisions(&DecisionListQuery { status, search })?)
        }
        DecisionsCommand::Add { title, date, notes } => {
            json(service.create_decision(NewDecision {
                id: None,
                title,
                date: date.unwrap_or_else(today),
                status: DecisionStatus::Open,
                notes,
            })?)
        }
        DecisionsCommand::Update {
            id,
            title,
            date,
            notes,
        } => json(service.update_decision(
            &id,
            DecisionPatch {
                title,
                date,
                notes,
                status: None,
            },
        )?),
        DecisionsCommand::Close { id } => {
            json(service.set_decision_status(&id, DecisionStatus::Closed)?)
        }
        DecisionsCommand::Reopen { id } => {
            json(service.set_decision_status(&id, DecisionStatus::Open)?)
        }
        DecisionsCommand::Remove { id } => json(service.remove_decision(&id)?),
    }
}

fn overview(cmd: OverviewCommand, store: SqliteRecordStore<'_>) -> Result<Value> {
    match cmd {
        OverviewCommand::Treasury { range } => {
            json(TreasuryAnalytics::new(store).treasury_overview(range.into())?)
        }
        OverviewCommand::Sales => json(SalesAnalytics::new(store).sales_overview()?),
    }
}

fn storage(cmd: StorageCommand, store: SqliteRecordStore<'_>) -> Result<Value> {
    let conn = store.connection();
    match cmd {
        StorageCommand::Keys => json(kv_keys(conn)?),
        StorageCommand::Reset => {
            let mut removed = Vec::new();
            for key in kv_keys(conn)? {
                if key.starts_with(STORAGE_PREFIX) && kv_delete(conn, &key)? {
                    removed.push(key);
                }
            }
            log::info!(
                "event=storage_reset module=cli status=ok keys={}",
                removed.len()
            );
            json(removed)
        }
    }
}

fn json(value: impl Serialize) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    normalize_date(raw).ok_or_else(|| format!("unrecognized date `{raw}`"))
}

fn parse_amount(raw: &str) -> Result<Decimal, String> {
    normalize_amount(raw).ok_or_else(|| format!("unrecognized amount `{raw}`"))
}

fn parse_method(raw: &str) -> Result<PaymentMethod, String> {
    Ok(PaymentMethod::normalize(raw))
}

/// Parses a lowercase stored value such as `empresa` or `income`.
fn parse_wire<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(Value::String(raw.trim().to_lowercase()))
        .map_err(|_| format!("unknown value `{raw}`"))
}
