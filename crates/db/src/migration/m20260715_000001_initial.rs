//! Initial database migration.
//!
//! Creates the enums, configuration tables, contact/wallet/ledger tables,
//! the accounting document store, rides, and subscriptions.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TENANCY & AUTH
        // ============================================================
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(API_KEYS_SQL).await?;

        // ============================================================
        // PART 3: LEDGER COLLABORATOR CONFIGURATION
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(JOURNALS_SQL).await?;
        db.execute_unprepared(PRODUCTS_SQL).await?;

        // ============================================================
        // PART 4: CONTACTS & WALLETS
        // ============================================================
        db.execute_unprepared(CONTACTS_SQL).await?;
        db.execute_unprepared(WALLETS_SQL).await?;
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;

        // ============================================================
        // PART 5: ACCOUNTING DOCUMENTS
        // ============================================================
        db.execute_unprepared(ACCOUNTING_DOCUMENTS_SQL).await?;
        db.execute_unprepared(DOCUMENT_LINES_SQL).await?;

        // ============================================================
        // PART 6: RIDES & SUBSCRIPTIONS
        // ============================================================
        db.execute_unprepared(RIDES_SQL).await?;
        db.execute_unprepared(SUBSCRIPTIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE entry_status AS ENUM ('draft', 'posted');
CREATE TYPE deposit_method AS ENUM ('direct', 'bank_transfer');
CREATE TYPE order_ref_kind AS ENUM ('payment', 'invoice', 'transfer_entry', 'subscription', 'contact', 'none');
CREATE TYPE contact_type AS ENUM ('driver', 'rider');
CREATE TYPE gender AS ENUM ('male', 'female');
CREATE TYPE ride_state AS ENUM ('draft', 'paid');
CREATE TYPE payment_mode AS ENUM ('cash_only', 'cash_exceed', 'wallet_paid', 'wallet_cash');
CREATE TYPE document_kind AS ENUM ('invoice', 'credit_note', 'payment', 'transfer_entry');
CREATE TYPE document_state AS ENUM ('draft', 'posted', 'cancelled');
CREATE TYPE payment_direction AS ENUM ('inbound', 'outbound');
CREATE TYPE journal_type AS ENUM ('general', 'sale');
CREATE TYPE journal_sub_type AS ENUM ('bank', 'fund', 'cash', 'tele');
CREATE TYPE account_type AS ENUM ('cash', 'receivable', 'liability', 'expense', 'revenue');
CREATE TYPE product_kind AS ENUM ('commission', 'fine', 'coupon', 'points', 'subscription');
CREATE TYPE subscription_type AS ENUM ('private', 'pinky', 'vip', 'van', 'taxi', 'other');
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    currency VARCHAR(3) NOT NULL,
    wallet_journal_id UUID,
    subscription_journal_id UUID,
    commission_product_id UUID,
    fine_product_id UUID,
    coupon_product_id UUID,
    points_product_id UUID,
    subscription_product_id UUID,
    bank_account_id UUID,
    bonus_account_id UUID,
    rider_wallet_account_id UUID,
    driver_wallet_account_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const API_KEYS_SQL: &str = r"
CREATE TABLE api_keys (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    label VARCHAR(255) NOT NULL,
    key_hash VARCHAR(64) NOT NULL UNIQUE,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_api_keys_company ON api_keys(company_id);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    code VARCHAR(32) NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    UNIQUE (company_id, code)
);
";

const JOURNALS_SQL: &str = r"
CREATE TABLE journals (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    journal_type journal_type NOT NULL,
    sub_type journal_sub_type,
    used_for_subscriptions BOOLEAN NOT NULL DEFAULT FALSE
);

CREATE INDEX idx_journals_company_sub_type ON journals(company_id, sub_type);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    kind product_kind NOT NULL,
    expense_account_id UUID REFERENCES accounts(id)
);
";

const CONTACTS_SQL: &str = r"
CREATE TABLE contacts (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    sub_id VARCHAR(64) NOT NULL,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255),
    mobile VARCHAR(32),
    city VARCHAR(128),
    gender gender,
    contact_type contact_type,
    receivable_account_id UUID REFERENCES accounts(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (company_id, sub_id),
    UNIQUE (company_id, mobile)
);

CREATE INDEX idx_contacts_company ON contacts(company_id);
";

const WALLETS_SQL: &str = r"
CREATE TABLE wallets (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    contact_id UUID NOT NULL UNIQUE REFERENCES contacts(id) ON DELETE CASCADE,
    balance NUMERIC(18, 4) NOT NULL DEFAULT 0,
    currency VARCHAR(3) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE ledger_entries (
    id UUID PRIMARY KEY,
    wallet_id UUID NOT NULL REFERENCES wallets(id) ON DELETE CASCADE,
    issued NUMERIC(18, 4) NOT NULL DEFAULT 0,
    used NUMERIC(18, 4) NOT NULL DEFAULT 0,
    status entry_status NOT NULL DEFAULT 'draft',
    description TEXT NOT NULL DEFAULT '',
    order_kind order_ref_kind NOT NULL DEFAULT 'none',
    order_id UUID,
    deposit_method deposit_method NOT NULL DEFAULT 'direct',
    reference VARCHAR(255),
    bank VARCHAR(255),
    account_number VARCHAR(64),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_ledger_entries_wallet_status ON ledger_entries(wallet_id, status);
CREATE INDEX idx_ledger_entries_order ON ledger_entries(order_kind, order_id);
";

const ACCOUNTING_DOCUMENTS_SQL: &str = r"
CREATE TABLE accounting_documents (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    kind document_kind NOT NULL,
    state document_state NOT NULL DEFAULT 'draft',
    partner_id UUID REFERENCES contacts(id),
    journal_id UUID REFERENCES journals(id),
    amount NUMERIC(18, 4) NOT NULL DEFAULT 0,
    direction payment_direction,
    transaction_id VARCHAR(128),
    reference TEXT,
    bank VARCHAR(255),
    account_number VARCHAR(64),
    image_url TEXT,
    decline_reason TEXT,
    platform_synced BOOLEAN NOT NULL DEFAULT FALSE,
    reconciled BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    posted_at TIMESTAMPTZ,
    UNIQUE (company_id, transaction_id)
);

CREATE INDEX idx_documents_company_kind ON accounting_documents(company_id, kind);
CREATE INDEX idx_documents_partner ON accounting_documents(partner_id);
";

const DOCUMENT_LINES_SQL: &str = r"
CREATE TABLE document_lines (
    id UUID PRIMARY KEY,
    document_id UUID NOT NULL REFERENCES accounting_documents(id) ON DELETE CASCADE,
    label VARCHAR(255) NOT NULL,
    partner_id UUID REFERENCES contacts(id),
    account_id UUID REFERENCES accounts(id),
    product_id UUID REFERENCES products(id),
    price_unit NUMERIC(18, 4) NOT NULL DEFAULT 0,
    debit NUMERIC(18, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(18, 4) NOT NULL DEFAULT 0
);

CREATE INDEX idx_document_lines_document ON document_lines(document_id);
";

const RIDES_SQL: &str = r"
CREATE TABLE rides (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    external_id VARCHAR(64) NOT NULL,
    rider_id UUID NOT NULL REFERENCES contacts(id),
    driver_id UUID NOT NULL REFERENCES contacts(id),
    fare_amount NUMERIC(18, 4) NOT NULL,
    wallet_paid NUMERIC(18, 4) NOT NULL DEFAULT 0,
    cash_paid NUMERIC(18, 4) NOT NULL DEFAULT 0,
    commission_amount NUMERIC(18, 4) NOT NULL DEFAULT 0,
    payment_mode payment_mode,
    state ride_state NOT NULL DEFAULT 'draft',
    paid_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (company_id, external_id)
);
";

const SUBSCRIPTIONS_SQL: &str = r"
CREATE TABLE subscriptions (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    contact_id UUID NOT NULL REFERENCES contacts(id),
    external_id VARCHAR(64) NOT NULL,
    subscription_type subscription_type NOT NULL,
    price NUMERIC(18, 4) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    invoice_id UUID REFERENCES accounting_documents(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (company_id, external_id)
);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS subscriptions;
DROP TABLE IF EXISTS rides;
DROP TABLE IF EXISTS document_lines;
DROP TABLE IF EXISTS accounting_documents;
DROP TABLE IF EXISTS ledger_entries;
DROP TABLE IF EXISTS wallets;
DROP TABLE IF EXISTS contacts;
DROP TABLE IF EXISTS products;
DROP TABLE IF EXISTS journals;
DROP TABLE IF EXISTS accounts;
DROP TABLE IF EXISTS api_keys;
DROP TABLE IF EXISTS companies;
DROP TYPE IF EXISTS subscription_type;
DROP TYPE IF EXISTS product_kind;
DROP TYPE IF EXISTS account_type;
DROP TYPE IF EXISTS journal_sub_type;
DROP TYPE IF EXISTS journal_type;
DROP TYPE IF EXISTS payment_direction;
DROP TYPE IF EXISTS document_state;
DROP TYPE IF EXISTS document_kind;
DROP TYPE IF EXISTS payment_mode;
DROP TYPE IF EXISTS ride_state;
DROP TYPE IF EXISTS gender;
DROP TYPE IF EXISTS contact_type;
DROP TYPE IF EXISTS order_ref_kind;
DROP TYPE IF EXISTS deposit_method;
DROP TYPE IF EXISTS entry_status;
";
