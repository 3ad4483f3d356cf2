//! `SeaORM` entity definitions.

pub mod accounting_documents;
pub mod accounts;
pub mod api_keys;
pub mod companies;
pub mod contacts;
pub mod document_lines;
pub mod journals;
pub mod ledger_entries;
pub mod products;
pub mod rides;
pub mod sea_orm_active_enums;
pub mod subscriptions;
pub mod wallets;
