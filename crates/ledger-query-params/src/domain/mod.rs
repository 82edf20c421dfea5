//! # Domain Layer
//!
//! Pure types for the query layer: account and asset identities, pagination
//! directives, storage records, configuration and the error taxonomy.
//!
//! This module contains NO I/O dependencies. Storage and live ledger state are
//! reached through the traits in `ports`.

pub mod account;
pub mod asset;
pub mod config;
pub mod error;
pub mod page;
pub mod records;

pub use account::{AccountId, AccountIdError, ACCOUNT_ID_LEN};
pub use asset::{is_valid_code, Asset, AssetError, AssetType};
pub use config::QueryConfig;
pub use error::{
    ConfigurationError, FieldError, Problem, ProblemExtras, QueryError, QueryResult,
    StorageError, ValidationError,
};
pub use page::{Order, PageDirective, TotalOrderId, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use records::{format_amount, LedgerRecord, OfferRecord, OfferResponse, Price};
