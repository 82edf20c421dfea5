//! Ledger Query Params - parameter resolution and validation for the
//! read-only ledger query API.
//!
//! Turns raw query-string fields into validated, typed storage queries, and
//! enriches result pages with a single batched secondary lookup.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                         LEDGER QUERY PARAMS                          │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │   RawQueryParams + RequestContext  (from the HTTP layer)             │
//! │                │                                                     │
//! │  ┌─────────────┴──────────────┐     ┌──────────────────────────┐     │
//! │  │        QueryBinder         │◄────│   ValidationRegistry     │     │
//! │  │  per-field rule tables     │     │   (built once, frozen)   │     │
//! │  └─────────────┬──────────────┘     └──────────────────────────┘     │
//! │                │                                                     │
//! │  ┌─────────────┴──────────────┐  ┌──────────────────────────┐        │
//! │  │      CursorResolver        │  │      AssetSelector       │        │
//! │  │  override > now > cursor   │  │  selling / buying sides  │        │
//! │  └─────────────┬──────────────┘  └────────────┬─────────────┘        │
//! │                └──────────────┬───────────────┘                      │
//! │                         OffersQuery                                  │
//! │                               │                                      │
//! │  ┌────────────────────────────┴───────────────────────────────┐      │
//! │  │  PageAssembler: OfferStore → BatchEnrichmentCache → build  │      │
//! │  └────────────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ledger_query_params::{GetOffersHandler, PageAssembler, QueryConfig};
//!
//! let assembler = Arc::new(PageAssembler::new(QueryConfig::from_env()?, store.clone())?);
//! let offers = GetOffersHandler::new(assembler.clone(), store);
//! let ctx = assembler.request_context(headers);
//! let page = offers.get_resource_page(&raw, &ctx).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod asset_selector;
pub mod cursor;
pub mod domain;
pub mod enrichment;
pub mod ports;
pub mod query;
pub mod service;
pub mod telemetry;
pub mod validation;

// Re-exports for public API
pub use adapters::InMemoryLedgerStore;
pub use asset_selector::{AssetSelector, Side};
pub use cursor::{CursorResolver, RequestContext};
pub use domain::*;
pub use enrichment::{enrich, BatchEnrichmentCache};
pub use ports::{BatchLoader, LedgerStateSource, OfferStore, ResourcePageHandler};
pub use query::{
    AccountOffersQueryParams, OffersQuery, OffersQueryParams, PageQueryParams,
    SellingBuyingAssetQueryParams,
};
pub use service::{GetAccountOffersHandler, GetOffersHandler, PageAssembler};
pub use telemetry::{init_logging, TelemetryConfig, TelemetryError};
pub use validation::{QueryBinder, QueryShape, RawQueryParams, ValidationRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
