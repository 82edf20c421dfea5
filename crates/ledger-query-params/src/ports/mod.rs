//! # Ports
//!
//! - `inbound`: what the HTTP layer calls.
//! - `outbound`: what the query layer needs from storage and live state.

pub mod inbound;
pub mod outbound;

pub use inbound::ResourcePageHandler;
pub use outbound::{BatchLoader, LedgerStateSource, OfferStore};
