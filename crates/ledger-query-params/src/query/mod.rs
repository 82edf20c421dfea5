//! # Query Shapes
//!
//! Typed parameter structs bound from raw query fields, and the structured
//! query handed to storage.
//!
//! Shapes compose: an endpoint's shape embeds the shared page and asset
//! shapes and concatenates their field tables in declaration order.

pub mod assets;
pub mod offers;
pub mod page;

pub use assets::SellingBuyingAssetQueryParams;
pub use offers::{AccountOffersQueryParams, OffersQuery, OffersQueryParams};
pub use page::PageQueryParams;
