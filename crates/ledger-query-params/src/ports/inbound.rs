//! # Inbound Ports (Driving Ports)
//!
//! Resource endpoints exposed to the HTTP layer. The HTTP layer extracts raw
//! fields and headers; everything from binding to response construction
//! happens behind this trait.

use crate::cursor::RequestContext;
use crate::domain::QueryResult;
use crate::validation::RawQueryParams;
use async_trait::async_trait;

/// One paginated resource collection.
#[async_trait]
pub trait ResourcePageHandler: Send + Sync {
    type Resource: Send;

    /// Build one page of resources.
    ///
    /// ## Returns
    ///
    /// - `Ok(resources)`: in storage order, possibly empty
    /// - `Err(QueryError::Validation)`: caller input rejected, storage untouched
    /// - `Err(_)`: server-side failure
    async fn get_resource_page(
        &self,
        raw: &RawQueryParams,
        ctx: &RequestContext,
    ) -> QueryResult<Vec<Self::Resource>>;
}
