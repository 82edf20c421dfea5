//! # Page Assembly
//!
//! ```text
//! RawQueryParams ─► bind ─► resolve page + assets ─► OfferStore::get_offers
//!                                                          │
//!            OfferResponse[] ◄─ populate ◄─ enrich (1 batch load)
//! ```
//!
//! Storage order is preserved end to end. Field failures stop the request
//! before storage is touched.

use crate::cursor::{CursorResolver, RequestContext};
use crate::domain::{
    ConfigurationError, LedgerRecord, OfferResponse, PageDirective, QueryConfig, QueryError,
    QueryResult,
};
use crate::enrichment::enrich;
use crate::ports::{BatchLoader, LedgerStateSource, OfferStore, ResourcePageHandler};
use crate::query::{AccountOffersQueryParams, OffersQuery, OffersQueryParams, PageQueryParams};
use crate::validation::{QueryBinder, QueryShape, RawQueryParams, ValidationRegistry};
use async_trait::async_trait;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Binds, resolves and enriches pages. Shared by every endpoint handler.
#[derive(Debug, Clone)]
pub struct PageAssembler {
    binder: QueryBinder,
    resolver: CursorResolver,
}

impl PageAssembler {
    /// Build with the standard rule set.
    pub fn new(
        config: QueryConfig,
        ledger_state: Arc<dyn LedgerStateSource>,
    ) -> Result<Self, ConfigurationError> {
        let registry = ValidationRegistry::standard(&config)?;
        Self::with_registry(Arc::new(config), Arc::new(registry), ledger_state)
    }

    /// Build from an existing registry. Every offer shape is checked against
    /// it here, so a missing rule fails at startup.
    pub fn with_registry(
        config: Arc<QueryConfig>,
        registry: Arc<ValidationRegistry>,
        ledger_state: Arc<dyn LedgerStateSource>,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let binder = QueryBinder::new(registry);
        binder.check_shape::<OffersQueryParams>()?;
        binder.check_shape::<AccountOffersQueryParams>()?;

        Ok(Self {
            binder,
            resolver: CursorResolver::new(config, ledger_state),
        })
    }

    pub fn bind<T: QueryShape>(&self, raw: &RawQueryParams) -> QueryResult<T> {
        self.binder.bind(raw)
    }

    /// Request context read from headers, using the configured resume header.
    pub fn request_context<'a, I>(&self, headers: I) -> RequestContext
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        RequestContext::from_headers(headers, &self.resolver.config().resume_header)
    }

    pub fn page_directive(
        &self,
        page: &PageQueryParams,
        ctx: &RequestContext,
    ) -> QueryResult<PageDirective> {
        page.page_directive(&self.resolver, ctx)
    }

    /// Enrich `records` with one batch load and build each response.
    ///
    /// `build` receives records in their original order; a key missing from
    /// the batch result is passed as `None`.
    pub async fn assemble<R, K, V, L, O, F, B>(
        &self,
        records: Vec<R>,
        key_of: F,
        loader: &L,
        build: B,
    ) -> QueryResult<Vec<O>>
    where
        K: Eq + Hash + Clone + Send + Sync,
        V: Clone,
        L: BatchLoader<K, V> + ?Sized,
        F: Fn(&R) -> K,
        B: Fn(R, Option<&V>) -> O,
    {
        let enriched = enrich(records, key_of, loader).await.map_err(|e| {
            warn!(error = %e, "Enrichment batch load failed");
            QueryError::upstream("ledger batch load", e)
        })?;

        Ok(enriched
            .into_iter()
            .map(|(record, value)| build(record, value.as_ref()))
            .collect())
    }
}

/// Run an offer query and attach ledger close times.
async fn offers_page<S>(
    assembler: &PageAssembler,
    store: &S,
    query: &OffersQuery,
) -> QueryResult<Vec<OfferResponse>>
where
    S: OfferStore + BatchLoader<u32, LedgerRecord> + ?Sized,
{
    let records = store.get_offers(query).await.map_err(|e| {
        warn!(error = %e, "Offer query failed");
        QueryError::upstream("offer query", e)
    })?;

    let offers = assembler
        .assemble(
            records,
            |record| record.last_modified_ledger,
            store,
            OfferResponse::populate,
        )
        .await?;

    debug!(count = offers.len(), "Offer page assembled");
    Ok(offers)
}

/// `/offers`
pub struct GetOffersHandler<S> {
    assembler: Arc<PageAssembler>,
    store: Arc<S>,
}

impl<S> GetOffersHandler<S> {
    pub fn new(assembler: Arc<PageAssembler>, store: Arc<S>) -> Self {
        Self { assembler, store }
    }
}

#[async_trait]
impl<S> ResourcePageHandler for GetOffersHandler<S>
where
    S: OfferStore + BatchLoader<u32, LedgerRecord> + 'static,
{
    type Resource = OfferResponse;

    #[instrument(skip(self, raw, ctx))]
    async fn get_resource_page(
        &self,
        raw: &RawQueryParams,
        ctx: &RequestContext,
    ) -> QueryResult<Vec<OfferResponse>> {
        let params: OffersQueryParams = self.assembler.bind(raw)?;

        let query = OffersQuery {
            page: self.assembler.page_directive(&params.page, ctx)?,
            seller: params.seller()?,
            selling: params.assets.selling()?,
            buying: params.assets.buying()?,
        };

        offers_page(&self.assembler, self.store.as_ref(), &query).await
    }
}

/// `/accounts/{account_id}/offers`
pub struct GetAccountOffersHandler<S> {
    assembler: Arc<PageAssembler>,
    store: Arc<S>,
}

impl<S> GetAccountOffersHandler<S> {
    pub fn new(assembler: Arc<PageAssembler>, store: Arc<S>) -> Self {
        Self { assembler, store }
    }
}

#[async_trait]
impl<S> ResourcePageHandler for GetAccountOffersHandler<S>
where
    S: OfferStore + BatchLoader<u32, LedgerRecord> + 'static,
{
    type Resource = OfferResponse;

    #[instrument(skip(self, raw, ctx))]
    async fn get_resource_page(
        &self,
        raw: &RawQueryParams,
        ctx: &RequestContext,
    ) -> QueryResult<Vec<OfferResponse>> {
        let params: AccountOffersQueryParams = self.assembler.bind(raw)?;

        let mut query = OffersQuery::new(self.assembler.page_directive(&params.page, ctx)?);
        query.seller = params.account_id()?;

        offers_page(&self.assembler, self.store.as_ref(), &query).await
    }
}
