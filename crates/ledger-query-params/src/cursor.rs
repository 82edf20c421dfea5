//! # Cursor Resolver
//!
//! Builds the canonical [`PageDirective`] from already-validated raw fields
//! and the live request context.
//!
//! ## Cursor Precedence
//!
//! ```text
//! 1. resume token (e.g. Last-Event-ID)  non-empty ⇒ wins outright
//! 2. cursor == "now"                    ⇒ TOID after the latest ledger
//! 3. cursor field                       ⇒ forwarded verbatim
//! 4. empty                              ⇒ start of range
//! ```
//!
//! Only step 2 touches live state; a failure there is an upstream fault.

use crate::domain::{Order, PageDirective, QueryConfig, QueryError, QueryResult, TotalOrderId};
use crate::ports::LedgerStateSource;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-request values that do not come from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    resume_token: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resume_token(mut self, token: impl Into<String>) -> Self {
        self.resume_token = Some(token.into());
        self
    }

    /// Pick the resume token out of request headers. Header names compare
    /// case-insensitively.
    pub fn from_headers<'a, I>(headers: I, header_name: &str) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let resume_token = headers
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(header_name))
            .map(|(_, value)| value.to_string());
        Self { resume_token }
    }

    /// The resume token, if present and non-empty.
    pub fn resume_token(&self) -> Option<&str> {
        self.resume_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Resolves pagination fields into a [`PageDirective`].
#[derive(Clone)]
pub struct CursorResolver {
    config: Arc<QueryConfig>,
    ledger_state: Arc<dyn LedgerStateSource>,
}

impl fmt::Debug for CursorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CursorResolver {
    pub fn new(config: Arc<QueryConfig>, ledger_state: Arc<dyn LedgerStateSource>) -> Self {
        Self {
            config,
            ledger_state,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Resolve validated `cursor`, `order` and `limit` values.
    pub fn resolve(
        &self,
        cursor: &str,
        order: &str,
        limit: &str,
        ctx: &RequestContext,
    ) -> QueryResult<PageDirective> {
        let limit = self.resolve_limit(limit)?;
        let order = self.resolve_order(order)?;
        let cursor = self.resolve_cursor(cursor, ctx)?;

        PageDirective::new(cursor, order, limit)
            .ok_or_else(|| QueryError::internal(format!("limit {} out of range", limit)))
    }

    fn resolve_limit(&self, limit: &str) -> QueryResult<u64> {
        if limit.is_empty() {
            return Ok(self.config.default_page_size);
        }

        let parsed: u64 = limit
            .parse()
            .map_err(|_| QueryError::internal(format!("unvalidated limit {:?}", limit)))?;
        if parsed == 0 || parsed > self.config.max_page_size {
            return Err(QueryError::internal(format!(
                "unvalidated limit {}",
                parsed
            )));
        }
        Ok(parsed)
    }

    fn resolve_order(&self, order: &str) -> QueryResult<Order> {
        if order.is_empty() {
            return Ok(self.config.default_order);
        }
        order
            .parse()
            .map_err(|_| QueryError::internal(format!("unvalidated order {:?}", order)))
    }

    fn resolve_cursor(&self, cursor: &str, ctx: &RequestContext) -> QueryResult<String> {
        if let Some(token) = ctx.resume_token() {
            debug!(token, "Cursor taken from resume token");
            return Ok(token.to_string());
        }

        if cursor == self.config.now_sentinel {
            let sequence = self.ledger_state.current_upper_bound().map_err(|e| {
                warn!(error = %e, "Live ledger state unavailable");
                QueryError::upstream("ledger state", e)
            })?;
            let ledger = i32::try_from(sequence).map_err(|_| {
                QueryError::internal(format!("ledger sequence {} exceeds the TOID range", sequence))
            })?;
            let toid = TotalOrderId::after_ledger(ledger);
            debug!(sequence, cursor = %toid, "Resolved \"now\" cursor");
            return Ok(toid.to_string());
        }

        Ok(cursor.to_string())
    }
}
