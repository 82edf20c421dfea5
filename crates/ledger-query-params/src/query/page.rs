//! Pagination fields shared by every collection endpoint.

use crate::cursor::{CursorResolver, RequestContext};
use crate::domain::{PageDirective, QueryResult};
use crate::validation::rules;
use crate::validation::{FieldLookup, FieldSpec, QueryShape, RawQueryParams, RuleRef};

const CURSOR_RULES: &[RuleRef] = &[RuleRef::new(rules::CURSOR)];
const ORDER_RULES: &[RuleRef] = &[RuleRef::new(rules::ORDER)];
const LIMIT_RULES: &[RuleRef] = &[RuleRef::new(rules::LIMIT)];

/// Raw `cursor`, `order` and `limit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQueryParams {
    pub cursor: String,
    pub order: String,
    pub limit: String,
}

impl PageQueryParams {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("cursor", CURSOR_RULES),
        FieldSpec::new("order", ORDER_RULES),
        FieldSpec::new("limit", LIMIT_RULES),
    ];

    /// Resolve into the canonical page directive.
    pub fn page_directive(
        &self,
        resolver: &CursorResolver,
        ctx: &RequestContext,
    ) -> QueryResult<PageDirective> {
        resolver.resolve(&self.cursor, &self.order, &self.limit, ctx)
    }
}

impl FieldLookup for PageQueryParams {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "cursor" => Some(&self.cursor),
            "order" => Some(&self.order),
            "limit" => Some(&self.limit),
            _ => None,
        }
    }
}

impl QueryShape for PageQueryParams {
    fn fields() -> Vec<FieldSpec> {
        Self::FIELDS.to_vec()
    }

    fn from_raw(raw: &RawQueryParams) -> Self {
        Self {
            cursor: raw.get_string("cursor"),
            order: raw.get_string("order"),
            limit: raw.get_string("limit"),
        }
    }
}
