//! # Page Directive
//!
//! The canonical keyset-pagination instruction handed to storage. Built once
//! per request by the cursor resolver and immutable afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Page size used when `limit` is omitted.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Hard upper bound for `limit`.
pub const MAX_PAGE_SIZE: u64 = 200;

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

impl FromStr for Order {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Order::Asc),
            "desc" => Ok(Order::Desc),
            _ => Err("valid values are asc or desc"),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved pagination directive.
///
/// `cursor` is empty for start-of-range or an opaque token comparable in
/// `order`. `limit` is always within `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDirective {
    cursor: String,
    order: Order,
    limit: u64,
}

impl PageDirective {
    /// Returns `None` when `limit` falls outside `1..=MAX_PAGE_SIZE`.
    pub fn new(cursor: impl Into<String>, order: Order, limit: u64) -> Option<Self> {
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return None;
        }
        Some(Self {
            cursor: cursor.into(),
            order,
            limit,
        })
    }

    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Numeric keyset bound for integer-keyed storage.
    ///
    /// An empty cursor is the start of the range: `0` ascending,
    /// `i64::MAX` descending. Non-numeric tokens yield `None`.
    pub fn cursor_bound(&self) -> Option<i64> {
        if self.cursor.is_empty() {
            return Some(match self.order {
                Order::Asc => 0,
                Order::Desc => i64::MAX,
            });
        }
        self.cursor.parse().ok()
    }
}

/// Total-order identifier: ledger, transaction and operation packed into an `i64`.
///
/// ```text
///  63        32 31             12 11        0
/// ┌────────────┬─────────────────┬───────────┐
/// │   ledger   │   transaction   │ operation │
/// └────────────┴─────────────────┴───────────┘
/// ```
///
/// The ledger half is a signed 32-bit sequence, so ids stay non-negative for
/// every ledger in `0..=i32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TotalOrderId(i64);

impl TotalOrderId {
    pub const TRANSACTION_MASK: i64 = (1 << 20) - 1;
    pub const OPERATION_MASK: i64 = (1 << 12) - 1;

    pub fn new(ledger: i32, transaction: i64, operation: i64) -> Self {
        Self(
            (i64::from(ledger) << 32)
                | ((transaction & Self::TRANSACTION_MASK) << 12)
                | (operation & Self::OPERATION_MASK),
        )
    }

    /// The last position inside `ledger`, i.e. everything after it sorts higher.
    pub fn after_ledger(ledger: i32) -> Self {
        Self::new(ledger, Self::TRANSACTION_MASK, Self::OPERATION_MASK)
    }

    pub fn ledger(&self) -> i32 {
        (self.0 >> 32) as i32
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TotalOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
