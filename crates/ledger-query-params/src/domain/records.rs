//! Storage records and the public response shapes built from them.

use super::account::AccountId;
use super::asset::Asset;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Stroops per whole unit.
const ONE: i64 = 10_000_000;

/// Offer row as returned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferRecord {
    pub offer_id: i64,
    pub seller_id: AccountId,
    pub selling: Asset,
    pub buying: Asset,
    /// Amount in stroops.
    pub amount: i64,
    pub price_n: i32,
    pub price_d: i32,
    /// Foreign key into the ledger headers.
    pub last_modified_ledger: u32,
}

/// Closed ledger header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    pub sequence: u32,
    pub closed_at: DateTime<Utc>,
}

/// Rational price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Price {
    pub n: i32,
    pub d: i32,
}

impl Price {
    /// Decimal rendering with 7 fractional digits, rounded half away from zero.
    pub fn to_decimal_string(&self) -> String {
        if self.d == 0 {
            return "0.0000000".to_string();
        }
        let n = i128::from(self.n);
        let d = i128::from(self.d);
        let scaled = n * i128::from(ONE) * 2 / d;
        let rounded = (scaled + scaled.signum()) / 2;
        format_scaled(rounded)
    }
}

/// Render a stroop amount as a 7-decimal string.
pub fn format_amount(stroops: i64) -> String {
    format_scaled(i128::from(stroops))
}

fn format_scaled(value: i128) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    let one = ONE as u128;
    format!("{}{}.{:07}", sign, abs / one, abs % one)
}

/// Public offer representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferResponse {
    pub id: i64,
    pub paging_token: String,
    pub seller: AccountId,
    pub selling: Asset,
    pub buying: Asset,
    pub amount: String,
    pub price_r: Price,
    pub price: String,
    pub last_modified_ledger: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<DateTime<Utc>>,
}

impl OfferResponse {
    /// Populate from a record plus its (possibly missing) ledger.
    pub fn populate(record: OfferRecord, ledger: Option<&LedgerRecord>) -> Self {
        let price_r = Price {
            n: record.price_n,
            d: record.price_d,
        };
        Self {
            id: record.offer_id,
            paging_token: record.offer_id.to_string(),
            seller: record.seller_id,
            selling: record.selling,
            buying: record.buying,
            amount: format_amount(record.amount),
            price: price_r.to_decimal_string(),
            price_r,
            last_modified_ledger: record.last_modified_ledger,
            last_modified_time: ledger.map(|l| l.closed_at),
        }
    }
}
