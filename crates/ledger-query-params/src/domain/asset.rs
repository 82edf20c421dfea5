//! # Asset Identity
//!
//! An asset is either the native currency or an issuer-qualified code. The
//! credit variants bound the code length: 4 characters for
//! `credit_alphanum4`, 12 for `credit_alphanum12`.

use super::account::AccountId;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Enumerated asset kinds accepted in `*_asset_type` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetType {
    Native,
    CreditAlphanum4,
    CreditAlphanum12,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Native => "native",
            AssetType::CreditAlphanum4 => "credit_alphanum4",
            AssetType::CreditAlphanum12 => "credit_alphanum12",
        }
    }

    /// Maximum code length, `None` for native.
    pub fn max_code_len(&self) -> Option<usize> {
        match self {
            AssetType::Native => None,
            AssetType::CreditAlphanum4 => Some(4),
            AssetType::CreditAlphanum12 => Some(12),
        }
    }

    pub fn is_credit(&self) -> bool {
        !matches!(self, AssetType::Native)
    }
}

impl FromStr for AssetType {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" => Ok(AssetType::Native),
            "credit_alphanum4" => Ok(AssetType::CreditAlphanum4),
            "credit_alphanum12" => Ok(AssetType::CreditAlphanum12),
            other => Err(AssetError::UnknownType(other.to_string())),
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("unknown asset type: {0:?}")]
    UnknownType(String),
    #[error("asset code {code:?} must be 1-{max} alphanumeric characters")]
    InvalidCode { code: String, max: usize },
    #[error("invalid asset issuer: {0}")]
    InvalidIssuer(String),
}

/// Domain asset identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Asset {
    Native,
    CreditAlphanum4 { code: String, issuer: AccountId },
    CreditAlphanum12 { code: String, issuer: AccountId },
}

impl Asset {
    /// Build an asset from already-extracted field values.
    ///
    /// `native` ignores issuer and code. Credit kinds require a well-formed
    /// issuer and a code within the kind's length bound.
    pub fn build(asset_type: AssetType, issuer: &str, code: &str) -> Result<Self, AssetError> {
        let Some(max) = asset_type.max_code_len() else {
            return Ok(Asset::Native);
        };

        if !is_valid_code(code, max) {
            return Err(AssetError::InvalidCode {
                code: code.to_string(),
                max,
            });
        }

        let issuer = AccountId::from_str(issuer)
            .map_err(|e| AssetError::InvalidIssuer(e.to_string()))?;

        let code = code.to_string();
        Ok(match asset_type {
            AssetType::CreditAlphanum4 => Asset::CreditAlphanum4 { code, issuer },
            _ => Asset::CreditAlphanum12 { code, issuer },
        })
    }

    pub fn asset_type(&self) -> AssetType {
        match self {
            Asset::Native => AssetType::Native,
            Asset::CreditAlphanum4 { .. } => AssetType::CreditAlphanum4,
            Asset::CreditAlphanum12 { .. } => AssetType::CreditAlphanum12,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Asset::Native => None,
            Asset::CreditAlphanum4 { code, .. } | Asset::CreditAlphanum12 { code, .. } => {
                Some(code)
            }
        }
    }

    pub fn issuer(&self) -> Option<&AccountId> {
        match self {
            Asset::Native => None,
            Asset::CreditAlphanum4 { issuer, .. } | Asset::CreditAlphanum12 { issuer, .. } => {
                Some(issuer)
            }
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code(), self.issuer()) {
            (Some(code), Some(issuer)) => write!(f, "{}:{}", code, issuer),
            _ => f.write_str("native"),
        }
    }
}

// Rendered the way the public API shows assets: flat type/code/issuer fields.
impl Serialize for Asset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.code().is_some() { 3 } else { 1 };
        let mut state = serializer.serialize_struct("Asset", len)?;
        state.serialize_field("asset_type", self.asset_type().as_str())?;
        if let (Some(code), Some(issuer)) = (self.code(), self.issuer()) {
            state.serialize_field("asset_code", code)?;
            state.serialize_field("asset_issuer", issuer)?;
        }
        state.end()
    }
}

/// 1..=max ASCII alphanumeric characters.
pub fn is_valid_code(code: &str, max: usize) -> bool {
    !code.is_empty() && code.len() <= max && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
