//! # Asset Selector
//!
//! Resolves an optional `(type, issuer, code)` triple into an [`Asset`].
//!
//! Both sides of an offer query use the same logic; only the field-name
//! prefix differs:
//!
//! ```text
//!   selling_asset_type ─┐                  buying_asset_type ─┐
//!   selling_asset_issuer├─► select(Selling) buying_asset_issuer├─► select(Buying)
//!   selling_asset_code ─┘                  buying_asset_code ─┘
//! ```
//!
//! Selection runs after binding, so every field has already passed its rules.
//! A conversion failure here is therefore an internal fault.

use crate::domain::{Asset, AssetType, QueryError, QueryResult};
use crate::validation::registry::FieldLookup;
use crate::validation::rules;
use std::str::FromStr;

/// Which side of an offer a triple describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Selling,
    Buying,
}

impl Side {
    pub fn prefix(&self) -> &'static str {
        match self {
            Side::Selling => "selling",
            Side::Buying => "buying",
        }
    }

    pub fn type_field(&self) -> &'static str {
        match self {
            Side::Selling => "selling_asset_type",
            Side::Buying => "buying_asset_type",
        }
    }

    pub fn issuer_field(&self) -> &'static str {
        match self {
            Side::Selling => "selling_asset_issuer",
            Side::Buying => "buying_asset_issuer",
        }
    }

    pub fn code_field(&self) -> &'static str {
        match self {
            Side::Selling => "selling_asset_code",
            Side::Buying => "buying_asset_code",
        }
    }

    /// Contextual rule bounding this side's code by its type.
    pub fn code_rule(&self) -> &'static str {
        match self {
            Side::Selling => rules::SELLING_CODE,
            Side::Buying => rules::BUYING_CODE,
        }
    }

    /// Contextual rule requiring a valid issuer for this side's credit types.
    pub fn issuer_rule(&self) -> &'static str {
        match self {
            Side::Selling => rules::SELLING_ISSUER,
            Side::Buying => rules::BUYING_ISSUER,
        }
    }
}

/// Stateless selector shared by both sides.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetSelector;

impl AssetSelector {
    /// Absent type means no constraint; issuer and code are then ignored.
    pub fn select(
        asset_type: &str,
        issuer: &str,
        code: &str,
        side: Side,
    ) -> QueryResult<Option<Asset>> {
        if asset_type.is_empty() {
            return Ok(None);
        }

        let kind = AssetType::from_str(asset_type)
            .map_err(|e| QueryError::internal(format!("{}: {}", side.type_field(), e)))?;

        Asset::build(kind, issuer, code)
            .map(Some)
            .map_err(|e| QueryError::internal(format!("{} asset: {}", side.prefix(), e)))
    }

    /// Select straight from the owning struct's fields.
    pub fn select_from(owner: &dyn FieldLookup, side: Side) -> QueryResult<Option<Asset>> {
        Self::select(
            owner.field(side.type_field()).unwrap_or_default(),
            owner.field(side.issuer_field()).unwrap_or_default(),
            owner.field(side.code_field()).unwrap_or_default(),
            side,
        )
    }
}
