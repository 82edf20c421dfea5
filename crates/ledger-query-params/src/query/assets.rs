//! Selling/buying asset triples.

use crate::asset_selector::{AssetSelector, Side};
use crate::domain::{Asset, QueryResult};
use crate::validation::rules;
use crate::validation::{FieldLookup, FieldSpec, QueryShape, RawQueryParams, RuleRef};

const TYPE_RULES: &[RuleRef] = &[RuleRef::new(rules::ASSET_TYPE)];
const SELLING_ISSUER_RULES: &[RuleRef] = &[RuleRef::new(rules::SELLING_ISSUER)];
const SELLING_CODE_RULES: &[RuleRef] = &[RuleRef::new(rules::SELLING_CODE)];
const BUYING_ISSUER_RULES: &[RuleRef] = &[RuleRef::new(rules::BUYING_ISSUER)];
const BUYING_CODE_RULES: &[RuleRef] = &[RuleRef::new(rules::BUYING_CODE)];

/// Optional selling and buying asset constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SellingBuyingAssetQueryParams {
    pub selling_asset_type: String,
    pub selling_asset_issuer: String,
    pub selling_asset_code: String,
    pub buying_asset_type: String,
    pub buying_asset_issuer: String,
    pub buying_asset_code: String,
}

impl SellingBuyingAssetQueryParams {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("selling_asset_type", TYPE_RULES),
        FieldSpec::new("selling_asset_issuer", SELLING_ISSUER_RULES),
        FieldSpec::new("selling_asset_code", SELLING_CODE_RULES),
        FieldSpec::new("buying_asset_type", TYPE_RULES),
        FieldSpec::new("buying_asset_issuer", BUYING_ISSUER_RULES),
        FieldSpec::new("buying_asset_code", BUYING_CODE_RULES),
    ];

    pub fn selling(&self) -> QueryResult<Option<Asset>> {
        AssetSelector::select_from(self, Side::Selling)
    }

    pub fn buying(&self) -> QueryResult<Option<Asset>> {
        AssetSelector::select_from(self, Side::Buying)
    }
}

impl FieldLookup for SellingBuyingAssetQueryParams {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "selling_asset_type" => Some(&self.selling_asset_type),
            "selling_asset_issuer" => Some(&self.selling_asset_issuer),
            "selling_asset_code" => Some(&self.selling_asset_code),
            "buying_asset_type" => Some(&self.buying_asset_type),
            "buying_asset_issuer" => Some(&self.buying_asset_issuer),
            "buying_asset_code" => Some(&self.buying_asset_code),
            _ => None,
        }
    }
}

impl QueryShape for SellingBuyingAssetQueryParams {
    fn fields() -> Vec<FieldSpec> {
        Self::FIELDS.to_vec()
    }

    fn from_raw(raw: &RawQueryParams) -> Self {
        Self {
            selling_asset_type: raw.get_string("selling_asset_type"),
            selling_asset_issuer: raw.get_string("selling_asset_issuer"),
            selling_asset_code: raw.get_string("selling_asset_code"),
            buying_asset_type: raw.get_string("buying_asset_type"),
            buying_asset_issuer: raw.get_string("buying_asset_issuer"),
            buying_asset_code: raw.get_string("buying_asset_code"),
        }
    }
}
