//! Offer endpoint shapes and the structured offer query.

use super::assets::SellingBuyingAssetQueryParams;
use super::page::PageQueryParams;
use crate::domain::{AccountId, Asset, FieldError, PageDirective, QueryError, QueryResult};
use crate::validation::rules;
use crate::validation::{FieldLookup, FieldSpec, QueryShape, RawQueryParams, RuleRef};
use std::str::FromStr;

const ACCOUNT_RULES: &[RuleRef] = &[RuleRef::new(rules::ACCOUNT_ID)];

/// Structured query handed to [`OfferStore`](crate::ports::OfferStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffersQuery {
    pub page: PageDirective,
    pub seller: Option<AccountId>,
    pub selling: Option<Asset>,
    pub buying: Option<Asset>,
}

impl OffersQuery {
    pub fn new(page: PageDirective) -> Self {
        Self {
            page,
            seller: None,
            selling: None,
            buying: None,
        }
    }
}

/// Parse an already-validated, possibly empty account field.
fn parse_account(field: &str, value: &str) -> QueryResult<Option<AccountId>> {
    if value.is_empty() {
        return Ok(None);
    }
    AccountId::from_str(value)
        .map(Some)
        .map_err(|e| QueryError::internal(format!("{}: {}", field, e)))
}

/// `/offers`: page, asset constraints and an optional seller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffersQueryParams {
    pub page: PageQueryParams,
    pub assets: SellingBuyingAssetQueryParams,
    pub seller: String,
}

impl OffersQueryParams {
    pub fn seller(&self) -> QueryResult<Option<AccountId>> {
        parse_account("seller", &self.seller)
    }
}

impl FieldLookup for OffersQueryParams {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "seller" => Some(&self.seller),
            _ => self.page.field(name).or_else(|| self.assets.field(name)),
        }
    }
}

impl QueryShape for OffersQueryParams {
    fn fields() -> Vec<FieldSpec> {
        let mut fields = PageQueryParams::fields();
        fields.extend(SellingBuyingAssetQueryParams::fields());
        fields.push(FieldSpec::new("seller", ACCOUNT_RULES));
        fields
    }

    fn from_raw(raw: &RawQueryParams) -> Self {
        Self {
            page: PageQueryParams::from_raw(raw),
            assets: SellingBuyingAssetQueryParams::from_raw(raw),
            seller: raw.get_string("seller"),
        }
    }
}

/// `/accounts/{account_id}/offers`: page plus the path account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountOffersQueryParams {
    pub page: PageQueryParams,
    pub account_id: String,
}

impl AccountOffersQueryParams {
    pub fn account_id(&self) -> QueryResult<Option<AccountId>> {
        parse_account("account_id", &self.account_id)
    }
}

impl FieldLookup for AccountOffersQueryParams {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "account_id" => Some(&self.account_id),
            _ => self.page.field(name),
        }
    }
}

impl QueryShape for AccountOffersQueryParams {
    fn fields() -> Vec<FieldSpec> {
        let mut fields = PageQueryParams::fields();
        fields.push(FieldSpec::new("account_id", ACCOUNT_RULES));
        fields
    }

    fn from_raw(raw: &RawQueryParams) -> Self {
        Self {
            page: PageQueryParams::from_raw(raw),
            account_id: raw.get_string("account_id"),
        }
    }

    /// The account comes from the path; an empty one means the route was
    /// matched without it.
    fn validate(&self) -> Result<(), FieldError> {
        if self.account_id.is_empty() {
            return Err(FieldError::new(
                "account_id",
                "required",
                "account_id is required",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QueryConfig;
    use crate::validation::{QueryBinder, ValidationRegistry};
    use std::sync::Arc;

    const SELLER: &str = "GAN4WOTCFSASG3J6SGLLQZURDDUVNBQANAHEQJ3PBNDZ74X63UZWQPZW";

    fn binder() -> QueryBinder {
        QueryBinder::new(Arc::new(
            ValidationRegistry::standard(&QueryConfig::default()).unwrap(),
        ))
    }

    #[test]
    fn test_offers_shape_checks_out() {
        let binder = binder();
        assert!(binder.check_shape::<OffersQueryParams>().is_ok());
        assert!(binder.check_shape::<AccountOffersQueryParams>().is_ok());
    }

    #[test]
    fn test_offers_field_order() {
        let names: Vec<_> = OffersQueryParams::fields().iter().map(|f| f.name).collect();
        assert_eq!(names.first(), Some(&"cursor"));
        assert_eq!(names.last(), Some(&"seller"));
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn test_seller_parsed() {
        let raw = RawQueryParams::new().with("seller", SELLER);
        let params: OffersQueryParams = binder().bind(&raw).unwrap();
        assert_eq!(params.seller().unwrap().unwrap().address(), SELLER);
    }

    #[test]
    fn test_bad_seller_rejected() {
        let raw = RawQueryParams::new().with("seller", "GABC");
        let err = binder().bind::<OffersQueryParams>(&raw).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_account_required() {
        let err = binder()
            .bind::<AccountOffersQueryParams>(&RawQueryParams::new())
            .unwrap_err();
        let QueryError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.first().unwrap().field, "account_id");
        assert_eq!(errors.first().unwrap().rule, "required");
    }

    #[test]
    fn test_account_parsed() {
        let raw = RawQueryParams::new().with("account_id", SELLER);
        let params: AccountOffersQueryParams = binder().bind(&raw).unwrap();
        assert_eq!(params.account_id().unwrap().unwrap().address(), SELLER);
    }
}
