//! Rule names and predicates used by the offer endpoints.

use super::registry::{FieldLookup, ValidationRegistry};
use crate::asset_selector::Side;
use crate::domain::{is_valid_code, AccountId, AssetType, ConfigurationError, QueryConfig};
use std::str::FromStr;

pub const ACCOUNT_ID: &str = "accountID";
pub const ASSET_TYPE: &str = "assetType";
pub const CURSOR: &str = "cursor";
pub const ORDER: &str = "order";
pub const LIMIT: &str = "limit";
pub const SELLING_CODE: &str = "sellingCode";
pub const BUYING_CODE: &str = "buyingCode";
pub const SELLING_ISSUER: &str = "sellingIssuer";
pub const BUYING_ISSUER: &str = "buyingIssuer";

pub(crate) fn register_standard(
    registry: &mut ValidationRegistry,
    config: &QueryConfig,
) -> Result<(), ConfigurationError> {
    registry.register(
        ACCOUNT_ID,
        "Account ID must start with `G` and contain 56 alphanum characters",
        is_account_id,
    )?;
    registry.register(
        ASSET_TYPE,
        "Asset type must be native, credit_alphanum4 or credit_alphanum12.",
        is_asset_type,
    )?;
    registry.register(
        CURSOR,
        "the value should not be a negative number",
        is_cursor,
    )?;
    registry.register(ORDER, "valid values are asc or desc", is_order)?;

    let max = config.max_page_size;
    registry.register(
        LIMIT,
        format!("value should be between 1 and {}", max),
        move |value| is_limit_within(value, max),
    )?;

    for side in [Side::Selling, Side::Buying] {
        registry.register_contextual(
            side.code_rule(),
            "Asset code must be 1-12 alphanumeric characters.",
            move |code, owner| is_code_for_side(code, owner, side),
        )?;
        registry.register_contextual(
            side.issuer_rule(),
            "Asset issuer must be a valid account ID for credit assets.",
            move |issuer, owner| is_issuer_for_side(issuer, owner, side),
        )?;
    }

    Ok(())
}

pub fn is_account_id(value: &str) -> bool {
    AccountId::from_str(value).is_ok()
}

pub fn is_asset_type(value: &str) -> bool {
    AssetType::from_str(value).is_ok()
}

/// Anything except a negative integer literal.
pub fn is_cursor(value: &str) -> bool {
    !is_negative_integer(value)
}

fn is_negative_integer(value: &str) -> bool {
    value.strip_prefix('-').is_some_and(|digits| {
        !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && digits.bytes().any(|b| b != b'0')
    })
}

pub fn is_order(value: &str) -> bool {
    matches!(value, "asc" | "desc")
}

pub fn is_limit_within(value: &str, max: u64) -> bool {
    value
        .parse::<i64>()
        .is_ok_and(|limit| limit >= 1 && limit as u64 <= max)
}

/// The side's asset type, or `None` when it is absent or unparseable.
///
/// An unparseable type is reported by `assetType`; the code and issuer rules
/// stay quiet so each field surfaces its own failure only.
fn side_type(owner: &dyn FieldLookup, side: Side) -> Option<AssetType> {
    owner
        .field(side.type_field())
        .and_then(|t| AssetType::from_str(t).ok())
}

pub fn is_code_for_side(code: &str, owner: &dyn FieldLookup, side: Side) -> bool {
    match side_type(owner, side).and_then(|t| t.max_code_len()) {
        Some(max) => is_valid_code(code, max),
        None => true,
    }
}

/// Credit types need a well-formed issuer. Otherwise the issuer is ignored.
pub fn is_issuer_for_side(issuer: &str, owner: &dyn FieldLookup, side: Side) -> bool {
    match side_type(owner, side) {
        Some(t) if t.is_credit() => is_account_id(issuer),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Owner(HashMap<&'static str, &'static str>);

    impl FieldLookup for Owner {
        fn field(&self, name: &str) -> Option<&str> {
            self.0.get(name).copied()
        }
    }

    fn owner(pairs: &[(&'static str, &'static str)]) -> Owner {
        Owner(pairs.iter().copied().collect())
    }

    #[test]
    fn test_cursor_rule() {
        assert!(is_cursor("0"));
        assert!(is_cursor("12345"));
        assert!(is_cursor("string"));
        assert!(is_cursor("-0"));
        assert!(is_cursor("-abc"));
        assert!(!is_cursor("-1"));
        assert!(!is_cursor("-99999999999999999999999"));
    }

    #[test]
    fn test_limit_rule() {
        assert!(is_limit_within("1", 200));
        assert!(is_limit_within("200", 200));
        assert!(!is_limit_within("0", 200));
        assert!(!is_limit_within("201", 200));
        assert!(!is_limit_within("-1", 200));
        assert!(!is_limit_within("ten", 200));
        assert!(!is_limit_within("150", 100));
    }

    #[test]
    fn test_code_rule_bound_follows_type() {
        let four = owner(&[("selling_asset_type", "credit_alphanum4")]);
        let twelve = owner(&[("selling_asset_type", "credit_alphanum12")]);

        assert!(is_code_for_side("USD", &four, Side::Selling));
        assert!(!is_code_for_side("USDCX", &four, Side::Selling));
        assert!(!is_code_for_side("", &four, Side::Selling));
        assert!(is_code_for_side("USDCX", &twelve, Side::Selling));
    }

    #[test]
    fn test_code_rule_ignored_without_type() {
        let none = owner(&[]);
        let native = owner(&[("buying_asset_type", "native")]);
        let bogus = owner(&[("buying_asset_type", "bogus")]);

        assert!(is_code_for_side("WAYTOOLONGFORANYKIND", &none, Side::Buying));
        assert!(is_code_for_side("WAYTOOLONGFORANYKIND", &native, Side::Buying));
        assert!(is_code_for_side("WAYTOOLONGFORANYKIND", &bogus, Side::Buying));
    }

    #[test]
    fn test_code_rule_sides_are_independent() {
        let fields = owner(&[("selling_asset_type", "credit_alphanum4")]);
        assert!(!is_code_for_side("TOOLONG", &fields, Side::Selling));
        assert!(is_code_for_side("TOOLONG", &fields, Side::Buying));
    }

    const ISSUER: &str = "GAN4WOTCFSASG3J6SGLLQZURDDUVNBQANAHEQJ3PBNDZ74X63UZWQPZW";

    #[test]
    fn test_issuer_required_for_credit() {
        let credit = owner(&[("selling_asset_type", "credit_alphanum4")]);

        assert!(!is_issuer_for_side("", &credit, Side::Selling));
        assert!(!is_issuer_for_side("GSOMETHING", &credit, Side::Selling));
        assert!(is_issuer_for_side(ISSUER, &credit, Side::Selling));
    }

    #[test]
    fn test_issuer_ignored_without_credit_type() {
        let none = owner(&[]);
        let native = owner(&[("buying_asset_type", "native")]);
        let bogus = owner(&[("buying_asset_type", "bogus")]);

        for fields in [&none, &native, &bogus] {
            assert!(is_issuer_for_side("junk", fields, Side::Buying));
            assert!(is_issuer_for_side("", fields, Side::Buying));
        }
    }
}
