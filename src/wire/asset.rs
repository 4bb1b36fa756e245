use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    asset::{Asset, AssetId, AssetScope},
    wire::{
        WireError,
        decimal::{to_wire_string, try_from_wire_string},
        token::WireToken,
    },
};

/// Splits an asset id into the `(name, scope)` pair used by flattened
/// messages such as transactions.
pub fn to_wire_parts(id: &AssetId) -> (String, String) {
    (id.name().to_string(), id.scope().token().to_string())
}

pub fn from_wire_parts(name: &str, scope: &str) -> Result<AssetId, WireError> {
    Ok(AssetId::new(AssetScope::parse_token(scope), name)?)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetWire {
    /// Canonical `scope:name` form.
    pub asset_id: String,
    pub display_name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    pub floor: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl From<&Asset> for AssetWire {
    fn from(asset: &Asset) -> Self {
        Self {
            asset_id: asset.id().full_id(),
            display_name: asset.display_name().to_string(),
            value: to_wire_string(asset.value()),
            limit: asset.limit().map(to_wire_string),
            floor: to_wire_string(asset.floor()),
            tags: asset.tags().clone(),
            metadata: asset.metadata().clone(),
        }
    }
}

impl TryFrom<AssetWire> for Asset {
    type Error = WireError;

    fn try_from(wire: AssetWire) -> Result<Self, Self::Error> {
        let id = AssetId::parse(&wire.asset_id)?;
        let limit = wire
            .limit
            .as_deref()
            .map(try_from_wire_string)
            .transpose()?;

        let mut asset = Asset::new(id, try_from_wire_string(&wire.value)?)
            .with_display_name(wire.display_name)
            .with_limit(limit)
            .with_floor(try_from_wire_string(&wire.floor)?);
        for (key, value) in wire.tags {
            asset = asset.with_tag(key, value);
        }
        for (key, value) in wire.metadata {
            asset = asset.with_metadata(key, value);
        }
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{asset::AssetIdError, wire::decimal::DecimalParseError};

    #[test]
    fn parts_round_trip() {
        let id = AssetId::server("gold").unwrap();
        let (name, scope) = to_wire_parts(&id);
        assert_eq!((name.as_str(), scope.as_str()), ("gold", "SERVER"));
        assert_eq!(from_wire_parts(&name, &scope).unwrap(), id);
        assert_eq!(
            from_wire_parts("", "PLAYER"),
            Err(WireError::AssetId(AssetIdError::EmptyName))
        );
        assert_eq!(
            from_wire_parts("gold", "moon").unwrap().scope(),
            AssetScope::Unknown
        );
    }

    #[test]
    fn asset_round_trip() {
        let asset = Asset::new(AssetId::player("coins").unwrap(), dec!(12.50))
            .with_limit(Some(dec!(1000)))
            .with_floor(dec!(-5))
            .with_display_name("Gold Coins")
            .with_tag("tradable", "true")
            .with_metadata("season", "3");
        let wire = AssetWire::from(&asset);
        assert_eq!(wire.value, "12.50");
        assert_eq!(wire.asset_id, "player:coins");
        assert_eq!(Asset::try_from(wire).unwrap(), asset);
    }

    #[test]
    fn malformed_balance_is_rejected() {
        let mut wire = AssetWire::from(&Asset::new(AssetId::player("coins").unwrap(), dec!(1)));
        wire.value = "1,5".to_string();
        assert_eq!(
            Asset::try_from(wire),
            Err(WireError::Decimal(DecimalParseError::Invalid {
                input: "1,5".to_string()
            }))
        );
    }
}
