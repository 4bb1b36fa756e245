use std::{collections::BTreeMap, fmt, str::FromStr};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    result::{NdsError, NdsResult, error_codes},
    wire::token::WireToken,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetScope {
    Player,
    Server,
    Global,
    Unknown,
}

impl WireToken for AssetScope {
    const FALLBACK: Self = AssetScope::Unknown;
    const ALL: &'static [Self] = &[
        AssetScope::Player,
        AssetScope::Server,
        AssetScope::Global,
        AssetScope::Unknown,
    ];

    fn token(self) -> &'static str {
        match self {
            AssetScope::Player => "PLAYER",
            AssetScope::Server => "SERVER",
            AssetScope::Global => "GLOBAL",
            AssetScope::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for AssetScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetIdError {
    #[error("Asset id must not be empty")]
    Empty,
    #[error("Invalid asset id format `{0}`, expected `scope:name`")]
    InvalidFormat(String),
    #[error("Asset name must not be empty")]
    EmptyName,
}

/// Scoped asset name. The canonical form is `<scope>:<name>` with the scope
/// in lowercase, e.g. `player:coins`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId {
    scope: AssetScope,
    name: String,
}

impl AssetId {
    pub fn new(scope: AssetScope, name: impl Into<String>) -> Result<Self, AssetIdError> {
        let name = name.into();
        if name.is_empty() {
            return Err(AssetIdError::EmptyName);
        }
        Ok(Self { scope, name })
    }

    pub fn player(name: impl Into<String>) -> Result<Self, AssetIdError> {
        Self::new(AssetScope::Player, name)
    }

    pub fn server(name: impl Into<String>) -> Result<Self, AssetIdError> {
        Self::new(AssetScope::Server, name)
    }

    pub fn global(name: impl Into<String>) -> Result<Self, AssetIdError> {
        Self::new(AssetScope::Global, name)
    }

    /// Parses the canonical form. The name is everything after the first
    /// colon and may itself contain colons.
    pub fn parse(full_id: &str) -> Result<Self, AssetIdError> {
        if full_id.is_empty() {
            return Err(AssetIdError::Empty);
        }
        let Some((scope, name)) = full_id.split_once(':') else {
            return Err(AssetIdError::InvalidFormat(full_id.to_string()));
        };
        if scope.is_empty() {
            return Err(AssetIdError::InvalidFormat(full_id.to_string()));
        }
        Self::new(AssetScope::parse_token(scope), name)
    }

    pub fn scope(&self) -> AssetScope {
        self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_id(&self) -> String {
        format!("{}:{}", self.scope.token().to_lowercase(), self.name)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_id())
    }
}

impl FromStr for AssetId {
    type Err = AssetIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Balance of a single asset together with the bounds it must stay in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    id: AssetId,
    display_name: String,
    value: Decimal,
    limit: Option<Decimal>,
    floor: Decimal,
    tags: BTreeMap<String, String>,
    metadata: BTreeMap<String, String>,
}

impl Asset {
    pub fn new(id: AssetId, value: Decimal) -> Self {
        Self {
            display_name: id.name().to_string(),
            id,
            value,
            limit: None,
            floor: Decimal::ZERO,
            tags: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_limit(mut self, limit: Option<Decimal>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_floor(mut self, floor: Decimal) -> Self {
        self.floor = floor;
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_value(&self, value: Decimal) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }

    pub fn id(&self) -> &AssetId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn limit(&self) -> Option<Decimal> {
        self.limit
    }

    pub fn floor(&self) -> Decimal {
        self.floor
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// False when the sum would overflow `Decimal`.
    pub fn can_add(&self, amount: Decimal) -> bool {
        amount >= Decimal::ZERO
            && self
                .value
                .checked_add(amount)
                .is_some_and(|sum| self.limit.is_none_or(|limit| sum <= limit))
    }

    /// False when the difference would overflow `Decimal`.
    pub fn can_subtract(&self, amount: Decimal) -> bool {
        amount >= Decimal::ZERO
            && self
                .value
                .checked_sub(amount)
                .is_some_and(|rest| rest >= self.floor)
    }

    /// `value` only matters when given; otherwise presence of the key is enough.
    pub fn has_tag(&self, key: &str, value: Option<&str>) -> bool {
        match (self.tags.get(key), value) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.value >= self.floor && self.limit.is_none_or(|limit| self.value <= limit)
    }

    pub fn apply_delta(&self, delta: Decimal) -> NdsResult<Asset> {
        let Some(value) = self.value.checked_add(delta) else {
            return NdsResult::failure(
                NdsError::new(
                    error_codes::INVALID_AMOUNT,
                    format!("Applying {delta} to {} overflows", self.id),
                )
                .with_detail("asset", self.id.full_id())
                .with_detail("value", self.value)
                .with_detail("delta", delta),
            );
        };
        if delta >= Decimal::ZERO {
            if !self.can_add(delta) {
                return NdsResult::failure(
                    NdsError::new(
                        error_codes::EXCEEDS_LIMIT,
                        format!("Adding {delta} to {} exceeds its limit", self.id),
                    )
                    .with_detail("asset", self.id.full_id())
                    .with_detail("value", self.value)
                    .with_detail("delta", delta),
                );
            }
        } else if !self.can_subtract(-delta) {
            return NdsResult::failure(
                NdsError::new(
                    error_codes::INSUFFICIENT_BALANCE,
                    format!("Insufficient {} to subtract {}", self.id, -delta),
                )
                .with_detail("asset", self.id.full_id())
                .with_detail("value", self.value)
                .with_detail("delta", delta),
            );
        }
        NdsResult::success(self.with_value(value))
    }
}
