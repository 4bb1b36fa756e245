use std::{collections::BTreeMap, fmt, str::FromStr};

use thiserror::Error;

use crate::wire::token::WireToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdentityType {
    Player,
    System,
    Ai,
    External,
    Unknown,
}

impl WireToken for IdentityType {
    const FALLBACK: Self = IdentityType::Unknown;
    const ALL: &'static [Self] = &[
        IdentityType::Player,
        IdentityType::System,
        IdentityType::Ai,
        IdentityType::External,
        IdentityType::Unknown,
    ];

    fn token(self) -> &'static str {
        match self {
            IdentityType::Player => "PLAYER",
            IdentityType::System => "SYSTEM",
            IdentityType::Ai => "AI",
            IdentityType::External => "EXTERNAL",
            IdentityType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for IdentityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Identity id must not be empty")]
    EmptyId,
}

/// Anyone who can act in the economy: a player, the system itself, an AI
/// agent or an external service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    id: String,
    kind: IdentityType,
    metadata: BTreeMap<String, String>,
    attached_policy_ids: Vec<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>, kind: IdentityType) -> Result<Self, IdentityError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdentityError::EmptyId);
        }
        Ok(Self {
            id,
            kind,
            metadata: BTreeMap::new(),
            attached_policy_ids: Vec::new(),
        })
    }

    pub fn player(id: impl Into<String>) -> Result<Self, IdentityError> {
        Self::new(id, IdentityType::Player)
    }

    pub fn system(id: impl Into<String>) -> Result<Self, IdentityError> {
        Self::new(id, IdentityType::System)
    }

    /// Parses `TYPE:id`. Input without a colon is a bare player id.
    pub fn parse(canonical: &str) -> Result<Self, IdentityError> {
        match canonical.split_once(':') {
            Some((kind, id)) => Self::new(id, IdentityType::parse_token(kind)),
            None => Self::new(canonical, IdentityType::Player),
        }
    }

    pub fn with_metadata(&self, metadata: BTreeMap<String, String>) -> Self {
        Self {
            metadata,
            ..self.clone()
        }
    }

    pub fn with_attached_policy_ids(&self, attached_policy_ids: Vec<String>) -> Self {
        Self {
            attached_policy_ids,
            ..self.clone()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn identity_type(&self) -> IdentityType {
        self.kind
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn attached_policy_ids(&self) -> &[String] {
        &self.attached_policy_ids
    }

    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty()
    }

    pub fn canonical(&self) -> String {
        format!("{}:{}", self.kind.token(), self.id)
    }

    /// Same identity regardless of metadata and attached policies.
    pub fn same_principal(&self, other: &Identity) -> bool {
        self.kind == other.kind && self.id == other.id
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_canonical() {
        let identity = Identity::parse("SYSTEM:bank").unwrap();
        assert_eq!(identity.identity_type(), IdentityType::System);
        assert_eq!(identity.id(), "bank");
        assert_eq!(identity.canonical(), "SYSTEM:bank");

        let ai = Identity::parse("ai:npc:merchant").unwrap();
        assert_eq!(ai.identity_type(), IdentityType::Ai);
        assert_eq!(ai.id(), "npc:merchant");
        assert_eq!(ai.to_string(), "AI:npc:merchant");
    }

    #[test]
    fn bare_id_is_a_player() {
        let identity = Identity::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(identity.identity_type(), IdentityType::Player);
        assert_eq!(identity.id(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn unknown_type_keeps_id() {
        let identity = Identity::parse("ROBOT:r2").unwrap();
        assert_eq!(identity.identity_type(), IdentityType::Unknown);
        assert_eq!(identity.canonical(), "UNKNOWN:r2");
    }

    #[test]
    fn empty_id_is_rejected() {
        assert_eq!(Identity::parse(""), Err(IdentityError::EmptyId));
        assert_eq!(Identity::parse("PLAYER:"), Err(IdentityError::EmptyId));
        assert_eq!(Identity::new("", IdentityType::Ai), Err(IdentityError::EmptyId));
    }

    #[test]
    fn with_operations_return_new_values() {
        let alice = Identity::player("alice").unwrap();
        let tagged = alice
            .with_metadata(BTreeMap::from([("region".to_string(), "eu".to_string())]))
            .with_attached_policy_ids(vec!["p1".to_string(), "p2".to_string()]);

        assert!(alice.metadata().is_empty());
        assert!(alice.attached_policy_ids().is_empty());
        assert_eq!(tagged.metadata()["region"], "eu");
        assert_eq!(tagged.attached_policy_ids(), ["p1", "p2"]);
        assert_ne!(alice, tagged);
        assert!(alice.same_principal(&tagged));
        assert!(tagged.is_valid());
    }
}
