use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    identity::{Identity, IdentityType},
    wire::{WireError, token::WireToken},
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdentityWire {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub attached_policy_ids: Vec<String>,
}

impl From<&Identity> for IdentityWire {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id().to_string(),
            kind: identity.identity_type().token().to_string(),
            metadata: identity.metadata().clone(),
            attached_policy_ids: identity.attached_policy_ids().to_vec(),
        }
    }
}

impl TryFrom<IdentityWire> for Identity {
    type Error = WireError;

    fn try_from(wire: IdentityWire) -> Result<Self, Self::Error> {
        let identity = Identity::new(wire.id, IdentityType::parse_token(&wire.kind))?;
        Ok(identity
            .with_metadata(wire.metadata)
            .with_attached_policy_ids(wire.attached_policy_ids))
    }
}
