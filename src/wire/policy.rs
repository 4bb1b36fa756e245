use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{policy::Policy, wire::WireError};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyWire {
    pub policy_id: String,
    pub policy_type: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default)]
    pub custom_config: Vec<u8>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl From<&Policy> for PolicyWire {
    fn from(policy: &Policy) -> Self {
        Self {
            policy_id: policy.policy_id().to_string(),
            policy_type: policy.policy_type().to_string(),
            params: policy.params().clone(),
            custom_config: policy.custom_config().to_vec(),
            metadata: policy.metadata().clone(),
        }
    }
}

impl TryFrom<PolicyWire> for Policy {
    type Error = WireError;

    fn try_from(wire: PolicyWire) -> Result<Self, Self::Error> {
        Ok(Policy::new(wire.policy_id, wire.policy_type)?
            .with_params(wire.params)
            .with_custom_config(wire.custom_config)
            .with_metadata(wire.metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyError;

    #[test]
    fn round_trip() {
        let policy = Policy::new("spend-cap", "limit")
            .unwrap()
            .with_param("max", "500")
            .with_custom_config(vec![1, 2, 3])
            .with_metadata(BTreeMap::from([("owner".to_string(), "ops".to_string())]));
        assert_eq!(Policy::try_from(PolicyWire::from(&policy)).unwrap(), policy);
    }

    #[test]
    fn missing_ids_are_rejected() {
        let wire = PolicyWire {
            policy_type: "limit".to_string(),
            ..Default::default()
        };
        assert_eq!(
            Policy::try_from(wire),
            Err(WireError::Policy(PolicyError::EmptyPolicyId))
        );
        let wire = PolicyWire {
            policy_id: "p".to_string(),
            ..Default::default()
        };
        assert_eq!(
            Policy::try_from(wire),
            Err(WireError::Policy(PolicyError::EmptyPolicyType))
        );
    }
}
