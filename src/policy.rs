use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Policy id must not be empty")]
    EmptyPolicyId,
    #[error("Policy type must not be empty")]
    EmptyPolicyType,
}

/// Rule set attached to identities by id. `params` are interpreted by the
/// policy engine of the given `policy_type`; `custom_config` is an opaque
/// blob for engines that need more than string parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    policy_id: String,
    policy_type: String,
    params: BTreeMap<String, String>,
    custom_config: Vec<u8>,
    metadata: BTreeMap<String, String>,
}

impl Policy {
    pub fn new(
        policy_id: impl Into<String>,
        policy_type: impl Into<String>,
    ) -> Result<Self, PolicyError> {
        let policy_id = policy_id.into();
        let policy_type = policy_type.into();
        if policy_id.trim().is_empty() {
            return Err(PolicyError::EmptyPolicyId);
        }
        if policy_type.trim().is_empty() {
            return Err(PolicyError::EmptyPolicyType);
        }
        Ok(Self {
            policy_id,
            policy_type,
            params: BTreeMap::new(),
            custom_config: Vec::new(),
            metadata: BTreeMap::new(),
        })
    }

    pub fn with_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_custom_config(mut self, custom_config: Vec<u8>) -> Self {
        self.custom_config = custom_config;
        self
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn policy_id(&self) -> &str {
        &self.policy_id
    }

    pub fn policy_type(&self) -> &str {
        &self.policy_type
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn custom_config(&self) -> &[u8] {
        &self.custom_config
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}
