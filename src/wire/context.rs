use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::context::Context;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContextWire {
    pub trace_id: String,
    pub correlation_id: String,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl From<&Context> for ContextWire {
    fn from(context: &Context) -> Self {
        Self {
            trace_id: context.trace_id().to_string(),
            correlation_id: context.correlation_id().to_string(),
            meta: context.meta().clone(),
        }
    }
}

impl From<ContextWire> for Context {
    fn from(wire: ContextWire) -> Self {
        Context::from_parts(wire.trace_id, wire.correlation_id, wire.meta)
    }
}
