use std::collections::BTreeMap;

use uuid::Uuid;

/// Tracing context propagated alongside requests and events.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context {
    trace_id: String,
    correlation_id: String,
    meta: BTreeMap<String, String>,
}

impl Context {
    /// A missing trace id is generated; a missing correlation id reuses the
    /// trace id.
    pub fn create(trace_id: Option<String>, correlation_id: Option<String>) -> Self {
        let trace_id = trace_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let correlation_id = correlation_id.unwrap_or_else(|| trace_id.clone());
        Self {
            trace_id,
            correlation_id,
            meta: BTreeMap::new(),
        }
    }

    pub fn from_trace_id(trace_id: impl Into<String>) -> Self {
        Self::create(Some(trace_id.into()), None)
    }

    pub fn from_parts(
        trace_id: impl Into<String>,
        correlation_id: impl Into<String>,
        meta: BTreeMap<String, String>,
    ) -> Self {
        Self {
            trace_id: trace_id.into(),
            correlation_id: correlation_id.into(),
            meta,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn meta(&self) -> &BTreeMap<String, String> {
        &self.meta
    }

    pub fn get_meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    pub fn with_meta(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut meta = self.meta.clone();
        meta.insert(key.into(), value.into());
        Self {
            meta,
            ..self.clone()
        }
    }

    pub fn with_meta_map(&self, entries: BTreeMap<String, String>) -> Self {
        let mut meta = self.meta.clone();
        meta.extend(entries);
        Self {
            meta,
            ..self.clone()
        }
    }
}
