use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::event::EventId;

/// Pointer to a piece of external evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RationaleRef {
    pub uri: String,
    pub hash: Option<String>,
    pub mime_type: Option<String>,
}

impl RationaleRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            hash: None,
            mime_type: None,
        }
    }
}

/// Explanation recorded next to an automated decision: who made it, how
/// confident it was and which events back it up.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rationale {
    pub source: String,
    pub confidence: Option<Decimal>,
    pub thought_path: Vec<String>,
    pub evidence_event_ids: Vec<EventId>,
    pub evidence_refs: Vec<RationaleRef>,
    pub risk_score: Option<Decimal>,
    pub metadata: BTreeMap<String, String>,
}

impl Rationale {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn with_confidence(mut self, confidence: Decimal) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_risk_score(mut self, risk_score: Decimal) -> Self {
        self.risk_score = Some(risk_score);
        self
    }

    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.thought_path.push(step.into());
        self
    }

    pub fn with_evidence(mut self, event_id: EventId) -> Self {
        self.evidence_event_ids.push(event_id);
        self
    }

    pub fn with_ref(mut self, evidence: RationaleRef) -> Self {
        self.evidence_refs.push(evidence);
        self
    }
}
