use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    audit::{Rationale, RationaleRef},
    event::EventId,
    wire::{
        WireError,
        decimal::{from_wire_string, to_wire_string},
        event::EventIdWire,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RationaleRefWire {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Scores travel as decimal strings and are read permissively: a garbled
/// confidence reads as zero instead of dropping the whole rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RationaleWire {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    #[serde(default)]
    pub thought_path: Vec<String>,
    #[serde(default)]
    pub evidence_event_ids: Vec<EventIdWire>,
    #[serde(default)]
    pub evidence_refs: Vec<RationaleRefWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl From<&RationaleRef> for RationaleRefWire {
    fn from(reference: &RationaleRef) -> Self {
        Self {
            uri: reference.uri.clone(),
            hash: reference.hash.clone(),
            mime_type: reference.mime_type.clone(),
        }
    }
}

impl From<RationaleRefWire> for RationaleRef {
    fn from(wire: RationaleRefWire) -> Self {
        Self {
            uri: wire.uri,
            hash: wire.hash,
            mime_type: wire.mime_type,
        }
    }
}

impl From<&Rationale> for RationaleWire {
    fn from(rationale: &Rationale) -> Self {
        Self {
            source: rationale.source.clone(),
            confidence: rationale.confidence.map(to_wire_string),
            thought_path: rationale.thought_path.clone(),
            evidence_event_ids: rationale.evidence_event_ids.iter().map(EventIdWire::from).collect(),
            evidence_refs: rationale.evidence_refs.iter().map(RationaleRefWire::from).collect(),
            risk_score: rationale.risk_score.map(to_wire_string),
            metadata: rationale.metadata.clone(),
        }
    }
}

impl TryFrom<RationaleWire> for Rationale {
    type Error = WireError;

    fn try_from(wire: RationaleWire) -> Result<Self, Self::Error> {
        let evidence_event_ids = wire
            .evidence_event_ids
            .into_iter()
            .map(EventId::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source: wire.source,
            confidence: wire.confidence.as_deref().map(from_wire_string),
            thought_path: wire.thought_path,
            evidence_event_ids,
            evidence_refs: wire.evidence_refs.into_iter().map(RationaleRef::from).collect(),
            risk_score: wire.risk_score.as_deref().map(from_wire_string),
            metadata: wire.metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn round_trip() {
        let rationale = Rationale::new("fraud-model")
            .with_confidence(dec!(0.875))
            .with_risk_score(dec!(12.5))
            .with_step("velocity spike")
            .with_step("new device")
            .with_evidence(EventId::generate())
            .with_ref(RationaleRef {
                uri: "s3://evidence/1.json".to_string(),
                hash: Some("sha256:abc".to_string()),
                mime_type: Some("application/json".to_string()),
            });
        let wire = RationaleWire::from(&rationale);
        assert_eq!(wire.confidence.as_deref(), Some("0.875"));
        assert_eq!(Rationale::try_from(wire).unwrap(), rationale);
    }

    #[test]
    fn garbled_scores_read_as_zero() {
        let mut wire = RationaleWire::from(&Rationale::new("rules").with_confidence(dec!(1)));
        wire.confidence = Some("very".to_string());
        let rationale = Rationale::try_from(wire).unwrap();
        assert_eq!(rationale.confidence, Some(Decimal::ZERO));
        assert_eq!(rationale.risk_score, None);
    }
}
