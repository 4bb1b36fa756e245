use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    transaction::{ConsistencyMode, Transaction, TransactionStatus},
    wire::{
        WireError,
        asset::{from_wire_parts, to_wire_parts},
        decimal::{to_wire_string, try_from_wire_string},
        event::{EventWire, decode_event},
        token::WireToken,
    },
};

/// Event fields plus the transaction-specific ones. The optional
/// counterparty fields are informational: on decode they are re-derived from
/// the payload, which is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionWire {
    #[serde(flatten)]
    pub event: EventWire,
    pub asset_name: String,
    pub asset_scope: String,
    pub delta: String,
    pub consistency: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&Transaction> for TransactionWire {
    fn from(tx: &Transaction) -> Self {
        let (asset_name, asset_scope) = to_wire_parts(tx.asset());
        let source = tx.source();
        let target = tx.target();
        Self {
            event: EventWire::from(tx.event()),
            asset_name,
            asset_scope,
            delta: to_wire_string(tx.delta()),
            consistency: tx.consistency().token().to_string(),
            status: tx.status().token().to_string(),
            source_id: source.as_ref().map(|s| s.id().to_string()),
            source_type: source.map(|s| s.identity_type().token().to_string()),
            target_id: target.as_ref().map(|t| t.id().to_string()),
            target_type: target.map(|t| t.identity_type().token().to_string()),
            reason: tx.reason().map(str::to_string),
        }
    }
}

impl TryFrom<TransactionWire> for Transaction {
    type Error = WireError;

    fn try_from(wire: TransactionWire) -> Result<Self, Self::Error> {
        decode_transaction(wire).inspect_err(|err| debug!(%err, "rejecting transaction message"))
    }
}

fn decode_transaction(wire: TransactionWire) -> Result<Transaction, WireError> {
    let asset = from_wire_parts(&wire.asset_name, &wire.asset_scope)?;
    let delta = try_from_wire_string(&wire.delta)?;
    Ok(Transaction::from_event(
        decode_event(wire.event)?,
        asset,
        delta,
        ConsistencyMode::parse_token(&wire.consistency),
        TransactionStatus::parse_token(&wire.status),
    ))
}
