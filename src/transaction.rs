use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    asset::AssetId,
    event::{Event, EventError, EventId, EventType, Payload},
    identity::Identity,
    wire::token::WireToken,
};

pub const SOURCE_KEY: &str = "source";
pub const TARGET_KEY: &str = "target";
pub const REASON_KEY: &str = "reason";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsistencyMode {
    Strong,
    Eventual,
    Optimistic,
}

impl WireToken for ConsistencyMode {
    const FALLBACK: Self = ConsistencyMode::Strong;
    const ALL: &'static [Self] = &[
        ConsistencyMode::Strong,
        ConsistencyMode::Eventual,
        ConsistencyMode::Optimistic,
    ];

    fn token(self) -> &'static str {
        match self {
            ConsistencyMode::Strong => "STRONG",
            ConsistencyMode::Eventual => "EVENTUAL",
            ConsistencyMode::Optimistic => "OPTIMISTIC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
    RolledBack,
}

impl TransactionStatus {
    /// No further transitions are expected once a transaction is final.
    pub fn is_final(self) -> bool {
        matches!(
            self,
            TransactionStatus::Completed
                | TransactionStatus::Failed
                | TransactionStatus::Cancelled
                | TransactionStatus::RolledBack
        )
    }
}

impl WireToken for TransactionStatus {
    const FALLBACK: Self = TransactionStatus::Pending;
    const ALL: &'static [Self] = &[
        TransactionStatus::Pending,
        TransactionStatus::Processing,
        TransactionStatus::Completed,
        TransactionStatus::Failed,
        TransactionStatus::Cancelled,
        TransactionStatus::RolledBack,
    ];

    fn token(self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Processing => "PROCESSING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Cancelled => "CANCELLED",
            TransactionStatus::RolledBack => "ROLLED_BACK",
        }
    }

    fn alias(token: &str) -> Option<Self> {
        (token == "ROLLEDBACK").then_some(TransactionStatus::RolledBack)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// An event that moves `delta` of an asset. The counterparties live in the
/// payload under `source` and `target` as canonical identity strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    event: Event,
    asset: AssetId,
    delta: Decimal,
    consistency: ConsistencyMode,
    status: TransactionStatus,
}

impl Transaction {
    pub fn builder() -> TransactionBuilder {
        TransactionBuilder::default()
    }

    /// Wraps an existing event, forcing its type to [`EventType::Transaction`].
    pub fn from_event(
        mut event: Event,
        asset: AssetId,
        delta: Decimal,
        consistency: ConsistencyMode,
        status: TransactionStatus,
    ) -> Self {
        event.event_type = EventType::Transaction;
        Self {
            event,
            asset,
            delta,
            consistency,
            status,
        }
    }

    pub fn with_status(&self, status: TransactionStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn id(&self) -> &EventId {
        self.event.id()
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.event.occurred_at()
    }

    pub fn actor(&self) -> &Identity {
        self.event.actor()
    }

    pub fn payload(&self) -> &Payload {
        self.event.payload()
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        self.event.metadata()
    }

    pub fn asset(&self) -> &AssetId {
        &self.asset
    }

    pub fn delta(&self) -> Decimal {
        self.delta
    }

    pub fn consistency(&self) -> ConsistencyMode {
        self.consistency
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn source(&self) -> Option<Identity> {
        self.identity_at(SOURCE_KEY)
    }

    pub fn target(&self) -> Option<Identity> {
        self.identity_at(TARGET_KEY)
    }

    pub fn reason(&self) -> Option<&str> {
        self.payload().get_str(REASON_KEY)
    }

    pub fn is_valid(&self) -> bool {
        self.event.is_valid()
    }

    fn identity_at(&self, key: &str) -> Option<Identity> {
        Identity::parse(self.payload().get_str(key)?).ok()
    }
}

#[derive(Debug, Default)]
pub struct TransactionBuilder {
    id: Option<EventId>,
    occurred_at: Option<DateTime<Utc>>,
    actor: Option<Identity>,
    asset: Option<AssetId>,
    delta: Decimal,
    consistency: Option<ConsistencyMode>,
    status: Option<TransactionStatus>,
    payload: BTreeMap<String, String>,
    schema_version: Option<i32>,
    metadata: BTreeMap<String, String>,
}

impl TransactionBuilder {
    pub fn id(mut self, id: EventId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    pub fn actor(mut self, actor: Identity) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn asset(mut self, asset: AssetId) -> Self {
        self.asset = Some(asset);
        self
    }

    pub fn delta(mut self, delta: Decimal) -> Self {
        self.delta = delta;
        self
    }

    pub fn consistency(mut self, consistency: ConsistencyMode) -> Self {
        self.consistency = Some(consistency);
        self
    }

    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Entries are merged into whatever `source`, `target` or `reason`
    /// already set; later calls win.
    pub fn payload(mut self, payload: &Payload) -> Self {
        self.payload
            .extend(payload.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    pub fn source(mut self, source: &Identity) -> Self {
        self.payload.insert(SOURCE_KEY.to_string(), source.canonical());
        self
    }

    pub fn target(mut self, target: &Identity) -> Self {
        self.payload.insert(TARGET_KEY.to_string(), target.canonical());
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.payload.insert(REASON_KEY.to_string(), reason.into());
        self
    }

    pub fn schema_version(mut self, schema_version: i32) -> Self {
        self.schema_version = Some(schema_version);
        self
    }

    pub fn metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn build(self) -> Result<Transaction, EventError> {
        let actor = self.actor.ok_or(EventError::MissingActor)?;
        let asset = self.asset.ok_or(EventError::MissingAsset)?;

        let mut event = Event::builder()
            .actor(actor)
            .event_type(EventType::Transaction)
            .payload(Payload::from(self.payload))
            .metadata(self.metadata);
        if let Some(id) = self.id {
            event = event.id(id);
        }
        if let Some(occurred_at) = self.occurred_at {
            event = event.occurred_at(occurred_at);
        }
        if let Some(schema_version) = self.schema_version {
            event = event.schema_version(schema_version);
        }

        Ok(Transaction::from_event(
            event.build()?,
            asset,
            self.delta,
            self.consistency.unwrap_or(ConsistencyMode::Strong),
            self.status.unwrap_or(TransactionStatus::Pending),
        ))
    }
}
