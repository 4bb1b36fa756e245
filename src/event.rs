use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    identity::Identity,
    transaction::Transaction,
    wire::{
        decimal::{to_wire_string, try_from_wire_string},
        token::WireToken,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Transaction,
    AssetCreated,
    AssetUpdated,
    AssetDeleted,
    IdentityCreated,
    IdentityUpdated,
    System,
    Custom,
}

impl WireToken for EventType {
    const FALLBACK: Self = EventType::Custom;
    const ALL: &'static [Self] = &[
        EventType::Transaction,
        EventType::AssetCreated,
        EventType::AssetUpdated,
        EventType::AssetDeleted,
        EventType::IdentityCreated,
        EventType::IdentityUpdated,
        EventType::System,
        EventType::Custom,
    ];

    fn token(self) -> &'static str {
        match self {
            EventType::Transaction => "TRANSACTION",
            EventType::AssetCreated => "ASSET_CREATED",
            EventType::AssetUpdated => "ASSET_UPDATED",
            EventType::AssetDeleted => "ASSET_DELETED",
            EventType::IdentityCreated => "IDENTITY_CREATED",
            EventType::IdentityUpdated => "IDENTITY_UPDATED",
            EventType::System => "SYSTEM",
            EventType::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event id must not be empty")]
    EmptyEventId,
    #[error("Event actor is required")]
    MissingActor,
    #[error("Transaction asset is required")]
    MissingAsset,
    #[error("Schema version must be at least 1, got {version}")]
    UnsupportedSchemaVersion { version: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventId {
    value: String,
    timestamp: DateTime<Utc>,
}

impl EventId {
    pub fn new(value: impl Into<String>, timestamp: DateTime<Utc>) -> Result<Self, EventError> {
        let value = value.into();
        if value.is_empty() {
            return Err(EventError::EmptyEventId);
        }
        Ok(Self { value, timestamp })
    }

    pub fn generate() -> Self {
        Self {
            value: Uuid::new_v4().to_string(),
            timestamp: now_millis(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Current time at the resolution the wire format carries.
pub(crate) fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Event payload. Values are kept in their canonical string form, which is
/// also what goes on the wire, and are typed on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Payload(BTreeMap<String, String>);

impl Payload {
    pub fn builder() -> PayloadBuilder {
        PayloadBuilder::default()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_str(key)?.parse().ok()
    }

    pub fn get_decimal(&self, key: &str) -> Option<Decimal> {
        try_from_wire_string(self.get_str(key)?).ok()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        let value = self.get_str(key)?;
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl From<BTreeMap<String, String>> for Payload {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self(values)
    }
}

#[derive(Debug, Default)]
pub struct PayloadBuilder(BTreeMap<String, String>);

impl PayloadBuilder {
    pub fn put_str(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn put_i64(self, key: impl Into<String>, value: i64) -> Self {
        self.put_str(key, value.to_string())
    }

    pub fn put_decimal(self, key: impl Into<String>, value: Decimal) -> Self {
        self.put_str(key, to_wire_string(value))
    }

    pub fn put_bool(self, key: impl Into<String>, value: bool) -> Self {
        self.put_str(key, value.to_string())
    }

    pub fn put_identity(self, key: impl Into<String>, value: &Identity) -> Self {
        self.put_str(key, value.canonical())
    }

    pub fn build(self) -> Payload {
        Payload(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub(crate) id: EventId,
    pub(crate) occurred_at: DateTime<Utc>,
    pub(crate) actor: Identity,
    pub(crate) event_type: EventType,
    pub(crate) payload: Payload,
    pub(crate) schema_version: i32,
    pub(crate) metadata: BTreeMap<String, String>,
}

impl Event {
    pub fn builder() -> EventBuilder {
        EventBuilder::default()
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn actor(&self) -> &Identity {
        &self.actor
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn schema_version(&self) -> i32 {
        self.schema_version
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn is_valid(&self) -> bool {
        !self.id.value.is_empty() && self.actor.is_valid() && self.schema_version >= 1
    }
}

/// Accumulates event fields; `actor` is the only one without a default.
#[derive(Debug, Default)]
pub struct EventBuilder {
    id: Option<EventId>,
    occurred_at: Option<DateTime<Utc>>,
    actor: Option<Identity>,
    event_type: Option<EventType>,
    payload: Payload,
    schema_version: Option<i32>,
    metadata: BTreeMap<String, String>,
}

impl EventBuilder {
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

    pub fn event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
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

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<Event, EventError> {
        let actor = self.actor.ok_or(EventError::MissingActor)?;
        let schema_version = self.schema_version.unwrap_or(1);
        if schema_version < 1 {
            return Err(EventError::UnsupportedSchemaVersion {
                version: schema_version,
            });
        }
        Ok(Event {
            id: self.id.unwrap_or_else(EventId::generate),
            occurred_at: self.occurred_at.unwrap_or_else(now_millis),
            actor,
            event_type: self.event_type.unwrap_or(EventType::Custom),
            payload: self.payload,
            schema_version,
            metadata: self.metadata,
        })
    }
}

/// Element of an event stream as seen by projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRecord {
    Event(Event),
    Transaction(Transaction),
}

impl EventRecord {
    pub fn event(&self) -> &Event {
        match self {
            EventRecord::Event(event) => event,
            EventRecord::Transaction(transaction) => transaction.event(),
        }
    }

    pub fn as_transaction(&self) -> Option<&Transaction> {
        match self {
            EventRecord::Event(_) => None,
            EventRecord::Transaction(transaction) => Some(transaction),
        }
    }
}

impl From<Event> for EventRecord {
    fn from(event: Event) -> Self {
        EventRecord::Event(event)
    }
}

impl From<Transaction> for EventRecord {
    fn from(transaction: Transaction) -> Self {
        EventRecord::Transaction(transaction)
    }
}
