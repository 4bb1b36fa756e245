use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    asset::AssetId,
    context::Context,
    event::{EventRecord, EventType},
    identity::Identity,
    result::NdsResult,
};

pub mod balance;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectionIdError {
    #[error("Projection id must not be empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectionId(String);

impl ProjectionId {
    pub fn new(value: impl Into<String>) -> Result<Self, ProjectionIdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ProjectionIdError::Empty);
        }
        Ok(Self(value))
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionStatus {
    Active,
    Rebuilding,
    Paused,
    Error,
}

/// Read model derived by folding an event stream.
///
/// Implementations must be deterministic: replaying the same records from
/// [`Projection::initial_state`] always yields the same state.
pub trait Projection: Send + Sync {
    type State: Clone + Send + Sync + 'static;

    fn id(&self) -> &ProjectionId;

    fn name(&self) -> &str {
        self.id().as_str()
    }

    fn initial_state(&self) -> Self::State;

    fn apply(&self, state: Self::State, record: &EventRecord) -> Self::State;

    fn replay<'a>(&self, records: impl IntoIterator<Item = &'a EventRecord>) -> Self::State {
        records
            .into_iter()
            .fold(self.initial_state(), |state, record| self.apply(state, record))
    }
}

/// Filter and page for history lookups. Time bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub event_type: Option<EventType>,
    pub asset: Option<AssetId>,
    pub identity: Option<Identity>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            event_type: None,
            asset: None,
            identity: None,
            start: None,
            end: None,
            limit: DEFAULT_HISTORY_LIMIT,
            offset: 0,
        }
    }
}

impl HistoryQuery {
    pub fn of_type(event_type: EventType) -> Self {
        Self {
            event_type: Some(event_type),
            ..Default::default()
        }
    }

    pub fn for_asset(asset: AssetId) -> Self {
        Self {
            asset: Some(asset),
            ..Default::default()
        }
    }

    pub fn for_identity(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            ..Default::default()
        }
    }

    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// An asset filter only ever matches transactions. An identity filter
    /// matches the actor or either counterparty.
    pub fn matches(&self, record: &EventRecord) -> bool {
        let event = record.event();
        let occurred_at = event.occurred_at();
        if self.start.is_some_and(|start| occurred_at < start)
            || self.end.is_some_and(|end| occurred_at > end)
        {
            return false;
        }
        if self
            .event_type
            .is_some_and(|event_type| event.event_type() != event_type)
        {
            return false;
        }

        if let Some(asset) = &self.asset {
            match record.as_transaction() {
                Some(tx) if tx.asset() == asset => {}
                _ => return false,
            }
        }

        if let Some(identity) = &self.identity {
            let involved = identity.same_principal(event.actor())
                || record.as_transaction().is_some_and(|tx| {
                    [tx.source(), tx.target()]
                        .into_iter()
                        .flatten()
                        .any(|party| identity.same_principal(&party))
                });
            if !involved {
                return false;
            }
        }

        true
    }

    pub fn select<'a>(
        &self,
        records: impl IntoIterator<Item = &'a EventRecord>,
    ) -> impl Iterator<Item = &'a EventRecord> {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .skip(self.offset)
            .take(self.limit)
    }
}

/// Read side of the economy. Domain outcomes such as an unknown projection
/// come back as [`NdsResult::Failure`].
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn query_balance(
        &self,
        asset: &AssetId,
        identity: Option<&Identity>,
        context: Option<&Context>,
    ) -> NdsResult<Decimal>;

    async fn query_history(
        &self,
        query: &HistoryQuery,
        context: Option<&Context>,
    ) -> NdsResult<Vec<EventRecord>>;

    async fn query_projection<S>(
        &self,
        projection_id: &ProjectionId,
        context: Option<&Context>,
    ) -> NdsResult<S>
    where
        S: Clone + Send + Sync + 'static;

    /// State of the projection as it was at `target_time`.
    async fn replay<S>(
        &self,
        projection_id: &ProjectionId,
        target_time: DateTime<Utc>,
        context: Option<&Context>,
    ) -> NdsResult<S>
    where
        S: Clone + Send + Sync + 'static;

    async fn register_projection<P>(&self, projection: P) -> NdsResult<()>
    where
        P: Projection + 'static;

    async fn unregister_projection(&self, projection_id: &ProjectionId) -> NdsResult<()>;
}
