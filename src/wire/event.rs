use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    event::{Event, EventId, EventType, Payload},
    identity::{Identity, IdentityType},
    wire::{WireError, from_unix_millis, to_unix_millis, token::WireToken},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventIdWire {
    pub value: String,
    pub timestamp_ms: i64,
}

impl From<&EventId> for EventIdWire {
    fn from(id: &EventId) -> Self {
        Self {
            value: id.value().to_string(),
            timestamp_ms: to_unix_millis(id.timestamp()),
        }
    }
}

impl TryFrom<EventIdWire> for EventId {
    type Error = WireError;

    fn try_from(wire: EventIdWire) -> Result<Self, Self::Error> {
        Ok(EventId::new(wire.value, from_unix_millis(wire.timestamp_ms)?)?)
    }
}

/// Flat event message. The actor is spread over the `actor_*` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWire {
    pub event_id: String,
    pub event_timestamp_ms: i64,
    pub occurred_at_ms: i64,
    pub actor_id: String,
    pub actor_type: String,
    #[serde(default)]
    pub actor_metadata: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actor_attached_policy_ids: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: BTreeMap<String, String>,
    pub schema_version: i32,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl From<&Event> for EventWire {
    fn from(event: &Event) -> Self {
        let actor = event.actor();
        Self {
            event_id: event.id().value().to_string(),
            event_timestamp_ms: to_unix_millis(event.id().timestamp()),
            occurred_at_ms: to_unix_millis(event.occurred_at()),
            actor_id: actor.id().to_string(),
            actor_type: actor.identity_type().token().to_string(),
            actor_metadata: actor.metadata().clone(),
            actor_attached_policy_ids: actor.attached_policy_ids().to_vec(),
            kind: event.event_type().token().to_string(),
            payload: event.payload().as_map().clone(),
            schema_version: event.schema_version(),
            metadata: event.metadata().clone(),
        }
    }
}

impl TryFrom<EventWire> for Event {
    type Error = WireError;

    fn try_from(wire: EventWire) -> Result<Self, Self::Error> {
        decode_event(wire).inspect_err(|err| debug!(%err, "rejecting event message"))
    }
}

pub(crate) fn decode_event(wire: EventWire) -> Result<Event, WireError> {
    let id = EventId::new(wire.event_id, from_unix_millis(wire.event_timestamp_ms)?)?;
    let actor = Identity::new(wire.actor_id, IdentityType::parse_token(&wire.actor_type))?
        .with_metadata(wire.actor_metadata)
        .with_attached_policy_ids(wire.actor_attached_policy_ids);

    Ok(Event::builder()
        .id(id)
        .occurred_at(from_unix_millis(wire.occurred_at_ms)?)
        .actor(actor)
        .event_type(EventType::parse_token(&wire.kind))
        .payload(Payload::from(wire.payload))
        .schema_version(wire.schema_version)
        .metadata(wire.metadata)
        .build()?)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{event::EventError, identity::IdentityError, wire::arbitrary};

    fn sample_event() -> Event {
        let at = Utc.timestamp_millis_opt(1_714_565_123_456).unwrap();
        Event::builder()
            .id(EventId::new("evt-42", at).unwrap())
            .occurred_at(at)
            .actor(
                Identity::system("matchmaker")
                    .unwrap()
                    .with_metadata(BTreeMap::from([("zone".to_string(), "eu-1".to_string())]))
                    .with_attached_policy_ids(vec!["audit".to_string()]),
            )
            .event_type(EventType::AssetUpdated)
            .payload(
                Payload::builder()
                    .put_decimal("value", dec!(10.25))
                    .put_bool("manual", false)
                    .build(),
            )
            .schema_version(2)
            .with_metadata("origin", "test")
            .build()
            .unwrap()
    }

    #[test]
    fn event_round_trip() {
        let event = sample_event();
        let wire = EventWire::from(&event);
        assert_eq!(wire.event_timestamp_ms, 1_714_565_123_456);
        assert_eq!(wire.actor_type, "SYSTEM");
        assert_eq!(wire.kind, "ASSET_UPDATED");
        assert_eq!(wire.payload["value"], "10.25");
        assert_eq!(Event::try_from(wire).unwrap(), event);
    }

    #[test]
    fn event_survives_json() {
        let event = sample_event();
        let json = serde_json::to_string(&EventWire::from(&event)).unwrap();
        let wire: EventWire = serde_json::from_str(&json).unwrap();
        assert_eq!(Event::try_from(wire).unwrap(), event);
    }

    #[test]
    fn unknown_type_degrades_to_custom() {
        let mut wire = EventWire::from(&sample_event());
        wire.kind = "ASSET_MELTED".to_string();
        assert_eq!(Event::try_from(wire).unwrap().event_type(), EventType::Custom);
    }

    #[test]
    fn malformed_events_are_rejected() {
        let mut wire = EventWire::from(&sample_event());
        wire.actor_id.clear();
        assert_eq!(
            Event::try_from(wire),
            Err(WireError::Identity(IdentityError::EmptyId))
        );

        let mut wire = EventWire::from(&sample_event());
        wire.schema_version = 0;
        assert_eq!(
            Event::try_from(wire),
            Err(WireError::Event(EventError::UnsupportedSchemaVersion { version: 0 }))
        );

        let mut wire = EventWire::from(&sample_event());
        wire.event_id.clear();
        assert_eq!(
            Event::try_from(wire),
            Err(WireError::Event(EventError::EmptyEventId))
        );

        let mut wire = EventWire::from(&sample_event());
        wire.occurred_at_ms = i64::MIN;
        assert_eq!(
            Event::try_from(wire),
            Err(WireError::TimestampOutOfRange { millis: i64::MIN })
        );
    }

    #[test]
    fn event_id_round_trip() {
        let id = EventId::generate();
        assert_eq!(EventId::try_from(EventIdWire::from(&id)).unwrap(), id);
    }

    proptest! {
        #[test]
        fn any_event_round_trips(event in arbitrary::event()) {
            prop_assert_eq!(Event::try_from(EventWire::from(&event)), Ok(event));
        }
    }
}
