//! proptest strategies for the domain values the adapters carry.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use proptest::{
    collection::{btree_map, vec},
    option,
    prelude::*,
    sample::select,
};
use rust_decimal::Decimal;

use crate::{
    asset::{AssetId, AssetScope},
    event::{Event, EventId, EventType, Payload},
    identity::{Identity, IdentityType},
    transaction::{ConsistencyMode, Transaction, TransactionStatus},
    wire::token::WireToken,
};

fn name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.:-]{1,12}"
}

fn string_map() -> impl Strategy<Value = BTreeMap<String, String>> {
    btree_map("[a-z_]{1,8}", ".{0,16}", 0..4)
}

prop_compose! {
    pub(crate) fn identity()
        (
            id in name(),
            kind in select(IdentityType::ALL),
            metadata in string_map(),
            policy_ids in vec(name(), 0..3),
        ) -> Identity {
        Identity::new(id, kind)
            .unwrap()
            .with_metadata(metadata)
            .with_attached_policy_ids(policy_ids)
    }
}

// Whole milliseconds between 1900 and 2100.
prop_compose! {
    pub(crate) fn timestamp()
        (millis in -2_208_988_800_000i64..=4_102_444_800_000) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }
}

// At most nine fractional digits.
prop_compose! {
    pub(crate) fn delta()
        (mantissa in any::<i64>(), scale in 0u32..=9) -> Decimal {
        Decimal::new(mantissa, scale)
    }
}

prop_compose! {
    pub(crate) fn event()
        (
            id in name(),
            id_at in timestamp(),
            occurred_at in timestamp(),
            actor in identity(),
            kind in select(EventType::ALL),
            payload in string_map(),
            schema_version in 1..=i32::MAX,
            metadata in string_map(),
        ) -> Event {
        Event::builder()
            .id(EventId::new(id, id_at).unwrap())
            .occurred_at(occurred_at)
            .actor(actor)
            .event_type(kind)
            .payload(Payload::from(payload))
            .schema_version(schema_version)
            .metadata(metadata)
            .build()
            .unwrap()
    }
}

prop_compose! {
    pub(crate) fn transaction()
        (
            event in event(),
            scope in select(AssetScope::ALL),
            asset in name(),
            delta in delta(),
            consistency in select(ConsistencyMode::ALL),
            status in select(TransactionStatus::ALL),
            source in option::of(identity()),
            target in option::of(identity()),
            reason in option::of(".{0,16}"),
        ) -> Transaction {
        let mut builder = Transaction::builder()
            .id(event.id().clone())
            .occurred_at(event.occurred_at())
            .actor(event.actor().clone())
            .asset(AssetId::new(scope, asset).unwrap())
            .delta(delta)
            .consistency(consistency)
            .status(status)
            .payload(event.payload())
            .schema_version(event.schema_version())
            .metadata(event.metadata().clone());
        if let Some(source) = &source {
            builder = builder.source(source);
        }
        if let Some(target) = &target {
            builder = builder.target(target);
        }
        if let Some(reason) = reason {
            builder = builder.reason(reason);
        }
        builder.build().unwrap()
    }
}
