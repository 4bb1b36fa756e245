/// Scoped asset ids and asset balances with their limit/floor rules.
pub mod asset;

/// Who performs an action: players, the system, AI agents, external services.
pub mod identity;

/// Immutable events, their payload, and the record type projections replay.
pub mod event;

/// Transactions are events that move an amount of an asset between
/// identities. Counterparties are derived from the event payload.
pub mod transaction;

/// Trace/correlation context carried next to requests.
pub mod context;

/// Policies that can be attached to identities.
pub mod policy;

/// Rationale records explaining automated decisions.
pub mod audit;

/// Success/failure envelope for domain outcomes.
///
/// NOTE: malformed input is never reported through this envelope, it is
/// rejected by the constructor or codec that sees it.
pub mod result;

/// Event bus interface: publish, subscribe and history lookups.
pub mod bus;

/// Semantic context and tensor embeddings for AI consumers.
pub mod semantic;

/// Read models built from event streams, plus the query service interface
/// that exposes them.
pub mod projection;

/// Transport DTOs and the codecs between them and the domain types,
/// including the decimal string and fixed-point money encodings.
pub mod wire;

/// CSV in, balances out. Backs the `nds-wire` binary and lives in the
/// library so the integration tests can drive it directly.
pub mod bin_utils;
