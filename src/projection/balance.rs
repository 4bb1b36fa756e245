use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    asset::AssetId,
    event::EventRecord,
    identity::Identity,
    transaction::TransactionStatus,
};

use super::{Projection, ProjectionId};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BalanceKey {
    pub asset: AssetId,
    /// Canonical `TYPE:id` form of the holder.
    pub holder: String,
}

impl BalanceKey {
    pub fn new(asset: &AssetId, holder: &Identity) -> Self {
        Self {
            asset: asset.clone(),
            holder: holder.canonical(),
        }
    }
}

pub type Balances = BTreeMap<BalanceKey, Decimal>;

/// Per holder balances built from completed transactions.
///
/// The delta is credited to the target, or to the actor when there is no
/// target, and debited from the source when one is given. Transactions in
/// any other status and plain events leave the state untouched.
#[derive(Debug, Clone)]
pub struct BalanceProjection {
    id: ProjectionId,
}

impl Default for BalanceProjection {
    fn default() -> Self {
        Self::new(ProjectionId::generate())
    }
}

impl BalanceProjection {
    pub fn new(id: ProjectionId) -> Self {
        Self { id }
    }

    pub fn balance(state: &Balances, asset: &AssetId, holder: &Identity) -> Decimal {
        state
            .get(&BalanceKey::new(asset, holder))
            .copied()
            .unwrap_or_default()
    }
}

impl Projection for BalanceProjection {
    type State = Balances;

    fn id(&self) -> &ProjectionId {
        &self.id
    }

    fn name(&self) -> &str {
        "balances"
    }

    fn initial_state(&self) -> Self::State {
        Balances::new()
    }

    fn apply(&self, mut state: Self::State, record: &EventRecord) -> Self::State {
        let Some(tx) = record.as_transaction() else {
            debug!(event_id = %record.event().id(), "skipping non-transaction record");
            return state;
        };
        if tx.status() != TransactionStatus::Completed {
            debug!(event_id = %tx.id(), status = %tx.status(), "skipping unsettled transaction");
            return state;
        }

        let holder = tx.target().unwrap_or_else(|| tx.actor().clone());
        *state
            .entry(BalanceKey::new(tx.asset(), &holder))
            .or_default() += tx.delta();
        if let Some(source) = tx.source() {
            *state
                .entry(BalanceKey::new(tx.asset(), &source))
                .or_default() -= tx.delta();
        }
        state
    }
}
