//! Ledger operation handlers
//!
//! The three generic operations a ledger JSON API exposes: Query,
//! Create, Exercise. Each takes the wire-form template reference,
//! normalizes it at the boundary, and interprets it against the
//! [`LedgerStore`]. Failures come back as [`LedgerError`] values; the
//! store is never modified on a failed request.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::lifecycle;
use crate::store::{Contract, LedgerStore};
use crate::template::{EntityKind, TemplateRef};
use crate::types::{LedgerError, Result};

/// Wire rendering of an active contract
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveContract {
    #[serde(rename = "contractId")]
    pub contract_id: String,
    pub payload: Value,
}

impl From<Contract> for ActiveContract {
    fn from(contract: Contract) -> Self {
        Self {
            contract_id: contract.id,
            payload: contract.payload,
        }
    }
}

/// Generic exercise acknowledgement
///
/// The mock does not surface the new contract id: callers are expected
/// to re-query after a transition.
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseAck {
    #[serde(rename = "exerciseResult")]
    pub exercise_result: ExerciseOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseOutcome {
    pub ok: bool,
}

impl ExerciseAck {
    fn ok() -> Self {
        Self {
            exercise_result: ExerciseOutcome { ok: true },
        }
    }
}

/// Query: full sequence for the first requested template
///
/// The query filter object the real API accepts is ignored by the
/// mock. Entity names without a mapped sequence yield an empty list
/// rather than an error, so client polling never hard-fails on a
/// template the mock does not model.
pub fn query(store: &LedgerStore, template_ids: &[TemplateRef]) -> Result<Vec<ActiveContract>> {
    let template = template_ids
        .first()
        .ok_or(LedgerError::InvalidTemplate)?
        .normalize()?;

    let contracts = match EntityKind::from_entity_name(&template.entity_name) {
        Some(kind) => store.snapshot(kind),
        None => Vec::new(),
    };
    debug!(
        entity = %template.entity_name,
        count = contracts.len(),
        "query"
    );
    Ok(contracts.into_iter().map(ActiveContract::from).collect())
}

/// Create: append a new `ReceivableAsset`
///
/// Only the initial lifecycle stage is creatable through this path;
/// every other stage is produced by a transition. The payload is
/// stored verbatim, with no schema validation.
pub fn create(
    store: &LedgerStore,
    template_id: &TemplateRef,
    payload: Value,
) -> Result<ActiveContract> {
    let template = template_id.normalize()?;
    if EntityKind::from_entity_name(&template.entity_name) != Some(EntityKind::ReceivableAsset) {
        return Err(LedgerError::UnsupportedOperation);
    }
    let contract = store.append(EntityKind::ReceivableAsset, payload);
    info!(contract_id = %contract.id, "created ReceivableAsset");
    Ok(contract.into())
}

/// Exercise: run a lifecycle transition
///
/// The (entity kind, choice) pair selects a row of the transition
/// table; the contract is atomically moved from the source sequence to
/// the destination with the row's payload transform applied.
pub fn exercise(
    store: &LedgerStore,
    template_id: &TemplateRef,
    contract_id: &str,
    choice: &str,
    argument: Option<&Value>,
) -> Result<ExerciseAck> {
    let template = template_id.normalize()?;

    let unsupported = || LedgerError::UnsupportedChoice {
        choice: choice.to_string(),
        entity: template.entity_name.clone(),
    };

    let kind = EntityKind::from_entity_name(&template.entity_name).ok_or_else(&unsupported)?;
    let transition = lifecycle::lookup(kind, choice).ok_or_else(&unsupported)?;

    let moved = store.transfer(transition.from, transition.to, contract_id, |payload| {
        (transition.transform)(payload, argument)
    })?;
    info!(
        from = %transition.from,
        to = %transition.to,
        choice = %choice,
        contract_id = %moved.id,
        "exercised"
    );
    Ok(ExerciseAck::ok())
}
