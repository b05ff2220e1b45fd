//! In-memory contract store
//!
//! Four ordered sequences of active contracts, one per entity kind.
//! Contracts are addressed by an opaque 16-character identifier drawn
//! from a fixed hexadecimal alphabet, generated fresh on every append
//! and never reused. The store is fully volatile: process lifetime
//! equals store lifetime.
//!
//! The store is an explicitly owned object handed to the handlers (no
//! module-level singleton), so tests get a fresh store per case.

use rand::Rng;
use serde_json::Value;
use std::sync::RwLock;

use crate::template::EntityKind;
use crate::types::{LedgerError, Result};

/// Alphabet for contract identifiers (matches nanoid's customAlphabet
/// convention; 16 chars over 16 symbols ≈ 2^64 effective space, so
/// collisions within a run are treated as a non-event)
const CONTRACT_ID_ALPHABET: &[u8] = b"1234567890abcdef";

/// Length of generated contract identifiers
const CONTRACT_ID_LEN: usize = 16;

/// Generate a fresh contract identifier
fn fresh_contract_id() -> String {
    let mut rng = rand::thread_rng();
    (0..CONTRACT_ID_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CONTRACT_ID_ALPHABET.len());
            CONTRACT_ID_ALPHABET[idx] as char
        })
        .collect()
}

/// An active contract: opaque id plus caller-supplied payload
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    pub id: String,
    pub payload: Value,
}

/// One ordered sequence per entity kind
#[derive(Debug, Default)]
struct Sequences {
    receivables: Vec<Contract>,
    confirmed: Vec<Contract>,
    financings: Vec<Contract>,
    settlements: Vec<Contract>,
}

impl Sequences {
    fn of(&self, kind: EntityKind) -> &Vec<Contract> {
        match kind {
            EntityKind::ReceivableAsset => &self.receivables,
            EntityKind::ConfirmedReceivable => &self.confirmed,
            EntityKind::FinancingAgreement => &self.financings,
            EntityKind::SettlementRecord => &self.settlements,
        }
    }

    fn of_mut(&mut self, kind: EntityKind) -> &mut Vec<Contract> {
        match kind {
            EntityKind::ReceivableAsset => &mut self.receivables,
            EntityKind::ConfirmedReceivable => &mut self.confirmed,
            EntityKind::FinancingAgreement => &mut self.financings,
            EntityKind::SettlementRecord => &mut self.settlements,
        }
    }
}

/// Counts per sequence, reported by the health endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    pub receivables: usize,
    pub confirmed: usize,
    pub financings: usize,
    pub settlements: usize,
}

impl StoreStats {
    pub fn total(&self) -> usize {
        self.receivables + self.confirmed + self.financings + self.settlements
    }
}

/// Thread-safe contract store
///
/// A single lock covers all four sequences. Mutating operations take
/// the write guard for their full duration, so the locate-remove-append
/// of a lifecycle transfer is one atomic unit: two concurrent transfers
/// of the same contract id cannot both succeed.
pub struct LedgerStore {
    sequences: RwLock<Sequences>,
}

impl LedgerStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            sequences: RwLock::new(Sequences::default()),
        }
    }

    /// Append a contract with a freshly generated id, returning it
    pub fn append(&self, kind: EntityKind, payload: Value) -> Contract {
        let contract = Contract {
            id: fresh_contract_id(),
            payload,
        };
        let mut seqs = self.sequences.write().unwrap_or_else(|e| e.into_inner());
        seqs.of_mut(kind).push(contract.clone());
        contract
    }

    /// Snapshot the full sequence for a kind, in insertion order
    pub fn snapshot(&self, kind: EntityKind) -> Vec<Contract> {
        let seqs = self.sequences.read().unwrap_or_else(|e| e.into_inner());
        seqs.of(kind).clone()
    }

    /// Atomically move a contract between sequences
    ///
    /// Locates `contract_id` in the `from` sequence, removes it,
    /// applies `transform` to its payload, and appends the result to
    /// the `to` sequence under a fresh id — all under one write guard.
    /// On `ContractNotFound` the store is left untouched.
    pub fn transfer<F>(
        &self,
        from: EntityKind,
        to: EntityKind,
        contract_id: &str,
        transform: F,
    ) -> Result<Contract>
    where
        F: FnOnce(Value) -> Value,
    {
        let mut seqs = self.sequences.write().unwrap_or_else(|e| e.into_inner());
        let source = seqs.of_mut(from);
        let idx = source
            .iter()
            .position(|c| c.id == contract_id)
            .ok_or(LedgerError::ContractNotFound)?;
        let entry = source.remove(idx);
        let moved = Contract {
            id: fresh_contract_id(),
            payload: transform(entry.payload),
        };
        seqs.of_mut(to).push(moved.clone());
        Ok(moved)
    }

    /// Per-sequence counts
    pub fn stats(&self) -> StoreStats {
        let seqs = self.sequences.read().unwrap_or_else(|e| e.into_inner());
        StoreStats {
            receivables: seqs.receivables.len(),
            confirmed: seqs.confirmed.len(),
            financings: seqs.financings.len(),
            settlements: seqs.settlements.len(),
        }
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fresh_id_shape() {
        let id = fresh_contract_id();
        assert_eq!(id.len(), CONTRACT_ID_LEN);
        assert!(id.bytes().all(|b| CONTRACT_ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_append_and_snapshot_preserve_order() {
        let store = LedgerStore::new();
        let a = store.append(EntityKind::ReceivableAsset, json!({"receivableId": "INV-1"}));
        let b = store.append(EntityKind::ReceivableAsset, json!({"receivableId": "INV-2"}));

        let snapshot = store.snapshot(EntityKind::ReceivableAsset);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id, a.id);
        assert_eq!(snapshot[1].id, b.id);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_transfer_moves_not_copies() {
        let store = LedgerStore::new();
        let created = store.append(EntityKind::ReceivableAsset, json!({"amount": 100}));

        let moved = store
            .transfer(
                EntityKind::ReceivableAsset,
                EntityKind::ConfirmedReceivable,
                &created.id,
                |payload| payload,
            )
            .unwrap();

        assert!(store.snapshot(EntityKind::ReceivableAsset).is_empty());
        let confirmed = store.snapshot(EntityKind::ConfirmedReceivable);
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].payload, json!({"amount": 100}));
        // A transition always mints a new id
        assert_ne!(moved.id, created.id);
    }

    #[test]
    fn test_transfer_missing_id_leaves_store_untouched() {
        let store = LedgerStore::new();
        store.append(EntityKind::FinancingAgreement, json!({"principal": 800}));
        let before = store.stats();

        let err = store
            .transfer(
                EntityKind::FinancingAgreement,
                EntityKind::SettlementRecord,
                "0000000000000000",
                |payload| payload,
            )
            .unwrap_err();

        assert_eq!(err, LedgerError::ContractNotFound);
        assert_eq!(store.stats(), before);
        assert_eq!(store.snapshot(EntityKind::SettlementRecord).len(), 0);
    }

    #[test]
    fn test_stats_totals() {
        let store = LedgerStore::new();
        store.append(EntityKind::ReceivableAsset, json!({}));
        store.append(EntityKind::SettlementRecord, json!({}));
        let stats = store.stats();
        assert_eq!(stats.receivables, 1);
        assert_eq!(stats.settlements, 1);
        assert_eq!(stats.total(), 2);
    }
}
