//! Receivable lifecycle transition table
//!
//! The fixed four-stage workflow:
//!
//! ```text
//! ReceivableAsset --Confirm--> ConfirmedReceivable --Finance--> FinancingAgreement --Settle--> SettlementRecord
//! ```
//!
//! Transitions are strictly linear: no cycles, no branching, nothing
//! is reversible. The table is data rather than conditional control
//! flow, so a new lifecycle stage is a new row, not a new branch.

use chrono::Utc;
use serde_json::{Map, Value};

use crate::template::EntityKind;

/// One row of the transition table
pub struct Transition {
    /// Entity kind the choice is exercised on
    pub from: EntityKind,
    /// Choice name carried in the exercise request
    pub choice: &'static str,
    /// Entity kind the contract moves to
    pub to: EntityKind,
    /// Payload transform applied during the move
    pub transform: fn(Value, Option<&Value>) -> Value,
}

/// The full table. Lookup is linear; the table is three rows.
pub const TRANSITIONS: &[Transition] = &[
    Transition {
        from: EntityKind::ReceivableAsset,
        choice: "Confirm",
        to: EntityKind::ConfirmedReceivable,
        transform: confirm,
    },
    Transition {
        from: EntityKind::ConfirmedReceivable,
        choice: "Finance",
        to: EntityKind::FinancingAgreement,
        transform: finance,
    },
    Transition {
        from: EntityKind::FinancingAgreement,
        choice: "Settle",
        to: EntityKind::SettlementRecord,
        transform: settle,
    },
];

/// Find the transition for an (entity kind, choice) pair
pub fn lookup(from: EntityKind, choice: &str) -> Option<&'static Transition> {
    TRANSITIONS.iter().find(|t| t.from == from && t.choice == choice)
}

/// Current wall-clock UTC date truncated to calendar-day precision
pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Confirm: payload copied unchanged
fn confirm(payload: Value, _argument: Option<&Value>) -> Value {
    payload
}

/// Finance: `principal` from the argument, falling back to the
/// receivable's `amount`, then 0; `maturity` from the argument,
/// falling back to `dueDate`, then today's date.
fn finance(payload: Value, argument: Option<&Value>) -> Value {
    let principal = pick(argument, "principal")
        .or_else(|| pick(Some(&payload), "amount"))
        .unwrap_or(Value::from(0));
    let maturity = pick(argument, "maturity")
        .or_else(|| pick(Some(&payload), "dueDate"))
        .unwrap_or_else(|| Value::from(today()));
    merge(payload, [("principal", principal), ("maturity", maturity)])
}

/// Settle: `paidAmount` from the argument, falling back to
/// `faceAmount`, then 0; `paidOn` from the argument, then today.
fn settle(payload: Value, argument: Option<&Value>) -> Value {
    let paid_amount = pick(argument, "paidAmount")
        .or_else(|| pick(Some(&payload), "faceAmount"))
        .unwrap_or(Value::from(0));
    let paid_on = pick(argument, "paidOn").unwrap_or_else(|| Value::from(today()));
    merge(payload, [("paidAmount", paid_amount), ("paidOn", paid_on)])
}

/// Non-null field lookup; explicit `null` counts as absent
fn pick(value: Option<&Value>, field: &str) -> Option<Value> {
    value
        .and_then(|v| v.get(field))
        .filter(|v| !v.is_null())
        .cloned()
}

/// Shallow merge: override fields replace, all other original fields
/// pass through unchanged. A non-object payload contributes nothing.
fn merge<const N: usize>(payload: Value, overrides: [(&str, Value); N]) -> Value {
    let mut map = match payload {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in overrides {
        map.insert(key.to_string(), value);
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_known_pairs() {
        let t = lookup(EntityKind::ReceivableAsset, "Confirm").unwrap();
        assert_eq!(t.to, EntityKind::ConfirmedReceivable);
        let t = lookup(EntityKind::ConfirmedReceivable, "Finance").unwrap();
        assert_eq!(t.to, EntityKind::FinancingAgreement);
        let t = lookup(EntityKind::FinancingAgreement, "Settle").unwrap();
        assert_eq!(t.to, EntityKind::SettlementRecord);
    }

    #[test]
    fn test_lookup_rejects_unknown_pairs() {
        assert!(lookup(EntityKind::FinancingAgreement, "Cancel").is_none());
        assert!(lookup(EntityKind::ReceivableAsset, "Finance").is_none());
        assert!(lookup(EntityKind::SettlementRecord, "Confirm").is_none());
    }

    #[test]
    fn test_confirm_is_identity() {
        let payload = json!({"receivableId": "INV-1", "amount": 1000});
        assert_eq!(confirm(payload.clone(), None), payload);
    }

    #[test]
    fn test_finance_argument_overrides() {
        let out = finance(
            json!({"receivableId": "INV-1", "amount": 1000}),
            Some(&json!({"principal": 800, "maturity": "2025-06-01"})),
        );
        assert_eq!(out["principal"], json!(800));
        assert_eq!(out["maturity"], json!("2025-06-01"));
        // original fields pass through
        assert_eq!(out["receivableId"], json!("INV-1"));
        assert_eq!(out["amount"], json!(1000));
    }

    #[test]
    fn test_finance_falls_back_to_amount() {
        let out = finance(json!({"amount": 500}), None);
        assert_eq!(out["principal"], json!(500));
    }

    #[test]
    fn test_finance_defaults_when_nothing_supplied() {
        let out = finance(json!({}), None);
        assert_eq!(out["principal"], json!(0));
        assert_eq!(out["maturity"], json!(today()));
    }

    #[test]
    fn test_finance_null_argument_field_counts_as_absent() {
        let out = finance(json!({"amount": 250}), Some(&json!({"principal": null})));
        assert_eq!(out["principal"], json!(250));
    }

    #[test]
    fn test_settle_fallbacks() {
        let out = settle(
            json!({"faceAmount": 750}),
            Some(&json!({"paidOn": "2025-06-02"})),
        );
        assert_eq!(out["paidAmount"], json!(750));
        assert_eq!(out["paidOn"], json!("2025-06-02"));
    }

    #[test]
    fn test_today_is_calendar_day_precision() {
        let d = today();
        assert_eq!(d.len(), 10);
        assert_eq!(&d[4..5], "-");
        assert_eq!(&d[7..8], "-");
    }
}
