//! Scrip - mock ledger JSON API for a receivables-financing workflow
//!
//! Emulates the query/create/exercise surface of a ledger JSON API
//! against an in-memory contract store. A logical receivable moves
//! through a fixed lifecycle:
//!
//! ```text
//! ReceivableAsset -> ConfirmedReceivable -> FinancingAgreement -> SettlementRecord
//! ```
//!
//! ## Modules
//!
//! - **template**: template identifier normalization (compact string or structured form)
//! - **store**: the four contract sequences with atomic lifecycle transfers
//! - **lifecycle**: the (entity kind, choice) transition table and payload transforms
//! - **ledger**: the three operation handlers
//! - **server** / **routes**: hyper HTTP surface

pub mod config;
pub mod ledger;
pub mod lifecycle;
pub mod routes;
pub mod server;
pub mod store;
pub mod template;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{LedgerError, Result};
