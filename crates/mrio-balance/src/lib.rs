//! mrio-balance: GRAS balancing of input-output tables.
//!
//! Updates a benchmark flow matrix, whose entries may be negative, so that it
//! matches independently estimated row and column totals while preserving its
//! sign pattern and relative structure. The balanced matrices feed the
//! multi-regional input-output tables used for regional economic-loss
//! modelling.
//!
//! The crate is split into small modules: numeric helpers with explicit
//! elementwise/matrix semantics (`math`), the balancer itself (`gras`), its
//! configuration (`config`), parallel batch balancing (`batch`) and CSV/TSV
//! table I/O (`io`).
pub mod batch;
pub mod config;
pub mod error;
pub mod gras;
pub mod io;
pub mod math;

pub use batch::{balance_all, summarize, BalanceJob, BatchSummary, JobOutcome};
pub use config::BalanceConfig;
pub use error::BalanceError;
pub use gras::{
    gras, margin_gap, BalanceResult, BalanceSummary, GrasBalancer, MULTIPLIER_LIMIT,
};
