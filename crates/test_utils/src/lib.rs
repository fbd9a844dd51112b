//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! bookkeeping test suite.
//!
//! # Modules
//!
//! - `fixtures`: The standard `XX-XX-XXX` template, dates and sample accounts
//! - `builders`: Builder patterns for accounts and ledgers
//! - `assertions`: Custom assertion helpers for balances and query results
//! - `generators`: Property-based test data generators
//! - `logging`: One-time log subscriber setup for tests

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod generators;
pub mod logging;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use generators::*;
pub use logging::init_tracing;
