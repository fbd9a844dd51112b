//! Ledger domain errors

use core_kernel::temporal::TemporalError;
use core_kernel::{JournalEntryId, TemplateId};
use domain_numbering::NumberingError;
use thiserror::Error;

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Account number failed to parse or build
    #[error("Numbering error: {0}")]
    Numbering(#[from] NumberingError),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(#[from] TemporalError),

    #[error("Invalid memo pattern: {0}")]
    InvalidMemoPattern(#[from] regex::Error),

    #[error("Account name must not be empty")]
    EmptyAccountName,

    /// Entries of zero would post nothing
    #[error("Journal entry amount must not be zero")]
    ZeroAmount,

    #[error("Journal entry debits and credits the same account: {account}")]
    SameAccount { account: String },

    #[error("Journal entry {entry} does not touch account {account}")]
    UnrelatedEntry { entry: JournalEntryId, account: String },

    #[error("Account is already borrowed and cannot be posted to")]
    AccountInUse,

    /// Account number was parsed by a different template than the chart's
    #[error("Account {number} belongs to template {found}, chart uses {expected}")]
    StructuralMismatch {
        number: String,
        expected: TemplateId,
        found: TemplateId,
    },

    #[error("Account already exists: {number}")]
    DuplicateAccount { number: String },

    #[error("Subledger already exists: {name}")]
    DuplicateSubledger { name: String },

    #[error("Subledger not found: {name}")]
    SubledgerNotFound { name: String },

    #[error("Expected at most one account, {count} matched")]
    AmbiguousMatch { count: usize },

    #[error("Unknown filter operator: {operator}")]
    UnknownOperator { operator: String },

    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),
}
