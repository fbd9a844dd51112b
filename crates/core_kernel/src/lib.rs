//! Core Kernel - Foundational types for the bookkeeping system
//!
//! This crate provides the building blocks shared by the numbering and ledger crates:
//! - Strongly-typed identifiers for templates and journal entries
//! - Inclusive date ranges used by journal queries
//! - The debit/credit vocabulary and standard subledger categories
//! - Runtime configuration loaded from the environment

pub mod accounting;
pub mod config;
pub mod error;
pub mod identifiers;
pub mod temporal;

pub use accounting::{AccountType, AccountingMethod, CoreSubledger};
pub use config::BookkeepingConfig;
pub use error::CoreError;
pub use identifiers::{JournalEntryId, TemplateId};
pub use temporal::DateRange;
