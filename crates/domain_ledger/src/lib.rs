//! Ledger Domain - Double-Entry Books over Structured Account Numbers
//!
//! This crate keeps double-entry books whose accounts are identified by
//! template-validated account numbers (see `domain_numbering`).
//!
//! # Double-Entry Accounting Principles
//!
//! Every journal entry moves one non-zero amount from a credit account to a
//! debit account, and is posted to both at once:
//! - Debit accounts report `initial + debits - credits`
//! - Credit accounts report `initial + credits - debits`
//!
//! # Querying
//!
//! Ledgers filter their accounts by segment values of the account number
//! (`division_code`, `account_code`, ...) or by `name`, and report signed
//! balances over the matches.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use core_kernel::AccountType;
//! use domain_ledger::{AccountQuery, GeneralLedger, Journal, Ledger};
//! use domain_numbering::{Segment, Template};
//! use rust_decimal_macros::dec;
//!
//! let template = Template::builder()
//!     .segment(Segment::flat("Division", ["01"], "Head office").unwrap())
//!     .segment(Segment::pattern("Account Code", 3, [(r"1\d\d", "Assets"), (r"3\d\d", "Equity")]).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let mut ledger = GeneralLedger::new("Books", template);
//! let cash = ledger.open_account("Cash", "01-100", AccountType::Debit).unwrap();
//! let capital = ledger.open_account("Capital", "01-300", AccountType::Credit).unwrap();
//!
//! let mut journal = Journal::new();
//! let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! journal.record(date, &cash, &capital, dec!(500), "Owner investment").unwrap();
//!
//! let query = AccountQuery::new().eq("account_code", "300");
//! assert_eq!(ledger.get_net_balance(AccountType::Credit, None, &query), dec!(500));
//! ```

pub mod account;
pub mod chart;
pub mod error;
pub mod filter;
pub mod journal;
pub mod ledger;

pub use account::{Account, AccountKey, AccountRef, AccountSnapshot, TransferQuery};
pub use chart::ChartOfAccounts;
pub use error::LedgerError;
pub use filter::{AccountQuery, Condition, FilterValue, Operator, Predicate};
pub use journal::{Journal, JournalEntry};
pub use ledger::{GeneralLedger, Ledger, SubLedger};
