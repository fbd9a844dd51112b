//! Accounts and balance arithmetic
//!
//! An [`Account`] carries running debit and credit totals that only change
//! through journal postings. Accounts are shared between charts, journals and
//! ledgers as [`AccountRef`] handles.

use std::cell::RefCell;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::{AccountType, DateRange, JournalEntryId};
use domain_numbering::{AccountNumber, Template};

use crate::error::LedgerError;
use crate::journal::JournalEntry;

/// Shared handle to an account within one ledger graph
pub type AccountRef = Rc<RefCell<Account>>;

/// Identity of an account: name, number and type
///
/// Journal entries refer to their accounts by key so that accounts and
/// entries never hold each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountKey {
    name: String,
    number: AccountNumber,
    account_type: AccountType,
}

impl AccountKey {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> &AccountNumber {
        &self.number
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }
}

/// An account in a chart of accounts
///
/// Equality and hashing follow the (name, number, type) triple; balances and
/// postings do not take part.
#[derive(Debug)]
pub struct Account {
    name: String,
    number: AccountNumber,
    account_type: AccountType,
    initial_balance: Decimal,
    gross_debit: Decimal,
    gross_credit: Decimal,
    entries: Vec<Rc<JournalEntry>>,
    entry_ids: HashSet<JournalEntryId>,
}

impl Account {
    /// Creates an account with zero balances
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::EmptyAccountName` for a blank name.
    pub fn new(
        name: impl Into<String>,
        number: AccountNumber,
        account_type: AccountType,
    ) -> Result<Self, LedgerError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LedgerError::EmptyAccountName);
        }
        Ok(Self {
            name,
            number,
            account_type,
            initial_balance: Decimal::ZERO,
            gross_debit: Decimal::ZERO,
            gross_credit: Decimal::ZERO,
            entries: Vec::new(),
            entry_ids: HashSet::new(),
        })
    }

    /// Parses `number` with `template` and creates the account
    pub fn from_template(
        name: impl Into<String>,
        number: &str,
        template: &Arc<Template>,
        account_type: AccountType,
    ) -> Result<Self, LedgerError> {
        let number = template.parse(number)?;
        Self::new(name, number, account_type)
    }

    pub fn with_initial_balance(mut self, balance: Decimal) -> Self {
        self.initial_balance = balance;
        self
    }

    /// Wraps the account in a shared handle
    pub fn into_ref(self) -> AccountRef {
        Rc::new(RefCell::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> &AccountNumber {
        &self.number
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn initial_balance(&self) -> Decimal {
        self.initial_balance
    }

    pub fn gross_debit(&self) -> Decimal {
        self.gross_debit
    }

    pub fn gross_credit(&self) -> Decimal {
        self.gross_credit
    }

    /// Entries posted to this account, in posting order
    pub fn journal_entries(&self) -> &[Rc<JournalEntry>] {
        &self.entries
    }

    pub fn key(&self) -> AccountKey {
        AccountKey {
            name: self.name.clone(),
            number: self.number.clone(),
            account_type: self.account_type,
        }
    }

    /// True if `key` identifies this account
    pub fn is(&self, key: &AccountKey) -> bool {
        key.account_type == self.account_type && key.number == self.number && key.name == self.name
    }

    /// Posts an entry to whichever side of it this account sits on
    ///
    /// Posting the same entry twice has no further effect; the return value
    /// tells whether the entry was new.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnrelatedEntry` if the entry debits and credits
    /// other accounts.
    pub fn add_journal_entry(&mut self, entry: &Rc<JournalEntry>) -> Result<bool, LedgerError> {
        if self.entry_ids.contains(&entry.id()) {
            return Ok(false);
        }
        if self.is(entry.debit()) {
            self.gross_debit += entry.amount();
        } else if self.is(entry.credit()) {
            self.gross_credit += entry.amount();
        } else {
            return Err(LedgerError::UnrelatedEntry {
                entry: entry.id(),
                account: self.number.to_string(),
            });
        }
        self.entry_ids.insert(entry.id());
        self.entries.push(Rc::clone(entry));
        Ok(true)
    }

    /// Balance seen from the account's own side
    pub fn net_balance(&self) -> Decimal {
        match self.account_type {
            AccountType::Credit => self.initial_balance + self.gross_credit - self.gross_debit,
            AccountType::Debit => self.initial_balance + self.gross_debit - self.gross_credit,
        }
    }

    /// Combined balance of a group of accounts, reported from `reporting_format`'s side
    ///
    /// Only gross totals are summed; member types and initial balances are ignored.
    pub fn net_balance_agg<'a, I>(accounts: I, reporting_format: AccountType) -> Decimal
    where
        I: IntoIterator<Item = &'a AccountRef>,
    {
        let (debit, credit) = accounts.into_iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(debit, credit), account| {
                let account = account.borrow();
                (debit + account.gross_debit, credit + account.gross_credit)
            },
        );
        match reporting_format {
            AccountType::Credit => credit - debit,
            AccountType::Debit => debit - credit,
        }
    }

    /// Net amount moved into `debit_accounts` out of `credit_accounts`
    ///
    /// Scans the entries of the credit group; an entry whose debit side is in
    /// the debit group adds its amount, one whose credit side is in the debit
    /// group subtracts it. Entries shared by two credit accounts count once.
    pub fn net_transfer(
        debit_accounts: &[AccountRef],
        credit_accounts: &[AccountRef],
        query: &TransferQuery,
    ) -> Decimal {
        let debit_keys: HashSet<AccountKey> = debit_accounts
            .iter()
            .map(|account| account.borrow().key())
            .collect();

        let mut seen = HashSet::new();
        let mut total = Decimal::ZERO;
        for account in credit_accounts {
            let account = account.borrow();
            for entry in &account.entries {
                if !seen.insert(entry.id()) || !query.accepts(entry) {
                    continue;
                }
                if debit_keys.contains(entry.debit()) {
                    total += entry.amount();
                } else if debit_keys.contains(entry.credit()) {
                    total -= entry.amount();
                }
            }
        }
        total
    }

    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            name: self.name.clone(),
            number: self.number.to_string(),
            account_type: self.account_type,
            initial_balance: self.initial_balance,
            gross_debit: self.gross_debit,
            gross_credit: self.gross_credit,
            net_balance: self.net_balance(),
            entries: self.entries.len(),
        }
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.number == other.number
            && self.account_type == other.account_type
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.number.hash(state);
        self.account_type.hash(state);
    }
}

/// Serializable view of an account's balances
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSnapshot {
    pub name: String,
    pub number: String,
    pub account_type: AccountType,
    pub initial_balance: Decimal,
    pub gross_debit: Decimal,
    pub gross_credit: Decimal,
    pub net_balance: Decimal,
    pub entries: usize,
}

/// Date window and memo filter for [`Account::net_transfer`]
#[derive(Debug, Clone, Default)]
pub struct TransferQuery {
    range: DateRange,
    memo: Option<Regex>,
}

impl TransferQuery {
    /// Unbounded range, any memo
    pub fn new() -> Self {
        Self::default()
    }

    /// Inclusive range `[start, end]`
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidDateRange` if `start` is after `end`.
    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Result<Self, LedgerError> {
        self.range = DateRange::new(start, end)?;
        Ok(self)
    }

    /// Moves the start of the range, keeping its end
    pub fn since(mut self, start: NaiveDate) -> Result<Self, LedgerError> {
        self.range = DateRange::new(start, self.range.end())?;
        Ok(self)
    }

    /// Moves the end of the range, keeping its start
    pub fn until(mut self, end: NaiveDate) -> Result<Self, LedgerError> {
        self.range = DateRange::new(self.range.start(), end)?;
        Ok(self)
    }

    /// Only entries whose memo contains a match for `pattern`
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidMemoPattern` if `pattern` does not compile.
    pub fn memo(mut self, pattern: &str) -> Result<Self, LedgerError> {
        self.memo = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    fn accepts(&self, entry: &JournalEntry) -> bool {
        self.range.contains(entry.date())
            && self
                .memo
                .as_ref()
                .map_or(true, |pattern| pattern.is_match(entry.memo()))
    }
}
