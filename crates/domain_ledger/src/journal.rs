//! Journal entries and the date-ordered journal

use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use core_kernel::JournalEntryId;

use crate::account::{AccountKey, AccountRef};
use crate::error::LedgerError;

/// A single debit/credit movement between two accounts
///
/// Entries are immutable once posted. The two sides are recorded as
/// [`AccountKey`]s, not handles, so accounts holding their entries do not
/// form reference cycles.
#[derive(Debug)]
pub struct JournalEntry {
    id: JournalEntryId,
    date: NaiveDate,
    debit: AccountKey,
    credit: AccountKey,
    amount: Decimal,
    memo: String,
}

impl JournalEntry {
    /// Creates an entry and posts it to both accounts
    ///
    /// Either both accounts receive the entry or neither does. Negative
    /// amounts are accepted and reverse the usual direction.
    ///
    /// # Errors
    ///
    /// - `LedgerError::ZeroAmount` if `amount` is zero
    /// - `LedgerError::SameAccount` if `debit` and `credit` are the same account
    /// - `LedgerError::AccountInUse` if either account is currently borrowed
    pub fn post(
        date: NaiveDate,
        debit: &AccountRef,
        credit: &AccountRef,
        amount: Decimal,
        memo: impl Into<String>,
    ) -> Result<Rc<Self>, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        if Rc::ptr_eq(debit, credit) {
            let account = debit
                .try_borrow()
                .map(|account| account.number().to_string())
                .map_err(|_| LedgerError::AccountInUse)?;
            return Err(LedgerError::SameAccount { account });
        }

        let mut debit_account = debit.try_borrow_mut().map_err(|_| LedgerError::AccountInUse)?;
        let mut credit_account = credit.try_borrow_mut().map_err(|_| LedgerError::AccountInUse)?;
        if *debit_account == *credit_account {
            return Err(LedgerError::SameAccount {
                account: debit_account.number().to_string(),
            });
        }

        let entry = Rc::new(Self {
            id: JournalEntryId::new(),
            date,
            debit: debit_account.key(),
            credit: credit_account.key(),
            amount,
            memo: memo.into(),
        });
        debit_account.add_journal_entry(&entry)?;
        credit_account.add_journal_entry(&entry)?;

        debug!(
            entry = %entry.id,
            %date,
            debit = %entry.debit.number(),
            credit = %entry.credit.number(),
            %amount,
            "Posted journal entry"
        );
        Ok(entry)
    }

    pub fn id(&self) -> JournalEntryId {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn debit(&self) -> &AccountKey {
        &self.debit
    }

    pub fn credit(&self) -> &AccountKey {
        &self.credit
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }
}

/// Date-ordered record of journal entries
#[derive(Debug, Default)]
pub struct Journal {
    entries: BTreeMap<NaiveDate, Vec<Rc<JournalEntry>>>,
    num_entries: usize,
    accounts: HashSet<AccountKey>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files an already posted entry under its date
    pub fn add_entry(&mut self, entry: Rc<JournalEntry>) {
        self.accounts.insert(entry.debit.clone());
        self.accounts.insert(entry.credit.clone());
        self.entries.entry(entry.date).or_default().push(entry);
        self.num_entries += 1;
    }

    /// Posts a new entry to both accounts and files it
    pub fn record(
        &mut self,
        date: NaiveDate,
        debit: &AccountRef,
        credit: &AccountRef,
        amount: Decimal,
        memo: impl Into<String>,
    ) -> Result<Rc<JournalEntry>, LedgerError> {
        let entry = JournalEntry::post(date, debit, credit, amount, memo)?;
        self.add_entry(Rc::clone(&entry));
        Ok(entry)
    }

    /// Number of entries filed so far
    pub fn num_entries(&self) -> usize {
        self.num_entries
    }

    pub fn is_empty(&self) -> bool {
        self.num_entries == 0
    }

    /// Entries by ascending date, in filing order within a date
    pub fn entries(&self) -> impl Iterator<Item = &Rc<JournalEntry>> {
        self.entries.values().flatten()
    }

    pub fn entries_on(&self, date: NaiveDate) -> &[Rc<JournalEntry>] {
        self.entries.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Dates carrying at least one entry, ascending
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.keys().copied()
    }

    /// Every account touched by a filed entry
    pub fn accounts(&self) -> impl Iterator<Item = &AccountKey> {
        self.accounts.iter()
    }

    pub fn contains_account(&self, key: &AccountKey) -> bool {
        self.accounts.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Account;
    use core_kernel::AccountType;
    use domain_numbering::{Segment, Template};
    use rust_decimal_macros::dec;

    fn accounts() -> (AccountRef, AccountRef) {
        let template = Template::new([Segment::flat("Code", ["100", "200"], "code").unwrap()]).unwrap();
        let cash = Account::from_template("Cash", "100", &template, AccountType::Debit)
            .unwrap()
            .into_ref();
        let equity = Account::from_template("Equity", "200", &template, AccountType::Credit)
            .unwrap()
            .into_ref();
        (cash, equity)
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_entries_are_date_ordered_and_stable() {
        let (cash, equity) = accounts();
        let mut journal = Journal::new();
        let late = journal.record(date(5), &cash, &equity, dec!(1), "late").unwrap();
        let first = journal.record(date(2), &cash, &equity, dec!(2), "first").unwrap();
        let second = journal.record(date(2), &equity, &cash, dec!(3), "second").unwrap();

        let ids: Vec<_> = journal.entries().map(|entry| entry.id()).collect();
        assert_eq!(ids, vec![first.id(), second.id(), late.id()]);
        assert_eq!(journal.num_entries(), 3);
        assert_eq!(journal.dates().collect::<Vec<_>>(), vec![date(2), date(5)]);
        assert_eq!(journal.entries_on(date(2)).len(), 2);
        assert!(journal.entries_on(date(3)).is_empty());
        assert_eq!(journal.accounts().count(), 2);
    }

    #[test]
    fn test_post_rejects_zero_and_self_transfer() {
        let (cash, equity) = accounts();
        assert!(matches!(
            JournalEntry::post(date(1), &cash, &equity, Decimal::ZERO, ""),
            Err(LedgerError::ZeroAmount)
        ));
        assert!(matches!(
            JournalEntry::post(date(1), &cash, &cash, dec!(10), ""),
            Err(LedgerError::SameAccount { .. })
        ));
        assert!(cash.borrow().journal_entries().is_empty());
    }

    #[test]
    fn test_post_fails_while_account_is_borrowed() {
        let (cash, equity) = accounts();
        let _held = cash.borrow();
        assert!(matches!(
            JournalEntry::post(date(1), &cash, &equity, dec!(10), ""),
            Err(LedgerError::AccountInUse)
        ));
        assert!(equity.borrow().journal_entries().is_empty());
    }
}
