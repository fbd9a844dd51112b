//! Chart of accounts
//!
//! A keyed collection of accounts bound to one [`Template`]. Every account
//! number in the chart was parsed by that template; insertion order is kept
//! for query results.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use core_kernel::AccountType;
use domain_numbering::{AccountNumber, NumberAllocator, Template};

use crate::account::{Account, AccountRef};
use crate::error::LedgerError;
use crate::filter::AccountQuery;

/// Accounts keyed by number, all sharing one template
#[derive(Debug, Clone)]
pub struct ChartOfAccounts {
    template: Arc<Template>,
    accounts: Vec<AccountRef>,
    index: HashMap<AccountNumber, usize>,
}

impl ChartOfAccounts {
    pub fn new(template: Arc<Template>) -> Self {
        Self {
            template,
            accounts: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn template(&self) -> &Arc<Template> {
        &self.template
    }

    /// Adds an existing account handle
    ///
    /// The chart stores the handle itself, so entries posted through it are
    /// reflected in the chart's queries and balances.
    ///
    /// # Arguments
    ///
    /// * `account` - An account whose number was parsed by the chart's template
    ///
    /// # Example
    ///
    /// ```
    /// use core_kernel::AccountType;
    /// use domain_ledger::{Account, ChartOfAccounts};
    /// use domain_numbering::{Segment, Template};
    ///
    /// let template = Template::new([Segment::flat("Code", ["100", "200"], "code").unwrap()]).unwrap();
    /// let mut chart = ChartOfAccounts::new(template.clone());
    ///
    /// let cash = Account::from_template("Cash", "100", &template, AccountType::Debit).unwrap();
    /// chart.add_account(cash.into_ref()).unwrap();
    ///
    /// let again = Account::from_template("Cash", "100", &template, AccountType::Debit).unwrap();
    /// assert!(chart.add_account(again.into_ref()).is_err());
    /// assert_eq!(chart.len(), 1);
    /// ```
    ///
    /// # Errors
    ///
    /// - `LedgerError::StructuralMismatch` if the number comes from another template
    /// - `LedgerError::DuplicateAccount` if the number is already in the chart
    pub fn add_account(&mut self, account: AccountRef) -> Result<AccountRef, LedgerError> {
        self.check_insert(&account.borrow())?;
        self.insert(Rc::clone(&account));
        Ok(account)
    }

    /// Parses `number` with the chart's template and adds a new account
    pub fn open_account(
        &mut self,
        name: &str,
        number: &str,
        account_type: AccountType,
    ) -> Result<AccountRef, LedgerError> {
        let account = Account::from_template(name, number, &self.template, account_type)?;
        self.add_account(account.into_ref())
    }

    pub fn get(&self, number: &AccountNumber) -> Option<AccountRef> {
        self.index
            .get(number)
            .map(|&position| Rc::clone(&self.accounts[position]))
    }

    /// Looks up a raw account number; unparsable numbers are simply absent
    pub fn get_by_number(&self, number: &str) -> Option<AccountRef> {
        let number = self.template.parse(number).ok()?;
        self.get(&number)
    }

    pub fn contains(&self, number: &AccountNumber) -> bool {
        self.index.contains_key(number)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Accounts in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &AccountRef> {
        self.accounts.iter()
    }

    /// Accounts matching `query`, in insertion order
    pub fn filter(&self, query: &AccountQuery) -> Vec<AccountRef> {
        if query.is_empty() {
            return Vec::new();
        }
        self.accounts
            .iter()
            .filter(|account| query.matches(&account.borrow()))
            .map(Rc::clone)
            .collect()
    }

    /// The single account matching `query`, if any
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AmbiguousMatch` if more than one account matches.
    pub fn find(&self, query: &AccountQuery) -> Result<Option<AccountRef>, LedgerError> {
        let mut matches = self.filter(query);
        match matches.len() {
            0 | 1 => Ok(matches.pop()),
            count => Err(LedgerError::AmbiguousMatch { count }),
        }
    }

    /// Lowest free number in the template's incrementable segment
    ///
    /// # Errors
    ///
    /// Propagates `NumberingError` from the allocator, e.g. when the
    /// template has no incrementable segment or the segment is exhausted.
    pub fn next_account_number<I, K, V>(&self, fixed: I) -> Result<AccountNumber, LedgerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let allocator = NumberAllocator::new(&self.template)?;
        let numbers: Vec<AccountNumber> = self.index.keys().cloned().collect();
        Ok(allocator.next(fixed, &numbers)?)
    }

    /// Adds every account of `other` not already present
    ///
    /// An account equal to one already in the chart but held by another
    /// handle replaces that handle, so postings made through `other`'s
    /// handle are seen here. Nothing changes if any account conflicts.
    ///
    /// # Errors
    ///
    /// - `LedgerError::StructuralMismatch` if `other` uses another template
    /// - `LedgerError::DuplicateAccount` if a number is held by a different account
    pub fn merge(&mut self, other: &ChartOfAccounts) -> Result<usize, LedgerError> {
        if other.template.id() != self.template.id() {
            return Err(LedgerError::StructuralMismatch {
                number: other.template.to_string(),
                expected: self.template.id(),
                found: other.template.id(),
            });
        }

        let mut incoming = Vec::new();
        let mut replaced = Vec::new();
        for account in &other.accounts {
            let candidate = account.borrow();
            match self.index.get(candidate.number()) {
                Some(&position) if Rc::ptr_eq(&self.accounts[position], account) => continue,
                Some(&position) if *self.accounts[position].borrow() == *candidate => {
                    replaced.push((position, Rc::clone(account)));
                }
                Some(_) => {
                    return Err(LedgerError::DuplicateAccount {
                        number: candidate.number().to_string(),
                    })
                }
                None => incoming.push(Rc::clone(account)),
            }
        }

        let added = incoming.len();
        let swapped = replaced.len();
        for (position, account) in replaced {
            self.accounts[position] = account;
        }
        for account in incoming {
            self.insert(account);
        }
        debug!(added, swapped, total = self.len(), "Merged chart of accounts");
        Ok(added)
    }

    pub(crate) fn check_insert(&self, account: &Account) -> Result<(), LedgerError> {
        let found = account.number().template().id();
        if found != self.template.id() {
            return Err(LedgerError::StructuralMismatch {
                number: account.number().to_string(),
                expected: self.template.id(),
                found,
            });
        }
        if self.index.contains_key(account.number()) {
            return Err(LedgerError::DuplicateAccount {
                number: account.number().to_string(),
            });
        }
        Ok(())
    }

    /// Caller must have run `check_insert`
    pub(crate) fn insert(&mut self, account: AccountRef) {
        let number = account.borrow().number().clone();
        debug!(number = %number, name = %account.borrow().name(), "Opened account");
        self.index.insert(number, self.accounts.len());
        self.accounts.push(account);
    }

    /// Net balance of the resolved accounts as seen from `reporting_format`
    ///
    /// Explicit non-empty `accounts` are used as given; otherwise the
    /// accounts matching `query` are used.
    pub fn net_balance(
        &self,
        reporting_format: AccountType,
        accounts: Option<&[AccountRef]>,
        query: &AccountQuery,
    ) -> Decimal {
        let resolved;
        let accounts = match accounts {
            Some(accounts) if !accounts.is_empty() => accounts,
            _ => {
                resolved = self.filter(query);
                &resolved[..]
            }
        };
        accounts
            .iter()
            .map(|account| {
                let account = account.borrow();
                if account.account_type() == reporting_format {
                    account.net_balance()
                } else {
                    -account.net_balance()
                }
            })
            .sum()
    }
}

impl PartialEq for ChartOfAccounts {
    /// Same accounts under the same numbers; insertion order is ignored
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.accounts.iter().all(|account| {
                let account = account.borrow();
                other
                    .get(account.number())
                    .is_some_and(|theirs| *theirs.borrow() == *account)
            })
    }
}

impl<'a> IntoIterator for &'a ChartOfAccounts {
    type Item = &'a AccountRef;
    type IntoIter = std::slice::Iter<'a, AccountRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.accounts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_numbering::Segment;

    fn template() -> Arc<Template> {
        Template::builder()
            .segment(Segment::flat("Division", ["01", "10"], "division").unwrap())
            .segment(
                Segment::pattern("Code", 2, [(r"\d\d", "code")])
                    .unwrap()
                    .incrementable()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_duplicate_numbers_leave_chart_unchanged() {
        let mut chart = ChartOfAccounts::new(template());
        chart.open_account("Cash", "01-00", AccountType::Debit).unwrap();

        let result = chart.open_account("Petty cash", "01-00", AccountType::Debit);
        assert!(matches!(result, Err(LedgerError::DuplicateAccount { .. })));
        assert_eq!(chart.len(), 1);
        assert_eq!(chart.get_by_number("01-00").unwrap().borrow().name(), "Cash");
    }

    #[test]
    fn test_rejects_numbers_from_other_templates() {
        let mut chart = ChartOfAccounts::new(template());
        let stranger = Account::from_template("Cash", "01-00", &template(), AccountType::Debit).unwrap();

        let result = chart.add_account(stranger.into_ref());
        assert!(matches!(result, Err(LedgerError::StructuralMismatch { .. })));
        assert!(chart.is_empty());
    }

    #[test]
    fn test_next_account_number_skips_taken_values() {
        let mut chart = ChartOfAccounts::new(template());
        chart.open_account("A", "10-00", AccountType::Debit).unwrap();
        chart.open_account("B", "10-01", AccountType::Debit).unwrap();
        chart.open_account("C", "01-02", AccountType::Debit).unwrap();

        let next = chart.next_account_number([("Division", "10")]).unwrap();
        assert_eq!(next.as_str(), "10-02");
    }

    #[test]
    fn test_merge_is_all_or_nothing() {
        let template = template();
        let mut ours = ChartOfAccounts::new(Arc::clone(&template));
        let mut theirs = ChartOfAccounts::new(Arc::clone(&template));
        ours.open_account("Cash", "01-00", AccountType::Debit).unwrap();
        theirs.open_account("Bank", "01-01", AccountType::Debit).unwrap();
        theirs.open_account("Not cash", "01-00", AccountType::Debit).unwrap();

        assert!(matches!(ours.merge(&theirs), Err(LedgerError::DuplicateAccount { .. })));
        assert_eq!(ours.len(), 1);
    }

    #[test]
    fn test_merge_adopts_equal_account_held_by_another_handle() {
        let template = template();
        let mut ours = ChartOfAccounts::new(Arc::clone(&template));
        let mut theirs = ChartOfAccounts::new(Arc::clone(&template));
        let old = ours.open_account("Cash", "01-00", AccountType::Debit).unwrap();
        let new = theirs.open_account("Cash", "01-00", AccountType::Debit).unwrap();

        assert_eq!(ours.merge(&theirs).unwrap(), 0);
        assert_eq!(ours.len(), 1);
        let held = ours.get_by_number("01-00").unwrap();
        assert!(Rc::ptr_eq(&held, &new));
        assert!(!Rc::ptr_eq(&held, &old));

        assert_eq!(ours.merge(&theirs).unwrap(), 0);
        assert!(Rc::ptr_eq(&ours.get_by_number("01-00").unwrap(), &new));
    }
}
