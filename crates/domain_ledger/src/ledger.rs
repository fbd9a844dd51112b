//! General ledgers and subledgers
//!
//! A [`GeneralLedger`] owns the canonical account number template and a
//! chart holding every account. Each [`SubLedger`] borrows the template of
//! the general ledger it was created from; adding one merges its chart into
//! the general chart so queries on the general ledger see every account.
//!
//! # Invariants
//!
//! - Every account of a subledger is also in the general chart. Attached
//!   subledgers are only reachable by shared reference; their accounts are
//!   added through [`GeneralLedger::add_subledger_account`] and
//!   [`GeneralLedger::open_subledger_account`]
//! - Subledger names are unique within a general ledger
//! - All charts in one ledger graph share the same template

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, instrument};

use core_kernel::{AccountType, AccountingMethod, BookkeepingConfig, CoreSubledger};
use domain_numbering::{AccountNumber, Template};

use crate::account::{Account, AccountRef};
use crate::chart::ChartOfAccounts;
use crate::error::LedgerError;
use crate::filter::AccountQuery;

/// Separator between a general ledger's name and a subledger's own name
pub const SUBLEDGER_SEPARATOR: &str = "__";

/// Query and balance-reporting surface shared by general and subledgers
pub trait Ledger {
    fn name(&self) -> &str;

    fn chart(&self) -> &ChartOfAccounts;

    fn template(&self) -> &Arc<Template> {
        self.chart().template()
    }

    /// Accounts matching `query`, in the order they were opened
    fn filter_accounts(&self, query: &AccountQuery) -> Vec<AccountRef> {
        self.chart().filter(query)
    }

    /// The single account matching `query`, if any
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AmbiguousMatch` if more than one account matches.
    fn get_account(&self, query: &AccountQuery) -> Result<Option<AccountRef>, LedgerError> {
        self.chart().find(query)
    }

    /// Signed sum of net balances as seen from `reporting_format`
    ///
    /// Accounts of the reporting type add their net balance, the others
    /// subtract it. `None` or an empty slice resolves accounts via `query`.
    ///
    /// # Arguments
    ///
    /// * `reporting_format` - The side the result is reported from
    /// * `accounts` - Explicit accounts to sum, used as given when non-empty
    /// * `query` - Fallback query selecting accounts from the ledger's chart
    ///
    /// # Example
    ///
    /// ```
    /// use core_kernel::AccountType;
    /// use domain_ledger::{GeneralLedger, JournalEntry, Ledger};
    /// use domain_numbering::{Segment, Template};
    /// use rust_decimal_macros::dec;
    ///
    /// let template = Template::new([Segment::flat("Code", ["100", "300"], "code").unwrap()]).unwrap();
    /// let mut books = GeneralLedger::new("books", template);
    /// let cash = books.open_account("Cash", "100", AccountType::Debit).unwrap();
    /// let equity = books.open_account("Equity", "300", AccountType::Credit).unwrap();
    /// let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// JournalEntry::post(date, &cash, &equity, dec!(500), "capital").unwrap();
    ///
    /// let query = books.query().eq("code", "100");
    /// assert_eq!(books.get_net_balance(AccountType::Debit, None, &query), dec!(500));
    /// assert_eq!(books.get_net_balance(AccountType::Credit, None, &query), dec!(-500));
    /// ```
    fn get_net_balance(
        &self,
        reporting_format: AccountType,
        accounts: Option<&[AccountRef]>,
        query: &AccountQuery,
    ) -> Decimal {
        self.chart().net_balance(reporting_format, accounts, query)
    }
}

/// The top-level ledger of a set of books
#[derive(Debug)]
pub struct GeneralLedger {
    name: String,
    accounting_method: AccountingMethod,
    chart: ChartOfAccounts,
    subledgers: Vec<SubLedger>,
    config: BookkeepingConfig,
}

impl GeneralLedger {
    pub fn new(name: impl Into<String>, template: Arc<Template>) -> Self {
        Self::with_config(name, template, BookkeepingConfig::default())
    }

    /// Ledger whose accounting method and default queries follow `config`
    pub fn with_config(
        name: impl Into<String>,
        template: Arc<Template>,
        config: BookkeepingConfig,
    ) -> Self {
        Self {
            name: name.into(),
            accounting_method: config.accounting_method,
            chart: ChartOfAccounts::new(template),
            subledgers: Vec::new(),
            config,
        }
    }

    /// Creates one subledger per standard category (Assets, Revenue, ...)
    pub fn with_core_subledgers(mut self) -> Result<Self, LedgerError> {
        for category in CoreSubledger::ALL {
            self.create_subledger(category.name())?;
        }
        Ok(self)
    }

    pub fn accounting_method(mut self, method: AccountingMethod) -> Self {
        self.accounting_method = method;
        self
    }

    pub fn method(&self) -> AccountingMethod {
        self.accounting_method
    }

    pub fn config(&self) -> &BookkeepingConfig {
        &self.config
    }

    /// Empty query carrying the ledger's configured matching mode
    pub fn query(&self) -> AccountQuery {
        AccountQuery::from_config(&self.config)
    }

    pub fn add_account(&mut self, account: AccountRef) -> Result<AccountRef, LedgerError> {
        self.chart.add_account(account)
    }

    pub fn open_account(
        &mut self,
        name: &str,
        number: &str,
        account_type: AccountType,
    ) -> Result<AccountRef, LedgerError> {
        self.chart.open_account(name, number, account_type)
    }

    /// Lowest free number in the incrementable segment under `fixed` values
    pub fn next_account_number<I, K, V>(&self, fixed: I) -> Result<AccountNumber, LedgerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.chart.next_account_number(fixed)
    }

    /// Creates an empty subledger named `"{general}__{name}"` and adds it
    pub fn create_subledger(&mut self, name: &str) -> Result<&SubLedger, LedgerError> {
        let subledger = SubLedger::new(format!("{}{SUBLEDGER_SEPARATOR}{name}", self.name), self);
        self.add_subledger(subledger)
    }

    /// Adds a subledger and merges its accounts into the general chart
    ///
    /// # Errors
    ///
    /// - `LedgerError::DuplicateSubledger` if the name is taken
    /// - `LedgerError::StructuralMismatch` if the subledger uses another template
    /// - `LedgerError::DuplicateAccount` if one of its numbers is held by a
    ///   different general account
    #[instrument(skip_all, fields(ledger = %self.name, subledger = %subledger.name))]
    pub fn add_subledger(&mut self, subledger: SubLedger) -> Result<&SubLedger, LedgerError> {
        if self.subledgers.iter().any(|s| s.name == subledger.name) {
            return Err(LedgerError::DuplicateSubledger {
                name: subledger.name,
            });
        }
        self.chart.merge(&subledger.chart)?;
        debug!(accounts = subledger.chart.len(), "Added subledger");
        self.subledgers.push(subledger);
        let last = self.subledgers.len() - 1;
        Ok(&self.subledgers[last])
    }

    /// Subledger by full name or by the name it was created with
    pub fn subledger(&self, name: &str) -> Option<&SubLedger> {
        let index = self.subledger_index(name)?;
        Some(&self.subledgers[index])
    }

    pub fn subledgers(&self) -> &[SubLedger] {
        &self.subledgers
    }

    /// Adds an account to a subledger and to the general chart
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::SubledgerNotFound` for an unknown subledger, or
    /// the chart errors of either chart; neither chart changes on failure.
    pub fn add_subledger_account(
        &mut self,
        subledger: &str,
        account: AccountRef,
    ) -> Result<AccountRef, LedgerError> {
        let index = self
            .subledger_index(subledger)
            .ok_or_else(|| LedgerError::SubledgerNotFound {
                name: subledger.to_string(),
            })?;
        {
            let candidate = account.borrow();
            self.subledgers[index].chart.check_insert(&candidate)?;
            self.chart.check_insert(&candidate)?;
        }
        self.subledgers[index].chart.insert(AccountRef::clone(&account));
        self.chart.insert(AccountRef::clone(&account));
        Ok(account)
    }

    /// Parses `number` with the ledger's template and opens the account in
    /// a subledger and in the general chart
    ///
    /// # Errors
    ///
    /// Same as [`GeneralLedger::add_subledger_account`], plus the numbering
    /// errors of an invalid `number`.
    pub fn open_subledger_account(
        &mut self,
        subledger: &str,
        name: &str,
        number: &str,
        account_type: AccountType,
    ) -> Result<AccountRef, LedgerError> {
        let account = Account::from_template(name, number, self.template(), account_type)?;
        self.add_subledger_account(subledger, account.into_ref())
    }

    fn subledger_index(&self, name: &str) -> Option<usize> {
        let qualified = format!("{}{SUBLEDGER_SEPARATOR}{name}", self.name);
        self.subledgers
            .iter()
            .position(|s| s.name == name)
            .or_else(|| self.subledgers.iter().position(|s| s.name == qualified))
    }
}

impl Ledger for GeneralLedger {
    fn name(&self) -> &str {
        &self.name
    }

    fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }
}

/// A named slice of a general ledger's accounts
#[derive(Debug)]
pub struct SubLedger {
    name: String,
    accounting_method: AccountingMethod,
    chart: ChartOfAccounts,
}

impl SubLedger {
    /// Empty subledger using `general`'s template and accounting method
    ///
    /// The subledger is not attached until passed to
    /// [`GeneralLedger::add_subledger`].
    pub fn new(name: impl Into<String>, general: &GeneralLedger) -> Self {
        Self {
            name: name.into(),
            accounting_method: general.accounting_method,
            chart: ChartOfAccounts::new(Arc::clone(general.template())),
        }
    }

    pub fn method(&self) -> AccountingMethod {
        self.accounting_method
    }

    /// Adds an account to this detached subledger
    ///
    /// Its accounts reach the general chart when the subledger is passed to
    /// [`GeneralLedger::add_subledger`].
    pub fn add_account(&mut self, account: AccountRef) -> Result<AccountRef, LedgerError> {
        self.chart.add_account(account)
    }

    pub fn open_account(
        &mut self,
        name: &str,
        number: &str,
        account_type: AccountType,
    ) -> Result<AccountRef, LedgerError> {
        self.chart.open_account(name, number, account_type)
    }
}

impl Ledger for SubLedger {
    fn name(&self) -> &str {
        &self.name
    }

    fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }
}

impl PartialEq for SubLedger {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.chart == other.chart
    }
}
