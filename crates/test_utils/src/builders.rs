//! Test Data Builders
//!
//! Provides builder patterns for constructing accounts and ledgers with
//! sensible defaults. These builders allow tests to specify only the relevant
//! fields while using defaults for everything else.

use std::sync::Arc;

use fake::faker::company::en::CompanyName;
use fake::Fake;
use rust_decimal::Decimal;

use core_kernel::{AccountType, BookkeepingConfig};
use domain_ledger::{Account, AccountRef, GeneralLedger};
use domain_numbering::Template;

use crate::fixtures::TemplateFixtures;

/// Builder for constructing test accounts
pub struct TestAccountBuilder {
    template: Arc<Template>,
    name: String,
    number: String,
    account_type: AccountType,
    initial_balance: Decimal,
}

impl Default for TestAccountBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAccountBuilder {
    /// Creates a builder for a debit account `01-00-100` with a generated
    /// company name on a fresh standard template
    pub fn new() -> Self {
        Self {
            template: TemplateFixtures::standard(),
            name: CompanyName().fake(),
            number: "01-00-100".to_string(),
            account_type: AccountType::Debit,
            initial_balance: Decimal::ZERO,
        }
    }

    /// Sets the template the number is parsed with
    pub fn with_template(mut self, template: &Arc<Template>) -> Self {
        self.template = Arc::clone(template);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    /// Makes this a credit account
    pub fn credit(mut self) -> Self {
        self.account_type = AccountType::Credit;
        self
    }

    /// Makes this a debit account
    pub fn debit(mut self) -> Self {
        self.account_type = AccountType::Debit;
        self
    }

    pub fn with_initial_balance(mut self, balance: Decimal) -> Self {
        self.initial_balance = balance;
        self
    }

    /// Builds the account
    ///
    /// # Panics
    ///
    /// Panics if the number does not parse with the template.
    pub fn build(self) -> Account {
        Account::from_template(self.name, &self.number, &self.template, self.account_type)
            .expect("Failed to build test account")
            .with_initial_balance(self.initial_balance)
    }

    /// Builds the account behind a shared handle
    pub fn build_ref(self) -> AccountRef {
        self.build().into_ref()
    }
}

/// Builder for constructing test general ledgers
pub struct TestLedgerBuilder {
    name: String,
    template: Arc<Template>,
    config: BookkeepingConfig,
    accounts: Vec<(String, String, AccountType)>,
    subledgers: Vec<String>,
}

impl Default for TestLedgerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLedgerBuilder {
    /// Creates a builder for "general ledger" on a fresh standard template
    pub fn new() -> Self {
        Self {
            name: "general ledger".to_string(),
            template: TemplateFixtures::standard(),
            config: BookkeepingConfig::default(),
            accounts: Vec::new(),
            subledgers: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_template(mut self, template: &Arc<Template>) -> Self {
        self.template = Arc::clone(template);
        self
    }

    pub fn with_config(mut self, config: BookkeepingConfig) -> Self {
        self.config = config;
        self
    }

    /// Opens an account in the general chart when built
    pub fn with_account(mut self, name: &str, number: &str, account_type: AccountType) -> Self {
        self.accounts
            .push((name.to_string(), number.to_string(), account_type));
        self
    }

    /// Creates a named subledger when built
    pub fn with_subledger(mut self, name: &str) -> Self {
        self.subledgers.push(name.to_string());
        self
    }

    /// Builds the ledger
    ///
    /// # Panics
    ///
    /// Panics if an account or subledger cannot be added.
    pub fn build(self) -> GeneralLedger {
        let mut ledger = GeneralLedger::with_config(self.name, self.template, self.config);
        for (name, number, account_type) in &self.accounts {
            ledger
                .open_account(name, number, *account_type)
                .expect("Failed to open test account");
        }
        for subledger in &self.subledgers {
            ledger
                .create_subledger(subledger)
                .expect("Failed to create test subledger");
        }
        ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_ledger::Ledger;

    #[test]
    fn test_account_builder_defaults() {
        let account = TestAccountBuilder::new().build();
        assert!(!account.name().is_empty());
        assert_eq!(account.number().as_str(), "01-00-100");
        assert_eq!(account.account_type(), AccountType::Debit);
        assert_eq!(account.net_balance(), Decimal::ZERO);
    }

    #[test]
    fn test_ledger_builder_opens_accounts() {
        let ledger = TestLedgerBuilder::new()
            .with_account("Cash", "01-00-100", AccountType::Debit)
            .with_account("Capital", "01-00-300", AccountType::Credit)
            .with_subledger("Cash")
            .build();
        assert_eq!(ledger.chart().len(), 2);
        assert!(ledger.subledger("Cash").is_some());
    }
}
