//! Accounting vocabulary shared by the ledger crates

use serde::{Deserialize, Serialize};
use std::fmt;

/// The debit/credit divide an account's balance is reported on
///
/// A DEBIT account grows with debits (assets, expenses); a CREDIT account
/// grows with credits (liabilities, equity, revenue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Debit,
    Credit,
}

impl AccountType {
    /// Returns the other side of the divide
    pub fn opposite(&self) -> Self {
        match self {
            AccountType::Debit => AccountType::Credit,
            AccountType::Credit => AccountType::Debit,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Debit => "Debit",
            AccountType::Credit => "Credit",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bookkeeping method of a ledger
///
/// Informational only; it does not change posting behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountingMethod {
    #[default]
    Cash,
    Accrual,
}

impl AccountingMethod {
    pub fn label(&self) -> &'static str {
        match self {
            AccountingMethod::Cash => "Cash Accounting",
            AccountingMethod::Accrual => "Accrual Accounting",
        }
    }
}

/// Standard subledgers used to organise a general ledger's accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CoreSubledger {
    Assets,
    Liabilities,
    Equity,
    Revenue,
    /// Includes taxes
    CostOfSales,
    Expenses,
}

impl CoreSubledger {
    /// All standard subledgers in reporting order
    pub const ALL: [CoreSubledger; 6] = [
        CoreSubledger::Assets,
        CoreSubledger::Liabilities,
        CoreSubledger::Equity,
        CoreSubledger::Revenue,
        CoreSubledger::CostOfSales,
        CoreSubledger::Expenses,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CoreSubledger::Assets => "Assets",
            CoreSubledger::Liabilities => "Liabilities",
            CoreSubledger::Equity => "Equity",
            CoreSubledger::Revenue => "Revenue",
            CoreSubledger::CostOfSales => "Cost of Sales",
            CoreSubledger::Expenses => "Expenses",
        }
    }

    /// The side on which this category's accounts normally carry a balance
    pub fn normal_balance(&self) -> AccountType {
        match self {
            CoreSubledger::Assets | CoreSubledger::CostOfSales | CoreSubledger::Expenses => {
                AccountType::Debit
            }
            CoreSubledger::Liabilities | CoreSubledger::Equity | CoreSubledger::Revenue => {
                AccountType::Credit
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_side() {
        assert_eq!(AccountType::Debit.opposite(), AccountType::Credit);
        assert_eq!(AccountType::Credit.opposite(), AccountType::Debit);
    }

    #[test]
    fn test_normal_balances() {
        assert_eq!(CoreSubledger::Assets.normal_balance(), AccountType::Debit);
        assert_eq!(CoreSubledger::Revenue.normal_balance(), AccountType::Credit);
    }
}
