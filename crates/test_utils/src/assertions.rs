//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for accounts and query results that
//! give more meaningful error messages than standard assertions.

use rust_decimal::Decimal;

use domain_ledger::AccountRef;

/// Asserts that an account's net balance equals `expected`
pub fn assert_net_balance(account: &AccountRef, expected: Decimal) {
    let account = account.borrow();
    assert_eq!(
        account.net_balance(),
        expected,
        "Net balance of {} ({}) is {}, expected {}",
        account.name(),
        account.number(),
        account.net_balance(),
        expected
    );
}

/// Asserts that total debits equal total credits across `accounts`
///
/// Holds for any closed set of accounts that only post to each other.
pub fn assert_books_balance(accounts: &[AccountRef]) {
    let (debits, credits) = accounts.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(debits, credits), account| {
            let account = account.borrow();
            (debits + account.gross_debit(), credits + account.gross_credit())
        },
    );
    assert_eq!(
        debits, credits,
        "Books out of balance: debits={}, credits={}",
        debits, credits
    );
}

/// Asserts that a query returned exactly `expected`, in order
///
/// Accounts are compared by number.
pub fn assert_accounts(actual: &[AccountRef], expected: &[&str]) {
    let numbers: Vec<String> = actual
        .iter()
        .map(|account| account.borrow().number().to_string())
        .collect();
    assert_eq!(
        numbers, expected,
        "Query returned {:?}, expected {:?}",
        numbers, expected
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{AccountFixtures, DateFixtures, TemplateFixtures};
    use domain_ledger::JournalEntry;
    use rust_decimal_macros::dec;

    #[test]
    fn test_posted_books_balance() {
        let template = TemplateFixtures::standard();
        let creditor = AccountFixtures::creditor(&template);
        let debtor = AccountFixtures::debtor(&template);
        JournalEntry::post(DateFixtures::posting_date(), &debtor, &creditor, dec!(75), "").unwrap();

        assert_books_balance(&[creditor.clone(), debtor.clone()]);
        assert_net_balance(&creditor, dec!(75));
        assert_accounts(&[debtor], &["01-01-101"]);
    }

    #[test]
    #[should_panic(expected = "out of balance")]
    fn test_detects_one_sided_books() {
        let template = TemplateFixtures::standard();
        let creditor = AccountFixtures::creditor(&template);
        let debtor = AccountFixtures::debtor(&template);
        JournalEntry::post(DateFixtures::posting_date(), &debtor, &creditor, dec!(75), "").unwrap();

        assert_books_balance(&[creditor]);
    }
}
