//! Pre-built Test Fixtures
//!
//! Provides ready-to-use templates, dates and accounts. These fixtures are
//! designed to be consistent and predictable for unit tests.

use std::sync::Arc;

use chrono::NaiveDate;

use core_kernel::AccountType;
use domain_ledger::{Account, AccountRef};
use domain_numbering::{Segment, Template};

/// Division codes accepted by the standard template
pub const DIVISION_CODES: [&str; 8] = ["01", "02", "03", "10", "11", "12", "13", "14"];

/// Department codes accepted by the standard template
pub const DEPARTMENT_CODES: [&str; 3] = ["00", "01", "02"];

/// Account code ranges of the standard template and their meanings
pub const ACCOUNT_CODE_RULES: [(&str, &str); 5] = [
    (r"1\d\d", "Assets"),
    (r"2\d\d", "Liabilities"),
    (r"3\d\d", "Equity"),
    (r"4\d\d", "Revenue"),
    (r"5\d\d", "Expenses"),
];

/// Fixture for account number templates
pub struct TemplateFixtures;

impl TemplateFixtures {
    /// `XX-XX-XXX`: Division Code, Department Code, Account Code
    ///
    /// Each call builds a fresh template with its own identity.
    pub fn standard() -> Arc<Template> {
        let divisions = DIVISION_CODES
            .iter()
            .map(|code| (*code, format!("cmpny{}", code.trim_start_matches('0'))));
        let departments = DEPARTMENT_CODES
            .iter()
            .map(|code| (*code, format!("dpt{}", &code[1..])));

        Template::builder()
            .segment(Segment::enumerated("Division Code", divisions).expect("division codes"))
            .segment(Segment::enumerated("Department Code", departments).expect("department codes"))
            .segment(Segment::pattern("Account Code", 3, ACCOUNT_CODE_RULES).expect("account codes"))
            .build()
            .expect("standard template")
    }

    /// `XX-XXX` with an incrementable `Sequence` segment for auto-numbering
    pub fn sequenced() -> Arc<Template> {
        Template::builder()
            .segment(Segment::enumerated("Division Code", [("01", "cmpny1"), ("10", "cmpny10")]).expect("division codes"))
            .segment(
                Segment::pattern("Sequence", 3, [(r"\d\d\d", "sequence")])
                    .and_then(Segment::incrementable)
                    .expect("sequence"),
            )
            .build()
            .expect("sequenced template")
    }
}

/// Fixture for posting dates
pub struct DateFixtures;

impl DateFixtures {
    /// Standard posting date (Jul 23, 2023)
    pub fn posting_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 7, 23).expect("valid date")
    }

    /// The day after the standard posting date
    pub fn next_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 7, 24).expect("valid date")
    }
}

/// Fixture for accounts on the standard template
pub struct AccountFixtures;

impl AccountFixtures {
    /// Numbers of the four sample accounts, in opening order
    pub const SAMPLE_NUMBERS: [&'static str; 4] = ["10-02-200", "10-00-300", "01-00-300", "11-01-500"];

    /// "account 1" .. "account 4" on [`Self::SAMPLE_NUMBERS`], all debit accounts
    pub fn samples(template: &Arc<Template>) -> Vec<AccountRef> {
        Self::SAMPLE_NUMBERS
            .iter()
            .enumerate()
            .map(|(index, number)| {
                Account::from_template(format!("account {}", index + 1), number, template, AccountType::Debit)
                    .expect("sample account")
                    .into_ref()
            })
            .collect()
    }

    /// Credit account "Creditor" at `01-01-100`
    pub fn creditor(template: &Arc<Template>) -> AccountRef {
        Account::from_template("Creditor", "01-01-100", template, AccountType::Credit)
            .expect("creditor account")
            .into_ref()
    }

    /// Debit account "Debtor" at `01-01-101`
    pub fn debtor(template: &Arc<Template>) -> AccountRef {
        Account::from_template("Debtor", "01-01-101", template, AccountType::Debit)
            .expect("debtor account")
            .into_ref()
    }
}
