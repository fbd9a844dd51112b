//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating account numbers, amounts and
//! dates that satisfy the standard template and posting rules.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::fixtures::{DEPARTMENT_CODES, DIVISION_CODES};

/// Strategy for generating division codes of the standard template
pub fn division_code_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(DIVISION_CODES.to_vec()).prop_map(str::to_string)
}

/// Strategy for generating department codes of the standard template
pub fn department_code_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(DEPARTMENT_CODES.to_vec()).prop_map(str::to_string)
}

/// Strategy for generating account codes `100` through `599`
pub fn account_code_strategy() -> impl Strategy<Value = String> {
    (100u32..600).prop_map(|code| format!("{code:03}"))
}

/// Strategy for generating valid `XX-XX-XXX` numbers
pub fn standard_number_strategy() -> impl Strategy<Value = String> {
    (
        division_code_strategy(),
        department_code_strategy(),
        account_code_strategy(),
    )
        .prop_map(|(division, department, code)| format!("{division}-{department}-{code}"))
}

/// Strategy for generating non-zero amounts with up to two decimal places
pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64, 0u32..3u32, any::<bool>()).prop_map(|(mantissa, scale, negative)| {
        let amount = Decimal::new(mantissa, scale);
        if negative {
            -amount
        } else {
            amount
        }
    })
}

/// Strategy for generating dates within 2023
pub fn posting_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..365).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .and_then(|start| start.checked_add_days(Days::new(offset)))
            .unwrap_or(NaiveDate::MIN)
    })
}
