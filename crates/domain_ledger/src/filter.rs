//! Segment-based account queries
//!
//! A query is a list of [`Predicate`]s over an account's searchable fields:
//! every segment of its number (by normalised segment name) plus `name`.
//! Predicates are combined with AND (the default) or OR.
//!
//! ```rust
//! use domain_ledger::{AccountQuery, Predicate};
//!
//! let query = AccountQuery::new()
//!     .with(Predicate::lookup("Division Code__in", ["01", "10"]).unwrap())
//!     .eq("account_code", 121);
//! assert_eq!(query.predicates().len(), 2);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use core_kernel::BookkeepingConfig;
use domain_numbering::normalize_key;

use crate::account::Account;
use crate::error::LedgerError;

/// Field name matching the account's own name
pub const NAME_FIELD: &str = "name";

/// Default token between a field and its operator in a lookup string
pub const DEFAULT_FILTER_TOKEN: &str = "__";

/// Operand of a filter condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
}

impl FilterValue {
    fn render(&self) -> String {
        match self {
            FilterValue::Text(text) => text.clone(),
            FilterValue::Integer(value) => value.to_string(),
        }
    }

    fn equals(&self, candidate: &str, fuzzy: bool) -> bool {
        match (self, fuzzy) {
            (_, true) => candidate.to_lowercase() == self.render().to_lowercase(),
            (FilterValue::Text(text), false) => candidate == text,
            // Searchable fields are text
            (FilterValue::Integer(_), false) => false,
        }
    }

    /// Ordering of `candidate` relative to this value, `None` if incomparable
    fn compare(&self, candidate: &str, fuzzy: bool) -> Option<Ordering> {
        match (self, fuzzy) {
            (FilterValue::Text(text), true) => {
                Some(candidate.to_lowercase().cmp(&text.to_lowercase()))
            }
            (FilterValue::Text(text), false) => Some(candidate.cmp(text.as_str())),
            (FilterValue::Integer(value), true) => {
                candidate.parse::<i64>().ok().map(|parsed| parsed.cmp(value))
            }
            (FilterValue::Integer(_), false) => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Integer(i64::from(value))
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        FilterValue::Integer(i64::from(value))
    }
}

/// Operator half of a lookup string such as `account_code__gte`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    In,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl FromStr for Operator {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "eq" => Ok(Operator::Eq),
            "in" => Ok(Operator::In),
            "lt" => Ok(Operator::Lt),
            "lte" => Ok(Operator::Lte),
            "gt" => Ok(Operator::Gt),
            "gte" => Ok(Operator::Gte),
            _ => Err(LedgerError::UnknownOperator {
                operator: s.to_string(),
            }),
        }
    }
}

/// Test applied to one searchable field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Eq(FilterValue),
    In(Vec<FilterValue>),
    Lt(FilterValue),
    Lte(FilterValue),
    Gt(FilterValue),
    Gte(FilterValue),
}

impl Condition {
    fn holds(&self, candidate: &str, fuzzy: bool) -> bool {
        match self {
            Condition::Eq(value) => value.equals(candidate, fuzzy),
            Condition::In(values) => values.iter().any(|value| value.equals(candidate, fuzzy)),
            Condition::Lt(value) => value.compare(candidate, fuzzy) == Some(Ordering::Less),
            Condition::Lte(value) => matches!(
                value.compare(candidate, fuzzy),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Condition::Gt(value) => value.compare(candidate, fuzzy) == Some(Ordering::Greater),
            Condition::Gte(value) => matches!(
                value.compare(candidate, fuzzy),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }
}

/// A condition on one named field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    field: String,
    condition: Condition,
}

impl Predicate {
    /// Field names are normalised: trimmed, lowercased, spaces as underscores
    pub fn new(field: &str, condition: Condition) -> Self {
        Self {
            field: normalize_key(field),
            condition,
        }
    }

    pub fn eq(field: &str, value: impl Into<FilterValue>) -> Self {
        Self::new(field, Condition::Eq(value.into()))
    }

    pub fn is_in<I, V>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        Self::new(field, Condition::In(values.into_iter().map(Into::into).collect()))
    }

    pub fn lt(field: &str, value: impl Into<FilterValue>) -> Self {
        Self::new(field, Condition::Lt(value.into()))
    }

    pub fn lte(field: &str, value: impl Into<FilterValue>) -> Self {
        Self::new(field, Condition::Lte(value.into()))
    }

    pub fn gt(field: &str, value: impl Into<FilterValue>) -> Self {
        Self::new(field, Condition::Gt(value.into()))
    }

    pub fn gte(field: &str, value: impl Into<FilterValue>) -> Self {
        Self::new(field, Condition::Gte(value.into()))
    }

    /// Parses a lookup such as `"division_code__in"` with the default `__` token
    ///
    /// `values` supplies the operand; every operator except `in` takes
    /// exactly one value.
    ///
    /// # Errors
    ///
    /// - `LedgerError::UnknownOperator` for an operator other than
    ///   `eq`, `in`, `lt`, `lte`, `gt` or `gte`
    /// - `LedgerError::InvalidPredicate` for an empty field or a wrong
    ///   number of values
    pub fn lookup<I, V>(lookup: &str, values: I) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        Self::parse_lookup(lookup, DEFAULT_FILTER_TOKEN, values)
    }

    /// Same as [`Predicate::lookup`] with the configured filter token
    pub fn lookup_with<I, V>(
        config: &BookkeepingConfig,
        lookup: &str,
        values: I,
    ) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        Self::parse_lookup(lookup, &config.filter_token, values)
    }

    fn parse_lookup<I, V>(lookup: &str, token: &str, values: I) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        let (field, operator) = match lookup.rsplit_once(token) {
            Some((field, operator)) if !token.is_empty() => (field, operator.parse()?),
            _ => (lookup, Operator::Eq),
        };
        if field.trim().is_empty() {
            return Err(LedgerError::InvalidPredicate(format!(
                "lookup '{lookup}' names no field"
            )));
        }

        let mut values: Vec<FilterValue> = values.into_iter().map(Into::into).collect();
        if operator == Operator::In {
            return Ok(Self::new(field, Condition::In(values)));
        }
        if values.len() != 1 {
            return Err(LedgerError::InvalidPredicate(format!(
                "lookup '{lookup}' takes one value, got {}",
                values.len()
            )));
        }
        let value = values.remove(0);
        let condition = match operator {
            Operator::Eq => Condition::Eq(value),
            Operator::Lt => Condition::Lt(value),
            Operator::Lte => Condition::Lte(value),
            Operator::Gt => Condition::Gt(value),
            Operator::Gte => Condition::Gte(value),
            Operator::In => Condition::In(vec![value]),
        };
        Ok(Self::new(field, condition))
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Unknown fields never match
    pub fn matches(&self, account: &Account, fuzzy: bool) -> bool {
        field_value(account, &self.field)
            .is_some_and(|candidate| self.condition.holds(candidate, fuzzy))
    }
}

/// A segment named like the name field shadows the account name
fn field_value<'a>(account: &'a Account, field: &str) -> Option<&'a str> {
    account
        .number()
        .segment_value(field)
        .ok()
        .or_else(|| (field == NAME_FIELD).then(|| account.name()))
}

/// A set of predicates and how to combine them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountQuery {
    predicates: Vec<Predicate>,
    match_all: bool,
    fuzzy_match: bool,
}

impl Default for AccountQuery {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
            match_all: true,
            fuzzy_match: true,
        }
    }
}

impl AccountQuery {
    /// Empty AND query with fuzzy matching
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty query using the configured combination and matching mode
    pub fn from_config(config: &BookkeepingConfig) -> Self {
        Self {
            predicates: Vec::new(),
            match_all: config.match_all,
            fuzzy_match: config.fuzzy_match,
        }
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn eq(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.with(Predicate::eq(field, value))
    }

    pub fn is_in<I, V>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        self.with(Predicate::is_in(field, values))
    }

    /// OR semantics: any predicate may match
    pub fn match_any(mut self) -> Self {
        self.match_all = false;
        self
    }

    /// AND semantics: every predicate must match
    pub fn match_all(mut self) -> Self {
        self.match_all = true;
        self
    }

    /// Case-sensitive, typed comparisons
    pub fn exact(mut self) -> Self {
        self.fuzzy_match = false;
        self
    }

    pub fn fuzzy(mut self) -> Self {
        self.fuzzy_match = true;
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn is_match_all(&self) -> bool {
        self.match_all
    }

    pub fn is_fuzzy(&self) -> bool {
        self.fuzzy_match
    }

    /// A query without predicates matches nothing
    pub fn matches(&self, account: &Account) -> bool {
        if self.predicates.is_empty() {
            return false;
        }
        let fuzzy = self.fuzzy_match;
        if self.match_all {
            self.predicates.iter().all(|p| p.matches(account, fuzzy))
        } else {
            self.predicates.iter().any(|p| p.matches(account, fuzzy))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_parses_operator() {
        let predicate = Predicate::lookup("Division Code__in", ["01", "10"]).unwrap();
        assert_eq!(predicate.field(), "division_code");
        assert_eq!(
            predicate.condition(),
            &Condition::In(vec!["01".into(), "10".into()])
        );

        let predicate = Predicate::lookup("account_code", [121]).unwrap();
        assert_eq!(predicate.condition(), &Condition::Eq(FilterValue::Integer(121)));

        let predicate = Predicate::lookup("account_code__GTE", ["300"]).unwrap();
        assert_eq!(predicate.condition(), &Condition::Gte("300".into()));
    }

    #[test]
    fn test_lookup_rejects_unknown_operator() {
        let result = Predicate::lookup("account_code__contains", ["1"]);
        assert!(matches!(
            result,
            Err(LedgerError::UnknownOperator { operator }) if operator == "contains"
        ));
    }

    #[test]
    fn test_lookup_checks_value_count() {
        assert!(matches!(
            Predicate::lookup("account_code__lt", ["1", "2"]),
            Err(LedgerError::InvalidPredicate(_))
        ));
        assert!(matches!(
            Predicate::lookup("__eq", ["1"]),
            Err(LedgerError::InvalidPredicate(_))
        ));
    }

    #[test]
    fn test_lookup_with_custom_token() {
        let config = BookkeepingConfig {
            filter_token: ":".to_string(),
            ..BookkeepingConfig::default()
        };
        let predicate = Predicate::lookup_with(&config, "name:eq", ["Cash"]).unwrap();
        assert_eq!(predicate.field(), "name");
        assert_eq!(predicate.condition(), &Condition::Eq("Cash".into()));
    }

    #[test]
    fn test_fuzzy_and_exact_equality() {
        assert!(FilterValue::from("CASH").equals("cash", true));
        assert!(!FilterValue::from("CASH").equals("cash", false));
        assert!(FilterValue::from(121).equals("121", true));
        assert!(!FilterValue::from(121).equals("121", false));
    }

    #[test]
    fn test_integer_comparison_is_numeric_when_fuzzy() {
        assert!(!Condition::Lt(FilterValue::Integer(9)).holds("10", true));
        assert!(Condition::Gt(FilterValue::Integer(9)).holds("10", true));
        assert!(!Condition::Gt(FilterValue::Integer(9)).holds("ten", true));
        assert!(Condition::Gte(FilterValue::from("200")).holds("200", false));
    }

    #[test]
    fn test_segment_named_name_shadows_account_name() {
        use core_kernel::AccountType;
        use domain_numbering::{Segment, Template};

        let template = Template::new([Segment::flat("Name", ["01", "02"], "entity").unwrap()]).unwrap();
        let account = Account::from_template("Cash", "02", &template, AccountType::Debit).unwrap();

        assert!(Predicate::eq("name", "02").matches(&account, false));
        assert!(!Predicate::eq("name", "Cash").matches(&account, true));
    }
}
