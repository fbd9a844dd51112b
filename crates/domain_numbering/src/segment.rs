//! Account number segments
//!
//! A segment is one fixed-width positional field of an account number. It
//! defines which tokens are legal at its position and what each token means.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{NumberingError, SchemaError};
use crate::pattern::{lowest_digit_token, DigitPath, FixedPattern};

/// How a segment recognises its tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Fixed table of keys
    Enumerated,
    /// Fixed-width regular expressions
    Pattern,
}

#[derive(Debug, Clone)]
struct PatternRule {
    pattern: FixedPattern,
    meaning: String,
}

#[derive(Debug, Clone)]
enum Rules {
    Enumerated(BTreeMap<String, String>),
    Pattern(Vec<PatternRule>),
}

/// A named, fixed-width field of an account number
///
/// # Invariants
///
/// - Every key or pattern matches exactly `length` characters
/// - Patterns contain no repetition syntax
/// - An incrementable segment has a single rule
#[derive(Debug, Clone)]
pub struct Segment {
    name: String,
    length: usize,
    rules: Rules,
    incrementable: bool,
}

impl Segment {
    /// Creates an enumerated segment from `(key, meaning)` pairs
    ///
    /// The width is taken from the keys, which must all be equally wide.
    ///
    /// # Errors
    ///
    /// - `SchemaError::EmptySegment` if no pairs are given
    /// - `SchemaError::NonUniformWidth` if keys differ in width
    /// - `SchemaError::DuplicateKey` if a key repeats
    pub fn enumerated<I, K, V>(name: impl Into<String>, entries: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let name = checked_name(name.into())?;
        let mut keys = BTreeMap::new();
        let mut length = None;

        for (key, meaning) in entries {
            let key = key.into();
            let width = key.chars().count();
            check_width(&name, &key, width, &mut length)?;
            if keys.insert(key.clone(), meaning.into()).is_some() {
                return Err(SchemaError::DuplicateKey { segment: name, key });
            }
        }

        let length = length.ok_or_else(|| SchemaError::EmptySegment { segment: name.clone() })?;
        Ok(Self {
            name,
            length,
            rules: Rules::Enumerated(keys),
            incrementable: false,
        })
    }

    /// Creates an enumerated segment where every key shares one meaning
    pub fn flat<I, K>(
        name: impl Into<String>,
        keys: I,
        meaning: impl Into<String>,
    ) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let meaning = meaning.into();
        Self::enumerated(name, keys.into_iter().map(|key| (key, meaning.clone())))
    }

    /// Creates a pattern segment of `length` characters from `(regex, meaning)` pairs
    ///
    /// # Errors
    ///
    /// - `SchemaError::VariableRepetition` for `*`, `+`, `?` or `{m,n}` syntax
    /// - `SchemaError::NonUniformWidth` if a pattern is not `length` wide
    /// - `SchemaError::InvalidPattern` if a pattern does not parse
    pub fn pattern<I, P, V>(
        name: impl Into<String>,
        length: usize,
        rules: I,
    ) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (P, V)>,
        P: AsRef<str>,
        V: Into<String>,
    {
        let name = checked_name(name.into())?;
        if length == 0 {
            return Err(SchemaError::ZeroWidth { segment: name });
        }

        let mut compiled = Vec::new();
        let mut expected = Some(length);
        for (source, meaning) in rules {
            let pattern = FixedPattern::compile(&name, source.as_ref())?;
            check_width(&name, pattern.source(), pattern.width(), &mut expected)?;
            compiled.push(PatternRule {
                pattern,
                meaning: meaning.into(),
            });
        }

        if compiled.is_empty() {
            return Err(SchemaError::EmptySegment { segment: name });
        }

        Ok(Self {
            name,
            length,
            rules: Rules::Pattern(compiled),
            incrementable: false,
        })
    }

    /// Marks this segment as the one used for auto-numbering
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::IncrementableWithMultipleRules` if the segment
    /// has more than one key or pattern.
    pub fn incrementable(mut self) -> Result<Self, SchemaError> {
        let rules = self.rule_count();
        if rules > 1 {
            return Err(SchemaError::IncrementableWithMultipleRules {
                segment: self.name,
                rules,
            });
        }
        self.incrementable = true;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width in characters
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn kind(&self) -> SegmentKind {
        match self.rules {
            Rules::Enumerated(_) => SegmentKind::Enumerated,
            Rules::Pattern(_) => SegmentKind::Pattern,
        }
    }

    pub fn is_incrementable(&self) -> bool {
        self.incrementable
    }

    /// Number of keys or patterns
    pub fn rule_count(&self) -> usize {
        match &self.rules {
            Rules::Enumerated(keys) => keys.len(),
            Rules::Pattern(rules) => rules.len(),
        }
    }

    /// Returns true if `token` is a legal value for this segment
    pub fn validate(&self, token: &str) -> bool {
        self.lookup(token).is_some()
    }

    /// Returns the meaning mapped to `token`
    ///
    /// # Errors
    ///
    /// Returns `NumberingError::NoMeaning` if no key or pattern matches.
    pub fn meaning(&self, token: &str) -> Result<&str, NumberingError> {
        self.lookup(token).ok_or_else(|| NumberingError::NoMeaning {
            segment: self.name.clone(),
            token: token.to_string(),
        })
    }

    /// Keys (sorted) or pattern sources (definition order) with their meanings
    pub fn rules(&self) -> Vec<(&str, &str)> {
        match &self.rules {
            Rules::Enumerated(keys) => keys.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect(),
            Rules::Pattern(rules) => rules
                .iter()
                .map(|rule| (rule.pattern.source(), rule.meaning.as_str()))
                .collect(),
        }
    }

    /// Lowest all-digit token this segment accepts and `free` allows
    pub(crate) fn lowest_free_number(&self, free: &dyn Fn(&str) -> bool) -> Option<String> {
        match &self.rules {
            Rules::Enumerated(keys) => keys
                .keys()
                .find(|key| key.bytes().all(|b| b.is_ascii_digit()) && free(key))
                .cloned(),
            Rules::Pattern(rules) => {
                let paths: Vec<&DigitPath> = rules
                    .iter()
                    .flat_map(|rule| rule.pattern.digit_paths())
                    .collect();
                lowest_digit_token(&paths, self.length, &|token: &str| free(token) && self.validate(token))
            }
        }
    }

    fn lookup(&self, token: &str) -> Option<&str> {
        match &self.rules {
            Rules::Enumerated(keys) => keys.get(token).map(String::as_str),
            Rules::Pattern(rules) => rules
                .iter()
                .find(|rule| rule.pattern.matches(token))
                .map(|rule| rule.meaning.as_str()),
        }
    }
}

fn checked_name(name: String) -> Result<String, SchemaError> {
    if name.trim().is_empty() {
        return Err(SchemaError::EmptyName);
    }
    Ok(name)
}

fn check_width(
    segment: &str,
    key: &str,
    width: usize,
    expected: &mut Option<usize>,
) -> Result<(), SchemaError> {
    if width == 0 {
        return Err(SchemaError::ZeroWidth { segment: segment.to_string() });
    }
    match *expected {
        Some(expected) if expected != width => Err(SchemaError::NonUniformWidth {
            segment: segment.to_string(),
            key: key.to_string(),
            expected,
            actual: width,
        }),
        Some(_) => Ok(()),
        None => {
            *expected = Some(width);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerated_lookup() {
        let segment = Segment::enumerated("Department", [("00", "dpt0"), ("02", "dpt2")]).unwrap();
        assert_eq!(segment.length(), 2);
        assert_eq!(segment.kind(), SegmentKind::Enumerated);
        assert!(segment.validate("02"));
        assert!(!segment.validate("01"));
        assert_eq!(segment.meaning("00").unwrap(), "dpt0");
    }

    #[test]
    fn test_enumerated_rejects_mixed_widths() {
        let result = Segment::enumerated("Department", [("00", "a"), ("001", "b")]);
        assert!(matches!(result, Err(SchemaError::NonUniformWidth { expected: 2, actual: 3, .. })));
    }

    #[test]
    fn test_pattern_rejects_wrong_declared_length() {
        let result = Segment::pattern("Code", 2, [(r"1\d\d", "Assets")]);
        assert!(matches!(result, Err(SchemaError::NonUniformWidth { expected: 2, actual: 3, .. })));
    }

    #[test]
    fn test_pattern_meaning_uses_first_match() {
        let segment = Segment::pattern("Code", 3, [(r"1\d\d", "Assets"), (r"\d\d\d", "Other")]).unwrap();
        assert_eq!(segment.meaning("150").unwrap(), "Assets");
        assert_eq!(segment.meaning("950").unwrap(), "Other");
        assert!(matches!(segment.meaning("ABC"), Err(NumberingError::NoMeaning { .. })));
    }

    #[test]
    fn test_incrementable_requires_single_rule() {
        let single = Segment::pattern("Seq", 3, [(r"\d\d\d", "Sequence")]).unwrap();
        assert!(single.incrementable().unwrap().is_incrementable());

        let multiple = Segment::pattern("Seq", 3, [(r"1\d\d", "a"), (r"2\d\d", "b")]).unwrap();
        assert!(matches!(
            multiple.incrementable(),
            Err(SchemaError::IncrementableWithMultipleRules { rules: 2, .. })
        ));
    }
}
