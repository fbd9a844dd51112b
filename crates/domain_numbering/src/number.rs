//! Parsed account numbers

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::NumberingError;
use crate::template::Template;

/// A validated account number, decomposed by its template
///
/// Tokens are stored in template order and can be read back by segment name
/// with [`AccountNumber::segment_value`]. Two numbers are equal when they come
/// from the same template instance and carry the same tokens; numbers from
/// different templates are unordered (`partial_cmp` returns `None`).
#[derive(Clone)]
pub struct AccountNumber {
    template: Arc<Template>,
    tokens: Vec<String>,
    canonical: String,
}

impl AccountNumber {
    /// Tokens must already be validated against `template`
    pub(crate) fn from_tokens(template: Arc<Template>, tokens: Vec<String>) -> Self {
        let canonical = tokens.join(template.separator());
        Self {
            template,
            tokens,
            canonical,
        }
    }

    pub fn template(&self) -> &Arc<Template> {
        &self.template
    }

    /// Tokens joined by the template separator
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Tokens in template order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// `(segment name, token)` pairs in template order
    pub fn segments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.template
            .segments()
            .iter()
            .zip(&self.tokens)
            .map(|(segment, token)| (segment.name(), token.as_str()))
    }

    /// Token stored for the segment called `name`
    ///
    /// # Errors
    ///
    /// Returns `NumberingError::UnknownSegment` if the template has no such segment.
    pub fn segment_value(&self, name: &str) -> Result<&str, NumberingError> {
        let index = self.index_of(name)?;
        Ok(&self.tokens[index])
    }

    /// Meaning of the token stored for the segment called `name`
    pub fn segment_meaning(&self, name: &str) -> Result<&str, NumberingError> {
        let index = self.index_of(name)?;
        self.template.segments()[index].meaning(&self.tokens[index])
    }

    /// Orders two numbers, failing if they come from different templates
    ///
    /// # Errors
    ///
    /// Returns `NumberingError::IncompatibleTemplate` when the template ids differ.
    pub fn try_cmp(&self, other: &AccountNumber) -> Result<Ordering, NumberingError> {
        self.partial_cmp(other)
            .ok_or_else(|| NumberingError::IncompatibleTemplate {
                left: self.template.id(),
                right: other.template.id(),
            })
    }

    fn index_of(&self, name: &str) -> Result<usize, NumberingError> {
        self.template
            .position(name)
            .ok_or_else(|| NumberingError::UnknownSegment {
                segment: name.to_string(),
            })
    }
}

impl PartialEq for AccountNumber {
    fn eq(&self, other: &Self) -> bool {
        self.template.id() == other.template.id() && self.tokens == other.tokens
    }
}

impl Eq for AccountNumber {}

impl PartialOrd for AccountNumber {
    /// Token-by-token string comparison; `None` across templates
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.template.id() != other.template.id() {
            return None;
        }
        Some(self.tokens.cmp(&other.tokens))
    }
}

impl Hash for AccountNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Separator-independent
        self.tokens.concat().hash(state);
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl fmt::Debug for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccountNumber").field(&self.canonical).finish()
    }
}

impl Serialize for AccountNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segment;

    fn template() -> Arc<Template> {
        Template::builder()
            .segment(Segment::flat("Division", ["01", "10", "11"], "division").unwrap())
            .segment(Segment::pattern("Code", 3, [(r"\d\d\d", "code")]).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_ordering_is_token_by_token() {
        let template = template();
        let a = template.parse("01-900").unwrap();
        let b = template.parse("10-100").unwrap();
        assert!(a < b);
        assert_eq!(a.try_cmp(&b).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_numbers_from_other_templates_are_incomparable() {
        let a = template().parse("01-100").unwrap();
        let b = template().parse("01-100").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.partial_cmp(&b), None);
        assert!(matches!(a.try_cmp(&b), Err(NumberingError::IncompatibleTemplate { .. })));
    }

    #[test]
    fn test_segment_value_lookup() {
        let number = template().parse("11-500").unwrap();
        assert_eq!(number.segment_value("division").unwrap(), "11");
        assert_eq!(number.segment_value("Code").unwrap(), "500");
        assert!(matches!(
            number.segment_value("nope"),
            Err(NumberingError::UnknownSegment { .. })
        ));
    }

    #[test]
    fn test_debug_shows_canonical_form() {
        let number = template().parse("11-500").unwrap();
        assert_eq!(format!("{number:?}"), "AccountNumber(\"11-500\")");
    }
}
