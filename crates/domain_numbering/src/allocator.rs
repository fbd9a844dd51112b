//! Auto-numbering for incrementable segments
//!
//! Given values for every other segment, the allocator picks the lowest
//! unused zero-padded number in the incrementable segment among existing
//! siblings, i.e. numbers that share all the fixed values.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::error::NumberingError;
use crate::number::AccountNumber;
use crate::template::Template;

/// Allocates new numbers in a template's incrementable segment
#[derive(Debug, Clone)]
pub struct NumberAllocator {
    template: Arc<Template>,
    position: usize,
}

impl NumberAllocator {
    /// # Errors
    ///
    /// Returns `NumberingError::NoIncrementableSegment` if the template does
    /// not mark a segment as incrementable.
    pub fn new(template: &Arc<Template>) -> Result<Self, NumberingError> {
        let position = template
            .incrementable_position()
            .ok_or(NumberingError::NoIncrementableSegment)?;
        Ok(Self {
            template: Arc::clone(template),
            position,
        })
    }

    /// Returns the lowest free number under the `fixed` segment values
    ///
    /// `existing` may contain numbers from any template; only siblings from
    /// this template are considered.
    ///
    /// # Errors
    ///
    /// - `NumberingError::MissingSegment` / `UnknownSegment` /
    ///   `DuplicateSegmentValue` for malformed `fixed` values
    /// - `NumberingError::FixedIncrementableSegment` if `fixed` names the
    ///   incrementable segment
    /// - `NumberingError::SchemaMismatch` if a fixed value is not legal
    /// - `NumberingError::Overflow` once every value of the segment's width is taken
    pub fn next<'a, I, K, V, E>(&self, fixed: I, existing: E) -> Result<AccountNumber, NumberingError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
        E: IntoIterator<Item = &'a AccountNumber>,
    {
        let segments = self.template.segments();
        let slots = self.template.assign(fixed, Some(self.position))?;

        let mut tokens = Vec::with_capacity(slots.len());
        for (index, (segment, slot)) in segments.iter().zip(slots).enumerate() {
            if index == self.position {
                tokens.push(String::new());
                continue;
            }
            let token = slot.ok_or_else(|| NumberingError::MissingSegment {
                segment: segment.name().to_string(),
            })?;
            if !segment.validate(&token) {
                return Err(NumberingError::SchemaMismatch {
                    number: token.clone(),
                    reason: format!("'{}' is not a valid {}", token, segment.name()),
                });
            }
            tokens.push(token);
        }

        let used: HashSet<&str> = existing
            .into_iter()
            .filter(|number| number.template().id() == self.template.id())
            .filter(|number| {
                number
                    .tokens()
                    .iter()
                    .zip(&tokens)
                    .enumerate()
                    .all(|(index, (theirs, ours))| index == self.position || theirs == ours)
            })
            .map(|number| number.tokens()[self.position].as_str())
            .collect();

        let segment = &segments[self.position];
        let token = segment
            .lowest_free_number(&|token: &str| !used.contains(token))
            .ok_or_else(|| NumberingError::Overflow {
                segment: segment.name().to_string(),
                width: segment.length(),
            })?;

        tokens[self.position] = token;
        let number = AccountNumber::from_tokens(Arc::clone(&self.template), tokens);
        debug!(number = %number, siblings = used.len(), "Allocated account number");
        Ok(number)
    }
}
