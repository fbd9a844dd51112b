//! Account number templates
//!
//! A template fixes the order of segments and the separator between them.
//! Templates are immutable once built and are shared as `Arc<Template>`;
//! every [`AccountNumber`] keeps a handle on the template that parsed it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use core_kernel::{BookkeepingConfig, TemplateId};

use crate::error::{NumberingError, SchemaError};
use crate::number::AccountNumber;
use crate::segment::Segment;

/// Separator used when none is configured
pub const DEFAULT_SEPARATOR: &str = "-";

/// Placeholder character of the rendered mask when none is configured
pub const DEFAULT_MASK_FILL: char = 'X';

/// Normalises a segment name or lookup key
///
/// Matching is case-insensitive and treats spaces and underscores alike, so
/// `"Division Code"`, `"division_code"` and `"DIVISION code"` are one key.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace(' ', "_")
}

/// Builder for [`Template`]
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    segments: Vec<Segment>,
    separator: String,
    mask_fill: char,
}

impl Default for TemplateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            separator: DEFAULT_SEPARATOR.to_string(),
            mask_fill: DEFAULT_MASK_FILL,
        }
    }

    /// Starts a builder with the configured separator and mask fill
    pub fn from_config(config: &BookkeepingConfig) -> Self {
        Self::new()
            .separator(config.separator.clone())
            .mask_fill(config.mask_fill)
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Placeholder character used when the template is displayed
    pub fn mask_fill(mut self, fill: char) -> Self {
        self.mask_fill = fill;
        self
    }

    /// Appends the next positional segment
    pub fn segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn segments(mut self, segments: impl IntoIterator<Item = Segment>) -> Self {
        self.segments.extend(segments);
        self
    }

    /// Validates the schema and freezes it
    ///
    /// Segment names are checked under [`normalize_key`], so `"Account Code"`
    /// and `"account_code"` cannot both be used.
    ///
    /// # Example
    ///
    /// ```
    /// use domain_numbering::{Segment, Template};
    ///
    /// let template = Template::builder()
    ///     .segment(Segment::flat("Division", ["01", "02"], "division").unwrap())
    ///     .segment(
    ///         Segment::pattern("Code", 3, [(r"1\d\d", "Assets")])
    ///             .unwrap()
    ///             .incrementable()
    ///             .unwrap(),
    ///     )
    ///     .separator(".")
    ///     .mask_fill('#')
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(template.to_string(), "##.###");
    /// assert!(template.validate("02.150", None));
    /// ```
    ///
    /// # Errors
    ///
    /// - `SchemaError::EmptySeparator` if the separator is empty
    /// - `SchemaError::DuplicateSegmentName` if two names normalise equally
    /// - `SchemaError::MultipleIncrementable` if more than one segment is incrementable
    pub fn build(self) -> Result<Arc<Template>, SchemaError> {
        if self.separator.is_empty() {
            return Err(SchemaError::EmptySeparator);
        }

        let mut positions = HashMap::with_capacity(self.segments.len());
        let mut incrementable: Option<usize> = None;

        for (index, segment) in self.segments.iter().enumerate() {
            if positions.insert(normalize_key(segment.name()), index).is_some() {
                return Err(SchemaError::DuplicateSegmentName {
                    name: segment.name().to_string(),
                });
            }
            if segment.is_incrementable() {
                if let Some(first) = incrementable {
                    return Err(SchemaError::MultipleIncrementable {
                        first: self.segments[first].name().to_string(),
                        second: segment.name().to_string(),
                    });
                }
                incrementable = Some(index);
            }
        }

        let template = Template {
            id: TemplateId::new(),
            segments: self.segments,
            separator: self.separator,
            mask_fill: self.mask_fill,
            positions,
            incrementable,
        };
        debug!(template_id = %template.id, mask = %template, "Built account number template");

        Ok(Arc::new(template))
    }
}

/// An ordered composition of segments joined by a separator
///
/// # Invariants
///
/// - Segment names are unique under [`normalize_key`]
/// - At most one segment is incrementable
/// - The separator is non-empty
#[derive(Debug)]
pub struct Template {
    id: TemplateId,
    segments: Vec<Segment>,
    separator: String,
    mask_fill: char,
    positions: HashMap<String, usize>,
    incrementable: Option<usize>,
}

impl Template {
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::new()
    }

    /// Builds a template with the default separator
    pub fn new(segments: impl IntoIterator<Item = Segment>) -> Result<Arc<Self>, SchemaError> {
        TemplateBuilder::new().segments(segments).build()
    }

    /// Identity of this template instance
    pub fn id(&self) -> TemplateId {
        self.id
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Fill character used by `Display`
    pub fn mask_fill(&self) -> char {
        self.mask_fill
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Position of the segment called `name`, matched with [`normalize_key`]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(&normalize_key(name)).copied()
    }

    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.position(name).map(|index| &self.segments[index])
    }

    pub fn incrementable_position(&self) -> Option<usize> {
        self.incrementable
    }

    pub fn incrementable_segment(&self) -> Option<&Segment> {
        self.incrementable.map(|index| &self.segments[index])
    }

    /// Renders the placeholder mask, e.g. `XX-XX-XXX` for `fill = 'X'`
    pub fn render_mask(&self, fill: char) -> String {
        self.segments
            .iter()
            .map(|segment| fill.to_string().repeat(segment.length()))
            .collect::<Vec<_>>()
            .join(&self.separator)
    }

    /// Returns true if `number` is valid under this template
    ///
    /// `separator` overrides the template's separator for this check only.
    /// Never fails: a malformed number is simply invalid.
    pub fn validate(&self, number: &str, separator: Option<&str>) -> bool {
        self.tokenize(number, separator.unwrap_or(&self.separator)).is_ok()
    }

    /// Parses `number` into an [`AccountNumber`]
    ///
    /// # Errors
    ///
    /// Returns `NumberingError::SchemaMismatch` naming the first failing
    /// position when `number` does not validate.
    pub fn parse(self: &Arc<Self>, number: &str) -> Result<AccountNumber, NumberingError> {
        let tokens = self
            .tokenize(number, &self.separator)
            .map_err(|reason| NumberingError::SchemaMismatch {
                number: number.to_string(),
                reason,
            })?;
        Ok(AccountNumber::from_tokens(Arc::clone(self), tokens))
    }

    /// Builds a number from `(segment name, value)` pairs
    ///
    /// Every segment must be supplied exactly once. The values are joined in
    /// template order and parsed, so the result is guaranteed to validate.
    ///
    /// # Errors
    ///
    /// - `NumberingError::UnknownSegment` for a name the template lacks
    /// - `NumberingError::DuplicateSegmentValue` for a name given twice
    /// - `NumberingError::MissingSegment` for a segment left out
    /// - `NumberingError::SchemaMismatch` if a value is not legal
    pub fn build<I, K, V>(self: &Arc<Self>, values: I) -> Result<AccountNumber, NumberingError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let slots = self.assign(values, None)?;
        let mut tokens = Vec::with_capacity(slots.len());
        for (segment, slot) in self.segments.iter().zip(slots) {
            let token = slot.ok_or_else(|| NumberingError::MissingSegment {
                segment: segment.name().to_string(),
            })?;
            tokens.push(token);
        }
        self.parse(&tokens.join(&self.separator))
    }

    /// Places named values into positional slots
    ///
    /// `skip` names a position the caller fills itself; supplying it is an error.
    pub(crate) fn assign<I, K, V>(
        &self,
        values: I,
        skip: Option<usize>,
    ) -> Result<Vec<Option<String>>, NumberingError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut slots: Vec<Option<String>> = vec![None; self.segments.len()];
        for (name, value) in values {
            let name = name.as_ref();
            let index = self.position(name).ok_or_else(|| NumberingError::UnknownSegment {
                segment: name.to_string(),
            })?;
            if Some(index) == skip {
                return Err(NumberingError::FixedIncrementableSegment {
                    segment: self.segments[index].name().to_string(),
                });
            }
            if slots[index].replace(value.into()).is_some() {
                return Err(NumberingError::DuplicateSegmentValue {
                    segment: self.segments[index].name().to_string(),
                });
            }
        }
        Ok(slots)
    }

    fn tokenize(&self, number: &str, separator: &str) -> Result<Vec<String>, String> {
        if self.segments.is_empty() {
            return if number.is_empty() {
                Ok(Vec::new())
            } else {
                Err("template has no segments".to_string())
            };
        }
        if separator.is_empty() {
            return Err("separator is empty".to_string());
        }

        let tokens: Vec<&str> = number.split(separator).collect();
        if tokens.len() != self.segments.len() {
            return Err(format!(
                "expected {} segments separated by '{}', found {}",
                self.segments.len(),
                separator,
                tokens.len()
            ));
        }

        for (segment, token) in self.segments.iter().zip(&tokens) {
            if !segment.validate(token) {
                return Err(format!("'{}' is not a valid {}", token, segment.name()));
            }
        }

        Ok(tokens.into_iter().map(str::to_string).collect())
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_mask(self.mask_fill))
    }
}
