//! Numbering domain errors

use core_kernel::TemplateId;
use thiserror::Error;

/// Errors raised while building a segment or template
///
/// These are fatal to the schema being built.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Segment name must not be empty")]
    EmptyName,

    #[error("Segment '{segment}' defines no keys or patterns")]
    EmptySegment { segment: String },

    #[error("Segment '{segment}' has a zero-width key or pattern")]
    ZeroWidth { segment: String },

    #[error("Segment '{segment}': '{key}' is {actual} characters wide, expected {expected}")]
    NonUniformWidth {
        segment: String,
        key: String,
        expected: usize,
        actual: usize,
    },

    #[error("Segment '{segment}': duplicate key '{key}'")]
    DuplicateKey { segment: String, key: String },

    #[error("Segment '{segment}': pattern '{pattern}' uses repetition syntax")]
    VariableRepetition { segment: String, pattern: String },

    #[error("Segment '{segment}': alternatives in pattern '{pattern}' differ in width")]
    NonUniformPattern { segment: String, pattern: String },

    #[error("Segment '{segment}': invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        segment: String,
        pattern: String,
        message: String,
    },

    #[error("Segment '{segment}' is incrementable but has {rules} rules")]
    IncrementableWithMultipleRules { segment: String, rules: usize },

    #[error("Duplicate segment name '{name}'")]
    DuplicateSegmentName { name: String },

    #[error("Only one segment may be incrementable: '{first}' and '{second}'")]
    MultipleIncrementable { first: String, second: String },

    #[error("Template separator must not be empty")]
    EmptySeparator,
}

/// Errors raised while validating, parsing or comparing account numbers
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NumberingError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Account number '{number}' does not match template: {reason}")]
    SchemaMismatch { number: String, reason: String },

    #[error("No value supplied for segment '{segment}'")]
    MissingSegment { segment: String },

    #[error("Unknown segment '{segment}'")]
    UnknownSegment { segment: String },

    #[error("Segment '{segment}' supplied more than once")]
    DuplicateSegmentValue { segment: String },

    #[error("Account numbers from templates {left} and {right} cannot be compared")]
    IncompatibleTemplate { left: TemplateId, right: TemplateId },

    #[error("Segment '{segment}' has no meaning for '{token}'")]
    NoMeaning { segment: String, token: String },

    #[error("Template has no incrementable segment")]
    NoIncrementableSegment,

    #[error("Incrementable segment '{segment}' is allocated by the allocator and cannot be fixed")]
    FixedIncrementableSegment { segment: String },

    #[error("Incrementable segment '{segment}' exhausted all {width}-digit values")]
    Overflow { segment: String, width: usize },
}
