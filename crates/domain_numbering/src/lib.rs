//! Account Numbering Domain
//!
//! This crate describes how structured account numbers are laid out and
//! validated. A [`Template`] is an ordered list of named, fixed-width
//! [`Segment`]s joined by a separator; parsing a raw string against it yields
//! an [`AccountNumber`] whose tokens can be looked up by segment name.
//!
//! # Example
//!
//! ```rust
//! use domain_numbering::{Segment, Template};
//!
//! let template = Template::builder()
//!     .segment(Segment::enumerated("Division Code", [("01", "North"), ("10", "South")]).unwrap())
//!     .segment(Segment::pattern("Account Code", 3, [(r"1\d\d", "Assets"), (r"2\d\d", "Liabilities")]).unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(template.to_string(), "XX-XXX");
//! let number = template.parse("10-200").unwrap();
//! assert_eq!(number.segment_value("account_code").unwrap(), "200");
//! assert_eq!(number.segment_meaning("Account Code").unwrap(), "Liabilities");
//! ```
//!
//! # Segment kinds
//!
//! - **Enumerated**: a fixed table of keys to meanings, all keys the same width
//! - **Pattern**: fixed-width regular expressions mapped to meanings; patterns
//!   with variable-length repetition are rejected when the segment is built

pub mod allocator;
pub mod error;
pub mod number;
mod pattern;
pub mod segment;
pub mod template;

pub use allocator::NumberAllocator;
pub use error::{NumberingError, SchemaError};
pub use number::AccountNumber;
pub use segment::{Segment, SegmentKind};
pub use template::{normalize_key, Template, TemplateBuilder, DEFAULT_MASK_FILL, DEFAULT_SEPARATOR};
