//! Fixed-width regular expressions for pattern segments

use regex::Regex;
use regex_syntax::hir::{Class, Hir, HirKind};

use crate::error::SchemaError;

/// Digits allowed at each position along one way through a pattern
pub(crate) type DigitPath = Vec<[bool; 10]>;

/// A compiled pattern that always matches exactly `width` characters
#[derive(Debug, Clone)]
pub(crate) struct FixedPattern {
    source: String,
    anchored: Regex,
    width: usize,
    digit_paths: Vec<DigitPath>,
}

impl FixedPattern {
    /// Parses `source`, measures its match width and compiles an anchored matcher
    ///
    /// Rejects repetition of any kind (`*`, `+`, `?`, `{m}`, `{m,n}`) and
    /// alternations whose branches differ in width.
    pub(crate) fn compile(segment: &str, source: &str) -> Result<Self, SchemaError> {
        let invalid = |message: String| SchemaError::InvalidPattern {
            segment: segment.to_string(),
            pattern: source.to_string(),
            message,
        };

        let hir = regex_syntax::Parser::new()
            .parse(source)
            .map_err(|e| invalid(e.to_string()))?;
        let width = match_width(&hir, segment, source)?;
        let anchored = Regex::new(&format!("^(?:{source})$")).map_err(|e| invalid(e.to_string()))?;
        let digit_paths = digit_paths(&hir)
            .into_iter()
            .filter(|path| path.len() == width && path.iter().all(|digits| digits.contains(&true)))
            .collect();

        Ok(Self {
            source: source.to_string(),
            anchored,
            width,
            digit_paths,
        })
    }

    pub(crate) fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    /// Full match, both ends anchored
    pub(crate) fn matches(&self, token: &str) -> bool {
        token.chars().count() == self.width && self.anchored.is_match(token)
    }

    /// Every way the pattern can match a token made only of ASCII digits
    pub(crate) fn digit_paths(&self) -> &[DigitPath] {
        &self.digit_paths
    }
}

/// Lowest all-digit token of `width` along one of `paths` that `accept` takes
///
/// Tokens are visited in ascending order and every visited prefix leads to
/// at least one token, so the walk stops after one more token than `accept`
/// turns down.
pub(crate) fn lowest_digit_token(
    paths: &[&DigitPath],
    width: usize,
    accept: &dyn Fn(&str) -> bool,
) -> Option<String> {
    let alive: Vec<&DigitPath> = paths.iter().copied().filter(|path| path.len() == width).collect();
    let mut prefix = String::with_capacity(width);
    descend(&alive, width, &mut prefix, accept)
}

fn descend(
    alive: &[&DigitPath],
    width: usize,
    prefix: &mut String,
    accept: &dyn Fn(&str) -> bool,
) -> Option<String> {
    let position = prefix.len();
    if position == width {
        return accept(prefix).then(|| prefix.clone());
    }
    for (digit, symbol) in ('0'..='9').enumerate() {
        let next: Vec<&DigitPath> = alive
            .iter()
            .copied()
            .filter(|path| path[position][digit])
            .collect();
        if next.is_empty() {
            continue;
        }
        prefix.push(symbol);
        if let Some(token) = descend(&next, width, prefix, accept) {
            return Some(token);
        }
        prefix.pop();
    }
    None
}

fn digit_paths(hir: &Hir) -> Vec<DigitPath> {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => vec![Vec::new()],
        HirKind::Literal(literal) => vec![String::from_utf8_lossy(&literal.0)
            .chars()
            .map(char_digits)
            .collect()],
        HirKind::Class(class) => vec![vec![class_digits(class)]],
        HirKind::Repetition(_) => Vec::new(),
        HirKind::Capture(capture) => digit_paths(&capture.sub),
        HirKind::Concat(parts) => parts.iter().fold(vec![Vec::new()], |prefixes, part| {
            let suffixes = digit_paths(part);
            prefixes
                .iter()
                .flat_map(|prefix| {
                    suffixes.iter().map(move |suffix| {
                        let mut path = prefix.clone();
                        path.extend_from_slice(suffix);
                        path
                    })
                })
                .collect()
        }),
        HirKind::Alternation(branches) => branches.iter().flat_map(digit_paths).collect(),
    }
}

fn char_digits(c: char) -> [bool; 10] {
    let mut digits = [false; 10];
    if let Some(digit) = c.to_digit(10) {
        digits[digit as usize] = true;
    }
    digits
}

fn class_digits(class: &Class) -> [bool; 10] {
    let mut digits = [false; 10];
    for (slot, symbol) in digits.iter_mut().zip('0'..='9') {
        *slot = match class {
            Class::Unicode(class) => class
                .ranges()
                .iter()
                .any(|range| range.start() <= symbol && symbol <= range.end()),
            Class::Bytes(class) => {
                let byte = symbol as u8;
                class
                    .ranges()
                    .iter()
                    .any(|range| range.start() <= byte && byte <= range.end())
            }
        };
    }
    digits
}

/// Number of characters every match of `hir` consumes
fn match_width(hir: &Hir, segment: &str, source: &str) -> Result<usize, SchemaError> {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => Ok(0),
        HirKind::Literal(literal) => Ok(String::from_utf8_lossy(&literal.0).chars().count()),
        HirKind::Class(_) => Ok(1),
        HirKind::Repetition(_) => Err(SchemaError::VariableRepetition {
            segment: segment.to_string(),
            pattern: source.to_string(),
        }),
        HirKind::Capture(capture) => match_width(&capture.sub, segment, source),
        HirKind::Concat(parts) => parts
            .iter()
            .map(|part| match_width(part, segment, source))
            .sum(),
        HirKind::Alternation(branches) => {
            let mut widths = branches
                .iter()
                .map(|branch| match_width(branch, segment, source));
            let first = match widths.next() {
                Some(width) => width?,
                None => return Ok(0),
            };
            for width in widths {
                if width? != first {
                    return Err(SchemaError::NonUniformPattern {
                        segment: segment.to_string(),
                        pattern: source.to_string(),
                    });
                }
            }
            Ok(first)
        }
    }
}
