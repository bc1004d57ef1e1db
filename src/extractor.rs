//! Line-oriented extraction of numeric array literals from generated C source.
//!
//! Each [`ExtractMode`] owns a line pattern anchored at the start of the line.
//! A matching line contributes the comma-separated tokens of its captured run;
//! anything after the run is ignored. Lines that do not match contribute no
//! bytes. Under [`ScanPolicy::Strict`] they must also look like C scaffolding
//! (comments, declarations, braces).

use std::fmt;
use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, trace};

use crate::pack::{PackError, PackFormat, Value};

static HEX_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\W*(0x[0-9a-fA-F,x ]+)").expect("valid hex line pattern"));

static FLOAT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([0-9,\-. ]+)").expect("valid float line pattern"));

static DECIMAL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9,\- ]+)").expect("valid decimal line pattern"));

/// Lines that may carry no data under [`ScanPolicy::Strict`].
static BENIGN_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:$|//|/\*|\*|#|[{}\[\]();,\s]+$|.*=|.*;\s*$)").expect("valid benign pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractMode {
    /// `0x1c, 0x00, ...` byte literals.
    Hex,
    /// `1.5, -2.0, ...` floating-point literals.
    Float,
    /// `100, -200, ...` integer literals.
    Decimal,
}

impl ExtractMode {
    pub fn pattern(&self) -> &'static Regex {
        match self {
            ExtractMode::Hex => &HEX_LINE,
            ExtractMode::Float => &FLOAT_LINE,
            ExtractMode::Decimal => &DECIMAL_LINE,
        }
    }

    pub fn default_format(&self) -> PackFormat {
        match self {
            ExtractMode::Hex | ExtractMode::Decimal => PackFormat::UNSIGNED_BYTE,
            ExtractMode::Float => PackFormat::BIG_ENDIAN_F32,
        }
    }

    /// Parse one trimmed, non-empty token.
    pub fn parse_token(&self, token: &str) -> Result<Value, TokenError> {
        let err = |kind: TokenErrorKind| TokenError {
            token: token.to_string(),
            mode: *self,
            kind,
        };
        match self {
            ExtractMode::Hex => {
                let digits = token
                    .strip_prefix("0x")
                    .or_else(|| token.strip_prefix("0X"))
                    .unwrap_or(token);
                let v = u128::from_str_radix(digits, 16).map_err(|e| err(int_error_kind(&e)))?;
                i128::try_from(v)
                    .map(Value::Int)
                    .map_err(|_| err(TokenErrorKind::Overflow))
            }
            ExtractMode::Decimal => token
                .parse::<i128>()
                .map(Value::Int)
                .map_err(|e| err(int_error_kind(&e))),
            ExtractMode::Float => token
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| err(TokenErrorKind::NotANumber)),
        }
    }
}

fn int_error_kind(e: &ParseIntError) -> TokenErrorKind {
    match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => TokenErrorKind::Overflow,
        _ => TokenErrorKind::NotAnInteger,
    }
}

impl fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExtractMode::Hex => "hex",
            ExtractMode::Float => "float",
            ExtractMode::Decimal => "decimal",
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown mode '{0}': expected hex, float or decimal")]
pub struct ModeError(pub String);

impl FromStr for ExtractMode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(ExtractMode::Hex),
            "float" => Ok(ExtractMode::Float),
            "decimal" | "int" => Ok(ExtractMode::Decimal),
            _ => Err(ModeError(s.to_string())),
        }
    }
}

/// What to do with a line that does not match the mode's pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPolicy {
    /// Skip it.
    #[default]
    Lenient,
    /// Skip it only if it looks like a comment, declaration or brace line.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenErrorKind {
    NotAnInteger,
    NotANumber,
    /// Well-formed, but wider than any supported integer.
    Overflow,
}

impl fmt::Display for TokenErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenErrorKind::NotAnInteger => "not an integer",
            TokenErrorKind::NotANumber => "not a number",
            TokenErrorKind::Overflow => "too large",
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed {mode} token '{token}': {kind}")]
pub struct TokenError {
    pub token: String,
    pub mode: ExtractMode,
    pub kind: TokenErrorKind,
}

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("line {line}: {source}")]
    Token { line: usize, source: TokenError },
    #[error("line {line}: cannot pack '{token}': {source}")]
    Pack {
        line: usize,
        token: String,
        source: PackError,
    },
    #[error("line {line}: unexpected content with no array data: '{content}'")]
    UnexpectedLine { line: usize, content: String },
}

/// Bytes extracted from one source text, with counters for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub bytes: Vec<u8>,
    pub tokens: usize,
    pub matched_lines: usize,
    pub skipped_lines: usize,
}

/// Append the packed tokens of one line to `out`.
///
/// Returns `Ok(None)` when the line does not match the mode's pattern, and
/// `Ok(Some(n))` with the number of tokens packed otherwise. `line_no` is only
/// used for error messages. On error, `out` may hold the bytes of the tokens
/// packed before the failing one.
pub fn extract_line(
    line: &str,
    line_no: usize,
    mode: ExtractMode,
    format: PackFormat,
    out: &mut Vec<u8>,
) -> Result<Option<usize>, ExtractError> {
    let Some(caps) = mode.pattern().captures(line) else {
        return Ok(None);
    };
    let run = caps.get(1).map_or("", |m| m.as_str());

    let mut count = 0;
    for token in run.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let pack_err = |source| ExtractError::Pack {
            line: line_no,
            token: token.to_string(),
            source,
        };
        let value = match mode.parse_token(token) {
            Ok(value) => value,
            // A literal too wide to parse is too wide for every format.
            Err(e) if e.kind == TokenErrorKind::Overflow => {
                return Err(pack_err(PackError::OutOfRange {
                    value: token.to_string(),
                    format,
                }));
            }
            Err(source) => {
                return Err(ExtractError::Token {
                    line: line_no,
                    source,
                });
            }
        };
        format.pack(value, out).map_err(pack_err)?;
        count += 1;
    }
    Ok(Some(count))
}

/// Whether a `/* ... */` comment is still open at the end of `line`.
fn block_comment_after(line: &str, mut open: bool) -> bool {
    let mut rest = line;
    loop {
        if open {
            match rest.find("*/") {
                Some(i) => {
                    open = false;
                    rest = &rest[i + 2..];
                }
                None => return true,
            }
        } else {
            let Some(start) = rest.find("/*") else {
                return false;
            };
            if rest.find("//").is_some_and(|i| i < start) {
                return false;
            }
            open = true;
            rest = &rest[start + 2..];
        }
    }
}

/// Extract every matching line of `text`, top to bottom.
pub fn extract_text(
    text: &str,
    mode: ExtractMode,
    format: PackFormat,
    policy: ScanPolicy,
) -> Result<Extraction, ExtractError> {
    let mut extraction = Extraction::default();
    let mut in_block_comment = false;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let starts_in_comment = in_block_comment;
        in_block_comment = block_comment_after(line, in_block_comment);

        match extract_line(line, line_no, mode, format, &mut extraction.bytes)? {
            Some(n) => {
                extraction.tokens += n;
                extraction.matched_lines += 1;
            }
            None => {
                if policy == ScanPolicy::Strict && !starts_in_comment && !BENIGN_LINE.is_match(line)
                {
                    return Err(ExtractError::UnexpectedLine {
                        line: line_no,
                        content: line.trim().to_string(),
                    });
                }
                trace!(line = line_no, "skipped line");
                extraction.skipped_lines += 1;
            }
        }
    }

    debug!(
        %mode,
        %format,
        tokens = extraction.tokens,
        bytes = extraction.bytes.len(),
        matched_lines = extraction.matched_lines,
        skipped_lines = extraction.skipped_lines,
        "extracted array data"
    );
    Ok(extraction)
}
