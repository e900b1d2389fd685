//! S-expression reader for single lines of solver output.
//!
//! Numeric spellings that solvers print as applications are folded into
//! atoms while parsing: `(- 5)`, `(/ 1 3)`, `(_ bv10 8)`, `(fp ...)`,
//! `(_ NaN 8 24)`, `((_ to_fp 11 53) #x...)`. The `Display` form of every
//! tree parses back to an equal tree.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use crate::value::exact_decimal;

/// A parsed s-expression.
///
/// `Float` and `Double` compare by bit pattern.
#[derive(Debug, Clone)]
pub enum SExpr {
    /// Bare or `|quoted|` symbol.
    Symbol(String),
    /// String literal, without quotes and with `""` unescaped.
    String(String),
    /// Plain integer.
    Int(BigInt),
    /// `#x`/`#b` bit-vector literal. `value < 2^width`.
    BitVec { value: BigInt, width: u32 },
    /// Decimal or rational literal.
    Decimal(BigRational),
    Float(f32),
    Double(f64),
    /// Parenthesized list; possibly empty.
    App(Vec<SExpr>),
}

impl PartialEq for SExpr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SExpr::Symbol(a), SExpr::Symbol(b)) => a == b,
            (SExpr::String(a), SExpr::String(b)) => a == b,
            (SExpr::Int(a), SExpr::Int(b)) => a == b,
            (
                SExpr::BitVec { value: v1, width: w1 },
                SExpr::BitVec { value: v2, width: w2 },
            ) => v1 == v2 && w1 == w2,
            (SExpr::Decimal(a), SExpr::Decimal(b)) => a == b,
            (SExpr::Float(a), SExpr::Float(b)) => a.to_bits() == b.to_bits(),
            (SExpr::Double(a), SExpr::Double(b)) => a.to_bits() == b.to_bits(),
            (SExpr::App(a), SExpr::App(b)) => a == b,
            _ => false,
        }
    }
}

impl SExpr {
    /// Check if this is a symbol with the given name.
    pub fn is_symbol(&self, name: &str) -> bool {
        matches!(self, SExpr::Symbol(s) if s == name)
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            SExpr::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_app(&self) -> Option<&[SExpr]> {
        match self {
            SExpr::App(items) => Some(items),
            _ => None,
        }
    }

    /// Check if this is the integer `n`.
    pub fn is_int(&self, n: i64) -> bool {
        matches!(self, SExpr::Int(v) if *v == BigInt::from(n))
    }
}

/// Reader failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SExprError {
    pub message: String,
    /// Byte offset in the line, if known.
    pub position: Option<usize>,
}

impl SExprError {
    fn at(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position: Some(position),
        }
    }

    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }
}

impl fmt::Display for SExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{} at byte {pos}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for SExprError {}

#[derive(Debug, PartialEq)]
enum Token {
    Open,
    Close,
    /// Bare token; classified into a number or a symbol later.
    Bare(String),
    /// `|...|` symbol.
    Quoted(String),
    Str(String),
}

/// Bytes that end a bare token.
fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'(' | b')' | b'|' | b'"' | b';')
}

fn tokenize(line: &str) -> Result<Vec<(usize, Token)>, SExprError> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        match bytes[i] {
            b if b.is_ascii_whitespace() => i += 1,
            b';' => {
                // Comment to end of line
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'(' => {
                tokens.push((start, Token::Open));
                i += 1;
            }
            b')' => {
                tokens.push((start, Token::Close));
                i += 1;
            }
            b'|' => {
                let end = line[i + 1..]
                    .find('|')
                    .ok_or_else(|| SExprError::at("unterminated quoted symbol", start))?;
                tokens.push((start, Token::Quoted(line[i + 1..i + 1 + end].to_string())));
                i += end + 2;
            }
            b'"' => {
                let mut text = String::new();
                let mut j = i + 1;
                loop {
                    let rel = line[j..]
                        .find('"')
                        .ok_or_else(|| SExprError::at("unterminated string literal", start))?;
                    text.push_str(&line[j..j + rel]);
                    j += rel + 1;
                    // `""` inside a string is an escaped quote
                    if bytes.get(j) == Some(&b'"') {
                        text.push('"');
                        j += 1;
                    } else {
                        break;
                    }
                }
                tokens.push((start, Token::Str(text)));
                i = j;
            }
            _ => {
                while i < bytes.len() && !is_delimiter(bytes[i]) {
                    i += 1;
                }
                tokens.push((start, Token::Bare(line[start..i].to_string())));
            }
        }
    }

    Ok(tokens)
}

fn is_integer_token(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_decimal_token(text: &str) -> Option<BigRational> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (whole, frac) = body.split_once('.')?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(frac) {
        return None;
    }
    let mut numer: BigInt = format!("{whole}{frac}").parse().ok()?;
    if negative {
        numer = -numer;
    }
    let denom = num_traits::pow(BigInt::from(10), frac.len());
    Some(BigRational::new(numer, denom))
}

fn parse_bitvec_token(text: &str) -> Option<SExpr> {
    let (digits, radix, bits_per_digit) = if let Some(hex) = text.strip_prefix("#x") {
        (hex, 16, 4)
    } else if let Some(bin) = text.strip_prefix("#b") {
        (bin, 2, 1)
    } else {
        return None;
    };
    if digits.is_empty() {
        return None;
    }
    let value = BigInt::parse_bytes(digits.as_bytes(), radix)?;
    let width = u32::try_from(digits.len() * bits_per_digit).ok()?;
    Some(SExpr::BitVec { value, width })
}

/// Classify a bare token as a number or a symbol. The whole token must
/// match a numeric form; `1abc` or `#xyz` stay symbols.
fn classify_atom(text: &str) -> SExpr {
    if let Some(bv) = parse_bitvec_token(text) {
        return bv;
    }
    if is_integer_token(text)
        && let Ok(n) = text.parse::<BigInt>()
    {
        return SExpr::Int(n);
    }
    if let Some(d) = parse_decimal_token(text) {
        return SExpr::Decimal(d);
    }
    SExpr::Symbol(text.to_string())
}

fn as_rational(e: &SExpr) -> Option<BigRational> {
    match e {
        SExpr::Int(n) => Some(BigRational::from_integer(n.clone())),
        SExpr::Decimal(d) => Some(d.clone()),
        _ => None,
    }
}

fn as_u32(e: &SExpr) -> Option<u32> {
    match e {
        SExpr::Int(n) => n.to_u32(),
        _ => None,
    }
}

/// Float or double from an IEEE bit pattern of the given field widths.
fn ieee_from_bits(bits: &BigInt, eb: u32, sb: u32) -> Option<SExpr> {
    match (eb, sb) {
        (8, 24) => bits.to_u32().map(|b| SExpr::Float(f32::from_bits(b))),
        (11, 53) => bits.to_u64().map(|b| SExpr::Double(f64::from_bits(b))),
        _ => None,
    }
}

/// `(_ +zero|-zero|+oo|-oo|NaN eb sb)`
fn ieee_special(name: &str, eb: u32, sb: u32) -> Option<SExpr> {
    let single = match name {
        "+zero" => 0.0f32,
        "-zero" => -0.0,
        "+oo" => f32::INFINITY,
        "-oo" => f32::NEG_INFINITY,
        "NaN" => f32::NAN,
        _ => return None,
    };
    match (eb, sb) {
        (8, 24) => Some(SExpr::Float(single)),
        (11, 53) => Some(SExpr::Double(f64::from(single))),
        _ => None,
    }
}

/// Fold the numeric application forms solvers print into atoms.
fn fold_app(items: Vec<SExpr>) -> SExpr {
    let folded = match items.as_slice() {
        [op, SExpr::Int(n)] if op.is_symbol("-") => Some(SExpr::Int(-n)),
        [op, SExpr::Decimal(d)] if op.is_symbol("-") => Some(SExpr::Decimal(-d)),
        [op, a, b] if op.is_symbol("/") => match (as_rational(a), as_rational(b)) {
            (Some(a), Some(b)) if !b.is_zero() => Some(SExpr::Decimal(a / b)),
            _ => None,
        },
        [us, SExpr::Symbol(name), width] if us.is_symbol("_") => {
            let width = as_u32(width);
            match (name.strip_prefix("bv"), width) {
                (Some(digits), Some(w))
                    if w > 0 && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) =>
                {
                    digits
                        .parse::<BigInt>()
                        .ok()
                        .filter(|v| v.bits() <= u64::from(w))
                        .map(|value| SExpr::BitVec { value, width: w })
                }
                _ => None,
            }
        }
        [us, SExpr::Symbol(name), eb, sb] if us.is_symbol("_") => match (as_u32(eb), as_u32(sb)) {
            (Some(eb), Some(sb)) => ieee_special(name, eb, sb),
            _ => None,
        },
        [
            fp,
            SExpr::BitVec { value: s, width: 1 },
            SExpr::BitVec { value: e, width: ew },
            SExpr::BitVec { value: m, width: mw },
        ] if fp.is_symbol("fp") && matches!((*ew, *mw), (8, 23) | (11, 52)) => {
            let bits: BigInt = (s << (ew + mw)) | (e << *mw) | m;
            ieee_from_bits(&bits, *ew, mw + 1)
        }
        [SExpr::App(head), SExpr::BitVec { value, width }] => match head.as_slice() {
            [us, to_fp, eb, sb] if us.is_symbol("_") && to_fp.is_symbol("to_fp") => {
                match (as_u32(eb), as_u32(sb)) {
                    (Some(eb), Some(sb)) if eb.checked_add(sb) == Some(*width) => {
                        ieee_from_bits(value, eb, sb)
                    }
                    _ => None,
                }
            }
            _ => None,
        },
        _ => None,
    };
    folded.unwrap_or(SExpr::App(items))
}

/// Parse one line of solver output into a single s-expression.
///
/// Fails on empty input, unbalanced parentheses, unterminated quotes, and
/// trailing input after the first complete expression.
pub fn parse_sexpr(line: &str) -> Result<SExpr, SExprError> {
    let tokens = tokenize(line)?;
    // Open lists, innermost last. Iterative so deep nesting cannot
    // exhaust the stack.
    let mut stack: Vec<Vec<SExpr>> = Vec::new();
    let mut result: Option<SExpr> = None;

    for (pos, token) in tokens {
        if result.is_some() {
            return Err(SExprError::at("unexpected trailing input", pos));
        }
        let expr = match token {
            Token::Open => {
                stack.push(Vec::new());
                continue;
            }
            Token::Close => {
                let items = stack
                    .pop()
                    .ok_or_else(|| SExprError::at("unexpected ')'", pos))?;
                fold_app(items)
            }
            Token::Bare(text) => classify_atom(&text),
            Token::Quoted(text) => SExpr::Symbol(text),
            Token::Str(text) => SExpr::String(text),
        };
        match stack.last_mut() {
            Some(parent) => parent.push(expr),
            None => result = Some(expr),
        }
    }

    if !stack.is_empty() {
        return Err(SExprError::new(format!(
            "unbalanced parentheses: {} unclosed",
            stack.len()
        )));
    }
    result.ok_or_else(|| SExprError::new("empty input"))
}

/// Widest bit-vector printed as a zero-padded `#x`/`#b` literal.
const MAX_PADDED_WIDTH: u32 = 256;

/// Whether `name` must be written as `|name|` to read back as the same symbol.
fn needs_quoting(name: &str) -> bool {
    name.is_empty()
        || name.bytes().any(is_delimiter)
        || !matches!(classify_atom(name), SExpr::Symbol(_))
}

fn fmt_bits(f: &mut fmt::Formatter<'_>, value: u64, width: usize) -> fmt::Result {
    write!(f, "#b{value:0width$b}")
}

impl fmt::Display for SExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SExpr::Symbol(s) if needs_quoting(s) => write!(f, "|{s}|"),
            SExpr::Symbol(s) => write!(f, "{s}"),
            SExpr::String(s) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
            SExpr::Int(n) => write!(f, "{n}"),
            // Wide literals keep the indexed form so printing stays
            // proportional to the value, not the width.
            SExpr::BitVec { value, width } if *width > MAX_PADDED_WIDTH => {
                write!(f, "(_ bv{value} {width})")
            }
            SExpr::BitVec { value, width } => {
                let w = *width as usize;
                if w % 4 == 0 {
                    write!(f, "#x{value:0digits$x}", digits = w / 4)
                } else {
                    write!(f, "#b{value:0w$b}")
                }
            }
            SExpr::Decimal(d) => match exact_decimal(d) {
                Some(text) => write!(f, "{text}"),
                None => write!(f, "(/ {} {})", d.numer(), d.denom()),
            },
            SExpr::Float(x) => {
                let bits = x.to_bits();
                write!(f, "(fp ")?;
                fmt_bits(f, u64::from(bits >> 31), 1)?;
                write!(f, " ")?;
                fmt_bits(f, u64::from((bits >> 23) & 0xff), 8)?;
                write!(f, " ")?;
                fmt_bits(f, u64::from(bits & 0x7f_ffff), 23)?;
                write!(f, ")")
            }
            SExpr::Double(x) => {
                let bits = x.to_bits();
                write!(f, "(fp ")?;
                fmt_bits(f, bits >> 63, 1)?;
                write!(f, " ")?;
                fmt_bits(f, (bits >> 52) & 0x7ff, 11)?;
                write!(f, " ")?;
                fmt_bits(f, bits & 0x000f_ffff_ffff_ffff, 52)?;
                write!(f, ")")
            }
            SExpr::App(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}
