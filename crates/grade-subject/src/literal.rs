//! Restricted literal grammar for textual grade mappings
//!
//! Bulletin data stored as text looks like `{'1': (0, 14), '2': (15, 26)}`.
//! This module reads that text as *data only*: numbers, quoted strings,
//! tuples and mappings. Nothing is evaluated, there are no names, calls or
//! operators, and nesting depth is bounded.
//!
//! ```text
//! value   := number | string | tuple | mapping
//! number  := [+-]? digits ('.' digits?)? ([eE] [+-]? digits)?
//!          | [+-]? '.' digits ([eE] [+-]? digits)?
//! string  := '\'' chars '\'' | '"' chars '"'
//! tuple   := '(' ')' | '(' value ',' ')' | '(' value (',' value)+ ','? ')'
//! mapping := '{' '}' | '{' value ':' value (',' value ':' value)* ','? '}'
//! ```
//!
//! A parenthesised single value without a trailing comma is the value itself.

use grade_core::{Error, Result};
use std::fmt;

/// Nesting limit for tuples and mappings
pub const MAX_DEPTH: usize = 32;

/// A parsed literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer without fraction or exponent
    Int(i64),
    /// Number with a fraction or exponent
    Float(f64),
    /// Quoted string
    Str(String),
    /// Parenthesised sequence
    Tuple(Vec<Literal>),
    /// Key-value pairs in source order
    Map(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Short name of the literal kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Int(_) => "integer",
            Literal::Float(_) => "float",
            Literal::Str(_) => "string",
            Literal::Tuple(_) => "tuple",
            Literal::Map(_) => "mapping",
        }
    }

    /// Numeric value of an integer or float literal
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Int(v) => Some(*v as f64),
            Literal::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Float(v) => write!(f, "{v:?}"),
            Literal::Str(s) => write_quoted(f, s),
            Literal::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Literal::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Write `s` single-quoted, escaping what the parser unescapes
pub(crate) fn write_quoted(f: &mut impl fmt::Write, s: &str) -> fmt::Result {
    f.write_char('\'')?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('\'')
}

/// Parse `text` as a single literal value
///
/// # Errors
///
/// [`Error::Format`] carrying the offending text when it falls outside the
/// grammar, nests deeper than [`MAX_DEPTH`], or has trailing content.
///
/// # Examples
///
/// ```rust
/// use grade_subject::literal::{parse_literal, Literal};
///
/// let value = parse_literal("{'7': (68, 100)}").unwrap();
/// assert_eq!(
///     value,
///     Literal::Map(vec![(
///         Literal::Str("7".to_string()),
///         Literal::Tuple(vec![Literal::Int(68), Literal::Int(100)]),
///     )])
/// );
///
/// assert!(parse_literal("__import__('os')").is_err());
/// ```
pub fn parse_literal(text: &str) -> Result<Literal> {
    let mut parser = Parser::new(text);
    let value = parser.value(0)?;
    parser.skip_whitespace();
    if parser.pos < parser.bytes.len() {
        return Err(parser.error("unexpected trailing content"));
    }
    Ok(value)
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, reason: &str) -> Error {
        Error::format(format!("{:?}", self.text), format!("{reason} at offset {}", self.pos))
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    /// Consume `byte` after optional whitespace, reporting whether it was there
    fn eat(&mut self, byte: u8) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn value(&mut self, depth: usize) -> Result<Literal> {
        if depth > MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.skip_whitespace();
        match self.peek() {
            Some(b'{') => self.mapping(depth),
            Some(b'(') => self.tuple(depth),
            Some(quote @ (b'\'' | b'"')) => self.string(quote).map(Literal::Str),
            Some(b'0'..=b'9' | b'+' | b'-' | b'.') => self.number(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn mapping(&mut self, depth: usize) -> Result<Literal> {
        self.pos += 1;
        let mut entries = Vec::new();
        loop {
            if self.eat(b'}') {
                return Ok(Literal::Map(entries));
            }
            let key = self.value(depth + 1)?;
            if !self.eat(b':') {
                return Err(self.error("expected ':'"));
            }
            let value = self.value(depth + 1)?;
            entries.push((key, value));
            if !self.eat(b',') {
                if self.eat(b'}') {
                    return Ok(Literal::Map(entries));
                }
                return Err(self.error("expected ',' or '}'"));
            }
        }
    }

    fn tuple(&mut self, depth: usize) -> Result<Literal> {
        self.pos += 1;
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            if self.eat(b')') {
                break;
            }
            items.push(self.value(depth + 1)?);
            trailing_comma = self.eat(b',');
            if !trailing_comma {
                if self.eat(b')') {
                    break;
                }
                return Err(self.error("expected ',' or ')'"));
            }
        }
        // `(x)` is just a parenthesised value
        if items.len() == 1 && !trailing_comma {
            return Ok(items.remove(0));
        }
        Ok(Literal::Tuple(items))
    }

    fn string(&mut self, quote: u8) -> Result<String> {
        self.pos += 1;
        let mut out = Vec::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => return Err(self.error("unterminated string")),
                Some(b) if b == quote => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    let escaped = match self.peek() {
                        Some(b'\\') => b'\\',
                        Some(b'\'') => b'\'',
                        Some(b'"') => b'"',
                        Some(b'n') => b'\n',
                        Some(b'r') => b'\r',
                        Some(b't') => b'\t',
                        _ => return Err(self.error("unsupported escape sequence")),
                    };
                    out.push(escaped);
                    self.pos += 1;
                }
                Some(b) => {
                    out.push(b);
                    self.pos += 1;
                }
            }
        }
        // Only whole UTF-8 sequences and ASCII escapes were copied
        String::from_utf8(out).map_err(|_| self.error("invalid UTF-8 in string"))
    }

    fn number(&mut self) -> Result<Literal> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let int_digits = self.digits();
        let mut is_float = false;
        let mut frac_digits = 0;
        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            frac_digits = self.digits();
        }
        if int_digits == 0 && frac_digits == 0 {
            return Err(self.error("malformed number"));
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.digits() == 0 {
                return Err(self.error("malformed exponent"));
            }
        }

        let token = &self.text[start..self.pos];
        if is_float {
            token
                .parse::<f64>()
                .map(Literal::Float)
                .map_err(|_| self.error("malformed number"))
        } else {
            token
                .parse::<i64>()
                .map(Literal::Int)
                .map_err(|_| self.error("integer out of range"))
        }
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - start
    }
}
