#![forbid(unsafe_code)]

//! Tokenizer for condition expressions
//!
//! Produces a flat token stream with byte positions. Whitespace is
//! insignificant between tokens; a condition is a single expression, so
//! there are no line-continuation semantics.

use crate::error::RuleSyntaxError;
use std::fmt;

/// A single token of the condition language
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `$`, the sigil marking a bound-variable root
    Dollar,
    /// Bare identifier (path segment or function name)
    Ident(String),
    Dot,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    /// Double-quoted string literal, unescaped
    Str(String),
    Int(i64),
    Float(f64),
    True,
    False,
    Nil,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Dollar => write!(f, "$"),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Dot => write!(f, "."),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::Int(i) => write!(f, "{}", i),
            Token::Float(x) => write!(f, "{}", x),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Nil => write!(f, "nil"),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Le => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::Ge => write!(f, ">="),
            Token::AndAnd => write!(f, "&&"),
            Token::OrOr => write!(f, "||"),
        }
    }
}

/// A token together with its byte position in the source
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub position: usize,
}

/// Tokenizes a condition's source text
///
/// # Errors
///
/// Returns `RuleSyntaxError` on an unterminated string, an unknown operator
/// (`=`, `!`, `&`, `|` not doubled into their two-character forms), or a
/// character that cannot start any token.
pub fn tokenize(text: &str) -> Result<Vec<SpannedToken>, RuleSyntaxError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let c = bytes[pos] as char;

        match c {
            ' ' | '\t' | '\r' | '\n' => {
                pos += 1;
                continue;
            }
            '$' => {
                tokens.push(spanned(Token::Dollar, start));
                pos += 1;
            }
            '.' => {
                tokens.push(spanned(Token::Dot, start));
                pos += 1;
            }
            '[' => {
                tokens.push(spanned(Token::LBracket, start));
                pos += 1;
            }
            ']' => {
                tokens.push(spanned(Token::RBracket, start));
                pos += 1;
            }
            '(' => {
                tokens.push(spanned(Token::LParen, start));
                pos += 1;
            }
            ')' => {
                tokens.push(spanned(Token::RParen, start));
                pos += 1;
            }
            ',' => {
                tokens.push(spanned(Token::Comma, start));
                pos += 1;
            }
            '"' => {
                let (literal, next) = lex_string(text, start)?;
                tokens.push(spanned(Token::Str(literal), start));
                pos = next;
            }
            '=' => {
                pos = expect_double(bytes, start, '=', "=")?;
                tokens.push(spanned(Token::EqEq, start));
            }
            '!' => {
                pos = expect_double(bytes, start, '=', "!")?;
                tokens.push(spanned(Token::NotEq, start));
            }
            '&' => {
                pos = expect_double(bytes, start, '&', "&")?;
                tokens.push(spanned(Token::AndAnd, start));
            }
            '|' => {
                pos = expect_double(bytes, start, '|', "|")?;
                tokens.push(spanned(Token::OrOr, start));
            }
            '<' => {
                if bytes.get(start + 1) == Some(&b'=') {
                    tokens.push(spanned(Token::Le, start));
                    pos = start + 2;
                } else {
                    tokens.push(spanned(Token::Lt, start));
                    pos = start + 1;
                }
            }
            '>' => {
                if bytes.get(start + 1) == Some(&b'=') {
                    tokens.push(spanned(Token::Ge, start));
                    pos = start + 2;
                } else {
                    tokens.push(spanned(Token::Gt, start));
                    pos = start + 1;
                }
            }
            '0'..='9' => {
                let (token, next) = lex_number(bytes, start);
                tokens.push(spanned(token, start));
                pos = next;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let (token, next) = lex_ident(bytes, start);
                tokens.push(spanned(token, start));
                pos = next;
            }
            _ => {
                // Decode properly so a multi-byte character is reported whole.
                let character = text[start..].chars().next().unwrap_or('\u{fffd}');
                return Err(RuleSyntaxError::UnexpectedCharacter {
                    character,
                    position: start,
                });
            }
        }
    }

    Ok(tokens)
}

fn spanned(token: Token, position: usize) -> SpannedToken {
    SpannedToken { token, position }
}

/// Requires the character at `start` to be doubled, e.g. `&&` for `&`
fn expect_double(
    bytes: &[u8],
    start: usize,
    second: char,
    shown: &str,
) -> Result<usize, RuleSyntaxError> {
    if bytes.get(start + 1) == Some(&(second as u8)) {
        Ok(start + 2)
    } else {
        Err(RuleSyntaxError::UnknownOperator {
            operator: shown.to_string(),
            position: start,
        })
    }
}

/// Lexes a double-quoted string starting at the opening quote
///
/// Supports `\"`, `\\`, `\n`, and `\t` escapes; any other escaped character
/// is taken literally.
fn lex_string(text: &str, start: usize) -> Result<(String, usize), RuleSyntaxError> {
    let mut literal = String::new();
    let mut chars = text[start + 1..].char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            '"' => return Ok((literal, start + 1 + offset + 1)),
            '\\' => {
                let (_, escaped) = chars
                    .next()
                    .ok_or(RuleSyntaxError::UnterminatedString { position: start })?;
                literal.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                });
            }
            other => literal.push(other),
        }
    }

    Err(RuleSyntaxError::UnterminatedString { position: start })
}

/// Lexes an integer or float numeral; the two are distinct token kinds
fn lex_number(bytes: &[u8], start: usize) -> (Token, usize) {
    let mut pos = start;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }

    // A dot only makes this a float when digits follow; `$x.steps[1].y`
    // style paths never reach here, but `1.foo` must not eat the dot.
    let is_float = bytes.get(pos) == Some(&b'.')
        && bytes.get(pos + 1).is_some_and(|b| b.is_ascii_digit());

    if is_float {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let text = std::str::from_utf8(&bytes[start..pos]).unwrap_or("0.0");
        (Token::Float(text.parse().unwrap_or(0.0)), pos)
    } else {
        let text = std::str::from_utf8(&bytes[start..pos]).unwrap_or("0");
        (Token::Int(text.parse().unwrap_or(0)), pos)
    }
}

/// Lexes an identifier or keyword (`true`, `false`, `nil`)
fn lex_ident(bytes: &[u8], start: usize) -> (Token, usize) {
    let mut pos = start;
    while pos < bytes.len() {
        let c = bytes[pos] as char;
        if c.is_ascii_alphanumeric() || c == '_' {
            pos += 1;
        } else {
            break;
        }
    }

    let text = std::str::from_utf8(&bytes[start..pos]).unwrap_or_default();
    let token = match text {
        "true" => Token::True,
        "false" => Token::False,
        "nil" => Token::Nil,
        name => Token::Ident(name.to_string()),
    };
    (token, pos)
}
