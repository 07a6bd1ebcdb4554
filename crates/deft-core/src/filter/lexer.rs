//! Lexer (tokenizer) for filter expressions.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use super::ast::ComparisonOperator;
use super::error::{FilterError, FilterResult};

/// A boolean connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalWord {
    /// `AND` or `&&`.
    And,
    /// `OR`.
    Or,
    /// `NOT`.
    Not,
}

impl fmt::Display for LogicalWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalWord::And => f.write_str("AND"),
            LogicalWord::Or => f.write_str("OR"),
            LogicalWord::Not => f.write_str("NOT"),
        }
    }
}

/// A token in a filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterToken {
    /// A column name, `[A-Za-z][A-Za-z0-9_]*`.
    Identifier(String),

    /// A comparison operator.
    Operator(ComparisonOperator),

    /// A bare literal: a word that is not an identifier, or anything
    /// following an operator.
    Value(String),

    /// A quoted string with its quotes stripped. Always bound as text.
    Quoted(String),

    /// `AND`, `OR`, `NOT` (any case) or `&&`.
    LogicalWord(LogicalWord),

    /// Opening parenthesis `(`.
    LeftParen,

    /// Closing parenthesis `)`.
    RightParen,
}

impl fmt::Display for FilterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterToken::Identifier(name) => write!(f, "identifier '{name}'"),
            FilterToken::Operator(op) => write!(f, "operator '{}'", op.symbol()),
            FilterToken::Value(value) | FilterToken::Quoted(value) => {
                write!(f, "value '{value}'")
            }
            FilterToken::LogicalWord(word) => write!(f, "'{word}'"),
            FilterToken::LeftParen => f.write_str("'('"),
            FilterToken::RightParen => f.write_str("')'"),
        }
    }
}

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    /// The token.
    pub token: FilterToken,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

/// Returns true if `c` may appear in an unquoted value.
fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'
}

/// Returns true if `word` is a valid column name.
pub(crate) fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Lexer for tokenizing filter expressions.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<Chars<'a>>,
    /// Current byte position in the input string.
    position: usize,
    /// Set right after an operator: the next word is always a value.
    expect_value: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
            expect_value: false,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Consumes and returns the next character, updating position.
    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            self.position += ch.len_utf8();
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn read_bare_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if !is_bare_char(c) {
                break;
            }
            word.push(c);
            self.next_char();
        }
        word
    }

    /// Reads a quoted string. No escape processing: the literal ends at the
    /// first matching quote character.
    fn read_quoted(&mut self, quote: char, start: usize) -> FilterResult<String> {
        self.next_char();
        let mut literal = String::new();
        loop {
            match self.next_char() {
                Some(c) if c == quote => return Ok(literal),
                Some(c) => literal.push(c),
                None => return Err(FilterError::lex(&self.input[start..], start)),
            }
        }
    }

    /// Reads an operator, longest match first.
    fn read_operator(&mut self, first: char, start: usize) -> FilterResult<ComparisonOperator> {
        self.next_char();
        let second = self.peek();
        let (op, consumed_second) = match (first, second) {
            ('!', Some('=')) => (ComparisonOperator::NotEq, true),
            ('!', Some('~')) => (ComparisonOperator::NotLike, true),
            ('>', Some('=')) => (ComparisonOperator::Ge, true),
            ('<', Some('=')) => (ComparisonOperator::Le, true),
            ('=', _) => (ComparisonOperator::Eq, false),
            ('~', _) => (ComparisonOperator::Like, false),
            ('>', _) => (ComparisonOperator::Gt, false),
            ('<', _) => (ComparisonOperator::Lt, false),
            _ => return Err(FilterError::lex(first.to_string(), start)),
        };
        if consumed_second {
            self.next_char();
        }
        Ok(op)
    }

    /// Returns the next token with its position, or None at end of input.
    pub fn next_token(&mut self) -> Option<FilterResult<PositionedToken>> {
        self.skip_whitespace();

        let c = self.peek()?;
        let start = self.position;
        let expect_value = std::mem::take(&mut self.expect_value);

        let token = match c {
            '\'' | '"' => self.read_quoted(c, start).map(FilterToken::Quoted),

            _ if expect_value && is_bare_char(c) => Ok(FilterToken::Value(self.read_bare_word())),

            '(' => {
                self.next_char();
                Ok(FilterToken::LeftParen)
            }
            ')' => {
                self.next_char();
                Ok(FilterToken::RightParen)
            }

            '!' | '=' | '~' | '>' | '<' => self.read_operator(c, start).map(|op| {
                self.expect_value = true;
                FilterToken::Operator(op)
            }),

            '&' => {
                self.next_char();
                if self.peek() == Some('&') {
                    self.next_char();
                    Ok(FilterToken::LogicalWord(LogicalWord::And))
                } else {
                    Err(FilterError::lex("&", start))
                }
            }

            _ if is_bare_char(c) => {
                let word = self.read_bare_word();
                let token = match word.to_ascii_uppercase().as_str() {
                    "AND" => FilterToken::LogicalWord(LogicalWord::And),
                    "OR" => FilterToken::LogicalWord(LogicalWord::Or),
                    "NOT" => FilterToken::LogicalWord(LogicalWord::Not),
                    _ if is_identifier(&word) => FilterToken::Identifier(word),
                    _ => FilterToken::Value(word),
                };
                Ok(token)
            }

            _ => Err(FilterError::lex(c.to_string(), start)),
        };

        Some(token.map(|token| PositionedToken {
            token,
            position: start,
        }))
    }

    /// Collects all tokens into a vector (without positions).
    #[cfg(test)]
    pub fn tokenize(self) -> FilterResult<Vec<FilterToken>> {
        Ok(self
            .tokenize_positioned()?
            .into_iter()
            .map(|pt| pt.token)
            .collect())
    }

    /// Collects all tokens, failing on the first unrecognized input.
    pub fn tokenize_positioned(mut self) -> FilterResult<Vec<PositionedToken>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token?);
        }
        Ok(tokens)
    }
}
