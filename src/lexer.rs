//! Python-compatible scanner.
//!
//! Every byte of the input is covered by exactly one [`Token`], so the source
//! can be rebuilt from the token stream. String literals (prefixed, triple
//! quoted, and interpolated) and comments are single opaque spans.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Position, SourceSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    StringLiteral,
    Comment,
    Number,
    Operator,
    Newline,
    Whitespace,
    EndMarker,
    Other,
}

impl TokenKind {
    /// Layout tokens carry no meaning of their own.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Newline | TokenKind::EndMarker
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: SourceSpan,
    pub start: Position,
    pub end: Position,
}

const OPERATORS_3: [&str; 5] = ["**=", "//=", ">>=", "<<=", "..."];

const OPERATORS_2: [&str; 19] = [
    "**", "//", ">>", "<<", "<=", ">=", "==", "!=", "->", ":=", "+=", "-=", "*=", "/=", "%=",
    "&=", "|=", "^=", "@=",
];

const OPERATORS_1: &str = "+-*/%@&|^~<>()[]{},:;.=!";

/// Scans `source` into a complete token stream ending in an end marker.
pub fn scan(source: &str) -> Result<Vec<Token<'_>>, Diagnostic> {
    Lexer::new(source).tokenize()
}

/// Where a string literal began, for error reporting.
#[derive(Clone, Copy)]
struct LiteralOrigin {
    offset: usize,
    position: Position,
}

pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    brackets: Vec<(char, usize, Position)>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 0,
            brackets: Vec::new(),
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        match ch {
            '\n' => {
                self.line += 1;
                self.column = 0;
            }
            // A lone carriage return ends a line; in `\r\n` the `\n` does.
            '\r' if self.peek() != Some('\n') => {
                self.line += 1;
                self.column = 0;
            }
            _ => self.column += 1,
        }
        Some(ch)
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn eat_while<F>(&mut self, mut predicate: F)
    where
        F: FnMut(char) -> bool,
    {
        while let Some(ch) = self.peek() {
            if !predicate(ch) {
                break;
            }
            self.bump();
        }
    }

    fn eat_newline(&mut self) {
        if self.peek() == Some('\r') {
            self.bump();
            if self.peek() == Some('\n') {
                self.bump();
            }
        } else if self.peek() == Some('\n') {
            self.bump();
        }
    }

    fn eat_identifier(&mut self) {
        self.eat_while(is_identifier_continue);
    }

    pub fn tokenize(mut self) -> Result<Vec<Token<'a>>, Diagnostic> {
        let mut tokens = Vec::new();
        loop {
            let start = self.pos;
            let start_position = self.position();
            let Some(ch) = self.peek() else {
                self.check_brackets_closed()?;
                tokens.push(Token {
                    kind: TokenKind::EndMarker,
                    text: "",
                    span: SourceSpan::new(start, start),
                    start: start_position,
                    end: start_position,
                });
                break;
            };

            let origin = LiteralOrigin {
                offset: start,
                position: start_position,
            };
            let kind = match ch {
                '\n' | '\r' => {
                    self.eat_newline();
                    TokenKind::Newline
                }
                ' ' | '\t' | '\x0c' => {
                    self.eat_while(|c| matches!(c, ' ' | '\t' | '\x0c'));
                    TokenKind::Whitespace
                }
                '\\' => {
                    self.bump();
                    if matches!(self.peek(), Some('\n' | '\r')) {
                        self.eat_newline();
                        TokenKind::Whitespace
                    } else {
                        TokenKind::Other
                    }
                }
                '#' => {
                    self.eat_while(|c| c != '\n' && c != '\r');
                    TokenKind::Comment
                }
                '"' | '\'' => {
                    self.quoted(false, origin)?;
                    TokenKind::StringLiteral
                }
                '0'..='9' => {
                    self.number();
                    TokenKind::Number
                }
                '.' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.number();
                    TokenKind::Number
                }
                c if is_identifier_start(c) => self.identifier_or_prefixed_string(origin)?,
                _ => self.operator(origin)?,
            };

            tokens.push(Token {
                kind,
                text: &self.source[start..self.pos],
                span: SourceSpan::new(start, self.pos),
                start: start_position,
                end: self.position(),
            });
        }
        Ok(tokens)
    }

    fn identifier_or_prefixed_string(
        &mut self,
        origin: LiteralOrigin,
    ) -> Result<TokenKind, Diagnostic> {
        self.eat_identifier();
        let word = &self.source[origin.offset..self.pos];
        if matches!(self.peek(), Some('"' | '\'')) {
            if let Some(interpolated) = string_prefix(word) {
                self.quoted(interpolated, origin)?;
                return Ok(TokenKind::StringLiteral);
            }
        }
        Ok(TokenKind::Identifier)
    }

    /// Consumes an opening quote (single or triple) and the literal body.
    fn quoted(&mut self, interpolated: bool, origin: LiteralOrigin) -> Result<(), Diagnostic> {
        let Some(quote) = self.bump() else {
            return Err(unterminated(origin, false));
        };
        let triple = self.peek() == Some(quote) && self.peek_nth(1) == Some(quote);
        if triple {
            self.bump_n(2);
        }
        self.string_body(quote, triple, interpolated, origin)
    }

    fn string_body(
        &mut self,
        quote: char,
        triple: bool,
        interpolated: bool,
        origin: LiteralOrigin,
    ) -> Result<(), Diagnostic> {
        loop {
            let Some(ch) = self.peek() else {
                return Err(unterminated(origin, triple));
            };
            match ch {
                '\\' => {
                    self.bump();
                    if self.bump().is_none() {
                        return Err(unterminated(origin, triple));
                    }
                }
                c if c == quote => {
                    if !triple {
                        self.bump();
                        return Ok(());
                    }
                    if self.peek_nth(1) == Some(quote) && self.peek_nth(2) == Some(quote) {
                        self.bump_n(3);
                        return Ok(());
                    }
                    self.bump();
                }
                '\n' | '\r' if !triple => return Err(unterminated(origin, triple)),
                '{' if interpolated => {
                    self.bump();
                    if self.peek() == Some('{') {
                        self.bump();
                    } else {
                        self.replacement_field(origin)?;
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Skips a `{...}` field of an interpolated string, opening brace already
    /// consumed. Nested literals and brackets are skipped whole so their quotes
    /// and braces cannot end the outer literal.
    fn replacement_field(&mut self, origin: LiteralOrigin) -> Result<(), Diagnostic> {
        let mut depth = 0usize;
        let mut in_format_spec = false;
        loop {
            let Some(ch) = self.peek() else {
                return Err(unterminated(origin, false));
            };
            match ch {
                '}' if depth == 0 => {
                    self.bump();
                    return Ok(());
                }
                '{' if in_format_spec => {
                    self.bump();
                    self.replacement_field(origin)?;
                }
                _ if in_format_spec => {
                    self.bump();
                }
                '"' | '\'' => {
                    let nested = LiteralOrigin {
                        offset: self.pos,
                        position: self.position(),
                    };
                    self.quoted(false, nested)?;
                }
                c if is_identifier_start(c) => {
                    let nested = LiteralOrigin {
                        offset: self.pos,
                        position: self.position(),
                    };
                    self.eat_identifier();
                    let word = &self.source[nested.offset..self.pos];
                    if matches!(self.peek(), Some('"' | '\'')) {
                        if let Some(interpolated) = string_prefix(word) {
                            self.quoted(interpolated, nested)?;
                        }
                    }
                }
                '(' | '[' | '{' => {
                    depth += 1;
                    self.bump();
                }
                ')' | ']' | '}' => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                }
                ':' if depth == 0 => {
                    in_format_spec = true;
                    self.bump();
                }
                '\\' => {
                    self.bump_n(2);
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn number(&mut self) {
        let first = self.bump();
        if first == Some('0') {
            if let Some(radix) = self.peek().and_then(radix_prefix) {
                // `0o` followed by no octal digit is `0` and a name, as in `0oder`.
                let digit_at = if self.peek_nth(1) == Some('_') { 2 } else { 1 };
                if self.peek_nth(digit_at).is_some_and(|c| c.is_digit(radix)) {
                    self.bump();
                    self.eat_while(|c| c.is_digit(radix) || c == '_');
                    return;
                }
            }
        }
        if first == Some('.') {
            self.eat_while(|c| c.is_ascii_digit() || c == '_');
        } else {
            self.eat_while(|c| c.is_ascii_digit() || c == '_');
            if self.peek() == Some('.') {
                self.bump();
                self.eat_while(|c| c.is_ascii_digit() || c == '_');
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_nth(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.bump_n(digit_at);
                self.eat_while(|c| c.is_ascii_digit() || c == '_');
            }
        }
        if matches!(self.peek(), Some('j' | 'J')) {
            self.bump();
        }
    }

    fn operator(&mut self, origin: LiteralOrigin) -> Result<TokenKind, Diagnostic> {
        let rest = self.rest();
        if let Some(op) = OPERATORS_3.iter().find(|op| rest.starts_with(**op)) {
            self.bump_n(op.len());
            return Ok(TokenKind::Operator);
        }
        if let Some(op) = OPERATORS_2.iter().find(|op| rest.starts_with(**op)) {
            self.bump_n(op.len());
            return Ok(TokenKind::Operator);
        }
        let Some(ch) = self.bump() else {
            return Ok(TokenKind::EndMarker);
        };
        if !OPERATORS_1.contains(ch) {
            return Ok(TokenKind::Other);
        }
        match ch {
            '(' | '[' | '{' => self.brackets.push((ch, origin.offset, origin.position)),
            ')' | ']' | '}' => self.close_bracket(ch, origin)?,
            _ => {}
        }
        Ok(TokenKind::Operator)
    }

    fn close_bracket(&mut self, closer: char, origin: LiteralOrigin) -> Result<(), Diagnostic> {
        let span = SourceSpan::new(origin.offset, origin.offset + 1);
        match self.brackets.pop() {
            Some((opener, _, _)) if matching_closer(opener) == closer => Ok(()),
            Some((opener, _, opened_at)) => Err(Diagnostic::new(
                DiagnosticKind::Scan,
                format!("closing '{closer}' does not match '{opener}'"),
            )
            .with_span(span)
            .with_position(origin.position)
            .with_note(format!("'{opener}' opened at {opened_at}"))),
            None => Err(
                Diagnostic::new(DiagnosticKind::Scan, format!("unmatched '{closer}'"))
                    .with_span(span)
                    .with_position(origin.position),
            ),
        }
    }

    fn check_brackets_closed(&self) -> Result<(), Diagnostic> {
        match self.brackets.last() {
            Some(&(opener, offset, position)) => Err(Diagnostic::new(
                DiagnosticKind::Scan,
                format!("'{opener}' was never closed (end of input in multi-line statement)"),
            )
            .with_span(SourceSpan::new(offset, offset + 1))
            .with_position(position)),
            None => Ok(()),
        }
    }
}

fn unterminated(origin: LiteralOrigin, triple: bool) -> Diagnostic {
    let message = if triple {
        "unterminated triple-quoted string literal"
    } else {
        "unterminated string literal"
    };
    Diagnostic::new(DiagnosticKind::Scan, message)
        .with_span(SourceSpan::new(origin.offset, origin.offset + 1))
        .with_position(origin.position)
}

fn matching_closer(opener: char) -> char {
    match opener {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn radix_prefix(ch: char) -> Option<u32> {
    match ch {
        'x' | 'X' => Some(16),
        'o' | 'O' => Some(8),
        'b' | 'B' => Some(2),
        _ => None,
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn is_identifier_continue(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

/// Returns whether `word` is a string prefix and, if so, whether it marks an
/// interpolated (`f` or `t`) literal.
fn string_prefix(word: &str) -> Option<bool> {
    let lower = word.to_ascii_lowercase();
    match lower.as_str() {
        "r" | "u" | "b" | "br" | "rb" => Some(false),
        "f" | "t" | "fr" | "rf" | "tr" | "rt" => Some(true),
        _ => None,
    }
}
