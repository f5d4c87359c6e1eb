//! Lexer for contract declarations
//!
//! Handles tokenization including:
//! - Keywords (`interface`, `default`, `true`, `false`, `null`)
//! - Identifiers and literals (integers, floats, double-quoted strings)
//! - Punctuation (`{ } ( ) [ ] < > , ; : = ? -` and `...`)
//! - Comments: `//` and `/* */` are skipped, `/** */` becomes a [`TokenKind::DocComment`]
//!
//! Whitespace and newlines are insignificant.

pub mod tokens;

pub use tokens::{KeywordId, PunctuationId, Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::DeclError;

/// Lexer for contract declaration source.
///
/// Converts source text into a stream of tokens. Errors are collected so one pass reports every bad character or
/// unterminated literal; the token stream always ends with an `Eof` token.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    tokens: Vec<Token>,
    errors: Vec<DeclError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    ///
    /// Returns a vector of tokens on success, or a vector of errors on failure.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<DeclError>> {
        while !self.is_at_end() {
            self.scan_token();
        }

        self.tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(self.current_pos, self.current_pos),
        ));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, Span::new(start, self.current_pos)));
    }

    fn add_punct(&mut self, id: PunctuationId, start: usize) {
        self.add_token(TokenKind::Punctuation(id), start);
    }

    fn error(&mut self, message: impl Into<String>, start: usize) {
        self.errors
            .push(DeclError::syntax(message, Span::new(start, self.current_pos.max(start + 1))));
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.current_pos;

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            ' ' | '\t' | '\r' | '\n' => {}
            '/' => self.scan_slash(start),
            '{' => self.add_punct(PunctuationId::LBrace, start),
            '}' => self.add_punct(PunctuationId::RBrace, start),
            '(' => self.add_punct(PunctuationId::LParen, start),
            ')' => self.add_punct(PunctuationId::RParen, start),
            '[' => self.add_punct(PunctuationId::LBracket, start),
            ']' => self.add_punct(PunctuationId::RBracket, start),
            '<' => self.add_punct(PunctuationId::Lt, start),
            '>' => self.add_punct(PunctuationId::Gt, start),
            ',' => self.add_punct(PunctuationId::Comma, start),
            ';' => self.add_punct(PunctuationId::Semicolon, start),
            ':' => self.add_punct(PunctuationId::Colon, start),
            '=' => self.add_punct(PunctuationId::Eq, start),
            '?' => self.add_punct(PunctuationId::Question, start),
            // A sign directly before a digit is part of the literal, so `-9223372036854775808` fits an `i64`.
            '-' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.scan_number(start),
            '-' => self.add_punct(PunctuationId::Minus, start),
            '.' => {
                if self.match_char('.') && self.match_char('.') {
                    self.add_punct(PunctuationId::Ellipsis, start);
                } else {
                    self.error("Unexpected '.'; variadic parameters use '...'", start);
                }
            }
            '"' => self.scan_string(start),
            c if c.is_ascii_digit() => self.scan_number(start),
            c if c.is_alphabetic() || c == '_' || c == '$' => self.scan_ident(start),
            other => self.error(format!("Unexpected character '{other}'"), start),
        }
    }

    /// `/` starts a line comment, a block comment, or a doc comment.
    fn scan_slash(&mut self, start: usize) {
        if self.match_char('/') {
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                self.advance();
            }
            return;
        }
        if !self.match_char('*') {
            self.error("Unexpected character '/'", start);
            return;
        }

        // `/**/` is an empty block comment, not a doc comment.
        let is_doc = self.peek() == Some('*') && self.peek_next() != Some('/');
        if is_doc {
            self.advance();
        }
        let body_start = self.current_pos;
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    let body_end = self.current_pos - 1;
                    self.advance();
                    if is_doc {
                        let text = clean_doc(&self.source[body_start..body_end]);
                        self.add_token(TokenKind::DocComment(text), start);
                    }
                    return;
                }
                Some(_) => {}
                None => {
                    self.error("Unterminated block comment", start);
                    return;
                }
            }
        }
    }

    fn scan_string(&mut self, start: usize) {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('0') => value.push('\0'),
                    Some('"') => value.push('"'),
                    Some('\'') => value.push('\''),
                    Some('\\') => value.push('\\'),
                    Some('u') => match self.scan_unicode_escape() {
                        Some(c) => value.push(c),
                        None => self.error("Invalid \\u escape; expected four hex digits", start),
                    },
                    Some(other) => self.error(format!("Unknown escape '\\{other}'"), start),
                    None => {
                        self.error("Unterminated string literal", start);
                        return;
                    }
                },
                Some('\n') | None => {
                    self.error("Unterminated string literal", start);
                    return;
                }
                Some(c) => value.push(c),
            }
        }
        self.add_token(TokenKind::String(value), start);
    }

    fn scan_unicode_escape(&mut self) -> Option<char> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self.peek().and_then(|c| c.to_digit(16))?;
            self.advance();
            code = code * 16 + digit;
        }
        char::from_u32(code)
    }

    fn scan_number(&mut self, start: usize) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let mut is_float = false;
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.error("Malformed exponent in number literal", start);
                return;
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = &self.source[start..self.current_pos];
        if is_float {
            match text.parse::<f64>() {
                Ok(x) if x.is_finite() => self.add_token(TokenKind::Float(x), start),
                Ok(_) => self.error(format!("Float literal '{text}' is out of range"), start),
                Err(_) => self.error(format!("Invalid float literal '{text}'"), start),
            }
        } else {
            match text.parse::<i64>() {
                Ok(i) => self.add_token(TokenKind::Int(i), start),
                Err(_) => self.error(format!("Integer literal '{text}' is out of range"), start),
            }
        }
    }

    fn scan_ident(&mut self, start: usize) {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.advance();
        }
        let text = &self.source[start..self.current_pos];
        let kind = match keyword_id(text) {
            Some(id) => TokenKind::Keyword(id),
            None => TokenKind::Ident(text.to_string()),
        };
        self.add_token(kind, start);
    }
}

/// Strip `*` gutters and surrounding blank lines from a doc comment body.
fn clean_doc(body: &str) -> String {
    body.lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end()
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Tokenize contract declaration source.
///
/// ## Errors
/// Returns every lexing error found in the source.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<DeclError>> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_method_declaration() {
        assert_eq!(
            kinds("int varArgs(int... values);"),
            vec![
                TokenKind::Ident("int".into()),
                TokenKind::Ident("varArgs".into()),
                TokenKind::Punctuation(PunctuationId::LParen),
                TokenKind::Ident("int".into()),
                TokenKind::Punctuation(PunctuationId::Ellipsis),
                TokenKind::Ident("values".into()),
                TokenKind::Punctuation(PunctuationId::RParen),
                TokenKind::Punctuation(PunctuationId::Semicolon),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds(r#"42 2.5 1e3 "a\"bA" true null"#),
            vec![
                TokenKind::Int(42),
                TokenKind::Float(2.5),
                TokenKind::Float(1000.0),
                TokenKind::String("a\"bA".into()),
                TokenKind::Keyword(KeywordId::True),
                TokenKind::Keyword(KeywordId::Null),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped_and_docs_kept() {
        let source = "// line\n/* block */ /**\n * Says hello.\n *   indented\n */ x /**/";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::DocComment("Says hello.\n  indented".into()),
                TokenKind::Ident("x".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_errors_are_collected() {
        let errs = lex("int a(); # \"open").unwrap_err();
        assert_eq!(errs.len(), 2);
        assert!(errs[0].message.contains("Unexpected character '#'"));
        assert!(errs[1].message.contains("Unterminated string"));
    }

    #[test]
    fn test_single_dot_is_rejected() {
        let errs = lex("int.. x").unwrap_err();
        assert!(errs[0].message.contains("'...'"));
    }

    #[test]
    fn test_integer_overflow_is_reported() {
        let errs = lex("99999999999999999999").unwrap_err();
        assert!(errs[0].message.contains("out of range"));
        let errs = lex("9223372036854775808").unwrap_err();
        assert!(errs[0].message.contains("out of range"));
        let errs = lex("-1e400").unwrap_err();
        assert!(errs[0].message.contains("Float literal '-1e400' is out of range"));
    }

    #[test]
    fn test_signed_literals() {
        assert_eq!(
            kinds("-9223372036854775808 -2.5e1 - 3"),
            vec![
                TokenKind::Int(i64::MIN),
                TokenKind::Float(-25.0),
                TokenKind::Punctuation(PunctuationId::Minus),
                TokenKind::Int(3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(
            kinds(r#""\u001b[0m\u00e9\0""#),
            vec![TokenKind::String("\u{1b}[0m\u{e9}\0".into()), TokenKind::Eof]
        );
        let errs = lex(r#""\u12""#).unwrap_err();
        assert!(errs[0].message.contains("four hex digits"));
    }

    #[test]
    fn test_doc_gutters_and_single_line_docs() {
        assert_eq!(
            kinds("/** * starred */ /**\n * * bullet\n *\n * next\n */"),
            vec![
                TokenKind::DocComment("starred".into()),
                TokenKind::DocComment("* bullet\n\nnext".into()),
                TokenKind::Eof,
            ]
        );
    }
}
