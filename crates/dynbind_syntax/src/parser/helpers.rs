/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords and punctuation
/// - Error recovery (`synchronize_method`, `synchronize_interface`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    ///
    /// ## Notes
    /// - An empty slice behaves like a lone `Eof`; the lexer never produces one, but hand-built streams might.
    fn peek(&self) -> &Token {
        static EOF: Token = Token {
            kind: TokenKind::Eof,
            span: Span { start: 0, end: 0 },
        };
        self.tokens.get(self.pos).or(self.tokens.last()).unwrap_or(&EOF)
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Span of the most recently consumed token.
    fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(self.peek().span, |t| t.span)
    }

    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, context: &str) -> Result<Span, DeclError> {
        if self.check_punct(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(&format!("'{}' {context}", id.as_str())))
        }
    }

    fn expect_keyword(&mut self, id: KeywordId, context: &str) -> Result<Span, DeclError> {
        if self.check_keyword(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(&format!("'{}' {context}", id.as_str())))
        }
    }

    /// Consume an identifier.
    fn expect_ident(&mut self, what: &str) -> Result<Spanned<Ident>, DeclError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Ok(Spanned::new(name, span))
            }
            TokenKind::Keyword(k) => {
                let err = DeclError::syntax(
                    format!("Expected {what}, found reserved word '{}'", k.as_str()),
                    self.peek().span,
                )
                .with_hint("Reserved words cannot be used as names");
                Err(err)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    /// Take a pending doc comment, if the current token is one.
    fn doc_comment(&mut self) -> Option<String> {
        let mut doc = None;
        while let TokenKind::DocComment(text) = &self.peek().kind {
            // The comment nearest the declaration wins.
            doc = Some(text.clone());
            self.advance();
        }
        doc
    }

    /// Build an "Expected X, found Y" error at the current token.
    fn unexpected(&self, expected: &str) -> DeclError {
        let token = self.peek();
        DeclError::syntax(
            format!("Expected {expected}, found {}", token.kind.describe()),
            token.span,
        )
    }

    // ========================================================================
    // Error recovery
    // ========================================================================

    /// Skip to just past the next `;`, or up to a `}` that closes the interface.
    fn synchronize_method(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            match &self.peek().kind {
                TokenKind::Punctuation(PunctuationId::Semicolon) if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::Punctuation(PunctuationId::LBrace | PunctuationId::LBracket) => depth += 1,
                TokenKind::Punctuation(PunctuationId::RBracket) => depth = depth.saturating_sub(1),
                TokenKind::Punctuation(PunctuationId::RBrace) => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip to the next `interface` keyword.
    fn synchronize_interface(&mut self) {
        self.advance();
        while !self.is_at_end() && !self.check_keyword(KeywordId::Interface) {
            self.advance();
        }
    }
}
