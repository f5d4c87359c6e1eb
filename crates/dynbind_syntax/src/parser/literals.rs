/// Default-value literals.
impl<'a> Parser<'a> {
    fn literal(&mut self) -> Result<Spanned<Literal>, DeclError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Keyword(KeywordId::Null) => {
                self.advance();
                Ok(Spanned::new(Literal::Null, token.span))
            }
            TokenKind::Keyword(KeywordId::True) => {
                self.advance();
                Ok(Spanned::new(Literal::Bool(true), token.span))
            }
            TokenKind::Keyword(KeywordId::False) => {
                self.advance();
                Ok(Spanned::new(Literal::Bool(false), token.span))
            }
            TokenKind::Int(i) => {
                self.advance();
                Ok(Spanned::new(Literal::Int(i), token.span))
            }
            TokenKind::Float(x) => {
                self.advance();
                Ok(Spanned::new(Literal::Float(x), token.span))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Spanned::new(Literal::Str(s), token.span))
            }
            TokenKind::Punctuation(PunctuationId::Minus) => self.negative_literal(),
            TokenKind::Punctuation(PunctuationId::LBracket) => self.list_literal(),
            TokenKind::Punctuation(PunctuationId::LBrace) => self.map_literal(),
            _ => Err(self.unexpected("a literal value")),
        }
    }

    fn negative_literal(&mut self) -> Result<Spanned<Literal>, DeclError> {
        let minus = self.advance().span;
        let token = self.peek().clone();
        let node = match token.kind {
            TokenKind::Int(i) => match i.checked_neg() {
                Some(negated) => Literal::Int(negated),
                None => {
                    return Err(DeclError::syntax(
                        format!("Integer literal '-({i})' is out of range"),
                        minus.merge(token.span),
                    ));
                }
            },
            TokenKind::Float(x) => Literal::Float(-x),
            _ => return Err(self.unexpected("a number after '-'")),
        };
        self.advance();
        Ok(Spanned::new(node, minus.merge(token.span)))
    }

    fn list_literal(&mut self) -> Result<Spanned<Literal>, DeclError> {
        let start = self.advance().span;
        let mut items = Vec::new();
        while !self.check_punct(PunctuationId::RBracket) {
            items.push(self.literal()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        let end = self.expect_punct(PunctuationId::RBracket, "to close the list")?;
        Ok(Spanned::new(Literal::List(items), start.merge(end)))
    }

    fn map_literal(&mut self) -> Result<Spanned<Literal>, DeclError> {
        let start = self.advance().span;
        let mut entries = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) {
            let key = self.map_key()?;
            self.expect_punct(PunctuationId::Colon, "after map key")?;
            let value = self.literal()?;
            entries.push((key, value));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        let end = self.expect_punct(PunctuationId::RBrace, "to close the map")?;
        Ok(Spanned::new(Literal::Map(entries), start.merge(end)))
    }

    /// Map keys may be bare identifiers (`{v1: 4}`) or strings (`{"odd key": 4}`).
    fn map_key(&mut self) -> Result<Spanned<String>, DeclError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Spanned::new(name, token.span))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Spanned::new(s, token.span))
            }
            _ => Err(self.unexpected("a map key")),
        }
    }
}
