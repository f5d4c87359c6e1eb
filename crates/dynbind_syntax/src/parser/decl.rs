/// Interface and method declarations.
impl<'a> Parser<'a> {
    /// `DOC? 'interface' IDENT '{' method* '}'`
    ///
    /// Method-level errors are recorded and recovered from here, so a single bad method does not hide the rest of
    /// the interface.
    fn interface(&mut self) -> Result<Spanned<InterfaceDecl>, DeclError> {
        let doc = self.doc_comment();
        if self.is_at_end() {
            // Trailing doc comment with nothing after it.
            return Err(DeclError::syntax("Doc comment is not followed by a declaration", self.previous_span()));
        }
        let start = self.expect_keyword(KeywordId::Interface, "to start a declaration")?;
        let name = self.expect_ident("interface name")?;
        self.expect_punct(PunctuationId::LBrace, "after interface name")?;

        let mut methods = Vec::new();
        loop {
            let doc = self.doc_comment();
            if self.check_punct(PunctuationId::RBrace) {
                break;
            }
            if self.is_at_end() {
                return Err(DeclError::syntax(
                    format!("Unclosed interface '{}'", name.node),
                    start.merge(name.span),
                )
                .with_hint("Add a closing '}'"));
            }
            match self.method(doc) {
                Ok(method) => methods.push(method),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize_method();
                }
            }
        }
        let end = self.expect_punct(PunctuationId::RBrace, "to close the interface")?;
        // Tolerate a stray `;` after the closing brace.
        self.match_punct(PunctuationId::Semicolon);

        Ok(Spanned::new(
            InterfaceDecl { name, doc, methods },
            start.merge(end),
        ))
    }

    /// `'default'? type IDENT '(' params? ')' ('=' literal)? ';'`
    fn method(&mut self, doc: Option<String>) -> Result<Spanned<MethodDecl>, DeclError> {
        let start = self.peek().span;
        let is_default = self.match_keyword(KeywordId::Default);
        let return_type = self.type_expr()?;
        let name = self.expect_ident("method name")?;
        self.expect_punct(PunctuationId::LParen, "after method name")?;

        let mut params = Vec::new();
        if !self.check_punct(PunctuationId::RParen) {
            loop {
                params.push(self.param()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }
        self.expect_punct(PunctuationId::RParen, "to close the parameter list")?;

        let default_value = if self.check_punct(PunctuationId::Eq) {
            let eq = self.advance().span;
            if !is_default {
                return Err(DeclError::syntax(
                    format!("Method '{}' has a value but is not declared 'default'", name.node),
                    eq,
                )
                .with_hint(format!("Write 'default {} {}(...) = ...;'", return_type.node, name.node)));
            }
            Some(self.literal()?)
        } else {
            None
        };

        let end = self.expect_punct(PunctuationId::Semicolon, "after method declaration")?;

        Ok(Spanned::new(
            MethodDecl {
                doc,
                is_default,
                return_type,
                name,
                params,
                default_value,
            },
            start.merge(end),
        ))
    }

    /// `type '...'? IDENT`
    fn param(&mut self) -> Result<Spanned<Param>, DeclError> {
        let ty = self.type_expr()?;
        let variadic = self.match_punct(PunctuationId::Ellipsis);
        let name = self.expect_ident("parameter name")?;
        let span = ty.span.merge(name.span);
        Ok(Spanned::new(Param { ty, name, variadic }, span))
    }
}
