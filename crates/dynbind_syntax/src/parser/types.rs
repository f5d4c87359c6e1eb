/// Type expressions.
impl<'a> Parser<'a> {
    /// `IDENT ('<' type (',' type)* '>')? ('[' ']')* '?'?`
    fn type_expr(&mut self) -> Result<Spanned<TypeExpr>, DeclError> {
        let name = self.expect_ident("a type")?;
        let mut span = name.span;

        let mut args = Vec::new();
        if self.match_punct(PunctuationId::Lt) {
            loop {
                args.push(self.type_expr()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            span = span.merge(self.expect_punct(PunctuationId::Gt, "to close type arguments")?);
        }
        let mut ty = Spanned::new(TypeExpr::Named(name.node, args), span);

        while self.match_punct(PunctuationId::LBracket) {
            let end = self.expect_punct(PunctuationId::RBracket, "in array type")?;
            let span = ty.span.merge(end);
            ty = Spanned::new(TypeExpr::Array(Box::new(ty)), span);
        }

        if self.match_punct(PunctuationId::Question) {
            let span = ty.span.merge(self.previous_span());
            ty = Spanned::new(TypeExpr::Optional(Box::new(ty)), span);
        }

        Ok(ty)
    }
}
