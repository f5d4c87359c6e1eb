/// Parse a token stream into a [`ContractFile`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `dynbind_syntax::lexer`.
///
/// ## Errors
/// Returns `Err(Vec<DeclError>)` if parsing fails.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<ContractFile, Vec<DeclError>> {
    Parser::new(tokens).parse()
}
