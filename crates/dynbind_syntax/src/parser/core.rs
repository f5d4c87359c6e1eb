/// Parser core types and entrypoint.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.

/// Parser state.
///
/// ## Notes
/// - The parser is single-pass and recovers from errors by synchronizing at method/interface boundaries, so one
///   run reports every malformed method instead of stopping at the first.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<DeclError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `dynbind_syntax::lexer`, ending in `Eof`.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the entire token stream into a [`ContractFile`].
    ///
    /// ## Errors
    /// Returns every [`DeclError`] found; the parser continues after an error to report multiple issues in one pass.
    pub fn parse(mut self) -> Result<ContractFile, Vec<DeclError>> {
        let mut interfaces = Vec::new();

        while !self.is_at_end() {
            match self.interface() {
                Ok(decl) => interfaces.push(decl),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize_interface();
                }
            }
        }

        if self.errors.is_empty() {
            Ok(ContractFile { interfaces })
        } else {
            Err(self.errors)
        }
    }
}
