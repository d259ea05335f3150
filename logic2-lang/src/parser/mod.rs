/*!

Parser for the textual rule/term syntax: a LALRPOP grammar (`grammar.lalrpop`) plus a small
lowering module (`lower`) that turns recognized tokens directly into `logic2-core` `TermPtr`s. No
intermediate AST: unlike a module language with declarations to uniqueness-check before symbols
exist, every name here resolves to a term constructor immediately, so there's nothing a separate
AST stage would buy us.

*/

#[allow(clippy::all)]
mod grammar;
pub(crate) mod lower;

use logic2_core::api::term::TermPtr;
use tracing::{trace, warn};

use crate::error::ParseError;

/// Parses `input` as a single term (which may itself be an `Imp`/`Equ` rule expression; the
/// ruleset builder is what interprets the top-level connective as a rule shape).
pub fn parse_term(input: &str) -> Result<TermPtr, ParseError> {
  trace!(input, "parsing term");
  grammar::ExprParser::new().parse(input).map_err(|e| {
    let message = e.to_string();
    warn!(input, error = %message, "parse failed");
    ParseError::Syntax(message)
  })
}
