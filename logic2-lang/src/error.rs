/*!

Error types for the parser and ruleset builder.

*/

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
  #[error("syntax error: {0}")]
  Syntax(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidRule {
  #[error("could not parse rule text: {0}")]
  Parse(#[from] ParseError),
}
