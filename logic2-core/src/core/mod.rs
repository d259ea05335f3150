/*!

Implementation machinery behind the `api` surface: error types, the display/pretty-printer, the
unification engine, the ruleset container, and the rewrite driver.

*/

pub mod error;
pub mod format;
pub mod ruleset;
pub mod simplify;
pub mod unify;

pub use error::CoreError;
