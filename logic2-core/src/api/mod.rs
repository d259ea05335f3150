/*!

Public term representation: the immutable, hash-consed `Term` tree, the `Interpretation` used by
the evaluator, and `Substitution`, a finite mapping from placeholders (or, in bidirectional mode,
logical variables) to replacement terms.

*/

pub mod term;
pub mod interpretation;
pub mod substitution;

pub use term::{Placeholder, Term, TermPtr};
pub use interpretation::Interpretation;
pub use substitution::Substitution;
