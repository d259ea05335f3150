/*!

Error types produced by the core engine: evaluation against an incomplete [`Interpretation`], and
substitution conflicts. Occurs-check failure and the rewrite driver's cycle guard are not errors
here — both are represented as "no result" (an empty unification, or the pre-cycle term returned
as-is) rather than a propagated `Err`, per spec.md §8's occurs-check and termination properties.

*/

use logic2_abs::IString;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
  /// A `Constant`, `Variable`, or `NamedPredicate` had no entry in the
  /// [`Interpretation`](crate::api::Interpretation) used to evaluate it.
  #[error("unbound name: {0}")]
  UnboundName(IString),

  /// Unification found the same pattern variable bound to two structurally distinct terms.
  #[error("conflicting binding for {0:?}")]
  ConflictingBinding(String),
}
