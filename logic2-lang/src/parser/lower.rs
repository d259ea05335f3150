/*!

Glue between the generated LALRPOP actions and `logic2-core`'s term constructors. Kept separate
from the `.lalrpop` grammar file itself so it can be unit-tested without going through the parser.

*/

use logic2_core::api::term::{and, false_term, or, placeholder, rest_placeholder, true_term, variable, constant, Placeholder, TermPtr};

/// Folds the `(member, was_marked_subset)` pairs an `AndList`/`OrList` production collects into a
/// single variadic term. The connective is `Subset`-marked if *any* occurrence of `&*`/`|*`
/// contributed a member — see the grammar-level note on why this is a simplification of the
/// original per-occurrence marker.
pub(crate) fn build_and(members: Vec<(TermPtr, bool)>) -> TermPtr {
  build_variadic(members, false)
}

pub(crate) fn build_or(members: Vec<(TermPtr, bool)>) -> TermPtr {
  build_variadic(members, true)
}

fn build_variadic(members: Vec<(TermPtr, bool)>, is_or: bool) -> TermPtr {
  let subset = members.iter().any(|(_, marked)| *marked);
  let terms: Vec<TermPtr> = members.into_iter().map(|(t, _)| t).collect();
  let ph = if subset { Placeholder::Subset } else { Placeholder::None };
  if is_or { or(terms, ph) } else { and(terms, ph) }
}

/// Classifies a bare identifier token: `TRUE`/`FALSE` literals, `$name#` rest placeholders,
/// `$name` placeholders, an uppercase-leading `Variable`, or else a `Constant` — exactly the
/// classification `original_source/parse.py`'s `read_term` performs.
pub(crate) fn lower_name(name: &str) -> TermPtr {
  match name {
    "TRUE" => return true_term(),
    "FALSE" => return false_term(),
    _ => {}
  }

  if let Some(stripped) = name.strip_prefix('$') {
    return if let Some(rest) = stripped.strip_suffix('#') {
      rest_placeholder(rest)
    } else {
      placeholder(stripped)
    };
  }

  match name.chars().next() {
    Some(c) if c.is_uppercase() => variable(name),
    _ => constant(name),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn classifies_literals() {
    assert_eq!(lower_name("TRUE"), true_term());
    assert_eq!(lower_name("FALSE"), false_term());
  }

  #[test]
  fn classifies_placeholders() {
    assert_eq!(lower_name("$X"), placeholder("X"));
    assert_eq!(lower_name("$Y#"), rest_placeholder("Y"));
  }

  #[test]
  fn classifies_by_case() {
    assert_eq!(lower_name("X"), variable("X"));
    assert_eq!(lower_name("p"), constant("p"));
  }

  #[test]
  fn build_and_marks_subset_from_any_occurrence() {
    let t = build_and(vec![(constant("a"), false), (constant("b"), true)]);
    let rendered = logic2_core::core::format::display(&t);
    assert!(rendered.ends_with('*'));
  }
}
