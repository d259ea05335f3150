/*!

Renders a [`TermPtr`] back into the concrete syntax the parser accepts. Used for `Debug` on
`TermPtr`, and reused by `logic2-lang`'s truth-table and ruleset printers so the round trip
`parse(display(t)) == t` holds for any term the parser itself could have produced. (A variadic
connective built programmatically with a single `Subset`-marked member has no parseable spelling —
`grammar.lalrpop`'s `AndList`/`OrList` only attach the `*` marker to a separator between at least
two members — so that one hand-built shape is the one case this doesn't round-trip; nothing the
parser emits falls into it.)

*/

use crate::api::term::{Placeholder, Term, TermPtr};

/// Renders `term` into a `String`. Parenthesization follows `grammar.lalrpop`'s precedence chain
/// (`Equ > Imp > Or > And > Not > Atom`) exactly: each operand is wrapped in parens only when its
/// own shape isn't already reachable from the non-terminal the grammar expects in that slot.
pub fn display(term: &TermPtr) -> String {
  let mut out = String::new();
  write_term(&mut out, term);
  out
}

fn is_atom(term: &TermPtr) -> bool {
  matches!(
    term.as_ref(),
    Term::True | Term::False | Term::Constant(_) | Term::Variable(_) | Term::NamedPredicate(..)
  )
}

fn write_term(out: &mut String, term: &TermPtr) {
  match term.as_ref() {
    Term::True => out.push_str("TRUE"),
    Term::False => out.push_str("FALSE"),
    Term::Constant(name) => out.push_str(name),
    Term::Variable(name) => out.push_str(name),

    Term::NamedPredicate(name, args) => {
      out.push_str(name);
      out.push('(');
      for (i, arg) in args.iter().enumerate() {
        if i > 0 {
          out.push_str(", ");
        }
        write_term(out, arg);
      }
      out.push(')');
    }

    Term::Not(inner) => {
      out.push('!');
      // NotExpr only accepts another NotExpr or an Atom, so anything else needs parens.
      if is_atom(inner) || matches!(inner.as_ref(), Term::Not(_)) {
        write_term(out, inner);
      } else {
        out.push('(');
        write_term(out, inner);
        out.push(')');
      }
    }

    Term::Imp(lhs, rhs) => {
      write_binary_operand(out, lhs);
      out.push_str(" -> ");
      write_binary_operand(out, rhs);
    }

    Term::Equ(lhs, rhs) => {
      write_binary_operand(out, lhs);
      out.push_str(" <-> ");
      write_binary_operand(out, rhs);
    }

    Term::And(members, placeholder) => write_variadic(out, members, false, *placeholder),
    Term::Or(members, placeholder) => write_variadic(out, members, true, *placeholder),
  }
}

/// An `Imp`/`Equ` operand: `OrExpr` already reaches down through `And`/`Not`/`Atom`, so only a
/// nested `Imp`/`Equ` (which `OrExpr` can't reach) needs parens.
fn write_binary_operand(out: &mut String, term: &TermPtr) {
  if matches!(term.as_ref(), Term::Imp(..) | Term::Equ(..)) {
    out.push('(');
    write_term(out, term);
    out.push(')');
  } else {
    write_term(out, term);
  }
}

/// Renders a variadic connective as the infix chain the grammar's `AndList`/`OrList` productions
/// build: `m0 <op> m1 <op> m2 ...`, parenthesizing a member whenever its shape sits outside the
/// non-terminal that production slot accepts (`NotExpr` for `&`'s right operand, `AndExpr` for
/// `|`'s). The `Subset` marker is carried on every separator rather than just one, since
/// `lower.rs::build_variadic` sets the flag the moment *any* occurrence is marked.
fn write_variadic(out: &mut String, members: &[TermPtr], is_or: bool, placeholder: Placeholder) {
  let op = match (is_or, placeholder) {
    (false, Placeholder::None) => "&",
    (false, Placeholder::Subset) => "&*",
    (true, Placeholder::None) => "|",
    (true, Placeholder::Subset) => "|*",
  };
  for (i, member) in members.iter().enumerate() {
    if i > 0 {
      out.push(' ');
      out.push_str(op);
      out.push(' ');
    }
    write_variadic_member(out, member, is_or);
  }
}

fn write_variadic_member(out: &mut String, term: &TermPtr, is_or: bool) {
  let reachable = if is_or {
    // OrList's members are AndExpr: And, Not, and Atom all parse there unparenthesized.
    is_atom(term) || matches!(term.as_ref(), Term::Not(_) | Term::And(..))
  } else {
    // AndList's members are NotExpr: only Not and Atom parse there unparenthesized.
    is_atom(term) || matches!(term.as_ref(), Term::Not(_))
  };
  if reachable {
    write_term(out, term);
  } else {
    out.push('(');
    write_term(out, term);
    out.push(')');
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::term::{and, constant, equ, imp, named_predicate, not, or, variable, Placeholder};

  #[test]
  fn renders_named_predicate() {
    let t = named_predicate("f", vec![constant("a"), constant("b")]);
    assert_eq!(display(&t), "f(a, b)");
  }

  #[test]
  fn parenthesizes_nested_implication() {
    let t = imp(not(constant("p")), constant("q"));
    assert_eq!(display(&t), "!p -> q");
  }

  #[test]
  fn renders_variadic_with_subset_marker() {
    // `And`/`Or` members are canonically ordered by intern pointer identity, not insertion
    // order, so only the separator (not member order) is asserted here.
    let t = or(vec![constant("a"), constant("b")], Placeholder::Subset);
    let rendered = display(&t);
    assert!(rendered.contains("|*"));
    assert!(rendered.contains('a') && rendered.contains('b'));
  }

  #[test]
  fn equivalence_is_infix() {
    let t = equ(variable("x"), variable("y"));
    assert_eq!(display(&t), "x <-> y");
  }

  #[test]
  fn parenthesizes_imp_operand_of_imp() {
    let t = imp(imp(constant("a"), constant("b")), constant("c"));
    assert_eq!(display(&t), "(a -> b) -> c");
  }

  #[test]
  fn and_member_of_or_needs_no_parens() {
    let t = or(
      vec![and(vec![constant("a"), constant("b")], Placeholder::None), constant("c")],
      Placeholder::None,
    );
    let rendered = display(&t);
    assert!(rendered.contains('|'));
    assert!(!rendered.contains('('));
  }

  #[test]
  fn or_member_of_and_needs_parens() {
    let t = and(
      vec![or(vec![constant("a"), constant("b")], Placeholder::None), constant("c")],
      Placeholder::None,
    );
    let rendered = display(&t);
    assert!(rendered.contains("(a | b)") || rendered.contains("(b | a)"));
    assert!(rendered.contains('&'));
  }
}
