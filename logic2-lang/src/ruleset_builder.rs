/*!

Builds a [`Ruleset`] from rule *strings*. Grounded directly on `original_source/rules.py`'s
`Ruleset.add`: each string is parsed, its top-level connective classifies the rule shape, and a
variadic subset-marked left-hand side additionally gets a framed variant (both sides wrapped in a
fresh rest placeholder) so the rule still fires when the pattern is embedded in a larger
conjunction/disjunction rather than being the entire subject.

*/

use logic2_core::{
  api::term::{and, false_term, or, true_term, Placeholder, Term, TermPtr},
  core::ruleset::Ruleset,
};
use tracing::debug;

use crate::{error::InvalidRule, parser::parse_term};

/// A counter-backed source of fresh rest-placeholder names for framing, so repeated calls never
/// collide with a name the caller's own rules use.
struct FreshNames {
  next: usize,
}

impl FreshNames {
  fn new() -> Self {
    Self { next: 0 }
  }

  fn next_rest(&mut self) -> TermPtr {
    let name = format!("@frame{}", self.next);
    self.next += 1;
    logic2_core::api::term::rest_placeholder(name)
  }
}

/// Parses and inserts `text` into `rules`, returning the updated ruleset. Mirrors `Ruleset.add`'s
/// fluent, copy-on-write style, but mutates in place since our `Ruleset` isn't `frozen` the way the
/// Python dataclass association is.
pub fn add_rule(rules: &mut Ruleset, text: &str) -> Result<(), InvalidRule> {
  let term = parse_term(text)?;
  add_rule_term(rules, &term);
  Ok(())
}

pub fn add_rules<'a>(rules: &mut Ruleset, texts: impl IntoIterator<Item = &'a str>) -> Result<(), InvalidRule> {
  for text in texts {
    add_rule(rules, text)?;
  }
  Ok(())
}

fn add_rule_term(rules: &mut Ruleset, term: &TermPtr) {
  match term.as_ref() {
    Term::Imp(lhs, rhs) => {
      insert_with_frame(rules, lhs, rhs);
    }
    Term::Equ(lhs, rhs) => {
      insert_with_frame(rules, lhs, rhs);
      insert_with_frame(rules, rhs, lhs);
    }
    Term::Not(inner) => {
      rules.insert(inner.clone(), false_term());
    }
    _ => {
      rules.insert(term.clone(), true_term());
    }
  }
}

/// Inserts `lhs -> rhs` directly, and — when `lhs` is a subset-marked variadic connective —
/// additionally inserts the framed variant `{lhs, $frame#} -> {rhs, $frame#}` so the rule can fire
/// when `lhs`'s members are only part of a larger conjunction/disjunction.
fn insert_with_frame(rules: &mut Ruleset, lhs: &TermPtr, rhs: &TermPtr) {
  debug!(
    pattern = %logic2_core::core::format::display(lhs),
    replacement = %logic2_core::core::format::display(rhs),
    "installing rule"
  );
  rules.insert(lhs.clone(), rhs.clone());

  if let Term::And(members, Placeholder::Subset) = lhs.as_ref() {
    let mut fresh = FreshNames::new();
    let frame = fresh.next_rest();
    let mut framed_members = members.clone();
    framed_members.push(frame.clone());
    debug!("framing subset-marked conjunction rule with a fresh rest placeholder");
    rules.insert(and(framed_members, Placeholder::Subset), and(vec![rhs.clone(), frame], Placeholder::None));
  } else if let Term::Or(members, Placeholder::Subset) = lhs.as_ref() {
    let mut fresh = FreshNames::new();
    let frame = fresh.next_rest();
    let mut framed_members = members.clone();
    framed_members.push(frame.clone());
    debug!("framing subset-marked disjunction rule with a fresh rest placeholder");
    rules.insert(or(framed_members, Placeholder::Subset), or(vec![rhs.clone(), frame], Placeholder::None));
  }
}

pub const DOUBLE_NEGATION: &str = "!!$X -> $X";

pub const DEF_NEGATION: &[&str] = &["!FALSE -> TRUE", "!TRUE -> FALSE"];

pub const DEF_EQUIVALENCE: &[&str] = &["($X <-> $X) -> TRUE", "($X <-> $Y) -> (($X -> $Y) & ($Y -> $X))"];

/// "`TRUE -> $X` simplifies to `$X`", "`FALSE -> $X` simplifies to `TRUE`" and material
/// implication's definition. The first two are installed by [`install_implication_identities`]
/// rather than through [`add_rule`]'s top-level-`Imp`-is-the-rule-arrow sugar, since here the
/// *entire* `Imp` term is the pattern, not the separator between pattern and replacement.
pub const DEF_IMPLICATION: &[&str] = &["TRUE -> $X", "FALSE -> $X", "($X -> $Y) <-> (!$X | $Y)"];

fn install_implication_identities(rules: &mut Ruleset) -> Result<(), InvalidRule> {
  rules.insert(parse_term("TRUE -> $X")?, parse_term("$X")?);
  rules.insert(parse_term("FALSE -> $X")?, true_term());
  add_rule(rules, "($X -> $Y) <-> (!$X | $Y)")?;
  Ok(())
}

pub const DEF_CONJUNCTION: &[&str] = &[
  "$X &* !$X -> FALSE",
  "$X &* TRUE -> $X",
  "$X &* FALSE -> FALSE",
  "$X# & TRUE -> $X#",
];

pub const DEF_DISJUNCTION: &[&str] = &["$X |* !$X -> TRUE", "$X |* TRUE -> TRUE", "$X# | FALSE -> $X#"];

pub const DE_MORGAN: &[&str] = &["!($X & $Y) <-> (!$X | !$Y)", "!($X | $Y) <-> (!$X & !$Y)"];

pub const DISTRIB_DNF: &str = "($X & $Y# | $X & $Z#) <-> ($X & ($Y# | $Z#))";
pub const DISTRIB_CNF: &str = "(($X | $Y#) & ($X | $Z#)) <-> ($X | ($Y# & $Z#))";

fn all_standard_rules() -> Vec<&'static str> {
  let mut rules = vec![DOUBLE_NEGATION];
  rules.extend_from_slice(DEF_NEGATION);
  rules.extend_from_slice(DEF_EQUIVALENCE);
  rules.extend_from_slice(DEF_CONJUNCTION);
  rules.extend_from_slice(DEF_DISJUNCTION);
  rules.extend_from_slice(DE_MORGAN);
  rules
}

/// The standard propositional identities, grounded on `original_source/rules.py`'s `RULES_STD`.
pub fn rules_std() -> Ruleset {
  let mut rules = Ruleset::new();
  add_rules(&mut rules, all_standard_rules()).expect("built-in rule text is always well-formed");
  install_implication_identities(&mut rules).expect("built-in rule text is always well-formed");
  rules
}

/// `RULES_STD` plus the distributive law toward disjunctive normal form.
pub fn rules_dnf() -> Ruleset {
  let mut rules = rules_std();
  add_rule(&mut rules, DISTRIB_DNF).expect("built-in rule text is always well-formed");
  rules
}

/// `RULES_STD` plus the distributive law toward conjunctive normal form.
pub fn rules_cnf() -> Ruleset {
  let mut rules = rules_std();
  add_rule(&mut rules, DISTRIB_CNF).expect("built-in rule text is always well-formed");
  rules
}

#[cfg(test)]
mod tests {
  use super::*;
  use logic2_core::api::term::{constant, not, placeholder};

  #[test]
  fn imp_inserts_directed_rule() {
    let mut rules = Ruleset::new();
    add_rule(&mut rules, "!!$X -> $X").unwrap();
    let pattern = not(not(placeholder("X")));
    assert_eq!(rules.get_exact(&pattern), Some(&placeholder("X")));
  }

  #[test]
  fn equ_inserts_both_directions() {
    let mut rules = Ruleset::new();
    add_rule(&mut rules, "p <-> q").unwrap();
    assert_eq!(rules.get_exact(&constant("p")), Some(&constant("q")));
    assert_eq!(rules.get_exact(&constant("q")), Some(&constant("p")));
  }

  #[test]
  fn bare_not_is_sugar_for_false() {
    let mut rules = Ruleset::new();
    add_rule(&mut rules, "!p").unwrap();
    assert_eq!(rules.get_exact(&constant("p")), Some(&false_term()));
  }

  #[test]
  fn bare_term_is_sugar_for_true() {
    let mut rules = Ruleset::new();
    add_rule(&mut rules, "p").unwrap();
    assert_eq!(rules.get_exact(&constant("p")), Some(&true_term()));
  }

  #[test]
  fn subset_rule_also_inserts_framed_variant() {
    let mut rules = Ruleset::new();
    add_rule(&mut rules, "$X &* !$X -> FALSE").unwrap();
    // Both the bare subset rule and a framed variant (one extra rest-placeholder member) exist.
    assert_eq!(rules.len(), 2);
  }

  #[test]
  fn rules_dnf_includes_double_negation_and_distributivity() {
    let rules = rules_dnf();
    assert!(rules.len() > DEF_CONJUNCTION.len());
  }

  #[test]
  fn true_antecedent_implication_simplifies_to_consequent() {
    let rules = rules_std();
    let pattern = parse_term("TRUE -> $X").unwrap();
    assert_eq!(rules.get_exact(&pattern), Some(&placeholder("X")));
  }
}
