/*!

The rewrite driver. `simplify_basic` is a single non-recursive rewrite step (an exact ruleset hit,
or a size-one variadic collapsing to its sole member); `simplify_deep` recurses `simplify` into
every child before taking that step at the root; `simplify` repeatedly tries every rule's
unification-based rewrites of the current term, keeping the smallest result that hasn't already
been visited, until no smaller, novel candidate exists or a cycle is detected.

*/

use crate::{
  api::term::{Placeholder, Term, TermPtr},
  core::{error::CoreError, ruleset::Ruleset, unify::unify},
};
use logic2_abs::cache::MemoCache;
use tracing::debug;

/// A rewrite session bound to one [`Ruleset`], memoizing `simplify_basic`/`simplify_deep` results
/// the way the prior art's `lru_cache`-decorated free functions did.
pub struct Simplifier<'r> {
  rules: &'r Ruleset,
  basic_cache: MemoCache<TermPtr, TermPtr>,
  deep_cache: MemoCache<TermPtr, TermPtr>,
}

impl<'r> Simplifier<'r> {
  pub fn new(rules: &'r Ruleset) -> Self {
    Self {
      rules,
      basic_cache: MemoCache::with_default_capacity(),
      deep_cache: MemoCache::with_default_capacity(),
    }
  }

  /// One rewrite step at the root only: an exact ruleset hit, or a singleton variadic collapsed
  /// to its one member. Does not recurse into children and does not try unification-based rules.
  pub fn simplify_basic(&mut self, term: &TermPtr) -> TermPtr {
    if let Some(cached) = self.basic_cache.peek(term) {
      return cached.clone();
    }
    let result = Self::simplify_basic_uncached(self.rules, term);
    self.basic_cache.get_or_insert_with(term.clone(), || result.clone());
    result
  }

  fn simplify_basic_uncached(rules: &Ruleset, term: &TermPtr) -> TermPtr {
    if term.is_atomic() {
      return term.clone();
    }
    if let Some(replacement) = rules.get_exact(term) {
      return replacement.clone();
    }
    match term.as_ref() {
      Term::And(members, _) | Term::Or(members, _) if members.len() == 1 => members[0].clone(),
      _ => term.clone(),
    }
  }

  /// `simplify_basic` at the root, after every child has independently been run through the full
  /// [`simplify`](Self::simplify) loop.
  pub fn simplify_deep(&mut self, term: &TermPtr) -> Result<TermPtr, CoreError> {
    if let Some(cached) = self.deep_cache.peek(term) {
      return Ok(cached.clone());
    }
    let base = self.simplify_basic(term);
    let mut err = None;
    let result = base.map_children(|child| match self.simplify(child) {
      Ok(t) => t,
      Err(e) => {
        err.get_or_insert(e);
        child.clone()
      }
    });
    if let Some(e) = err {
      return Err(e);
    }
    self.deep_cache.get_or_insert_with(term.clone(), || result.clone());
    Ok(result)
  }

  /// Repeatedly rewrites `term` with every applicable rule, keeping the smallest novel result at
  /// each step, until a fixed point is reached or the history-based cycle guard trips.
  pub fn simplify(&mut self, term: &TermPtr) -> Result<TermPtr, CoreError> {
    let mut term = self.simplify_deep(term)?;
    let mut history = vec![term.clone()];

    loop {
      let mut candidates: Vec<TermPtr> = vec![term.clone()];
      for (pattern, replacement) in self.rules.iter() {
        for subs in unify(&term, pattern, false) {
          candidates.push(replacement.apply_subs(&subs));
        }
      }

      let mut potential = Vec::new();
      for candidate in candidates {
        let deepened = self.simplify_deep(&candidate)?;
        if deepened != term && !potential.contains(&deepened) {
          potential.push(deepened);
        }
      }
      potential.sort_by_key(|t| t.size());

      match potential.into_iter().next() {
        Some(choice) => {
          if history.contains(&choice) {
            debug!(
              term = %crate::core::format::display(&term),
              candidate = %crate::core::format::display(&choice),
              "cycle guard: candidate already visited, stopping at current term"
            );
            return Ok(term);
          }
          debug!(
            from = %crate::core::format::display(&term),
            to = %crate::core::format::display(&choice),
            size = choice.size(),
            "accepted rewrite step"
          );
          history.push(choice.clone());
          term = choice;
        }
        None => break,
      }
    }

    self.simplify_deep(&term)
  }
}

/// One-shot convenience wrapper: build a [`Simplifier`] over `rules` and run the full loop once.
/// Prefer reusing a [`Simplifier`] across many terms against the same ruleset, as the per-instance
/// memoization only pays off across repeated calls.
pub fn simplify(term: &TermPtr, rules: &Ruleset) -> Result<TermPtr, CoreError> {
  Simplifier::new(rules).simplify(term)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::term::{and, constant, false_term, imp, named_predicate, not, or, placeholder, true_term};

  fn double_negation_rules() -> Ruleset {
    let mut rules = Ruleset::new();
    // !!$X -> $X
    rules.insert(not(not(placeholder("X"))), placeholder("X"));
    rules
  }

  #[test]
  fn simplify_basic_collapses_singleton_variadic() {
    let mut simp = Simplifier::new(&Ruleset::new());
    let t = and(vec![constant("a")], Placeholder::None);
    assert_eq!(simp.simplify_basic(&t), constant("a"));
  }

  #[test]
  fn simplify_basic_is_identity_without_a_matching_rule() {
    let mut simp = Simplifier::new(&Ruleset::new());
    let t = named_predicate("f", vec![constant("a")]);
    assert_eq!(simp.simplify_basic(&t), t);
  }

  #[test]
  fn simplify_applies_rule_found_through_unification() {
    let rules = double_negation_rules();
    let mut simp = Simplifier::new(&rules);
    let t = not(not(constant("p")));
    let result = simp.simplify(&t).unwrap();
    assert_eq!(result, constant("p"));
  }

  #[test]
  fn simplify_recurses_into_children() {
    let rules = double_negation_rules();
    let mut simp = Simplifier::new(&rules);
    let t = and(vec![not(not(constant("p"))), constant("q")], Placeholder::None);
    let result = simp.simplify(&t).unwrap();
    assert_eq!(result, and(vec![constant("p"), constant("q")], Placeholder::None));
  }

  #[test]
  fn simplify_is_idempotent() {
    let rules = double_negation_rules();
    let mut simp = Simplifier::new(&rules);
    let t = not(not(not(not(constant("p")))));
    let once = simp.simplify(&t).unwrap();
    let twice = simp.simplify(&once).unwrap();
    assert_eq!(once, twice);
  }

  #[test]
  fn imp_identities_resolve_under_rules() {
    let mut rules = Ruleset::new();
    rules.insert(imp(true_term(), placeholder("X")), placeholder("X"));
    rules.insert(imp(false_term(), placeholder("X")), true_term());
    let mut simp = Simplifier::new(&rules);
    assert_eq!(simp.simplify(&imp(true_term(), constant("p"))).unwrap(), constant("p"));
    assert_eq!(simp.simplify(&imp(false_term(), constant("p"))).unwrap(), true_term());
  }

  #[test]
  fn or_of_true_short_circuits() {
    let mut rules = Ruleset::new();
    rules.insert(or(vec![placeholder("X"), true_term()], Placeholder::Subset), true_term());
    let mut simp = Simplifier::new(&rules);
    let t = or(vec![constant("p"), constant("q"), true_term()], Placeholder::None);
    assert_eq!(simp.simplify(&t).unwrap(), true_term());
  }
}
