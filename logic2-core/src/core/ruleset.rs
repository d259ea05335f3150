/*!

A [`Ruleset`] is an ordered, rewrite-direction-preserving association from pattern to replacement.
Order matters for the rewrite driver: rules are tried in insertion order, and the first applicable
one wins a given simplification step. `logic2-lang`'s ruleset builder is the only place patterns and
replacements are parsed from rule strings; this module only holds the resulting association and the
exact-key fast path a already-fully-ground term can use to skip unification entirely.

*/

use std::collections::HashMap;

use crate::api::term::TermPtr;

#[derive(Clone, Debug, Default)]
pub struct Ruleset {
  order: Vec<(TermPtr, TermPtr)>,
  exact: HashMap<TermPtr, TermPtr>,
}

impl Ruleset {
  pub fn new() -> Self {
    Self { order: Vec::new(), exact: HashMap::new() }
  }

  /// Adds `pattern -> replacement`, preserving whichever earlier binding exists for an identical
  /// pattern (matching association semantics, not map-overwrite semantics, mirrors `add_raw`'s use
  /// as a dict that still allows the caller to add entries for both directions of a biconditional).
  pub fn insert(&mut self, pattern: TermPtr, replacement: TermPtr) {
    self.exact.entry(pattern.clone()).or_insert_with(|| replacement.clone());
    self.order.push((pattern, replacement));
  }

  /// Direct, non-unifying lookup: `term` must be exactly (by hash-cons identity) a previously
  /// inserted pattern.
  pub fn get_exact(&self, term: &TermPtr) -> Option<&TermPtr> {
    self.exact.get(term)
  }

  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &(TermPtr, TermPtr)> {
    self.order.iter()
  }
}

impl FromIterator<(TermPtr, TermPtr)> for Ruleset {
  fn from_iter<I: IntoIterator<Item = (TermPtr, TermPtr)>>(iter: I) -> Self {
    let mut set = Ruleset::new();
    for (pattern, replacement) in iter {
      set.insert(pattern, replacement);
    }
    set
  }
}
