/*!

An [`Interpretation`] assigns truth values to the named constants and variables that occur free in
a term, so that [`TermPtr::evaluate`](crate::api::term::TermPtr::evaluate) has something to look
names up in.

*/

use std::collections::HashMap;

use logic2_abs::IString;

use crate::api::term::TermPtr;

/// A finite map from name to truth value. Construction from a term's free names defaults every
/// entry to `false`, matching the prior art's `Interpretation.from_names` convention of assuming
/// unset propositions are false until told otherwise.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Interpretation {
  bindings: HashMap<IString, bool>,
}

impl Interpretation {
  pub fn new() -> Self {
    Self { bindings: HashMap::new() }
  }

  /// One binding per free name in `term`, each defaulted to `false`.
  pub fn from_term(term: &TermPtr) -> Self {
    let mut bindings = HashMap::new();
    for name in term.free_names() {
      let key = match name.name() {
        Some(key) => key.clone(),
        None => continue,
      };
      bindings.entry(key).or_insert(false);
    }
    Self { bindings }
  }

  pub fn get(&self, name: &IString) -> Option<bool> {
    self.bindings.get(name).copied()
  }

  pub fn set(&mut self, name: impl Into<IString>, value: bool) {
    self.bindings.insert(name.into(), value);
  }

  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }

  /// Names in a stable, sorted order — used by the truth-table renderer so columns don't jitter
  /// between runs.
  pub fn sorted_names(&self) -> Vec<IString> {
    let mut names: Vec<_> = self.bindings.keys().cloned().collect();
    names.sort();
    names
  }

  pub fn iter(&self) -> impl Iterator<Item = (&IString, &bool)> {
    self.bindings.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::term::{and, constant, not, variable, Placeholder};

  #[test]
  fn from_term_collects_free_names_defaulted_false() {
    let t = and(vec![constant("p"), not(variable("q"))], Placeholder::None);
    let interp = Interpretation::from_term(&t);
    assert_eq!(interp.len(), 2);
    assert_eq!(interp.get(&"p".into()), Some(false));
    assert_eq!(interp.get(&"q".into()), Some(false));
  }

  #[test]
  fn set_overrides_default() {
    let mut interp = Interpretation::new();
    interp.set("p", true);
    assert_eq!(interp.get(&"p".into()), Some(true));
    assert_eq!(interp.get(&"r".into()), None);
  }
}
