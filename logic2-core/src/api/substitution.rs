/*!

A [`Substitution`] is a finite, insertion-ordered mapping from a pattern variable (a placeholder
term, or a logical variable in bidirectional mode) to its bound replacement term. Order matters
here in a way a `HashMap` can't express: [`TermPtr::apply_subs`](crate::api::term::TermPtr::apply_subs)
folds bindings left to right, so a later replacement can itself mention an earlier binding's key.

*/

use crate::{
  api::term::TermPtr,
  core::error::CoreError,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution {
  bindings: Vec<(TermPtr, TermPtr)>,
}

impl Substitution {
  pub fn new() -> Self {
    Self { bindings: Vec::new() }
  }

  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &(TermPtr, TermPtr)> {
    self.bindings.iter()
  }

  /// The replacement currently bound to `key`, if any.
  pub fn get(&self, key: &TermPtr) -> Option<&TermPtr> {
    self.bindings.iter().find(|(k, _)| k == key).map(|(_, v)| v)
  }

  /// Binds `key` to `value`. A rebinding to a structurally equal value is a no-op; rebinding to a
  /// different value is a conflict (two occurrences of the same pattern variable can't unify with
  /// different subjects).
  pub fn bind(&mut self, key: TermPtr, value: TermPtr) -> Result<(), CoreError> {
    if let Some(existing) = self.get(&key) {
      return if *existing == value {
        Ok(())
      } else {
        Err(CoreError::ConflictingBinding(format!("{:?}", key)))
      };
    }
    self.bindings.push((key, value));
    Ok(())
  }

  /// Merges `other` into `self`, checking for conflicts on overlapping keys. `self`'s existing
  /// bindings take priority in the output order; `other`'s novel bindings are appended.
  pub fn merge(&mut self, other: &Substitution) -> Result<(), CoreError> {
    for (key, value) in other.iter() {
      self.bind(key.clone(), value.clone())?;
    }
    Ok(())
  }
}

impl FromIterator<(TermPtr, TermPtr)> for Substitution {
  fn from_iter<I: IntoIterator<Item = (TermPtr, TermPtr)>>(iter: I) -> Self {
    Self { bindings: iter.into_iter().collect() }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::term::{constant, placeholder, variable};

  #[test]
  fn bind_then_get_roundtrips() {
    let mut subs = Substitution::new();
    let key = placeholder("X");
    let value = constant("a");
    subs.bind(key.clone(), value.clone()).unwrap();
    assert_eq!(subs.get(&key), Some(&value));
  }

  #[test]
  fn rebinding_same_value_is_ok() {
    let mut subs = Substitution::new();
    let key = placeholder("X");
    let value = constant("a");
    subs.bind(key.clone(), value.clone()).unwrap();
    assert!(subs.bind(key, value).is_ok());
  }

  #[test]
  fn rebinding_different_value_conflicts() {
    let mut subs = Substitution::new();
    let key = placeholder("X");
    subs.bind(key.clone(), constant("a")).unwrap();
    assert!(subs.bind(key, constant("b")).is_err());
  }

  #[test]
  fn merge_detects_cross_conflicts() {
    let mut a = Substitution::new();
    a.bind(variable("x"), constant("a")).unwrap();
    let mut b = Substitution::new();
    b.bind(variable("x"), constant("b")).unwrap();
    assert!(a.merge(&b).is_err());
  }
}
