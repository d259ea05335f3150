/*!

AC/variadic unification: given a subject term (`haystack`) and a pattern term (`needle`, possibly
containing placeholders), produce every substitution under which the two are structurally equal.
`And`/`Or` are commutative and variadic, so "every substitution" can mean more than one: unifying
`{a, b}` against `{$X, $Y}` yields both `{$X: a, $Y: b}` and `{$X: b, $Y: a}`.

In `bidi` mode (used when matching rule left-hand sides against each other, not just against ground
subjects), a bare `Variable` on either side may bind to the other, subject to an occurs-check.

*/

use std::{cell::RefCell, collections::HashSet};

use itertools::Itertools;
use logic2_abs::cache::MemoCache;
use tracing::{debug, trace};

use crate::api::{
  substitution::Substitution,
  term::{is_placeholder, is_rest_placeholder, Placeholder, Term, TermPtr},
};

thread_local! {
  static UNIFY_CACHE: RefCell<MemoCache<(TermPtr, TermPtr, bool), Vec<Substitution>>> =
    RefCell::new(MemoCache::with_default_capacity());
}

/// All unifications of `needle` against `haystack`, deduplicated by binding content (irrespective
/// of the order bindings were produced in). Memoized on `(haystack, needle, bidi)` through the
/// same bounded-LRU scheme `simplify_basic`/`simplify_deep` use (spec.md §9 "capacity ≥ 32").
pub fn unify(haystack: &TermPtr, needle: &TermPtr, bidi: bool) -> Vec<Substitution> {
  UNIFY_CACHE.with(|cache| {
    let key = (haystack.clone(), needle.clone(), bidi);
    cache.borrow_mut().get_or_insert_with(key, || {
      dedup_substitutions(gen_unifications(haystack, needle, bidi))
    })
  })
}

fn dedup_substitutions(subs: Vec<Substitution>) -> Vec<Substitution> {
  let mut seen = HashSet::new();
  let mut out = Vec::new();
  for sub in subs {
    let mut key: Vec<(TermPtr, TermPtr)> = sub.iter().cloned().collect();
    key.sort();
    if seen.insert(key) {
      out.push(sub);
    }
  }
  out
}

fn gen_unifications(haystack: &TermPtr, needle: &TermPtr, bidi: bool) -> Vec<Substitution> {
  trace!(
    haystack = %crate::core::format::display(haystack),
    needle = %crate::core::format::display(needle),
    bidi,
    "unifying"
  );

  if haystack == needle {
    return vec![Substitution::new()];
  }

  // A pattern placeholder ($X or $X#, regardless of position) unifies with anything.
  if is_placeholder(needle) || is_rest_placeholder(needle) {
    let mut sub = Substitution::new();
    let _ = sub.bind(needle.clone(), haystack.clone());
    return vec![sub];
  }

  // Two distinct constants never unify.
  if matches!(haystack.as_ref(), Term::Constant(_)) && matches!(needle.as_ref(), Term::Constant(_)) {
    return vec![];
  }

  if bidi && (matches!(haystack.as_ref(), Term::Variable(_)) || matches!(needle.as_ref(), Term::Variable(_))) {
    // The variable side binds to the other, whichever that is; a variable can't bind to a term
    // containing itself.
    let (var_side, other_side) = if matches!(haystack.as_ref(), Term::Variable(_)) {
      (haystack, needle)
    } else {
      (needle, haystack)
    };
    if other_side.children().any(|c| &c == var_side) {
      return vec![];
    }
    let mut sub = Substitution::new();
    let _ = sub.bind(var_side.clone(), other_side.clone());
    return vec![sub];
  }

  match (haystack.as_ref(), needle.as_ref()) {
    (Term::NamedPredicate(hname, hargs), Term::NamedPredicate(nname, nargs)) => {
      if hname != nname || hargs.len() != nargs.len() {
        debug!(haystack = %hname, needle = %nname, "predicate unification failed: name or arity mismatch");
        return vec![];
      }
      debug!(predicate = %hname, arity = hargs.len(), "unifying predicate arguments");
      let pairs: Vec<_> = hargs.iter().cloned().zip(nargs.iter().cloned()).collect();
      unify_pairs(&pairs, bidi)
    }

    (Term::Not(h), Term::Not(n)) => unify_pairs(&[(h.clone(), n.clone())], bidi),

    (Term::Imp(hl, hr), Term::Imp(nl, nr)) | (Term::Equ(hl, hr), Term::Equ(nl, nr)) => {
      unify_pairs(&[(hl.clone(), nl.clone()), (hr.clone(), nr.clone())], bidi)
    }

    (Term::And(hargs, _), Term::And(nargs, nph)) => unify_variadic(hargs, nargs, *nph, false, bidi),
    (Term::Or(hargs, _), Term::Or(nargs, nph)) => unify_variadic(hargs, nargs, *nph, true, bidi),

    _ => vec![],
  }
}

/// Sequential, conflict-checked unification of ordered `(haystack, needle)` pairs: each pair is
/// unified, candidate substitutions are combined, and any combination that binds the same pattern
/// variable to two different terms is discarded. In `bidi` mode, each pair's accumulated binding
/// is applied to every remaining pair before it is unified (spec.md §4.2.2 step 3), mirroring
/// `original_source/unify.py::unify_args`'s `new_args = [(b1.apply_subs(nres), ...) ...]`: a
/// variable bound earlier in the list must be substituted into later pairs so occurs-checking and
/// structural unification downstream see the bound term, not the bare variable.
fn unify_pairs(pairs: &[(TermPtr, TermPtr)], bidi: bool) -> Vec<Substitution> {
  let Some(((h0, n0), rest)) = pairs.split_first() else {
    return vec![Substitution::new()];
  };

  let mut out = Vec::new();
  for head_sub in gen_unifications(h0, n0, bidi) {
    let propagated_rest: Vec<(TermPtr, TermPtr)> = if bidi {
      rest.iter().map(|(h, n)| (h.apply_subs(&head_sub), n.apply_subs(&head_sub))).collect()
    } else {
      rest.to_vec()
    };
    for tail_sub in unify_pairs(&propagated_rest, bidi) {
      let mut combined = head_sub.clone();
      if combined.merge(&tail_sub).is_ok() {
        out.push(combined);
      }
    }
  }
  out
}

fn unify_variadic(
  hargs: &[TermPtr],
  nargs: &[TermPtr],
  nph: Placeholder,
  is_or: bool,
  bidi: bool,
) -> Vec<Substitution> {
  if hargs.len() == nargs.len() {
    trace!(arity = hargs.len(), is_or, "equal-arity variadic unification: searching permutations");
    return nargs
      .iter()
      .cloned()
      .permutations(nargs.len())
      .flat_map(|perm| {
        let pairs: Vec<_> = hargs.iter().cloned().zip(perm).collect();
        unify_pairs(&pairs, bidi)
      })
      .collect();
  }

  if nph == Placeholder::Subset && nargs.len() < hargs.len() {
    debug!(
      haystack_arity = hargs.len(),
      needle_arity = nargs.len(),
      is_or,
      "subset-placeholder variadic unification"
    );
    return unify_subset(hargs, nargs, is_or, bidi);
  }

  let rest_members: Vec<_> = nargs.iter().filter(|t| is_rest_placeholder(t)).cloned().collect();
  if rest_members.len() == 1 && hargs.len() >= nargs.len() - 1 {
    debug!(
      haystack_arity = hargs.len(),
      needle_arity = nargs.len(),
      is_or,
      "rest-placeholder variadic unification"
    );
    return unify_with_rest(hargs, nargs, &rest_members[0], is_or, bidi);
  }

  trace!(haystack_arity = hargs.len(), needle_arity = nargs.len(), "variadic unification: no match");
  vec![]
}

/// `needle` has a `*` placeholder and fewer members than `haystack`: partition `haystack`'s
/// members into exactly `nargs.len()` non-empty groups (every haystack member lands in exactly
/// one group), wrap multi-member groups back up in the enclosing connective, then try every
/// pairing of needle member against group under every permutation of group order.
fn unify_subset(hargs: &[TermPtr], nargs: &[TermPtr], is_or: bool, bidi: bool) -> Vec<Substitution> {
  let k = nargs.len();
  let n = hargs.len();
  if k == 0 || k > n {
    return vec![];
  }

  let mut out = Vec::new();
  for labeling in surjective_labelings(n, k) {
    let mut groups: Vec<Vec<TermPtr>> = vec![Vec::new(); k];
    for (idx, &label) in labeling.iter().enumerate() {
      groups[label].push(hargs[idx].clone());
    }
    let grouped_terms: Vec<TermPtr> = groups
      .into_iter()
      .map(|g| wrap_group(g, is_or))
      .collect();

    for perm in nargs.iter().cloned().permutations(k) {
      let pairs: Vec<_> = grouped_terms.iter().cloned().zip(perm).collect();
      out.extend(unify_pairs(&pairs, bidi));
    }
  }
  out
}

/// `needle` has exactly one rest placeholder among its members: the other (static) members must
/// each match a distinct haystack member, and the rest placeholder absorbs everything left over.
fn unify_with_rest(
  hargs: &[TermPtr],
  nargs: &[TermPtr],
  rest_var: &TermPtr,
  is_or: bool,
  bidi: bool,
) -> Vec<Substitution> {
  let statics: Vec<TermPtr> = nargs.iter().filter(|t| *t != rest_var).cloned().collect();
  let m = statics.len();
  if m > hargs.len() {
    return vec![];
  }

  let mut out = Vec::new();
  for selection in hargs.iter().cloned().permutations(m) {
    let selected: HashSet<TermPtr> = selection.iter().cloned().collect();
    let leftover: Vec<TermPtr> = hargs.iter().filter(|t| !selected.contains(*t)).cloned().collect();

    let pairs: Vec<_> = statics.iter().cloned().zip(selection).collect();
    for mut sub in unify_pairs(&pairs, bidi) {
      let rest_term = wrap_group(leftover.clone(), is_or);
      if sub.bind(rest_var.clone(), rest_term).is_ok() {
        out.push(sub);
      }
    }
  }
  out
}

fn wrap_group(mut members: Vec<TermPtr>, is_or: bool) -> TermPtr {
  if members.len() == 1 {
    return members.remove(0);
  }
  if is_or {
    crate::api::term::or(members, Placeholder::None)
  } else {
    crate::api::term::and(members, Placeholder::None)
  }
}

/// Every labeling of `0..n` into `k` labels such that every label in `0..k` is used at least
/// once ("surjective"). Used to enumerate ways to partition haystack members into `k` groups for
/// subset-placeholder matching.
fn surjective_labelings(n: usize, k: usize) -> Vec<Vec<usize>> {
  let mut out = Vec::new();
  let mut current = vec![0usize; n];
  fill_labelings(0, n, k, &mut current, &mut out);
  out
}

fn fill_labelings(pos: usize, n: usize, k: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
  if pos == n {
    if (0..k).all(|label| current.contains(&label)) {
      out.push(current.clone());
    }
    return;
  }
  for label in 0..k {
    current[pos] = label;
    fill_labelings(pos + 1, n, k, current, out);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::term::{and, constant, named_predicate, not, or, placeholder, rest_placeholder};

  #[test]
  fn identical_terms_unify_with_empty_substitution() {
    let t = constant("a");
    let subs = unify(&t, &t, false);
    assert_eq!(subs.len(), 1);
    assert!(subs[0].is_empty());
  }

  #[test]
  fn placeholder_binds_to_anything() {
    let subs = unify(&constant("a"), &placeholder("X"), false);
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].get(&placeholder("X")), Some(&constant("a")));
  }

  #[test]
  fn distinct_constants_do_not_unify() {
    assert!(unify(&constant("a"), &constant("b"), false).is_empty());
  }

  #[test]
  fn named_predicate_args_unify_positionally() {
    let haystack = named_predicate("f", vec![constant("a"), constant("b")]);
    let needle = named_predicate("f", vec![placeholder("X"), placeholder("Y")]);
    let subs = unify(&haystack, &needle, false);
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].get(&placeholder("X")), Some(&constant("a")));
    assert_eq!(subs[0].get(&placeholder("Y")), Some(&constant("b")));
  }

  #[test]
  fn commutative_and_tries_every_pairing() {
    let haystack = and(vec![constant("a"), constant("b")], Placeholder::None);
    let needle = and(vec![placeholder("X"), placeholder("Y")], Placeholder::None);
    let subs = unify(&haystack, &needle, false);
    // Both (X=a,Y=b) and (X=b,Y=a) are valid unifications of a commutative connective.
    assert_eq!(subs.len(), 2);
  }

  #[test]
  fn rest_placeholder_absorbs_leftovers() {
    let haystack = or(vec![constant("a"), constant("b"), constant("c")], Placeholder::None);
    let needle = or(vec![constant("a"), rest_placeholder("Y")], Placeholder::None);
    let subs = unify(&haystack, &needle, false);
    assert!(!subs.is_empty());
    let rest = subs[0].get(&rest_placeholder("Y")).expect("rest binding");
    assert!(rest.is_variadic() || rest.is_atomic());
  }

  #[test]
  fn not_unifies_structurally() {
    let haystack = not(constant("a"));
    let needle = not(placeholder("X"));
    let subs = unify(&haystack, &needle, false);
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].get(&placeholder("X")), Some(&constant("a")));
  }
}
