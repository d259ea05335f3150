/*!

A `Term` is an immutable node in the expression tree: a truth literal, a named value (constant or
variable), a user-declared predicate, or one of the built-in connectives.

Every implementer of Maude's matching algorithms we studied builds terms as a class hierarchy
(`Term -> Predicate -> BuiltinOp -> BinOp`/`VariadicOp -> And`/`Or`/`Imp`) with a corresponding DAG
node type for structural sharing. We collapse that hierarchy into a single closed `enum`: behaviour
dispatches on the variant tag rather than through virtual calls, and structural sharing comes from
hash-consing every `Term` through [`intern`] rather than from a separate DAG representation. A
`TermPtr` handed back by any constructor here is always canonical: two `TermPtr`s compare structurally
equal if and only if they are the same allocation (see [`TermPtr`]'s `PartialEq` impl), exactly the
property `mod2-lib`'s `HashConsSet` exists to provide for DAG nodes.

*/

use std::{
  cell::RefCell,
  cmp::Ordering,
  collections::HashSet,
  fmt,
  hash::{Hash, Hasher},
  rc::Rc,
};

use logic2_abs::IString;

use crate::{
  api::interpretation::Interpretation,
  core::error::CoreError,
};

/// Marker distinguishing a plain variadic connective from one that may match any *subset* of the
/// subject's members (the `*` suffix in concrete syntax, spec section 3.2).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Placeholder {
  #[default]
  None,
  Subset,
}

/// The sorted, deduplicated member collection of a variadic connective. Ordered by canonical
/// pointer identity rather than insertion order, which is what makes `And`/`Or` equality respect
/// commutativity without needing `Hash`/`Eq` on a true `HashSet<TermPtr>` at every construction.
pub type TermSet = Vec<TermPtr>;

/// The term tree. Constants whose name begins with `$` are pattern placeholders; those ending in
/// `#` are rest placeholders. Both only ever occur in patterns, never in parsed user input.
#[derive(Clone, Eq, PartialEq, Hash)]
pub enum Term {
  True,
  False,
  Constant(IString),
  Variable(IString),
  NamedPredicate(IString, Vec<TermPtr>),
  Not(TermPtr),
  Imp(TermPtr, TermPtr),
  Equ(TermPtr, TermPtr),
  And(TermSet, Placeholder),
  Or(TermSet, Placeholder),
}

/// A hash-consed, reference-counted handle to a canonical [`Term`]. Cloning is a refcount bump.
/// Equality and ordering are by allocation identity, which is sound only because every `TermPtr`
/// in circulation was produced by [`intern`] (never `Rc::new` directly by client code).
#[derive(Clone)]
pub struct TermPtr(Rc<Term>);

impl TermPtr {
  #[inline]
  pub fn size(&self) -> usize {
    self.children().count()
  }

  /// Pre-order traversal of `self` and every structural descendant. Lazy: nodes are produced on
  /// demand rather than collected up front.
  pub fn children(&self) -> ChildrenIter {
    ChildrenIter { stack: vec![self.clone()] }
  }

  /// The set of all `Constant`/`Variable` descendants (including `self`, if it is one).
  pub fn free_names(&self) -> HashSet<TermPtr> {
    self.children()
        .filter(|t| matches!(t.as_ref(), Term::Constant(_) | Term::Variable(_)))
        .collect()
  }

  /// The name carried by a `Constant` or `Variable`, or `None` for any other variant.
  pub fn name(&self) -> Option<&IString> {
    match self.as_ref() {
      Term::Constant(name) | Term::Variable(name) => Some(name),
      _ => None,
    }
  }

  #[inline]
  pub fn is_atomic(&self) -> bool {
    matches!(self.as_ref(), Term::True | Term::False | Term::Constant(_) | Term::Variable(_))
  }

  /// Is this term a variadic commutative connective (`And`/`Or`)?
  #[inline]
  pub fn is_variadic(&self) -> bool {
    matches!(self.as_ref(), Term::And(..) | Term::Or(..))
  }

  /// Does this term's top connective commute? Matches `BuiltinOp::commutes` in the prior art:
  /// only the variadic connectives do.
  #[inline]
  pub fn commutes(&self) -> bool {
    self.is_variadic()
  }

  /// Produce a new term in which every *direct* child has been replaced by `f(child)`. Ordered
  /// tuple fields stay ordered; variadic member sets are rebuilt (and re-flattened/re-deduped) by
  /// the smart constructors; non-term fields (names, the placeholder marker) are untouched.
  pub fn map_children<F>(&self, mut f: F) -> TermPtr
  where
    F: FnMut(&TermPtr) -> TermPtr,
  {
    match self.as_ref() {
      Term::True | Term::False | Term::Constant(_) | Term::Variable(_) => self.clone(),
      Term::NamedPredicate(name, args) => {
        named_predicate(name.clone(), args.iter().map(&mut f).collect())
      }
      Term::Not(inner) => not(f(inner)),
      Term::Imp(l, r) => imp(f(l), f(r)),
      Term::Equ(l, r) => equ(f(l), f(r)),
      Term::And(members, placeholder) => {
        and(members.iter().map(&mut f).collect(), *placeholder)
      }
      Term::Or(members, placeholder) => {
        or(members.iter().map(&mut f).collect(), *placeholder)
      }
    }
  }

  /// Whole-subterm syntactic replacement: if `self == find`, return `replace`; otherwise recurse
  /// structurally.
  pub fn apply_one(&self, find: &TermPtr, replace: &TermPtr) -> TermPtr {
    if self == find {
      return replace.clone();
    }
    self.map_children(|child| child.apply_one(find, replace))
  }

  /// Fold of [`apply_one`](Self::apply_one) over a substitution's entries in insertion order.
  /// Order matters: a later entry's replacement may itself contain an earlier entry's key.
  pub fn apply_subs(&self, subs: &crate::api::substitution::Substitution) -> TermPtr {
    let mut t = self.clone();
    for (find, replace) in subs.iter() {
      t = t.apply_one(find, replace);
    }
    t
  }

  /// Recursive boolean evaluator. Literals evaluate to themselves; a named value looks itself up
  /// by name (failing if absent); an undeclared `NamedPredicate` has no meaning and also fails;
  /// connectives compute standard truth semantics.
  pub fn evaluate(&self, interp: &Interpretation) -> Result<bool, CoreError> {
    match self.as_ref() {
      Term::True  => Ok(true),
      Term::False => Ok(false),

      Term::Constant(name) | Term::Variable(name) => {
        interp.get(name).ok_or_else(|| CoreError::UnboundName(name.clone()))
      }

      Term::NamedPredicate(name, _) => Err(CoreError::UnboundName(name.clone())),

      Term::Not(inner) => Ok(!inner.evaluate(interp)?),

      Term::Imp(lhs, rhs) => Ok(!lhs.evaluate(interp)? || rhs.evaluate(interp)?),

      Term::Equ(lhs, rhs) => Ok(lhs.evaluate(interp)? == rhs.evaluate(interp)?),

      Term::And(members, _) => {
        for member in members {
          if !member.evaluate(interp)? {
            return Ok(false);
          }
        }
        Ok(true)
      }

      Term::Or(members, _) => {
        for member in members {
          if member.evaluate(interp)? {
            return Ok(true);
          }
        }
        Ok(false)
      }
    }
  }
}

impl std::ops::Deref for TermPtr {
  type Target = Term;
  #[inline]
  fn deref(&self) -> &Term { &self.0 }
}

impl TermPtr {
  #[inline]
  fn as_ref(&self) -> &Term { &self.0 }

  #[inline]
  fn addr(&self) -> usize { Rc::as_ptr(&self.0) as usize }
}

impl PartialEq for TermPtr {
  #[inline]
  fn eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}
impl Eq for TermPtr {}

impl Hash for TermPtr {
  fn hash<H: Hasher>(&self, state: &mut H) {
    state.write_usize(self.addr());
  }
}

impl Ord for TermPtr {
  fn cmp(&self, other: &Self) -> Ordering { self.addr().cmp(&other.addr()) }
}
impl PartialOrd for TermPtr {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl fmt::Debug for TermPtr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", crate::core::format::display(self))
  }
}

/// Lazy pre-order traversal produced by [`TermPtr::children`].
pub struct ChildrenIter {
  stack: Vec<TermPtr>,
}

impl Iterator for ChildrenIter {
  type Item = TermPtr;

  fn next(&mut self) -> Option<Self::Item> {
    let next = self.stack.pop()?;
    match next.as_ref() {
      Term::True | Term::False | Term::Constant(_) | Term::Variable(_) => {}
      Term::NamedPredicate(_, args) => {
        self.stack.extend(args.iter().rev().cloned());
      }
      Term::Not(inner) => self.stack.push(inner.clone()),
      Term::Imp(l, r) | Term::Equ(l, r) => {
        self.stack.push(r.clone());
        self.stack.push(l.clone());
      }
      Term::And(members, _) | Term::Or(members, _) => {
        self.stack.extend(members.iter().rev().cloned());
      }
    }
    Some(next)
  }
}

// region Hash-consing

thread_local! {
  static INTERN_TABLE: RefCell<std::collections::HashMap<Term, TermPtr>> = RefCell::new(std::collections::HashMap::new());
}

/// Inserts `term` if a canonical version of it is not already in the table. Returns the canonical
/// `TermPtr`. Mirrors `HashConsSet::insert`, generalised from DAG nodes to our immutable tree: "a
/// shared-ownership, hash-consed representation ... makes equality O(1) and map operations cheap."
fn intern(term: Term) -> TermPtr {
  INTERN_TABLE.with(|table| {
    let mut table = table.borrow_mut();
    if let Some(canonical) = table.get(&term) {
      return canonical.clone();
    }
    let ptr = TermPtr(Rc::new(term.clone()));
    table.insert(term, ptr.clone());
    ptr
  })
}

/// Clears the hash-cons table. Exposed for tests only; production callers never need to evict
/// (terms are small and the process is short-lived per spec's non-goals around persistence).
#[cfg(test)]
pub(crate) fn clear_intern_table_for_tests() {
  INTERN_TABLE.with(|table| table.borrow_mut().clear());
}

// endregion

// region Smart constructors

pub fn true_term() -> TermPtr { intern(Term::True) }
pub fn false_term() -> TermPtr { intern(Term::False) }

pub fn literal(value: bool) -> TermPtr {
  if value { true_term() } else { false_term() }
}

pub fn constant(name: impl Into<IString>) -> TermPtr { intern(Term::Constant(name.into())) }
pub fn variable(name: impl Into<IString>) -> TermPtr { intern(Term::Variable(name.into())) }

/// A pattern placeholder, written `$name` in concrete syntax: a `Constant` whose name carries the
/// `$` sigil. Matches any single subterm during unification.
pub fn placeholder(name: impl fmt::Display) -> TermPtr {
  constant(format!("${name}"))
}

/// A rest placeholder, written `$name#` in concrete syntax: matches zero or more remaining members
/// of an enclosing variadic connective.
pub fn rest_placeholder(name: impl fmt::Display) -> TermPtr {
  constant(format!("${name}#"))
}

/// Is `self` a pattern placeholder (`$name`, not `$name#`)?
pub fn is_placeholder(t: &TermPtr) -> bool {
  matches!(t.name(), Some(n) if n.starts_with('$') && !n.ends_with('#'))
}

/// Is `self` a rest placeholder (`$name#`)?
pub fn is_rest_placeholder(t: &TermPtr) -> bool {
  matches!(t.name(), Some(n) if n.starts_with('$') && n.ends_with('#'))
}

pub fn named_predicate(name: impl Into<IString>, args: Vec<TermPtr>) -> TermPtr {
  intern(Term::NamedPredicate(name.into(), args))
}

pub fn not(inner: TermPtr) -> TermPtr {
  intern(Term::Not(inner))
}

pub fn imp(lhs: TermPtr, rhs: TermPtr) -> TermPtr {
  intern(Term::Imp(lhs, rhs))
}

pub fn equ(lhs: TermPtr, rhs: TermPtr) -> TermPtr {
  intern(Term::Equ(lhs, rhs))
}

/// Flattens nested same-kind variadics (`And({a, And({b,c})})` becomes `And({a,b,c})`) and
/// deduplicates members by canonical identity. Does *not* collapse a singleton member to that
/// member: that's `simplify_basic`'s job, not construction's (spec section 3.1).
fn flatten_variadic(args: Vec<TermPtr>, is_same_kind: impl Fn(&Term) -> Option<&[TermPtr]>) -> Vec<TermPtr> {
  let mut flat = Vec::with_capacity(args.len());
  for arg in args {
    if let Some(nested) = is_same_kind(arg.as_ref()) {
      flat.extend_from_slice(nested);
    } else {
      flat.push(arg);
    }
  }
  flat.sort();
  flat.dedup();
  flat
}

pub fn and(args: Vec<TermPtr>, placeholder: Placeholder) -> TermPtr {
  let members = flatten_variadic(args, |t| match t {
    Term::And(members, _) => Some(members.as_slice()),
    _ => None,
  });
  intern(Term::And(members, placeholder))
}

pub fn or(args: Vec<TermPtr>, placeholder: Placeholder) -> TermPtr {
  let members = flatten_variadic(args, |t| match t {
    Term::Or(members, _) => Some(members.as_slice()),
    _ => None,
  });
  intern(Term::Or(members, placeholder))
}

// endregion

#[cfg(test)]
mod tests {
  use super::*;

  fn c(name: &str) -> TermPtr { constant(name) }

  #[test]
  fn structural_equality_respects_variadics() {
    let a = and(vec![c("a"), c("b"), c("c")], Placeholder::None);
    let b = and(vec![c("c"), c("a"), c("b")], Placeholder::None);
    assert_eq!(a, b);

    let nested = and(vec![c("a"), and(vec![c("b"), c("c")], Placeholder::None)], Placeholder::None);
    assert_eq!(nested, a);
  }

  #[test]
  fn named_predicate_args_are_ordered() {
    let f_ab = named_predicate("f", vec![c("a"), c("b")]);
    let f_ba = named_predicate("f", vec![c("b"), c("a")]);
    assert_ne!(f_ab, f_ba);
  }

  #[test]
  fn hash_consing_gives_pointer_equal_identical_terms() {
    let a1 = and(vec![c("x"), c("y")], Placeholder::None);
    let a2 = and(vec![c("y"), c("x")], Placeholder::None);
    assert!(Rc::ptr_eq(&a1.0, &a2.0));
  }

  #[test]
  fn apply_subs_identity() {
    use crate::api::substitution::Substitution;
    let t = and(vec![c("a"), not(c("b"))], Placeholder::None);
    let empty = Substitution::new();
    assert_eq!(t.apply_subs(&empty), t);
  }

  #[test]
  fn children_are_preorder() {
    let t = not(and(vec![c("a"), c("b")], Placeholder::None));
    let kinds: Vec<_> = t.children().map(|n| n.is_atomic()).collect();
    // Not, And, then the two atomic members, in that order.
    assert_eq!(kinds, vec![false, false, true, true]);
    assert_eq!(t.size(), 4);
  }
}
