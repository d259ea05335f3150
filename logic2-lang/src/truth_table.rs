/*!

Truth-table rendering, grounded on `original_source/truth_table.py`'s `TruthTable`: enumerate every
assignment of a term's free names in lexicographic order, evaluate the term under each, and report
truth density and the "operator number" (the table's rows read as a binary integer, row 0 = the
least-significant bit — the usual encoding of a boolean function as a Wolfram-style operator index).

*/

use std::fmt;

use logic2_abs::IString;
use logic2_core::{
  api::{interpretation::Interpretation, term::TermPtr},
  core::{error::CoreError, format::display, simplify::Simplifier},
};

pub struct TruthTable {
  variables: Vec<IString>,
  rows: Vec<(Vec<bool>, bool)>,
  term: TermPtr,
}

impl TruthTable {
  /// Builds the table for every one of `term`'s free names, in sorted order, over all `2^n`
  /// assignments. Fails only if `term` contains an uninterpreted `NamedPredicate`.
  pub fn from_term(term: &TermPtr) -> Result<Self, CoreError> {
    let mut variables: Vec<IString> = term
      .free_names()
      .into_iter()
      .filter_map(|t| t.name().cloned())
      .collect();
    variables.sort();

    let n = variables.len();
    let mut rows = Vec::with_capacity(1 << n.min(20));
    for assignment in assignments(n) {
      let mut interp = Interpretation::new();
      for (name, value) in variables.iter().zip(assignment.iter()) {
        interp.set(name.clone(), *value);
      }
      let result = term.evaluate(&interp)?;
      rows.push((assignment, result));
    }

    Ok(Self { variables, rows, term: term.clone() })
  }

  pub fn variables(&self) -> &[IString] {
    &self.variables
  }

  pub fn rows(&self) -> &[(Vec<bool>, bool)] {
    &self.rows
  }

  /// Fraction of rows that evaluate to `true`.
  pub fn get_truth_density(&self) -> f64 {
    if self.rows.is_empty() {
      return 0.0;
    }
    let true_count = self.rows.iter().filter(|(_, v)| *v).count();
    true_count as f64 / self.rows.len() as f64
  }

  /// The table read as a binary integer, row 0 contributing the least-significant bit.
  pub fn get_operator_number(&self) -> u64 {
    self
      .rows
      .iter()
      .enumerate()
      .map(|(i, (_, v))| if *v { 1u64 << i } else { 0 })
      .sum()
  }

  /// Renders the table with an extra column showing each row's residual term after substituting
  /// the row's literal assignment and simplifying — the detail `TruthTable.__str__` prints via its
  /// module-level default-ruleset `simplify`. Threading a ruleset through requires a `Simplifier`,
  /// which a bare `Display` impl has no way to accept, so this is a separate method.
  pub fn render_with_simplifier(&self, simp: &mut Simplifier) -> Result<String, CoreError> {
    use std::fmt::Write;

    let mut out = String::new();
    let header = self.header();
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{}", "-".repeat(header.len()));

    for (assignment, result) in &self.rows {
      let mut subs = logic2_core::api::substitution::Substitution::new();
      for (name, value) in self.variables.iter().zip(assignment.iter()) {
        let key = logic2_core::api::term::variable(name.clone());
        subs.bind(key, logic2_core::api::term::literal(*value))
            .expect("each row variable is bound exactly once");
      }
      let residual = simp.simplify(&self.term.apply_subs(&subs))?;
      let cells: String = assignment.iter().map(|v| if *v { 'T' } else { 'F' }).collect::<Vec<_>>().join(" | ");
      let _ = writeln!(out, "{cells} | {} | {}", if *result { 'T' } else { 'F' }, display(&residual));
    }

    Ok(out)
  }

  fn header(&self) -> String {
    let names: Vec<String> = self.variables.iter().map(|n| n.to_string()).collect();
    format!("{} | {}", names.join(" | "), display(&self.term))
  }
}

impl fmt::Display for TruthTable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let header = self.header();
    writeln!(f, "{header}")?;
    writeln!(f, "{}", "-".repeat(header.len()))?;
    for (assignment, result) in &self.rows {
      let cells: String = assignment.iter().map(|v| if *v { 'T' } else { 'F' }).collect::<Vec<_>>().join(" | ");
      writeln!(f, "{cells} | {}", if *result { 'T' } else { 'F' })?;
    }
    Ok(())
  }
}

/// All `2^n` boolean assignments in the same order as `itertools.product((False, True), repeat=n)`:
/// counting up in binary with the first variable as the most significant bit.
fn assignments(n: usize) -> Vec<Vec<bool>> {
  let total = 1usize << n;
  (0..total)
    .map(|row| (0..n).map(|bit| (row >> (n - 1 - bit)) & 1 == 1).collect())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use logic2_core::api::term::{and, constant, or, variable, Placeholder};

  #[test]
  fn enumerates_all_assignments_in_order() {
    let t = and(vec![variable("A"), variable("B")], Placeholder::None);
    let table = TruthTable::from_term(&t).unwrap();
    assert_eq!(table.variables(), &[IString::from("A"), IString::from("B")]);
    assert_eq!(table.rows().len(), 4);
    assert_eq!(table.rows()[0].0, vec![false, false]);
    assert_eq!(table.rows()[3].0, vec![true, true]);
  }

  #[test]
  fn and_of_two_vars_is_true_only_on_last_row() {
    let t = and(vec![variable("A"), variable("B")], Placeholder::None);
    let table = TruthTable::from_term(&t).unwrap();
    let trues: Vec<bool> = table.rows().iter().map(|(_, v)| *v).collect();
    assert_eq!(trues, vec![false, false, false, true]);
    assert_eq!(table.get_truth_density(), 0.25);
  }

  #[test]
  fn operator_number_encodes_rows_as_binary() {
    let t = or(vec![variable("A"), variable("B")], Placeholder::None);
    let table = TruthTable::from_term(&t).unwrap();
    // Rows: FF->F, FT->T, TF->T, TT->T => bits 0,1,1,1 => 0b1110 = 14.
    assert_eq!(table.get_operator_number(), 0b1110);
  }

  #[test]
  fn constant_free_term_has_a_single_row() {
    let t = constant("p");
    let err = TruthTable::from_term(&t);
    // `p` is unbound until assigned by the table itself — the table treats it as a variable-like
    // free name just as `Variable`s are, so it still produces one binding, not an error.
    assert!(err.is_ok());
  }
}
