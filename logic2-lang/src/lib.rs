/*!

Parsing, rule-set construction, truth-table rendering, and (partial) Quine–McCluskey minimisation
for the propositional terms defined in `logic2-core`.

*/
#![allow(unused)]

pub mod error;
pub mod parser;
pub mod qmc;
pub mod ruleset_builder;
pub mod truth_table;

pub use error::{InvalidRule, ParseError};
pub use parser::parse_term;
pub use ruleset_builder::{add_rule, add_rules, rules_cnf, rules_dnf, rules_std};
pub use truth_table::TruthTable;
