#![deny(warnings)]

mod error;
pub use crate::error::Error;

mod grammar;
pub use crate::grammar::{DottedRule, Grammar, GrammarBuilder, Rule, Symbol};

mod bnf;
pub use crate::bnf::{compile_bnf, compile_bnf_partial, BnfError, LineError, LineErrorKind};

mod tokenizer;
pub use crate::tokenizer::tokenize;

mod items;
mod stateset;
pub use crate::items::{ChartEntry, EarleyItem, Reason};
pub use crate::stateset::StateSet;

mod earley;
pub use crate::earley::{run_earley, EarleyChart, EarleyParser};

mod cyk;
pub use crate::cyk::{run_cyk, CykParser, CykTable};

mod trees;
pub use crate::trees::Tree;

mod engine;
pub use crate::engine::{Algorithm, Engine, EngineConfig, Outcome, Parse};

#[cfg(test)]
mod cyk_test;
