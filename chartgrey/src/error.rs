use crate::bnf::BnfError;
use crate::grammar::Rule;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Bnf(#[from] BnfError),
    #[error("Duplicate Rule: {0}")]
    DuplicateRule(Rule),
    /// CYK requires every rule to be `A -> B C` or `A -> t`
    #[error("Rule {index} is not in Chomsky normal form: {rule}")]
    NotNormalForm { index: usize, rule: Rule },
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
}
