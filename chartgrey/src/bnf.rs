//! Compiles line oriented BNF into a [`Grammar`].
//!
//! ```text
//! # comments run until end of line
//! <S>  ::= <NP> <VP>
//! <NP> ::= "the" <N> | she
//!       |  ε
//! ```
//!
//! `<name>` is a NonTerminal. Quoted text and any other bare word are
//! Terminals. `->` and `→` are synonyms of `::=`. A line starting with `|`
//! adds alternatives to the previous rule. An empty alternative or a lone `ε`
//! is an epsilon rule.

use crate::error::Error;
use crate::grammar::{Grammar, GrammarBuilder, Rule, Symbol};
use lexers::{BnfToken, BnfTokenizer};
use log::{debug, warn};
use std::fmt;
use thiserror::Error;

const EPSILON: &str = "ε";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LineErrorKind {
    #[error("missing left-hand side")]
    MissingLhs,
    #[error("left-hand side must be a <NonTerminal>, found {0}")]
    InvalidLhs(String),
    #[error("missing production operator ::=")]
    MissingProduces,
    #[error("production operator repeated in right-hand side")]
    RepeatedProduces,
    #[error("cannot classify symbol {0}")]
    Unclassifiable(String),
    #[error("ε must be the only symbol of an alternative")]
    MisplacedEpsilon,
    #[error("alternative without a preceding rule")]
    OrphanAlternative,
    #[error("Duplicate Rule: {0}")]
    DuplicateRule(Rule),
}

/// A malformed line. `line` is 1-based.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct LineError {
    pub line: usize,
    pub text: String,
    pub kind: LineErrorKind,
}

/// Every malformed line of a source along with the grammar built from the
/// well-formed ones, so callers can decide to surface it anyway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BnfError {
    pub errors: Vec<LineError>,
    pub partial: Grammar,
}

impl fmt::Display for BnfError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Malformed grammar")?;
        for (idx, err) in self.errors.iter().enumerate() {
            write!(f, "{} {}", if idx == 0 { ":" } else { ";" }, err)?;
        }
        Ok(())
    }
}

impl std::error::Error for BnfError {}

/// Compile `source` failing if any line is malformed.
/// Empty or blank sources compile to the empty grammar.
pub fn compile_bnf(source: &str) -> Result<Grammar, BnfError> {
    let (grammar, errors) = compile_bnf_partial(source);
    if errors.is_empty() {
        Ok(grammar)
    } else {
        Err(BnfError { errors, partial: grammar })
    }
}

/// Compile every well-formed line of `source`, collecting errors of the rest.
pub fn compile_bnf_partial(source: &str) -> (Grammar, Vec<LineError>) {
    let mut compiler = BnfCompiler::default();
    for (idx, text) in source.lines().enumerate() {
        compiler.line(idx + 1, text);
    }
    let (grammar, errors) = (compiler.builder.into_partial_grammar(), compiler.errors);
    debug!("Compiled {} rules, {} malformed lines", grammar.len(), errors.len());
    (grammar, errors)
}

#[derive(Default)]
struct BnfCompiler {
    builder: GrammarBuilder,
    // head of the last production, continuation lines extend it
    current_lhs: Option<String>,
    errors: Vec<LineError>,
}

impl BnfCompiler {
    fn line(&mut self, line: usize, text: &str) {
        let tokens: Vec<_> = BnfTokenizer::new(text.chars()).collect();
        if tokens.is_empty() {
            return;
        }
        if let Err(kind) = self.production(&tokens) {
            warn!("Bad BNF at line {}: {}", line, kind);
            self.errors.push(LineError {
                line,
                text: text.trim().to_string(),
                kind,
            });
        }
    }

    fn production(&mut self, tokens: &[BnfToken]) -> Result<(), LineErrorKind> {
        let (lhs, body) = match tokens {
            [BnfToken::Alt, body @ ..] => {
                let lhs = self.current_lhs.clone().ok_or(LineErrorKind::OrphanAlternative)?;
                (lhs, body)
            }
            [BnfToken::NonTerm(lhs), BnfToken::Produces, body @ ..] => {
                self.current_lhs = Some(lhs.clone());
                (lhs.clone(), body)
            }
            [] => return Ok(()),
            _ => {
                // continuation lines can't attach to a head that failed
                self.current_lhs = None;
                return Err(head_error(tokens));
            }
        };
        // A single bad alternative fails the whole line
        let alternatives = body
            .split(|token| *token == BnfToken::Alt)
            .map(alternative)
            .collect::<Result<Vec<_>, _>>()?;
        let mut duplicate = None;
        for rhs in alternatives {
            if let Err(Error::DuplicateRule(rule)) = self.builder.rule_try(Rule::new(&lhs, rhs)) {
                duplicate.get_or_insert(rule);
            }
        }
        duplicate.map_or(Ok(()), |rule| Err(LineErrorKind::DuplicateRule(rule)))
    }
}

fn head_error(tokens: &[BnfToken]) -> LineErrorKind {
    match tokens.first() {
        Some(BnfToken::NonTerm(_)) => LineErrorKind::MissingProduces,
        Some(BnfToken::Produces) | None => LineErrorKind::MissingLhs,
        Some(BnfToken::Unknown(raw)) => LineErrorKind::Unclassifiable(raw.clone()),
        Some(BnfToken::Word(word)) => LineErrorKind::InvalidLhs(word.clone()),
        Some(BnfToken::Quoted(text)) => LineErrorKind::InvalidLhs(format!("{:?}", text)),
        Some(BnfToken::Alt) => LineErrorKind::OrphanAlternative,
    }
}

fn alternative(tokens: &[BnfToken]) -> Result<Vec<Symbol>, LineErrorKind> {
    if let [BnfToken::Word(word)] = tokens {
        if word == EPSILON {
            return Ok(Vec::new());
        }
    }
    tokens
        .iter()
        .map(|token| match token {
            BnfToken::NonTerm(name) => Ok(Symbol::NonTerminal(name.clone())),
            BnfToken::Quoted(text) if text.is_empty() => {
                Err(LineErrorKind::Unclassifiable(format!("{:?}", text)))
            }
            BnfToken::Quoted(text) => Ok(Symbol::Terminal(text.clone())),
            BnfToken::Word(word) if word == EPSILON => Err(LineErrorKind::MisplacedEpsilon),
            BnfToken::Word(word) => Ok(Symbol::Terminal(word.clone())),
            BnfToken::Produces => Err(LineErrorKind::RepeatedProduces),
            BnfToken::Unknown(raw) => Err(LineErrorKind::Unclassifiable(raw.clone())),
            BnfToken::Alt => Err(LineErrorKind::Unclassifiable("|".to_string())),
        })
        .collect()
}
