use crate::bnf::{compile_bnf, compile_bnf_partial};
use crate::cyk::{CykTable, run_cyk};
use crate::earley::{EarleyChart, run_earley};
use crate::error::Error;
use crate::grammar::Grammar;
use crate::tokenizer::tokenize;
use crate::trees::Tree;
use log::debug;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Earley,
    Cyk,
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "earley" => Ok(Algorithm::Earley),
            "cyk" => Ok(Algorithm::Cyk),
            _ => Err(Error::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Algorithm::Earley => f.write_str("earley"),
            Algorithm::Cyk => f.write_str("cyk"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub algorithm: Algorithm,
    /// Parse with the rules of well-formed lines even if some are malformed.
    pub lenient: bool,
}

/// Compiles, tokenizes and parses in one go. Holds no state between runs.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    config: EngineConfig,
}

/// Chart or table built by the configured algorithm.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "algorithm", content = "result", rename_all = "lowercase")]
pub enum Parse {
    Earley(EarleyChart),
    Cyk(CykTable),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub grammar: Grammar,
    pub tokens: Vec<String>,
    /// Absent when the grammar has no rules.
    pub parse: Option<Parse>,
    pub accepted: bool,
}

///////////////////////////////////////////////////////////////////////////////

impl Engine {
    pub fn new(config: EngineConfig) -> Engine {
        Engine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn compile(&self, bnf: &str) -> Result<Grammar, Error> {
        if !self.config.lenient {
            return Ok(compile_bnf(bnf)?);
        }
        let (grammar, errors) = compile_bnf_partial(bnf);
        if !errors.is_empty() {
            debug!("Keeping {} rules despite {} malformed lines", grammar.len(), errors.len());
        }
        Ok(grammar)
    }

    pub fn run(&self, bnf: &str, input: &str) -> Result<Outcome, Error> {
        let grammar = self.compile(bnf)?;
        let tokens = tokenize(input);
        if grammar.is_empty() {
            return Ok(Outcome { grammar, tokens, parse: None, accepted: false });
        }
        let (parse, accepted) = match self.config.algorithm {
            Algorithm::Earley => {
                let chart = run_earley(&grammar, &tokens);
                let accepted = chart.is_accepted(&grammar);
                (Parse::Earley(chart), accepted)
            }
            Algorithm::Cyk => {
                let table = run_cyk(&grammar, &tokens)?;
                let accepted = grammar.start_symbol().is_some_and(|start| table.accepts(start));
                (Parse::Cyk(table), accepted)
            }
        };
        debug!("{} parse of {} tokens, accepted: {}", self.config.algorithm, tokens.len(), accepted);
        Ok(Outcome { grammar, tokens, parse: Some(parse), accepted })
    }
}

impl Outcome {
    /// Derivation of the input, only Earley charts keep enough to build one.
    pub fn derivation(&self) -> Option<Tree> {
        match &self.parse {
            Some(Parse::Earley(chart)) => chart.derivation(&self.grammar),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.grammar)?;
        match &self.parse {
            None => writeln!(f, "No rules to parse with")?,
            Some(Parse::Earley(chart)) => {
                writeln!(f, "{}", chart.display(&self.grammar))?;
                if let Some(tree) = self.derivation() {
                    writeln!(f, "{}", tree)?;
                }
            }
            Some(Parse::Cyk(table)) => writeln!(f, "{}", table.display(&self.tokens))?,
        }
        writeln!(f, "{}", if self.accepted { "Accepted" } else { "Rejected" })
    }
}

#[cfg(test)]
mod tests {
    use super::{Algorithm, Engine, EngineConfig, Parse};
    use crate::error::Error;

    const GRAMMAR: &str = "
        <S> ::= <A> <B>
        <A> ::= a
        <B> ::= b
    ";

    #[test]
    fn algorithm_names() {
        assert_eq!("earley".parse::<Algorithm>(), Ok(Algorithm::Earley));
        assert_eq!("CYK".parse::<Algorithm>(), Ok(Algorithm::Cyk));
        assert_eq!(
            "glr".parse::<Algorithm>(),
            Err(Error::UnsupportedAlgorithm("glr".to_string()))
        );
        assert_eq!(Algorithm::Cyk.to_string(), "cyk");
    }

    #[test]
    fn run_both_engines() {
        let earley = Engine::default().run(GRAMMAR, "a b").unwrap();
        assert!(earley.accepted);
        assert_eq!(earley.tokens, vec!["a", "b"]);
        assert!(matches!(earley.parse, Some(Parse::Earley(_))));
        assert_eq!(earley.derivation().unwrap().leaves(), vec!["a", "b"]);

        let cyk = Engine::new(EngineConfig { algorithm: Algorithm::Cyk, lenient: false });
        let outcome = cyk.run(GRAMMAR, "a b").unwrap();
        assert!(outcome.accepted);
        assert!(outcome.derivation().is_none());
        assert!(!cyk.run(GRAMMAR, "b a").unwrap().accepted);
    }

    #[test]
    fn empty_grammar_has_nothing_to_parse() {
        let outcome = Engine::default().run("  \n# nothing yet\n", "a b").unwrap();
        assert!(outcome.grammar.is_empty());
        assert_eq!(outcome.parse, None);
        assert!(!outcome.accepted);
        assert!(outcome.to_string().ends_with("No rules to parse with\nRejected\n"));
    }

    #[test]
    fn strict_and_lenient_compiles() {
        let source = "<S> ::= a\n<S> b\n";
        let strict = Engine::default().run(source, "a");
        assert!(matches!(strict, Err(Error::Bnf(ref err)) if err.errors.len() == 1));

        let lenient = Engine::new(EngineConfig { algorithm: Algorithm::Earley, lenient: true });
        let outcome = lenient.run(source, "a").unwrap();
        assert_eq!(outcome.grammar.len(), 1);
        assert!(outcome.accepted);
    }

    #[test]
    fn cyk_needs_normal_form() {
        let cyk = Engine::new(EngineConfig { algorithm: Algorithm::Cyk, lenient: false });
        let err = cyk.run("<S> ::= <A> | a\n<A> ::= a\n", "a").unwrap_err();
        assert_eq!(err.to_string(), "Rule 0 is not in Chomsky normal form: S → A");
    }
}
