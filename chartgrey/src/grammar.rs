use crate::error::Error;
use log::trace;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Symbol {
    Terminal(String),
    NonTerminal(String),
}

impl Symbol {
    pub fn terminal(text: impl Into<String>) -> Self {
        Symbol::Terminal(text.into())
    }

    pub fn nonterm(name: impl Into<String>) -> Self {
        Symbol::NonTerminal(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Symbol::Terminal(text) => text,
            Symbol::NonTerminal(name) => name,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }

    /// Terminals match a token of identical text, NonTerminals never do.
    pub fn matches(&self, token: &str) -> bool {
        match self {
            Symbol::Terminal(text) => text == token,
            Symbol::NonTerminal(_) => false,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Symbol::Terminal(text) => write!(f, "{:?}", text),
            Symbol::NonTerminal(name) => f.write_str(name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rule {
    pub lhs: String,
    pub rhs: Vec<Symbol>,
}

impl Rule {
    pub fn new(lhs: impl Into<String>, rhs: Vec<Symbol>) -> Self {
        Rule { lhs: lhs.into(), rhs }
    }

    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }

    /// Is the rule either `A -> B C` or `A -> t`
    pub fn is_normal_form(&self) -> bool {
        match self.rhs.as_slice() {
            [Symbol::Terminal(_)] => true,
            [Symbol::NonTerminal(_), Symbol::NonTerminal(_)] => true,
            _ => false,
        }
    }

    /// Render the rule with a progress marker before the `dot`-th symbol.
    pub fn dotted(&self, dot: usize) -> DottedRule<'_> {
        DottedRule { rule: self, dot }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} →", self.lhs)?;
        if self.rhs.is_empty() {
            return f.write_str(" ε");
        }
        for symbol in &self.rhs {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}

pub struct DottedRule<'r> {
    rule: &'r Rule,
    dot: usize,
}

impl fmt::Display for DottedRule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} →", self.rule.lhs)?;
        for (idx, symbol) in self.rule.rhs.iter().enumerate() {
            if idx == self.dot {
                f.write_str(" \u{00b7}")?;
            }
            write!(f, " {}", symbol)?;
        }
        if self.dot >= self.rule.rhs.len() {
            f.write_str(" \u{00b7}")?;
        }
        Ok(())
    }
}

/// Rules in declaration order. The head of the first rule is the start symbol.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Grammar {
    rules: Vec<Rule>,
    start_symbol: Option<String>,
}

impl Grammar {
    pub fn new(rules: Vec<Rule>) -> Self {
        Grammar {
            start_symbol: rules.first().map(|rule| rule.lhs.clone()),
            rules,
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule(&self, idx: usize) -> Option<&Rule> {
        self.rules.get(idx)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn start_symbol(&self) -> Option<&str> {
        self.start_symbol.as_deref()
    }

    /// Rules with `lhs` as their head along with their index in the grammar.
    pub fn rules_for<'a>(&'a self, lhs: &'a str) -> impl Iterator<Item = (usize, &'a Rule)> + 'a {
        self.rules
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.lhs == lhs)
    }

    /// NonTerminal names in order of first appearance.
    pub fn nonterminals(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for rule in &self.rules {
            let rhs_names = rule.rhs.iter().filter_map(|s| match s {
                Symbol::NonTerminal(name) => Some(name.as_str()),
                Symbol::Terminal(_) => None,
            });
            for name in std::iter::once(rule.lhs.as_str()).chain(rhs_names) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// First rule that is neither `A -> B C` nor `A -> t`.
    pub fn normal_form_violation(&self) -> Option<(usize, &Rule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| !rule.is_normal_form())
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use std::collections::hash_map::Entry;
        let mut group_order = Vec::new();
        let mut rule_groups = HashMap::new();
        for r in &self.rules {
            match rule_groups.entry(&r.lhs) {
                Entry::Vacant(e) => {
                    group_order.push(&r.lhs);
                    e.insert(Vec::new()).push(r);
                }
                Entry::Occupied(mut e) => e.get_mut().push(r),
            }
        }
        writeln!(f, "Start: {}", self.start_symbol().unwrap_or("-"))?;
        for head in group_order {
            writeln!(f)?;
            for rule in &rule_groups[head] {
                writeln!(f, "{}", rule)?;
            }
        }
        Ok(())
    }
}

/// Builds a Grammar rejecting rules that were already declared.
#[derive(Default)]
pub struct GrammarBuilder {
    rules: Vec<Rule>,
    error: Option<Error>,
}

impl GrammarBuilder {
    pub fn rule(mut self, lhs: &str, rhs: &[Symbol]) -> Self {
        if let Err(err) = self.rule_try(Rule::new(lhs, rhs.to_vec())) {
            self.error.get_or_insert(err);
        }
        self
    }

    /// Register a rule, returning its index in the grammar.
    pub fn rule_try(&mut self, rule: Rule) -> Result<usize, Error> {
        if self.rules.contains(&rule) {
            return Err(Error::DuplicateRule(rule));
        }
        trace!("Adding rule #{}: {}", self.rules.len() + 1, rule);
        self.rules.push(rule);
        Ok(self.rules.len() - 1)
    }

    pub fn into_grammar(self) -> Result<Grammar, Error> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(Grammar::new(self.rules)),
        }
    }

    /// Grammar of every accepted rule, ignoring any registration errors.
    pub fn into_partial_grammar(self) -> Grammar {
        Grammar::new(self.rules)
    }
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{Grammar, GrammarBuilder, Rule, Symbol};
    use crate::error::Error;
    use std::collections::HashSet;

    fn t(text: &str) -> Symbol {
        Symbol::terminal(text)
    }

    fn nt(name: &str) -> Symbol {
        Symbol::nonterm(name)
    }

    #[test]
    fn symbol_check_eq_hash() {
        assert_ne!(t("X"), nt("X"));
        assert_eq!(t("X"), Symbol::Terminal("X".to_string()));
        // Check that term and non-term of equal name are not the same
        let mut m = HashSet::new();
        m.insert(nt("X"));
        m.insert(t("X"));
        m.insert(t("X"));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn symbol_terminal_matches() {
        assert!(t("saw").matches("saw"));
        assert!(!t("saw").matches("Saw"));
        assert!(!nt("saw").matches("saw"));
        assert_eq!(t("uint").name(), "uint");
    }

    #[test]
    fn rule_display() {
        let rule = Rule::new("S", vec![nt("A"), t("b")]);
        assert_eq!(rule.to_string(), r#"S → A "b""#);
        assert_eq!(rule.dotted(0).to_string(), r#"S → · A "b""#);
        assert_eq!(rule.dotted(1).to_string(), r#"S → A · "b""#);
        assert_eq!(rule.dotted(2).to_string(), r#"S → A "b" ·"#);
        let eps = Rule::new("X", vec![]);
        assert!(eps.is_epsilon());
        assert_eq!(eps.to_string(), "X → ε");
        assert_eq!(eps.dotted(0).to_string(), "X → ·");
    }

    #[test]
    fn build_grammar() {
        let g = GrammarBuilder::default()
            .rule("Sum", &[nt("Sum"), t("+"), nt("Num")])
            .rule("Sum", &[nt("Num")])
            .rule("Num", &[t("1")])
            .into_grammar()
            .unwrap();
        assert_eq!(g.len(), 3);
        assert_eq!(g.start_symbol(), Some("Sum"));
        assert_eq!(g.rules_for("Sum").map(|(idx, _)| idx).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(g.rules_for("Num").count(), 1);
        assert_eq!(g.rules_for("Nope").count(), 0);
        assert_eq!(g.nonterminals(), vec!["Sum", "Num"]);
        assert_eq!(g.rule(2), Some(&Rule::new("Num", vec![t("1")])));
        assert_eq!(g.rule(3), None);
    }

    #[test]
    fn grammar_has_dup_rule() {
        let g = GrammarBuilder::default()
            .rule("Sum", &[nt("Sum"), t("+"), nt("Num")])
            .rule("Sum", &[nt("Sum"), t("+"), nt("Num")])
            .rule("Sum", &[nt("Num")])
            .into_grammar();
        assert_eq!(g.unwrap_err().to_string(), r#"Duplicate Rule: Sum → Sum "+" Num"#);
    }

    #[test]
    fn partial_grammar_keeps_first_rules() {
        let mut gb = GrammarBuilder::default();
        assert_eq!(gb.rule_try(Rule::new("S", vec![t("a")])), Ok(0));
        assert_eq!(
            gb.rule_try(Rule::new("S", vec![t("a")])),
            Err(Error::DuplicateRule(Rule::new("S", vec![t("a")])))
        );
        assert_eq!(gb.rule_try(Rule::new("S", vec![])), Ok(1));
        assert_eq!(gb.into_partial_grammar().len(), 2);
    }

    #[test]
    fn empty_grammar() {
        let g = Grammar::new(vec![]);
        assert!(g.is_empty());
        assert_eq!(g.start_symbol(), None);
        assert_eq!(g, Grammar::default());
        assert_eq!(g.to_string(), "Start: -\n");
    }

    #[test]
    fn normal_form() {
        let g = GrammarBuilder::default()
            .rule("S", &[nt("A"), nt("B")])
            .rule("A", &[t("a")])
            .rule("B", &[t("b"), nt("A")])
            .into_grammar()
            .unwrap();
        let (idx, rule) = g.normal_form_violation().unwrap();
        assert_eq!(idx, 2);
        assert_eq!(rule.lhs, "B");
        assert!(Grammar::default().normal_form_violation().is_none());
    }

    #[test]
    fn grouped_display() {
        let g = Grammar::new(vec![
            Rule::new("S", vec![nt("A")]),
            Rule::new("A", vec![t("a")]),
            Rule::new("S", vec![]),
        ]);
        assert_eq!(g.to_string(), "Start: S\n\nS → A\nS → ε\n\nA → \"a\"\n");
    }
}
