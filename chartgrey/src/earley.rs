#![deny(warnings)]

use crate::grammar::{Grammar, Symbol};
use crate::items::{ChartEntry, EarleyItem, Reason};
use crate::stateset::StateSet;
use crate::trees::Tree;
use log::{debug, trace};
use serde::Serialize;
use std::fmt;
use std::slice;

pub struct EarleyParser<'g> {
    grammar: &'g Grammar,
}

/// One StateSet per input position, `S(0)` before the first token and
/// `S(n)` after the last one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EarleyChart {
    sets: Vec<StateSet>,
}

/// Build the chart of `tokens` under `grammar`.
pub fn run_earley<T: AsRef<str>>(grammar: &Grammar, tokens: &[T]) -> EarleyChart {
    EarleyParser::new(grammar).parse(tokens)
}

///////////////////////////////////////////////////////////////////////////////

impl<'g> EarleyParser<'g> {
    pub fn new(grammar: &'g Grammar) -> EarleyParser<'g> {
        EarleyParser { grammar }
    }

    /// Build new `Prediction` items for every rule named `next_nonterm`.
    fn predictions(&self, next_nonterm: &str, k: usize, trigger: usize) -> Vec<(EarleyItem, Reason)> {
        self.grammar
            .rules_for(next_nonterm)
            .map(|(rule, _)| {
                let reason = Reason::Predict {
                    from_position: k,
                    from_state_index: trigger,
                    from_rule_index: rule,
                };
                (EarleyItem::predict_new(rule, k), reason)
            })
            .collect()
    }

    /// Advance items of `stateset` waiting on `lhs`. `from` is the position of
    /// `stateset`, `with` locates the completed item.
    fn completions(
        &self,
        stateset: &StateSet,
        lhs: &str,
        from: usize,
        with: (usize, usize),
    ) -> Vec<(EarleyItem, Reason)> {
        stateset
            .iter()
            .enumerate()
            .filter(|(_, entry)| match entry.item.next_symbol(self.grammar) {
                Some(Symbol::NonTerminal(name)) => name == lhs,
                _ => false,
            })
            .map(|(idx, entry)| {
                let reason = Reason::Complete {
                    from_position: from,
                    from_state_index: idx,
                    with_position: with.0,
                    with_state_index: with.1,
                };
                (entry.item.advanced(), reason)
            })
            .collect()
    }

    /// Completed items for `nonterm` that started at `k`, an epsilon
    /// derivation that was finished before somebody asked for it.
    fn nullable_completions(&self, stateset: &StateSet, nonterm: &str, k: usize) -> Vec<usize> {
        stateset
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                entry.item.origin == k
                    && entry.item.complete(self.grammar)
                    && entry.item.production(self.grammar).lhs == nonterm
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    fn insert(&self, stateset: &mut StateSet, k: usize, item: EarleyItem, reason: Reason) {
        if let Some(idx) = stateset.push(item, reason) {
            trace!("S({}) #{} {} {}", k, idx + 1, item.display(self.grammar), reason);
        }
    }

    pub fn parse<T: AsRef<str>>(&self, tokens: &[T]) -> EarleyChart {
        let n = tokens.len();
        let mut sets: Vec<StateSet> = (0..=n).map(|_| StateSet::new()).collect();

        // Populate S0, add items for each rule matching the start symbol
        if let Some(start) = self.grammar.start_symbol() {
            for (rule, _) in self.grammar.rules_for(start) {
                self.insert(&mut sets[0], 0, EarleyItem::predict_new(rule, 0), Reason::Initial);
            }
        }

        for k in 0..=n {
            let lexeme = tokens.get(k).map(AsRef::as_ref);
            // StateSet k is a worklist, items appended while processing are
            // processed as well until nothing new shows up
            let mut idx = 0;
            while idx < sets[k].len() {
                let item = sets[k][idx].item;
                match item.next_symbol(self.grammar) {
                    Some(Symbol::NonTerminal(name)) => {
                        for (new_item, reason) in self.predictions(name, k, idx) {
                            self.insert(&mut sets[k], k, new_item, reason);
                        }
                        for done in self.nullable_completions(&sets[k], name, k) {
                            let reason = Reason::Complete {
                                from_position: k,
                                from_state_index: idx,
                                with_position: k,
                                with_state_index: done,
                            };
                            self.insert(&mut sets[k], k, item.advanced(), reason);
                        }
                    }
                    Some(terminal @ Symbol::Terminal(_)) => {
                        // Scans populate the next StateSet
                        if lexeme.is_some_and(|lexeme| terminal.matches(lexeme)) {
                            let reason = Reason::Scan { from_position: k, from_state_index: idx };
                            self.insert(&mut sets[k + 1], k + 1, item.advanced(), reason);
                        }
                    }
                    None => {
                        let lhs = &item.production(self.grammar).lhs;
                        let new_items = self.completions(&sets[item.origin], lhs, item.origin, (k, idx));
                        for (new_item, reason) in new_items {
                            self.insert(&mut sets[k], k, new_item, reason);
                        }
                    }
                }
                idx += 1;
            }
            debug!("S({}): {} items", k, sets[k].len());
        }

        EarleyChart { sets }
    }
}

///////////////////////////////////////////////////////////////////////////////

impl EarleyChart {
    /// Number of StateSets, always the token count plus one.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn state_set(&self, k: usize) -> Option<&StateSet> {
        self.sets.get(k)
    }

    pub fn iter(&self) -> slice::Iter<'_, StateSet> {
        self.sets.iter()
    }

    /// Entries of the last StateSet that complete the start symbol from the
    /// very beginning of the input, along with their index.
    pub fn accepting<'a>(&'a self, grammar: &'a Grammar) -> Vec<(usize, &'a ChartEntry)> {
        let (Some(last), Some(start)) = (self.sets.last(), grammar.start_symbol()) else {
            return Vec::new();
        };
        last.iter()
            .enumerate()
            .filter(|(_, entry)| {
                entry.item.origin == 0
                    && entry.item.complete(grammar)
                    && entry.item.production(grammar).lhs == start
            })
            .collect()
    }

    pub fn is_accepted(&self, grammar: &Grammar) -> bool {
        !self.accepting(grammar).is_empty()
    }

    /// Rebuild the derivation of the first accepting item following the
    /// first discovered Reason of each entry.
    pub fn derivation(&self, grammar: &Grammar) -> Option<Tree> {
        let (idx, _) = self.accepting(grammar).into_iter().next()?;
        // explicit stack, derivations can be as deep as the input is long
        let mut stack = vec![self.frame(grammar, self.sets.len() - 1, idx)];
        while let Some(top) = stack.last_mut() {
            match top.pending.next() {
                Some(Child::Leaf(token)) => top.done.push(Tree::Leaf(token)),
                Some(Child::Node(k, idx)) => {
                    let frame = self.frame(grammar, k, idx);
                    stack.push(frame);
                }
                None => {
                    let frame = stack.pop()?;
                    let tree = Tree::Node(frame.rule, frame.done);
                    match stack.last_mut() {
                        Some(parent) => parent.done.push(tree),
                        None => return Some(tree),
                    }
                }
            }
        }
        None
    }

    fn frame(&self, grammar: &Grammar, k: usize, idx: usize) -> Frame {
        let rule = self.sets[k][idx].item.production(grammar).to_string();
        Frame { rule, pending: self.walker(grammar, k, idx).into_iter(), done: Vec::new() }
    }

    // Walks back along the rule's own dots. Reasons always point at entries
    // inserted earlier, so the walk stops at the item that started the rule.
    fn walker(&self, grammar: &Grammar, mut k: usize, mut idx: usize) -> Vec<Child> {
        let mut children = Vec::new();
        loop {
            let entry = &self.sets[k][idx];
            match entry.reason {
                Reason::Initial | Reason::Predict { .. } => break,
                Reason::Scan { from_position, from_state_index } => {
                    let scanned = &entry.item.production(grammar).rhs[entry.item.dot - 1];
                    children.push(Child::Leaf(scanned.name().to_string()));
                    k = from_position;
                    idx = from_state_index;
                }
                Reason::Complete {
                    from_position,
                    from_state_index,
                    with_position,
                    with_state_index,
                } => {
                    children.push(Child::Node(with_position, with_state_index));
                    k = from_position;
                    idx = from_state_index;
                }
            }
        }
        children.reverse();
        children
    }

    pub fn display<'a>(&'a self, grammar: &'a Grammar) -> impl fmt::Display + 'a {
        ChartDisplay { chart: self, grammar }
    }
}

impl<'a> IntoIterator for &'a EarleyChart {
    type Item = &'a StateSet;
    type IntoIter = slice::Iter<'a, StateSet>;
    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}

// A child of a derivation node still to be built.
enum Child {
    Leaf(String),
    Node(usize, usize),
}

struct Frame {
    rule: String,
    pending: std::vec::IntoIter<Child>,
    done: Vec<Tree>,
}

struct ChartDisplay<'a> {
    chart: &'a EarleyChart,
    grammar: &'a Grammar,
}

impl fmt::Display for ChartDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let accepting: Vec<usize> = self.chart.accepting(self.grammar)
            .into_iter()
            .map(|(idx, _)| idx)
            .collect();
        let last = self.chart.len().saturating_sub(1);
        for (k, stateset) in self.chart.iter().enumerate() {
            writeln!(f, "S({}):", k)?;
            for (idx, entry) in stateset.iter().enumerate() {
                let mark = if k == last && accepting.contains(&idx) { '*' } else { ' ' };
                writeln!(
                    f,
                    "{} #{}  {}  {}",
                    mark,
                    idx + 1,
                    entry.item.display(self.grammar),
                    entry.reason
                )?;
            }
        }
        Ok(())
    }
}
