#![deny(warnings)]

use crate::grammar::{Grammar, Rule, Symbol};
use serde::Serialize;
use std::fmt;

/// An EarleyItem is a partially matched `Rule`. `dot` shows the match progress.
/// Items are identified by all three fields, the reason is kept alongside.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct EarleyItem {
    pub rule: usize,   // index of the rule in its Grammar
    pub dot: usize,    // dot position within the rule
    pub origin: usize, // input position where the item starts
}

impl EarleyItem {
    pub fn new(rule: usize, dot: usize, origin: usize) -> Self {
        EarleyItem { rule, dot, origin }
    }

    /// Item for a rule that hasn't matched anything yet.
    pub fn predict_new(rule: usize, origin: usize) -> Self {
        EarleyItem { rule, dot: 0, origin }
    }

    /// Same item with the dot moved over the next symbol.
    pub fn advanced(&self) -> Self {
        EarleyItem { dot: self.dot + 1, ..*self }
    }

    pub fn production<'g>(&self, grammar: &'g Grammar) -> &'g Rule {
        &grammar.rules()[self.rule]
    }

    /// Item is complete if its Rule has been fully matched
    pub fn complete(&self, grammar: &Grammar) -> bool {
        self.dot >= self.production(grammar).rhs.len()
    }

    /// Exposes the next symbol in the progress of the Rule
    pub fn next_symbol<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
        self.production(grammar).rhs.get(self.dot)
    }

    pub fn display<'a>(&'a self, grammar: &'a Grammar) -> impl fmt::Display + 'a {
        ItemDisplay { item: self, grammar }
    }
}

struct ItemDisplay<'a> {
    item: &'a EarleyItem,
    grammar: &'a Grammar,
}

impl fmt::Display for ItemDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rule = self.item.production(self.grammar);
        write!(f, "({}, {})", rule.dotted(self.item.dot), self.item.origin)
    }
}

/// Why an item was added to the chart. Positions are StateSet indexes and
/// state indexes point into those StateSets (both 0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Reason {
    Initial,
    Predict {
        from_position: usize,
        from_state_index: usize,
        from_rule_index: usize,
    },
    Scan {
        from_position: usize,
        from_state_index: usize,
    },
    Complete {
        from_position: usize,
        from_state_index: usize,
        with_position: usize,
        with_state_index: usize,
    },
}

// Rendered with 1-based state and rule numbers
impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Reason::Initial => f.write_str("Start rule"),
            Reason::Predict { from_position, from_state_index, from_rule_index } => write!(
                f,
                "Predict from S({}) #{} with rule #{}",
                from_position,
                from_state_index + 1,
                from_rule_index + 1
            ),
            Reason::Scan { from_position, from_state_index } => {
                write!(f, "Scan from S({}) #{}", from_position, from_state_index + 1)
            }
            Reason::Complete {
                from_position,
                from_state_index,
                with_position,
                with_state_index,
            } => write!(
                f,
                "Complete from S({}) #{} with S({}) #{}",
                from_position,
                from_state_index + 1,
                with_position,
                with_state_index + 1
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ChartEntry {
    #[serde(flatten)]
    pub item: EarleyItem,
    pub reason: Reason,
}

///////////////////////////////////////////////////////////////////////////////
