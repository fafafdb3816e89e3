use crate::error::Error;
use crate::grammar::{Grammar, Symbol};
use log::{debug, trace};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// The two rule shapes the table builder understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CnfRule<'g> {
    // A -> t
    Unary { lhs: &'g str, terminal: &'g str },
    // A -> B C
    Binary { lhs: &'g str, left: &'g str, right: &'g str },
}

/// Bottom-up recognizer for grammars in Chomsky normal form.
pub struct CykParser<'g> {
    rules: Vec<CnfRule<'g>>,
}

/// Triangular table of derivable NonTerminals. Row `L - 1` holds the
/// `n - L + 1` cells of spans of length `L`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CykTable {
    rows: Vec<Vec<BTreeSet<String>>>,
}

/// Fill the table of `tokens`, failing if `grammar` is not in normal form.
pub fn run_cyk<T: AsRef<str>>(grammar: &Grammar, tokens: &[T]) -> Result<CykTable, Error> {
    Ok(CykParser::new(grammar)?.parse(tokens))
}

///////////////////////////////////////////////////////////////////////////////

impl<'g> CykParser<'g> {
    /// Every rule must be either `A -> B C` or `A -> t`, the first one that
    /// isn't is reported.
    pub fn new(grammar: &'g Grammar) -> Result<CykParser<'g>, Error> {
        let rules = grammar
            .rules()
            .iter()
            .enumerate()
            .map(|(index, rule)| match rule.rhs.as_slice() {
                [Symbol::Terminal(terminal)] => Ok(CnfRule::Unary { lhs: &rule.lhs, terminal }),
                [Symbol::NonTerminal(left), Symbol::NonTerminal(right)] => {
                    Ok(CnfRule::Binary { lhs: &rule.lhs, left, right })
                }
                _ => Err(Error::NotNormalForm { index, rule: rule.clone() }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CykParser { rules })
    }

    pub fn parse<T: AsRef<str>>(&self, tokens: &[T]) -> CykTable {
        let n = tokens.len();
        let mut rows: Vec<Vec<BTreeSet<String>>> = Vec::with_capacity(n);
        for length in 1..=n {
            let mut row = vec![BTreeSet::new(); n - length + 1];
            for (start, cell) in row.iter_mut().enumerate() {
                if length == 1 {
                    self.fill_terminal(cell, tokens[start].as_ref());
                } else {
                    self.fill_span(cell, &rows, length, start);
                }
                if !cell.is_empty() {
                    trace!("cell({}, {}) = {:?}", length, start, cell);
                }
            }
            rows.push(row);
        }
        debug!("CYK table for {} tokens", n);
        CykTable { rows }
    }

    fn fill_terminal(&self, cell: &mut BTreeSet<String>, token: &str) {
        for rule in &self.rules {
            if let CnfRule::Unary { lhs, terminal } = *rule {
                if terminal == token {
                    cell.insert(lhs.to_string());
                }
            }
        }
    }

    // split the span into [start, start + m) and [start + m, start + length)
    fn fill_span(&self, cell: &mut BTreeSet<String>, rows: &[Vec<BTreeSet<String>>], length: usize, start: usize) {
        for rule in &self.rules {
            let CnfRule::Binary { lhs, left, right } = *rule else {
                continue;
            };
            let derivable = (1..length).any(|m| {
                rows[m - 1][start].contains(left) && rows[length - m - 1][start + m].contains(right)
            });
            if derivable {
                cell.insert(lhs.to_string());
            }
        }
    }
}

///////////////////////////////////////////////////////////////////////////////

impl CykTable {
    /// Number of tokens the table spans.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// NonTerminals deriving tokens `[start, start + length)`.
    pub fn cell(&self, length: usize, start: usize) -> Option<&BTreeSet<String>> {
        self.rows.get(length.checked_sub(1)?)?.get(start)
    }

    pub fn rows(&self) -> &[Vec<BTreeSet<String>>] {
        &self.rows
    }

    /// The cell spanning the whole input.
    pub fn top(&self) -> Option<&BTreeSet<String>> {
        self.rows.last()?.first()
    }

    pub fn accepts(&self, start_symbol: &str) -> bool {
        self.top().is_some_and(|cell| cell.contains(start_symbol))
    }

    pub fn display<'a, T: AsRef<str>>(&'a self, tokens: &'a [T]) -> impl fmt::Display + 'a {
        TableDisplay { table: self, tokens }
    }
}

struct TableDisplay<'a, T> {
    table: &'a CykTable,
    tokens: &'a [T],
}

fn render_cell(cell: &BTreeSet<String>) -> String {
    let names: Vec<&str> = cell.iter().map(String::as_str).collect();
    format!("{{{}}}", names.join(", "))
}

impl<T: AsRef<str>> fmt::Display for TableDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cells: Vec<Vec<String>> = self.table.rows
            .iter()
            .map(|row| row.iter().map(render_cell).collect())
            .collect();
        let token = |i: usize| self.tokens.get(i).map_or("", |t| t.as_ref());
        // columns are as wide as their widest cell or token
        let mut widths: Vec<usize> = (0..self.table.len()).map(|i| token(i).chars().count()).collect();
        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
        let label = self.table.len().to_string().len();
        for (length, row) in cells.iter().enumerate().rev() {
            write!(f, "{:>label$} |", length + 1, label = label)?;
            for (i, cell) in row.iter().enumerate() {
                write!(f, " {:<w$} |", cell, w = widths[i])?;
            }
            writeln!(f)?;
        }
        write!(f, "{:>label$} |", "", label = label)?;
        for (i, w) in widths.iter().enumerate() {
            write!(f, " {:<w$} |", token(i), w = *w)?;
        }
        writeln!(f)
    }
}
