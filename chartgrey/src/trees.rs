use serde::Serialize;
use std::fmt;

/// Derivation of an accepted input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Tree {
    // "saw"
    Leaf(String),
    // ("VP → V NP", [Node("V → \"saw\"", [Leaf("saw")]), ...])
    Node(String, Vec<Tree>),
}

impl Tree {
    /// Scanned tokens from left to right.
    pub fn leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        let mut stack = vec![self];
        while let Some(tree) = stack.pop() {
            match tree {
                Tree::Leaf(token) => leaves.push(token.as_str()),
                Tree::Node(_, children) => stack.extend(children.iter().rev()),
            }
        }
        leaves
    }

    /// Longest path from this tree down to a leaf or an empty node.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((tree, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Tree::Node(_, children) = tree {
                stack.extend(children.iter().map(|c| (c, depth + 1)));
            }
        }
        deepest
    }

    fn print_helper(&self, level: &str, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Tree::Leaf(token) => writeln!(f, "{}`-- {:?}", level, token),
            Tree::Node(rule, children) => {
                writeln!(f, "{}`-- {}", level, rule)?;
                if let Some((last, rest)) = children.split_last() {
                    let l = format!("{}  |", level);
                    for n in rest {
                        n.print_helper(&l, f)?;
                    }
                    let l = format!("{}   ", level);
                    last.print_helper(&l, f)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.print_helper("", f)
    }
}
