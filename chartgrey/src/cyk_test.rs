use crate::bnf::compile_bnf;
use crate::cyk::{run_cyk, CykParser};
use crate::error::Error;
use crate::grammar::{Grammar, Rule, Symbol};
use expect_test::expect;
use serde_json::json;
use std::collections::BTreeSet;

fn cell(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn grammar_sentences() -> Grammar {
    compile_bnf("
        <S>  ::= <NP> <VP>
        <VP> ::= <V> <NP>
        <NP> ::= she | fish
        <V>  ::= eats
    ").unwrap()
}

///////////////////////////////////////////////////////////////////////////////

#[test]
fn cyk_spans() {
    let g = compile_bnf("<S> ::= <A> <B>\n<A> ::= a\n<B> ::= b\n").unwrap();
    let table = run_cyk(&g, &["a", "b"]).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.cell(1, 0), Some(&cell(&["A"])));
    assert_eq!(table.cell(1, 1), Some(&cell(&["B"])));
    assert_eq!(table.cell(2, 0), Some(&cell(&["S"])));
    assert_eq!(table.cell(2, 1), None);
    assert_eq!(table.cell(0, 0), None);
    assert_eq!(table.top(), table.cell(2, 0));
    assert!(table.accepts("S"));
    assert!(!table.accepts("A"));

    let table = run_cyk(&g, &["b", "a"]).unwrap();
    assert!(table.cell(2, 0).unwrap().is_empty());
    assert!(!table.accepts("S"));
}

#[test]
fn cells_are_sets() {
    // S -> SS | b, every span of b's is an S in several ways
    let g = compile_bnf("<S> ::= <S> <S> | b").unwrap();
    let table = CykParser::new(&g).unwrap().parse(&["b", "b", "b", "b"]);
    for (length, row) in table.rows().iter().enumerate() {
        assert_eq!(row.len(), 4 - length);
        assert!(row.iter().all(|c| *c == cell(&["S"])));
    }
    assert!(table.accepts("S"));
}

#[test]
fn cells_collect_every_nonterminal() {
    let g = compile_bnf("
        <S> ::= <X> <X>
        <X> ::= a
        <Y> ::= a
        <Z> ::= <X> <Y>
    ").unwrap();
    let table = run_cyk(&g, &["a", "a"]).unwrap();
    assert_eq!(table.cell(1, 1), Some(&cell(&["X", "Y"])));
    assert_eq!(table.top(), Some(&cell(&["S", "Z"])));
}

#[test]
fn rejects_non_normal_form() {
    let g = compile_bnf("<S> ::= <A> <B>\n<A> ::= a\n<B> ::= b c\n").unwrap();
    let err = run_cyk(&g, &["a", "b", "c"]).unwrap_err();
    assert_eq!(err, Error::NotNormalForm {
        index: 2,
        rule: Rule::new("B", vec![Symbol::terminal("b"), Symbol::terminal("c")]),
    });
    assert_eq!(err.to_string(), r#"Rule 2 is not in Chomsky normal form: B → "b" "c""#);

    // unit, epsilon and mixed rules aren't normal form either
    for source in ["<S> ::= <A>\n<A> ::= a", "<S> ::= ε", "<S> ::= <A> a\n<A> ::= a"] {
        let g = compile_bnf(source).unwrap();
        assert!(matches!(CykParser::new(&g), Err(Error::NotNormalForm { index: 0, .. })));
    }
}

#[test]
fn empty_input_and_grammar() {
    let table = run_cyk::<&str>(&grammar_sentences(), &[]).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.top(), None);
    assert!(!table.accepts("S"));

    let table = run_cyk(&Grammar::default(), &["a"]).unwrap();
    assert_eq!(table.cell(1, 0), Some(&BTreeSet::new()));
}

#[test]
fn table_display() {
    let g = grammar_sentences();
    let tokens = ["she", "eats", "fish"];
    let table = run_cyk(&g, &tokens).unwrap();
    assert!(table.accepts("S"));
    expect![[r#"
        3 | {S}  |
        2 | {}   | {VP} |
        1 | {NP} | {V}  | {NP} |
          | she  | eats | fish |
    "#]].assert_eq(&table.display(&tokens).to_string());
}

#[test]
fn serialized_shape() {
    let g = compile_bnf("<S> ::= <A> <B>\n<A> ::= a\n<B> ::= b\n").unwrap();
    let table = run_cyk(&g, &["a", "b"]).unwrap();
    assert_eq!(serde_json::to_value(&table).unwrap(), json!([[["A"], ["B"]], [["S"]]]));
}
