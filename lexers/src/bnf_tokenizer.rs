use crate::char_scanner::unquote;
use crate::scanner::Scanner;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum BnfToken {
    /// `<name>`
    NonTerm(String),
    /// `"text"` or `'text'`, unquoted
    Quoted(String),
    /// Any other run of non-whitespace
    Word(String),
    /// `::=`, `->` or `→`
    Produces,
    /// `|`
    Alt,
    /// A lexeme that can't be classified (eg: unterminated `<` or quote)
    Unknown(String),
}

/// Lexes BNF production lines. `#` comments run until end of line.
pub struct BnfTokenizer<I: Iterator<Item = char>>(Scanner<I>);

impl<I: Iterator<Item = char>> BnfTokenizer<I> {
    pub fn new(src: I) -> Self {
        BnfTokenizer(Scanner::new(src))
    }

    fn scan_nonterm(&mut self) -> BnfToken {
        let s = &mut self.0;
        // '<' was already accepted
        while let Some(ch) = s.peek() {
            if ch == '>' {
                s.next();
                let raw = s.extract_string();
                let name = &raw[1..raw.len() - 1];
                if name.is_empty() {
                    return BnfToken::Unknown(raw);
                }
                return BnfToken::NonTerm(name.to_string());
            }
            if ch.is_whitespace() || ch == '<' || ch == '|' {
                break;
            }
            s.next();
        }
        BnfToken::Unknown(s.extract_string())
    }

    fn scan_quoted(&mut self, q: char) -> BnfToken {
        let s = &mut self.0;
        if let Some(quoted) = s.scan_quoted_string(q) {
            return BnfToken::Quoted(unquote(&quoted));
        }
        // swallow the rest of the line, the string never closes
        s.until_any(&['\n']);
        BnfToken::Unknown(s.extract_string())
    }
}

impl<I: Iterator<Item = char>> Iterator for BnfTokenizer<I> {
    type Item = BnfToken;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.0.skip_whitespace();
            // discard comments starting with '#' until new-line
            if self.0.accept(&'#').is_some() {
                self.0.until_any(&['\n']);
                self.0.ignore();
                continue;
            }
            break;
        }
        let s = &mut self.0;
        let backtrack = s.buffer_pos();
        match s.peek()? {
            '|' => {
                s.next();
                s.ignore();
                Some(BnfToken::Alt)
            }
            '→' => {
                s.next();
                s.ignore();
                Some(BnfToken::Produces)
            }
            ':' if s.accept(&':').is_some()
                && s.accept(&':').is_some()
                && s.accept(&'=').is_some() =>
            {
                s.ignore();
                Some(BnfToken::Produces)
            }
            '-' if s.accept(&'-').is_some() && s.accept(&'>').is_some() => {
                s.ignore();
                Some(BnfToken::Produces)
            }
            '<' => {
                s.next();
                Some(self.scan_nonterm())
            }
            q @ ('"' | '\'') => Some(self.scan_quoted(q)),
            _ => {
                s.set_buffer_pos(backtrack);
                s.scan_word(&['|']).map(BnfToken::Word)
            }
        }
    }
}
