#![deny(warnings)]

use crate::scanner::Scanner;

impl<I: Iterator<Item = char>> Scanner<I> {
    pub fn extract_string(&mut self) -> String {
        self.extract().into_iter().collect()
    }

    /// Skip and discard any whitespace ahead. Returns if anything was skipped.
    pub fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.next();
            skipped = true;
        }
        self.ignore();
        skipped
    }

    // scan a quoted string like "this is \"an\" example"
    pub fn scan_quoted_string(&mut self, q: char) -> Option<String> {
        let backtrack = self.buffer_pos();
        self.accept(&q)?;
        while let Some(n) = self.next() {
            if n == '\\' {
                self.next();
                continue;
            }
            if n == q {
                return Some(self.extract_string());
            }
        }
        self.set_buffer_pos(backtrack);
        None
    }

    // scan a run of non-whitespace chars that stops before any of `stops`
    pub fn scan_word(&mut self, stops: &[char]) -> Option<String> {
        let mut advanced = false;
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || stops.contains(&ch) {
                break;
            }
            self.next();
            advanced = true;
        }
        if advanced {
            Some(self.extract_string())
        } else {
            None
        }
    }
}

/// Strip the surrounding quotes of a scanned string and resolve escapes.
pub fn unquote(quoted: &str) -> String {
    let inner = quoted
        .get(1..quoted.len().saturating_sub(1))
        .unwrap_or_default();
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.extend(chars.next()),
            _ => out.push(ch),
        }
    }
    out
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_string() {
        let tests = vec![
            r"'this is a test'",
            r"'another test \' with an escaped quote'",
        ];
        for t in tests.iter() {
            let result = Scanner::new(t.chars()).scan_quoted_string('\'');
            assert_eq!(Some(t.to_string()), result);
        }
        assert_eq!(Scanner::new("'open".chars()).scan_quoted_string('\''), None);
    }

    #[test]
    fn scan_words() {
        let mut s = Scanner::new("  the|cat sat".chars());
        assert!(s.skip_whitespace());
        assert_eq!(s.scan_word(&['|']), Some("the".to_string()));
        assert_eq!(s.scan_word(&['|']), None);
        assert_eq!(s.accept(&'|'), Some('|'));
        s.ignore();
        assert_eq!(s.scan_word(&['|']), Some("cat".to_string()));
        assert!(s.skip_whitespace());
        assert_eq!(s.scan_word(&[]), Some("sat".to_string()));
        assert_eq!(s.next(), None);
    }

    #[test]
    fn unquoting() {
        assert_eq!(unquote(r#""a""#), "a");
        assert_eq!(unquote(r#""say \"hi\"""#), r#"say "hi""#);
        assert_eq!(unquote(r"'it\'s'"), "it's");
        assert_eq!(unquote("''"), "");
    }
}
