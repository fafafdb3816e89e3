use crate::scanner::Scanner;

enum Delims {
    Chars(Vec<char>),
    Whitespace,
}

impl Delims {
    fn contains(&self, ch: &char) -> bool {
        match self {
            Delims::Chars(chars) => chars.contains(ch),
            Delims::Whitespace => ch.is_whitespace(),
        }
    }
}

// A tokenizer that splits input on each delimiter.
// With `remove` set delimiters are dropped, else they're tokens of their own.
pub struct DelimTokenizer<I: Iterator<Item = char>> {
    src: Scanner<I>,
    delims: Delims,
    remove: bool,
}

impl<I: Iterator<Item = char>> DelimTokenizer<I> {
    pub fn new(src: I, delims: &str, remove: bool) -> Self {
        DelimTokenizer {
            src: Scanner::new(src),
            delims: Delims::Chars(delims.chars().collect()),
            remove,
        }
    }

    /// Split on runs of whitespace, dropping empty segments.
    pub fn whitespace(src: I) -> Self {
        DelimTokenizer {
            src: Scanner::new(src),
            delims: Delims::Whitespace,
            remove: true,
        }
    }
}

impl<I: Iterator<Item = char>> Iterator for DelimTokenizer<I> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delims = &self.delims;
            if self.src.until_if(|ch| delims.contains(ch)) {
                return Some(self.src.extract_string());
            }
            let delim = self.src.accept_if(|ch| delims.contains(ch))?;
            self.src.ignore();
            if !self.remove {
                return Some(delim.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DelimTokenizer;

    #[test]
    fn keep_delimiters() {
        let tokens: Vec<_> = DelimTokenizer::new("1+(2*3)".chars(), "+*()", false).collect();
        assert_eq!(tokens, vec!["1", "+", "(", "2", "*", "3", ")"]);
    }

    #[test]
    fn drop_delimiters() {
        let tokens: Vec<_> = DelimTokenizer::new("b,,b,b".chars(), ",", true).collect();
        assert_eq!(tokens, vec!["b", "b", "b"]);
    }

    #[test]
    fn whitespace_runs() {
        let tokens: Vec<_> = DelimTokenizer::whitespace("  the \t dog\n barks  ".chars()).collect();
        assert_eq!(tokens, vec!["the", "dog", "barks"]);
        assert_eq!(DelimTokenizer::whitespace(" \n ".chars()).next(), None);
        assert_eq!(DelimTokenizer::whitespace("".chars()).next(), None);
    }

    #[test]
    fn unicode_whitespace() {
        let tokens: Vec<_> = DelimTokenizer::whitespace("a\u{2003}b\u{1680}c\u{a0} d".chars()).collect();
        assert_eq!(tokens, vec!["a", "b", "c", "d"]);
    }
}
