use lexers::DelimTokenizer;

/// Split `input` on runs of whitespace dropping empty segments.
pub fn tokenize(input: &str) -> Vec<String> {
    DelimTokenizer::whitespace(input.chars()).collect()
}
