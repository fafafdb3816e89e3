mod scanner;
mod char_scanner;
mod delim_tokenizer;
mod bnf_tokenizer;

pub use scanner::Scanner;
pub use char_scanner::unquote;
pub use delim_tokenizer::DelimTokenizer;
pub use bnf_tokenizer::{BnfToken, BnfTokenizer};
