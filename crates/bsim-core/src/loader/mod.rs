pub mod tokenizer;

pub use tokenizer::{tokenize, Tokenizer};
