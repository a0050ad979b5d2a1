pub mod guesser;
pub mod tokenizer;

pub use guesser::{IdentityGuesser, file_stem_from_uri};
pub use tokenizer::{Token, Tokenizer};
