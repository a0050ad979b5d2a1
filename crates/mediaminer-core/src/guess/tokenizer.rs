//! # Filename tokenizer
//!
//! Splits a file stem into tokens on `.` and space. Case and punctuation
//! inside a token are preserved so the title can be rebuilt verbatim.

/// A token extracted from a filename with positional information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// The token text, borrowed from the input
    pub text: &'a str,
    /// Start position in the original string
    pub start: usize,
    /// End position in the original string
    pub end: usize,
    /// Token index in the sequence
    pub index: usize,
}

/// Delimiter characters used for tokenization.
const DELIMITERS: &[char] = &['.', ' '];

/// Tokenizer for video filenames.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Create a new tokenizer instance.
    pub fn new() -> Self {
        Self
    }

    /// Tokenize a file stem into a sequence of non-empty tokens.
    ///
    /// # Examples
    /// ```
    /// use mediaminer_core::guess::Tokenizer;
    ///
    /// let tokens = Tokenizer::new().tokenize("Show.Name.S01E02");
    /// let texts: Vec<_> = tokens.iter().map(|t| t.text).collect();
    /// assert_eq!(texts, ["Show", "Name", "S01E02"]);
    /// ```
    pub fn tokenize<'a>(&self, input: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        let mut current_start = 0;

        for (idx, c) in input.char_indices() {
            if DELIMITERS.contains(&c) {
                if idx > current_start {
                    self.push(&mut tokens, input, current_start, idx);
                }
                current_start = idx + c.len_utf8();
            }
        }

        if current_start < input.len() {
            self.push(&mut tokens, input, current_start, input.len());
        }

        tokens
    }

    fn push<'a>(&self, tokens: &mut Vec<Token<'a>>, input: &'a str, start: usize, end: usize) {
        let index = tokens.len();
        tokens.push(Token {
            text: &input[start..end],
            start,
            end,
            index,
        });
    }
}
