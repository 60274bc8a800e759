//! Text analysis used by text predicates
//!
//! The compiler only depends on the `Analyzer` trait. `StandardAnalyzer` is the analyzer the
//! binary and the tests use.

pub mod tokenizers;
pub mod filters;

use crate::operation::TextField;

use self::tokenizers::standard::StandardTokenizer;
use self::tokenizers::address::AddressTokenizer;
use self::filters::lowercase::LowercaseFilter;
use self::filters::stop::StopFilter;


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub term: String,
    pub position: u32,
}


impl Token {
    pub fn new(term: &str, position: u32) -> Token {
        Token {
            term: term.to_owned(),
            position: position,
        }
    }
}


/// Turns the text of a predicate into index terms
///
/// Must be deterministic: the same field and text always produce the same tokens.
pub trait Analyzer {
    fn tokenize(&self, field: TextField, text: &str) -> Vec<Token>;

    /// Like `tokenize`, but keeps stop words
    ///
    /// Positions must agree with the ones `tokenize` gives for the same text.
    fn tokenize_all(&self, field: TextField, text: &str) -> Vec<Token>;
}


/// Lowercases everything
///
/// Address-like fields (`from`, `to`, `cc`, `envfrom`, `envto`, `contact`) use the
/// address-safe tokenizer and keep stop words, other fields use the unicode word tokenizer
/// and drop them. Table-mapped fields (`type`, `attachment`, `has`) and structured fields
/// are not split at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAnalyzer;


impl StandardAnalyzer {
    pub fn new() -> StandardAnalyzer {
        StandardAnalyzer
    }

    fn token_stream<'a>(&self, field: TextField, text: &'a str, stop_words: bool) -> Box<dyn Iterator<Item=Token> + 'a> {
        match field {
            field if field.is_address() || field == TextField::Contact => {
                Box::new(LowercaseFilter::new(Box::new(AddressTokenizer::new(text))))
            }
            TextField::Attachments | TextField::Type | TextField::Objects | TextField::Field => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Box::new(None.into_iter())
                } else {
                    Box::new(Some(Token::new(&trimmed.to_lowercase(), 1)).into_iter())
                }
            }
            _ => {
                let tokens: Box<dyn Iterator<Item=Token> + 'a> = Box::new(LowercaseFilter::new(Box::new(StandardTokenizer::new(text))));

                if stop_words {
                    tokens
                } else {
                    Box::new(StopFilter::new(tokens))
                }
            }
        }
    }
}


impl Analyzer for StandardAnalyzer {
    fn tokenize(&self, field: TextField, text: &str) -> Vec<Token> {
        self.token_stream(field, text, false).collect()
    }

    fn tokenize_all(&self, field: TextField, text: &str) -> Vec<Token> {
        self.token_stream(field, text, true).collect()
    }
}
