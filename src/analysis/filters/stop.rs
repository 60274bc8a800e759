//! Drops common English words that carry no meaning on their own
//!
//! Positions of the surviving tokens are left alone, so gaps remain where stop words were.

use std::collections::HashSet;

use maplit::hashset;
use once_cell::sync::Lazy;

use crate::analysis::Token;


static ENGLISH_STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    hashset! {
        "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is",
        "it", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there",
        "these", "they", "this", "to", "was", "will", "with",
    }
});


pub fn is_stop_word(term: &str) -> bool {
    ENGLISH_STOP_WORDS.contains(term)
}


pub struct StopFilter<'a> {
    tokens: Box<dyn Iterator<Item=Token> + 'a>,
}


impl<'a> StopFilter<'a> {
    pub fn new(tokens: Box<dyn Iterator<Item=Token> + 'a>) -> StopFilter<'a> {
        StopFilter {
            tokens: tokens,
        }
    }
}


impl<'a> Iterator for StopFilter<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let token = self.tokens.next()?;

            if !is_stop_word(&token.term) {
                return Some(token);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use crate::analysis::Token;

    use super::StopFilter;

    #[test]
    fn test_stop_filter() {
        let tokens = vec![
            Token::new("review", 1),
            Token::new("the", 2),
            Token::new("list", 3),
        ];

        let tokens = StopFilter::new(Box::new(tokens.into_iter())).collect::<Vec<Token>>();

        assert_eq!(tokens, vec![
            Token::new("review", 1),
            Token::new("list", 3),
        ]);
    }

    #[test]
    fn test_stop_filter_drops_everything() {
        let tokens = vec![Token::new("a", 1)];

        assert_eq!(StopFilter::new(Box::new(tokens.into_iter())).count(), 0);
    }
}
