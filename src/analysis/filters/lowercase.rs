//! Converts each token into lowercase

use crate::analysis::Token;


pub struct LowercaseFilter<'a> {
    tokens: Box<dyn Iterator<Item=Token> + 'a>,
}


impl<'a> LowercaseFilter<'a> {
    pub fn new(tokens: Box<dyn Iterator<Item=Token> + 'a>) -> LowercaseFilter<'a> {
        LowercaseFilter {
            tokens: tokens,
        }
    }
}


impl<'a> Iterator for LowercaseFilter<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.next()?;

        Some(Token {
            term: token.term.to_lowercase(),
            position: token.position,
        })
    }
}


#[cfg(test)]
mod tests {
    use crate::analysis::Token;

    use super::LowercaseFilter;

    #[test]
    fn test_lowercase_filter() {
        let tokens = vec![
            Token::new("Dinner", 1),
            Token::new("APPT", 2),
        ];

        let token_filter = LowercaseFilter::new(Box::new(tokens.into_iter()));
        let tokens = token_filter.collect::<Vec<Token>>();

        assert_eq!(tokens, vec![
            Token::new("dinner", 1),
            Token::new("appt", 2),
        ]);
    }

    #[test]
    fn test_lowercase_filter_unicode() {
        let tokens = vec![Token::new("ÉTÉ", 1)];

        let tokens = LowercaseFilter::new(Box::new(tokens.into_iter())).collect::<Vec<Token>>();

        assert_eq!(tokens, vec![Token::new("été", 1)]);
    }
}
