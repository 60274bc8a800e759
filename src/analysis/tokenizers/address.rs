//! Splits strings into email-address-safe tokens
//!
//! Unlike the standard tokenizer, `@`, `.`, `-`, `_`, `+` and `'` stay inside a token, so
//! `john.smith@example.com` comes out whole.

use std::str::CharIndices;

use crate::analysis::Token;


fn is_address_char(c: char) -> bool {
    c.is_alphanumeric() || "@.-_+'&".contains(c)
}


pub struct AddressTokenizer<'a> {
    input: &'a str,
    chars: CharIndices<'a>,
    position_counter: u32,
}


impl<'a> AddressTokenizer<'a> {
    pub fn new(input: &'a str) -> AddressTokenizer<'a> {
        AddressTokenizer {
            input: input,
            chars: input.char_indices(),
            position_counter: 0,
        }
    }
}


impl<'a> Iterator for AddressTokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let start = loop {
            let (offset, c) = self.chars.next()?;
            if is_address_char(c) {
                break offset;
            }
        };

        let mut end = self.input.len();
        for (offset, c) in self.chars.by_ref() {
            if !is_address_char(c) {
                end = offset;
                break;
            }
        }

        // Dots and dashes at the edges are punctuation, not part of the address
        let word = self.input[start..end].trim_matches(|c| c == '.' || c == '-');
        if word.is_empty() {
            return self.next();
        }

        self.position_counter += 1;
        Some(Token::new(word, self.position_counter))
    }
}
