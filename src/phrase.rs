//! Turns free text into the term, phrase or prefix structure the index is queried with

use crate::analysis::{Analyzer, Token};
use crate::error::QueryError;
use crate::operation::{Operation, IndexQuery, PhraseTerm, TextField};


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhraseShape {
    /// The analyzer discarded everything
    Empty,
    Term(String),
    Phrase(Vec<PhraseTerm>),
    Prefix {
        leading: Vec<PhraseTerm>,
        prefix: PhraseTerm,
    },
}


/// Strips the trailing wildcard off `text`
///
/// Returns the remaining text and whether a wildcard was present. A `*` anywhere other than
/// the very end cannot be expressed as a prefix match and is rejected.
pub fn split_wildcard(text: &str) -> Result<(&str, bool), QueryError> {
    let trimmed = text.trim_end();
    let body = trimmed.trim_end_matches('*');

    if body.contains('*') {
        return Err(QueryError::MisplacedWildcard(text.to_owned()));
    }

    Ok((body, body.len() < trimmed.len()))
}


fn phrase_terms(tokens: &[Token], start: u32) -> Vec<PhraseTerm> {
    tokens.iter().map(|token| PhraseTerm::new(token.position - start, &token.term)).collect()
}


impl PhraseShape {
    /// Analyzes `text` for `field`
    ///
    /// `quick` expands the final token as a prefix even without a trailing `*`. The prefix
    /// is never dropped as a stop word.
    pub fn build(analyzer: &dyn Analyzer, field: TextField, text: &str, quick: bool) -> Result<PhraseShape, QueryError> {
        let (body, wildcard) = split_wildcard(text)?;
        let tokens = analyzer.tokenize(field, body);

        if wildcard || quick {
            let last = match analyzer.tokenize_all(field, body).pop() {
                Some(last) => last,
                None => return Ok(PhraseShape::Empty),
            };

            let leading = tokens.into_iter().filter(|token| token.position < last.position).collect::<Vec<Token>>();
            let start = leading.first().map_or(last.position, |token| token.position);

            return Ok(PhraseShape::Prefix {
                leading: phrase_terms(&leading, start),
                prefix: PhraseTerm::new(last.position - start, &last.term),
            });
        }

        match tokens.len() {
            0 => Ok(PhraseShape::Empty),
            1 => Ok(PhraseShape::Term(tokens[0].term.clone())),
            _ => Ok(PhraseShape::Phrase(phrase_terms(&tokens, tokens[0].position))),
        }
    }

    pub fn into_operation(self, field: TextField, truth: bool) -> Operation {
        let query = match self {
            PhraseShape::Empty => return Operation::Unconstrained,
            PhraseShape::Term(term) => IndexQuery::Term(term),
            PhraseShape::Phrase(terms) => IndexQuery::Phrase(terms),
            PhraseShape::Prefix { leading, prefix } => IndexQuery::PrefixPhrase {
                leading: leading,
                prefix: prefix,
            },
        };

        Operation::index(field, query, truth)
    }
}


#[cfg(test)]
mod tests {
    use crate::analysis::StandardAnalyzer;
    use crate::error::QueryError;
    use crate::operation::{Operation, IndexQuery, PhraseTerm, TextField};

    use super::{PhraseShape, split_wildcard};

    fn shape(text: &str, quick: bool) -> Result<PhraseShape, QueryError> {
        PhraseShape::build(&StandardAnalyzer::new(), TextField::Content, text, quick)
    }

    #[test]
    fn test_split_wildcard() {
        assert_eq!(split_wildcard("dinn*"), Ok(("dinn", true)));
        assert_eq!(split_wildcard("dinn***  "), Ok(("dinn", true)));
        assert_eq!(split_wildcard("dinner"), Ok(("dinner", false)));
        assert_eq!(split_wildcard("din*ner"), Err(QueryError::MisplacedWildcard("din*ner".to_owned())));
        assert_eq!(split_wildcard("a* b"), Err(QueryError::MisplacedWildcard("a* b".to_owned())));
    }

    #[test]
    fn test_single_term() {
        assert_eq!(shape("Dinner", false), Ok(PhraseShape::Term("dinner".to_owned())));
    }

    #[test]
    fn test_phrase() {
        assert_eq!(shape("dinner appt", false), Ok(PhraseShape::Phrase(vec![PhraseTerm::new(0, "dinner"), PhraseTerm::new(1, "appt")])));
    }

    #[test]
    fn test_phrase_keeps_stop_word_gaps() {
        assert_eq!(shape("the dinner at the appt", false), Ok(PhraseShape::Phrase(vec![PhraseTerm::new(0, "dinner"), PhraseTerm::new(3, "appt")])));
    }

    #[test]
    fn test_stop_words_only() {
        assert_eq!(shape("a", false), Ok(PhraseShape::Empty));
        assert_eq!(shape("a", false).unwrap().into_operation(TextField::Content, false), Operation::Unconstrained);
    }

    #[test]
    fn test_trailing_wildcard() {
        assert_eq!(shape("dinner app*", false), Ok(PhraseShape::Prefix {
            leading: vec![PhraseTerm::new(0, "dinner")],
            prefix: PhraseTerm::new(1, "app"),
        }));
        assert_eq!(shape("dinner at app*", false), Ok(PhraseShape::Prefix {
            leading: vec![PhraseTerm::new(0, "dinner")],
            prefix: PhraseTerm::new(2, "app"),
        }));
    }

    #[test]
    fn test_stop_word_prefix() {
        assert_eq!(shape("in*", false), Ok(PhraseShape::Prefix {
            leading: vec![],
            prefix: PhraseTerm::new(0, "in"),
        }));
        assert_eq!(shape("Dinner THE*", false), Ok(PhraseShape::Prefix {
            leading: vec![PhraseTerm::new(0, "dinner")],
            prefix: PhraseTerm::new(1, "the"),
        }));
        assert_eq!(shape("at the*", false), Ok(PhraseShape::Prefix {
            leading: vec![],
            prefix: PhraseTerm::new(0, "the"),
        }));
    }

    #[test]
    fn test_quick() {
        assert_eq!(shape("dinn", true), Ok(PhraseShape::Prefix {
            leading: vec![],
            prefix: PhraseTerm::new(0, "dinn"),
        }));
        assert_eq!(shape("*", false), Ok(PhraseShape::Empty));
    }

    #[test]
    fn test_into_operation() {
        let operation = shape("dinner", false).unwrap().into_operation(TextField::Subject, false);

        assert_eq!(operation, Operation::index(TextField::Subject, IndexQuery::Term("dinner".to_owned()), false));
    }
}
