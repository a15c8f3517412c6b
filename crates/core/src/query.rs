use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::record::{fold_letters, PlateRecord};
use crate::config::ConfigError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("query has no usable digits or letters")]
    EmptyQuery,
}

/// A digit query with everything but decimal digits stripped out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigitQuery(String);

impl DigitQuery {
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let digits: String = input.chars().filter(|ch| ch.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A letter query folded the same way as `PlateRecord::letter_key`:
/// letters only, upper-cased, look-alikes remapped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LetterQuery(String);

impl LetterQuery {
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let letters = fold_letters(input);
        if letters.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        Ok(Self(letters))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Two readings of a digit query are in active use, and they are not
/// equivalent, so both are first-class and the active one is named at
/// every call site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitStrategy {
    /// The cleaned query must be a suffix of the record's digit key.
    #[default]
    Suffix,
    /// The cleaned query must occur anywhere in the raw plate+region
    /// haystack.
    Substring,
}

impl std::str::FromStr for DigitStrategy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "suffix" => Ok(Self::Suffix),
            "substring" => Ok(Self::Substring),
            other => Err(ConfigError::Validation(format!(
                "unsupported digit strategy `{other}` (expected suffix|substring)"
            ))),
        }
    }
}

/// Pure predicate over keys precomputed at load time; nothing is
/// re-derived per call.
pub fn digit_match(record: &PlateRecord, query: &DigitQuery, strategy: DigitStrategy) -> bool {
    match strategy {
        DigitStrategy::Suffix => record.digit_key().ends_with(query.as_str()),
        DigitStrategy::Substring => record.raw_key().contains(query.as_str()),
    }
}

/// True iff the folded query is a contiguous substring of the record's
/// letter key.
pub fn letter_match(record: &PlateRecord, query: &LetterQuery) -> bool {
    record.letter_key().contains(query.as_str())
}

#[cfg(test)]
mod tests {
    use super::{digit_match, letter_match, DigitQuery, DigitStrategy, LetterQuery, QueryError};
    use crate::catalog::record::{normalize, PlateRecord, RawRow};

    fn record(plate: &str, region: &str) -> PlateRecord {
        normalize(RawRow { plate: plate.to_owned(), region: region.to_owned(), ..RawRow::default() })
            .expect("fixture row")
    }

    #[test]
    fn digit_query_strips_everything_but_digits() {
        let query = DigitQuery::parse(" а7-7 7 ").expect("parse");
        assert_eq!(query.as_str(), "777");
    }

    #[test]
    fn queries_without_usable_characters_are_rejected() {
        assert_eq!(DigitQuery::parse("абв"), Err(QueryError::EmptyQuery));
        assert_eq!(DigitQuery::parse(""), Err(QueryError::EmptyQuery));
        assert_eq!(LetterQuery::parse("12345"), Err(QueryError::EmptyQuery));
        assert_eq!(LetterQuery::parse("  "), Err(QueryError::EmptyQuery));
    }

    #[test]
    fn suffix_strategy_matches_trailing_digits_of_the_key() {
        // digit_key is "77712345": plate digits, then region.
        let record = record("A777BC", "12345");
        assert_eq!(record.digit_key(), "77712345");

        for query in ["345", "12345"] {
            let query = DigitQuery::parse(query).expect("parse");
            assert!(digit_match(&record, &query, DigitStrategy::Suffix), "query {query:?}");
        }

        let miss = DigitQuery::parse("234").expect("parse");
        assert!(!digit_match(&record, &miss, DigitStrategy::Suffix));
    }

    #[test]
    fn substring_strategy_searches_the_raw_haystack() {
        let record = record("А123ВС", "777");

        let inner = DigitQuery::parse("123").expect("parse");
        assert!(digit_match(&record, &inner, DigitStrategy::Substring));
        // Not a suffix of "123777", so the strategies genuinely diverge.
        assert!(!digit_match(&record, &inner, DigitStrategy::Suffix));
    }

    #[test]
    fn letter_match_is_substring_over_the_folded_key() {
        let record = record("М123КА", "77");

        let query = LetterQuery::parse("МК").expect("parse");
        assert_eq!(query.as_str(), "MK");
        assert!(letter_match(&record, &query));

        let miss = LetterQuery::parse("KM").expect("parse");
        assert!(!letter_match(&record, &miss));
    }

    #[test]
    fn letter_match_is_case_and_alphabet_insensitive() {
        let record = record("а777вх", "50");

        for raw in ["вх", "BX", "вX"] {
            let query = LetterQuery::parse(raw).expect("parse");
            assert!(letter_match(&record, &query), "query {raw:?}");
        }
    }
}
