use serde::{Deserialize, Serialize};
use std::fmt;

fn canonical_integer(text: &str) -> Option<i128> {
    let n = text.parse::<i128>().ok()?;
    (n.to_string() == text).then_some(n)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerKind {
    Integer,
    Text,
}

/// A computed answer as handed to `submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Integer(i128),
    Text(String),
}

impl Answer {
    /// Classify free text from the command line. Only text that survives an
    /// integer round trip unchanged is an integer; `0123` or `+5` stay text
    /// so they are posted exactly as typed.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match canonical_integer(trimmed) {
            Some(n) => Answer::Integer(n),
            None => Answer::Text(trimmed.to_string()),
        }
    }

    pub fn kind(&self) -> AnswerKind {
        match self {
            Answer::Integer(_) => AnswerKind::Integer,
            Answer::Text(_) => AnswerKind::Text,
        }
    }

    /// Compare against a previously accepted answer using the stored kind.
    pub fn matches(&self, stored: &StoredAnswer) -> bool {
        match stored.kind {
            AnswerKind::Integer => {
                let Ok(expected) = stored.answer.trim().parse::<i128>() else {
                    return false;
                };
                match self {
                    Answer::Integer(n) => *n == expected,
                    Answer::Text(s) => s.trim().parse::<i128>() == Ok(expected),
                }
            }
            AnswerKind::Text => self.to_string() == stored.answer,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Integer(n) => write!(f, "{n}"),
            Answer::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! answer_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Answer {
            fn from(value: $t) -> Self {
                Answer::Integer(value as i128)
            }
        })*
    };
}

answer_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64, usize, isize);

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Text(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Answer::Text(value)
    }
}

/// An accepted answer as kept in the ledger: its text plus declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAnswer {
    pub answer: String,
    pub kind: AnswerKind,
}

impl StoredAnswer {
    /// Entries written before kinds were recorded hold bare text; treat
    /// anything integer-shaped as an integer.
    pub fn from_legacy(text: &str) -> Self {
        let kind = if canonical_integer(text.trim()).is_some() {
            AnswerKind::Integer
        } else {
            AnswerKind::Text
        };
        Self {
            answer: text.to_string(),
            kind,
        }
    }
}

impl From<&Answer> for StoredAnswer {
    fn from(value: &Answer) -> Self {
        Self {
            answer: value.to_string(),
            kind: value.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_integers_from_text() {
        assert_eq!(Answer::parse(" 42 "), Answer::Integer(42));
        assert_eq!(Answer::parse("-7"), Answer::Integer(-7));
        assert_eq!(Answer::parse("ABCDEF"), Answer::Text("ABCDEF".into()));
    }

    #[test]
    fn non_canonical_digits_stay_text_and_display_verbatim() {
        for raw in ["01234567", "+5", "-0", "007"] {
            let answer = Answer::parse(raw);
            assert_eq!(answer, Answer::Text(raw.into()));
            assert_eq!(answer.to_string(), raw);
        }
        assert_eq!(StoredAnswer::from_legacy("01234567").kind, AnswerKind::Text);
    }

    #[test]
    fn integer_entries_compare_numerically() {
        let stored = StoredAnswer::from(&Answer::from(42u64));
        assert!(Answer::from(42i32).matches(&stored));
        assert!(Answer::from("042").matches(&stored));
        assert!(!Answer::from(43).matches(&stored));
        assert!(!Answer::from("forty-two").matches(&stored));
    }

    #[test]
    fn text_entries_compare_exactly() {
        let stored = StoredAnswer::from(&Answer::from("EHZRPLJK"));
        assert!(Answer::from("EHZRPLJK").matches(&stored));
        assert!(!Answer::from("ehzrpljk").matches(&stored));
    }

    #[test]
    fn legacy_text_infers_kind() {
        assert_eq!(StoredAnswer::from_legacy("1234").kind, AnswerKind::Integer);
        assert_eq!(StoredAnswer::from_legacy("1,2,3").kind, AnswerKind::Text);
    }
}
