// src/services/answer_key.rs

//! Parsing and serialisation of option-id sets.
//!
//! Answer keys and multi-choice answers are stored as comma-joined option ids
//! with no whitespace (`"21,22"`). This is the only module that splits or
//! joins that format.

use std::fmt;

use crate::error::AppError;

/// Ordered list of option ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey(Vec<i64>);

impl AnswerKey {
    /// Parses a stored key. `None` and `""` both yield an empty key.
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(Self::default()),
        };

        raw.split(',')
            .map(|part| {
                part.parse::<i64>().map_err(|_| {
                    AppError::InvariantViolation(format!("Malformed answer key '{raw}'"))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn contains(&self, option_id: i64) -> bool {
        self.0.contains(&option_id)
    }

    pub fn push(&mut self, option_id: i64) {
        self.0.push(option_id);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> &[i64] {
        &self.0
    }

    /// Storage form; an empty key is stored as NULL.
    pub fn to_stored(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string())
        }
    }

    /// Drops one id, keeping the order of the rest.
    pub fn without(&self, option_id: i64) -> Self {
        Self(self.0.iter().copied().filter(|id| *id != option_id).collect())
    }
}

impl From<Vec<i64>> for AnswerKey {
    fn from(ids: Vec<i64>) -> Self {
        Self(ids)
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert!(AnswerKey::parse(None).unwrap().is_empty());
        assert!(AnswerKey::parse(Some("")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_keeps_order() {
        let key = AnswerKey::parse(Some("22,21")).unwrap();
        assert_eq!(key.ids(), &[22, 21]);
        assert_eq!(key.to_string(), "22,21");
    }

    #[test]
    fn test_parse_rejects_whitespace_and_garbage() {
        assert!(matches!(
            AnswerKey::parse(Some("21, 22")),
            Err(AppError::InvariantViolation(_))
        ));
        assert!(AnswerKey::parse(Some("a")).is_err());
        assert!(AnswerKey::parse(Some("1,,2")).is_err());
    }

    #[test]
    fn test_to_stored() {
        assert_eq!(AnswerKey::default().to_stored(), None);
        assert_eq!(AnswerKey::from(vec![7]).to_stored(), Some("7".to_string()));
    }

    #[test]
    fn test_without() {
        let key = AnswerKey::from(vec![3, 5, 9]);
        assert_eq!(key.without(5).to_string(), "3,9");
        assert_eq!(key.without(4), key);
    }
}
