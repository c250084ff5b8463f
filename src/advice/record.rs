//! Advisor records and the advice they decode into.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One four-field advisor row: two key/value pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceRecord {
    pub key1: String,
    pub value1: String,
    pub key2: String,
    pub value2: String,
}

impl AdviceRecord {
    pub fn new(
        key1: impl Into<String>,
        value1: impl Into<String>,
        key2: impl Into<String>,
        value2: impl Into<String>,
    ) -> Self {
        Self {
            key1: key1.into(),
            value1: value1.into(),
            key2: key2.into(),
            value2: value2.into(),
        }
    }

    /// Decode a raw row; anything other than exactly four fields is
    /// malformed.
    pub fn from_fields<I, T>(advisor: usize, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        match <[String; 4]>::try_from(fields) {
            Ok([key1, value1, key2, value2]) => Ok(Self {
                key1,
                value1,
                key2,
                value2,
            }),
            Err(fields) => Err(Error::MalformedAdvisorRecord {
                advisor,
                reason: format!("expected 4 fields, found {}", fields.len()),
            }),
        }
    }
}

/// Key under which an advisor names the situation it reacts to.
pub const FEATURE_KEY: &str = "feature";
/// Key holding the advisor's numeric parameter.
pub const VALUE_KEY: &str = "value";
/// Feature name of the facing-a-threat advisor.
pub const FACING_GHOST: &str = "Facing-ghost";

/// An advisor's records merged into a single key/value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advice(HashMap<String, String>);

impl Advice {
    /// Merge records in order; a later row overwrites keys of earlier ones.
    pub fn from_records(records: &[AdviceRecord]) -> Self {
        let mut entries = HashMap::new();
        for record in records {
            entries.insert(record.key1.clone(), record.value1.clone());
            entries.insert(record.key2.clone(), record.value2.clone());
        }
        Self(entries)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The situations an advisor can recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceKind {
    /// Penalise continuing straight when a threat can reach the cell
    /// `steps` ahead of the agent.
    FacingGhost { steps: i32 },
}

impl AdviceKind {
    /// Interpret the merged advice of advisor `advisor`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnrecognizedAdviceKind`] when the feature key is missing or
    ///   names an unknown situation.
    /// - [`Error::MalformedAdvisorRecord`] when the parameter of a known
    ///   situation is missing or not an integer.
    pub fn from_advice(advisor: usize, advice: &Advice) -> Result<Self> {
        match advice.get(FEATURE_KEY) {
            Some(FACING_GHOST) => {
                let raw = advice
                    .get(VALUE_KEY)
                    .ok_or_else(|| Error::MalformedAdvisorRecord {
                        advisor,
                        reason: format!("'{FACING_GHOST}' advice has no '{VALUE_KEY}'"),
                    })?;
                let steps = raw
                    .trim()
                    .parse::<i32>()
                    .map_err(|err| Error::MalformedAdvisorRecord {
                        advisor,
                        reason: format!("step count '{raw}' is not an integer: {err}"),
                    })?;
                Ok(AdviceKind::FacingGhost { steps })
            }
            Some(other) => Err(Error::UnrecognizedAdviceKind {
                advisor,
                kind: other.to_string(),
            }),
            None => Err(Error::UnrecognizedAdviceKind {
                advisor,
                kind: format!("<no '{FEATURE_KEY}' key>"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fields_requires_four_fields() {
        let record = AdviceRecord::from_fields(0, ["feature", "Facing-ghost", "value", "2"]).unwrap();
        assert_eq!(record.value2, "2");

        let err = AdviceRecord::from_fields(3, ["feature", "Facing-ghost"]).unwrap_err();
        assert!(matches!(err, Error::MalformedAdvisorRecord { advisor: 3, .. }));
    }

    #[test]
    fn test_later_rows_overwrite_earlier_ones() {
        let advice = Advice::from_records(&[
            AdviceRecord::new("feature", "Facing-ghost", "value", "1"),
            AdviceRecord::new("value", "3", "note", "closer"),
        ]);
        assert_eq!(advice.get(VALUE_KEY), Some("3"));
        assert_eq!(advice.len(), 3);
    }

    #[test]
    fn test_facing_ghost_kind() {
        let advice = Advice::from_records(&[AdviceRecord::new("feature", "Facing-ghost", "value", " 2 ")]);
        assert_eq!(
            AdviceKind::from_advice(0, &advice).unwrap(),
            AdviceKind::FacingGhost { steps: 2 }
        );
    }

    #[test]
    fn test_unknown_or_missing_feature_is_unrecognized() {
        let unknown = Advice::from_records(&[AdviceRecord::new("feature", "Near-food", "value", "1")]);
        assert!(matches!(
            AdviceKind::from_advice(1, &unknown),
            Err(Error::UnrecognizedAdviceKind { advisor: 1, ref kind }) if kind == "Near-food"
        ));

        let missing = Advice::from_records(&[AdviceRecord::new("hint", "x", "value", "1")]);
        assert!(matches!(
            AdviceKind::from_advice(2, &missing),
            Err(Error::UnrecognizedAdviceKind { advisor: 2, .. })
        ));
    }

    #[test]
    fn test_bad_step_count_is_malformed() {
        let advice = Advice::from_records(&[AdviceRecord::new("feature", "Facing-ghost", "value", "two")]);
        assert!(matches!(
            AdviceKind::from_advice(4, &advice),
            Err(Error::MalformedAdvisorRecord { advisor: 4, .. })
        ));
    }
}
