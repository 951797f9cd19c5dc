/// Validated newtype wrapper for task identifiers.
///
/// [`TaskId`] enforces a regex-based shape constraint at construction time via
/// [`TryFrom<&str>`]. Once constructed, the inner value is immutable (no
/// `DerefMut`). The serde `Deserialize` impl re-runs validation so invalid ids
/// cannot enter the graph from an untrusted task plan.
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced when constructing a [`TaskId`] from an invalid string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskIdError {
    /// The string did not match the expected format.
    #[error("invalid TaskId: expected {expected}, got {got:?}")]
    InvalidFormat {
        /// A human-readable description of the expected format.
        expected: &'static str,
        /// The input that was rejected.
        got: String,
    },
}

// ---------------------------------------------------------------------------
// Regex statics
//
// The pattern is a compile-time literal; Regex::new never returns Err for it.
// The workspace bans expect() and unwrap(), so the fallback is a pattern that
// never matches, which rejects every id rather than panicking.
// ---------------------------------------------------------------------------

/// Non-empty, no control characters, no leading or trailing whitespace.
static TASK_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s\p{Cc}](?:[^\p{Cc}]*[^\s\p{Cc}])?$").unwrap_or_else(|_| {
        Regex::new("a^").unwrap_or_else(|_| unreachable!("regex engine broken"))
    })
});

const TASK_ID_EXPECTED: &str =
    "a non-empty id without control characters or surrounding whitespace";

// ---------------------------------------------------------------------------
// TaskId
// ---------------------------------------------------------------------------

/// Stable unique identifier of a task node.
///
/// Distinct from the task's display title: titles may repeat within a
/// planning session, ids must not.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(String);

impl TryFrom<&str> for TaskId {
    type Error = TaskIdError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        if TASK_ID_RE.is_match(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(TaskIdError::InvalidFormat {
                expected: TASK_ID_EXPECTED,
                got: s.to_owned(),
            })
        }
    }
}

impl TryFrom<String> for TaskId {
    type Error = TaskIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if TASK_ID_RE.is_match(&s) {
            Ok(Self(s))
        } else {
            Err(TaskIdError::InvalidFormat {
                expected: TASK_ID_EXPECTED,
                got: s,
            })
        }
    }
}

impl TaskId {
    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for TaskId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for TaskId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TaskId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TaskId::try_from(s).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn accepts_plain_and_spaced_ids() {
        for s in ["A", "task-1", "setup db", "T 1.2", "ünïcode"] {
            let id = TaskId::try_from(s).expect("valid id");
            assert_eq!(id.as_str(), s);
        }
    }

    #[test]
    fn rejects_empty_and_padded_ids() {
        for s in ["", " ", " A", "A ", "\tA", "A\n"] {
            assert!(TaskId::try_from(s).is_err(), "{s:?} should be rejected");
        }
    }

    #[test]
    fn rejects_control_characters() {
        assert!(TaskId::try_from("a\u{0007}b").is_err());
        assert!(TaskId::try_from("a\nb").is_err());
    }

    #[test]
    fn error_message_names_the_input() {
        let err = TaskId::try_from(" bad").expect_err("should fail");
        assert!(err.to_string().contains("\" bad\""), "message: {err}");
    }

    #[test]
    fn serde_round_trip_preserves_value() {
        let id = TaskId::try_from("auth-setup").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"auth-setup\"");
        let back: TaskId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn deserialize_rejects_invalid_id() {
        let result: Result<TaskId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn borrow_allows_str_lookup() {
        let mut map = std::collections::HashMap::new();
        map.insert(TaskId::try_from("x").expect("valid id"), 1);
        assert_eq!(map.get("x"), Some(&1));
    }
}
