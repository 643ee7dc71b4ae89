//! Keys for the working set.
//!
//! A [`Key`] is either an integer or a text string; a single map freely mixes
//! both, mirroring loose-array semantics. Case normalization touches only text
//! keys, and renumbering operations touch only integer keys.

use std::fmt;

use super::errors::CollectionError;
use super::value::Value;

/// Target case for [`Collection::change_key_case`](super::Collection::change_key_case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyCase {
    /// Lower-case text keys (the default)
    #[default]
    Lower,
    /// Upper-case text keys
    Upper,
}

/// A key in the working set.
///
/// # Examples
///
/// ```
/// use tidepool::Key;
///
/// let numeric = Key::from(3);
/// let named = Key::from("title");
///
/// assert!(numeric.is_int());
/// assert_eq!(named.as_text(), Some("title"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Key {
    /// Integer key
    Int(i64),
    /// Text key
    Text(String),
}

impl Key {
    /// Returns true if this is an integer key
    pub fn is_int(&self) -> bool {
        matches!(self, Key::Int(_))
    }

    /// Returns true if this is a text key
    pub fn is_text(&self) -> bool {
        matches!(self, Key::Text(_))
    }

    /// Attempts to read the key as an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to read the key as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Key::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns this key with its text normalized to `case`.
    ///
    /// Integer keys pass through unchanged.
    pub fn with_case(&self, case: KeyCase) -> Key {
        match self {
            Key::Int(n) => Key::Int(*n),
            Key::Text(s) => Key::Text(match case {
                KeyCase::Lower => s.to_lowercase(),
                KeyCase::Upper => s.to_uppercase(),
            }),
        }
    }

    /// Coerces a value into a key following loose-typing rules.
    ///
    /// Null becomes the empty text key, booleans become `0`/`1`, floats are
    /// truncated toward zero. Containers are not key-coercible and produce a
    /// [`CollectionError::TypeMismatch`].
    pub fn coerce(value: &Value) -> Result<Key, CollectionError> {
        match value {
            Value::Null => Ok(Key::Text(String::new())),
            Value::Bool(b) => Ok(Key::Int(i64::from(*b))),
            Value::Int(n) => Ok(Key::Int(*n)),
            Value::Float(f) => Ok(Key::Int(*f as i64)),
            Value::Text(s) => Ok(Key::Text(s.clone())),
            other => Err(CollectionError::TypeMismatch {
                expected: "an int or text value".to_string(),
                actual: other.type_name().to_string(),
            }),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{n}"),
            Key::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Int(value as i64)
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Key::Int(value as i64)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

// PartialEq implementations for comparing Key with primitives in tests and
// call sites without wrapping.
impl PartialEq<i64> for Key {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl PartialEq<Key> for i64 {
    fn eq(&self, other: &Key) -> bool {
        other == self
    }
}

impl PartialEq<Key> for &str {
    fn eq(&self, other: &Key) -> bool {
        other == self
    }
}
