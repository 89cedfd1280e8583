use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// How boost indices are ordered against the sync cursor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CursorOrder {
    /// Numeric indices compare as unsigned integers and sort before any
    /// non-numeric index, which compare as text.
    #[default]
    Numeric,
    /// Plain byte-wise string comparison, so `"9"` sorts after `"10"`.
    Lexicographic,
}

impl CursorOrder {
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            CursorOrder::Lexicographic => a.cmp(b),
            CursorOrder::Numeric => match (a.parse::<u128>(), b.parse::<u128>()) {
                // "010" and "10" are the same number; fall back to text so
                // they are still distinct.
                (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            },
        }
    }

    /// True when `index` sorts strictly after the cursor. An empty index is
    /// never newer; everything else is newer than an empty cursor.
    pub fn is_newer(self, index: &str, cursor: &Cursor) -> bool {
        if index.is_empty() {
            return false;
        }

        match cursor.index() {
            None => true,
            Some(current) => self.compare(index, current) == Ordering::Greater,
        }
    }
}

/// Index of the newest rendered boost, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor(Option<String>);

impl Cursor {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn at(index: impl Into<String>) -> Self {
        let index = index.into();
        if index.is_empty() {
            Self(None)
        } else {
            Self(Some(index))
        }
    }

    pub fn index(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Value sent as the `index` query parameter.
    pub fn as_query(&self) -> &str {
        self.index().unwrap_or("")
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index() {
            Some(index) => write!(f, "{}", index),
            None => write!(f, "<start>"),
        }
    }
}
