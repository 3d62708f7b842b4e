//! The closed mapping from pair components to dictionary views.

use crate::constants::{DEFAULT_KEY_COMPONENT, DEFAULT_VALUE_COMPONENT};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Built-in view of a dictionary that replaces a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    /// `dict.Keys`
    Keys,
    /// `dict.Values`
    Values,
}

impl ViewKind {
    /// Member name of the view on the dictionary.
    #[must_use]
    pub const fn member_name(self) -> &'static str {
        match self {
            Self::Keys => "Keys",
            Self::Values => "Values",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.member_name())
    }
}

/// Error for a payload that names no known view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dictionary view `{0}`")]
pub struct UnknownView(pub String);

impl FromStr for ViewKind {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Keys" => Ok(Self::Keys),
            "Values" => Ok(Self::Values),
            other => Err(UnknownView(other.to_owned())),
        }
    }
}

/// Names of the members a key/value pair exposes, and the one mapping from
/// those members to views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairComponents {
    key: CompactString,
    value: CompactString,
}

impl Default for PairComponents {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY_COMPONENT.into(),
            value: DEFAULT_VALUE_COMPONENT.into(),
        }
    }
}

impl PairComponents {
    /// Components named `key` and `value`.
    ///
    /// Identical names would make the mapping ambiguous; the defaults are
    /// used instead.
    #[must_use]
    pub fn new(key: &str, value: &str) -> Self {
        if key == value {
            tracing::warn!(
                component = key,
                "key and value components must differ, using `{DEFAULT_KEY_COMPONENT}`/`{DEFAULT_VALUE_COMPONENT}`"
            );
            return Self::default();
        }
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// View selected by accessing `member` on a pair.
    #[must_use]
    pub fn view_for(&self, member: &str) -> Option<ViewKind> {
        if member == self.key {
            Some(ViewKind::Keys)
        } else if member == self.value {
            Some(ViewKind::Values)
        } else {
            None
        }
    }

    /// Component name that selects `view`.
    #[must_use]
    pub fn component(&self, view: ViewKind) -> &str {
        match view {
            ViewKind::Keys => &self.key,
            ViewKind::Values => &self.value,
        }
    }
}
