//! Attribute tokens shared by every interactive primitive.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Binary disclosure state of a floating element.
pub enum OpenState {
    /// Not rendered as open.
    Closed,
    /// Open and positioned.
    Open,
}

impl Default for OpenState {
    fn default() -> Self {
        Self::Closed
    }
}

impl From<bool> for OpenState {
    fn from(open: bool) -> Self {
        if open {
            Self::Open
        } else {
            Self::Closed
        }
    }
}

impl OpenState {
    /// `data-state` token consumed by CSS transitions.
    pub fn token(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
        }
    }

    /// Returns `true` when open.
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

/// `"true"`/`"false"` token for ARIA and `data-ui-*` boolean attributes.
pub fn bool_token(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// `data-state` token for checkable controls.
pub fn checked_token(checked: bool) -> &'static str {
    if checked {
        "checked"
    } else {
        "unchecked"
    }
}
