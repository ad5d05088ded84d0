// ABOUTME: Defines the Button record and the partial inputs used to create and update buttons.
// ABOUTME: StoredButton is the lenient shape read back from storage before load repair.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::grid::Rect;

pub const DEFAULT_LABEL: &str = "New Button";

/// Placeholder URL for a button that has not been pointed anywhere yet.
pub const PLACEHOLDER_URL: &str = "#";

pub const DEFAULT_COLOR: &str = "#000000";

/// A launcher shortcut placed on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub id: String,
    pub label: String,
    pub url: String,
    pub color: String,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Button {
    /// Generate a fresh, time-ordered button id.
    pub fn new_id() -> String {
        Ulid::new().to_string()
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Caller-supplied fields for a new button. Anything left as `None` falls
/// back to the board defaults; position falls back to automatic placement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonDraft {
    pub label: Option<String>,
    pub url: Option<String>,
    pub color: Option<String>,
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl ButtonDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn position(mut self, x: i64, y: i64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn size(mut self, width: i64, height: i64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// A partial update merged over an existing button. Only the fields that
/// are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonPatch {
    pub label: Option<String>,
    pub url: Option<String>,
    pub color: Option<String>,
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// A button as it may appear in previously persisted data. Older layouts
/// may lack geometry entirely, so every field is optional and repaired on
/// load.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoredButton {
    pub id: Option<String>,
    pub label: Option<String>,
    pub url: Option<String>,
    pub color: Option<String>,
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl From<Button> for StoredButton {
    fn from(b: Button) -> Self {
        Self {
            id: Some(b.id),
            label: Some(b.label),
            url: Some(b.url),
            color: Some(b.color),
            x: Some(b.x),
            y: Some(b.y),
            width: Some(b.width),
            height: Some(b.height),
        }
    }
}
