//! Review annotations and the floating toolbar that produces them.

mod toolbar;

pub use toolbar::{
    AnnotationToolbar, Key, MenuChoice, TOOLBAR_OFFSET, ToolbarEvent, ToolbarOutcome, ToolbarStep,
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnnotationType {
    /// Strike the highlighted span. Carries no text.
    Deletion,
    Comment,
}

impl AnnotationType {
    pub fn requires_text(self) -> bool {
        matches!(self, Self::Comment)
    }
}

/// A finished annotation on one highlighted span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Annotation {
    Deletion,
    Comment { text: String },
}

impl Annotation {
    pub fn kind(&self) -> AnnotationType {
        match self {
            Self::Deletion => AnnotationType::Deletion,
            Self::Comment { .. } => AnnotationType::Comment,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Deletion => None,
            Self::Comment { text } => Some(text),
        }
    }
}

/// Bounding box in viewport coordinates, as reported by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// False once the box lies entirely above or below the viewport.
    pub fn intersects_viewport(&self, viewport_height: f64) -> bool {
        self.bottom() >= 0.0 && self.top <= viewport_height
    }
}

/// Toolbar anchor: just above the highlight, horizontally centred on it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolbarPosition {
    pub top: f64,
    pub left: f64,
}

impl ToolbarPosition {
    pub fn above(rect: &Rect) -> Self {
        Self {
            top: rect.top - TOOLBAR_OFFSET,
            left: rect.left + rect.width / 2.0,
        }
    }
}
