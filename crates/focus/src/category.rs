//! Focus categories
//!
//! The fixed set of things a session can be spent on. Records store the
//! category by its `id`.

use serde::{Deserialize, Serialize};

/// What a focus session was spent on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Study,
    Coding,
    Project,
    Reading,
    Other,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 5] = [
        Category::Study,
        Category::Coding,
        Category::Project,
        Category::Reading,
        Category::Other,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Category::Study => "study",
            Category::Coding => "coding",
            Category::Project => "project",
            Category::Reading => "reading",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Study => "Study",
            Category::Coding => "Coding",
            Category::Project => "Project",
            Category::Reading => "Reading",
            Category::Other => "Other",
        }
    }

    /// Hex color, "#RRGGBB"
    pub fn color(&self) -> &'static str {
        match self {
            Category::Study => "#FF6B6B",
            Category::Coding => "#4ECDC4",
            Category::Project => "#FFE66D",
            Category::Reading => "#95E1D3",
            Category::Other => "#A8E6CF",
        }
    }

    /// Color as an (r, g, b) triple
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = &self.color()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Study => "📚",
            Category::Coding => "💻",
            Category::Project => "🎯",
            Category::Reading => "📖",
            Category::Other => "✨",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(id.trim()))
    }

    /// The next category in display order, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Study
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}
