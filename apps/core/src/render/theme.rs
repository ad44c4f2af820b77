//! Theme identifiers and per-theme layout descriptors.
//!
//! A theme is data, not code: the engine walks the same section list for
//! every theme and consults the descriptor for region assignment, header
//! treatment and typography. Adding a theme means adding a descriptor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::resume::SectionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    Professional,
    Modern,
    Minimal,
    Academic,
}

impl ThemeId {
    pub const ALL: [ThemeId; 4] = [
        ThemeId::Professional,
        ThemeId::Modern,
        ThemeId::Minimal,
        ThemeId::Academic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeId::Professional => "professional",
            ThemeId::Modern => "modern",
            ThemeId::Minimal => "minimal",
            ThemeId::Academic => "academic",
        }
    }
}

impl Default for ThemeId {
    fn default() -> Self {
        ThemeId::Professional
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown theme: {0}")]
pub struct UnknownTheme(pub String);

impl FromStr for ThemeId {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeId::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

/// Theme metadata for selection UIs.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ThemeInfo {
    pub id: ThemeId,
    pub name: &'static str,
    pub description: &'static str,
}

pub const THEMES: [ThemeInfo; 4] = [
    ThemeInfo {
        id: ThemeId::Professional,
        name: "Professional",
        description: "Clean, traditional layout suitable for corporate roles",
    },
    ThemeInfo {
        id: ThemeId::Modern,
        name: "Modern",
        description: "Contemporary design with visual flair",
    },
    ThemeInfo {
        id: ThemeId::Minimal,
        name: "Minimal",
        description: "Simple, content-focused layout",
    },
    ThemeInfo {
        id: ThemeId::Academic,
        name: "Academic",
        description: "Serif, LaTeX-inspired layout for academic and research roles",
    },
];

/// Header treatment at the top of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    /// Left-aligned name over a heavy rule.
    Ruled,
    /// Accent-colored banner band.
    Banner,
    /// Centered, uppercase, lightweight.
    Centered,
    /// Centered serif name with inline contact row.
    CenteredSerif,
}

/// Column layout for the section body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    SingleColumn,
    /// Two-column split; the listed sections go to the sidebar, everything
    /// else to the main column. Order within each region still follows the
    /// registry order.
    TwoColumn { sidebar: &'static [SectionId] },
}

/// Static layout descriptor consumed by the engine.
#[derive(Debug, Clone, Copy)]
pub struct ThemeSpec {
    pub id: ThemeId,
    pub font_stack: &'static str,
    pub accent: &'static str,
    pub header: HeaderStyle,
    pub layout: Layout,
    /// CSS text-transform applied to section titles.
    pub heading_transform: &'static str,
    pub bullet: &'static str,
}

const MODERN_SIDEBAR: &[SectionId] = &[
    SectionId::Skills,
    SectionId::Certificates,
    SectionId::Awards,
    SectionId::Languages,
    SectionId::Interests,
];

pub(crate) fn theme_spec(id: ThemeId) -> &'static ThemeSpec {
    match id {
        ThemeId::Professional => &ThemeSpec {
            id: ThemeId::Professional,
            font_stack: "'Helvetica Neue', Arial, sans-serif",
            accent: "#1f2933",
            header: HeaderStyle::Ruled,
            layout: Layout::SingleColumn,
            heading_transform: "none",
            bullet: "disc",
        },
        ThemeId::Modern => &ThemeSpec {
            id: ThemeId::Modern,
            font_stack: "'Inter', 'Segoe UI', sans-serif",
            accent: "#d97706",
            header: HeaderStyle::Banner,
            layout: Layout::TwoColumn {
                sidebar: MODERN_SIDEBAR,
            },
            heading_transform: "uppercase",
            bullet: "disc",
        },
        ThemeId::Minimal => &ThemeSpec {
            id: ThemeId::Minimal,
            font_stack: "'Helvetica Neue', Arial, sans-serif",
            accent: "#4b5563",
            header: HeaderStyle::Centered,
            heading_transform: "uppercase",
            layout: Layout::SingleColumn,
            bullet: "none",
        },
        ThemeId::Academic => &ThemeSpec {
            id: ThemeId::Academic,
            font_stack: "Georgia, 'Times New Roman', serif",
            accent: "#1f2933",
            header: HeaderStyle::CenteredSerif,
            layout: Layout::SingleColumn,
            heading_transform: "none",
            bullet: "disc",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_id_round_trips_through_str() {
        for theme in ThemeId::ALL {
            assert_eq!(theme.as_str().parse::<ThemeId>().unwrap(), theme);
        }
        assert!("brutalist".parse::<ThemeId>().is_err());
    }

    #[test]
    fn test_default_theme_is_professional() {
        assert_eq!(ThemeId::default(), ThemeId::Professional);
    }

    #[test]
    fn test_registry_covers_all_themes() {
        for (info, id) in THEMES.iter().zip(ThemeId::ALL) {
            assert_eq!(info.id, id);
        }
    }

    #[test]
    fn test_every_theme_has_a_spec() {
        for theme in ThemeId::ALL {
            assert_eq!(theme_spec(theme).id, theme);
        }
    }
}
