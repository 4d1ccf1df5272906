//! Host-supplied editor settings.

use serde::{Deserialize, Serialize};

/// How vertex drags follow the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerTracking {
    /// Press, move, release. Every move updates a live preview and the
    /// release commits. Suits mouse and pen input.
    #[default]
    Continuous,
    /// Press arms the drag; the next click on the map commits the new
    /// position. Suits touch input, where release events go missing.
    Discrete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub tracking: PointerTracking,
    /// Ray-cast area hover on every move to detect the pointer leaving.
    pub track_area_hover: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tracking: PointerTracking::Continuous,
            track_area_hover: true,
        }
    }
}

impl EditorConfig {
    pub fn touch() -> Self {
        Self {
            tracking: PointerTracking::Discrete,
            ..Self::default()
        }
    }
}
