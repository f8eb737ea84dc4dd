//! The two combat hues shared by the player and every enemy

use serde::{Deserialize, Serialize};

/// One of two mutually exclusive combat states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Hue {
    #[default]
    Red,
    Blue,
}

impl Hue {
    /// Both hues, in toggle order
    pub const ALL: [Hue; 2] = [Hue::Red, Hue::Blue];

    /// The other hue
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Hue::Red => Hue::Blue,
            Hue::Blue => Hue::Red,
        }
    }

    /// Flip in place
    #[inline]
    pub fn toggle(&mut self) {
        *self = self.toggled();
    }

    #[inline]
    pub fn matches(self, other: Hue) -> bool {
        self == other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Hue::Red => "Red",
            Hue::Blue => "Blue",
        }
    }
}
