//! Layout mode selection and capacity policy.

use serde::{Deserialize, Serialize};

/// Which tiling family a session uses. Chosen once from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// First participant full-screen, everyone else in a thumbnail strip.
    #[default]
    #[serde(alias = "grid_default")]
    Default,
    /// Equal cells in the smallest enclosing square grid.
    #[serde(alias = "grid_bestfit", alias = "bestfit")]
    BestFit,
    /// One featured participant large, everyone else in a side column.
    #[serde(alias = "featured_vertical")]
    VerticalPresentation,
}

impl LayoutMode {
    /// Whether the mode reserves a slot for a designated participant.
    pub fn uses_featured(&self) -> bool {
        matches!(self, Self::VerticalPresentation)
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Default => "default",
            Self::BestFit => "best_fit",
            Self::VerticalPresentation => "vertical_presentation",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "default" | "grid_default" => Ok(Self::Default),
            "best_fit" | "bestfit" | "grid_bestfit" => Ok(Self::BestFit),
            "vertical_presentation" | "vertical" | "featured_vertical" => {
                Ok(Self::VerticalPresentation)
            }
            other => Err(format!(
                "unknown layout mode {other:?} (expected default|best_fit|vertical_presentation)"
            )),
        }
    }
}

/// What to do when membership outgrows the largest supported tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CapacityPolicy {
    /// Log and leave the previously submitted layout in effect.
    #[default]
    KeepPrevious,
    /// Submit a background-only layout and forget the previous one.
    Clear,
}
