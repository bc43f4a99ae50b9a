use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primary resource carried by the asteroids of a belt.
///
/// Ordered by material tier, from the galaxy rim (Iron) to the core (Avorion).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[default]
    Iron,
    Titanium,
    Naonite,
    Trinium,
    Xanion,
    Ogonite,
    Avorion,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Iron,
        ResourceKind::Titanium,
        ResourceKind::Naonite,
        ResourceKind::Trinium,
        ResourceKind::Xanion,
        ResourceKind::Ogonite,
        ResourceKind::Avorion,
    ];

    /// Tag string handed to downstream consumers.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Iron => "iron",
            ResourceKind::Titanium => "titanium",
            ResourceKind::Naonite => "naonite",
            ResourceKind::Trinium => "trinium",
            ResourceKind::Xanion => "xanion",
            ResourceKind::Ogonite => "ogonite",
            ResourceKind::Avorion => "avorion",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a resource tag does not name a known [`ResourceKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource kind: {0:?}")]
pub struct ParseResourceError(pub String);

impl FromStr for ResourceKind {
    type Err = ParseResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseResourceError(s.to_string()))
    }
}
