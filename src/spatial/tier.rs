use serde::{Deserialize, Serialize};

/// Zoom levels of the render frame, ordered coarsest to finest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomTier {
    Galaxy,
    Sector,
    System,
    Orbit,
}

impl ZoomTier {
    pub const ALL: [ZoomTier; 4] = [
        ZoomTier::Galaxy,
        ZoomTier::Sector,
        ZoomTier::System,
        ZoomTier::Orbit,
    ];

    fn rank(self) -> usize {
        self as usize
    }

    pub fn coarser(self) -> Option<ZoomTier> {
        self.rank().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn finer(self) -> Option<ZoomTier> {
        Self::ALL.get(self.rank() + 1).copied()
    }
}
