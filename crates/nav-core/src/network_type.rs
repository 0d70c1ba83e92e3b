//! Network-type filter applied when a road graph is fetched.
//!
//! The filter only decides which ways a provider keeps.  It is not stored on
//! edges after the graph is built.

use std::str::FromStr;

use crate::CoreError;

/// Which part of the street network a graph is built from.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NetworkType {
    /// Public drivable streets, excluding service roads.
    #[default]
    Drive,
    /// Drivable streets including service roads.
    DriveService,
    /// Everything a pedestrian may use.
    Walk,
    /// Everything a cyclist may use.
    Bike,
    /// All non-private ways.
    All,
}

impl NetworkType {
    pub const ALL: [NetworkType; 5] = [
        NetworkType::Drive,
        NetworkType::DriveService,
        NetworkType::Walk,
        NetworkType::Bike,
        NetworkType::All,
    ];

    /// `true` for the motor-vehicle network types.
    #[inline]
    pub fn is_motorable(self) -> bool {
        matches!(self, NetworkType::Drive | NetworkType::DriveService)
    }

    /// Whether one-way restrictions apply to travellers on this network.
    #[inline]
    pub fn respects_oneway(self) -> bool {
        matches!(self, NetworkType::Drive | NetworkType::DriveService | NetworkType::Bike)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NetworkType::Drive        => "drive",
            NetworkType::DriveService => "drive_service",
            NetworkType::Walk         => "walk",
            NetworkType::Bike         => "bike",
            NetworkType::All          => "all",
        }
    }
}

impl FromStr for NetworkType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NetworkType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownNetworkType(s.to_owned()))
    }
}

impl std::fmt::Display for NetworkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
