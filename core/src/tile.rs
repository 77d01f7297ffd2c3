use serde::{Deserialize, Serialize};

/// The seven kinds of tile a player can place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TileKind {
    House,
    Wave,
    Ship,
    Forest,
    Mountain,
    Church,
    Beach,
}

impl TileKind {
    pub const ALL: [TileKind; 7] = [
        Self::House,
        Self::Wave,
        Self::Ship,
        Self::Forest,
        Self::Mountain,
        Self::Church,
        Self::Beach,
    ];

    /// Terrain this kind wants to stand on; the mismatch costs [`TERRAIN_PENALTY`](crate::TERRAIN_PENALTY).
    pub const fn preferred_terrain(self) -> Preference {
        use TileKind::*;
        match self {
            House | Church | Forest | Mountain => Preference::Land,
            Ship | Wave | Beach => Preference::Water,
        }
    }

    pub const fn likes(self, is_land: bool) -> bool {
        match self.preferred_terrain() {
            Preference::Land => is_land,
            Preference::Water => !is_land,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preference {
    Land,
    Water,
}

/// Classification of a region derived from its nesting depth.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    Sea,
    Island,
    Lake,
}

impl Terrain {
    pub const fn from_depth(depth: u8) -> Self {
        if depth == 0 {
            Self::Sea
        } else if depth % 2 == 1 {
            Self::Island
        } else {
            Self::Lake
        }
    }

    pub const fn is_land(self) -> bool {
        matches!(self, Self::Island)
    }
}

impl Default for Terrain {
    fn default() -> Self {
        Self::Sea
    }
}
