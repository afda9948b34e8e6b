use bevy::prelude::*;
use hexx::{EdgeDirection, Hex};

/// One of the six edge directions of a pointy-top hex cell.
///
/// Ordered clockwise starting at north-east. North is `-Z` in world space.
/// The first three variants are the *primary* directions: a cell only
/// triangulates the connection towards those, so every shared edge is
/// visited exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub enum HexDirection {
    /// North-east.
    NE,
    /// East.
    E,
    /// South-east.
    SE,
    /// South-west.
    SW,
    /// West.
    W,
    /// North-west.
    NW,
}

impl HexDirection {
    /// All directions in triangulation order.
    pub const ALL: [HexDirection; 6] = [Self::NE, Self::E, Self::SE, Self::SW, Self::W, Self::NW];

    /// Index in `0..6`, matching [`Self::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for an index, wrapping modulo 6.
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    pub const fn previous(self) -> Self {
        Self::from_index(self.index() + 5)
    }

    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub const fn previous2(self) -> Self {
        Self::from_index(self.index() + 4)
    }

    pub const fn next2(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Whether the connection across this edge is owned by this side.
    pub const fn is_primary(self) -> bool {
        matches!(self, Self::NE | Self::E | Self::SE)
    }

    /// The matching hexx edge direction. Axial `y` is the row, so north-east
    /// is `+Y` and east is `+X`.
    pub const fn edge_direction(self) -> EdgeDirection {
        match self {
            Self::NE => EdgeDirection::Y,
            Self::E => EdgeDirection::X,
            Self::SE => EdgeDirection::X_NEG_Y,
            Self::SW => EdgeDirection::NEG_Y,
            Self::W => EdgeDirection::NEG_X,
            Self::NW => EdgeDirection::NEG_X_Y,
        }
    }

    /// Axial offset to the neighbor in this direction.
    pub const fn offset(self) -> Hex {
        self.edge_direction().into_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for d in HexDirection::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
        }
    }

    #[test]
    fn next_and_previous_cancel() {
        for d in HexDirection::ALL {
            assert_eq!(d.next().previous(), d);
            assert_eq!(d.next2().previous2(), d);
            assert_eq!(d.next().next(), d.next2());
        }
    }

    #[test]
    fn wraps_at_ends() {
        assert_eq!(HexDirection::NW.next(), HexDirection::NE);
        assert_eq!(HexDirection::NE.previous(), HexDirection::NW);
        assert_eq!(HexDirection::E.previous2(), HexDirection::NW);
        assert_eq!(HexDirection::NE.previous2(), HexDirection::W);
    }

    #[test]
    fn opposite_offsets_cancel() {
        for d in HexDirection::ALL {
            assert_eq!(d.offset() + d.opposite().offset(), Hex::ZERO);
        }
    }

    #[test]
    fn offsets_follow_axial_rows() {
        assert_eq!(HexDirection::NE.offset(), Hex::new(0, 1));
        assert_eq!(HexDirection::E.offset(), Hex::new(1, 0));
        assert_eq!(HexDirection::SE.offset(), Hex::new(1, -1));
        assert_eq!(HexDirection::NW.offset(), Hex::new(-1, 1));
    }

    #[test]
    fn opposite_matches_hexx_negation() {
        for d in HexDirection::ALL {
            assert_eq!(d.opposite().edge_direction(), d.edge_direction().const_neg());
        }
    }

    #[test]
    fn exactly_three_primary_directions() {
        let primary: Vec<_> = HexDirection::ALL
            .into_iter()
            .filter(|d| d.is_primary())
            .collect();
        assert_eq!(primary, vec![HexDirection::NE, HexDirection::E, HexDirection::SE]);
        for d in primary {
            assert!(!d.opposite().is_primary());
        }
    }
}
