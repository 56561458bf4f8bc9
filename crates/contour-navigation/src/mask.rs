//! Neighbor masks: the relative cell offsets tried from every expanded node.

use crate::error::NavigationError;

/// Ordered set of `(dx, dy)` cell offsets applied at every expansion step.
///
/// Offsets are in cells, not world units. The mask never contains `(0, 0)` and
/// always has at least one entry. Order matters: it is the order in which
/// successors are generated and therefore the tie-break order of the search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<[i32; 2]>", into = "Vec<[i32; 2]>")
)]
pub struct NeighborMask {
    offsets: Vec<(i32, i32)>,
}

impl NeighborMask {
    /// Creates a mask from explicit offsets.
    ///
    /// # Returns
    /// * `Result<Self, NavigationError>` - The mask, or an error if it is empty or
    ///   contains the zero offset.
    pub fn new<I>(offsets: I) -> Result<Self, NavigationError>
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let offsets: Vec<(i32, i32)> = offsets.into_iter().collect();
        if offsets.is_empty() {
            return Err(NavigationError::InvalidNeighborMask(
                "Mask must contain at least one offset",
            ));
        }
        if offsets.contains(&(0, 0)) {
            return Err(NavigationError::InvalidNeighborMask(
                "Mask must not contain the (0, 0) offset",
            ));
        }
        Ok(Self { offsets })
    }

    /// East, north, west, south.
    pub fn four_connected() -> Self {
        Self {
            offsets: vec![(1, 0), (0, 1), (-1, 0), (0, -1)],
        }
    }

    /// The four axis neighbours followed by the four diagonals.
    pub fn eight_connected() -> Self {
        Self {
            offsets: vec![
                (1, 0),
                (0, 1),
                (-1, 0),
                (0, -1),
                (1, 1),
                (-1, 1),
                (-1, -1),
                (1, -1),
            ],
        }
    }

    /// The offsets in generation order.
    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }

    /// Number of offsets.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Always `false` for a constructed mask.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

impl Default for NeighborMask {
    fn default() -> Self {
        Self::eight_connected()
    }
}

impl TryFrom<Vec<[i32; 2]>> for NeighborMask {
    type Error = NavigationError;

    fn try_from(offsets: Vec<[i32; 2]>) -> Result<Self, Self::Error> {
        Self::new(offsets.into_iter().map(|[dx, dy]| (dx, dy)))
    }
}

impl From<NeighborMask> for Vec<[i32; 2]> {
    fn from(mask: NeighborMask) -> Self {
        mask.offsets.into_iter().map(|(dx, dy)| [dx, dy]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_rejects_empty_and_zero_offset() {
        assert!(matches!(
            NeighborMask::new(Vec::new()),
            Err(NavigationError::InvalidNeighborMask(_))
        ));
        assert!(matches!(
            NeighborMask::new([(1, 0), (0, 0)]),
            Err(NavigationError::InvalidNeighborMask(_))
        ));
    }

    #[test]
    fn test_mask_preserves_order() {
        let mask = NeighborMask::new([(0, 2), (-1, 0), (3, 3)]).unwrap();
        assert_eq!(mask.offsets(), &[(0, 2), (-1, 0), (3, 3)]);
        assert_eq!(mask.len(), 3);
    }

    #[test]
    fn test_standard_masks() {
        assert_eq!(NeighborMask::four_connected().len(), 4);
        let eight = NeighborMask::eight_connected();
        assert_eq!(eight.len(), 8);
        assert!(!eight.offsets().contains(&(0, 0)));
        assert_eq!(NeighborMask::default(), eight);
    }

    #[test]
    fn test_mask_array_conversions() {
        let mask = NeighborMask::try_from(vec![[1, 0], [0, -1]]).unwrap();
        assert_eq!(mask.offsets(), &[(1, 0), (0, -1)]);
        let arrays: Vec<[i32; 2]> = mask.into();
        assert_eq!(arrays, vec![[1, 0], [0, -1]]);
        assert!(NeighborMask::try_from(vec![[0, 0]]).is_err());
    }
}
