//! Flex weight classification

/// How a view takes part in main-axis space distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Flex {
    /// Sized by its intrinsic extent
    #[default]
    Fixed,
    /// Shares leftover space in proportion to its weight (always non-zero)
    Flexible(u16),
}

impl Flex {
    /// Weight zero collapses to `Fixed`
    pub fn from_weight(weight: u16) -> Self {
        if weight == 0 {
            Flex::Fixed
        } else {
            Flex::Flexible(weight)
        }
    }

    pub fn weight(self) -> u16 {
        match self {
            Flex::Fixed => 0,
            Flex::Flexible(weight) => weight,
        }
    }

    pub fn is_flexible(self) -> bool {
        self.weight() > 0
    }
}
