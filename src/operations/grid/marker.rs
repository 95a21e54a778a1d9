use crate::error::OperationError;

/// Marker scheme applied by the grid builders.
///
/// Converts from the legacy integer codes via [`TryFrom<i32>`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerType {
    /// Cells and boundaries keep marker 0. Code 0.
    #[default]
    None,
    /// Each cell is tagged with its linear creation index. Code 1.
    CellIndex,
    /// Cells keep 0; outer boundaries are tagged by side: 1 x-min, 2 x-max,
    /// 3 y-min, 4 y-max, 5 z-min, 6 z-max. Code 2.
    BoundarySides,
}

impl TryFrom<i32> for MarkerType {
    type Error = OperationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::CellIndex),
            2 => Ok(Self::BoundarySides),
            _ => Err(OperationError::InvalidArgument(format!(
                "unknown marker type {value}"
            ))),
        }
    }
}

impl From<MarkerType> for i32 {
    fn from(value: MarkerType) -> Self {
        match value {
            MarkerType::None => 0,
            MarkerType::CellIndex => 1,
            MarkerType::BoundarySides => 2,
        }
    }
}
