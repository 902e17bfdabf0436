use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HshgError {
    SideNotPowerOfTwo { side: u32 },
    CellSizeNotPowerOfTwo { cell_size: u32 },
    CellCountOverflow { side: u32 },
    ExtentOverflow { side: u32, cell_size: u32 },
    TooManyEntities { max_entities: u32 },
}

pub type HshgResult<T> = Result<T, HshgError>;

impl fmt::Display for HshgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HshgError::SideNotPowerOfTwo { side } => {
                write!(f, "grid side must be a power of two (side: {})", side)
            }
            HshgError::CellSizeNotPowerOfTwo { cell_size } => {
                write!(
                    f,
                    "cell size must be a power of two (cell_size: {})",
                    cell_size
                )
            }
            HshgError::CellCountOverflow { side } => {
                write!(
                    f,
                    "total cell count across levels does not fit a u32 (side: {})",
                    side
                )
            }
            HshgError::ExtentOverflow { side, cell_size } => {
                write!(
                    f,
                    "grid extent side * cell_size does not fit a u32 (side: {}, cell_size: {})",
                    side, cell_size
                )
            }
            HshgError::TooManyEntities { max_entities } => {
                write!(
                    f,
                    "entity capacity must be below the invalid-index sentinel (max_entities: {})",
                    max_entities
                )
            }
        }
    }
}

impl std::error::Error for HshgError {}
