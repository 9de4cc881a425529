use std::fmt;

/// Wiring and bounds mistakes made by the caller. These are reported, never
/// absorbed into a `false` result the way player-action failures are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionViolation {
    InvalidRange { min: i32, max: i32 },
    InvalidDayIndex(i32),
}

impl fmt::Display for PreconditionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRange { min, max } => {
                write!(f, "invalid range: max ({max}) must be greater than min ({min})")
            }
            Self::InvalidDayIndex(day) => write!(f, "invalid day index {day}: days start at 1"),
        }
    }
}

impl std::error::Error for PreconditionViolation {}
