use thiserror::Error;

pub type CavResult<T> = Result<T, CavError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CavError {
    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: &'static str },

    #[error("Index out of range: {what} (index={index}, len={len})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Slot already occupied: {what} (index={index})")]
    Occupied { what: &'static str, index: usize },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("State mismatch: {what}")]
    StateMismatch { what: &'static str },
}

impl CavError {
    /// True for the index-validation family (`OutOfRange` and `Occupied`).
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. } | Self::Occupied { .. })
    }
}
