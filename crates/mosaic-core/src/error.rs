use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SizingError {
    #[error("sizing range has min {min} greater than max {max}")]
    MinExceedsMax { min: f32, max: f32 },
    #[error("sizing bound {0} is negative")]
    Negative(f32),
    #[error("sizing bound is NaN")]
    NotANumber,
}
