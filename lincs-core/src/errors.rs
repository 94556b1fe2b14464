use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LincsError {
    #[error("Malformed feature: {0}")]
    MalformedFeature(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Interval {start}-{stop} lies outside chromosome bounds [1, {size}]")]
    OutOfRangeInterval { start: i64, stop: i64, size: i64 },

    #[error("Cannot merge features on different chromosomes: {left} and {right}")]
    CrossChromosomeMerge { left: u8, right: u8 },
}

pub type Result<T> = std::result::Result<T, LincsError>;
