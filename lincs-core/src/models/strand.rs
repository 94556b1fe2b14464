use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::LincsError;

/// Strand annotation of a feature.
///
/// `PlusOrUnknown` and `MinusOrUnknown` record that a feature resulted from
/// merging a stranded feature with an unstranded one: the merged feature may
/// no longer be combined with anything on the opposite strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strand {
    Plus,
    Minus,
    #[default]
    Unknown,
    PlusOrUnknown,
    MinusOrUnknown,
}

impl Strand {
    /// Parse the single-character encoding (`+ - . * %`).
    /// Anything unrecognised is treated as `Unknown`.
    pub fn from_char(c: char) -> Strand {
        match c {
            '+' => Strand::Plus,
            '-' => Strand::Minus,
            '*' => Strand::PlusOrUnknown,
            '%' => Strand::MinusOrUnknown,
            _ => Strand::Unknown,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
            Strand::Unknown => '.',
            Strand::PlusOrUnknown => '*',
            Strand::MinusOrUnknown => '%',
        }
    }

    /// Character used in BED output. The partial-information tags have no BED
    /// equivalent and are written as `.`.
    pub fn as_bed_char(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
            _ => '.',
        }
    }

    /// Member of the `{Plus, PlusOrUnknown, Unknown}` compatibility group.
    #[inline]
    pub fn in_plus_group(&self) -> bool {
        matches!(self, Strand::Plus | Strand::PlusOrUnknown | Strand::Unknown)
    }

    /// Member of the `{Minus, MinusOrUnknown, Unknown}` compatibility group.
    #[inline]
    pub fn in_minus_group(&self) -> bool {
        matches!(
            self,
            Strand::Minus | Strand::MinusOrUnknown | Strand::Unknown
        )
    }

    ///
    /// Strand of the feature produced by merging features on `self` and `other`.
    ///
    /// Identical strands are kept. Differing strands inside the plus group give
    /// `PlusOrUnknown`, inside the minus group `MinusOrUnknown`. Returns `None`
    /// when the two strands may not be merged at all.
    ///
    pub fn combine(&self, other: &Strand) -> Option<Strand> {
        if self == other {
            Some(*self)
        } else if self.in_plus_group() && other.in_plus_group() {
            Some(Strand::PlusOrUnknown)
        } else if self.in_minus_group() && other.in_minus_group() {
            Some(Strand::MinusOrUnknown)
        } else {
            None
        }
    }
}

impl FromStr for Strand {
    type Err = LincsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Strand::Plus),
            "-" => Ok(Strand::Minus),
            "." | "" => Ok(Strand::Unknown),
            "*" => Ok(Strand::PlusOrUnknown),
            "%" => Ok(Strand::MinusOrUnknown),
            other => Err(LincsError::InvalidArgument(format!(
                "unrecognised strand symbol: {}",
                other
            ))),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
