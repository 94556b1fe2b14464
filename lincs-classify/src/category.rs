use std::fmt::{self, Display};

///
/// Category of a single base. The discriminant is the letter code used when
/// an array is written out, so an array is stored one byte per base.
///
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Category {
    #[default]
    Intergenic = b'i',
    CodingOnly = b'm',
    NoncodingOnly = b'l',
    Both = b'b',
    NonIntergenicOther = b'n',
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Intergenic,
        Category::CodingOnly,
        Category::NoncodingOnly,
        Category::Both,
        Category::NonIntergenicOther,
    ];

    #[inline]
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn from_byte(byte: u8) -> Option<Category> {
        match byte {
            b'i' => Some(Category::Intergenic),
            b'm' => Some(Category::CodingOnly),
            b'l' => Some(Category::NoncodingOnly),
            b'b' => Some(Category::Both),
            b'n' => Some(Category::NonIntergenicOther),
            _ => None,
        }
    }

    /// Lowercase name used in output file names.
    pub fn label(self) -> &'static str {
        match self {
            Category::Intergenic => "intergenic",
            Category::CodingOnly => "coding_only",
            Category::NoncodingOnly => "noncoding_only",
            Category::Both => "both",
            Category::NonIntergenicOther => "non_intergenic",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_byte() as char)
    }
}

///
/// One painting pass. Passes run in declaration order, each rewriting the
/// current category of a base through its own transition table so that later
/// passes never erase what earlier passes recorded.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Coding,
    Noncoding,
    Other,
}

impl Pass {
    #[inline]
    pub fn apply(self, current: Category) -> Category {
        use Category::*;
        match (self, current) {
            (Pass::Coding, Intergenic) => CodingOnly,
            (Pass::Noncoding, Intergenic) => NoncodingOnly,
            (Pass::Noncoding, CodingOnly) => Both,
            (Pass::Other, Intergenic) => NonIntergenicOther,
            (_, unchanged) => unchanged,
        }
    }
}
