/// Largest margin (in bases) accepted when expanding envelopes or painting.
pub const MAX_MARGIN: i64 = 20_000;

/// Chromosome number used for the X chromosome.
pub const CHROM_X: u8 = 23;

/// Chromosome number used for the Y chromosome.
pub const CHROM_Y: u8 = 24;

/// Chromosome number for records that could not be placed.
pub const CHROM_UNPLACED: u8 = 0;
