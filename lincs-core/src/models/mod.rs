pub mod feature;
pub mod interval;
pub mod strand;

// re-export for cleaner imports
pub use self::feature::Feature;
pub use self::interval::Interval;
pub use self::strand::Strand;
