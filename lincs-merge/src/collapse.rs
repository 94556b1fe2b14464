//! Envelope collapsing for plain intervals.
//!
//! Reduces a set of `(start, stop)` intervals on one chromosome to the minimal
//! set of non-overlapping intervals covering exactly the same bases. Used for
//! simple loci (e.g. non-intergenic region definitions), for genome coverage,
//! and for the exon cleanup step of the transcript merge engine.

use lincs_core::Interval;

/// Collapse operations on interval collections.
///
/// Two intervals are merged when they share at least one base (touching
/// endpoints such as `[20, 30]` and `[30, 70]` share base 30). Intervals that
/// are merely adjacent (`[1, 5]` and `[6, 8]`) are kept apart.
pub trait Collapse {
    /// Collapse in place. The result is sorted ascending by start and its
    /// union equals the union of the input, whatever the input order.
    fn collapse(&mut self);

    /// Collapsed copy, leaving `self` untouched.
    fn collapsed(&self) -> Vec<Interval>;
}

impl Collapse for Vec<Interval> {
    fn collapse(&mut self) {
        if self.len() < 2 {
            return;
        }
        self.sort_unstable();

        let mut write = 0;
        for read in 1..self.len() {
            let next = self[read];
            let current = &mut self[write];
            if current.overlap(&next, 0) > 0 {
                // sorted by start, so only the stop can grow (or be engulfed)
                current.stop = current.stop.max(next.stop);
            } else {
                write += 1;
                self[write] = next;
            }
        }
        self.truncate(write + 1);
    }

    fn collapsed(&self) -> Vec<Interval> {
        let mut copy = self.clone();
        copy.collapse();
        copy
    }
}
