use st_data::{HOURS_PER_DAY, HOUR_LABELS};

/// One hour's horizontal bin, `[start, end)` in image columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub index: usize,
    pub start: f64,
    pub end: f64,
}

impl Slot {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn label(&self) -> &'static str {
        HOUR_LABELS[self.index]
    }
}

/// The 24 equal-width hour bins spanning `[left, right)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotMap {
    slots: [Slot; HOURS_PER_DAY],
}

impl SlotMap {
    pub fn new(left: u32, right: u32) -> Self {
        let left = left as f64;
        let right = right as f64;
        let width = (right - left) / HOURS_PER_DAY as f64;
        // The last bound is pinned to `right` so the bins partition the span exactly.
        let bound = |i: usize| {
            if i == HOURS_PER_DAY {
                right
            } else {
                left + width * i as f64
            }
        };

        let slots = std::array::from_fn(|index| Slot {
            index,
            start: bound(index),
            end: bound(index + 1),
        });
        Self { slots }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Index of the slot whose center is closest to `x`; the lower index on ties.
    pub fn nearest(&self, x: f64) -> usize {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for slot in &self.slots {
            let distance = (x - slot.center()).abs();
            if distance < best_distance {
                best = slot.index;
                best_distance = distance;
            }
        }
        best
    }
}
