//! Synthetic calorie estimation
//!
//! The catalog carries no nutrition data, so the figure attached to each
//! recipe is a simulation: a base picked from the ingredient count plus a
//! random offset. It must not be presented as a measured value.

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::Rng;

use crate::model::RecipeDetail;

/// Base estimate for recipes with a populated 10th ingredient slot
pub const RICH_BASE: u32 = 700;
/// Base estimate for every other recipe
pub const LEAN_BASE: u32 = 450;
/// Offsets are drawn from `0..OFFSET_SPAN`
pub const OFFSET_SPAN: u32 = 250;

/// Supplies the variable part of a calorie estimate
pub trait OffsetSource: Send + Sync {
    /// Returns a value in `0..OFFSET_SPAN`
    fn next_offset(&self) -> u32;
}

/// Uniformly random offsets from the thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomOffset;

impl OffsetSource for RandomOffset {
    fn next_offset(&self) -> u32 {
        rand::thread_rng().gen_range(0..OFFSET_SPAN)
    }
}

/// Always the same offset
#[derive(Debug, Clone, Copy)]
pub struct FixedOffset(pub u32);

impl OffsetSource for FixedOffset {
    fn next_offset(&self) -> u32 {
        self.0 % OFFSET_SPAN
    }
}

/// Hands out a predetermined series of offsets, then zeros
#[derive(Debug, Default)]
pub struct QueuedOffsets {
    queue: Mutex<VecDeque<u32>>,
}

impl QueuedOffsets {
    pub fn new(offsets: impl IntoIterator<Item = u32>) -> Self {
        Self {
            queue: Mutex::new(offsets.into_iter().collect()),
        }
    }
}

impl OffsetSource for QueuedOffsets {
    fn next_offset(&self) -> u32 {
        let mut queue = match self.queue.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        queue.pop_front().unwrap_or(0) % OFFSET_SPAN
    }
}

pub struct CalorieEstimator {
    offsets: Box<dyn OffsetSource>,
}

impl Default for CalorieEstimator {
    fn default() -> Self {
        Self::new(RandomOffset)
    }
}

impl CalorieEstimator {
    pub fn new(offsets: impl OffsetSource + 'static) -> Self {
        Self {
            offsets: Box::new(offsets),
        }
    }

    pub fn base_for(detail: &RecipeDetail) -> u32 {
        if detail.ingredient_slot(10).is_some() {
            RICH_BASE
        } else {
            LEAN_BASE
        }
    }

    pub fn estimate(&self, detail: &RecipeDetail) -> u32 {
        Self::base_for(detail) + self.offsets.next_offset()
    }
}
