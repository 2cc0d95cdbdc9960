//! Growable stroke buffer
//!
//! Points decoded from the tablet are appended here. Strokes are delimited
//! by [`Point::BOUNDARY`] markers written on pen-up, so the buffer holds every
//! stroke of the session back to back:
//!
//! ```text
//! [a, b, c, BOUNDARY, d, e, BOUNDARY, f, g]
//!                                     ^^^^ in-progress stroke
//! ```
//!
//! # Growth
//!
//! The buffer starts at a fixed capacity and grows by a fixed increment when a
//! write would not fit. Capacity never shrinks, not even on [`StrokeBuffer::clear`].
//! Growth may move the storage, which is why collaborators only ever get
//! borrowed views: a view cannot outlive the next push.
//! [`StrokeBuffer::generation`] counts growth events so relocation is observable.
//!
//! # Limits
//!
//! An optional `max_points` bounds the buffer, counting boundaries as entries.
//! When it is reached further points are refused with
//! [`TabletError::BufferLimit`]. One boundary is still accepted to close the
//! current stroke, but repeated boundaries past the limit collapse into it, so
//! the buffer holds at most `max_points + 1` entries.
//!
//! Allocation failure, at construction or on growth, is reported as
//! [`TabletError::BufferAlloc`] and leaves the buffer unchanged.

use crate::config::BufferConfig;
use crate::error::{Result, TabletError};
use crate::types::Point;

/// Default number of points allocated at session start
pub const DEFAULT_INITIAL_CAPACITY: usize = 2048;

/// Default number of points added on each growth
pub const DEFAULT_GROWTH_INCREMENT: usize = 1024;

/// Largest initial capacity a vector of points can describe
pub const MAX_INITIAL_CAPACITY: usize = isize::MAX as usize / std::mem::size_of::<Point>();

/// Append-only, auto-growing sequence of points
#[derive(Debug, Clone)]
pub struct StrokeBuffer {
    points: Vec<Point>,
    /// Logical capacity following the fixed-increment policy
    capacity: usize,
    increment: usize,
    max_points: Option<usize>,
    generation: u64,
}

impl Default for StrokeBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CAPACITY, DEFAULT_GROWTH_INCREMENT)
    }
}

impl StrokeBuffer {
    /// Create a buffer with the given initial capacity and growth increment
    ///
    /// An increment of zero is treated as one so a full buffer can always grow.
    ///
    /// # Panics
    ///
    /// Panics if the initial allocation fails. Use [`StrokeBuffer::try_new`]
    /// for capacities that come from configuration.
    pub fn new(initial_capacity: usize, increment: usize) -> Self {
        let mut buffer = Self::empty(initial_capacity, increment);
        buffer.points.reserve_exact(initial_capacity);
        buffer
    }

    /// Create a buffer, reporting allocation failure instead of panicking
    pub fn try_new(initial_capacity: usize, increment: usize) -> Result<Self> {
        let mut buffer = Self::empty(initial_capacity, increment);
        buffer
            .points
            .try_reserve_exact(initial_capacity)
            .map_err(|e| TabletError::BufferAlloc {
                capacity: initial_capacity,
                reason: e.to_string(),
            })?;
        Ok(buffer)
    }

    fn empty(initial_capacity: usize, increment: usize) -> Self {
        Self {
            points: Vec::new(),
            capacity: initial_capacity,
            increment: increment.max(1),
            max_points: None,
            generation: 0,
        }
    }

    /// Create a buffer from configuration
    pub fn from_config(config: &BufferConfig) -> Result<Self> {
        Ok(Self::try_new(config.initial_capacity, config.growth_increment)?
            .with_max_points(config.max_points))
    }

    /// Bound the number of stored entries
    ///
    /// The limit counts every entry, boundaries included. Once it is reached,
    /// points are refused and a boundary is only written if the last entry is
    /// not already one, so the buffer never holds more than `max_points + 1`
    /// entries.
    pub fn with_max_points(mut self, max_points: Option<usize>) -> Self {
        self.max_points = max_points;
        self
    }

    fn at_limit(&self) -> Option<usize> {
        self.max_points.filter(|&limit| self.points.len() >= limit)
    }

    /// Append a point at the cursor, growing storage if it is full
    pub fn push(&mut self, point: Point) -> Result<()> {
        if let Some(limit) = self.at_limit() {
            return Err(TabletError::BufferLimit { limit });
        }
        self.write(point)
    }

    /// Append the stroke boundary sentinel
    ///
    /// At the entry limit, a boundary directly after another one is not
    /// written again.
    pub fn mark_boundary(&mut self) -> Result<()> {
        if self.at_limit().is_some() && self.points.last().is_some_and(Point::is_boundary) {
            return Ok(());
        }
        self.write(Point::BOUNDARY)
    }

    fn write(&mut self, point: Point) -> Result<()> {
        if self.points.len() == self.capacity {
            self.grow()?;
        }
        self.points.push(point);
        Ok(())
    }

    fn grow(&mut self) -> Result<()> {
        let old_capacity = self.capacity;
        let overflow = |reason: String| TabletError::BufferAlloc {
            capacity: old_capacity,
            reason,
        };
        let new_capacity = old_capacity
            .checked_add(self.increment)
            .ok_or_else(|| overflow("capacity overflow".to_string()))?;
        self.points
            .try_reserve_exact(new_capacity - self.points.len())
            .map_err(|e| overflow(e.to_string()))?;

        self.capacity = new_capacity;
        self.generation += 1;
        tracing::debug!(
            "Stroke buffer grew from {} to {} points (generation {})",
            old_capacity,
            self.capacity,
            self.generation
        );
        Ok(())
    }

    /// Rewind the cursor to the start, keeping the allocated capacity
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Number of entries written, boundaries included
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether nothing has been written
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Current logical capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Configured growth increment
    #[inline]
    pub fn increment(&self) -> usize {
        self.increment
    }

    /// Configured entry limit, if any
    #[inline]
    pub fn max_points(&self) -> Option<usize> {
        self.max_points
    }

    /// Number of times the storage has grown
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Everything from the start of the buffer up to the cursor
    #[inline]
    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    /// Base address of the storage
    ///
    /// Only valid until the next push. Prefer [`StrokeBuffer::as_slice`].
    #[inline]
    pub fn as_ptr(&self) -> *const Point {
        self.points.as_ptr()
    }

    /// Points written since the last boundary (the in-progress stroke)
    pub fn current_stroke(&self) -> &[Point] {
        let start = self
            .points
            .iter()
            .rposition(Point::is_boundary)
            .map_or(0, |i| i + 1);
        &self.points[start..]
    }

    /// The most recently completed stroke, without its boundary
    pub fn last_completed_stroke(&self) -> Option<&[Point]> {
        let end = self.points.iter().rposition(Point::is_boundary)?;
        let start = self.points[..end]
            .iter()
            .rposition(Point::is_boundary)
            .map_or(0, |i| i + 1);
        Some(&self.points[start..end])
    }

    /// Number of boundaries written
    pub fn completed_strokes(&self) -> usize {
        self.points.iter().filter(|p| p.is_boundary()).count()
    }

    /// Iterate over strokes, completed ones first, then the in-progress one if non-empty
    pub fn strokes(&self) -> impl Iterator<Item = &[Point]> + '_ {
        let completed = self.completed_strokes();
        self.points
            .split(Point::is_boundary)
            .enumerate()
            .filter(move |(i, stroke)| *i < completed || !stroke.is_empty())
            .map(|(_, stroke)| stroke)
    }

    /// Consecutive point pairs suitable for line drawing
    ///
    /// No pair ever contains a boundary, so separate strokes are never joined.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points
            .windows(2)
            .filter(|w| !w[0].is_boundary() && !w[1].is_boundary())
            .map(|w| (w[0], w[1]))
    }
}
