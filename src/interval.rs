//! Interval - active windows on the timeline axis
//!
//! An interval is a sorted list of disjoint `(start, end)` windows during which
//! a task runs. It is built from a flat breakpoint list that alternates
//! active/inactive boundaries, starting active: `[100, 200, 400, 500]` means
//! "run from 100 to 200, rest, run again from 400 to 500".

use crate::error::IntervalError;

/// A set of active windows, plus whether the caller pinned the final end.
#[derive(Clone, Debug, PartialEq)]
pub struct Interval {
    pairs: Vec<(f64, f64)>,
    has_explicit_end: bool,
}

impl Interval {
    /// Build an interval from breakpoints.
    ///
    /// An odd-length list is closed with `fallback_end`, and the interval is
    /// then considered open-ended: its last end may later be moved with
    /// [`Interval::set_end_time`].
    pub fn new(breakpoints: &[f64], fallback_end: f64) -> Result<Self, IntervalError> {
        if breakpoints.is_empty() {
            return Err(IntervalError::Empty);
        }
        if let Some(&value) = breakpoints.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(IntervalError::InvalidBreakpoint { value });
        }

        let has_explicit_end = breakpoints.len() % 2 == 0;
        let mut points = breakpoints.to_vec();
        if !has_explicit_end {
            if !fallback_end.is_finite() {
                return Err(IntervalError::InvalidBreakpoint {
                    value: fallback_end,
                });
            }
            points.push(fallback_end);
        }

        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(points.len() / 2);
        for chunk in points.chunks_exact(2) {
            let (start, end) = (chunk[0], chunk[1]);
            if start >= end {
                return Err(IntervalError::NonIncreasing { start, end });
            }
            if let Some(&(_, previous_end)) = pairs.last() {
                if start < previous_end {
                    return Err(IntervalError::Overlapping {
                        previous_end,
                        start,
                    });
                }
            }
            pairs.push((start, end));
        }

        Ok(Self {
            pairs,
            has_explicit_end,
        })
    }

    /// The active windows, in order.
    pub fn pairs(&self) -> &[(f64, f64)] {
        &self.pairs
    }

    /// Whether the final end came from the breakpoint list itself.
    pub fn has_explicit_end(&self) -> bool {
        self.has_explicit_end
    }

    /// End of the last window.
    pub fn end_time(&self) -> f64 {
        self.pairs[self.pairs.len() - 1].1
    }

    /// True if `time` lies inside any window (both ends inclusive).
    pub fn includes(&self, time: f64) -> bool {
        self.pairs
            .iter()
            .any(|&(start, end)| time >= start && time <= end)
    }

    /// Active time accrued up to `time`.
    ///
    /// Gaps between windows do not count, so this is the clock a task sees.
    pub fn active_time(&self, time: f64) -> f64 {
        // NaN fails this comparison too
        if !(time > 0.0) {
            return 0.0;
        }

        let mut total = 0.0;
        for &(start, end) in &self.pairs {
            if time < start {
                break;
            }
            if time > end {
                total += end - start;
                continue;
            }
            total += time - start;
            break;
        }
        total
    }

    /// True once `time` has reached the end of the last window.
    pub fn is_over(&self, time: f64) -> bool {
        time >= self.end_time()
    }

    /// If `time` falls strictly inside a gap between two windows, the time at
    /// which that gap began (the end of the earlier window).
    pub fn pause_point(&self, time: f64) -> Option<f64> {
        self.pairs
            .windows(2)
            .find(|w| w[0].1 < time && time < w[1].0)
            .map(|w| w[0].1)
    }

    /// Move the end of the last window.
    ///
    /// Ignored when the end was given explicitly. Rejects an end that would
    /// leave the last window empty; the interval is unchanged in that case.
    pub fn set_end_time(&mut self, time: f64) -> Result<(), IntervalError> {
        if self.has_explicit_end {
            return Ok(());
        }
        let last = self.pairs.len() - 1;
        let start = self.pairs[last].0;
        if !time.is_finite() || time <= start {
            return Err(IntervalError::DegenerateEnd { start, end: time });
        }
        self.pairs[last].1 = time;
        Ok(())
    }
}
