// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Monte Carlo sampler.  Points are drawn uniformly from the
//! square (-1, 1) x (-1, 1); the share of them that lands inside the
//! inscribed unit disk approaches π/4.  The sampler hands them out in
//! batches, one batch per frame of the animation, together with the
//! estimate of π as it stood when the batch was closed.

use num::rational::Ratio;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::error::{Error, Result};

/// A sampled point in simulation space.  Both coordinates lie in
/// [-1, 1).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point(pub f64, pub f64);

/// Returns true if (px, py) lies strictly inside the circle centered
/// on (cx, cy).  A point exactly on the circumference is outside.
#[inline]
pub fn is_in_circle(px: f64, py: f64, cx: f64, cy: f64, radius: f64) -> bool {
    (px - cx) * (px - cx) + (py - cy) * (py - cy) < radius * radius
}

/// The running approximation of π: four times the number of points
/// found inside the disk, over the zero-based index of the last point
/// drawn.  The denominator deliberately does not count the point that
/// closed the batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Estimate(Ratio<u64>);

impl Estimate {
    /// Build an estimate from the inside count and the index of the
    /// draw that closed the batch.  The index must not be zero; a
    /// Simulation never closes a batch on the first draw.
    pub fn new(inside: u64, index: u64) -> Estimate {
        Estimate(Ratio::new_raw(4 * inside, index))
    }

    /// The unreduced ratio, 4 * inside / index.
    pub fn ratio(&self) -> Ratio<u64> {
        self.0
    }

    /// The estimate as a float.
    pub fn value(&self) -> f64 {
        *self.0.numer() as f64 / *self.0.denom() as f64
    }

    /// The shortest decimal text that reads back as the same float,
    /// always with a decimal point: 4 is written "4.0".
    pub fn text(&self) -> String {
        let mut text = format!("{}", self.value());
        if !text.contains('.') {
            text.push_str(".0");
        }
        text
    }
}

/// The number of draws that make up one batch.  This rounds up, so
/// that a sample count the frame count does not divide produces fewer
/// batches than frames, never more; the short batch at the end is
/// dropped.
pub fn batch_length(samples: u64, frames: u64) -> u64 {
    let frames = frames.max(1);
    (samples / frames + (samples % frames != 0) as u64).max(1)
}

// Batches are collected into a Vec; past this size it grows as needed.
const BATCH_RESERVE: u64 = 1 << 16;

/// The sampler's state between batches.  Pull batches one at a time
/// with `next_batch`, or iterate.  A Simulation is consumed as it
/// goes; a second run needs a second Simulation, and draws fresh
/// points.
pub struct Simulation<R: Rng> {
    rng: R,
    range: Uniform<f64>,
    samples: u64,
    batch: u64,
    drawn: u64,
    inside: u64,
}

impl<R: Rng> Simulation<R> {
    /// Prepares a run of `samples` draws split over `frames` batches.
    /// Every batch needs at least two draws, since an estimate is
    /// divided by the index of the draw that closes its batch, so
    /// `samples` must exceed `frames`.
    pub fn new(rng: R, samples: u64, frames: u64) -> Result<Simulation<R>> {
        if frames == 0 {
            return Err(Error::config("number of frames must be greater than zero"));
        }
        if samples <= frames {
            return Err(Error::config(format!(
                "{} points over {} frames leaves fewer than two points per frame",
                samples, frames
            )));
        }
        Ok(Simulation {
            rng,
            range: Uniform::new(-1.0_f64, 1.0),
            samples,
            batch: batch_length(samples, frames),
            drawn: 0,
            inside: 0,
        })
    }

    /// The number of draws in each batch.
    pub fn batch_len(&self) -> u64 {
        self.batch
    }

    /// Draws points until the next batch boundary and returns the
    /// estimate at that point along with the batch.  Returns None once
    /// the draws are exhausted; any points drawn after the last full
    /// batch are discarded.
    pub fn next_batch(&mut self) -> Option<(Estimate, Vec<Point>)> {
        let mut points = Vec::with_capacity(self.batch.min(BATCH_RESERVE) as usize);
        while self.drawn < self.samples {
            let index = self.drawn;
            let point = Point(
                self.range.sample(&mut self.rng),
                self.range.sample(&mut self.rng),
            );
            if is_in_circle(point.0, point.1, 0.0, 0.0, 1.0) {
                self.inside += 1;
            }
            points.push(point);
            self.drawn += 1;
            if self.drawn % self.batch == 0 {
                return Some((Estimate::new(self.inside, index), points));
            }
        }
        None
    }
}

impl<R: Rng> Iterator for Simulation<R> {
    type Item = (Estimate, Vec<Point>);

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch()
    }
}

/// A simulation driven by the thread-local generator.  Fails under
/// the same conditions as `Simulation::new`.
pub fn simulate(samples: u64, frames: u64) -> Result<Simulation<ThreadRng>> {
    Simulation::new(rand::thread_rng(), samples, frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(samples: u64, frames: u64) -> Simulation<StdRng> {
        Simulation::new(StdRng::seed_from_u64(7), samples, frames).unwrap()
    }

    #[test]
    fn boundary_point_is_outside() {
        assert!(!is_in_circle(1.0, 0.0, 0.0, 0.0, 1.0));
        assert!(!is_in_circle(0.0, -1.0, 0.0, 0.0, 1.0));
        assert!(is_in_circle(0.5, 0.5, 0.0, 0.0, 1.0));
    }

    #[test]
    fn even_split_yields_every_frame() {
        let batches: Vec<_> = seeded(1000, 10).collect();
        assert_eq!(batches.len(), 10);
        for (_, points) in &batches {
            assert_eq!(points.len(), 100);
        }
    }

    #[test]
    fn uneven_split_drops_the_tail() {
        let batches: Vec<_> = seeded(25, 10).collect();
        assert_eq!(batch_length(25, 10), 3);
        assert_eq!(batches.len(), 8);
        let total: usize = batches.iter().map(|(_, p)| p.len()).sum();
        assert_eq!(total, 24);
    }

    #[test]
    fn denominator_is_the_index_of_the_closing_draw() {
        let mut inside = 0;
        let mut drawn = 0;
        for (estimate, points) in seeded(1000, 10) {
            drawn += points.len() as u64;
            inside += points
                .iter()
                .filter(|p| is_in_circle(p.0, p.1, 0.0, 0.0, 1.0))
                .count() as u64;
            assert_eq!(*estimate.ratio().denom(), drawn - 1);
            assert_eq!(*estimate.ratio().numer(), 4 * inside);
        }
        assert_eq!(drawn, 1000);
    }

    #[test]
    fn batch_length_survives_the_largest_sample_count() {
        let max = u64::max_value();
        assert_eq!(batch_length(max, 10), max / 10 + 1);
        assert_eq!(batch_length(max, 1), max);
        assert_eq!(batch_length(max, max), 1);
        assert_eq!(batch_length(1000, 10), 100);
        assert_eq!(batch_length(1001, 10), 101);
    }

    #[test]
    fn huge_runs_start_without_reserving_the_whole_batch() {
        let mut sim = seeded(u64::max_value(), 10);
        assert_eq!(sim.batch_len(), u64::max_value() / 10 + 1);
        assert_eq!(sim.drawn, 0);
        sim.samples = 3;
        assert!(sim.next_batch().is_none());
    }

    #[test]
    fn refuses_single_draw_batches() {
        let rng = || StdRng::seed_from_u64(1);
        assert!(Simulation::new(rng(), 10, 10).is_err());
        assert!(Simulation::new(rng(), 5, 10).is_err());
        assert!(Simulation::new(rng(), 100, 0).is_err());
        assert!(Simulation::new(rng(), 11, 10).is_ok());
        assert!(simulate(10, 10).is_err());
    }

    #[test]
    fn no_estimate_has_a_zero_denominator() {
        for (estimate, _) in seeded(11, 10) {
            assert!(*estimate.ratio().denom() > 0);
            assert!(estimate.value().is_finite());
        }
    }

    #[test]
    fn points_stay_in_the_square() {
        for (_, points) in seeded(5000, 5) {
            for p in points {
                assert!(p.0 >= -1.0 && p.0 < 1.0);
                assert!(p.1 >= -1.0 && p.1 < 1.0);
            }
        }
    }

    #[test]
    fn estimate_converges() {
        let (estimate, _) = seeded(200_000, 1).last().unwrap();
        assert!((estimate.value() - std::f64::consts::PI).abs() < 0.05);
    }

    #[test]
    fn estimate_text_always_has_a_point() {
        assert_eq!(Estimate::new(1, 1).text(), "4.0");
        assert_eq!(Estimate::new(157, 200).text(), "3.14");
        assert_eq!(Estimate::new(0, 9).text(), "0.0");
    }

    #[test]
    fn simulations_are_single_pass() {
        let mut sim = seeded(100, 2);
        assert!(sim.next_batch().is_some());
        assert!(sim.next_batch().is_some());
        assert!(sim.next_batch().is_none());
        assert!(sim.next_batch().is_none());
    }
}
