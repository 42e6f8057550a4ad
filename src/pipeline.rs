// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The frame pipeline: sampler, then raster, then readout, once per
//! frame, and finally the assembler.  Points accumulate on a single
//! canvas for the whole run; each frame is a copy of that canvas with
//! the current estimate printed over it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam::thread::ScopedJoinHandle;
use log::{debug, info, warn};
use rand::Rng;

use crate::assemble::Assembler;
use crate::error::{Error, Result};
use crate::glyph::{draw_text, SegmentGeometry};
use crate::raster::{paint_points, PixelBuffer};
use crate::sampler::{Estimate, Simulation};

/// The number of frames when none is asked for.
pub const DEFAULT_FRAMES: usize = 10;

/// Validated parameters of one run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Width, and height, of every frame in pixels.
    pub width: usize,
    /// Total number of points drawn.
    pub samples: u64,
    /// Decimals shown in the readout.
    pub precision: usize,
    /// Frames requested.
    pub frames: usize,
    /// Threads used to write the frames out.
    pub threads: usize,
}

impl RenderConfig {
    /// A configuration with the default frame count and one writer
    /// thread.
    pub fn new(width: usize, samples: u64, precision: usize) -> RenderConfig {
        RenderConfig {
            width,
            samples,
            precision,
            frames: DEFAULT_FRAMES,
            threads: 1,
        }
    }

    /// Overrides the frame count.
    pub fn with_frames(mut self, frames: usize) -> RenderConfig {
        self.frames = frames;
        self
    }

    /// Overrides the writer thread count.
    pub fn with_threads(mut self, threads: usize) -> RenderConfig {
        self.threads = threads;
        self
    }

    /// Rejects parameters no run can be made from.  A batch must hold
    /// at least two points, since the first estimate is divided by
    /// the index of the last point in the batch.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(Error::config("image size must be greater than zero"));
        }
        if self.samples == 0 {
            return Err(Error::config("number of points must be greater than zero"));
        }
        if self.frames == 0 {
            return Err(Error::config("number of frames must be greater than zero"));
        }
        if self.threads == 0 {
            return Err(Error::config("number of threads must be greater than zero"));
        }
        if self.samples <= self.frames as u64 {
            return Err(Error::config(format!(
                "{} points over {} frames leaves fewer than two points per frame",
                self.samples, self.frames
            )));
        }
        Ok(())
    }
}

/// What a frame is called on disk: its place in the sequence and the
/// estimate it shows, split at the decimal point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameLabel {
    /// Position in the sequence, from zero.
    pub index: usize,
    /// Digits before the decimal point.
    pub integer: String,
    /// Digits after the decimal point, cut to the precision.
    pub fraction: String,
}

impl FrameLabel {
    /// Labels the `index`th frame showing `estimate`.
    pub fn new(index: usize, estimate: &Estimate, precision: usize) -> FrameLabel {
        let text = estimate.text();
        let mut parts = text.splitn(2, '.');
        let integer = parts.next().unwrap_or("").to_string();
        let fraction = parts.next().unwrap_or("").chars().take(precision).collect();
        FrameLabel {
            index,
            integer,
            fraction,
        }
    }

    /// img{index}_{integer}-{fraction}.ppm
    pub fn file_name(&self) -> String {
        format!("img{}_{}-{}.ppm", self.index, self.integer, self.fraction)
    }

    /// {integer}-{fraction}.gif
    pub fn animation_name(&self) -> String {
        format!("{}-{}.gif", self.integer, self.fraction)
    }
}

/// One composited image of the sequence.
#[derive(Clone, Debug)]
pub struct Frame {
    /// The canvas with the readout drawn over it.
    pub buffer: PixelBuffer,
    /// The estimate printed on this frame.
    pub estimate: Estimate,
    /// How the frame is named on disk.
    pub label: FrameLabel,
    /// Points painted on the canvas so far, this frame's included.
    pub points: usize,
}

/// The frames of one run, composited one at a time as they are
/// pulled.  Only the canvas of accumulated points is kept between
/// frames; every Frame handed out is the caller's to write or drop.
pub struct FrameSequence<R: Rng> {
    simulation: Simulation<R>,
    geometry: SegmentGeometry,
    canvas: PixelBuffer,
    precision: usize,
    index: usize,
    painted: usize,
}

impl<R: Rng> FrameSequence<R> {
    /// Validates `config` and prepares a blank canvas.  No points are
    /// drawn until the first frame is pulled.
    pub fn new(config: &RenderConfig, rng: R) -> Result<FrameSequence<R>> {
        config.validate()?;

        let geometry = SegmentGeometry::new(config.width, config.width, config.precision);
        if geometry.is_degenerate() {
            warn!(
                "a {}px image has no room for {} decimals; the readout will be unreadable",
                config.width, config.precision
            );
        }

        Ok(FrameSequence {
            simulation: Simulation::new(rng, config.samples, config.frames as u64)?,
            geometry,
            canvas: PixelBuffer::new(config.width, config.width),
            precision: config.precision,
            index: 0,
            painted: 0,
        })
    }

    /// The accumulated points, without any readout.
    pub fn canvas(&self) -> &PixelBuffer {
        &self.canvas
    }

    /// The readout layout used for every frame.
    pub fn geometry(&self) -> &SegmentGeometry {
        &self.geometry
    }
}

impl<R: Rng> Iterator for FrameSequence<R> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let (estimate, batch) = self.simulation.next_batch()?;
        paint_points(&mut self.canvas, &batch);
        self.painted += batch.len();

        let mut buffer = self.canvas.clone();
        draw_text(&mut buffer, &estimate.text(), self.precision, &self.geometry);
        debug!(
            "frame {}: {} points, estimate {}",
            self.index,
            self.painted,
            estimate.text()
        );

        let frame = Frame {
            buffer,
            label: FrameLabel::new(self.index, &estimate, self.precision),
            estimate,
            points: self.painted,
        };
        self.index += 1;
        Some(frame)
    }
}

/// Renders the sequence with the thread-local random generator.
pub fn render_sequence(config: &RenderConfig) -> Result<Vec<Frame>> {
    render_sequence_with(config, rand::thread_rng())
}

/// Renders the whole sequence of frames into memory, drawing points
/// from `rng`.  `run` streams them to disk instead.
pub fn render_sequence_with<R: Rng>(config: &RenderConfig, rng: R) -> Result<Vec<Frame>> {
    Ok(FrameSequence::new(config, rng)?.collect())
}

/// Writes one frame as a binary portable pixmap.
pub fn write_frame(frame: &Frame, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);
    frame
        .buffer
        .write_ppm(&mut out)
        .and_then(|_| out.flush())
        .map_err(|e| Error::io(path, e))
}

/// Writes every frame into `dir`, spreading the work over `threads`
/// workers.  Returns the paths in sequence order.
pub fn write_frames(frames: &[Frame], dir: &Path, threads: usize) -> Result<Vec<PathBuf>> {
    let paths: Vec<PathBuf> = frames.iter().map(|f| dir.join(f.label.file_name())).collect();
    let results: Vec<Result<()>> = {
        let jobs = Arc::new(Mutex::new(frames.iter().zip(paths.iter())));
        crossbeam::scope(|spawner| {
            let handles: Vec<ScopedJoinHandle<Result<()>>> = (0..threads.max(1))
                .map(|_| {
                    let jobs = jobs.clone();
                    spawner.spawn(move |_| -> Result<()> {
                        loop {
                            let job = { jobs.lock().unwrap().next() };
                            match job {
                                Some((frame, path)) => {
                                    write_frame(frame, path)?;
                                    info!("wrote {}", path.display());
                                }
                                None => return Ok(()),
                            }
                        }
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    };

    for result in results {
        result?;
    }
    Ok(paths)
}

/// What a completed run left behind.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// The frame files, in order.
    pub frames: Vec<PathBuf>,
    /// The animated artifact.
    pub animation: PathBuf,
    /// The estimate shown on the last frame.
    pub estimate: Estimate,
}

/// Renders, writes and assembles a whole run into `dir`.  Frames go
/// to disk in groups of `threads` as they are composited, so at most
/// that many are held at once.  If the assembler fails the frames stay
/// where they were written.
pub fn run(
    config: &RenderConfig,
    dir: &Path,
    assembler: &dyn Assembler,
    delay: Duration,
) -> Result<RunSummary> {
    run_with(config, dir, assembler, delay, rand::thread_rng())
}

/// `run`, drawing points from `rng`.
pub fn run_with<R: Rng>(
    config: &RenderConfig,
    dir: &Path,
    assembler: &dyn Assembler,
    delay: Duration,
    rng: R,
) -> Result<RunSummary> {
    let mut sequence = FrameSequence::new(config, rng)?;
    let chunk = config.threads.max(1);
    let mut paths = Vec::with_capacity(config.frames);
    let mut last = None;

    loop {
        let frames: Vec<Frame> = sequence.by_ref().take(chunk).collect();
        let (estimate, label) = match frames.last() {
            Some(frame) => (frame.estimate, frame.label.clone()),
            None => break,
        };
        paths.extend(write_frames(&frames, dir, config.threads)?);
        last = Some((estimate, label));
    }

    let (estimate, animation) = match last {
        Some((estimate, label)) => (estimate, dir.join(label.animation_name())),
        None => return Err(Error::config("the simulation produced no frames")),
    };

    assembler.assemble(&paths, delay, &animation)?;
    info!(
        "assembled {} frames into {}",
        paths.len(),
        animation.display()
    );

    Ok(RunSummary {
        frames: paths,
        animation,
        estimate,
    })
}
