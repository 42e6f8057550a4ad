#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Monte Carlo π, animated
//!
//! Scatter points uniformly over a square and count how many land in
//! the disk inscribed in it.  The ratio of the two areas is π/4, so
//! four times the share of points inside the disk approaches π as
//! the points pile up.
//!
//! This crate renders that process.  Every frame of the animation
//! adds a batch of points to a square canvas, orange inside the disk
//! and magenta outside, and prints the current estimate across the
//! middle in seven-segment digits.  Points are never erased, so the
//! disk fills in as the sequence plays.  The frames are written as
//! binary portable pixmaps and then handed to an assembler that
//! stitches them into a looping GIF.
//!
//! The stages run in one direction only: `sampler` produces batches,
//! `raster` paints them, `glyph` draws the readout, `pipeline` drives
//! the three of them and `assemble` builds the animation.

pub mod assemble;
pub mod error;
pub mod glyph;
pub mod pipeline;
pub mod raster;
pub mod sampler;

pub use crate::assemble::{Assembler, ConvertAssembler, GifAssembler};
pub use crate::error::{Error, Result};
pub use crate::pipeline::{
    render_sequence, run, run_with, Frame, FrameSequence, RenderConfig, RunSummary,
};
pub use crate::sampler::{simulate, Estimate, Point, Simulation};
