// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning the written frames into a single looping animation.  The
//! pipeline only knows the Assembler trait; the GIF encoder in the
//! image crate and ImageMagick's `convert` are the two stock
//! implementations.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame as GifFrame};
use log::debug;

use crate::error::{Error, Result};

/// Something that takes an ordered list of frame files and produces
/// one animation that loops forever, showing each frame for `delay`.
pub trait Assembler {
    /// Builds the animation at `output`.
    fn assemble(&self, frames: &[PathBuf], delay: Duration, output: &Path) -> Result<()>;
}

/// Encodes an animated GIF in process.
#[derive(Copy, Clone, Debug)]
pub struct GifAssembler {
    /// Color quantization speed, 1 (best) through 30 (fastest).
    pub speed: i32,
}

impl Default for GifAssembler {
    fn default() -> GifAssembler {
        GifAssembler { speed: 10 }
    }
}

impl Assembler for GifAssembler {
    fn assemble(&self, frames: &[PathBuf], delay: Duration, output: &Path) -> Result<()> {
        let file = File::create(output).map_err(|e| Error::io(output, e))?;
        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), self.speed);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| Error::image(output, e))?;

        for path in frames {
            let pixels = image::open(path)
                .map_err(|e| Error::image(path.as_path(), e))?
                .to_rgba8();
            let frame = GifFrame::from_parts(pixels, 0, 0, Delay::from_saturating_duration(delay));
            encoder
                .encode_frame(frame)
                .map_err(|e| Error::image(output, e))?;
            debug!("appended {}", path.display());
        }
        Ok(())
    }
}

/// Shells out to ImageMagick:
/// `convert -delay <centiseconds> -loop 0 <frames...> <output>`.
#[derive(Clone, Debug)]
pub struct ConvertAssembler {
    /// The program to run.
    pub program: String,
}

impl Default for ConvertAssembler {
    fn default() -> ConvertAssembler {
        ConvertAssembler {
            program: "convert".to_string(),
        }
    }
}

impl ConvertAssembler {
    fn arguments(&self, frames: &[PathBuf], delay: Duration, output: &Path) -> Vec<String> {
        let centiseconds = delay.as_millis() / 10;
        let mut args = vec![
            "-delay".to_string(),
            centiseconds.to_string(),
            "-loop".to_string(),
            "0".to_string(),
        ];
        args.extend(frames.iter().map(|p| p.display().to_string()));
        args.push(output.display().to_string());
        args
    }
}

impl Assembler for ConvertAssembler {
    fn assemble(&self, frames: &[PathBuf], delay: Duration, output: &Path) -> Result<()> {
        let args = self.arguments(frames, delay, output);
        let command = format!("{} {}", self.program, args.join(" "));
        debug!("running {}", command);

        match Command::new(&self.program).args(&args).output() {
            Err(e) => Err(Error::Assembler {
                command,
                output: e.to_string(),
            }),
            Ok(out) if out.status.success() => Ok(()),
            Ok(out) => Err(Error::Assembler {
                command,
                output: format!(
                    "{}{}{}",
                    out.status,
                    String::from_utf8_lossy(&out.stdout),
                    String::from_utf8_lossy(&out.stderr)
                ),
            }),
        }
    }
}
