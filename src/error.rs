// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error type shared by every stage of the renderer.

use failure::Fail;
use std::io;
use std::path::PathBuf;

/// Everything that can go wrong between validating the parameters
/// and handing the frames to the assembler.
#[derive(Debug, Fail)]
pub enum Error {
    /// A parameter was rejected before any sampling began.
    #[fail(display = "invalid configuration: {}", _0)]
    Config(String),

    /// A frame or the animation could not be written or read.
    #[fail(display = "I/O error on {:?}: {}", path, cause)]
    Io {
        /// The file being written or read.
        path: PathBuf,
        /// The underlying failure.
        #[cause]
        cause: io::Error,
    },

    /// The image crate could not decode a frame or encode the animation.
    #[fail(display = "image error on {:?}: {}", path, cause)]
    Image {
        /// The file being decoded or encoded.
        path: PathBuf,
        /// The underlying failure.
        #[cause]
        cause: image::ImageError,
    },

    /// The external animation assembler did not finish successfully.
    #[fail(display = "assembler failed: {}\n{}", command, output)]
    Assembler {
        /// The command line that was run.
        command: String,
        /// Whatever the command said on its way out.
        output: String,
    },
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Error {
        Error::Config(msg.into())
    }

    pub(crate) fn io<P: Into<PathBuf>>(path: P, cause: io::Error) -> Error {
        Error::Io {
            path: path.into(),
            cause,
        }
    }

    pub(crate) fn image<P: Into<PathBuf>>(path: P, cause: image::ImageError) -> Error {
        Error::Image {
            path: path.into(),
            cause,
        }
    }
}

/// A Result carrying the crate's error.
pub type Result<T> = std::result::Result<T, Error>;
