//! Errors raised at the platform boundary.
//!
//! Formatting and phase selection are total; only surface bookkeeping and
//! configuration I/O can fail.

use crate::platform::{FontHandle, RegionId};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaceError {
    /// A region handle that was never created or was already destroyed
    #[error("unknown text region {0:?}")]
    UnknownRegion(RegionId),

    /// A font handle that was never loaded or was already unloaded
    #[error("unknown font {0:?}")]
    UnknownFont(FontHandle),

    /// A refresh was requested before the face was loaded or after it was unloaded
    #[error("watch face is not displayed")]
    NotDisplayed,

    #[error("config IO: {0}")]
    Io(#[from] io::Error),

    #[error("config encoding: {0}")]
    ConfigEncode(#[from] toml::ser::Error),
}
