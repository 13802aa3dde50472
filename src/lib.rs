//! Rust implementation of several neuroimaging file formats for fiber-tract
//! visualization.
//!
//! The focus of this package is on GIFTI surface and label files and on
//! MRtrix TCK tractography files. All decoders are pure functions of an
//! input buffer and produce plain in-memory geometry, label and track
//! structures.

pub mod color;
pub mod error;
pub mod gifti;
pub mod rotation;
pub mod tck;
pub mod util;

pub use color::{LabelPalette, NEUTRAL_GRAY, UNLABELED};
pub use error::{FormatError, Result};
pub use gifti::{
    parse_gifti_labels, read_gifti_labels, read_gifti_surface, GiftiSurface, INTENT_POINTSET,
    INTENT_TRIANGLE,
};
pub use rotation::{rotate_points, Rotation};
pub use tck::{read_tck, TckFile, TckHeader, Track, TCK_MAGIC};
