//! Functions for decoding MRtrix TCK tractography files.
//!
//! A TCK file starts with an ASCII header of `key: value` lines terminated
//! by an `END` line. The binary coordinate stream begins at the byte offset
//! declared in the header's `file` field. Within the stream, a run of three
//! NaN values closes the current track and a run of three positive
//! infinities terminates the file. The header's `count` field is advisory:
//! the stream is authoritative and may hold fewer tracks.

use byteordered::{ByteOrdered, Endianness};

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{FormatError, Result};
use crate::rotation::{rotate_points, Rotation};

/// Marker line opening a TCK header. Carries no colon and is skipped by the
/// field parser rather than stored.
pub const TCK_MAGIC: &str = "mrtrix tracks";

/// Byte sequence terminating a TCK header.
pub const TCK_HEADER_END: &[u8] = b"END";

// Sentinel run lengths, one padding value per axis.
const TRACK_SEPARATOR_RUN: usize = 3;
const STREAM_TERMINATOR_RUN: usize = 3;

/// The parsed ASCII header of a TCK file.
///
/// `fields` holds every `key: value` line verbatim; the remaining members
/// are derived from the required `file`, `datatype` and `count` fields when
/// the header is parsed. `count` is the declared number of tracks and only
/// an upper bound: decoding trusts the stream, not the declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TckHeader {
    pub fields: HashMap<String, String>,
    pub data_offset: usize,
    pub element_size: usize,
    pub endianness: Endianness,
    pub count: usize,
}

impl TckHeader {
    /// Parse the header portion of a TCK byte buffer.
    ///
    /// Everything up to and including the `END` terminator is decoded as
    /// text and split into lines. Lines with a colon become fields, split at
    /// the first colon with both sides trimmed; later duplicates overwrite
    /// earlier ones. Colon-free lines, the format marker included, are
    /// skipped without error.
    pub fn from_bytes(bytes: &[u8]) -> Result<TckHeader> {
        let end = find_header_end(bytes).ok_or(FormatError::MissingHeaderEnd)?;
        let text = String::from_utf8_lossy(&bytes[..end + TCK_HEADER_END.len()]);

        let mut fields: HashMap<String, String> = HashMap::new();
        for line in text.lines() {
            if let Some((key, value)) = line.split_once(':') {
                fields.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        let data_offset = first_integer(require_field(&fields, "file")?)
            .ok_or(FormatError::InvalidHeaderField("file"))?;
        let count = first_integer(require_field(&fields, "count")?)
            .ok_or(FormatError::InvalidHeaderField("count"))?;

        let datatype = require_field(&fields, "datatype")?;
        let element_size = if datatype.contains("32") { 4 } else { 8 };
        let endianness = if datatype.contains("LE") {
            Endianness::Little
        } else {
            Endianness::Big
        };

        Ok(TckHeader {
            fields,
            data_offset,
            element_size,
            endianness,
            count,
        })
    }
}

/// A single fiber track: one polyline of 3D points in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub points: Vec<[f32; 3]>,
}

impl Track {
    /// Number of points on this track.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }
}

/// A decoded TCK tractography file: the parsed header and every track of
/// the binary stream, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct TckFile {
    pub header: TckHeader,
    pub tracks: Vec<Track>,
}

impl TckFile {
    /// Decode a TCK file from a byte buffer.
    ///
    /// The header is parsed first, then the coordinate stream is walked one
    /// element at a time from the declared offset. When a `rotation` is
    /// supplied it is applied to each track as it is emitted. A declared
    /// count differing from the number of tracks actually present is
    /// tolerated, and a stream that ends mid-track still yields that final
    /// track.
    pub fn from_bytes(bytes: &[u8], rotation: Option<Rotation>) -> Result<TckFile> {
        let header = TckHeader::from_bytes(bytes)?;
        let tracks = decode_tracks(bytes, &header, rotation)?;
        Ok(TckFile { header, tracks })
    }

    /// Read a TCK file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P, rotation: Option<Rotation>) -> Result<TckFile> {
        let bytes = fs::read(path)?;
        TckFile::from_bytes(&bytes, rotation)
    }

    /// Number of decoded tracks.
    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Total number of points over all tracks.
    pub fn num_points(&self) -> usize {
        self.tracks.iter().map(|track| track.points.len()).sum()
    }
}

impl fmt::Display for TckFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Tractogram with {} tracks and {} points in total.",
            self.num_tracks(),
            self.num_points()
        )
    }
}

/// Read a tractogram from a TCK file.
///
/// # Examples
///
/// ```no_run
/// let tractogram = fiberformats::read_tck("/path/to/tracks/cst.tck").unwrap();
/// println!("{} tracks", tractogram.num_tracks());
/// ```
pub fn read_tck<P: AsRef<Path>>(path: P) -> Result<TckFile> {
    TckFile::from_file(path, None)
}

/// Index of the header terminator, scanning the whole buffer.
fn find_header_end(bytes: &[u8]) -> Option<usize> {
    bytes
        .windows(TCK_HEADER_END.len())
        .position(|window| window == TCK_HEADER_END)
}

/// The first run of ASCII digits in `text`, parsed as an integer.
fn first_integer(text: &str) -> Option<usize> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits = &text[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

fn require_field<'a>(fields: &'a HashMap<String, String>, name: &'static str) -> Result<&'a str> {
    fields
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
        .ok_or(FormatError::MissingHeaderField(name))
}

/// Walk the binary stream and frame it into tracks.
fn decode_tracks(
    bytes: &[u8],
    header: &TckHeader,
    rotation: Option<Rotation>,
) -> Result<Vec<Track>> {
    // An offset at or past the end of the buffer leaves no stream to read.
    let payload = match bytes.get(header.data_offset..) {
        Some(payload) => payload,
        None => return Ok(Vec::new()),
    };
    let whole_elements = payload.len() / header.element_size;
    let mut input = ByteOrdered::runtime(payload, header.endianness);

    let mut tracks: Vec<Track> = Vec::new();
    let mut coords: Vec<f32> = Vec::new();
    let mut nan_run = 0;
    let mut inf_run = 0;

    for _ in 0..whole_elements {
        // The declared count is an upper bound; a zero declaration caps
        // nothing.
        if header.count > 0 && tracks.len() >= header.count {
            break;
        }

        let value = if header.element_size == 4 {
            f64::from(input.read_f32()?)
        } else {
            input.read_f64()?
        };

        if value.is_nan() {
            inf_run = 0;
            nan_run += 1;
            if nan_run == TRACK_SEPARATOR_RUN {
                emit_track(&mut coords, rotation, &mut tracks);
                nan_run = 0;
            }
        } else if value == f64::INFINITY {
            nan_run = 0;
            inf_run += 1;
            if inf_run == STREAM_TERMINATOR_RUN {
                break;
            }
        } else {
            // Negative infinity is not a sentinel and passes through as data.
            nan_run = 0;
            inf_run = 0;
            coords.push(value as f32);
        }
    }

    // A stream ending without a final separator still yields its last track.
    emit_track(&mut coords, rotation, &mut tracks);

    Ok(tracks)
}

/// Close the in-progress coordinate buffer as one track.
fn emit_track(coords: &mut Vec<f32>, rotation: Option<Rotation>, tracks: &mut Vec<Track>) {
    if coords.is_empty() {
        return;
    }
    if let Some(rotation) = rotation {
        rotate_points(coords, rotation);
    }
    let points = coords
        .chunks_exact(3)
        .map(|point| [point[0], point[1], point[2]])
        .collect();
    tracks.push(Track { points });
    coords.clear();
}
