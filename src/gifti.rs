//! Functions for decoding GIFTI brain surface and label files.
//!
//! GIFTI is the XML-based geometry format of the NIfTI family. A surface
//! file carries two data arrays tagged by intent, one with vertex
//! coordinates and one with triangle indices; a label file carries a single
//! data array assigning one integer label to each vertex. Payloads are
//! base64 text wrapping zlib-compressed little-endian scalars.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{FormatError, Result};
use crate::rotation::{rotate_points, Rotation};
use crate::util::{decode_base64_zlib, interpret_le_f32, interpret_le_i32, interpret_le_u32};

/// Intent value marking the data array that holds vertex coordinates.
pub const INTENT_POINTSET: &str = "NIFTI_INTENT_POINTSET";
/// Intent value marking the data array that holds triangle indices.
pub const INTENT_TRIANGLE: &str = "NIFTI_INTENT_TRIANGLE";

// Bytes per decoded point or triangle: three 4-byte elements.
const GROUP_STRIDE: usize = 12;

/// A triangle mesh decoded from a GIFTI surface file.
///
/// `positions` holds vertex coordinates as consecutive x,y,z runs and
/// `triangles` holds vertex indices in groups of three. The source format
/// stores triangles clockwise; decoded triangles are counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct GiftiSurface {
    pub positions: Vec<f32>,
    pub triangles: Vec<u32>,
}

impl GiftiSurface {
    /// Decode a surface from GIFTI document text.
    ///
    /// The data arrays with the point-set and triangle intents are located,
    /// their payloads inflated and reinterpreted, the winding of every
    /// triangle corrected, and the optional `rotation` applied to the point
    /// buffer.
    pub fn from_xml(xml: &str, rotation: Option<Rotation>) -> Result<GiftiSurface> {
        let arrays = collect_data_arrays(xml)?;
        let point_bytes = decode_base64_zlib(data_with_intent(&arrays, INTENT_POINTSET)?)?;
        let triangle_bytes = decode_base64_zlib(data_with_intent(&arrays, INTENT_TRIANGLE)?)?;

        if point_bytes.len() % GROUP_STRIDE != 0 {
            return Err(FormatError::MisalignedDataArray(
                point_bytes.len(),
                GROUP_STRIDE,
            ));
        }
        if triangle_bytes.len() % GROUP_STRIDE != 0 {
            return Err(FormatError::MisalignedDataArray(
                triangle_bytes.len(),
                GROUP_STRIDE,
            ));
        }

        let mut positions = interpret_le_f32(&point_bytes)?;
        let mut triangles = interpret_le_u32(&triangle_bytes)?;

        if let Some(rotation) = rotation {
            rotate_points(&mut positions, rotation);
        }

        // The file stores each triangle clockwise; swapping the second and
        // third index exactly once makes the winding counter-clockwise.
        for triangle in triangles.chunks_exact_mut(3) {
            triangle.swap(1, 2);
        }

        Ok(GiftiSurface {
            positions,
            triangles,
        })
    }

    /// Read a surface from a GIFTI file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P, rotation: Option<Rotation>) -> Result<GiftiSurface> {
        let xml = fs::read_to_string(path)?;
        GiftiSurface::from_xml(&xml, rotation)
    }

    /// Number of decoded vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of decoded triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len() / 3
    }
}

impl fmt::Display for GiftiSurface {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Surface mesh with {} vertices and {} triangles.",
            self.num_vertices(),
            self.num_triangles()
        )
    }
}

/// Decode the per-vertex labels of a GIFTI label file.
///
/// Label files carry exactly one data array, so no intent filtering is
/// needed: the first array's payload is inflated and reinterpreted as one
/// signed 32-bit label per vertex, in file order. The value 0 marks
/// unlabelled vertices by convention. The length is not validated against
/// any surface here; pairing the two is the caller's concern.
pub fn parse_gifti_labels(xml: &str) -> Result<Vec<i32>> {
    let arrays = collect_data_arrays(xml)?;
    let array = arrays.first().ok_or(FormatError::MissingLabelArray)?;
    let data = match array.data.as_deref() {
        Some(data) if !data.trim().is_empty() => data,
        _ => return Err(FormatError::EmptyDataArray),
    };
    interpret_le_i32(&decode_base64_zlib(data)?)
}

/// Read a brain surface mesh from a GIFTI file.
///
/// # Examples
///
/// ```no_run
/// let surface = fiberformats::read_gifti_surface("/path/to/surfaces/lh.white.surf.gii").unwrap();
/// println!("{} vertices", surface.num_vertices());
/// ```
pub fn read_gifti_surface<P: AsRef<Path>>(path: P) -> Result<GiftiSurface> {
    GiftiSurface::from_file(path, None)
}

/// Read per-vertex labels from a GIFTI label file.
///
/// # Examples
///
/// ```no_run
/// let labels = fiberformats::read_gifti_labels("/path/to/parcellation/lh.labels.gii").unwrap();
/// println!("{} labelled vertices", labels.len());
/// ```
pub fn read_gifti_labels<P: AsRef<Path>>(path: P) -> Result<Vec<i32>> {
    let xml = fs::read_to_string(path)?;
    parse_gifti_labels(&xml)
}

/// One DataArray element of a GIFTI document: its intent attribute, if any,
/// and the text of its first Data child.
#[derive(Debug)]
struct RawDataArray {
    intent: Option<String>,
    data: Option<String>,
}

/// Collect every DataArray in document order.
fn collect_data_arrays(xml: &str) -> Result<Vec<RawDataArray>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut arrays: Vec<RawDataArray> = Vec::new();
    let mut in_array = false;
    let mut in_data = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"DataArray" => {
                    in_array = true;
                    arrays.push(RawDataArray {
                        intent: attribute_value(e, "Intent"),
                        data: None,
                    });
                }
                // Only the first Data child of an array is captured.
                b"Data" if in_array => {
                    in_data = arrays.last().is_some_and(|a| a.data.is_none());
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"DataArray" => {
                arrays.push(RawDataArray {
                    intent: attribute_value(e, "Intent"),
                    data: None,
                });
            }
            Ok(Event::Text(ref t)) if in_data => {
                let text = t.unescape()?;
                append_data(&mut arrays, &text);
            }
            Ok(Event::CData(ref t)) if in_data => {
                let text = String::from_utf8_lossy(t);
                append_data(&mut arrays, &text);
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"DataArray" => in_array = false,
                b"Data" => in_data = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(FormatError::Xml(e)),
        }
        buf.clear();
    }

    Ok(arrays)
}

fn append_data(arrays: &mut [RawDataArray], text: &str) {
    if let Some(array) = arrays.last_mut() {
        match &mut array.data {
            Some(data) => data.push_str(text),
            None => array.data = Some(text.to_string()),
        }
    }
}

/// The payload text of the data array tagged with `intent`.
fn data_with_intent<'a>(arrays: &'a [RawDataArray], intent: &'static str) -> Result<&'a str> {
    let array = arrays
        .iter()
        .find(|a| a.intent.as_deref() == Some(intent))
        .ok_or(FormatError::MissingDataArray(intent))?;
    match array.data.as_deref() {
        Some(data) if !data.trim().is_empty() => Ok(data),
        _ => Err(FormatError::EmptyDataArray),
    }
}

fn attribute_value(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            return String::from_utf8(attr.value.to_vec()).ok();
        }
    }
    None
}
