//! Utility functions used by the format decoders.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use byteordered::ByteOrdered;
use flate2::bufread::ZlibDecoder;

use std::io::Read;

use crate::error::{FormatError, Result};

/// Decode a base64 string holding a zlib stream into the raw bytes it wraps.
///
/// GIFTI data arrays store their payload this way, usually broken across
/// several indented lines, so all whitespace is stripped before the base64
/// alphabet is decoded.
pub fn decode_base64_zlib(text: &str) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let compressed = STANDARD.decode(cleaned)?;

    let mut raw = Vec::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_end(&mut raw)
        .map_err(FormatError::Inflate)?;
    Ok(raw)
}

/// Reinterpret raw little-endian bytes as a vector of f32 values.
pub fn interpret_le_f32(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(FormatError::MisalignedDataArray(bytes.len(), 4));
    }
    let mut input = ByteOrdered::le(bytes);
    let mut values: Vec<f32> = Vec::with_capacity(bytes.len() / 4);
    for _ in 0..bytes.len() / 4 {
        values.push(input.read_f32()?);
    }
    Ok(values)
}

/// Reinterpret raw little-endian bytes as a vector of u32 values.
pub fn interpret_le_u32(bytes: &[u8]) -> Result<Vec<u32>> {
    if bytes.len() % 4 != 0 {
        return Err(FormatError::MisalignedDataArray(bytes.len(), 4));
    }
    let mut input = ByteOrdered::le(bytes);
    let mut values: Vec<u32> = Vec::with_capacity(bytes.len() / 4);
    for _ in 0..bytes.len() / 4 {
        values.push(input.read_u32()?);
    }
    Ok(values)
}

/// Reinterpret raw little-endian bytes as a vector of i32 values.
pub fn interpret_le_i32(bytes: &[u8]) -> Result<Vec<i32>> {
    if bytes.len() % 4 != 0 {
        return Err(FormatError::MisalignedDataArray(bytes.len(), 4));
    }
    let mut input = ByteOrdered::le(bytes);
    let mut values: Vec<i32> = Vec::with_capacity(bytes.len() / 4);
    for _ in 0..bytes.len() / 4 {
        values.push(input.read_i32()?);
    }
    Ok(values)
}
