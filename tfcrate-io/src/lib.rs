//! JSON message codecs for tfcrate
//!
//! This crate decodes transform messages and frame-tagged entity batches as
//! published by robot telemetry sources, and writes resolver output back as
//! JSON.

pub mod error;
pub mod message;
pub mod marker;

pub use error::*;
pub use marker::{Marker, MarkerArray};
pub use message::{Header, TfMessage, TransformMessage, TransformStamped};

use log::debug;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tfcrate_core::RawTransform;

use marker::MarkerPayload;
use message::TransformPayload;

/// Decode transform records.
///
/// Accepts a single message, an array of messages, or a `TFMessage`
/// wrapper, in the flat or ROS stamped shape. Records are not validated
/// here; incomplete ones are rejected when ingested.
pub fn parse_transforms(json: &str) -> Result<Vec<RawTransform>> {
    let payload: TransformPayload = serde_json::from_str(json)?;
    let records = payload.into_raw();
    debug!("Decoded {} transform records", records.len());
    Ok(records)
}

/// Decode a marker batch from `{ header?, markers: [...] }` or a bare array
pub fn parse_markers(json: &str) -> Result<MarkerArray> {
    let payload: MarkerPayload = serde_json::from_str(json)?;
    let array = MarkerArray::from(payload);
    debug!(
        "Decoded {} markers (frame {:?})",
        array.markers.len(),
        array.frame_id()
    );
    Ok(array)
}

/// Read transform records from a JSON file
pub fn read_transforms<P: AsRef<Path>>(path: P) -> Result<Vec<RawTransform>> {
    let reader = BufReader::new(File::open(path)?);
    let payload: TransformPayload = serde_json::from_reader(reader)?;
    Ok(payload.into_raw())
}

/// Read a marker batch from a JSON file
pub fn read_markers<P: AsRef<Path>>(path: P) -> Result<MarkerArray> {
    let reader = BufReader::new(File::open(path)?);
    let payload: MarkerPayload = serde_json::from_reader(reader)?;
    Ok(payload.into())
}

/// Pretty-printed JSON for any resolver output
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| IoError::Write {
        message: e.to_string(),
    })
}

/// Write pretty-printed JSON to `writer`, followed by a newline
pub fn write_json<T: Serialize + ?Sized, W: Write>(value: &T, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| IoError::Write {
        message: e.to_string(),
    })?;
    writeln!(writer)?;
    Ok(())
}

/// Write pretty-printed JSON to a file
pub fn write_json_file<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_json(value, &mut writer)?;
    writer.flush()?;
    Ok(())
}
