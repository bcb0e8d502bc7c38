//! Capture inspection and schema tools for the InSim client core.
//!
//! - Split a raw capture into frames and decode each one
//! - Print the layout of every known message
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Keep going** - A bad frame is reported in place; inspection continues where framing allows.

use std::fmt::Write as _;

use codec::{decode_frame, schema_for, schemas, InSimPacket};
use schema::MessageSchema;
use serde::Serialize;
use wire::{decode_header, Frames, Limits};

/// What was found at one frame boundary of a capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameReport {
    pub offset: usize,
    pub size: usize,
    pub type_tag: Option<u8>,
    pub name: Option<&'static str>,
    pub request_id: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Options for [`inspect_capture`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InspectOptions {
    pub limits: Limits,
    /// Include the raw bytes of every frame.
    pub hex: bool,
}

/// Splits `capture` into frames and decodes each one.
///
/// Decode failures are reported per frame. A framing failure ends the
/// report, since the next boundary cannot be found.
#[must_use]
pub fn inspect_capture(capture: &[u8], options: &InspectOptions) -> Vec<FrameReport> {
    let mut frames = Frames::new(capture, options.limits);
    let mut reports = Vec::new();
    while let Some(next) = frames.next() {
        let report = match next {
            Ok((offset, frame)) => inspect_frame(offset, frame, options),
            Err(err) => FrameReport {
                offset: frames.offset(),
                size: capture.len().saturating_sub(frames.offset()),
                type_tag: None,
                name: None,
                request_id: None,
                sub_type: None,
                hex: None,
                packet: None,
                error: Some(format!("framing lost: {err}")),
            },
        };
        reports.push(report);
    }
    reports
}

fn inspect_frame(offset: usize, frame: &[u8], options: &InspectOptions) -> FrameReport {
    let header = decode_header(frame, &options.limits).ok();
    let type_tag = header.map(|header| header.type_tag);
    let mut report = FrameReport {
        offset,
        size: frame.len(),
        type_tag,
        name: type_tag.and_then(schema_for).map(|schema| schema.name),
        request_id: header.map(|header| header.request_id.get()),
        sub_type: None,
        hex: options.hex.then(|| to_hex(frame)),
        packet: None,
        error: None,
    };
    match decode_frame(frame, &options.limits) {
        Ok(packet) => {
            report.sub_type = packet.sub_type();
            report.packet = Some(summarize(&packet));
        }
        Err(err) => report.error = Some(err.to_string()),
    }
    report
}

fn summarize(packet: &InSimPacket) -> String {
    format!("{packet:?}")
}

/// Lowercase hex with a space between bytes.
#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (idx, byte) in bytes.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// One message layout, as printed by the `schema` command.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaReport {
    #[serde(flatten)]
    pub schema: &'static MessageSchema,
    pub max_size: usize,
}

/// Layouts of the known messages, optionally filtered by name
/// (case-insensitive, `IS_` prefix optional).
#[must_use]
pub fn schema_reports(name: Option<&str>) -> Vec<SchemaReport> {
    schemas()
        .into_iter()
        .filter(|schema| name.map_or(true, |name| name_matches(schema.name, name)))
        .map(|schema| SchemaReport {
            schema,
            max_size: schema.max_size(),
        })
        .collect()
}

fn name_matches(schema_name: &str, wanted: &str) -> bool {
    let short = schema_name.strip_prefix("IS_").unwrap_or(schema_name);
    schema_name.eq_ignore_ascii_case(wanted) || short.eq_ignore_ascii_case(wanted)
}
