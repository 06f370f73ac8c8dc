use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use super::{load, LoadReport, RawRecord};
use crate::error::Result;

fn trkpt_record(element: &BytesStart) -> RawRecord {
    let mut record = RawRecord::default();
    for attr in element.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value).into_owned();
        match attr.key.local_name().as_ref() {
            b"lat" => record.latitude = Some(value),
            b"lon" => record.longitude = Some(value),
            _ => {}
        }
    }
    record
}

/// Collect the `trkpt` elements of a GPX document, in document order.
///
/// Namespace prefixes are ignored so GPX 1.0 and 1.1 files read the same.
/// Only `<time>` elements nested in a track point are considered.
pub fn read_gpx_records(s: &str) -> Result<Vec<RawRecord>> {
    let mut reader = Reader::from_str(s);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut records = Vec::new();
    let mut current: Option<RawRecord> = None;
    let mut in_time = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) => match e.local_name().as_ref() {
                b"trkpt" => current = Some(trkpt_record(&e)),
                b"time" if current.is_some() => in_time = true,
                _ => {}
            },
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"trkpt" {
                    records.push(trkpt_record(&e));
                }
            }
            Event::Text(t) if in_time => {
                if let Some(record) = current.as_mut() {
                    let text = match t.unescape() {
                        Ok(text) => text.into_owned(),
                        Err(_) => String::from_utf8_lossy(&t).into_owned(),
                    };
                    record.time = Some(text);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"time" => in_time = false,
                b"trkpt" => {
                    if let Some(record) = current.take() {
                        records.push(record);
                    }
                    in_time = false;
                }
                _ => {}
            },
            _ => {}
        }
        buf.clear();
    }
    debug!("read {} track points", records.len());
    Ok(records)
}

pub fn parse_gpx_str(s: &str) -> Result<LoadReport> {
    Ok(load(read_gpx_records(s)?))
}

pub fn parse_gpx_file<P: AsRef<Path>>(path: P) -> Result<LoadReport> {
    let s = fs::read_to_string(path)?;
    parse_gpx_str(&s)
}
