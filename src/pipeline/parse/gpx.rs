use crate::error::ParseError;
use crate::pipeline::parse::Parser;
use crate::types::activity::{GpxDocument, RawTrackPoint, DEFAULT_ACTIVITY_TYPE, DEFAULT_TITLE};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const TRACK_POINT: &[&str] = &["trk", "trkseg", "trkpt"];
const POINT_EXTENSION: &[&str] = &["trk", "trkseg", "trkpt", "extensions", "TrackPointExtension"];

pub struct GpxParser;

impl Parser for GpxParser {
    fn parse(&self, bytes: &[u8]) -> Result<GpxDocument, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut builder = DocumentBuilder::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => builder.open(&e)?,
                Ok(Event::Empty(e)) => {
                    builder.open(&e)?;
                    builder.close();
                }
                Ok(Event::End(_)) => builder.close(),
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                    builder.push_text(&text)?;
                }
                Ok(Event::CData(e)) => {
                    let text = std::str::from_utf8(&e)
                        .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                    builder.push_text(text)?;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::InvalidGpx(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        builder.finish()
    }
}

/// Tracks the element path while streaming so that only `trkpt`s under
/// `trk/trkseg`, and only the first track's `name`/`type`, are picked up.
#[derive(Default)]
struct DocumentBuilder {
    path: Vec<String>,
    tracks_seen: usize,
    title: Option<String>,
    activity_type: Option<String>,
    points: Vec<RawTrackPoint>,
    current: Option<RawTrackPoint>,
    text: String,
    root_closed: bool,
}

impl DocumentBuilder {
    fn open(&mut self, e: &BytesStart) -> Result<(), ParseError> {
        let name = std::str::from_utf8(e.local_name().as_ref())
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?
            .to_string();

        if self.path.is_empty() && self.root_closed {
            return Err(ParseError::InvalidGpx(format!(
                "unexpected element <{}> after the root element",
                name
            )));
        }
        if name == "trk" && self.path.len() == 1 {
            self.tracks_seen += 1;
        }
        if name == "trkpt" && self.at(&TRACK_POINT[..2]) {
            self.current = Some(read_coordinates(e)?);
        }

        self.path.push(name);
        self.text.clear();
        Ok(())
    }

    fn close(&mut self) {
        let Some(name) = self.path.pop() else {
            return;
        };
        let text = std::mem::take(&mut self.text);
        if self.path.is_empty() {
            self.root_closed = true;
        }

        match name.as_str() {
            "trkpt" if self.at(&TRACK_POINT[..2]) => {
                if let Some(point) = self.current.take() {
                    self.points.push(point);
                }
            }
            "name" if self.in_first_track() => {
                self.title.get_or_insert(text);
            }
            "type" if self.in_first_track() => {
                self.activity_type.get_or_insert(text);
            }
            "ele" if self.at(TRACK_POINT) => self.with_current(|p| &mut p.elevation, text),
            "time" if self.at(TRACK_POINT) => self.with_current(|p| &mut p.time, text),
            "hr" if self.at(POINT_EXTENSION) => self.with_current(|p| &mut p.heart_rate, text),
            "cad" if self.at(POINT_EXTENSION) => self.with_current(|p| &mut p.cadence, text),
            _ => {}
        }
    }

    /// True when the open elements below the root are exactly `below_root`.
    fn at(&self, below_root: &[&str]) -> bool {
        self.path.len() == below_root.len() + 1
            && self.path[1..]
                .iter()
                .zip(below_root)
                .all(|(open, expected)| open == expected)
    }

    fn in_first_track(&self) -> bool {
        self.tracks_seen == 1 && self.at(&TRACK_POINT[..1])
    }

    /// Stores `text` in the current point's field unless an earlier
    /// sibling already filled it.
    fn with_current(
        &mut self,
        field: impl FnOnce(&mut RawTrackPoint) -> &mut Option<String>,
        text: String,
    ) {
        if let Some(point) = self.current.as_mut() {
            field(point).get_or_insert(text);
        }
    }

    fn push_text(&mut self, text: &str) -> Result<(), ParseError> {
        if self.path.is_empty() && !text.trim().is_empty() {
            return Err(ParseError::InvalidGpx(
                "text outside the root element".to_string(),
            ));
        }
        self.text.push_str(text);
        Ok(())
    }

    fn finish(self) -> Result<GpxDocument, ParseError> {
        if let Some(open) = self.path.last() {
            return Err(ParseError::InvalidGpx(format!(
                "unexpected end of document, <{}> is not closed",
                open
            )));
        }
        if !self.root_closed {
            return Err(ParseError::InvalidGpx("no root element".to_string()));
        }

        tracing::debug!(
            "Read {} raw track points from {} track(s)",
            self.points.len(),
            self.tracks_seen
        );

        Ok(GpxDocument {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            activity_type: self
                .activity_type
                .unwrap_or_else(|| DEFAULT_ACTIVITY_TYPE.to_string()),
            points: self.points,
        })
    }
}

fn read_coordinates(e: &BytesStart) -> Result<RawTrackPoint, ParseError> {
    let mut point = RawTrackPoint::default();

    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?
            .into_owned();

        match attr.key.as_ref() {
            b"lat" => point.lat = Some(value),
            b"lon" => point.lon = Some(value),
            _ => {}
        }
    }

    Ok(point)
}
