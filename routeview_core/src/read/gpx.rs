use anyhow::{bail, Result};
use log::warn;
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use crate::model::{Gpx, Track};

use super::{
    attributes::Attributes, metadata::parse_metadata, track::parse_track, XmlReaderExtensions,
};

pub(crate) struct GpxAttributes {
    pub(crate) creator: String,
    pub(crate) version: String,
}

/// Parses the attributes on 'gpx' element itself. Both are mandatory according
/// to the XSD but plenty of exporters leave one out, and neither matters for
/// reporting, so we only warn.
pub(crate) fn parse_gpx_attributes(
    tag: &BytesStart<'_>,
    xml_reader: &Reader<&[u8]>,
) -> Result<GpxAttributes> {
    let mut attributes = Attributes::new(tag, xml_reader)?;

    let creator = attributes.take("creator").unwrap_or_else(|| {
        warn!("Mandatory attribute 'creator' was missing on the GPX element");
        String::new()
    });

    let version = attributes.take("version").unwrap_or_else(|| {
        warn!("Mandatory attribute 'version' was missing on the GPX element");
        String::new()
    });

    Ok(GpxAttributes { creator, version })
}

/// Parses the 'gpx' element itself. Waypoints, routes and extensions are
/// skipped.
pub(crate) fn parse_gpx(xml_reader: &mut Reader<&[u8]>) -> Result<Gpx> {
    let mut gpx = Gpx::default();

    loop {
        match xml_reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"metadata" => {
                    gpx.metadata = parse_metadata(xml_reader)?;
                }
                b"trk" => {
                    let track = parse_track(xml_reader)?;
                    gpx.tracks.push(track);
                }
                _ => xml_reader.skip_element(&e)?,
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"trk" => {
                    gpx.tracks.push(Track::default());
                }
                _ => (),
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"gpx" => {
                    return Ok(gpx);
                }
                _ => (),
            },
            Ok(Event::Eof) => {
                bail!("Reached EOF unexpectedly. File is probably corrupt.");
            }
            Err(e) => bail!("Error at position {}: {:?}", xml_reader.error_position(), e),
            _ => (),
        }
    }
}
