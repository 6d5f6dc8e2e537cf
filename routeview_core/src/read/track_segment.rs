use anyhow::{bail, Context, Result};
use quick_xml::{events::Event, Reader};

use crate::model::TrackSegment;

use super::{
    attributes::Attributes,
    waypoint::{parse_waypoint, waypoint_from_attributes},
    XmlReaderExtensions,
};

pub(crate) fn parse_track_segment(xml_reader: &mut Reader<&[u8]>) -> Result<TrackSegment> {
    let mut segment = TrackSegment::default();

    loop {
        match xml_reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"trkpt" => {
                    let idx = segment.points.len();
                    let attributes = Attributes::new(&e, xml_reader)?;
                    let point = parse_waypoint(attributes, xml_reader)
                        .with_context(|| format!("Failed to read trackpoint {idx} of segment"))?;
                    segment.points.push(point);
                }
                _ => xml_reader.skip_element(&e)?,
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"trkpt" => {
                    let idx = segment.points.len();
                    let point = waypoint_from_attributes(Attributes::new(&e, xml_reader)?)
                        .with_context(|| format!("Failed to read trackpoint {idx} of segment"))?;
                    segment.points.push(point);
                }
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"trkseg" => {
                    return Ok(segment);
                }
                _ => {}
            },
            Ok(Event::Eof) => bail!("Reached EOF inside the 'trkseg' element"),
            Err(e) => bail!("Error at position {}: {:?}", xml_reader.error_position(), e),
            // Ignore spurious Event::Text, I think they are newlines.
            _ => {}
        }
    }
}
