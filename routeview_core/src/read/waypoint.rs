use anyhow::{bail, Result};
use quick_xml::{events::Event, Reader};

use crate::model::Waypoint;

use super::{attributes::Attributes, XmlReaderExtensions};

/// Builds a waypoint from the 'lat' and 'lon' attributes, both of which are
/// mandatory.
pub(crate) fn waypoint_from_attributes(mut attributes: Attributes) -> Result<Waypoint> {
    let lat = attributes.get("lat")?;
    let lon = attributes.get("lon")?;
    Ok(Waypoint::with_lat_lon(lat, lon))
}

/// Parses the body of a 'trkpt'. The 'ele' and 'time' children may come in
/// any order and either may be missing; everything else (extensions, fix,
/// satellites...) is skipped.
pub(crate) fn parse_waypoint(
    attributes: Attributes,
    xml_reader: &mut Reader<&[u8]>,
) -> Result<Waypoint> {
    let mut wp = waypoint_from_attributes(attributes)?;

    loop {
        match xml_reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"ele" => {
                    wp.ele = Some(xml_reader.read_inner_as::<f64>()?);
                }
                b"time" => {
                    wp.time = Some(xml_reader.read_inner_as_time()?);
                }
                _ => xml_reader.skip_element(&e)?,
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"trkpt" => {
                    return Ok(wp);
                }
                _ => {}
            },
            Ok(Event::Eof) => bail!("Reached EOF inside the 'trkpt' element"),
            Err(e) => bail!("Error at position {}: {:?}", xml_reader.error_position(), e),
            // Ignore spurious Event::Text, I think they are newlines.
            _ => {}
        }
    }
}
