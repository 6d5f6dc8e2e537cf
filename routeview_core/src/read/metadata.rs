use anyhow::{bail, Result};
use quick_xml::{events::Event, Reader};

use crate::model::Metadata;

use super::XmlReaderExtensions;

pub(crate) fn parse_metadata(xml_reader: &mut Reader<&[u8]>) -> Result<Metadata> {
    let mut md = Metadata::default();

    loop {
        match xml_reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => {
                    md.name = Some(xml_reader.read_inner_as_string()?);
                }
                b"time" => {
                    md.time = Some(xml_reader.read_inner_as_time()?);
                }
                _ => xml_reader.skip_element(&e)?,
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"metadata" => {
                    return Ok(md);
                }
                _ => {}
            },
            Ok(Event::Eof) => bail!("Reached EOF inside the 'metadata' element"),
            Err(e) => bail!("Error at position {}: {:?}", xml_reader.error_position(), e),
            // Ignore spurious Event::Text, I think they are newlines.
            _ => {}
        }
    }
}
