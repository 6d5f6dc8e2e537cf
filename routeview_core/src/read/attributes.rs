use std::{collections::HashMap, str::FromStr};

use anyhow::{bail, Context, Result};
use quick_xml::{events::BytesStart, Reader};

use super::XmlReaderConversions;

#[derive(Debug)]
pub(crate) struct Attributes {
    element: String,
    data: HashMap<String, String>,
}

impl Attributes {
    /// Creates a new Attributes object by parsing out all the attributes of the
    /// specified tag.
    pub(crate) fn new<R>(tag: &BytesStart<'_>, xml_reader: &Reader<R>) -> Result<Self> {
        let mut data = HashMap::new();

        for attr in tag.attributes() {
            let attr = attr?;
            let key = attr.key.into_inner();
            let key = xml_reader.bytes_to_string(key)?;
            let value = xml_reader.cow_to_string(attr.value)?;

            data.insert(key, value);
        }

        Ok(Self {
            element: xml_reader.bytes_to_string(tag.name().as_ref())?,
            data,
        })
    }

    /// Removes an optional attribute from the set and returns it.
    pub(crate) fn take(&mut self, key: &str) -> Option<String> {
        self.data.remove(key)
    }

    /// Gets a mandatory attribute. The attribute is removed from the list
    /// of attributes and returned to the caller.
    pub(crate) fn get<T: FromStr>(&mut self, key: &str) -> Result<T> {
        let value = self.take(key).with_context(|| {
            format!(
                "Mandatory attribute '{key}' was missing on the '{}' element",
                self.element
            )
        })?;

        match value.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => bail!(
                "Could not parse attribute '{key}' value {value:?} into {}",
                std::any::type_name::<T>()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use quick_xml::events::Event;

    use super::*;

    fn first_tag(xml: &str) -> (Reader<&[u8]>, BytesStart<'_>) {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) | Event::Empty(e) => return (reader, e),
                _ => (),
            }
        }
    }

    #[test]
    fn get_parses_and_removes() {
        let (reader, tag) = first_tag(r#"<trkpt lat="41.5" lon="-105.25"/>"#);
        let mut attrs = Attributes::new(&tag, &reader).unwrap();

        let lat: f64 = attrs.get("lat").unwrap();
        assert_eq!(lat, 41.5);
        assert!(attrs.get::<f64>("lat").is_err());
        assert_eq!(attrs.take("lon").as_deref(), Some("-105.25"));
    }

    #[test]
    fn missing_attribute_names_the_element() {
        let (reader, tag) = first_tag(r#"<trkpt lon="1"/>"#);
        let mut attrs = Attributes::new(&tag, &reader).unwrap();
        let err = attrs.get::<f64>("lat").unwrap_err();
        assert!(err.to_string().contains("'lat'"));
        assert!(err.to_string().contains("'trkpt'"));
    }

    #[test]
    fn unparseable_attribute() {
        let (reader, tag) = first_tag(r#"<trkpt lat="north"/>"#);
        let mut attrs = Attributes::new(&tag, &reader).unwrap();
        assert!(attrs.get::<f64>("lat").is_err());
    }
}
