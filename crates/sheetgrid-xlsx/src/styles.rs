//! Style table: number-format id per cell style

use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};

/// Read the `numFmtId` of every `<xf>` in `<cellXfs>`, in index order
///
/// A cell's `s` attribute indexes this table. An `<xf>` without a
/// `numFmtId` attribute yields `None`.
pub(crate) fn read_cell_formats<R: Read>(reader: R) -> XlsxResult<Vec<Option<u32>>> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut formats = Vec::new();
    let mut in_cell_xfs = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"cellXfs" => in_cell_xfs = true,
                b"xf" if in_cell_xfs => formats.push(num_fmt_id(&e)?),
                _ => {}
            },
            // xf can be empty (no child elements)
            Ok(Event::Empty(e)) if in_cell_xfs && e.name().as_ref() == b"xf" => {
                formats.push(num_fmt_id(&e)?);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"cellXfs" => {
                in_cell_xfs = false;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(formats)
}

fn num_fmt_id(e: &BytesStart<'_>) -> XlsxResult<Option<u32>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"numFmtId" {
            let value = attr.unescape_value()?;
            return value
                .trim()
                .parse::<u32>()
                .map(Some)
                .map_err(|_| XlsxError::Parse(format!("invalid numFmtId '{}'", value)));
        }
    }
    Ok(None)
}
