//! Worksheet part: `<sheetData>` rows into raw cell records

use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::decode_excel_escapes;
use crate::error::{XlsxError, XlsxResult};
use sheetgrid_core::{cell_reference, column_index, CellType, RawCell, RawRow};

/// Cell being collected between `<c>` and `</c>`
#[derive(Debug, Default)]
struct PendingCell {
    reference: String,
    data_type: Option<CellType>,
    style_index: Option<u32>,
    value: Option<String>,
    inline: Option<String>,
}

impl PendingCell {
    fn from_start(e: &BytesStart<'_>, row: u32, next_column: u32) -> XlsxResult<Self> {
        let mut cell = PendingCell::default();
        let mut reference = None;

        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"r" => reference = Some(attr.unescape_value()?.to_string()),
                b"t" => {
                    let tag = attr.unescape_value()?;
                    cell.data_type = Some(CellType::from_tag(&tag).unwrap_or_else(|| {
                        log::warn!("unknown cell type '{}' in row {}, reading as text", tag, row);
                        CellType::String
                    }));
                }
                b"s" => {
                    let s = attr.unescape_value()?;
                    cell.style_index = Some(s.trim().parse().map_err(|_| {
                        XlsxError::Parse(format!("invalid style index '{}' in row {}", s, row))
                    })?);
                }
                _ => {}
            }
        }

        // Cells may omit `r`; they then follow the previous cell
        cell.reference = reference.unwrap_or_else(|| cell_reference(row, next_column));
        Ok(cell)
    }

    fn finish(self) -> RawCell {
        let (text, value) = match self.inline {
            Some(inline) => (inline, self.value),
            None => (self.value.unwrap_or_default(), None),
        };

        RawCell {
            reference: self.reference,
            data_type: self.data_type,
            style_index: self.style_index,
            text,
            value,
        }
    }
}

/// Row being collected between `<row>` and `</row>`
struct PendingRow {
    index: u32,
    cells: Vec<RawCell>,
    next_column: u32,
}

impl PendingRow {
    fn new(e: &BytesStart<'_>, previous: u32) -> XlsxResult<Self> {
        let mut index = previous.checked_add(1);
        for attr in e.attributes().flatten() {
            if attr.key.as_ref() == b"r" {
                let r = attr.unescape_value()?;
                index = Some(
                    r.trim()
                        .parse()
                        .map_err(|_| XlsxError::Parse(format!("invalid row number '{}'", r)))?,
                );
            }
        }
        let index = index.ok_or_else(|| {
            XlsxError::Parse(format!("no row number follows row {}", previous))
        })?;
        Ok(Self {
            index,
            cells: Vec::new(),
            next_column: 0,
        })
    }

    fn push(&mut self, cell: RawCell) {
        if let Ok(column) = column_index(&cell.reference) {
            self.next_column = column.saturating_add(1);
        }
        self.cells.push(cell);
    }

    fn finish(self) -> RawRow {
        RawRow::new(self.index, self.cells)
    }
}

/// Read the rows of a worksheet part in document order
///
/// Cell references are passed through untouched; a malformed one fails
/// later, at assembly. Formulas are ignored, only their cached value is
/// read.
pub(crate) fn read_rows<R: Read>(reader: R) -> XlsxResult<Vec<RawRow>> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    // Cell text keeps its whitespace
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut rows = Vec::new();
    let mut last_row = 0;

    let mut row: Option<PendingRow> = None;
    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_inline_str = false;
    let mut in_inline_text = false;
    let mut in_phonetic = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"row" => row = Some(PendingRow::new(&e, last_row)?),
                b"c" => {
                    if let Some(r) = &row {
                        cell = Some(PendingCell::from_start(&e, r.index, r.next_column)?);
                    }
                }
                b"v" if cell.is_some() => in_value = true,
                b"is" if cell.is_some() => {
                    in_inline_str = true;
                    if let Some(c) = cell.as_mut() {
                        c.inline.get_or_insert_with(String::new);
                    }
                }
                b"rPh" if in_inline_str => in_phonetic = true,
                b"t" if in_inline_str && !in_phonetic => in_inline_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"row" => {
                    let r = PendingRow::new(&e, last_row)?;
                    last_row = r.index;
                    rows.push(r.finish());
                }
                b"c" => {
                    if let Some(r) = row.as_mut() {
                        let c = PendingCell::from_start(&e, r.index, r.next_column)?;
                        r.push(c.finish());
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"row" => {
                    if let Some(r) = row.take() {
                        last_row = r.index;
                        rows.push(r.finish());
                    }
                }
                b"c" => {
                    if let (Some(r), Some(c)) = (row.as_mut(), cell.take()) {
                        r.push(c.finish());
                    }
                }
                b"v" => in_value = false,
                b"is" => in_inline_str = false,
                b"rPh" => in_phonetic = false,
                b"t" => in_inline_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_value || in_inline_text => {
                let text = e.unescape()?;
                if let Some(c) = cell.as_mut() {
                    if in_value {
                        c.value.get_or_insert_with(String::new).push_str(&text);
                    } else if let Some(inline) = c.inline.as_mut() {
                        inline.push_str(&decode_excel_escapes(&text));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sheet(data: &str) -> Vec<RawRow> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <dimension ref="A1:C3"/>
  <sheetData>{}</sheetData>
</worksheet>"#,
            data
        );
        read_rows(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_typed_and_styled_cells() {
        let rows = sheet(
            r#"<row r="1" spans="1:3"><c r="A1" t="s"><v>0</v></c><c r="B1" s="2"><v>45000</v></c><c r="C1" t="b"><v>1</v></c></row>"#,
        );
        assert_eq!(
            rows,
            vec![RawRow::new(
                1,
                vec![
                    RawCell::new("A1", "0").with_type(CellType::SharedString),
                    RawCell::new("B1", "45000").with_style(2),
                    RawCell::new("C1", "1").with_type(CellType::Boolean),
                ]
            )]
        );
    }

    #[test]
    fn test_formula_cells_keep_cached_value() {
        let rows = sheet(
            r#"<row r="2"><c r="A2" t="str"><f>CONCAT("a","b")</f><v>ab</v></c><c r="B2"><f>1/0</f><v>#DIV/0!</v></c><c r="C2" t="e"><f>1/0</f><v>#DIV/0!</v></c></row>"#,
        );
        assert_eq!(
            rows[0].cells,
            vec![
                RawCell::new("A2", "ab").with_type(CellType::String),
                RawCell::new("B2", "#DIV/0!"),
                RawCell::new("C2", "#DIV/0!").with_type(CellType::Error),
            ]
        );
    }

    #[test]
    fn test_inline_strings() {
        let rows = sheet(
            r#"<row r="1"><c r="A1" t="inlineStr"><is><t xml:space="preserve"> padded </t></is></c><c r="B1" t="inlineStr"><is><r><t>rich</t></r><r><t>_x000a_text</t></r></is></c><c r="C1"><is><t>x</t></is><v>3</v></c></row>"#,
        );
        assert_eq!(
            rows[0].cells,
            vec![
                RawCell::new("A1", " padded ").with_type(CellType::InlineString),
                RawCell::new("B1", "rich\ntext").with_type(CellType::InlineString),
                RawCell::new("C1", "x").with_value("3"),
            ]
        );
    }

    #[test]
    fn test_valueless_and_missing_references() {
        let rows = sheet(
            r#"<row r="3"><c r="B3" s="1"/><c><v>7</v></c><c t="s"><v>1</v></c></row>"#,
        );
        assert_eq!(
            rows[0].cells,
            vec![
                RawCell::new("B3", "").with_style(1),
                RawCell::new("C3", "7"),
                RawCell::new("D3", "1").with_type(CellType::SharedString),
            ]
        );
    }

    #[test]
    fn test_row_numbers() {
        let rows = sheet(r#"<row r="2"><c r="A2"><v>1</v></c></row><row/><row><c r="A4"><v>2</v></c></row><row r="9"></row>"#);
        let indices: Vec<u32> = rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![2, 3, 4, 9]);
        assert!(rows[1].cells.is_empty());
        assert!(rows[3].cells.is_empty());
    }

    #[test]
    fn test_implicit_row_number_past_last_row_fails() {
        let xml = r#"<worksheet><sheetData><row r="4294967295"/><row/></sheetData></worksheet>"#;
        let err = read_rows(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, XlsxError::Parse(ref msg) if msg.contains("4294967295")));

        let xml = r#"<worksheet><sheetData><row r="4294967295"/></sheetData></worksheet>"#;
        assert_eq!(read_rows(xml.as_bytes()).unwrap()[0].index, u32::MAX);
    }

    #[test]
    fn test_unknown_type_reads_as_text() {
        let rows = sheet(r#"<row r="1"><c r="A1" t="zz"><v>12</v></c></row>"#);
        assert_eq!(rows[0].cells[0].data_type, Some(CellType::String));
    }

    #[test]
    fn test_escaped_entities() {
        let rows = sheet(r#"<row r="1"><c r="A1" t="str"><v>a &lt; b &amp; c</v></c></row>"#);
        assert_eq!(rows[0].cells[0].text, "a < b & c");
    }

    #[test]
    fn test_bad_style_index() {
        let xml = r#"<worksheet><sheetData><row r="1"><c r="A1" s="x"><v>1</v></c></row></sheetData></worksheet>"#;
        assert!(matches!(read_rows(xml.as_bytes()), Err(XlsxError::Parse(_))));
    }
}
