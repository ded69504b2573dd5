//! XLSX grid reader

mod worksheet;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::ZipArchive;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::read_cell_formats;
use sheetgrid_core::{extract_grid, DateSystem, ExtractOptions, Grid, RawSheet};

pub(crate) use worksheet::read_rows;

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode characters XML cannot carry verbatim:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];

        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push('_');
                rest = &candidate[1..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// A sheet entry from `xl/workbook.xml`
#[derive(Debug, Clone)]
struct SheetEntry {
    name: String,
    r_id: String,
}

/// What `xl/workbook.xml` says about the workbook
#[derive(Debug, Default)]
struct WorkbookInfo {
    sheets: Vec<SheetEntry>,
    date_system: DateSystem,
}

/// Reads one worksheet of an XLSX workbook into a typed grid
pub struct XlsxGridReader;

impl XlsxGridReader {
    /// Read the grid of a workbook file
    ///
    /// The sheet is chosen by `options.sheet_name`, or the first sheet when
    /// it is unset.
    pub fn read_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> XlsxResult<Grid> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read the grid of a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R, options: &ExtractOptions) -> XlsxResult<Grid> {
        let sheet = Self::load_sheet(reader, options.sheet_name.as_deref())?;
        Ok(extract_grid(&sheet, options)?)
    }

    /// List the sheet names of a workbook, in workbook order
    pub fn sheet_names<R: Read + Seek>(reader: R) -> XlsxResult<Vec<String>> {
        let mut archive = Self::open_archive(reader)?;
        let info = Self::read_workbook_xml(&mut archive)?;
        Ok(info.sheets.into_iter().map(|s| s.name).collect())
    }

    /// Load one worksheet and the workbook tables its cells refer to
    ///
    /// `None` (or an empty name) selects the first sheet. Names match
    /// exactly.
    pub fn load_sheet<R: Read + Seek>(reader: R, sheet_name: Option<&str>) -> XlsxResult<RawSheet> {
        let mut archive = Self::open_archive(reader)?;

        let info = Self::read_workbook_xml(&mut archive)?;
        let entry = match sheet_name.filter(|n| !n.is_empty()) {
            Some(name) => info
                .sheets
                .iter()
                .find(|s| s.name == name)
                .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))?,
            None => info.sheets.first().ok_or(XlsxError::NoSheets)?,
        };

        let sheet_paths = Self::read_workbook_rels(&mut archive)?;
        let path = sheet_paths.get(&entry.r_id).ok_or_else(|| {
            XlsxError::MissingPart(format!(
                "worksheet relationship {} for sheet '{}'",
                entry.r_id, entry.name
            ))
        })?;

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let style_formats = Self::read_styles(&mut archive)?;

        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.clone()))?;
        let rows = read_rows(file)?;

        log::debug!(
            "sheet '{}' ({}): {} rows, {} shared strings, {} styles, {:?}",
            entry.name,
            path,
            rows.len(),
            shared_strings.len(),
            style_formats.len(),
            info.date_system
        );

        Ok(RawSheet {
            name: entry.name.clone(),
            shared_strings,
            style_formats,
            date_system: info.date_system,
            rows,
        })
    }

    fn open_archive<R: Read + Seek>(reader: R) -> XlsxResult<ZipArchive<R>> {
        let mut archive = ZipArchive::new(reader)?;

        // Verify this is an OOXML package
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        Ok(archive)
    }

    /// Read the shared strings table
    ///
    /// Rich-text runs of one `<si>` are concatenated; phonetic hints
    /// (`<rPh>`) are skipped.
    fn read_shared_strings<R: Read + Seek>(archive: &mut ZipArchive<R>) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        // Leading and trailing spaces are part of the string
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut current = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current));
                        current.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    fn read_styles<R: Read + Seek>(archive: &mut ZipArchive<R>) -> XlsxResult<Vec<Option<u32>>> {
        match archive.by_name("xl/styles.xml") {
            Ok(file) => read_cell_formats(file),
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Read workbook.xml to get sheet names, rIds and the date system
    fn read_workbook_xml<R: Read + Seek>(archive: &mut ZipArchive<R>) -> XlsxResult<WorkbookInfo> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut info = WorkbookInfo::default();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"sheet" => {
                        let mut name = None;
                        let mut r_id = None;

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"name" => {
                                    name = attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                b"r:id" => {
                                    r_id = attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                _ => {}
                            }
                        }

                        if let (Some(name), Some(r_id)) = (name, r_id) {
                            info.sheets.push(SheetEntry { name, r_id });
                        }
                    }
                    b"workbookPr" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"date1904" {
                                let date1904 = attr
                                    .unescape_value()
                                    .map_or(false, |s| s.as_ref() == "1" || s.as_ref() == "true");
                                info.date_system = DateSystem::from_date1904(date1904);
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(info)
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = attr.unescape_value().ok().map(|s| s.to_string()),
                            b"Target" => {
                                target = attr.unescape_value().ok().map(|s| s.to_string())
                            }
                            b"Type" => {
                                rel_type = attr.unescape_value().ok().map(|s| s.to_string())
                            }
                            _ => {}
                        }
                    }

                    // Only worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to the xl/ folder unless absolute
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }
}
