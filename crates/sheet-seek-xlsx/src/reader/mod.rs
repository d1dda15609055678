//! XLSX reader

mod escape;
mod sheet;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use escape::decode_excel_escapes;
use sheet_seek_core::{SharedString, StringPool, Workbook, Worksheet};

/// Entry of `xl/workbook.xml`: sheet name, relationship id, visibility
struct SheetEntry {
    name: String,
    r_id: String,
    hidden: bool,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let path = path.as_ref();
        log::debug!("opening xlsx workbook {}", path.display());
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let mut pool = StringPool::new();
        let shared_strings = Self::read_shared_strings(&mut archive, &mut pool)?;
        let sheets = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let mut workbook = Workbook::new();
        for entry in sheets {
            let Some(path) = sheet_paths.get(&entry.r_id) else {
                // Chart sheets and dialog sheets have no worksheet relationship
                log::debug!("skipping sheet '{}': no worksheet part", entry.name);
                continue;
            };

            let mut worksheet = Worksheet::new(entry.name);
            worksheet.set_visible(!entry.hidden);
            let file = archive
                .by_name(path)
                .map_err(|_| XlsxError::MissingPart(path.clone()))?;
            sheet::read_cells(BufReader::new(file), &mut worksheet, &shared_strings)?;

            log::debug!(
                "loaded sheet '{}' ({} cells)",
                worksheet.name(),
                worksheet.cell_count()
            );
            workbook.add_worksheet(worksheet)?;
        }

        Ok(workbook)
    }

    /// Read the shared strings table
    ///
    /// Rich-text runs are concatenated; phonetic runs (`rPh`) are skipped.
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        pool: &mut StringPool,
    ) -> XlsxResult<Vec<SharedString>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings),
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        let mut buf = Vec::new();
        let mut current = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(pool.intern(decode_excel_escapes(&current)));
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                    strings.push(pool.intern(""));
                }
                Ok(Event::Text(e)) if in_t => {
                    current.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        log::debug!("read {} shared strings", strings.len());
        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and relationship ids, in order
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<SheetEntry>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheet" => {
                    if let Some(entry) = Self::parse_sheet_entry(&e)? {
                        sheets.push(entry);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    fn parse_sheet_entry(e: &BytesStart) -> XlsxResult<Option<SheetEntry>> {
        let mut name = None;
        let mut r_id = None;
        let mut hidden = false;

        for attr in e.attributes().flatten() {
            let value = attr.unescape_value()?;
            match (attr.key.as_ref(), attr.key.local_name().as_ref()) {
                (b"name", _) => name = Some(decode_excel_escapes(&value)),
                (b"state", _) => hidden = value != "visible",
                // r:id, whatever prefix the relationships namespace got
                (_, b"id") => r_id = Some(value.into_owned()),
                _ => {}
            }
        }

        Ok(name.zip(r_id).map(|(name, r_id)| SheetEntry { name, r_id, hidden }))
    }

    /// Read workbook.xml.rels to map relationship ids to worksheet part paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
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
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;

                    for attr in e.attributes().flatten() {
                        let value = attr.unescape_value()?.into_owned();
                        match attr.key.as_ref() {
                            b"Id" => id = Some(value),
                            b"Target" => target = Some(value),
                            b"Type" => rel_type = Some(value),
                            _ => {}
                        }
                    }

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            rels.insert(id, Self::resolve_part_path(&target));
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

    /// Targets are relative to `xl/` unless they start with `/`
    fn resolve_part_path(target: &str) -> String {
        match target.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None => format!("xl/{}", target.trim_start_matches("./")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_part_path() {
        assert_eq!(
            XlsxReader::resolve_part_path("worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            XlsxReader::resolve_part_path("/xl/worksheets/sheet2.xml"),
            "xl/worksheets/sheet2.xml"
        );
    }

    #[test]
    fn test_not_a_zip() {
        let result = XlsxReader::read(std::io::Cursor::new(b"not a zip file".to_vec()));
        assert!(matches!(result, Err(XlsxError::Zip(_))));
    }
}
