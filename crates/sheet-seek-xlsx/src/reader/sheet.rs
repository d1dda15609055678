//! Worksheet part (`xl/worksheets/sheetN.xml`) cell parsing

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::escape::decode_excel_escapes;
use crate::error::{XlsxError, XlsxResult};
use sheet_seek_core::{CellAddress, CellError, CellValue, SharedString, Worksheet};

/// Cell being assembled between `<c>` and `</c>`
#[derive(Default)]
struct PendingCell {
    row: u32,
    col: u32,
    cell_type: Option<String>,
    value: Option<String>,
    inline: Option<String>,
}

/// Read the cell values of one worksheet part into `worksheet`.
///
/// Rows and cells without an `r` attribute are positioned after the previous
/// one, as Excel does when writing them.
pub(super) fn read_cells<R: BufRead>(
    reader: R,
    worksheet: &mut Worksheet,
    shared_strings: &[SharedString],
) -> XlsxResult<()> {
    let mut xml_reader = Reader::from_reader(reader);
    let mut buf = Vec::new();

    let mut current_row = 0u32;
    let mut last_col = 0u32;
    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_inline_text = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = row_number(&e)?.unwrap_or(current_row + 1);
                    last_col = 0;
                }
                b"c" => {
                    let pending = start_cell(&e, current_row, last_col)?;
                    last_col = pending.col;
                    cell = Some(pending);
                }
                b"v" if cell.is_some() => in_value = true,
                b"t" if cell.is_some() => in_inline_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = row_number(&e)?.unwrap_or(current_row + 1);
                    last_col = 0;
                }
                // Valueless (styled-only) cell: only advances the column
                b"c" => last_col = start_cell(&e, current_row, last_col)?.col,
                _ => {}
            },
            Ok(Event::Text(e)) if in_value || in_inline_text => {
                let text = e.unescape()?;
                if let Some(pending) = cell.as_mut() {
                    let target = if in_value {
                        &mut pending.value
                    } else {
                        &mut pending.inline
                    };
                    target.get_or_insert_with(String::new).push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"c" => {
                    if let Some(pending) = cell.take() {
                        let value = cell_value(&pending, shared_strings)?;
                        worksheet.set_value_at(pending.row, pending.col, value)?;
                    }
                }
                b"v" => in_value = false,
                b"t" => in_inline_text = false,
                b"sheetData" => break,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn row_number(e: &BytesStart) -> XlsxResult<Option<u32>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"r" {
            let value = attr.unescape_value()?;
            let row = value
                .parse::<u32>()
                .map_err(|_| XlsxError::Parse(format!("Invalid row number: {}", value)))?;
            return Ok(Some(row));
        }
    }
    Ok(None)
}

fn start_cell(e: &BytesStart, current_row: u32, last_col: u32) -> XlsxResult<PendingCell> {
    let mut pending = PendingCell {
        row: current_row.max(1),
        col: last_col + 1,
        ..Default::default()
    };

    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => {
                let reference = attr.unescape_value()?;
                let addr = CellAddress::parse(&reference).map_err(|e| {
                    XlsxError::Parse(format!("Invalid cell reference '{}': {}", reference, e))
                })?;
                pending.row = addr.row;
                pending.col = addr.col;
            }
            b"t" => pending.cell_type = Some(attr.unescape_value()?.into_owned()),
            _ => {}
        }
    }

    Ok(pending)
}

/// Convert the raw text of a cell into a value according to its `t` attribute.
///
/// Formula cells carry their last calculated result in `<v>`; that result is
/// the value. A formula without a cached result reads as empty.
fn cell_value(cell: &PendingCell, shared_strings: &[SharedString]) -> XlsxResult<CellValue> {
    if cell.cell_type.as_deref() == Some("inlineStr") {
        return Ok(cell
            .inline
            .as_deref()
            .map(|s| CellValue::string(decode_excel_escapes(s)))
            .unwrap_or(CellValue::Empty));
    }

    let Some(raw) = cell.value.as_deref() else {
        return Ok(CellValue::Empty);
    };

    let value = match cell.cell_type.as_deref() {
        Some("s") => {
            let idx: usize = raw.trim().parse().map_err(|_| {
                XlsxError::Parse(format!("Invalid shared string index: {}", raw))
            })?;
            let s = shared_strings.get(idx).ok_or_else(|| {
                XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
            })?;
            CellValue::String(s.clone())
        }
        Some("b") => CellValue::Boolean(raw.trim() == "1" || raw.trim().eq_ignore_ascii_case("true")),
        Some("e") => CellError::parse(raw)
            .map(CellValue::Error)
            .unwrap_or_else(|| CellValue::string(raw)),
        Some("str") => CellValue::string(decode_excel_escapes(raw)),
        None | Some("n") => match raw.trim().parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::string(raw),
        },
        // ISO 8601 dates ("d") and unknown types keep their text
        Some(_) => CellValue::string(raw),
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheet_seek_core::CellStore;

    fn parse(xml: &str, shared: &[&str]) -> Worksheet {
        let shared: Vec<SharedString> = shared.iter().map(|s| SharedString::new(s)).collect();
        let mut ws = Worksheet::new("Sheet1");
        read_cells(xml.as_bytes(), &mut ws, &shared).unwrap();
        ws
    }

    #[test]
    fn test_cell_types() {
        let ws = parse(
            r#"<worksheet><sheetData>
                <row r="1">
                    <c r="A1" t="s"><v>0</v></c>
                    <c r="B1"><v>42.5</v></c>
                    <c r="C1" t="b"><v>1</v></c>
                    <c r="D1" t="e"><v>#N/A</v></c>
                    <c r="E1" t="inlineStr"><is><t>inline</t></is></c>
                    <c r="F1" t="str"><f>A1&amp;"!"</f><v>Foo!</v></c>
                    <c r="G1"><f>1/0</f></c>
                </row>
            </sheetData></worksheet>"#,
            &["Foo"],
        );

        assert_eq!(ws.value_at(1, 1), &CellValue::string("Foo"));
        assert_eq!(ws.value_at(1, 2), &CellValue::Number(42.5));
        assert_eq!(ws.value_at(1, 3), &CellValue::Boolean(true));
        assert_eq!(ws.value_at(1, 4), &CellValue::Error(CellError::Na));
        assert_eq!(ws.value_at(1, 5), &CellValue::string("inline"));
        assert_eq!(ws.value_at(1, 6), &CellValue::string("Foo!"));
        assert!(ws.value_at(1, 7).is_empty());
        assert_eq!(ws.cell_count(), 6);
    }

    #[test]
    fn test_missing_references_follow_previous_cell() {
        let ws = parse(
            r#"<worksheet><sheetData>
                <row r="3"><c><v>1</v></c><c s="2"/><c><v>3</v></c></row>
                <row><c r="D4"><v>4</v></c><c><v>5</v></c></row>
            </sheetData></worksheet>"#,
            &[],
        );

        assert_eq!(ws.value_at(3, 1), &CellValue::Number(1.0));
        assert!(ws.value_at(3, 2).is_empty());
        assert_eq!(ws.value_at(3, 3), &CellValue::Number(3.0));
        assert_eq!(ws.value_at(4, 4), &CellValue::Number(4.0));
        assert_eq!(ws.value_at(4, 5), &CellValue::Number(5.0));
    }

    #[test]
    fn test_whitespace_in_text_is_kept() {
        let ws = parse(
            r#"<worksheet><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t xml:space="preserve">  padded </t></is></c></row></sheetData></worksheet>"#,
            &[],
        );
        assert_eq!(ws.value_at(1, 1), &CellValue::string("  padded "));
    }

    #[test]
    fn test_bad_shared_string_index() {
        let mut ws = Worksheet::new("Sheet1");
        let err = read_cells(
            r#"<sheetData><row r="1"><c r="A1" t="s"><v>7</v></c></row></sheetData>"#.as_bytes(),
            &mut ws,
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, XlsxError::Parse(_)));
    }
}
