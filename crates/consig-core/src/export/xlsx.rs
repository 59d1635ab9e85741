//! Single-sheet XLSX workbook writer built on zip and quick-xml.
//!
//! `Qt` is written as a number; every other cell is an inline string so that
//! identifiers with leading zeros survive spreadsheet applications.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::{Cursor, Write};
use tracing::debug;
use zip::{CompressionMethod, DateTime};
use zip::write::{SimpleFileOptions, ZipWriter};

use super::TableWriter;
use crate::error::ExportError;
use crate::models::record::{HEADERS, NormalizedTable};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELATIONSHIP_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Longest sheet name spreadsheet applications accept.
const MAX_SHEET_NAME: usize = 31;

/// XLSX writer.
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    sheet_name: String,
}

impl XlsxWriter {
    /// Create a writer producing a sheet named `Trabalhadores`.
    pub fn new() -> Self {
        Self {
            sheet_name: "Trabalhadores".to_string(),
        }
    }

    /// Set the worksheet name.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    fn workbook_xml(&self) -> Result<Vec<u8>, ExportError> {
        let name = sanitize_sheet_name(&self.sheet_name);
        let mut writer = Writer::new(Vec::new());

        emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        emit(
            &mut writer,
            Event::Start(
                BytesStart::new("workbook")
                    .with_attributes([("xmlns", SPREADSHEET_NS), ("xmlns:r", RELATIONSHIP_NS)]),
            ),
        )?;
        emit(&mut writer, Event::Start(BytesStart::new("sheets")))?;
        emit(
            &mut writer,
            Event::Empty(BytesStart::new("sheet").with_attributes([
                ("name", name.as_str()),
                ("sheetId", "1"),
                ("r:id", "rId1"),
            ])),
        )?;
        emit(&mut writer, Event::End(BytesEnd::new("sheets")))?;
        emit(&mut writer, Event::End(BytesEnd::new("workbook")))?;

        Ok(writer.into_inner())
    }

    fn sheet_xml(&self, table: &NormalizedTable) -> Result<Vec<u8>, ExportError> {
        let mut writer = Writer::new(Vec::new());

        emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        emit(
            &mut writer,
            Event::Start(BytesStart::new("worksheet").with_attributes([("xmlns", SPREADSHEET_NS)])),
        )?;
        emit(&mut writer, Event::Start(BytesStart::new("sheetData")))?;

        let header: Vec<Cell<'_>> = HEADERS.iter().map(|h| Cell::Text(h)).collect();
        write_row(&mut writer, 1, &header)?;

        for (i, row) in table.rows.iter().enumerate() {
            let cells = row.cells();
            let mut values: Vec<Cell<'_>> = Vec::with_capacity(cells.len());
            values.push(Cell::Number(row.qt));
            values.extend(cells[1..].iter().map(|c| Cell::Text(c)));
            write_row(&mut writer, i + 2, &values)?;
        }

        emit(&mut writer, Event::End(BytesEnd::new("sheetData")))?;
        emit(&mut writer, Event::End(BytesEnd::new("worksheet")))?;

        Ok(writer.into_inner())
    }
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableWriter for XlsxWriter {
    fn write(&self, table: &NormalizedTable) -> Result<Vec<u8>, ExportError> {
        // Fixed timestamp keeps output byte-identical across runs
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        let parts: [(&str, Vec<u8>); 5] = [
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec()),
            ("_rels/.rels", ROOT_RELS.as_bytes().to_vec()),
            ("xl/workbook.xml", self.workbook_xml()?),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes().to_vec()),
            ("xl/worksheets/sheet1.xml", self.sheet_xml(table)?),
        ];

        for (name, content) in parts {
            zip.start_file(name, options)?;
            zip.write_all(&content)?;
        }

        let data = zip.finish()?.into_inner();
        debug!("Wrote workbook with {} rows ({} bytes)", table.len(), data.len());
        Ok(data)
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }
}

enum Cell<'a> {
    Number(usize),
    Text(&'a str),
}

fn emit<'a>(writer: &mut Writer<Vec<u8>>, event: Event<'a>) -> Result<(), ExportError> {
    writer
        .write_event(event)
        .map_err(|e| ExportError::Xml(e.to_string()))
}

fn write_row(
    writer: &mut Writer<Vec<u8>>,
    row_number: usize,
    cells: &[Cell<'_>],
) -> Result<(), ExportError> {
    let row_ref = row_number.to_string();
    emit(
        writer,
        Event::Start(BytesStart::new("row").with_attributes([("r", row_ref.as_str())])),
    )?;

    for (col, cell) in cells.iter().enumerate() {
        let cell_ref = format!("{}{}", column_name(col), row_number);
        match cell {
            Cell::Number(n) => {
                emit(
                    writer,
                    Event::Start(BytesStart::new("c").with_attributes([("r", cell_ref.as_str())])),
                )?;
                emit(writer, Event::Start(BytesStart::new("v")))?;
                emit(writer, Event::Text(BytesText::new(&n.to_string())))?;
                emit(writer, Event::End(BytesEnd::new("v")))?;
            }
            Cell::Text(text) => {
                let text = xml_safe(text);
                emit(
                    writer,
                    Event::Start(
                        BytesStart::new("c")
                            .with_attributes([("r", cell_ref.as_str()), ("t", "inlineStr")]),
                    ),
                )?;
                emit(writer, Event::Start(BytesStart::new("is")))?;
                emit(
                    writer,
                    Event::Start(BytesStart::new("t").with_attributes([("xml:space", "preserve")])),
                )?;
                emit(writer, Event::Text(BytesText::new(&text)))?;
                emit(writer, Event::End(BytesEnd::new("t")))?;
                emit(writer, Event::End(BytesEnd::new("is")))?;
            }
        }
        emit(writer, Event::End(BytesEnd::new("c")))?;
    }

    emit(writer, Event::End(BytesEnd::new("row")))
}

/// Spreadsheet column letters for a 0-based index (0 -> A, 26 -> AA).
fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

/// Drop characters XML 1.0 cannot carry.
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || c >= '\u{20}')
        .filter(|&c| c != '\u{FFFE}' && c != '\u{FFFF}')
        .collect()
}

fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME)
        .collect();

    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}
