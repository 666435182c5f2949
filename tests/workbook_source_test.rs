use anyhow::Result;
use sankey_flows::domain::ports::MatrixSource;
use sankey_flows::{transform_matrix, EtlError, SpreadsheetSource};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="2019" sheetId="1" r:id="rId1"/><sheet name="Notes" sheetId="2" r:id="rId2"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/></Relationships>"#;

// Block starts at B2: labels in B, a "Total" column in E to skip, an #N/A
// balancing cell, a blank line and a notes row below.
const FLOWS_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="2"><c r="C2" t="inlineStr"><is><t>Iron ore</t></is></c><c r="D2" t="inlineStr"><is><t>Pig iron</t></is></c><c r="E2" t="inlineStr"><is><t>Total</t></is></c><c r="F2" t="inlineStr"><is><t>Balancing flows</t></is></c></row>
<row r="3"><c r="B3" t="inlineStr"><is><t>Iron ore</t></is></c><c r="D3"><v>100</v></c><c r="E3"><v>100</v></c><c r="F3" t="e"><v>#N/A</v></c></row>
<row r="4"><c r="B4" t="inlineStr"><is><t>Pig iron</t></is></c><c r="E4"><v>-5</v></c><c r="F4"><v>-5</v></c></row>
<row r="6"><c r="B6" t="inlineStr"><is><t>Notes</t></is></c><c r="C6" t="inlineStr"><is><t>see sheet</t></is></c></row>
</sheetData></worksheet>"#;

const NOTES_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>Illustrative figures</t></is></c></row>
</sheetData></worksheet>"#;

fn write_workbook(dir: &TempDir) -> Result<PathBuf> {
    let path = dir.path().join("flows.xlsx");
    let mut zip = zip::ZipWriter::new(std::fs::File::create(&path)?);
    let options = SimpleFileOptions::default();

    for (name, content) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/worksheets/sheet1.xml", FLOWS_SHEET),
        ("xl/worksheets/sheet2.xml", NOTES_SHEET),
    ] {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }
    zip.finish()?;
    Ok(path)
}

fn source() -> Result<SpreadsheetSource> {
    Ok(SpreadsheetSource::from_selection("B:D,F", Some(2))?)
}

#[test]
fn test_reads_named_sheet_in_sheet_coordinates() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_workbook(&dir)?;

    let matrix = source()?.load(&path, "2019")?;

    assert_eq!(matrix.row_labels, vec!["Iron ore", "Pig iron"]);
    assert_eq!(
        matrix.column_labels,
        vec!["Iron ore", "Pig iron", "Balancing flows"]
    );
    assert_eq!(
        matrix.values,
        vec![vec![0.0, 100.0, 0.0], vec![0.0, 0.0, -5.0]]
    );
    Ok(())
}

#[test]
fn test_workbook_matrix_transforms() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_workbook(&dir)?;

    let table = transform_matrix(&source()?.load(&path, "2019")?);

    // 2x3 cells, three balancing companions, production and reference rows.
    assert_eq!(table.len(), 6 + 3 + 2);
    let production = &table.edges()[table.len() - 2];
    assert_eq!(production.source, "Production of iron ore");
    assert_eq!(production.value, 100.0);
    assert!(table
        .iter()
        .any(|e| e.source == "Imports of pig iron" && e.target == "Pig iron" && e.value == 5.0));
    Ok(())
}

#[test]
fn test_missing_sheet_lists_available_sheets() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_workbook(&dir)?;

    let err = source()?.load(&path, "2018").unwrap_err();
    match err {
        EtlError::SheetNotFound { sheet, available } => {
            assert_eq!(sheet, "2018");
            assert_eq!(available, vec!["2019", "Notes"]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_header_only_sheet_has_no_rows() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_workbook(&dir)?;

    let matrix = SpreadsheetSource::from_selection("A:B", None)?.load(&path, "Notes")?;
    assert_eq!(matrix.shape(), (0, 1));
    Ok(())
}
