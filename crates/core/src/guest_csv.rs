//! The canonical guest CSV format used for bulk import and export.
//!
//! ```text
//! nome,telefone,status,acompanhantes,status_acompanhantes,criancas_0_6,criancas_7_10
//! Ana Souza,(11) 98765-4321,PENDENTE,Bruno;Carla,CONFIRMADO_PRESENCA;PENDENTE,1,0
//! ```
//!
//! Columns are positional. The first record is always treated as the header.
//! Quoted cells may span lines. Companion names and their statuses are
//! `;`-separated and aligned by position, so companion names never contain
//! `;`. Unknown statuses fall back to `PENDENTE`, and unparseable child
//! counts fall back to `0`. Rows with a missing or invalid guest or companion
//! name, or with a negative child count, are reported and skipped.

use serde::Serialize;

use crate::error::CoreError;
use crate::status::GuestStatus;
use crate::validation::{validate_child_count, validate_companion_name, validate_name};

/// Header row written on export and shown in the import template.
pub const CSV_HEADER: &str =
    "nome,telefone,status,acompanhantes,status_acompanhantes,criancas_0_6,criancas_7_10";

/// Separator between companion names (and statuses) inside one cell.
pub const LIST_SEPARATOR: char = ';';

const UTF8_BOM: char = '\u{feff}';

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A companion as it appears in one CSV cell pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvCompanion {
    pub name: String,
    pub status: GuestStatus,
}

/// One guest in CSV form. Used for both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestCsvRecord {
    pub name: String,
    pub phone: Option<String>,
    pub status: GuestStatus,
    pub companions: Vec<CsvCompanion>,
    pub children_0_6: i32,
    pub children_7_10: i32,
}

/// A successfully parsed row together with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub line: usize,
    pub record: GuestCsvRecord,
}

/// A rejected row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvRowError {
    /// 1-based line number in the uploaded file (the header is line 1).
    pub line: usize,
    pub reason: String,
}

/// Output of [`parse_guest_csv`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvParseReport {
    pub rows: Vec<ParsedRow>,
    pub errors: Vec<CsvRowError>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse an uploaded guest CSV.
///
/// Fails only when the file as a whole is unusable (not UTF-8, empty, or a
/// blank header). Individual bad rows end up in [`CsvParseReport::errors`].
pub fn parse_guest_csv(data: &[u8]) -> Result<CsvParseReport, CoreError> {
    let text = std::str::from_utf8(data)
        .map_err(|e| CoreError::Validation(format!("CSV is not valid UTF-8: {e}")))?;
    let text = text.trim_start_matches(UTF8_BOM);

    let mut records = split_records(text).into_iter();
    let (_, header) = records
        .next()
        .ok_or_else(|| CoreError::Validation("CSV file is empty".into()))?;
    if header.trim().is_empty() {
        return Err(CoreError::Validation("CSV header row is empty".into()));
    }

    let mut report = CsvParseReport::default();
    for (line_number, record) in records {
        if record.trim().is_empty() {
            continue;
        }
        match parse_record(&record) {
            Ok(record) => report.rows.push(ParsedRow {
                line: line_number,
                record,
            }),
            Err(reason) => report.errors.push(CsvRowError {
                line: line_number,
                reason,
            }),
        }
    }
    Ok(report)
}

fn parse_record(line: &str) -> Result<GuestCsvRecord, String> {
    let cells = parse_csv_line(line);
    let cell = |i: usize| cells.get(i).map(|s| s.trim()).unwrap_or("");

    let name = validate_name("nome", cell(0)).map_err(reason)?;
    let phone = Some(cell(1)).filter(|p| !p.is_empty()).map(String::from);
    let status = GuestStatus::parse_or_pending(cell(2));
    let companions = parse_companions(cell(3), cell(4))?;
    let children_0_6 = parse_child_count("criancas_0_6", cell(5))?;
    let children_7_10 = parse_child_count("criancas_7_10", cell(6))?;

    Ok(GuestCsvRecord {
        name,
        phone,
        status,
        companions,
        children_0_6,
        children_7_10,
    })
}

fn reason(err: CoreError) -> String {
    match err {
        CoreError::Validation(msg) => msg,
        other => other.to_string(),
    }
}

/// Pair companion names with their statuses by position.
///
/// Blank names are dropped and any other invalid name rejects the row.
/// Missing or unknown statuses become `PENDENTE`.
fn parse_companions(names: &str, statuses: &str) -> Result<Vec<CsvCompanion>, String> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let statuses: Vec<&str> = statuses.split(LIST_SEPARATOR).collect();
    let mut companions = Vec::new();
    for (i, raw) in names.split(LIST_SEPARATOR).enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let name = validate_companion_name("acompanhantes", raw).map_err(reason)?;
        let status = statuses
            .get(i)
            .map(|s| GuestStatus::parse_or_pending(s))
            .unwrap_or_default();
        companions.push(CsvCompanion { name, status });
    }
    Ok(companions)
}

/// Empty or non-numeric -> 0; negative or out of range -> row error.
fn parse_child_count(field: &str, value: &str) -> Result<i32, String> {
    let Ok(parsed) = value.parse::<i64>() else {
        return Ok(0);
    };
    let count = i32::try_from(parsed).map_err(|_| format!("{field} is out of range"))?;
    validate_child_count(field, count).map_err(reason)?;
    Ok(count)
}

/// Split the file into records, each tagged with the 1-based line it starts
/// on. A line break inside a quoted cell belongs to the cell.
fn split_records(text: &str) -> Vec<(usize, String)> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut at_cell_start = true;
    let mut line = 1;
    let mut start_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                current.push(c);
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if at_cell_start => {
                in_quotes = true;
                current.push(c);
            }
            '\n' if !in_quotes => {
                if current.ends_with('\r') {
                    current.pop();
                }
                records.push((start_line, std::mem::take(&mut current)));
                line += 1;
                start_line = line;
                at_cell_start = true;
                continue;
            }
            '\n' => {
                line += 1;
                current.push(c);
            }
            ',' if !in_quotes => {
                current.push(c);
                at_cell_start = true;
                continue;
            }
            _ => current.push(c),
        }
        at_cell_start = false;
    }
    if !current.is_empty() {
        records.push((start_line, current));
    }
    records
}

/// Split one CSV record into cells, honouring double quotes and `""` escapes.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            ',' if !in_quotes => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);
    cells
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Quote a value when it contains a comma, a quote or a line break.
fn csv_escape(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render guests in the canonical format, header first.
pub fn build_guest_csv(records: &[GuestCsvRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for record in records {
        let companion_names: Vec<&str> =
            record.companions.iter().map(|c| c.name.as_str()).collect();
        let companion_statuses: Vec<&str> =
            record.companions.iter().map(|c| c.status.as_str()).collect();

        let cells = [
            csv_escape(&record.name),
            csv_escape(record.phone.as_deref().unwrap_or("")),
            record.status.as_str().to_string(),
            csv_escape(&companion_names.join(";")),
            companion_statuses.join(";"),
            record.children_0_6.to_string(),
            record.children_7_10.to_string(),
        ];
        lines.push(cells.join(","));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn csv(body: &str) -> Vec<u8> {
        format!("{CSV_HEADER}\n{body}").into_bytes()
    }

    #[test]
    fn parses_full_row() {
        let report = parse_guest_csv(&csv(
            "Ana Souza,(11) 98765-4321,CONFIRMADO_PRESENCA,Bruno;Carla,CONFIRMADO_AUSENCIA,2,1",
        ))
        .unwrap();

        assert!(report.errors.is_empty());
        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        assert_eq!(row.line, 2);
        assert_eq!(row.record.name, "Ana Souza");
        assert_eq!(row.record.phone.as_deref(), Some("(11) 98765-4321"));
        assert_eq!(row.record.status, GuestStatus::ConfirmadoPresenca);
        assert_eq!(
            row.record.companions,
            vec![
                CsvCompanion {
                    name: "Bruno".into(),
                    status: GuestStatus::ConfirmadoAusencia
                },
                CsvCompanion {
                    name: "Carla".into(),
                    status: GuestStatus::Pendente
                },
            ]
        );
        assert_eq!(row.record.children_0_6, 2);
        assert_eq!(row.record.children_7_10, 1);
    }

    #[test]
    fn lenient_defaults() {
        let report = parse_guest_csv(&csv("Davi,,talvez,,,x,")).unwrap();
        let record = &report.rows[0].record;
        assert_eq!(record.phone, None);
        assert_eq!(record.status, GuestStatus::Pendente);
        assert!(record.companions.is_empty());
        assert_eq!(record.children_0_6, 0);
        assert_eq!(record.children_7_10, 0);
    }

    #[test]
    fn short_row_is_accepted() {
        let report = parse_guest_csv(&csv("Eva")).unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].record.name, "Eva");
    }

    #[test]
    fn malformed_rows_are_reported_with_line_numbers() {
        let body = "Ana,,,,,,\n,11999990000,PENDENTE,,,0,0\n\nBia,,,,,-2,0\nCris,,,,,,";
        let report = parse_guest_csv(&csv(body)).unwrap();

        let names: Vec<&str> = report.rows.iter().map(|r| r.record.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Cris"]);

        let lines: Vec<usize> = report.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 5]);
        assert!(report.errors[1].reason.contains("criancas_0_6"));
    }

    #[test]
    fn quoted_cells_keep_commas() {
        let report = parse_guest_csv(&csv("\"Souza, Ana\",,,\"Bruno \"\"Bu\"\"\",,0,0")).unwrap();
        let record = &report.rows[0].record;
        assert_eq!(record.name, "Souza, Ana");
        assert_eq!(record.companions[0].name, "Bruno \"Bu\"");
    }

    #[test]
    fn invalid_companion_name_rejects_row() {
        let long = "x".repeat(crate::validation::MAX_NAME_LENGTH + 1);
        let report = parse_guest_csv(&csv(&format!("Ana,,,{long},,0,0\nBia,,,Caio,,0,0"))).unwrap();

        let names: Vec<&str> = report.rows.iter().map(|r| r.record.name.as_str()).collect();
        assert_eq!(names, vec!["Bia"]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].line, 2);
        assert!(report.errors[0].reason.contains("acompanhantes"));
    }

    #[test]
    fn quoted_line_break_stays_in_one_record() {
        let body = "\"Ana\nSouza\",,,,,3,0\nBia,,,,,1,0";
        let report = parse_guest_csv(&csv(body)).unwrap();

        // The two-line record is one row: its name is rejected, not split.
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].line, 2);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].record.name, "Bia");
        assert_eq!(report.rows[0].line, 4);
    }

    #[test]
    fn multi_line_name_is_reported_not_split() {
        let records = vec![GuestCsvRecord {
            name: "Ana\nSouza".into(),
            phone: None,
            status: GuestStatus::Pendente,
            companions: vec![],
            children_0_6: 3,
            children_7_10: 0,
        }];
        let report = parse_guest_csv(build_guest_csv(&records).as_bytes()).unwrap();
        assert!(report.rows.is_empty());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn blank_companion_names_dropped() {
        let report = parse_guest_csv(&csv("Ana,,,Bruno;;Carla,,0,0")).unwrap();
        assert_eq!(report.rows[0].record.companions.len(), 2);
    }

    #[test]
    fn bom_and_crlf_tolerated() {
        let data = format!("\u{feff}{CSV_HEADER}\r\nAna,,,,,1,0\r\n").into_bytes();
        let report = parse_guest_csv(&data).unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].record.children_0_6, 1);
    }

    #[test]
    fn empty_file_is_an_error() {
        assert_matches!(parse_guest_csv(b""), Err(CoreError::Validation(_)));
        assert_matches!(parse_guest_csv(b"   \nAna"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        assert_matches!(parse_guest_csv(&[0xff, 0xfe, 0x00]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn export_then_import_preserves_guests() {
        let records = vec![
            GuestCsvRecord {
                name: "Souza, Ana".into(),
                phone: Some("11 98765-4321".into()),
                status: GuestStatus::ConfirmadoPresenca,
                companions: vec![
                    CsvCompanion {
                        name: "Bruno \"Jr\"".into(),
                        status: GuestStatus::ConfirmadoAusencia,
                    },
                    CsvCompanion {
                        name: "Carla, filha".into(),
                        status: GuestStatus::ConfirmadoPresenca,
                    },
                ],
                children_0_6: 1,
                children_7_10: 0,
            },
            GuestCsvRecord {
                name: "Davi".into(),
                phone: Some("11\r\n9999".into()),
                status: GuestStatus::Pendente,
                companions: vec![],
                children_0_6: 0,
                children_7_10: 2,
            },
        ];

        let exported = build_guest_csv(&records);
        assert!(exported.starts_with(CSV_HEADER));

        let report = parse_guest_csv(exported.as_bytes()).unwrap();
        assert!(report.errors.is_empty());
        let parsed: Vec<GuestCsvRecord> = report.rows.into_iter().map(|r| r.record).collect();
        assert_eq!(parsed, records);
    }
}
