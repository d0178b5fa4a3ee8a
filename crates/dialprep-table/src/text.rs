use crate::error::{Result, TableError};
use crate::format::TableFormat;
use crate::{ReadOptions, ReadReport, ReadTable, MAX_WARNINGS};
use dialprep_core::{CellValue, RawTable};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::borrow::Cow;

const CANDIDATE_DELIMITERS: [u8; 4] = [b';', b',', b'\t', b'|'];
const DEFAULT_DELIMITER: u8 = b';';

pub fn read_delimited(bytes: &[u8], options: &ReadOptions) -> Result<ReadTable> {
    let (text, encoding, lossy) = decode(bytes, options.encoding);
    let delimiter = options.delimiter.unwrap_or_else(|| sniff_delimiter(&text));

    let mut warnings = Vec::new();
    if lossy {
        warnings.push(format!(
            "input is not valid {}; undecodable bytes were replaced",
            encoding.name()
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.iter().all(|name| name.trim().is_empty()) {
        return Err(TableError::EmptyTable);
    }

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    let mut skipped = 0;
    for (offset, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = offset + 2;
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                skipped += 1;
                push_warning(&mut warnings, format!("skipping row {line}: {err}"));
                continue;
            }
        };
        if record.len() > columns.len() {
            skipped += 1;
            push_warning(
                &mut warnings,
                format!(
                    "skipping row {line}: expected {} fields, found {}",
                    columns.len(),
                    record.len()
                ),
            );
            continue;
        }
        rows.push(record.iter().map(CellValue::text).collect());
    }

    if skipped > MAX_WARNINGS {
        warnings.push(format!("{skipped} malformed rows skipped in total"));
    }

    let table = RawTable::new(columns, rows);
    let report = ReadReport {
        format: TableFormat::Delimited,
        rows: table.len(),
        skipped_rows: skipped,
        warnings,
        encoding: Some(encoding.name().to_string()),
        delimiter: Some(delimiter as char),
    };
    Ok(ReadTable { table, report })
}

fn push_warning(warnings: &mut Vec<String>, warning: String) {
    if warnings.len() < MAX_WARNINGS {
        warnings.push(warning);
    }
}

/// Decodes file bytes. Without a forced encoding: a BOM wins, then valid
/// UTF-8, then Windows-1252 (what spreadsheet tools call latin1).
pub fn decode<'a>(
    bytes: &'a [u8],
    forced: Option<&'static Encoding>,
) -> (Cow<'a, str>, &'static Encoding, bool) {
    if let Some(encoding) = forced {
        let (text, used, lossy) = encoding.decode(bytes);
        return (text, used, lossy);
    }

    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, lossy) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return (text, encoding, lossy);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => (Cow::Borrowed(text), UTF_8, false),
        Err(_) => {
            let (text, lossy) = WINDOWS_1252.decode_without_bom_handling(bytes);
            (text, WINDOWS_1252, lossy)
        }
    }
}

/// Picks the candidate delimiter that occurs most often (outside quotes) in
/// the first non-blank line. Ties go to the earlier candidate.
pub fn sniff_delimiter(text: &str) -> u8 {
    let header = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default();

    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut quoted = false;
    for byte in header.bytes() {
        if byte == b'"' {
            quoted = !quoted;
            continue;
        }
        if quoted {
            continue;
        }
        if let Some(slot) = CANDIDATE_DELIMITERS.iter().position(|c| *c == byte) {
            counts[slot] += 1;
        }
    }

    let mut best = DEFAULT_DELIMITER;
    let mut best_count = 0;
    for (candidate, count) in CANDIDATE_DELIMITERS.iter().zip(counts) {
        if count > best_count {
            best = *candidate;
            best_count = count;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::{decode, read_delimited, sniff_delimiter};
    use crate::ReadOptions;
    use dialprep_core::CellValue;
    use encoding_rs::{UTF_8, WINDOWS_1252};

    #[test]
    fn sniff_prefers_most_frequent_delimiter() {
        assert_eq!(sniff_delimiter("NOME;TELEFONE;DDD\n"), b';');
        assert_eq!(sniff_delimiter("NOME,TELEFONE,DDD\n"), b',');
        assert_eq!(sniff_delimiter("NOME\tTELEFONE\n"), b'\t');
        assert_eq!(sniff_delimiter("\"SOBRENOME, NOME\";TELEFONE\n"), b';');
        assert_eq!(sniff_delimiter("TELEFONE\n"), b';');
    }

    #[test]
    fn decode_detects_bom_utf8_and_latin1() {
        let (text, encoding, _) = decode(b"\xEF\xBB\xBFNOME", None);
        assert_eq!(text, "NOME");
        assert_eq!(encoding, UTF_8);

        let (text, encoding, _) = decode("Código".as_bytes(), None);
        assert_eq!(text, "Código");
        assert_eq!(encoding, UTF_8);

        let (text, encoding, lossy) = decode(b"C\xF3digo", None);
        assert_eq!(text, "Código");
        assert_eq!(encoding, WINDOWS_1252);
        assert!(!lossy);
    }

    #[test]
    fn read_delimited_pads_short_rows_and_skips_long_ones() {
        let data = b"NOME;TELEFONE;DDD\nAna;999998888;11\nBruno;988887777\nCarla;1;2;3;4\n";
        let read = read_delimited(data, &ReadOptions::default()).expect("read");

        assert_eq!(read.table.column_names(), ["NOME", "TELEFONE", "DDD"]);
        assert_eq!(read.table.len(), 2);
        assert_eq!(read.table.get(1, "DDD"), Some(&CellValue::Empty));
        assert_eq!(read.report.skipped_rows, 1);
        assert_eq!(read.report.warnings.len(), 1);
        assert_eq!(read.report.delimiter, Some(';'));
    }

    #[test]
    fn read_delimited_honors_forced_delimiter() {
        let data = b"NOME,TELEFONE\nAna,11999998888\n";
        let options = ReadOptions {
            delimiter: Some(b';'),
            encoding: None,
        };
        let read = read_delimited(data, &options).expect("read");
        assert_eq!(read.table.column_names(), ["NOME,TELEFONE"]);
    }

    #[test]
    fn read_delimited_rejects_empty_input() {
        assert!(read_delimited(b"", &ReadOptions::default()).is_err());
    }
}
