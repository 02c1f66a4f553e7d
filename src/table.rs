//! Tabular sample import: CSV, plain text and XLSX.

use std::{
    convert::Infallible,
    io::{Read, Seek},
    path::Path,
    str::FromStr,
};

use serde::Serialize;

use crate::{input::ParsedInput, Error};

/// Which cells of a table form the sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnSelector {
    Index(usize),
    Name(String),
    /// Every cell, row by row.
    All,
}

impl FromStr for ColumnSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s {
            "*" | "all" => ColumnSelector::All,
            _ => match s.parse::<usize>() {
                Ok(i) => ColumnSelector::Index(i),
                Err(_) => ColumnSelector::Name(s.to_owned()),
            },
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Txt,
    Xlsx,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        ext.parse()
    }

    /// Headers exist in CSV and XLSX files, plain text is data only.
    pub fn has_header(&self) -> bool {
        !matches!(self, FileKind::Txt)
    }

    pub fn default_selector(&self) -> ColumnSelector {
        match self {
            FileKind::Txt => ColumnSelector::All,
            FileKind::Csv | FileKind::Xlsx => ColumnSelector::Index(0),
        }
    }
}

impl FromStr for FileKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(FileKind::Csv),
            "txt" => Ok(FileKind::Txt),
            "xlsx" => Ok(FileKind::Xlsx),
            other => Err(Error::UnsupportedFile(other.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DataTable {
    #[serde(rename = "Headers")]
    pub headers: Vec<String>,
    #[serde(rename = "Rows")]
    pub rows: Vec<Vec<String>>,
}

fn delimiter_of(line: &str) -> Option<char> {
    [',', ';', '\t'].into_iter().find(|d| line.contains(*d))
}

impl DataTable {
    pub fn from_delimited(text: &str, has_header: bool) -> Self {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty()).peekable();
        let delimiter = lines.peek().and_then(|l| delimiter_of(l));

        let split = |line: &str| -> Vec<String> {
            match delimiter {
                Some(d) => line.split(d).map(|c| unquote(c.trim()).to_owned()).collect(),
                None => line.split_whitespace().map(str::to_owned).collect(),
            }
        };

        let headers = if has_header {
            lines.next().map(&split).unwrap_or_default()
        } else {
            vec![]
        };
        let rows = lines.map(&split).collect::<Vec<_>>();

        let headers = if headers.is_empty() {
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            (0..width).map(|i| format!("Column {}", i + 1)).collect()
        } else {
            headers
        };

        Self { headers, rows }
    }

    /// First worksheet; its first row becomes the headers.
    pub fn from_xlsx<R: Read + Seek>(reader: R) -> Result<Self, Error> {
        let mut book = umya_spreadsheet::reader::xlsx::read_reader(reader, true)
            .map_err(|e| Error::Spreadsheet(e.to_string()))?;
        let sheet = book
            .get_sheet_mut(&0)
            .ok_or_else(|| Error::Spreadsheet("workbook has no sheets".to_owned()))?;

        let (max_col, max_row) = sheet.get_highest_column_and_row();
        let read_row = |row: u32| -> Vec<String> {
            (1..=max_col)
                .map(|col| sheet.get_value((col, row)).trim().to_owned())
                .collect()
        };

        let headers = if max_row >= 1 { read_row(1) } else { vec![] };
        let rows = (2..=max_row).map(read_row).collect();

        tracing::debug!("xlsx: {} columns, {} data rows", max_col, max_row.saturating_sub(1));

        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, selector: &ColumnSelector) -> Result<Option<usize>, Error> {
        match selector {
            ColumnSelector::All => Ok(None),
            ColumnSelector::Index(i) if *i < self.headers.len() => Ok(Some(*i)),
            ColumnSelector::Index(i) => Err(Error::ColumnNotFound(format!(
                "#{} (table has {} columns)",
                i,
                self.headers.len()
            ))),
            ColumnSelector::Name(name) => self
                .headers
                .iter()
                .position(|h| h == name)
                .map(Some)
                .ok_or_else(|| Error::ColumnNotFound(name.clone())),
        }
    }

    /// Sample from the selected cells; blank cells are skipped, unparsable ones rejected.
    pub fn values(&self, selector: &ColumnSelector) -> Result<ParsedInput, Error> {
        let column = self.column_index(selector)?;

        let mut parsed = ParsedInput::default();
        let cells = self.rows.iter().flat_map(|row| match column {
            Some(i) => row.get(i..=i).unwrap_or(&[]),
            None => row.as_slice(),
        });
        for cell in cells.filter(|c| !c.trim().is_empty()) {
            parsed.push_token(cell);
        }
        Ok(parsed)
    }
}

fn unquote(cell: &str) -> &str {
    cell.strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell)
}

/// Reads a table of the given kind from raw bytes.
pub fn read_table(kind: FileKind, bytes: &[u8]) -> Result<DataTable, Error> {
    match kind {
        FileKind::Xlsx => DataTable::from_xlsx(std::io::Cursor::new(bytes)),
        FileKind::Csv | FileKind::Txt => {
            let text = String::from_utf8_lossy(bytes);
            Ok(DataTable::from_delimited(&text, kind.has_header()))
        }
    }
}

/// Loads the sample from a `.csv`, `.txt` or `.xlsx` file.
pub fn load_path(path: &Path, selector: Option<&ColumnSelector>) -> Result<ParsedInput, Error> {
    let kind = FileKind::from_path(path)?;
    tracing::info!("Loading {:?} as {:?}", path, kind);

    let bytes = std::fs::read(path)?;
    let table = read_table(kind, &bytes)?;
    let default_selector = kind.default_selector();
    table.values(selector.unwrap_or(&default_selector))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn csv_with_header_and_name_selector() {
        let t = DataTable::from_delimited("id,value\n1,12.5\n2,\n3,x\n4,\"7\"\n", true);
        assert_eq!(t.headers, vec!["id", "value"]);
        let p = t.values(&ColumnSelector::Name("value".into())).unwrap();
        assert_eq!(p.values, vec![12.5, 7.0]);
        assert_eq!(p.rejected, vec!["x"]);
    }

    #[test]
    fn txt_without_header_takes_every_cell() {
        let t = DataTable::from_delimited("12 15 18\n22 25\n", false);
        assert_eq!(t.headers.len(), 3);
        let p = t.values(&ColumnSelector::All).unwrap();
        assert_eq!(p.values, vec![12.0, 15.0, 18.0, 22.0, 25.0]);
    }

    #[test]
    fn semicolon_delimited() {
        let t = DataTable::from_delimited("a;b\n1;2\n3;4\n", true);
        let p = t.values(&ColumnSelector::Index(1)).unwrap();
        assert_eq!(p.values, vec![2.0, 4.0]);
    }

    #[test]
    fn missing_column() {
        let t = DataTable::from_delimited("a,b\n1,2\n", true);
        assert!(matches!(
            t.values(&ColumnSelector::Index(5)),
            Err(Error::ColumnNotFound(_))
        ));
        assert!(matches!(
            t.values(&ColumnSelector::Name("c".into())),
            Err(Error::ColumnNotFound(_))
        ));
    }

    #[test]
    fn selector_parsing() {
        assert_eq!("2".parse::<ColumnSelector>(), Ok(ColumnSelector::Index(2)));
        assert_eq!("all".parse::<ColumnSelector>(), Ok(ColumnSelector::All));
        assert_eq!(
            "price".parse::<ColumnSelector>(),
            Ok(ColumnSelector::Name("price".into()))
        );
    }

    #[test]
    fn file_kinds() {
        assert_eq!(FileKind::from_path(Path::new("a/b.CSV")).unwrap(), FileKind::Csv);
        assert_eq!(FileKind::from_path(Path::new("b.xlsx")).unwrap(), FileKind::Xlsx);
        assert!(matches!(
            FileKind::from_path(Path::new("b.ods")),
            Err(Error::UnsupportedFile(_))
        ));
    }

    #[test]
    fn xlsx_round_trip_through_report() {
        let stats = crate::compute_statistics(&[3.0, 1.0, 2.0, 10.0], Default::default()).unwrap();
        let bytes = crate::report::xlsx_report(&stats, 4).unwrap();
        let table = read_table(FileKind::Xlsx, &bytes).unwrap();
        assert_eq!(table.headers[0], "Statistic");
    }
}
