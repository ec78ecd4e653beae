//! Headered CSV front end for the ingestor.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use super::{ingest_rows, FromRow, Row};
use crate::{Error, Result};

/// Iterator over the data rows of a headered CSV stream.
///
/// Short rows are allowed through with the trailing fields absent, so they
/// surface as schema errors naming the missing field rather than as a bare
/// CSV length error.
pub struct CsvRows<Rd: Read> {
    header: StringRecord,
    records: csv::StringRecordsIntoIter<Rd>,
}

impl<Rd: Read> CsvRows<Rd> {
    /// Wrap `reader`, consuming its header line.
    pub fn new(reader: Rd) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let header = reader.headers()?.clone();
        Ok(Self {
            header,
            records: reader.into_records(),
        })
    }

    /// Column names in file order.
    pub fn header(&self) -> impl Iterator<Item = &str> {
        self.header.iter()
    }

    fn to_row(&self, record: &StringRecord) -> Row {
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        Row::from_pairs(line, self.header.iter().zip(record.iter()))
    }
}

impl<Rd: Read> Iterator for CsvRows<Rd> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(record.map_err(Error::from).map(|r| self.to_row(&r)))
    }
}

/// Read every data row of a CSV file without applying a schema.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Row>> {
    CsvRows::new(open_input(path.as_ref())?)?.collect()
}

/// Ingest a CSV file into typed records.
///
/// The header is checked against `R`'s schema before any row is read.
pub fn ingest_csv<R: FromRow, P: AsRef<Path>>(path: P) -> Result<Vec<R>> {
    let path = path.as_ref();
    let records = ingest_reader(open_input(path)?)?;
    debug!(
        path = %path.display(),
        schema = R::schema().name,
        records = records.len(),
        "ingested csv"
    );
    Ok(records)
}

/// Ingest CSV text from any reader into typed records.
pub fn ingest_reader<R: FromRow, Rd: Read>(reader: Rd) -> Result<Vec<R>> {
    let rows = CsvRows::new(reader)?;
    R::schema().check_keys(rows.header(), 1)?;
    ingest_rows(rows)
}

fn open_input(path: &Path) -> Result<File> {
    if !path.is_file() {
        return Err(Error::MissingInputSource(path.to_path_buf()));
    }
    File::open(path).map_err(|e| {
        Error::IoError(std::io::Error::new(
            e.kind(),
            format!("failed to open input file '{}': {}", path.display(), e),
        ))
    })
}
