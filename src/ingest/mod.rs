//! Record ingestion.
//!
//! Turns structured rows (string values keyed by field name) into typed
//! records. Each record type declares a [`Schema`] of required fields; a row
//! missing one fails the whole ingestion with [`Error::Schema`], and a value
//! that does not convert fails it with [`Error::Parse`]. There is no
//! skip-and-continue here: a malformed row means a corrupted log.
//!
//! - `Row` - untyped input row
//! - `Schema` / `Field` - required fields and their kinds
//! - `FromRow` - implemented by each record type
//! - `ingest_csv` - headered CSV front end
//!
//! [`Error::Schema`]: crate::Error::Schema
//! [`Error::Parse`]: crate::Error::Parse

mod row;
mod schema;
mod csv_file;

pub use row::Row;
pub use schema::{Field, FieldKind, Schema, TypedRow, Value};
pub use csv_file::{ingest_csv, ingest_reader, read_csv, CsvRows};

use crate::Result;

/// A record type that can be built from a schema-checked row.
pub trait FromRow: Sized {
    /// Required fields for this record type.
    fn schema() -> &'static Schema;

    /// Build the record from a row whose required fields are all converted.
    fn from_row(row: &TypedRow) -> Result<Self>;
}

/// Ingest rows in order, failing on the first structural problem.
pub fn ingest<R, I>(rows: I) -> Result<Vec<R>>
where
    R: FromRow,
    I: IntoIterator<Item = Row>,
{
    ingest_rows(rows.into_iter().map(Ok))
}

/// Like [`ingest`] for sources whose rows can themselves fail to read.
pub fn ingest_rows<R, I>(rows: I) -> Result<Vec<R>>
where
    R: FromRow,
    I: IntoIterator<Item = Result<Row>>,
{
    let schema = R::schema();
    rows.into_iter()
        .map(|row| {
            let typed = schema.parse(&row?)?;
            R::from_row(&typed)
        })
        .collect()
}
