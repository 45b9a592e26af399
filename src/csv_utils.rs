//! Tab-separated table input and output on top of the csv crate
//!
//! All tables read by the program have a named header line, may contain '#' comment lines, and
//! may be gzip-compressed. Columns are matched to row struct fields by name.
//!

use std::fmt::Display;
use std::fs::File;
use std::io::{self, Read};
use std::str::FromStr;

use camino::Utf8Path;
use csv::{ReaderBuilder, Trim, Writer, WriterBuilder};
use flate2::read::MultiGzDecoder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use simple_error::{SimpleResult, bail};

/// Open a table file for reading, transparently decompressing files ending in '.gz'
///
pub fn open_table_file(filename: &Utf8Path, label: &str) -> SimpleResult<Box<dyn Read>> {
    let file = match File::open(filename) {
        Ok(x) => x,
        Err(e) => bail!("Unable to open {label} file '{filename}': {e}"),
    };
    let reader: Box<dyn Read> = if filename.extension() == Some("gz") {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(reader)
}

/// Deserialize every data row of a tab-separated table
///
/// The first non-comment line is the header. Field values and header names are trimmed.
///
pub fn read_tsv_table<T: DeserializeOwned>(
    reader: impl Read,
    label: &str,
) -> SimpleResult<Vec<T>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(reader);

    match rdr.headers() {
        Ok(x) if x.is_empty() => bail!("No header found in {label} table"),
        Ok(_) => {}
        Err(e) => bail!("Invalid {label} table header: {e}"),
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize::<T>() {
        match result {
            Ok(x) => rows.push(x),
            Err(e) => bail!("Invalid {label} table record: {e}"),
        }
    }
    Ok(rows)
}

/// Get a tab-separated table writer, with the header written from `columns`
///
/// Header names are written explicitly so that a table with no rows still has a header.
///
pub fn get_tsv_writer<W: io::Write>(writer: W, columns: &[&str]) -> csv::Result<Writer<W>> {
    let mut wtr = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(columns)?;
    Ok(wtr)
}

/// Write all rows of a tab-separated table
///
pub fn write_tsv_table<W, T>(
    writer: W,
    columns: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> csv::Result<()>
where
    W: io::Write,
    T: Serialize,
{
    let mut wtr = get_tsv_writer(writer, columns)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Serde field adaptor for types read through `FromStr` and written through `Display`
///
pub mod display_from_str {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde field adaptor for optional values, where an empty field or '.' is missing
///
/// Missing values are written as '.'.
///
pub mod optional_field {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        match value {
            Some(x) => serializer.collect_str(x),
            None => serializer.serialize_str("."),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        if value.is_empty() || value == "." {
            Ok(None)
        } else {
            value.parse().map(Some).map_err(serde::de::Error::custom)
        }
    }
}
