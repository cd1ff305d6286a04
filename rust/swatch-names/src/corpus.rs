//! Vendor color catalogs: the raw training corpus.
//!
//! Each vendor ships a headerless CSV of `name,red,green,blue` rows under
//! `<data>/<vendor>/db.csv`. Records are numbered in reading order across
//! all vendors; the number is the record's `uid`.

use std::path::Path;

use csv_async::{AsyncReaderBuilder, Trim};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;

use crate::error::SwatchError;

/// One row of a vendor catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawColorRecord {
    pub raw_name: String,
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl RawColorRecord {
    pub fn new(raw_name: impl Into<String>, red: f64, green: f64, blue: f64) -> Self {
        RawColorRecord {
            raw_name: raw_name.into(),
            red,
            green,
            blue,
        }
    }
}

/// Read every record of one headerless catalog.
pub async fn read_records<R>(reader: R) -> Result<Vec<RawColorRecord>, SwatchError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut deserializer = AsyncReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .create_deserializer(reader);
    let mut rows = deserializer.deserialize::<RawColorRecord>();

    let mut records = Vec::new();
    while let Some(row) = rows.next().await {
        records.push(row?);
    }

    Ok(records)
}

/// The concatenated catalogs of every vendor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    records: Vec<RawColorRecord>,
}

impl Corpus {
    pub fn new(records: Vec<RawColorRecord>) -> Self {
        Corpus { records }
    }

    /// Read `<data_dir>/<vendor>/db.csv` for each vendor, in order.
    pub async fn read_vendors<S>(data_dir: &Path, vendors: &[S]) -> Result<Self, SwatchError>
    where
        S: AsRef<str>,
    {
        let mut corpus = Corpus::default();

        for vendor in vendors {
            let vendor = vendor.as_ref();
            let path = data_dir.join(vendor).join("db.csv");
            let file = tokio::fs::File::open(&path).await?;
            let records = read_records(file).await?;
            tracing::info!("Read {} lines from {}", records.len(), vendor);
            corpus.records.extend(records);
        }

        Ok(corpus)
    }

    pub fn records(&self) -> &[RawColorRecord] {
        &self.records
    }

    /// Records paired with their `uid`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &RawColorRecord)> {
        self.records.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every raw name, one per line; the language model trains on this.
    pub fn names_text(&self) -> String {
        self.records
            .iter()
            .map(|record| record.raw_name.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
