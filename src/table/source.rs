//! Record sources
//!
//! The table does not parse delimited text. A reader for the underlying
//! format implements [`RecordSource`] and hands over tokenized records.

use super::errors::SourceError;
use super::Row;

/// Supplier of tokenized records
pub trait RecordSource {
    /// Read the next record.
    /// Returns `None` at end of input.
    fn next_record(&mut self) -> Result<Option<Row>, SourceError>;

    /// Read every remaining record
    fn read_all(&mut self) -> Result<Vec<Row>, SourceError> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record()? {
            records.push(record);
        }
        Ok(records)
    }
}

/// Source over records already in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: std::vec::IntoIter<Row>,
}

impl MemorySource {
    pub fn new(records: Vec<Row>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }
}

impl From<Vec<Row>> for MemorySource {
    fn from(records: Vec<Row>) -> Self {
        Self::new(records)
    }
}

impl RecordSource for MemorySource {
    fn next_record(&mut self) -> Result<Option<Row>, SourceError> {
        Ok(self.records.next())
    }

    fn read_all(&mut self) -> Result<Vec<Row>, SourceError> {
        Ok(self.records.by_ref().collect())
    }
}

/// Source over a fallible iterator, e.g. a streaming reader
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    iter: I,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = Result<Row, SourceError>>,
{
    pub fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I> RecordSource for IterSource<I>
where
    I: Iterator<Item = Result<Row, SourceError>>,
{
    fn next_record(&mut self) -> Result<Option<Row>, SourceError> {
        self.iter.next().transpose()
    }
}
