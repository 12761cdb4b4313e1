//! Composite keys
//!
//! A composite key encodes the fields of one row over an ordered column
//! set. Each field is written as `<byte length>:<value>`, so `["ab", "c"]`
//! and `["a", "bc"]` produce different keys. Hash indexes, equality queries
//! and distinct all build keys through this type.

/// Encoded field tuple used for hashing and grouping
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey(String);

impl CompositeKey {
    /// Encodes fields in the given order
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut key = String::new();
        for field in fields {
            key.push_str(&field.len().to_string());
            key.push(':');
            key.push_str(field);
        }
        CompositeKey(key)
    }

    /// Encodes the fields of `row` at `positions`
    pub fn from_row(row: &[String], positions: &[usize]) -> Self {
        Self::from_fields(positions.iter().map(|&p| row[p].as_str()))
    }

    /// Returns the encoded form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
