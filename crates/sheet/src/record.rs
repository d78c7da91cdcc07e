use crate::cell::CellValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

static EMPTY: CellValue = CellValue::Null;

/// One data row of a sheet, keyed by column header (preserves header order).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, CellValue>,
}

impl Record {
    /// Build a record by pairing headers with the cells of one grid row.
    ///
    /// Cells past the last header are dropped and missing cells become
    /// `Null`. A repeated header keeps its first position and the value of
    /// its last column.
    #[must_use]
    pub fn from_cells(headers: &[String], cells: &[CellValue]) -> Self {
        let mut fields = IndexMap::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            let value = cells.get(i).cloned().unwrap_or_default();
            fields.insert(header.clone(), value);
        }
        Record { fields }
    }

    /// Get a field by header. Absent headers read as `Null`.
    #[must_use]
    pub fn get(&self, header: &str) -> &CellValue {
        self.fields.get(header).unwrap_or(&EMPTY)
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate `(header, value)` pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate values in header order
    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.fields.values()
    }

    /// True if any field's string form contains `needle` (already lowercased).
    #[must_use]
    pub fn any_field_contains(&self, needle: &str) -> bool {
        self.fields.values().any(|v| v.contains_lowercase(needle))
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
