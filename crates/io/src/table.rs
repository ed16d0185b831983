//! Tabular results: a named time series and a time-indexed column table.

use chrono::NaiveDateTime;

use crate::error::DatasetError;

/// A single named time series.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSeries {
    name: String,
    index: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl DataSeries {
    /// Creates a series after checking that the index and values agree in
    /// length.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::ShapeMismatch`] when the lengths differ.
    pub fn new(
        name: impl Into<String>,
        index: Vec<NaiveDateTime>,
        values: Vec<f64>,
    ) -> Result<Self, DatasetError> {
        let name = name.into();
        if index.len() != values.len() {
            return Err(DatasetError::ShapeMismatch {
                name,
                expected: index.len(),
                got: values.len(),
            });
        }
        Ok(Self {
            name,
            index,
            values,
        })
    }

    /// Creates an empty series with the given name.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Series name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time index.
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// Values, aligned with the index.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One named column of a [`DataTable`].
#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    values: Vec<f64>,
}

/// A time-indexed table: rows are timesteps, columns are variables (or
/// variable/depth combinations).
///
/// Every column shares the table's single time index; pushing a column
/// whose length disagrees with the index fails rather than silently
/// misaligning rows.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    index: Vec<NaiveDateTime>,
    columns: Vec<Column>,
}

impl DataTable {
    /// Creates a table with the given time index and no columns.
    pub fn new(index: Vec<NaiveDateTime>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::ShapeMismatch`] when `values.len()` differs
    /// from the number of rows.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), DatasetError> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(DatasetError::ShapeMismatch {
                name,
                expected: self.index.len(),
                got: values.len(),
            });
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Time index shared by every column.
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` when the table holds no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Values of the named column, if present.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }
}
