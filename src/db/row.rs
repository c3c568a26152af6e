use sea_orm::{DbErr, QueryResult};

/// One result row: column names in the order the store emitted them, each
/// mapped to its value coerced to text. `None` is a store NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<(String, Option<String>)>,
}

impl Row {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: Option<String>) {
        self.columns.push((column.into(), value));
    }

    /// Value of `column`, `None` for NULL or an absent column.
    ///
    /// Column names match ASCII case-insensitively.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .and_then(|(_, value)| value.as_deref())
    }

    /// Value of `column` with NULL and absence collapsed to `""`.
    #[must_use]
    pub fn text(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// Like [`Row::get`] but treats an empty string as no value.
    #[must_use]
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(column))
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub(crate) fn from_query_result(result: &QueryResult) -> Result<Self, DbErr> {
        let mut row = Self::new();
        for column in result.column_names() {
            let value = cell_to_string(result, &column)?;
            row.push(column, value);
        }
        Ok(row)
    }
}

impl FromIterator<(String, Option<String>)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, Option<String>)>>(iter: T) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

// The driver refuses to decode across storage classes, so try each in turn.
fn cell_to_string(result: &QueryResult, column: &str) -> Result<Option<String>, DbErr> {
    if let Ok(value) = result.try_get_by::<Option<String>, _>(column) {
        return Ok(value);
    }
    if let Ok(value) = result.try_get_by::<Option<i64>, _>(column) {
        return Ok(value.map(|v| v.to_string()));
    }
    if let Ok(value) = result.try_get_by::<Option<f64>, _>(column) {
        return Ok(value.map(|v| v.to_string()));
    }
    if let Ok(value) = result.try_get_by::<Option<bool>, _>(column) {
        return Ok(value.map(|v| if v { "1" } else { "0" }.to_string()));
    }
    result
        .try_get_by::<Option<Vec<u8>>, _>(column)
        .map(|value| value.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
}
