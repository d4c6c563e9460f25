/// Rows of a watchlist or blacklist, e.g. `["AE1234", "C17"]`.
///
/// A value matches a row when it equals one of the row's fields exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowList {
    rows: Vec<Vec<String>>,
}

impl RowList {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn from_rows<R, F>(rows: R) -> Self
    where
        R: IntoIterator<Item = F>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True if at least one row has `value` as a field.
    pub fn contains(&self, value: &str) -> bool {
        self.rows.iter().any(|row| row_has(row, value))
    }

    /// True if at least one row does not have `value` as a field.
    ///
    /// This is the exclusion test applied to blacklists. It is false for an
    /// empty list, and a missing value is never found in any row.
    pub fn any_row_lacks(&self, value: Option<&str>) -> bool {
        self.rows
            .iter()
            .any(|row| value.map_or(true, |v| !row_has(row, v)))
    }
}

fn row_has(row: &[String], value: &str) -> bool {
    row.iter().any(|field| field == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_matches_whole_fields_only() {
        let list = RowList::from_rows([vec!["AE1234", "C17"], vec!["A0FFEE"]]);
        assert!(list.contains("C17"));
        assert!(list.contains("A0FFEE"));
        assert!(!list.contains("AE12"));
        assert!(!RowList::default().contains("AE1234"));
    }

    #[test]
    fn any_row_lacks_needs_a_non_matching_row() {
        let single = RowList::from_rows([vec!["AE1234"]]);
        assert!(!single.any_row_lacks(Some("AE1234")));
        assert!(single.any_row_lacks(Some("BEEF00")));
        assert!(single.any_row_lacks(None));

        let two = RowList::from_rows([vec!["AE1234"], vec!["C17"]]);
        assert!(two.any_row_lacks(Some("AE1234")));

        assert!(!RowList::default().any_row_lacks(Some("AE1234")));
        assert!(!RowList::default().any_row_lacks(None));
    }
}
