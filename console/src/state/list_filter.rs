//! Company/search/status filter applied to entity lists.
//!
//! DESIGN
//! ======
//! The company filter is sent to the server as `?empresa_id=`; search text
//! and status are applied to the returned rows inside the same load, so a
//! filtered table never shows rows the filter excludes.

#[cfg(test)]
#[path = "list_filter_test.rs"]
mod list_filter_test;

/// A row the list filter can match.
pub trait Listable {
    fn row_id(&self) -> i64;

    /// Text fields the free-text search looks at.
    fn search_fields(&self) -> Vec<&str>;

    /// Status label (`"activo"`, `"baja"`, ...) for the status filter.
    /// Entities without a status return `None` and are never matched by a
    /// non-empty status filter.
    fn status_label(&self) -> Option<&'static str> {
        None
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub empresa_id: Option<i64>,
    pub search: String,
    pub estado: Option<String>,
}

impl ListFilter {
    #[must_use]
    pub fn matches<T: Listable>(&self, row: &T) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || row
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));

        let status_ok = match self.estado.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => true,
            Some(wanted) => row.status_label().is_some_and(|label| label.eq_ignore_ascii_case(wanted)),
        };

        search_ok && status_ok
    }

    #[must_use]
    pub fn apply<T: Listable>(&self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}
