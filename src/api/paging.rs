use serde::{Deserialize, Serialize};

use crate::config::PagingConfig;

/// Paging, ordering and shaping options common to collection endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParameters {
    pub page_number: u32,
    pub page_size: u32,
    pub order_by: Option<String>,
    pub fields: Option<String>,
}

impl RequestParameters {
    /// Clamp raw query values to the configured paging bounds.
    pub fn new(page_number: Option<u32>, page_size: Option<u32>, paging: &PagingConfig) -> Self {
        let page_number = page_number.unwrap_or(1).max(1);
        let page_size = match page_size {
            Some(size) if size >= 1 => size.min(paging.max_page_size),
            _ => paging.default_page_size,
        };
        Self { page_number, page_size, order_by: None, fields: None }
    }

    pub fn skip(&self) -> i64 {
        (self.page_number as i64 - 1) * self.page_size as i64
    }
}

/// Query string accepted by the employee listing.
///
/// Both camelCase and all-lowercase spellings bind.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeQuery {
    #[serde(alias = "pagenumber", alias = "PageNumber")]
    pub page_number: Option<u32>,
    #[serde(alias = "pagesize", alias = "PageSize")]
    pub page_size: Option<u32>,
    #[serde(alias = "orderby", alias = "OrderBy")]
    pub order_by: Option<String>,
    #[serde(alias = "Fields")]
    pub fields: Option<String>,
    #[serde(alias = "minage", alias = "MinAge")]
    pub min_age: Option<u32>,
    #[serde(alias = "maxage", alias = "MaxAge")]
    pub max_age: Option<u32>,
    #[serde(alias = "searchterm", alias = "SearchTerm")]
    pub search_term: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeParameters {
    pub request: RequestParameters,
    pub min_age: u32,
    pub max_age: u32,
    pub search_term: Option<String>,
}

impl EmployeeParameters {
    pub fn from_query(query: EmployeeQuery, paging: &PagingConfig) -> Self {
        let mut request = RequestParameters::new(query.page_number, query.page_size, paging);
        request.order_by = Some(non_blank(query.order_by).unwrap_or_else(|| "name".to_string()));
        request.fields = non_blank(query.fields);

        Self {
            request,
            min_age: query.min_age.unwrap_or(0),
            max_age: query.max_age.unwrap_or(i32::MAX as u32),
            search_term: non_blank(query.search_term),
        }
    }

    pub fn valid_age_range(&self) -> bool {
        self.max_age > self.min_age
    }

    /// Age bounds as stored in the `age` column.
    pub fn age_bounds(&self) -> (i32, i32) {
        let clamp = |v: u32| v.min(i32::MAX as u32) as i32;
        (clamp(self.min_age), clamp(self.max_age))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Paging summary sent to clients in the `X-Pagination` header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl MetaData {
    pub fn new(count: i64, page_number: u32, page_size: u32) -> Self {
        let size = page_size.max(1) as i64;
        let total_pages = ((count.max(0) + size - 1) / size) as u32;
        Self {
            current_page: page_number,
            total_pages,
            page_size,
            total_count: count,
            has_previous: page_number > 1,
            has_next: page_number < total_pages,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub meta_data: MetaData,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, count: i64, page_number: u32, page_size: u32) -> Self {
        Self { items, meta_data: MetaData::new(count, page_number, page_size) }
    }

    /// Slice a fully materialised source into one page.
    pub fn to_paged_list(source: Vec<T>, page_number: u32, page_size: u32) -> Self {
        let count = source.len() as i64;
        let skip = (page_number.max(1) as usize - 1) * page_size as usize;
        let items = source.into_iter().skip(skip).take(page_size as usize).collect();
        Self::new(items, count, page_number, page_size)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList { items: self.items.into_iter().map(f).collect(), meta_data: self.meta_data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn paging() -> PagingConfig {
        AppConfig::development().paging
    }

    #[test]
    fn page_size_is_capped_and_page_number_clamped() {
        let query = EmployeeQuery { page_number: Some(0), page_size: Some(500), ..Default::default() };
        let params = EmployeeParameters::from_query(query, &paging());
        assert_eq!(params.request.page_number, 1);
        assert_eq!(params.request.page_size, 50);

        let query = EmployeeQuery { page_size: Some(0), ..Default::default() };
        let params = EmployeeParameters::from_query(query, &paging());
        assert_eq!(params.request.page_size, 10);
    }

    #[test]
    fn defaults_order_by_name_and_full_age_range() {
        let params = EmployeeParameters::from_query(EmployeeQuery::default(), &paging());
        assert_eq!(params.request.order_by.as_deref(), Some("name"));
        assert_eq!(params.age_bounds(), (0, i32::MAX));
        assert!(params.valid_age_range());
        assert_eq!(params.request.fields, None);
    }

    #[test]
    fn rejects_inverted_age_range() {
        let query = EmployeeQuery { min_age: Some(40), max_age: Some(30), ..Default::default() };
        assert!(!EmployeeParameters::from_query(query, &paging()).valid_age_range());
    }

    #[test]
    fn metadata_counts_pages() {
        let meta = MetaData::new(7, 2, 3);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_previous);
        assert!(meta.has_next);

        let last = MetaData::new(7, 3, 3);
        assert!(!last.has_next);

        let empty = MetaData::new(0, 1, 10);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_previous && !empty.has_next);
    }

    #[test]
    fn metadata_serializes_camel_case() {
        let json = serde_json::to_value(MetaData::new(3, 1, 2)).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["totalCount"], 3);
        assert_eq!(json["hasNext"], true);
    }

    #[test]
    fn to_paged_list_slices_source() {
        let page = PagedList::to_paged_list((1..=5).collect::<Vec<_>>(), 2, 2);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.meta_data.total_count, 5);
        assert_eq!(page.meta_data.total_pages, 3);
    }
}
