use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
    Between,
    In,
    /// Case-insensitive substring match on the lowercased column
    Contains,
}

/// Typed bind parameter. Postgres will not compare a text parameter
/// against a uuid column, so values carry their SQL type.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Uuid(Uuid),
    Int(i64),
    Text(String),
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        FilterValue::Uuid(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Int(value as i64)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

#[derive(Debug, Clone)]
pub struct FilterWhereInfo {
    pub column: String,
    pub operator: FilterOp,
    pub data: Vec<FilterValue>,
}

impl FilterWhereInfo {
    pub fn eq(column: &str, value: impl Into<FilterValue>) -> Self {
        Self { column: column.to_string(), operator: FilterOp::Eq, data: vec![value.into()] }
    }

    pub fn gte(column: &str, value: impl Into<FilterValue>) -> Self {
        Self { column: column.to_string(), operator: FilterOp::Gte, data: vec![value.into()] }
    }

    pub fn lte(column: &str, value: impl Into<FilterValue>) -> Self {
        Self { column: column.to_string(), operator: FilterOp::Lte, data: vec![value.into()] }
    }

    pub fn between(column: &str, low: impl Into<FilterValue>, high: impl Into<FilterValue>) -> Self {
        Self { column: column.to_string(), operator: FilterOp::Between, data: vec![low.into(), high.into()] }
    }

    pub fn in_list<V: Into<FilterValue>>(column: &str, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            column: column.to_string(),
            operator: FilterOp::In,
            data: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(column: &str, term: &str) -> Self {
        Self { column: column.to_string(), operator: FilterOp::Contains, data: vec![FilterValue::Text(term.to_string())] }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterData {
    pub select: Option<Vec<String>>,
    pub where_clause: Vec<FilterWhereInfo>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

/// A property exposed for ordering: the public (DTO) name and its column.
#[derive(Debug, Clone, Copy)]
pub struct SortableProperty {
    pub property: &'static str,
    pub column: &'static str,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<FilterValue>,
}
