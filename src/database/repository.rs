use sqlx::{self, postgres::PgRow, FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::filter::{FilterData, FilterWhereInfo, SortableProperty};

/// Table-scoped read access shared by the concrete repositories
pub struct Repository<T> {
    table_name: &'static str,
    sortable: &'static [SortableProperty],
    default_order: &'static str,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            table_name: self.table_name,
            sortable: self.sortable,
            default_order: self.default_order,
            pool: self.pool.clone(),
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, pool: PgPool) -> Self {
        Self {
            table_name,
            sortable: &[],
            default_order: "",
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn with_sortable(mut self, sortable: &'static [SortableProperty], default_order: &'static str) -> Self {
        self.sortable = sortable;
        self.default_order = default_order;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn builder(&self) -> Result<QueryBuilder<T>, DatabaseError> {
        Ok(QueryBuilder::<T>::new(self.table_name)?.sortable(self.sortable, self.default_order))
    }

    pub async fn select_any(&self, filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        self.builder()?
            .filter(filter_data)?
            .select_all(&self.pool)
            .await
    }

    pub async fn select_one(&self, filter_data: FilterData) -> Result<Option<T>, DatabaseError> {
        self.builder()?
            .filter(filter_data)?
            .select_optional(&self.pool)
            .await
    }

    pub async fn count(&self, filter_data: FilterData) -> Result<i64, DatabaseError> {
        self.builder()?
            .filter(filter_data)?
            .count(&self.pool)
            .await
    }

    pub async fn select_ids(&self, ids: &[Uuid]) -> Result<Vec<T>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let filter = FilterData {
            where_clause: vec![FilterWhereInfo::in_list("id", ids.iter().copied())],
            ..Default::default()
        };
        self.select_any(filter).await
    }
}
