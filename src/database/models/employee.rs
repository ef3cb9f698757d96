use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::SortableProperty;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub position: String,
    pub company_id: Uuid,
}

impl Employee {
    pub const TABLE: &'static str = "employees";

    /// Properties clients may order employee listings by.
    pub const SORTABLE: &'static [SortableProperty] = &[
        SortableProperty { property: "id", column: "id" },
        SortableProperty { property: "name", column: "name" },
        SortableProperty { property: "age", column: "age" },
        SortableProperty { property: "position", column: "position" },
        SortableProperty { property: "companyId", column: "company_id" },
    ];

    pub const DEFAULT_ORDER: &'static str = "name";
}
