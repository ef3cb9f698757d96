use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::SortableProperty;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub country: Option<String>,
}

impl Company {
    pub const TABLE: &'static str = "companies";

    pub const SORTABLE: &'static [SortableProperty] = &[
        SortableProperty { property: "name", column: "name" },
        SortableProperty { property: "address", column: "address" },
        SortableProperty { property: "country", column: "country" },
    ];

    pub const DEFAULT_ORDER: &'static str = "name";

    /// Address and country joined by a single space, as exposed to clients.
    pub fn full_address(&self) -> String {
        match &self.country {
            Some(country) => format!("{} {}", self.address, country),
            None => format!("{} ", self.address),
        }
    }
}
