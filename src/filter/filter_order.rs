use super::types::{FilterOrderInfo, SortDirection, SortableProperty};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse an order string such as `"name,age desc"`.
    ///
    /// Each comma-separated part names a property (matched case-insensitively
    /// against `sortable`) optionally followed by a direction. Parts naming an
    /// unknown property are skipped. Only a trailing `" desc"` makes the part
    /// descending.
    pub fn parse(order: &str, sortable: &[SortableProperty]) -> Vec<FilterOrderInfo> {
        let mut out = Vec::new();
        for part in order.trim().split(',') {
            if part.trim().is_empty() {
                continue;
            }
            let Some(name) = part.split_whitespace().next() else { continue };

            let Some(property) = sortable.iter().find(|p| p.property.eq_ignore_ascii_case(name)) else {
                tracing::debug!("Ignoring unknown order property '{}'", name);
                continue;
            };

            let sort = if part.ends_with(" desc") { SortDirection::Desc } else { SortDirection::Asc };
            out.push(FilterOrderInfo { column: property.column.to_string(), sort });
        }
        out
    }

    /// Parse `order`, falling back to `default` when nothing usable remains.
    pub fn parse_or_default(order: Option<&str>, sortable: &[SortableProperty], default: &str) -> Vec<FilterOrderInfo> {
        let parsed = order.map(|o| Self::parse(o, sortable)).unwrap_or_default();
        if parsed.is_empty() {
            Self::parse(default, sortable)
        } else {
            parsed
        }
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() { return String::new(); }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}
