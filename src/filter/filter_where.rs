use super::error::FilterError;
use super::types::{FilterOp, FilterValue, FilterWhereInfo};

pub struct FilterWhere {
    param_values: Vec<FilterValue>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Build the WHERE body (without the keyword) joined by AND.
    pub fn generate(conditions: &[FilterWhereInfo], starting_param_index: usize) -> Result<(String, Vec<FilterValue>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(conditions)
    }

    fn build(&mut self, conditions: &[FilterWhereInfo]) -> Result<(String, Vec<FilterValue>), FilterError> {
        let mut sql_conditions = vec![];
        for condition in conditions {
            Self::validate_column(&condition.column)?;
            sql_conditions.push(self.build_sql_condition(condition)?);
        }
        let where_clause = if sql_conditions.is_empty() { String::new() } else { sql_conditions.join(" AND ") };
        Ok((where_clause, std::mem::take(&mut self.param_values)))
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        let quoted_column = format!("\"{}\"", condition.column);
        let data = &condition.data;
        match condition.operator {
            FilterOp::Eq => Ok(format!("{} = {}", quoted_column, self.single(condition)?)),
            FilterOp::Gte => Ok(format!("{} >= {}", quoted_column, self.single(condition)?)),
            FilterOp::Lte => Ok(format!("{} <= {}", quoted_column, self.single(condition)?)),
            FilterOp::In => {
                if data.is_empty() { return Ok("1=0".to_string()); }
                let params: Vec<String> = data.iter().map(|v| self.param(v.clone())).collect();
                Ok(format!("{} IN ({})", quoted_column, params.join(", ")))
            }
            FilterOp::Between => {
                if data.len() != 2 {
                    return Err(FilterError::InvalidOperatorData("BETWEEN requires exactly 2 values".to_string()));
                }
                Ok(format!("{} BETWEEN {} AND {}", quoted_column, self.param(data[0].clone()), self.param(data[1].clone())))
            }
            FilterOp::Contains => {
                let term = match data.as_slice() {
                    [FilterValue::Text(t)] => t,
                    _ => return Err(FilterError::InvalidOperatorData("CONTAINS requires a single text value".to_string())),
                };
                let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
                Ok(format!("LOWER({}) LIKE {} ESCAPE '\\'", quoted_column, self.param(FilterValue::Text(pattern))))
            }
        }
    }

    fn single(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        match condition.data.as_slice() {
            [value] => Ok(self.param(value.clone())),
            _ => Err(FilterError::InvalidOperatorData(format!(
                "{:?} on '{}' requires exactly one value",
                condition.operator, condition.column
            ))),
        }
    }

    fn param(&mut self, value: FilterValue) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }

    pub(crate) fn validate_column(column: &str) -> Result<(), FilterError> {
        let mut chars = column.chars();
        let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !column.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", column)));
        }
        Ok(())
    }
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
