//! SQL rendering of search predicates.
//!
//! Produces a single `SELECT data FROM <table> ...` statement plus its bind
//! values. Every user-supplied value goes through a `$n` placeholder; the only
//! interpolated identifiers are the validated table name and fixed column names.

use super::schema::TableName;
use crate::search::{Clause, FilterValue, Op, Predicate};

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Int(i32),
    BigInt(i64),
}

fn push_bind(bind_params: &mut Vec<BindValue>, value: BindValue) -> usize {
    bind_params.push(value);
    bind_params.len()
}

pub struct QueryBuilder<'a> {
    table: &'a TableName,
    predicate: &'a Predicate,
    limit: u32,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(table: &'a TableName, predicate: &'a Predicate, limit: u32) -> Self {
        Self {
            table,
            predicate,
            limit,
        }
    }

    /// Render the search statement.
    ///
    /// Rows come back ordered by `level_min` descending (rows without a level
    /// last), then canonical name ascending, then id as a final tie-break.
    pub fn build_sql(&self) -> (String, Vec<BindValue>) {
        let mut bind_params = Vec::new();
        let mut sql = format!("SELECT data FROM {}", self.table);

        let conditions: Vec<String> = self
            .predicate
            .clauses()
            .iter()
            .map(|clause| build_clause(clause, &mut bind_params))
            .collect();

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        sql.push_str(" ORDER BY level_min DESC NULLS LAST, pokemon_name ASC, id ASC");

        let limit_idx = push_bind(&mut bind_params, BindValue::BigInt(i64::from(self.limit)));
        sql.push_str(&format!(" LIMIT ${}", limit_idx));

        (sql, bind_params)
    }
}

fn build_clause(clause: &Clause, bind_params: &mut Vec<BindValue>) -> String {
    let column = clause.field.column();
    match (clause.op, &clause.value) {
        (Op::Contains, value) => {
            // The name column holds the lower-cased canonical name, so lowering
            // the needle is enough for case-insensitive matching.
            let needle = value_as_text(value).to_lowercase();
            let idx = push_bind(
                bind_params,
                BindValue::Text(format!("%{}%", escape_like_pattern(&needle))),
            );
            format!("{} LIKE ${} ESCAPE E'\\\\'", column, idx)
        }
        (Op::Has, value) => {
            let idx = push_bind(bind_params, BindValue::Text(value_as_text(value)));
            format!("{} @> ARRAY[${}]::varchar[]", column, idx)
        }
        (Op::Eq, FilterValue::Text(v)) => {
            let idx = push_bind(bind_params, BindValue::Text(v.clone()));
            format!("{} = ${}", column, idx)
        }
        (Op::Eq, FilterValue::Int(v)) => {
            let idx = push_bind(bind_params, BindValue::Int(*v));
            format!("{} = ${}", column, idx)
        }
    }
}

fn value_as_text(value: &FilterValue) -> String {
    match value {
        FilterValue::Text(v) => v.clone(),
        FilterValue::Int(v) => v.to_string(),
    }
}

fn escape_like_pattern(s: &str) -> String {
    // Escape SQL LIKE meta-characters so user input is treated literally.
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TableName {
        TableName::parse("spawns").unwrap()
    }

    #[test]
    fn match_all_has_no_where_clause() {
        let table = table();
        let predicate = Predicate::match_all();
        let (sql, binds) = QueryBuilder::new(&table, &predicate, 20).build_sql();
        assert_eq!(
            sql,
            "SELECT data FROM spawns ORDER BY level_min DESC NULLS LAST, pokemon_name ASC, id ASC LIMIT $1"
        );
        assert_eq!(binds, vec![BindValue::BigInt(20)]);
    }

    #[test]
    fn single_filter_constrains_only_that_column() {
        let table = table();
        let predicate = Predicate::match_all().and(Clause::bucket_eq("rare"));
        let (sql, binds) = QueryBuilder::new(&table, &predicate, 20).build_sql();
        assert!(sql.contains(" WHERE bucket = $1 ORDER BY"), "{sql}");
        assert!(!sql.contains("generation ="));
        assert!(!sql.contains("features @>"));
        assert_eq!(
            binds,
            vec![BindValue::Text("rare".into()), BindValue::BigInt(20)]
        );
    }

    #[test]
    fn all_filters_are_anded() {
        let table = table();
        let predicate = Predicate::match_all()
            .and(Clause::name_contains("Bulba"))
            .and(Clause::has_feature("type_grass"))
            .and(Clause::bucket_eq("common"))
            .and(Clause::generation_eq(1));
        let (sql, binds) = QueryBuilder::new(&table, &predicate, 5).build_sql();

        assert!(sql.contains(
            "WHERE pokemon_name LIKE $1 ESCAPE E'\\\\' AND features @> ARRAY[$2]::varchar[] AND bucket = $3 AND generation = $4"
        ), "{sql}");
        assert!(!sql.contains(" OR "));
        assert!(sql.ends_with("LIMIT $5"));
        assert_eq!(
            binds,
            vec![
                BindValue::Text("%bulba%".into()),
                BindValue::Text("type_grass".into()),
                BindValue::Text("common".into()),
                BindValue::Int(1),
                BindValue::BigInt(5),
            ]
        );
    }

    #[test]
    fn values_are_never_interpolated() {
        let table = table();
        let hostile = "x' OR '1'='1";
        let predicate = Predicate::match_all()
            .and(Clause::bucket_eq(hostile))
            .and(Clause::has_feature(hostile));
        let (sql, _) = QueryBuilder::new(&table, &predicate, 20).build_sql();
        assert!(!sql.contains(hostile));
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like_pattern("50%_off\\"), "50\\%\\_off\\\\");

        let table = table();
        let predicate = Predicate::match_all().and(Clause::name_contains("mr_%"));
        let (_, binds) = QueryBuilder::new(&table, &predicate, 20).build_sql();
        assert_eq!(binds[0], BindValue::Text("%mr\\_\\%%".into()));
    }
}
