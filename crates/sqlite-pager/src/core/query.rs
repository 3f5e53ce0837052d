use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rusqlite::{params_from_iter, types::Value, types::ValueRef, Connection, Row};

use crate::core::{
    paginator::RawExecutor,
    types::{DbRow, Window},
};

/// SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuery {
    sql: String,
    params: Vec<Value>,
}

impl RawQuery {
    pub fn new(sql: impl Into<String>) -> Self {
        let sql: String = sql.into();
        Self {
            sql: sql.trim_end().trim_end_matches(';').trim_end().to_string(),
            params: Vec::new(),
        }
    }

    pub fn with_params(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            params,
            ..Self::new(sql)
        }
    }

    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Wraps the query as a subquery bounded by `window`. Limit and offset are
    /// bound as the last two parameters. The closing paren goes on its own line
    /// so a trailing `--` comment in the template cannot swallow it.
    pub fn paged(&self, window: Window) -> RawQuery {
        let mut params = self.params.clone();
        params.push(Value::Integer(sql_int(window.limit)));
        params.push(Value::Integer(sql_int(window.offset)));
        RawQuery {
            sql: format!("SELECT * FROM ({}\n) LIMIT ? OFFSET ?", self.sql),
            params,
        }
    }
}

/// SQLite integers are signed; anything larger saturates.
pub(crate) fn sql_int(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl RawExecutor for Connection {
    type Row = DbRow;
    type Error = rusqlite::Error;

    fn scalar(&self, query: &RawQuery) -> Result<u64, rusqlite::Error> {
        let mut stmt = self.prepare(query.sql())?;
        let mut rows = stmt.query(params_from_iter(query.params()))?;
        let Some(row) = rows.next()? else {
            return Ok(0);
        };
        let n: i64 = row.get(0)?;
        u64::try_from(n).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, n))
    }

    fn rows(&self, query: &RawQuery) -> Result<Vec<DbRow>, rusqlite::Error> {
        run_rows(self, query.sql(), query.params())
    }
}

pub(crate) fn run_rows(
    conn: &Connection,
    sql: &str,
    params: &[Value],
) -> Result<Vec<DbRow>, rusqlite::Error> {
    let mut stmt = conn.prepare(sql)?;
    let col_names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    let mut out = Vec::new();
    let mut r = stmt.query(params_from_iter(params))?;
    while let Some(row) = r.next()? {
        out.push(row_to_json_object(row, &col_names)?);
    }
    Ok(out)
}

fn row_to_json_object(row: &Row<'_>, col_names: &[String]) -> Result<DbRow, rusqlite::Error> {
    let mut out = HashMap::with_capacity(col_names.len());
    for (i, name) in col_names.iter().enumerate() {
        let v = match row.get_ref(i)? {
            ValueRef::Null => serde_json::Value::Null,
            ValueRef::Integer(x) => serde_json::Value::from(x),
            ValueRef::Real(x) => serde_json::Value::from(x),
            ValueRef::Text(t) => serde_json::Value::from(String::from_utf8_lossy(t).to_string()),
            ValueRef::Blob(b) => serde_json::json!({
                "$type": "blob",
                "base64": BASE64.encode(b),
                "size": b.len()
            }),
        };
        out.insert(name.clone(), v);
    }
    Ok(out)
}

/// Converts a JSON scalar into a bindable SQLite value.
pub fn json_to_sql(v: &serde_json::Value) -> Option<Value> {
    match v {
        serde_json::Value::Null => Some(Value::Null),
        serde_json::Value::Bool(b) => Some(Value::Integer(i64::from(*b))),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::Integer)
            .or_else(|| n.as_f64().map(Value::Real)),
        serde_json::Value::String(s) => Some(Value::Text(s.clone())),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT, payload BLOB);
             INSERT INTO items (name, payload) VALUES ('a', x'00ff'), ('b', NULL), ('c', NULL);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn new_trims_trailing_semicolon() {
        assert_eq!(RawQuery::new("SELECT 1 ; \n").sql(), "SELECT 1");
    }

    #[test]
    fn paged_appends_limit_then_offset() {
        let q = RawQuery::new("SELECT * FROM items WHERE id > ?")
            .bind(0)
            .paged(Window {
                offset: 20,
                limit: 10,
            });
        assert_eq!(
            q.sql(),
            "SELECT * FROM (SELECT * FROM items WHERE id > ?\n) LIMIT ? OFFSET ?"
        );
        assert_eq!(
            q.params(),
            &[Value::Integer(0), Value::Integer(10), Value::Integer(20)]
        );
    }

    #[test]
    fn scalar_reads_first_column() {
        let conn = conn();
        let n = conn
            .scalar(&RawQuery::new("SELECT COUNT(*) FROM items WHERE name <> ?").bind("a".to_string()))
            .unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn scalar_without_rows_is_zero() {
        let conn = conn();
        let n = conn
            .scalar(&RawQuery::new("SELECT id FROM items WHERE id < 0"))
            .unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn scalar_rejects_negative_counts() {
        let conn = conn();
        assert!(conn.scalar(&RawQuery::new("SELECT -1")).is_err());
    }

    #[test]
    fn rows_decode_blobs_as_base64() {
        let conn = conn();
        let rows = conn
            .rows(&RawQuery::new("SELECT * FROM items ORDER BY id"))
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["name"], serde_json::json!("a"));
        assert_eq!(rows[0]["payload"]["base64"], serde_json::json!("AP8="));
        assert_eq!(rows[0]["payload"]["size"], serde_json::json!(2));
        assert_eq!(rows[1]["payload"], serde_json::Value::Null);
    }

    #[test]
    fn paged_template_may_end_in_line_comment() {
        let conn = conn();
        let q = RawQuery::new("SELECT name FROM items ORDER BY id DESC -- newest first").paged(
            Window {
                offset: 1,
                limit: 1,
            },
        );
        let rows = conn.rows(&q).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], serde_json::json!("b"));
    }

    #[test]
    fn json_scalars_convert() {
        assert_eq!(json_to_sql(&serde_json::json!(3)), Some(Value::Integer(3)));
        assert_eq!(json_to_sql(&serde_json::json!(1.5)), Some(Value::Real(1.5)));
        assert_eq!(json_to_sql(&serde_json::json!(true)), Some(Value::Integer(1)));
        assert_eq!(
            json_to_sql(&serde_json::json!("x")),
            Some(Value::Text("x".into()))
        );
        assert_eq!(json_to_sql(&serde_json::json!([1])), None);
    }
}
