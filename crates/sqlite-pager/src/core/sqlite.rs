use rusqlite::{types::Value, Connection};
use serde::Deserialize;

use crate::{
    core::{
        calculator::check_request,
        limits::PagerOptions,
        paginator::{PageSource, Pager, RawExecutor},
        query::{run_rows, sql_int, RawQuery},
        readonly::ensure_readonly,
        schema::{is_safe_identifier, is_safe_table_ref},
        types::{DbRow, Page, PageRequest, Window},
    },
    error::{AppError, AppResult},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    fn keyword(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// Rows of one table, optionally narrowed by a `WHERE` fragment with `?`
/// placeholders and sorted by one column.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    table: String,
    filter: Option<String>,
    params: Vec<Value>,
    order_by: Option<(String, Order)>,
}

impl TableQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filter: None,
            params: Vec::new(),
            order_by: None,
        }
    }

    pub fn filter(mut self, fragment: impl Into<String>) -> Self {
        self.filter = Some(fragment.into());
        self
    }

    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, order: Order) -> Self {
        self.order_by = Some((column.into(), order));
        self
    }

    fn validate(&self) -> AppResult<()> {
        if !is_safe_table_ref(&self.table) {
            return Err(AppError::InvalidRequest(format!(
                "invalid table identifier: {}",
                self.table
            )));
        }
        if let Some((column, _)) = &self.order_by {
            if !is_safe_identifier(column) {
                return Err(AppError::InvalidRequest(format!(
                    "invalid order_by column: {column}"
                )));
            }
        }
        Ok(())
    }

    fn where_clause(&self) -> String {
        match self.filter.as_deref().map(str::trim) {
            Some(f) if !f.is_empty() => format!(" WHERE {f}"),
            _ => String::new(),
        }
    }

    fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM {}{}", self.table, self.where_clause())
    }

    fn select_sql(&self) -> String {
        let order = match &self.order_by {
            Some((column, order)) => format!(" ORDER BY {column} {}", order.keyword()),
            None => String::new(),
        };
        format!(
            "SELECT * FROM {}{}{order} LIMIT ? OFFSET ?",
            self.table,
            self.where_clause()
        )
    }
}

/// A [`TableQuery`] bound to a connection.
pub struct SqliteSource<'c> {
    conn: &'c Connection,
    query: TableQuery,
}

impl<'c> SqliteSource<'c> {
    pub fn new(conn: &'c Connection, query: TableQuery) -> AppResult<Self> {
        query.validate()?;
        Ok(Self { conn, query })
    }
}

impl PageSource for SqliteSource<'_> {
    type Item = DbRow;
    type Error = rusqlite::Error;

    fn count(&self) -> Result<u64, rusqlite::Error> {
        self.conn.scalar(&RawQuery::with_params(
            self.query.count_sql(),
            self.query.params.clone(),
        ))
    }

    fn fetch(&self, window: Window) -> Result<Vec<DbRow>, rusqlite::Error> {
        let mut params = self.query.params.clone();
        params.push(Value::Integer(sql_int(window.limit)));
        params.push(Value::Integer(sql_int(window.offset)));
        run_rows(self.conn, &self.query.select_sql(), &params)
    }
}

/// A [`Pager`] paired with the connection it reads from.
pub struct SqlitePager<'c> {
    conn: &'c Connection,
    pager: Pager,
}

impl<'c> SqlitePager<'c> {
    pub fn new(conn: &'c Connection, options: PagerOptions) -> Self {
        Self {
            conn,
            pager: Pager::with_options(options),
        }
    }

    pub fn pager(&self) -> Pager {
        self.pager
    }

    pub fn select_page(&self, query: TableQuery, request: PageRequest) -> AppResult<Page<DbRow>> {
        let source = SqliteSource::new(self.conn, query)?;
        self.pager.select_page(&source, request)
    }

    pub fn select_page_raw(
        &self,
        count_query: &RawQuery,
        rows_query: &RawQuery,
        request: PageRequest,
    ) -> AppResult<Page<DbRow>> {
        check_request(request)?;
        ensure_readonly(self.conn, count_query.sql())?;
        ensure_readonly(self.conn, rows_query.sql())?;
        self.pager
            .select_page_raw(self.conn, count_query, rows_query, request)
    }
}
