use std::path::PathBuf;

use clap::Parser;
use sqlite_pager::{Order, PageRequest, PagerOptions, RawQuery, TableQuery};

#[derive(Parser, Debug, Clone)]
#[command(name = "sqlite-pager", about = "Offset/limit pagination over SQLite tables")]
pub struct Args {
    /// Serve NDJSON requests on stdio instead of answering one query.
    #[arg(long)]
    pub bridge: bool,

    /// Logging level (stderr). Also supports RUST_LOG.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Smallest page size served; 0 falls back to the default (10).
    #[arg(long, default_value_t = sqlite_pager::DEFAULT_LOWER_LIMIT)]
    pub lower_limit: u64,

    /// Largest page size served; 0 falls back to the default (100).
    #[arg(long, default_value_t = sqlite_pager::DEFAULT_UPPER_LIMIT)]
    pub upper_limit: u64,

    /// Database file.
    #[arg(long, required_unless_present = "bridge")]
    pub db: Option<PathBuf>,

    /// Table to page through.
    #[arg(long, conflicts_with_all = ["sql", "count_sql"])]
    pub table: Option<String>,

    /// WHERE fragment for --table, with `?` placeholders.
    #[arg(long, requires = "table")]
    pub filter: Option<String>,

    /// Value bound to the next `?` placeholder (repeatable, bound as text).
    #[arg(long = "param")]
    pub params: Vec<String>,

    /// Column to sort --table rows by.
    #[arg(long, requires = "table")]
    pub order_by: Option<String>,

    /// Sort descending.
    #[arg(long, requires = "order_by")]
    pub desc: bool,

    /// Row query to page through; must not carry its own LIMIT/OFFSET.
    #[arg(long, requires = "count_sql")]
    pub sql: Option<String>,

    /// Query returning the number of rows --sql yields.
    #[arg(long, requires = "sql")]
    pub count_sql: Option<String>,

    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: u64,

    /// Requested page size; clamped to the limits.
    #[arg(long, default_value_t = 0)]
    pub page_size: u64,
}

/// What a one-shot invocation asks for.
pub enum Target {
    Table(TableQuery),
    Raw { count: RawQuery, rows: RawQuery },
}

impl Args {
    pub fn options(&self) -> PagerOptions {
        PagerOptions {
            lower_limit: self.lower_limit,
            upper_limit: self.upper_limit,
        }
    }

    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    pub fn target(&self) -> Option<Target> {
        let params = || self.params.iter().cloned().map(rusqlite::types::Value::Text);
        if let Some(table) = &self.table {
            let mut q = TableQuery::new(table);
            if let Some(f) = &self.filter {
                q = q.filter(f);
            }
            for p in params() {
                q = q.bind(p);
            }
            if let Some(col) = &self.order_by {
                let order = if self.desc { Order::Desc } else { Order::Asc };
                q = q.order_by(col, order);
            }
            return Some(Target::Table(q));
        }
        match (&self.sql, &self.count_sql) {
            (Some(sql), Some(count_sql)) => Some(Target::Raw {
                count: RawQuery::with_params(count_sql.as_str(), params().collect()),
                rows: RawQuery::with_params(sql.as_str(), params().collect()),
            }),
            _ => None,
        }
    }
}
