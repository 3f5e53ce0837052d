//! Offset/limit pagination over SQLite result sets.
//!
//! [`Pager`] counts the matching rows, clamps the requested page size to its
//! bounds, rejects pages past the end and only then asks the data source for
//! the bounded slice. Data sources implement [`PageSource`] or
//! [`RawExecutor`]; [`SqlitePager`] wires both up for a `rusqlite` connection.

pub mod core;
pub mod error;

pub use crate::core::{
    calculator::PageCalculator,
    connection::{ConnectionManager, WorkerHandle},
    limits::{PageBounds, PagerOptions, DEFAULT_LOWER_LIMIT, DEFAULT_UPPER_LIMIT},
    paginator::{PageSource, Pager, RawExecutor},
    query::RawQuery,
    sqlite::{Order, SqlitePager, SqliteSource, TableQuery},
    types::{DbRow, Page, PageRequest, Window},
};
pub use crate::error::{AppError, AppResult};
