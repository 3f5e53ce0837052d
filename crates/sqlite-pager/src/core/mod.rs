pub mod calculator;
pub mod connection;
pub mod limits;
pub mod paginator;
pub mod query;
pub mod readonly;
pub mod schema;
pub mod sqlite;
pub mod types;
