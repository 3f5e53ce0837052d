use rusqlite::Connection;

use crate::error::{AppError, AppResult};

pub fn is_sql_readonly(conn: &Connection, sql: &str) -> AppResult<bool> {
    let stmt = conn.prepare(sql)?;
    Ok(stmt.readonly())
}

/// Raw templates are paged by re-running them; anything that writes is refused.
pub fn ensure_readonly(conn: &Connection, sql: &str) -> AppResult<()> {
    if is_sql_readonly(conn, sql)? {
        Ok(())
    } else {
        Err(AppError::NotReadonly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_is_readonly_and_delete_is_not() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();
        assert!(ensure_readonly(&conn, "SELECT * FROM t").is_ok());
        assert!(matches!(
            ensure_readonly(&conn, "DELETE FROM t"),
            Err(AppError::NotReadonly)
        ));
    }
}
