use std::io::Write;

use sqlite_pager::{core::connection::open_conn, AppError, AppResult, SqlitePager};

use crate::cli::{Args, Target};

/// Answers the query described on the command line with a single JSON line.
pub fn run(args: Args) -> AppResult<()> {
    let db = args
        .db
        .as_deref()
        .ok_or_else(|| AppError::InvalidRequest("--db is required".into()))?;
    let target = args.target().ok_or_else(|| {
        AppError::InvalidRequest("pass --table, or --sql together with --count-sql".into())
    })?;

    let conn = open_conn(db, 2_000)?;
    let pager = SqlitePager::new(&conn, args.options());
    tracing::info!(
        db = %db.display(),
        page = args.page,
        page_size = args.page_size,
        lower_limit = pager.pager().bounds().lower_limit(),
        upper_limit = pager.pager().bounds().upper_limit(),
        "selecting page"
    );

    let page = match target {
        Target::Table(query) => pager.select_page(query, args.request())?,
        Target::Raw { count, rows } => pager.select_page_raw(&count, &rows, args.request())?,
    };

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, &page)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}
