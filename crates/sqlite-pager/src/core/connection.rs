use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    thread,
};

use rusqlite::{Connection, OpenFlags};
use tokio::sync::oneshot;

use crate::{
    core::{
        limits::PagerOptions,
        query::RawQuery,
        sqlite::{SqlitePager, TableQuery},
        types::{DbRow, Page, PageRequest},
    },
    error::{AppError, AppResult},
};

/// One worker thread per database file. Every worker pages with the same bounds.
///
/// Workers live as long as the manager; each distinct path keeps its thread.
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    inner: Arc<Mutex<HashMap<PathBuf, WorkerHandle>>>,
    busy_timeout_ms: u64,
    options: PagerOptions,
}

impl ConnectionManager {
    pub fn new(options: PagerOptions) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            busy_timeout_ms: 2_000,
            options,
        }
    }

    pub fn ensure_worker(&self, db_path: &Path) -> AppResult<WorkerHandle> {
        let db_path = absolute_path(db_path)?;
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| AppError::Internal("poisoned lock".into()))?;
        if let Some(h) = guard.get(&db_path) {
            return Ok(h.clone());
        }

        tracing::debug!(path = %db_path.display(), "spawning db worker");
        let h = WorkerHandle::spawn(db_path.clone(), self.busy_timeout_ms, self.options);
        guard.insert(db_path, h.clone());
        Ok(h)
    }
}

#[derive(Debug, Clone)]
pub struct WorkerHandle {
    tx: std::sync::mpsc::Sender<DbTask>,
    pub db_path: PathBuf,
}

impl WorkerHandle {
    fn spawn(db_path: PathBuf, busy_timeout_ms: u64, options: PagerOptions) -> Self {
        let (tx, rx) = std::sync::mpsc::channel::<DbTask>();
        let path_for_thread = db_path.clone();
        thread::spawn(move || db_worker_main(path_for_thread, busy_timeout_ms, options, rx));
        Self { tx, db_path }
    }

    pub async fn page(&self, query: TableQuery, request: PageRequest) -> AppResult<Page<DbRow>> {
        let (tx, rx) = oneshot::channel();
        self.send(DbTask::Page {
            query,
            request,
            respond_to: tx,
        })?;
        rx.await
            .map_err(|_| AppError::Internal("db worker dropped response".into()))?
    }

    pub async fn page_raw(
        &self,
        count_query: RawQuery,
        rows_query: RawQuery,
        request: PageRequest,
    ) -> AppResult<Page<DbRow>> {
        let (tx, rx) = oneshot::channel();
        self.send(DbTask::PageRaw {
            count_query,
            rows_query,
            request,
            respond_to: tx,
        })?;
        rx.await
            .map_err(|_| AppError::Internal("db worker dropped response".into()))?
    }

    fn send(&self, task: DbTask) -> AppResult<()> {
        self.tx
            .send(task)
            .map_err(|_| AppError::Internal("db worker unavailable".into()))
    }
}

enum DbTask {
    Page {
        query: TableQuery,
        request: PageRequest,
        respond_to: oneshot::Sender<AppResult<Page<DbRow>>>,
    },
    PageRaw {
        count_query: RawQuery,
        rows_query: RawQuery,
        request: PageRequest,
        respond_to: oneshot::Sender<AppResult<Page<DbRow>>>,
    },
}

impl DbTask {
    fn respond(self, res: AppResult<Page<DbRow>>) {
        let respond_to = match self {
            DbTask::Page { respond_to, .. } | DbTask::PageRaw { respond_to, .. } => respond_to,
        };
        let _ = respond_to.send(res);
    }
}

fn db_worker_main(
    db_path: PathBuf,
    busy_timeout_ms: u64,
    options: PagerOptions,
    rx: std::sync::mpsc::Receiver<DbTask>,
) {
    let conn = match open_conn(&db_path, busy_timeout_ms) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error=%e, path=%db_path.display(), "failed to open db in worker; dropping tasks");
            let reason = e.to_string();
            while let Ok(task) = rx.recv() {
                task.respond(Err(AppError::DbOpenFailed {
                    path: db_path.clone(),
                    reason: reason.clone(),
                }));
            }
            return;
        }
    };

    let pager = SqlitePager::new(&conn, options);
    while let Ok(task) = rx.recv() {
        match task {
            DbTask::Page {
                query,
                request,
                respond_to,
            } => {
                let res = pager.select_page(query, request);
                let _ = respond_to.send(res);
            }
            DbTask::PageRaw {
                count_query,
                rows_query,
                request,
                respond_to,
            } => {
                let res = pager.select_page_raw(&count_query, &rows_query, request);
                let _ = respond_to.send(res);
            }
        }
    }
}

pub fn open_conn(path: &Path, busy_timeout_ms: u64) -> AppResult<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE;
    let conn = Connection::open_with_flags(path, flags).map_err(|e| AppError::DbOpenFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let _ = conn.busy_timeout(std::time::Duration::from_millis(busy_timeout_ms));
    Ok(conn)
}

fn absolute_path(path: &Path) -> AppResult<PathBuf> {
    // The file may not exist yet, so canonicalize is not an option.
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let cwd = std::env::current_dir()?;
        Ok(cwd.join(path))
    }
}
