use std::path::PathBuf;

use serde::de::DeserializeOwned;
use sqlite_pager::{AppError, AppResult, ConnectionManager, PagerOptions, WorkerHandle};

use super::protocol::*;

pub struct BridgeHandler {
    cm: ConnectionManager,
    active_db: Option<PathBuf>,
}

impl BridgeHandler {
    pub fn new(options: PagerOptions) -> Self {
        Self {
            cm: ConnectionManager::new(options),
            active_db: None,
        }
    }

    pub async fn handle(&mut self, req: BridgeRequest) -> BridgeResponse<serde_json::Value> {
        if req.v != 1 {
            return BridgeResponse::err(
                req.v,
                req.id,
                "INVALID_REQUEST",
                format!("unsupported protocol version: {}", req.v),
            );
        }

        let res = match req.cmd.as_str() {
            "connect" => self.handle_connect(&req),
            "page" => self.handle_page(&req).await,
            "page_raw" => self.handle_page_raw(&req).await,
            other => Err(AppError::InvalidRequest(format!("unknown cmd: {other}"))),
        };
        match res {
            Ok(data) => BridgeResponse::ok(req.v, req.id, data),
            Err(e) => {
                tracing::debug!(id = %req.id, cmd = %req.cmd, code = e.code(), error = %e, "request failed");
                BridgeResponse::err(req.v, req.id, e.code(), e.to_string())
            }
        }
    }

    fn handle_connect(&mut self, req: &BridgeRequest) -> AppResult<serde_json::Value> {
        let p: ConnectPayload = payload(req)?;
        let path = PathBuf::from(p.path);
        self.cm.ensure_worker(&path)?;
        self.active_db = Some(path);
        Ok(serde_json::Value::Bool(true))
    }

    async fn handle_page(&mut self, req: &BridgeRequest) -> AppResult<serde_json::Value> {
        let p: PagePayload = payload(req)?;
        let worker = self.worker(p.path.clone())?;
        let page = worker.page(p.query()?, p.request()).await?;
        Ok(serde_json::to_value(page)?)
    }

    async fn handle_page_raw(&mut self, req: &BridgeRequest) -> AppResult<serde_json::Value> {
        let p: PageRawPayload = payload(req)?;
        let worker = self.worker(p.path.clone())?;
        let (count, rows) = p.queries()?;
        let page = worker.page_raw(count, rows, p.request()).await?;
        Ok(serde_json::to_value(page)?)
    }

    fn worker(&self, payload_path: Option<String>) -> AppResult<WorkerHandle> {
        let path = match payload_path {
            Some(p) => PathBuf::from(p),
            None => self.active_db.clone().ok_or_else(|| {
                AppError::InvalidRequest("no active db; call connect first or pass path".into())
            })?,
        };
        self.cm.ensure_worker(&path)
    }
}

fn payload<T: DeserializeOwned>(req: &BridgeRequest) -> AppResult<T> {
    serde_json::from_value(req.payload.clone()).map_err(|e| AppError::InvalidRequest(e.to_string()))
}
