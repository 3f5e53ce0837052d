use serde::{Deserialize, Serialize};
use sqlite_pager::{AppError, AppResult, Order, PageRequest, RawQuery, TableQuery};

use sqlite_pager::core::query::json_to_sql;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BridgeRequest {
    pub v: u32,
    pub id: String,
    pub cmd: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct BridgeResponse<T> {
    pub v: u32,
    pub id: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl<T> BridgeResponse<T> {
    pub fn ok(v: u32, id: String, data: T) -> Self {
        Self {
            v,
            id,
            status: "ok",
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn err(v: u32, id: String, code: &'static str, error: String) -> Self {
        Self {
            v,
            id,
            status: "error",
            data: None,
            error: Some(error),
            code: Some(code),
        }
    }
}

// Payloads

#[derive(Debug, Deserialize)]
pub struct ConnectPayload {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct PagePayload {
    pub table: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub params: Vec<serde_json::Value>,
    #[serde(default)]
    pub order_by: Option<String>,
    #[serde(default)]
    pub desc: bool,
    pub page: u64,
    #[serde(default)]
    pub page_size: u64,
}

#[derive(Debug, Deserialize)]
pub struct PageRawPayload {
    pub sql: String,
    pub count_sql: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub params: Vec<serde_json::Value>,
    /// Defaults to `params` when absent.
    #[serde(default)]
    pub count_params: Option<Vec<serde_json::Value>>,
    pub page: u64,
    #[serde(default)]
    pub page_size: u64,
}

impl PagePayload {
    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    pub fn query(&self) -> AppResult<TableQuery> {
        let mut q = TableQuery::new(self.table.as_str());
        if let Some(f) = &self.filter {
            q = q.filter(f.as_str());
        }
        for p in sql_params(&self.params)? {
            q = q.bind(p);
        }
        if let Some(col) = &self.order_by {
            let order = if self.desc { Order::Desc } else { Order::Asc };
            q = q.order_by(col.as_str(), order);
        }
        Ok(q)
    }
}

impl PageRawPayload {
    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    pub fn queries(&self) -> AppResult<(RawQuery, RawQuery)> {
        let params = sql_params(&self.params)?;
        let count_params = match &self.count_params {
            Some(p) => sql_params(p)?,
            None => params.clone(),
        };
        Ok((
            RawQuery::with_params(self.count_sql.as_str(), count_params),
            RawQuery::with_params(self.sql.as_str(), params),
        ))
    }
}

fn sql_params(values: &[serde_json::Value]) -> AppResult<Vec<rusqlite::types::Value>> {
    values
        .iter()
        .map(|v| {
            json_to_sql(v).ok_or_else(|| {
                AppError::InvalidRequest(format!("unsupported parameter (not a scalar): {v}"))
            })
        })
        .collect()
}
