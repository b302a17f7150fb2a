//! BDD test world for the dashboard client

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cucumber::World;
use serde_json::Value;

use vayu_dashboard::io::{HttpClient, HttpResponse};
use vayu_dashboard::{ControlStatus, DashboardClient, DashboardError, DashboardView, FallbackPolicy};

pub const BASE_URL: &str = "http://backend.test";
pub const LOGS_PATH: &str = "/api/v1/dashboard/blockchain/logs";
pub const CONTROL_STATUS_PREFIX: &str = "/api/v1/control/status/";
pub const OVERRIDE_PATH: &str = "/api/v1/control/override";

/// Canned answer for one path
#[derive(Debug, Clone)]
pub enum Reply {
    Json(u16, String),
    Refused,
}

/// In-memory stand-in for the backend
///
/// Plain routes answer with a fixed reply. The audit log honours `limit`
/// and the control endpoints keep override state.
#[derive(Debug)]
pub struct ScriptedHttp {
    pub routes: Mutex<HashMap<String, Reply>>,
    pub logs: Mutex<Vec<Value>>,
    pub automatic: Mutex<ControlStatus>,
    pub manual: Mutex<Option<ControlStatus>>,
    pub requests: Mutex<Vec<String>>,
}

impl Default for ScriptedHttp {
    fn default() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            logs: Mutex::new(Vec::new()),
            automatic: Mutex::new(ControlStatus::new(false, 0)),
            manual: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedHttp {
    pub fn route(&self, path: &str, reply: Reply) {
        self.routes.lock().unwrap().insert(path.to_string(), reply);
    }

    fn current_control(&self) -> ControlStatus {
        let manual = self.manual.lock().unwrap().clone();
        manual.unwrap_or_else(|| self.automatic.lock().unwrap().clone())
    }

    fn answer(
        &self,
        method: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> vayu_dashboard::Result<HttpResponse> {
        let path = url.strip_prefix(BASE_URL).unwrap_or(url).to_string();
        self.requests
            .lock()
            .unwrap()
            .push(format!("{} {}", method, path));

        let param = |key: &str| {
            query
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        };

        if let Some(reply) = self.routes.lock().unwrap().get(&path).cloned() {
            return match reply {
                Reply::Json(status, body) => Ok(HttpResponse { status, body }),
                Reply::Refused => Err(DashboardError::unavailable(url, "connection refused")),
            };
        }

        let json = |value: Value| {
            Ok(HttpResponse {
                status: 200,
                body: value.to_string(),
            })
        };

        match (method, path.as_str()) {
            ("GET", LOGS_PATH) => {
                let limit = param("limit")
                    .and_then(|l| l.parse::<usize>().ok())
                    .unwrap_or(20);
                let logs: Vec<Value> = self
                    .logs
                    .lock()
                    .unwrap()
                    .iter()
                    .take(limit)
                    .cloned()
                    .collect();
                json(serde_json::json!({ "logs": logs }))
            }
            ("GET", p) if p.starts_with(CONTROL_STATUS_PREFIX) => {
                json(serde_json::to_value(self.current_control()).unwrap())
            }
            ("POST", OVERRIDE_PATH) => {
                let status = ControlStatus::new(
                    param("fan_on").as_deref() == Some("true"),
                    param("fan_intensity")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0),
                );
                let body = serde_json::to_value(&status).unwrap();
                *self.manual.lock().unwrap() = Some(status);
                json(body)
            }
            ("DELETE", p) if p.starts_with(OVERRIDE_PATH) => {
                *self.manual.lock().unwrap() = None;
                json(serde_json::to_value(&*self.automatic.lock().unwrap()).unwrap())
            }
            _ => Ok(HttpResponse {
                status: 404,
                body: r#"{"detail": "Not Found"}"#.to_string(),
            }),
        }
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> vayu_dashboard::Result<HttpResponse> {
        self.answer("GET", url, query)
    }

    async fn post(&self, url: &str, query: &[(&str, &str)]) -> vayu_dashboard::Result<HttpResponse> {
        self.answer("POST", url, query)
    }

    async fn delete(&self, url: &str) -> vayu_dashboard::Result<HttpResponse> {
        self.answer("DELETE", url, &[])
    }
}

#[derive(Debug, Default, World)]
pub struct VayuWorld {
    pub http: Arc<ScriptedHttp>,
    pub fallback_policy: FallbackPolicy,

    // Aggregation
    pub composite_body: Option<Value>,
    pub view_result: Option<vayu_dashboard::Result<DashboardView>>,

    // Control
    pub control_before: Option<ControlStatus>,
    pub control_after: Option<ControlStatus>,
}

impl VayuWorld {
    pub fn client(&self) -> DashboardClient {
        let http: Arc<dyn HttpClient> = self.http.clone();
        DashboardClient::with_http(BASE_URL, http).with_fallback_policy(self.fallback_policy)
    }
}
