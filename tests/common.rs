// ABOUTME: Shared test fixtures: a scripted FitnessApi double, a fixed clock, and activity builders
// ABOUTME: Integration tests include this module to run tools and protocol requests without network access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(dead_code, missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use garmin_core::clock::FixedClock;
use garmin_core::constants::providers;
use garmin_mcp_server::config::ToolConfig;
use garmin_mcp_server::mcp::resources::ServerResources;
use garmin_mcp_server::tools::{ToolExecutionContext, ToolRegistry};
use garmin_providers::{ApiCall, FitnessApi, ProviderError};
use serde_json::{json, Value};

type Responder = Arc<dyn Fn(&ApiCall) -> Result<Value, ProviderError> + Send + Sync>;

/// Frozen "today" shared by every test: a Monday
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

pub fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

/// `FitnessApi` double answering by `ApiCall::method_name`
///
/// Unscripted methods answer `null`. Every call is recorded.
#[derive(Default)]
pub struct MockFitnessApi {
    responders: HashMap<&'static str, Responder>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockFitnessApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call to `method` with `value`
    pub fn respond(self, method: &'static str, value: Value) -> Self {
        self.respond_with(method, move |_| Ok(value.clone()))
    }

    /// Answer calls to `method` with a closure over the call
    pub fn respond_with<F>(mut self, method: &'static str, responder: F) -> Self
    where
        F: Fn(&ApiCall) -> Result<Value, ProviderError> + Send + Sync + 'static,
    {
        self.responders.insert(method, Arc::new(responder));
        self
    }

    /// Serve activity searches from a newest-first list, honoring offset and limit
    pub fn with_activities(self, activities: Vec<Value>) -> Self {
        self.respond_with("get_activities", move |call| match call {
            ApiCall::SearchActivities { start, limit, .. } => {
                let start = (*start as usize).min(activities.len());
                let end = (start + *limit as usize).min(activities.len());
                Ok(Value::Array(activities[start..end].to_vec()))
            }
            _ => Ok(Value::Null),
        })
    }

    /// Fail every call to `method` with a 404
    pub fn not_found(self, method: &'static str) -> Self {
        self.respond_with(method, move |call| {
            Err(ProviderError::NotFound {
                provider: providers::GARMIN.to_owned(),
                resource: call.resource_label(),
            })
        })
    }

    /// Fail every call to `method` with a generic API error
    pub fn api_error(self, method: &'static str, status: u16) -> Self {
        self.respond_with(method, move |_| {
            Err(ProviderError::Api {
                provider: providers::GARMIN.to_owned(),
                status,
                message: "upstream failure".to_owned(),
            })
        })
    }

    /// Fail every call to `method` with an authentication error
    pub fn unauthorized(self, method: &'static str) -> Self {
        self.respond_with(method, |_| {
            Err(ProviderError::Authentication {
                provider: providers::GARMIN.to_owned(),
                reason: "token expired".to_owned(),
            })
        })
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<ApiCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method_name() == method)
            .collect()
    }
}

#[async_trait]
impl FitnessApi for MockFitnessApi {
    async fn invoke(&self, call: ApiCall) -> Result<Value, ProviderError> {
        self.calls.lock().unwrap().push(call.clone());
        match self.responders.get(call.method_name()) {
            Some(responder) => responder(&call),
            None => Ok(Value::Null),
        }
    }
}

/// Context around `api` with default tool settings and the frozen clock
pub fn context(api: &Arc<MockFitnessApi>) -> ToolExecutionContext {
    let api: Arc<dyn FitnessApi> = api.clone();
    ToolExecutionContext::new(
        api,
        Arc::new(ToolConfig::default()),
        Arc::new(FixedClock::on_date(today())),
    )
}

/// Registry with every built-in tool
pub fn registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register_builtin_tools();
    registry
}

/// Full server state around `api`
pub fn server(api: &Arc<MockFitnessApi>) -> ServerResources {
    let api_handle: Arc<dyn FitnessApi> = api.clone();
    ServerResources::with_builtins(
        api_handle,
        Arc::new(ToolConfig::default()),
        Arc::new(FixedClock::on_date(today())),
    )
}

/// Run one tool and parse its envelope
pub async fn run_tool(api: &Arc<MockFitnessApi>, name: &str, args: Value) -> Value {
    let result = registry()
        .execute(name, args, &context(api))
        .await
        .expect("tool is registered");
    result.json().expect("envelope is JSON")
}

/// Raw Garmin activity as returned by the search endpoint
pub fn activity(id: u64, type_key: &str, distance: f64, duration: f64, start: &str) -> Value {
    json!({
        "activityId": id,
        "activityName": format!("{type_key} {id}"),
        "activityType": {"typeKey": type_key},
        "startTimeLocal": format!("{start} 07:00:00"),
        "distance": distance,
        "duration": duration,
        "movingDuration": duration,
        "elevationGain": 40.0,
        "averageSpeed": distance / duration,
        "averageHR": 148.0,
        "maxHR": 171.0,
        "calories": 420.0,
    })
}

/// `count` running activities, newest first, one per day ending today
pub fn recent_runs(count: u64) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let day = today() - Duration::days(i as i64);
            activity(
                1000 + count - i,
                "running",
                5000.0 + (i as f64) * 100.0,
                1500.0 + (i as f64) * 20.0,
                &day.to_string(),
            )
        })
        .collect()
}

/// Error kind of an error envelope, if it is one
pub fn error_kind(envelope: &Value) -> Option<&str> {
    envelope.pointer("/error/kind").and_then(Value::as_str)
}
