//! Test doubles shared by the use case tests.

use crate::ports::llm_gateway::{GatewayError, LlmGateway, ProviderStream};
use async_trait::async_trait;
use enzymeml_domain::{ModelRequest, PlanningResponse};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Gateway that answers from scripted queues and records every request.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    plans: Mutex<VecDeque<Result<PlanningResponse, GatewayError>>>,
    streams: Mutex<VecDeque<Result<ProviderStream, GatewayError>>>,
    plan_requests: Mutex<Vec<ModelRequest>>,
    stream_requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_plan(self, response: PlanningResponse) -> Self {
        self.plans.lock().unwrap().push_back(Ok(response));
        self
    }

    pub(crate) fn with_plan_error(self, error: GatewayError) -> Self {
        self.plans.lock().unwrap().push_back(Err(error));
        self
    }

    pub(crate) fn with_stream(self, stream: ProviderStream) -> Self {
        self.streams.lock().unwrap().push_back(Ok(stream));
        self
    }

    pub(crate) fn with_stream_error(self, error: GatewayError) -> Self {
        self.streams.lock().unwrap().push_back(Err(error));
        self
    }

    pub(crate) fn plan_requests(&self) -> Vec<ModelRequest> {
        self.plan_requests.lock().unwrap().clone()
    }

    pub(crate) fn stream_requests(&self) -> Vec<ModelRequest> {
        self.stream_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn plan(&self, request: ModelRequest) -> Result<PlanningResponse, GatewayError> {
        self.plan_requests.lock().unwrap().push(request);
        self.plans
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(PlanningResponse::from_text("(no more responses)")))
    }

    async fn stream(&self, request: ModelRequest) -> Result<ProviderStream, GatewayError> {
        self.stream_requests.lock().unwrap().push(request);
        self.streams
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ProviderStream::replay(Vec::new(), Ok(Value::Null))))
    }
}
