//! Extract Data use case
//!
//! Entry point of a structured extraction:
//!
//! 1. If declared tools are supplied, run the tool chain to enrich the
//!    conversation
//! 2. Send the (augmented) conversation as a streaming request, with the
//!    optional output schema bound under its name
//! 3. Return the aggregated stream

use crate::config::ChainConfig;
use crate::ports::chain_observer::ChainObserver;
use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::run_tool_chain::{ChainError, RunToolChainInput, RunToolChainUseCase};
use crate::use_cases::stream_aggregator::{AggregatedStream, aggregate};
use crate::use_cases::tool_registry::ToolRegistry;
use enzymeml_domain::{Conversation, JitterSource, Model, ModelRequest, OutputSchema};
use std::sync::Arc;
use tracing::info;

/// Input for the ExtractData use case
#[derive(Debug, Clone)]
pub struct ExtractDataInput {
    pub model: Model,
    pub conversation: Conversation,
    pub output_schema: Option<OutputSchema>,
    pub tools: Option<Arc<ToolRegistry>>,
    pub config: ChainConfig,
}

impl ExtractDataInput {
    pub fn new(model: Model, conversation: Conversation) -> Self {
        Self {
            model,
            conversation,
            output_schema: None,
            tools: None,
            config: ChainConfig::default(),
        }
    }

    pub fn with_output_schema(mut self, schema: OutputSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }

    pub fn with_tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_config(mut self, config: ChainConfig) -> Self {
        self.config = config;
        self
    }
}

/// Output of the ExtractData use case
#[derive(Debug)]
pub struct ExtractDataOutput {
    /// Conversation sent with the streaming request.
    pub conversation: Conversation,
    pub stream: AggregatedStream,
}

/// Use case for running a structured extraction
pub struct ExtractDataUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    chain: RunToolChainUseCase<G>,
}

impl<G: LlmGateway + 'static> ExtractDataUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            chain: RunToolChainUseCase::new(Arc::clone(&gateway)),
            gateway,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ChainObserver>) -> Self {
        self.chain = self.chain.with_observer(observer);
        self
    }

    pub fn with_jitter(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        self.chain = self.chain.with_jitter(jitter);
        self
    }

    pub async fn execute(&self, input: ExtractDataInput) -> Result<ExtractDataOutput, ChainError> {
        let ExtractDataInput {
            model,
            conversation,
            output_schema,
            tools,
            config,
        } = input;

        let conversation = match tools {
            Some(registry) if !registry.specs().is_empty() => {
                let chain_input = RunToolChainInput::new(model.clone(), conversation, registry)
                    .with_config(config);
                self.chain.execute(chain_input).await?
            }
            _ => conversation,
        };

        let mut request = ModelRequest::streaming(&model, &conversation);
        if let Some(schema) = output_schema {
            request = request.with_output_schema(schema);
        }
        info!(
            model = %model,
            conversation_len = conversation.len(),
            structured = request.output_schema.is_some(),
            "Starting streaming extraction"
        );

        let stream = self
            .gateway
            .stream(request)
            .await
            .map_err(ChainError::Stream)?;
        Ok(ExtractDataOutput {
            conversation,
            stream: aggregate(stream),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::chain_observer::RecordingChainObserver;
    use crate::ports::llm_gateway::{GatewayError, ProviderStream};
    use crate::ports::tool_handler::sync_handler_fn;
    use crate::use_cases::test_support::ScriptedGateway;
    use enzymeml_domain::{
        NoJitter, PlanningResponse, ResponseItem, StreamEvent, StreamItem, ToolOutput, ToolSpec,
    };
    use futures::StreamExt;
    use serde_json::json;

    fn prompt() -> Conversation {
        Conversation::from_prompt("Extract an EnzymeML document.", "Kinetics of beta-galactosidase")
    }

    #[tokio::test]
    async fn test_streaming_without_tools() {
        let gateway = Arc::new(ScriptedGateway::new().with_stream(ProviderStream::replay(
            vec![
                StreamEvent::TextDelta("Hel".to_string()),
                StreamEvent::TextDelta("lo".to_string()),
            ],
            Ok(json!({"name": "x"})),
        )));
        let use_case = ExtractDataUseCase::new(Arc::clone(&gateway));

        let output = use_case
            .execute(ExtractDataInput::new(Model::Gpt41, prompt()).with_output_schema(
                OutputSchema::new("enzymeml_document", json!({"type": "object"})),
            ))
            .await
            .unwrap();

        let (_, chunks, final_response) = output.stream.into_parts();
        let items: Vec<StreamItem> = chunks.collect().await;
        assert_eq!(
            items,
            vec![
                StreamItem::Text {
                    delta: "Hel".to_string()
                },
                StreamItem::Text {
                    delta: "lo".to_string()
                },
            ]
        );
        assert_eq!(final_response.await.unwrap(), json!({"name": "x"}));

        assert!(gateway.plan_requests().is_empty());
        let requests = gateway.stream_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, Some(0.0));
        assert_eq!(
            requests[0].output_schema.as_ref().map(|s| s.name.as_str()),
            Some("enzymeml_document")
        );
    }

    #[tokio::test]
    async fn test_tools_enrich_the_streamed_conversation() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .with_plan(PlanningResponse::new(vec![ResponseItem::function_call(
                    "call_1",
                    "lookup",
                    r#"{"id":"P00722"}"#,
                )]))
                .with_stream(ProviderStream::replay(Vec::new(), Ok(json!({})))),
        );
        let observer = Arc::new(RecordingChainObserver::new());
        let use_case = ExtractDataUseCase::new(Arc::clone(&gateway))
            .with_observer(observer.clone())
            .with_jitter(Arc::new(NoJitter));
        let registry = Arc::new(ToolRegistry::new().register(
            ToolSpec::new("lookup", "lookup"),
            sync_handler_fn(|_| Ok(ToolOutput::Text("lacZ".to_string()))),
        ));

        let output = use_case
            .execute(ExtractDataInput::new(Model::O3, prompt()).with_tools(registry))
            .await
            .unwrap();

        assert_eq!(output.conversation.len(), 4);
        let streamed = &gateway.stream_requests()[0];
        assert_eq!(streamed.input, output.conversation);
        assert_eq!(streamed.temperature, None);
        assert!(streamed.tools.is_empty());
        assert_eq!(observer.count("chain_complete"), 1);
    }

    #[tokio::test]
    async fn test_empty_registry_skips_chain() {
        let gateway = Arc::new(ScriptedGateway::new());
        let use_case = ExtractDataUseCase::new(Arc::clone(&gateway));

        use_case
            .execute(ExtractDataInput::new(Model::Gpt41, prompt()).with_tools(Arc::new(ToolRegistry::new())))
            .await
            .unwrap();

        assert!(gateway.plan_requests().is_empty());
        assert_eq!(gateway.stream_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_handler_only_registry_skips_chain() {
        let gateway = Arc::new(ScriptedGateway::new());
        let observer = Arc::new(RecordingChainObserver::new());
        let use_case = ExtractDataUseCase::new(Arc::clone(&gateway)).with_observer(observer.clone());
        let registry = Arc::new(ToolRegistry::new().register_handler(
            "lookup",
            sync_handler_fn(|_| Ok(ToolOutput::Text("x".to_string()))),
        ));

        use_case
            .execute(ExtractDataInput::new(Model::Gpt41, prompt()).with_tools(registry))
            .await
            .unwrap();

        assert!(gateway.plan_requests().is_empty());
        assert_eq!(observer.count("chain_start"), 0);
        assert_eq!(gateway.stream_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_stream_open_failure_is_a_stream_error() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .with_stream_error(GatewayError::ModelNotAvailable("gpt-4.1".to_string())),
        );
        let use_case = ExtractDataUseCase::new(Arc::clone(&gateway));

        let error = use_case
            .execute(ExtractDataInput::new(Model::Gpt41, prompt()))
            .await
            .unwrap_err();

        assert!(matches!(error, ChainError::Stream(GatewayError::ModelNotAvailable(_))));
        assert!(error.to_string().starts_with("Streaming request failed"));
    }

    #[tokio::test]
    async fn test_planning_error_aborts_extraction() {
        let gateway = Arc::new(ScriptedGateway::new().with_plan_error(GatewayError::Timeout));
        let use_case = ExtractDataUseCase::new(Arc::clone(&gateway));
        let registry = Arc::new(ToolRegistry::new().register(
            ToolSpec::new("lookup", "lookup"),
            sync_handler_fn(|_| Ok(ToolOutput::Text("x".to_string()))),
        ));

        let error = use_case
            .execute(ExtractDataInput::new(Model::Gpt41, prompt()).with_tools(registry))
            .await
            .unwrap_err();

        assert!(matches!(error, ChainError::Gateway(GatewayError::Timeout)));
        assert!(gateway.stream_requests().is_empty());
    }
}
