//! Run Tool Chain use case
//!
//! Plans tool calls with the model, fans them out through the scheduler and
//! splices calls and outputs into the conversation.
//!
//! ```text
//! start ─▶ planning ─┬─▶ no_tools ─────────────────────────────┐
//!             ▲      └─▶ has_tools ─▶ executing ─▶ appended ─┬─┤
//!             │                                              │ ▼
//!             └──────────── depth < total_depth ◀────────────┘ complete
//! ```
//!
//! Tool failures never escape: they are error envelopes inside the
//! conversation for the model to read on its next turn. Planning failures
//! are fatal and propagate as [`ChainError::Gateway`].

use crate::config::ChainConfig;
use crate::ports::chain_observer::ChainObserver;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::use_cases::event_sink::EventSink;
use crate::use_cases::execute_tool::{RandomJitter, ToolExecutor};
use crate::use_cases::scheduler::Scheduler;
use crate::use_cases::tool_registry::ToolRegistry;
use enzymeml_domain::{ChainEventKind, Conversation, DomainError, JitterSource, Model, ModelRequest};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during a chain run
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Planning request failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Streaming request failed: {0}")]
    Stream(GatewayError),

    #[error("Invalid chain configuration: {0}")]
    InvalidConfig(#[from] DomainError),
}

/// Input for the RunToolChain use case
#[derive(Debug, Clone)]
pub struct RunToolChainInput {
    pub model: Model,
    pub conversation: Conversation,
    pub registry: Arc<ToolRegistry>,
    pub config: ChainConfig,
}

impl RunToolChainInput {
    pub fn new(model: Model, conversation: Conversation, registry: Arc<ToolRegistry>) -> Self {
        Self {
            model,
            conversation,
            registry,
            config: ChainConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ChainConfig) -> Self {
        self.config = config;
        self
    }
}

/// Use case for running a tool chain
pub struct RunToolChainUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    observer: Option<Arc<dyn ChainObserver>>,
    jitter: Arc<dyn JitterSource>,
}

impl<G: LlmGateway + 'static> RunToolChainUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            observer: None,
            jitter: Arc::new(RandomJitter),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ChainObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_jitter(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        self.jitter = jitter;
        self
    }

    /// Run the chain and return the augmented conversation.
    pub async fn execute(&self, input: RunToolChainInput) -> Result<Conversation, ChainError> {
        let RunToolChainInput {
            model,
            mut conversation,
            registry,
            config,
        } = input;
        config.validate()?;

        let specs = registry.specs();
        let executor = ToolExecutor::new(registry, config.execution.clone())
            .with_jitter(Arc::clone(&self.jitter));
        let scheduler = Scheduler::new(Arc::new(executor), config.scheduler.clone());

        let mut depth = config.depth;
        let mut sink = EventSink::new(config.context(&model), self.observer.clone());
        sink.emit(ChainEventKind::ChainStart {
            input_len: conversation.len(),
        });
        info!(
            model = %model,
            tools = specs.len(),
            depth,
            total_depth = config.total_depth,
            "Starting tool chain"
        );

        loop {
            // Tool choice `required` with no declared tools is rejected upstream
            let calls = if specs.is_empty() {
                debug!(depth, "No tool declarations, skipping planning");
                Vec::new()
            } else {
                let request = ModelRequest::planning(&model, &conversation, &specs);
                self.gateway.plan(request).await?.tool_calls()
            };

            if calls.is_empty() {
                debug!(depth, "Model planned no tool calls");
                sink.emit(ChainEventKind::NoTools);
                break;
            }

            info!(depth, count = calls.len(), "Model planned tool calls");
            sink.emit(ChainEventKind::PlanningResult {
                count: calls.len(),
                names: calls.iter().map(|c| c.name.clone()).collect(),
                call_ids: calls.iter().map(|c| c.call_id.clone()).collect(),
            });
            conversation.append_function_calls(&calls);

            let results = scheduler.run(calls, &sink).await;
            conversation.append_function_outputs(&results);

            if depth >= config.total_depth {
                break;
            }
            depth += 1;
            sink = sink.at_depth(depth);
        }

        sink.emit(ChainEventKind::ChainComplete {
            conversation_len: conversation.len(),
        });
        info!(conversation_len = conversation.len(), "Tool chain complete");
        Ok(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionParams;
    use crate::ports::chain_observer::RecordingChainObserver;
    use crate::ports::tool_handler::{handler_fn, sync_handler_fn};
    use crate::use_cases::test_support::ScriptedGateway;
    use enzymeml_domain::{
        BackoffPolicy, ConversationItem, NoJitter, PlanningResponse, ResponseItem, ToolChoice,
        ToolError, ToolOutput, ToolSpec,
    };
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    // ==================== Helper ====================

    fn use_case(
        gateway: ScriptedGateway,
    ) -> (
        RunToolChainUseCase<ScriptedGateway>,
        Arc<ScriptedGateway>,
        Arc<RecordingChainObserver>,
    ) {
        let gateway = Arc::new(gateway);
        let observer = Arc::new(RecordingChainObserver::new());
        let use_case = RunToolChainUseCase::new(Arc::clone(&gateway))
            .with_observer(observer.clone())
            .with_jitter(Arc::new(NoJitter));
        (use_case, gateway, observer)
    }

    fn prompt() -> Conversation {
        Conversation::from_prompt("Extract an EnzymeML document.", "Lactase kinetics at 37 °C")
    }

    fn lookup_registry() -> Arc<ToolRegistry> {
        Arc::new(ToolRegistry::new().register(
            ToolSpec::new("lookup", "lookup"),
            sync_handler_fn(|_| Ok(ToolOutput::Text("found".to_string()))),
        ))
    }

    // ==================== No tools ====================

    #[tokio::test]
    async fn test_no_tools_short_circuits() {
        let (use_case, gateway, observer) =
            use_case(ScriptedGateway::new().with_plan(PlanningResponse::from_text("Nothing to look up")));
        let input = prompt();

        let output = use_case
            .execute(RunToolChainInput::new(Model::Gpt41, input.clone(), lookup_registry()))
            .await
            .unwrap();

        assert_eq!(output, input);
        assert_eq!(observer.names(), vec!["chain_start", "no_tools", "chain_complete"]);

        let requests = gateway.plan_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].tool_choice, Some(ToolChoice::Required));
        assert_eq!(requests[0].temperature, Some(0.0));
        assert_eq!(requests[0].tools[0]["name"], "lookup");
    }

    #[tokio::test]
    async fn test_undeclared_tools_skip_planning() {
        let (use_case, gateway, observer) = use_case(ScriptedGateway::new());
        let registry = Arc::new(ToolRegistry::new().register_handler(
            "lookup",
            sync_handler_fn(|_| Ok(ToolOutput::Text("found".to_string()))),
        ));
        let input = prompt();

        let output = use_case
            .execute(RunToolChainInput::new(Model::Gpt41, input.clone(), registry))
            .await
            .unwrap();

        assert_eq!(output, input);
        assert!(gateway.plan_requests().is_empty());
        assert_eq!(observer.names(), vec!["chain_start", "no_tools", "chain_complete"]);
    }

    #[tokio::test]
    async fn test_reasoning_model_planning_omits_temperature() {
        let (use_case, gateway, _) = use_case(ScriptedGateway::new());

        use_case
            .execute(RunToolChainInput::new(Model::O4Mini, prompt(), lookup_registry()))
            .await
            .unwrap();

        assert_eq!(gateway.plan_requests()[0].temperature, None);
    }

    // ==================== Single round ====================

    #[tokio::test(start_paused = true)]
    async fn test_single_call_round_trip() {
        let registry = Arc::new(ToolRegistry::new().register(
            ToolSpec::new("count_hits", "count"),
            handler_fn(|_, _| async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok(ToolOutput::Json(json!({"hits": 3})))
            }),
        ));
        let (use_case, gateway, observer) = use_case(ScriptedGateway::new().with_plan(
            PlanningResponse::new(vec![ResponseItem::function_call(
                "call_1",
                "count_hits",
                r#"{"q":"lactase"}"#,
            )]),
        ));

        let conversation = use_case
            .execute(RunToolChainInput::new(Model::Gpt41, prompt(), registry))
            .await
            .unwrap();

        assert_eq!(observer.count("tool_start"), 1);
        assert_eq!(observer.count("tool_success"), 1);
        let success = observer
            .events()
            .into_iter()
            .find_map(|event| match event.kind {
                ChainEventKind::ToolSuccess {
                    duration_ms,
                    result_size,
                    ..
                } => Some((duration_ms, result_size)),
                _ => None,
            })
            .unwrap();
        assert_eq!(success, (5, Some(r#"{"hits":3}"#.len())));

        let items = conversation.items();
        assert_eq!(items.len(), 4);
        assert_eq!(
            items[2],
            ConversationItem::FunctionCall {
                call_id: "call_1".to_string(),
                name: "count_hits".to_string(),
                arguments: r#"{"q":"lactase"}"#.to_string(),
            }
        );
        assert_eq!(
            items[3],
            ConversationItem::FunctionCallOutput {
                call_id: "call_1".to_string(),
                output: r#"{"hits":3}"#.to_string(),
            }
        );
        assert!(conversation.pending_call_ids().is_empty());
        assert_eq!(gateway.plan_requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_outcomes_never_fail_the_chain() {
        let failures = Arc::new(AtomicU32::new(0));
        let counter = failures.clone();
        let registry = Arc::new(
            ToolRegistry::new()
                .register(
                    ToolSpec::new("broken", "always throws"),
                    sync_handler_fn(move |_| {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Err(ToolError::execution_failed("service unavailable"))
                    }),
                )
                .register(
                    ToolSpec::new("working", "succeeds"),
                    sync_handler_fn(|_| Ok(ToolOutput::Json(json!({"ok": true})))),
                ),
        );
        let (use_case, _, observer) = use_case(ScriptedGateway::new().with_plan(
            PlanningResponse::new(vec![
                ResponseItem::function_call("call_a", "broken", "{}"),
                ResponseItem::function_call("call_b", "working", "{}"),
            ]),
        ));
        let config = ChainConfig::default().with_execution(
            ExecutionParams::default()
                .with_retries(2)
                .with_backoff(BackoffPolicy::new(
                    Duration::from_millis(10),
                    2.0,
                    Duration::from_secs(1),
                )),
        );

        let conversation = use_case
            .execute(RunToolChainInput::new(Model::Gpt41, prompt(), registry).with_config(config))
            .await
            .unwrap();

        assert_eq!(failures.load(Ordering::SeqCst), 3);
        assert_eq!(observer.count("tool_error"), 1);
        assert_eq!(observer.count("tool_success"), 1);
        assert_eq!(observer.count("tool_retry"), 2);
        let appended = observer
            .events()
            .into_iter()
            .find_map(|event| match event.kind {
                ChainEventKind::OutputsAppended { count, .. } => Some(count),
                _ => None,
            });
        assert_eq!(appended, Some(2));

        let error_output = conversation
            .items()
            .iter()
            .find_map(|item| match item {
                ConversationItem::FunctionCallOutput { call_id, output } if call_id == "call_a" => {
                    Some(output.clone())
                }
                _ => None,
            })
            .unwrap();
        let envelope: serde_json::Value = serde_json::from_str(&error_output).unwrap();
        assert_eq!(envelope["error"]["code"], ToolError::EXECUTION_FAILED);
    }

    #[tokio::test]
    async fn test_event_order_for_one_round() {
        let (use_case, _, observer) = use_case(ScriptedGateway::new().with_plan(
            PlanningResponse::new(vec![ResponseItem::function_call("c1", "lookup", "{}")]),
        ));

        use_case
            .execute(RunToolChainInput::new(Model::Gpt41, prompt(), lookup_registry()))
            .await
            .unwrap();

        assert_eq!(
            observer.names(),
            vec![
                "chain_start",
                "planning_result",
                "tool_start",
                "tool_success",
                "outputs_appended",
                "chain_complete"
            ]
        );
        match &observer.events()[1].kind {
            ChainEventKind::PlanningResult {
                count,
                names,
                call_ids,
            } => {
                assert_eq!(*count, 1);
                assert_eq!(names, &vec!["lookup".to_string()]);
                assert_eq!(call_ids, &vec!["c1".to_string()]);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    // ==================== Depth ====================

    #[tokio::test]
    async fn test_default_depth_plans_once() {
        let (use_case, gateway, _) = use_case(
            ScriptedGateway::new()
                .with_plan(PlanningResponse::new(vec![ResponseItem::function_call(
                    "c1", "lookup", "{}",
                )]))
                .with_plan(PlanningResponse::new(vec![ResponseItem::function_call(
                    "c2", "lookup", "{}",
                )])),
        );

        let conversation = use_case
            .execute(RunToolChainInput::new(Model::Gpt41, prompt(), lookup_registry()))
            .await
            .unwrap();

        assert_eq!(gateway.plan_requests().len(), 1);
        assert_eq!(conversation.len(), 4);
    }

    #[tokio::test]
    async fn test_deeper_chain_replans_until_no_tools() {
        let (use_case, gateway, observer) = use_case(
            ScriptedGateway::new()
                .with_plan(PlanningResponse::new(vec![ResponseItem::function_call(
                    "c1", "lookup", "{}",
                )]))
                .with_plan(PlanningResponse::new(vec![ResponseItem::function_call(
                    "c2", "lookup", "{}",
                )]))
                .with_plan(PlanningResponse::from_text("done")),
        );
        let config = ChainConfig::default().with_depth(1, 5);

        let conversation = use_case
            .execute(
                RunToolChainInput::new(Model::Gpt41, prompt(), lookup_registry()).with_config(config),
            )
            .await
            .unwrap();

        let requests = gateway.plan_requests();
        assert_eq!(requests.len(), 3);
        // The second round sees the first round's call and output
        assert_eq!(requests[1].input.len(), 4);
        assert_eq!(conversation.len(), 6);

        let events = observer.events();
        let complete = events.last().unwrap();
        assert_eq!(complete.name(), "chain_complete");
        assert_eq!(complete.metadata.depth, 3);
        assert_eq!(observer.count("chain_start"), 1);
        assert_eq!(observer.count("no_tools"), 1);
    }

    #[tokio::test]
    async fn test_total_depth_bounds_rounds() {
        let mut gateway = ScriptedGateway::new();
        for i in 0..5 {
            gateway = gateway.with_plan(PlanningResponse::new(vec![ResponseItem::function_call(
                format!("c{i}"),
                "lookup",
                "{}",
            )]));
        }
        let (use_case, gateway, _) = use_case(gateway);

        use_case
            .execute(
                RunToolChainInput::new(Model::Gpt41, prompt(), lookup_registry())
                    .with_config(ChainConfig::default().with_depth(1, 2)),
            )
            .await
            .unwrap();

        assert_eq!(gateway.plan_requests().len(), 2);
    }

    // ==================== Errors ====================

    #[tokio::test]
    async fn test_planning_failure_propagates() {
        let (use_case, _, observer) = use_case(
            ScriptedGateway::new().with_plan_error(GatewayError::AuthenticationFailed("401".to_string())),
        );

        let error = use_case
            .execute(RunToolChainInput::new(Model::Gpt41, prompt(), lookup_registry()))
            .await
            .unwrap_err();

        assert!(matches!(error, ChainError::Gateway(GatewayError::AuthenticationFailed(_))));
        assert_eq!(observer.names(), vec!["chain_start"]);
    }

    #[tokio::test]
    async fn test_invalid_depth_is_rejected() {
        let (use_case, gateway, _) = use_case(ScriptedGateway::new());

        let error = use_case
            .execute(
                RunToolChainInput::new(Model::Gpt41, prompt(), lookup_registry())
                    .with_config(ChainConfig::default().with_depth(2, 1)),
            )
            .await
            .unwrap_err();

        assert!(matches!(error, ChainError::InvalidConfig(_)));
        assert!(gateway.plan_requests().is_empty());
    }
}
