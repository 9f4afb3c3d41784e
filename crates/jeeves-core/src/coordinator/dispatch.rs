use std::time::Instant;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::config::TimeoutPolicy;
use super::Coordinator;
use crate::agent::{AgentInput, AgentResponse, Verdict};
use crate::context::AgentContext;
use crate::event_bus::CoordinatorEvent;

/// Result of one dispatch + action cycle
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// Response delivered to the caller
    pub response: AgentResponse,
    /// Context after action processing
    pub context: AgentContext,
    /// Agent whose response (or timeout) was delivered; `None` for the fallback
    pub handled_by: Option<String>,
}

impl Coordinator {
    /// Route an input and return the single final response.
    pub async fn dispatch(&self, input: AgentInput, context: AgentContext) -> AgentResponse {
        self.process(input, context).await.response
    }

    /// Route an input and return the response together with the updated context.
    pub async fn process(&self, input: AgentInput, context: AgentContext) -> DispatchOutcome {
        let dispatch_id = Uuid::new_v4();
        info!(
            %dispatch_id,
            source = %input.source,
            data = %input.data,
            "Processing input"
        );

        let candidates = self.registry.candidates(&input).await;
        debug!(
            %dispatch_id,
            candidates = ?candidates.iter().map(|a| a.name()).collect::<Vec<_>>(),
            "Selected candidates"
        );
        self.events.publish(CoordinatorEvent::DispatchStarted {
            dispatch_id,
            source: input.source,
            candidates: candidates.len(),
        });

        if candidates.is_empty() {
            info!(%dispatch_id, "No matching agents, returning fallback");
            return self.finish(dispatch_id, fallback(&input, context));
        }

        let timeout = self.config.agent_timeout();

        for agent in candidates {
            let name = agent.name().to_string();
            let start = Instant::now();

            // Dropping the handler future on expiry means a late answer can never be delivered
            let handled = tokio::time::timeout(timeout, agent.handle(&input, &context)).await;
            let response = match handled {
                Ok(response) => response,
                Err(_) => {
                    warn!(
                        %dispatch_id,
                        agent = %name,
                        timeout_ms = self.config.agent_timeout_ms,
                        "Agent timed out"
                    );
                    self.events.publish(CoordinatorEvent::CandidateTimedOut {
                        dispatch_id,
                        agent: name.clone(),
                    });
                    match self.config.timeout_policy {
                        TimeoutPolicy::AbortDispatch => {
                            return self.finish(
                                dispatch_id,
                                DispatchOutcome {
                                    response: AgentResponse::timeout(&name),
                                    context,
                                    handled_by: Some(name),
                                },
                            );
                        }
                        TimeoutPolicy::SkipCandidate => continue,
                    }
                }
            };

            let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            match response.verdict() {
                Verdict::Accept => {
                    info!(
                        %dispatch_id,
                        agent = %name,
                        duration_ms,
                        text = %response.text,
                        "Agent responded"
                    );
                    let context = self
                        .actions
                        .process(&response.actions, context, input.trigger_depth)
                        .await;
                    return self.finish(
                        dispatch_id,
                        DispatchOutcome {
                            response,
                            context,
                            handled_by: Some(name),
                        },
                    );
                }
                Verdict::Terminal => {
                    warn!(
                        %dispatch_id,
                        agent = %name,
                        duration_ms,
                        error = ?response.error,
                        "Agent failed with a non-retryable error"
                    );
                    let context = if self.config.terminal_failure_actions {
                        self.actions
                            .process(&response.actions, context, input.trigger_depth)
                            .await
                    } else {
                        context
                    };
                    return self.finish(
                        dispatch_id,
                        DispatchOutcome {
                            response,
                            context,
                            handled_by: Some(name),
                        },
                    );
                }
                Verdict::Retry => {
                    debug!(
                        %dispatch_id,
                        agent = %name,
                        duration_ms,
                        "Agent unsuccessful, trying next"
                    );
                    self.events.publish(CoordinatorEvent::CandidateRejected {
                        dispatch_id,
                        agent: name,
                    });
                }
            }
        }

        info!(%dispatch_id, "All agents failed, returning fallback");
        self.finish(dispatch_id, fallback(&input, context))
    }

    fn finish(&self, dispatch_id: Uuid, outcome: DispatchOutcome) -> DispatchOutcome {
        self.events.publish(CoordinatorEvent::DispatchCompleted {
            dispatch_id,
            agent: outcome.handled_by.clone(),
            success: outcome.response.success,
        });
        outcome
    }
}

fn fallback(input: &AgentInput, context: AgentContext) -> DispatchOutcome {
    DispatchOutcome {
        response: AgentResponse::fallback(input),
        context,
        handled_by: None,
    }
}
