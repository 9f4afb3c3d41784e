use std::collections::HashMap;

use futures::future::join_all;
use tracing::{info, warn};

use super::Coordinator;
use crate::agent::{AgentConfiguration, AgentError, CoachPersonality};

/// Result of pushing a configuration to one agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureOutcome {
    /// Applied
    Ok,
    /// Did not complete within the configure timeout
    TimedOut,
    /// Rejected by the agent
    Failed(AgentError),
}

/// Per-agent outcomes of a personality broadcast
#[derive(Debug, Clone, Default)]
pub struct ConfigureReport {
    outcomes: HashMap<String, ConfigureOutcome>,
}

impl ConfigureReport {
    /// Outcome for one agent
    #[must_use]
    pub fn get(&self, agent: &str) -> Option<&ConfigureOutcome> {
        self.outcomes.get(agent)
    }

    /// Whether every agent applied the configuration
    #[must_use]
    pub fn all_ok(&self) -> bool {
        self.outcomes
            .values()
            .all(|outcome| *outcome == ConfigureOutcome::Ok)
    }

    /// Names of agents that did not apply the configuration, sorted
    #[must_use]
    pub fn failed(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .outcomes
            .iter()
            .filter(|(_, outcome)| **outcome != ConfigureOutcome::Ok)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of agents the configuration was pushed to
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no agent was configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Iterate over all outcomes
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigureOutcome)> {
        self.outcomes
            .iter()
            .map(|(name, outcome)| (name.as_str(), outcome))
    }
}

impl Coordinator {
    /// Push a personality to every agent advertising `AdjustableTone`.
    ///
    /// Pushes run concurrently, each bounded by the configure timeout, so a
    /// stuck agent shows up as `TimedOut` instead of stalling the broadcast.
    pub async fn set_personality(&self, personality: &CoachPersonality) -> ConfigureReport {
        let config = AgentConfiguration::from(personality);
        let timeout = self.config.configure_timeout();
        let agents = self.registry.adjustable_agents().await;

        let pushes = agents.into_iter().map(|agent| {
            let config = &config;
            async move {
                let outcome = match tokio::time::timeout(timeout, agent.configure(config)).await {
                    Ok(Ok(())) => ConfigureOutcome::Ok,
                    Ok(Err(e)) => {
                        warn!(agent = %agent.name(), error = %e, "Agent rejected configuration");
                        ConfigureOutcome::Failed(e)
                    }
                    Err(_) => {
                        warn!(agent = %agent.name(), "Agent configuration timed out");
                        ConfigureOutcome::TimedOut
                    }
                };
                (agent.name().to_string(), outcome)
            }
        });

        let report = ConfigureReport {
            outcomes: join_all(pushes).await.into_iter().collect(),
        };
        info!(
            tone = %personality.tone,
            agents = report.len(),
            failed = report.failed().len(),
            "Updated personality for supported agents"
        );
        report
    }
}
