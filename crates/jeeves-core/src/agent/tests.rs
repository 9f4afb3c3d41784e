use super::*;

#[test]
fn test_verdict_classification() {
    assert_eq!(AgentResponse::success("ok").verdict(), Verdict::Accept);

    let fatal = AgentResponse::failure("no", Some(AgentError::fatal(500, "broken")));
    assert_eq!(fatal.verdict(), Verdict::Terminal);

    let retry = AgentResponse::failure("later", Some(AgentError::retryable(503, "busy")));
    assert_eq!(retry.verdict(), Verdict::Retry);

    // No error payload counts as retryable
    assert_eq!(AgentResponse::failure("meh", None).verdict(), Verdict::Retry);
}

#[test]
fn test_success_with_error_is_still_accepted() {
    let mut response = AgentResponse::success("partial");
    response.error = Some(AgentError::fatal(500, "warning"));
    assert_eq!(response.verdict(), Verdict::Accept);
    assert_eq!(response.display_text(), "partial\nError: warning");
}

#[test]
fn test_fallback_for_text_input() {
    let input = AgentInput::text("gibberish xyz");
    let response = AgentResponse::fallback(&input);

    assert!(!response.success);
    assert_eq!(response.text, "I don't understand 'gibberish xyz'. Try again.");
    assert_eq!(response.metadata.get("input").map(String::as_str), Some("gibberish xyz"));

    let error = response.error.unwrap();
    assert_eq!(error.code, NO_AGENT_CODE);
    assert!(!error.retryable);
}

#[test]
fn test_fallback_for_ui_input() {
    let response = AgentResponse::fallback(&AgentInput::ui("button:42"));
    assert_eq!(response.text, "I'm not sure how to help with that.");
    assert_eq!(response.error.unwrap().code, 404);
}

#[test]
fn test_timeout_response_has_no_error() {
    let response = AgentResponse::timeout("slow");
    assert!(!response.success);
    assert!(response.error.is_none());
    assert_eq!(response.text, "Timeout");
    assert_eq!(response.metadata.get("agent").map(String::as_str), Some("slow"));
}

#[test]
fn test_only_text_is_pattern_matched() {
    assert_eq!(AgentInput::text("mute").command(), Some("mute"));
    assert_eq!(AgentInput::audio("mute").command(), None);
    assert_eq!(AgentInput::ui("mute").command(), None);
}

#[test]
fn test_triggered_input_carries_depth() {
    let input = AgentInput::triggered("start_timer", 2);
    assert_eq!(input.source, InputSource::Text);
    assert_eq!(input.trigger_depth, 2);
}

#[test]
fn test_configuration_from_personality() {
    let personality = CoachPersonality {
        tone: Tone::Witty,
        proactivity: 0.8,
        frequency_secs: 120,
    };
    let config = AgentConfiguration::from(&personality);

    assert_eq!(config.tone, Some(Tone::Witty));
    assert_eq!(config.proactivity, Some(0.8));
    assert_eq!(config.frequency_secs, Some(120));
}

#[test]
fn test_action_serialization() {
    let action = AgentAction::TriggerAgent {
        agent_name: "timer".to_string(),
        command: "start_timer".to_string(),
    };
    let json = serde_json::to_string(&action).unwrap();
    assert!(json.contains("\"type\":\"trigger_agent\""));
    assert!(json.contains("\"agent_name\":\"timer\""));
}

#[test]
fn test_network_agents_are_not_local() {
    use crate::testing::ScriptedAgent;

    let on_device = ScriptedAgent::new("timer");
    assert!(on_device.is_local());

    let remote = ScriptedAgent::new("weather")
        .with_capabilities([Capability::ProcessesText, Capability::NeedsNetwork]);
    assert!(!remote.is_local());
}
