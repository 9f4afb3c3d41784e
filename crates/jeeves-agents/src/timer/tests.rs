use super::*;

async fn run(agent: &TimerAgent, command: &str) -> AgentResponse {
    agent
        .handle(&AgentInput::text(command), &AgentContext::default())
        .await
}

#[test]
fn test_compact() {
    assert_eq!(compact("  Start   Timer "), "Start_Timer");
    assert_eq!(compact("start_timer_25"), "start_timer_25");
}

#[tokio::test]
async fn test_timer_commands() {
    let agent = TimerAgent::new();
    assert_eq!(run(&agent, "start timer").await.text, "Timer started");
    assert_eq!(run(&agent, "stop_timer").await.text, "Timer stopped");
    assert_eq!(run(&agent, "pause timer").await.text, "Timer paused");
    assert_eq!(run(&agent, "resume timer").await.text, "Timer resumed");
}

#[tokio::test]
async fn test_timer_with_duration() {
    let agent = TimerAgent::new();

    let response = run(&agent, "start timer 25").await;
    assert!(response.success);
    assert_eq!(response.text, "Timer started for 25 minutes");
    assert_eq!(
        response.metadata.get("duration_minutes").map(String::as_str),
        Some("25")
    );

    let invalid = run(&agent, "start_timer_soon").await;
    assert!(!invalid.success);
    assert_eq!(invalid.text, "Invalid duration");
    assert!(invalid.error.is_none());
}

#[tokio::test]
async fn test_mute_emits_context_update() {
    let agent = TimerAgent::new();
    let response = run(&agent, "mute").await;

    assert_eq!(response.text, "Muted");
    assert_eq!(response.actions, vec![set_flag("muted", true)]);

    let response = run(&agent, "unmute").await;
    assert_eq!(response.actions, vec![set_flag("muted", false)]);
}

#[tokio::test]
async fn test_deep_focus() {
    let agent = TimerAgent::new();
    let response = run(&agent, "deep_focus_true").await;
    assert_eq!(response.text, "Deep focus enabled");
    assert_eq!(response.actions, vec![set_flag("deepFocus", true)]);
}

#[tokio::test]
async fn test_summarize_session() {
    let agent = TimerAgent::new();
    assert_eq!(
        run(&agent, "summarize session").await.text,
        "No summaries available"
    );

    let mut context = AgentContext::default();
    context.warm.summaries = vec!["Drafted outline".to_string(), "Fixed bug".to_string()];
    let response = agent
        .handle(&AgentInput::text("summarize_session"), &context)
        .await;
    assert_eq!(response.text, "Session Summary:\nDrafted outline\nFixed bug");
}

#[tokio::test]
async fn test_trigger_command() {
    let agent = TimerAgent::new();
    let response = run(&agent, "trigger_helper_start_timer").await;

    assert!(response.success);
    assert_eq!(response.text, "Triggering helper with start_timer");
    assert_eq!(
        response.actions,
        vec![AgentAction::TriggerAgent {
            agent_name: "helper".to_string(),
            command: "start_timer".to_string(),
        }]
    );

    let invalid = run(&agent, "trigger_helper").await;
    assert!(!invalid.success);
    assert_eq!(invalid.text, "Invalid trigger command");
}

#[tokio::test]
async fn test_trigger_keeps_target_case() {
    let agent = TimerAgent::new();
    let response = run(&agent, "Trigger_MockAgent_mute").await;

    assert_eq!(response.text, "Triggering MockAgent with mute");
    assert_eq!(
        response.actions,
        vec![AgentAction::TriggerAgent {
            agent_name: "MockAgent".to_string(),
            command: "mute".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_stop_timer_summarizes_cycle() {
    let agent = TimerAgent::new();
    let mut context = AgentContext::default();
    context.warm.tasks = vec![
        jeeves_core::TaskItem::new("Outline", true),
        jeeves_core::TaskItem::new("Review", false),
    ];

    let response = agent
        .handle(&AgentInput::text("stop timer"), &context)
        .await;

    assert_eq!(response.text, "Timer stopped");
    assert_eq!(
        response.metadata.get("completed_tasks").map(String::as_str),
        Some("1")
    );
    assert_eq!(
        response.metadata.get("cycle").map(String::as_str),
        Some("Completed 1 tasks")
    );
}

#[tokio::test]
async fn test_unrecognized_and_non_text_input() {
    let agent = TimerAgent::new();
    let response = run(&agent, "Start Dancing").await;
    assert!(!response.success);
    assert_eq!(response.text, "Unrecognized command: Start Dancing");

    let audio = agent
        .handle(&AgentInput::audio("start timer"), &AgentContext::default())
        .await;
    assert_eq!(audio.text, "Unsupported input type");
}

#[tokio::test]
async fn test_lifecycle_states() {
    let agent = TimerAgent::new();
    let mut states = agent.state_stream();

    agent.start().await;
    run(&agent, "start timer").await;
    agent.stop().await;

    let mut seen = Vec::new();
    while let Ok(state) = states.try_recv() {
        seen.push(state);
    }
    assert_eq!(
        seen,
        vec![
            AgentState::Ready,
            AgentState::Busy,
            AgentState::Ready,
            AgentState::Failed
        ]
    );
}

#[tokio::test]
async fn test_configure_stores_configuration() {
    let agent = TimerAgent::new();
    assert!(agent.configuration().await.is_none());

    let config = AgentConfiguration {
        tone: Some(jeeves_core::Tone::Witty),
        ..AgentConfiguration::default()
    };
    agent.configure(&config).await.unwrap();
    assert_eq!(agent.configuration().await, Some(config));
}
