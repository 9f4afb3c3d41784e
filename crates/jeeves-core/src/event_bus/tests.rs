use super::*;
use crate::agent::{AgentState, InputSource};
use uuid::Uuid;

#[tokio::test]
async fn test_publish_subscribe() {
    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();

    bus.publish(CoordinatorEvent::AgentStateChanged {
        agent: "timer".to_string(),
        state: AgentState::Ready,
    });

    let event = rx.recv().await.unwrap();
    assert_eq!(event.agent(), Some("timer"));
    match event {
        CoordinatorEvent::AgentStateChanged { state, .. } => {
            assert_eq!(state, AgentState::Ready);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_multiple_subscribers() {
    let bus = EventBus::new(16);
    let mut rx1 = bus.subscribe();
    let mut rx2 = bus.subscribe();
    assert_eq!(bus.subscriber_count(), 2);

    let count = bus.publish(CoordinatorEvent::AgentRegistered {
        agent: "timer".to_string(),
    });
    assert_eq!(count, 2);

    assert_eq!(rx1.recv().await.unwrap().agent(), Some("timer"));
    assert_eq!(rx2.recv().await.unwrap().agent(), Some("timer"));
}

#[test]
fn test_publish_no_subscribers() {
    let bus = EventBus::default();
    let count = bus.publish(CoordinatorEvent::AgentUnregistered {
        agent: "gone".to_string(),
    });
    assert_eq!(count, 0);
}

#[test]
fn test_dispatch_id_extraction() {
    let id = Uuid::new_v4();
    let started = CoordinatorEvent::DispatchStarted {
        dispatch_id: id,
        source: InputSource::Text,
        candidates: 2,
    };
    let completed = CoordinatorEvent::DispatchCompleted {
        dispatch_id: id,
        agent: None,
        success: false,
    };

    assert_eq!(started.dispatch_id(), Some(id));
    assert_eq!(completed.dispatch_id(), Some(id));
    assert_eq!(completed.agent(), None);
    assert_eq!(
        CoordinatorEvent::AgentRegistered {
            agent: "a".to_string()
        }
        .dispatch_id(),
        None
    );
}

#[test]
fn test_event_serialization() {
    let event = CoordinatorEvent::CandidateTimedOut {
        dispatch_id: Uuid::nil(),
        agent: "slow".to_string(),
    };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"candidate_timed_out\""));
    assert!(json.contains("\"agent\":\"slow\""));
}

#[tokio::test]
async fn test_zero_capacity_still_delivers() {
    let bus = EventBus::new(0);
    let mut rx = bus.subscribe();

    assert_eq!(
        bus.publish(CoordinatorEvent::AgentRegistered {
            agent: "timer".to_string(),
        }),
        1
    );
    assert_eq!(rx.recv().await.unwrap().agent(), Some("timer"));
}

#[tokio::test]
async fn test_slow_subscriber_lags_instead_of_blocking() {
    let bus = EventBus::new(2);
    let mut rx = bus.subscribe();

    for agent in ["a", "b", "c"] {
        bus.publish(CoordinatorEvent::AgentRegistered {
            agent: agent.to_string(),
        });
    }

    assert!(matches!(
        rx.recv().await,
        Err(tokio::sync::broadcast::error::RecvError::Lagged(1))
    ));
    assert_eq!(rx.recv().await.unwrap().agent(), Some("b"));
}
