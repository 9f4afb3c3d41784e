use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an agent can do. Used for candidate selection and configuration fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Accepts text commands
    ProcessesText,
    /// Accepts audio transcripts (and, by extension, text commands)
    ProcessesAudio,
    /// Requires network access to respond
    NeedsNetwork,
    /// Accepts personality configuration pushes
    AdjustableTone,
}

/// A command shape an agent declares it can answer.
///
/// Matching is case-insensitive. With `wildcard` set the noun is ignored and
/// the command must start with the verb; otherwise the verb (and the noun, if
/// any) must appear somewhere in the command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPattern {
    /// Required verb
    pub verb: String,
    /// Optional noun
    #[serde(default)]
    pub noun: Option<String>,
    /// Prefix match on the verb
    #[serde(default)]
    pub wildcard: bool,
}

impl CommandPattern {
    /// Verb-only pattern (substring match)
    #[must_use]
    pub fn verb(verb: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            noun: None,
            wildcard: false,
        }
    }

    /// Verb + noun pattern (both must appear, order not enforced)
    #[must_use]
    pub fn verb_noun(verb: impl Into<String>, noun: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            noun: Some(noun.into()),
            wildcard: false,
        }
    }

    /// Prefix pattern on the verb
    #[must_use]
    pub fn wildcard(verb: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            noun: None,
            wildcard: true,
        }
    }
}

/// Lifecycle state pushed by an agent on its state stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    /// Idle and able to take work
    Ready,
    /// Handling a request
    Busy,
    /// Stopped or broken
    Failed,
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => write!(f, "ready"),
            Self::Busy => write!(f, "busy"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Where an input came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    /// Typed command
    Text,
    /// Transcribed speech
    Audio,
    /// UI event; payload is opaque
    Ui,
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Audio => write!(f, "audio"),
            Self::Ui => write!(f, "ui"),
        }
    }
}

/// A single user input routed to the agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInput {
    /// Input source
    pub source: InputSource,
    /// Command string for text/audio, opaque payload for UI events
    pub data: String,
    /// When the input was received
    pub received_at: DateTime<Utc>,
    /// Number of `TriggerAgent` hops that led to this input (0 for user input)
    #[serde(default)]
    pub trigger_depth: u32,
}

impl AgentInput {
    /// Create a new input
    #[must_use]
    pub fn new(source: InputSource, data: impl Into<String>) -> Self {
        Self {
            source,
            data: data.into(),
            received_at: Utc::now(),
            trigger_depth: 0,
        }
    }

    /// Text command
    #[must_use]
    pub fn text(data: impl Into<String>) -> Self {
        Self::new(InputSource::Text, data)
    }

    /// Audio transcript
    #[must_use]
    pub fn audio(data: impl Into<String>) -> Self {
        Self::new(InputSource::Audio, data)
    }

    /// UI event
    #[must_use]
    pub fn ui(data: impl Into<String>) -> Self {
        Self::new(InputSource::Ui, data)
    }

    /// Text input synthesized by a `TriggerAgent` action
    #[must_use]
    pub fn triggered(command: impl Into<String>, depth: u32) -> Self {
        Self {
            trigger_depth: depth,
            ..Self::text(command)
        }
    }

    /// The string fed to the command matcher. Only text input is pattern-matched.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        match self.source {
            InputSource::Text => Some(&self.data),
            InputSource::Audio | InputSource::Ui => None,
        }
    }
}

/// Coaching tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Plain and businesslike
    #[default]
    Professional,
    /// Encouraging
    Motivational,
    /// Playful
    Witty,
    /// Pushes back on plans
    DevilsAdvocate,
    /// Playful and talkative
    ChattyWitty,
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Professional => "professional",
            Self::Motivational => "motivational",
            Self::Witty => "witty",
            Self::DevilsAdvocate => "devils_advocate",
            Self::ChattyWitty => "chatty_witty",
        };
        f.write_str(name)
    }
}

/// Coach personality broadcast to agents advertising `AdjustableTone`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachPersonality {
    /// Tone of voice
    #[serde(default)]
    pub tone: Tone,
    /// How eagerly the coach interjects, 0.0 - 1.0
    #[serde(default = "default_proactivity")]
    pub proactivity: f32,
    /// Seconds between unprompted check-ins
    #[serde(default = "default_frequency_secs")]
    pub frequency_secs: u64,
}

fn default_proactivity() -> f32 {
    0.5
}

fn default_frequency_secs() -> u64 {
    300
}

impl Default for CoachPersonality {
    fn default() -> Self {
        Self {
            tone: Tone::default(),
            proactivity: default_proactivity(),
            frequency_secs: default_frequency_secs(),
        }
    }
}

/// Settings pushed to an agent by `configure`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfiguration {
    /// Tone of voice
    pub tone: Option<Tone>,
    /// Proactivity, 0.0 - 1.0
    pub proactivity: Option<f32>,
    /// Check-in frequency in seconds
    pub frequency_secs: Option<u64>,
}

impl From<&CoachPersonality> for AgentConfiguration {
    fn from(personality: &CoachPersonality) -> Self {
        Self {
            tone: Some(personality.tone),
            proactivity: Some(personality.proactivity),
            frequency_secs: Some(personality.frequency_secs),
        }
    }
}
