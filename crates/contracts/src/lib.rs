//! v1 cross-boundary contracts for the day-cycle kernel, API, and save persistence.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION_V1: &str = "1.0";
pub const DEFAULT_CRISIS_EVENT_ID: &str = "plague";
pub const NEUTRAL_CREDIBILITY: i32 = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum DayPhase {
    #[default]
    DayStart,
    InfoPhase,
    QuestDraftPhase,
    SubmissionPhase,
    ResolutionPhase,
    DayEnd,
}

impl fmt::Display for DayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::DayStart => "day_start",
            Self::InfoPhase => "info_phase",
            Self::QuestDraftPhase => "quest_draft_phase",
            Self::SubmissionPhase => "submission_phase",
            Self::ResolutionPhase => "resolution_phase",
            Self::DayEnd => "day_end",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InfoCategory {
    Monster,
    Disappearance,
    EscortRequest,
    SupplyRun,
    Purification,
    Diplomacy,
}

impl InfoCategory {
    pub const ALL: [InfoCategory; 6] = [
        Self::Monster,
        Self::Disappearance,
        Self::EscortRequest,
        Self::SupplyRun,
        Self::Purification,
        Self::Diplomacy,
    ];

    pub fn subject(self) -> &'static str {
        match self {
            Self::Monster => "monster sightings",
            Self::Disappearance => "a disappearance",
            Self::EscortRequest => "an escort request",
            Self::SupplyRun => "a supply run",
            Self::Purification => "a contamination cleanup",
            Self::Diplomacy => "a diplomatic envoy",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InfoItem {
    pub id: String,
    pub title: String,
    pub region: String,
    pub category: InfoCategory,
    pub credibility: i32,
    pub summary: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub discarded: bool,
    #[serde(default)]
    pub used_in_draft: bool,
}

impl InfoItem {
    pub fn is_locked(&self) -> bool {
        self.archived || self.discarded
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestTemplate {
    Combat,
    Investigation,
    Escort,
    Delivery,
    Purification,
    Diplomacy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestDraft {
    pub id: String,
    pub template: QuestTemplate,
    pub source_info_ids: Vec<String>,
    pub risk: i32,
    pub reward: i32,
    pub deadline_days: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestSubmission {
    pub draft: QuestDraft,
    pub submitted_day: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestOutcome {
    Success,
    Fail,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReasonTag {
    HighRisk,
    LowCredibility,
    HighCredibility,
    TightDeadline,
    FieldVariables,
    InformationShortage,
    OperationalConstraints,
}

impl ReasonTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HighRisk => "high risk",
            Self::LowCredibility => "low credibility",
            Self::HighCredibility => "high credibility",
            Self::TightDeadline => "tight deadline",
            Self::FieldVariables => "field variables",
            Self::InformationShortage => "information shortage",
            Self::OperationalConstraints => "operational constraints",
        }
    }
}

impl fmt::Display for ReasonTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic, additive change to the five world counters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct WorldDelta {
    #[serde(default)]
    pub reputation: i32,
    #[serde(default)]
    pub stability: i32,
    #[serde(default)]
    pub budget: i32,
    #[serde(default)]
    pub influence: i32,
    #[serde(default)]
    pub casualties: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestResult {
    pub quest_id: String,
    pub outcome: QuestOutcome,
    pub final_success_chance: i32,
    pub top_reasons: Vec<ReasonTag>,
    pub delta: WorldDelta,
}

/// Missing counters in a saved world fall back to the starting values below.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct WorldState {
    pub reputation: i32,
    pub stability: i32,
    pub budget: i32,
    pub influence: i32,
    pub casualties: i32,
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            reputation: 50,
            stability: 50,
            budget: 1000,
            influence: 0,
            casualties: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrisisPhase {
    #[default]
    Dormant,
    Active,
    Escalating,
    Critical,
    Resolved,
    Catastrophe,
}

impl CrisisPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Catastrophe)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrisisState {
    #[serde(default = "default_crisis_event_id")]
    pub event_id: String,
    #[serde(default)]
    pub phase: CrisisPhase,
    #[serde(default)]
    pub days_in_phase: i32,
    #[serde(default)]
    pub failure_window: i32,
    #[serde(default)]
    pub finished: bool,
}

impl Default for CrisisState {
    fn default() -> Self {
        Self {
            event_id: default_crisis_event_id(),
            phase: CrisisPhase::Dormant,
            days_in_phase: 0,
            failure_window: 0,
            finished: false,
        }
    }
}

fn default_crisis_event_id() -> String {
    DEFAULT_CRISIS_EVENT_ID.to_string()
}

/// Logical save payload. Every field except the schema version falls back to a
/// documented default so older saves keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default = "default_day")]
    pub current_day: i32,
    #[serde(default)]
    pub seed: i32,
    /// `None` on legacy saves; restored as a full pool.
    #[serde(default)]
    pub action_points: Option<i32>,
    #[serde(default)]
    pub world: WorldState,
    #[serde(default)]
    pub day_phase: DayPhase,
    #[serde(default)]
    pub crisis: CrisisState,
}

fn default_schema_version() -> String {
    SCHEMA_VERSION_V1.to_string()
}

fn default_day() -> i32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    pub schema_version: String,
    pub max_submissions_per_day: usize,
    pub info_batch_size: usize,
    pub max_action_points: i32,
    #[serde(default)]
    pub starting_world: WorldState,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            max_submissions_per_day: 4,
            info_batch_size: 6,
            max_action_points: 5,
            starting_world: WorldState::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionStatus {
    pub schema_version: String,
    pub current_day: i32,
    pub seed: i32,
    pub day_phase: DayPhase,
    pub action_points: i32,
    pub world: WorldState,
    pub crisis: CrisisState,
    pub draft_count: usize,
    pub submitted_today: usize,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day={} phase={} ap={} reputation={} stability={} budget={} influence={} casualties={} crisis={:?}/{}d",
            self.current_day,
            self.day_phase,
            self.action_points,
            self.world.reputation,
            self.world.stability,
            self.world.budget,
            self.world.influence,
            self.world.casualties,
            self.crisis.phase,
            self.crisis.days_in_phase
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidCommand,
    InvalidQuery,
    ActionRejected,
    ContractVersionUnsupported,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub schema_version: String,
    pub error_code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(error_code: ErrorCode, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            error_code,
            message: message.into(),
            details,
        }
    }
}
