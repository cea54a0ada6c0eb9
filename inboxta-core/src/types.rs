//! Core domain types for inboxta
//!
//! These types model the triage pipeline for a course inbox: a per-course
//! [`KnowledgeBase`] grounds automated answers, the decision engine turns an
//! inbound [`EmailData`] into a [`Decision`], and the reviewer-facing side
//! works with [`PendingQuestion`], [`AnsweredQuestion`], and
//! [`CategorizedEmail`] records.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Knowledge Base** | Per-course store of FAQs, key dates, and policies |
//! | **Decision** | Confidence-scored answer produced for one question |
//! | **Model Tier** | Cost tier of the completion model (mini → standard → frontier) |
//! | **Escalation** | Retrying a question one tier up when confidence is low |
//! | **Categorization** | Rule-based bucketing of inbound mail for reviewer triage |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Knowledge base
// ============================================

/// Where an FAQ entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaqSource {
    /// Approved by the professor from a suggested answer
    ProfessorApproved,
    /// Extracted from the syllabus
    Syllabus,
    /// Entered by hand
    Manual,
}

impl FaqSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaqSource::ProfessorApproved => "professor_approved",
            FaqSource::Syllabus => "syllabus",
            FaqSource::Manual => "manual",
        }
    }
}

impl std::str::FromStr for FaqSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "professor_approved" => Ok(FaqSource::ProfessorApproved),
            "syllabus" => Ok(FaqSource::Syllabus),
            "manual" => Ok(FaqSource::Manual),
            _ => Err(format!("unknown faq source: {}", s)),
        }
    }
}

/// One question/answer pair in a course knowledge base.
///
/// Immutable once created except for `question`/`answer` text edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faq {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// The question text
    pub question: String,
    /// The answer text
    pub answer: String,
    /// How this entry was created
    pub source: FaqSource,
    /// When this entry was created
    pub created: DateTime<Utc>,
}

impl Faq {
    /// Create a new FAQ with a generated id and the current timestamp.
    pub fn new(question: String, answer: String, source: FaqSource) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            question,
            answer,
            source,
            created: Utc::now(),
        }
    }
}

/// A date the course cares about (exam, deadline, holiday).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyDate {
    pub date: String,
    pub description: String,
}

/// Per-course knowledge used to ground automated answers.
///
/// `course_id` never changes after creation. An empty knowledge base (all
/// collections empty) is a valid initial state. FAQ order is insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub course_id: String,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub syllabus_summary: Option<String>,
    #[serde(default)]
    pub key_dates: Vec<KeyDate>,
    #[serde(default)]
    pub policies: Vec<String>,
}

impl KnowledgeBase {
    /// Create an empty knowledge base for a course.
    pub fn new(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            faqs: Vec::new(),
            syllabus_summary: None,
            key_dates: Vec::new(),
            policies: Vec::new(),
        }
    }

    /// True when every collection is empty and no summary is set.
    pub fn is_empty(&self) -> bool {
        self.faqs.is_empty()
            && self.syllabus_summary.is_none()
            && self.key_dates.is_empty()
            && self.policies.is_empty()
    }
}

// ============================================
// Email
// ============================================

/// An inbound message reduced to the fields the engine needs.
///
/// Read-only input; the engine never persists these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailData {
    pub id: String,
    pub thread_id: String,
    pub from: String,
    pub subject: String,
    pub body: String,
    pub date: DateTime<Utc>,
}

// ============================================
// Model tiers
// ============================================

/// Completion model cost tier, ordered low → high.
///
/// Tiers carry pricing and a capability blurb for cost estimation and
/// escalation ordering only; behavior never branches on a tier beyond
/// comparing positions in [`ModelTier::TIERS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    /// Cheapest tier, good for routine FAQ-style questions
    #[default]
    Mini,
    /// Mid tier, better reasoning over longer context
    Standard,
    /// Highest tier, used only via escalation
    Frontier,
}

impl ModelTier {
    /// All tiers in escalation order (low cost first).
    pub const TIERS: [ModelTier; 3] = [ModelTier::Mini, ModelTier::Standard, ModelTier::Frontier];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Mini => "mini",
            ModelTier::Standard => "standard",
            ModelTier::Frontier => "frontier",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelTier::Mini => "Mini",
            ModelTier::Standard => "Standard",
            ModelTier::Frontier => "Frontier",
        }
    }

    /// Short capability description, for reporting.
    pub fn description(&self) -> &'static str {
        match self {
            ModelTier::Mini => "fast and cheap, handles routine questions",
            ModelTier::Standard => "balanced cost and reasoning quality",
            ModelTier::Frontier => "strongest reasoning, highest cost",
        }
    }

    /// Input cost in dollars per million tokens.
    pub fn input_cost_per_million(&self) -> f64 {
        match self {
            ModelTier::Mini => 0.15,
            ModelTier::Standard => 3.00,
            ModelTier::Frontier => 15.00,
        }
    }

    /// Output cost in dollars per million tokens.
    pub fn output_cost_per_million(&self) -> f64 {
        match self {
            ModelTier::Mini => 0.60,
            ModelTier::Standard => 15.00,
            ModelTier::Frontier => 75.00,
        }
    }

    /// The next tier up in the escalation order, if any.
    pub fn next(&self) -> Option<ModelTier> {
        match self {
            ModelTier::Mini => Some(ModelTier::Standard),
            ModelTier::Standard => Some(ModelTier::Frontier),
            ModelTier::Frontier => None,
        }
    }

    /// Estimated cost of one analysis call at this tier.
    ///
    /// Assumes a fixed 500 input / 200 output token workload. This is an
    /// approximation for reporting, not metering.
    pub fn estimate_cost(&self) -> CostEstimate {
        let input = 500.0 / 1_000_000.0 * self.input_cost_per_million();
        let output = 200.0 / 1_000_000.0 * self.output_cost_per_million();
        CostEstimate {
            input,
            output,
            total: input + output,
        }
    }
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mini" | "Mini" => Ok(ModelTier::Mini),
            "standard" | "Standard" => Ok(ModelTier::Standard),
            "frontier" | "Frontier" => Ok(ModelTier::Frontier),
            _ => Err(format!("unknown model tier: {}", s)),
        }
    }
}

/// Dollar cost estimate for a single analysis call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub input: f64,
    pub output: f64,
    pub total: f64,
}

// ============================================
// Decisions
// ============================================

/// The engine's verdict on one question.
///
/// Produced fresh per question; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// Confidence in `response`, in `[0, 1]`
    pub confidence: f64,
    /// The drafted reply text
    pub response: String,
    /// Up to 3 FAQ ids that matched the question
    pub matched_faq_ids: Vec<String>,
    /// Why the engine decided this
    pub reasoning: String,
    /// The cost tier this decision was made at.
    ///
    /// Records the intended tier even when the FAQ short-circuit skipped
    /// the completion call entirely.
    pub model_used: ModelTier,
}

/// Caller-tunable knobs for one `analyze_question` call.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Tier to run the completion at
    pub model: ModelTier,
    /// Minimum confidence for the auto-reply gate
    pub auto_reply_threshold: f64,
    /// Retry once at the next tier up when confidence is low
    pub use_smart_model_for_low_confidence: bool,
    /// Confidence below which the smart-model retry triggers
    pub smart_model_threshold: f64,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            model: ModelTier::default(),
            auto_reply_threshold: 0.85,
            use_smart_model_for_low_confidence: false,
            smart_model_threshold: 0.5,
        }
    }
}

// ============================================
// Triage records
// ============================================

/// A decision awaiting reviewer action (approve / edit / ignore).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingQuestion {
    pub email: EmailData,
    pub decision: Decision,
    pub received_at: DateTime<Utc>,
}

/// Terminal record of a resolved question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub email_id: String,
    pub from: String,
    pub subject: String,
    pub question: String,
    pub response: String,
    pub answered_at: DateTime<Utc>,
    pub was_auto_reply: bool,
    pub added_to_faq: bool,
}

// ============================================
// Categorization
// ============================================

/// Triage bucket for an inbound email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailCategory {
    Assignments,
    Announcements,
    ScheduleChanges,
    General,
}

impl EmailCategory {
    /// All categories, in the order buckets are presented.
    pub const ALL: [EmailCategory; 4] = [
        EmailCategory::Assignments,
        EmailCategory::Announcements,
        EmailCategory::ScheduleChanges,
        EmailCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmailCategory::Assignments => "assignments",
            EmailCategory::Announcements => "announcements",
            EmailCategory::ScheduleChanges => "schedule_changes",
            EmailCategory::General => "general",
        }
    }
}

impl std::fmt::Display for EmailCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An email plus the bucket the rule engine put it in.
///
/// Derived on demand from an [`EmailData`] batch; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizedEmail {
    pub email: EmailData,
    pub category: EmailCategory,
    pub matched_keywords: Vec<String>,
}

/// Syllabus-derived context for the categorizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyllabusData {
    /// Assignment names as they appear in the syllabus
    pub assignment_names: Vec<String>,
}
