//! Pending queue and answer history
//!
//! Append-only, size-capped records of triage outcomes plus the aggregate
//! statistics derived from them. History is strictly append-ordered before
//! trimming; the cap is a simple FIFO (oldest dropped first), not LRU.

use crate::types::{AnsweredQuestion, PendingQuestion};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Most recent history entries kept; older entries are silently dropped.
pub const HISTORY_CAP: usize = 1000;

/// Aggregate statistics for a course's triage activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseStats {
    pub total_questions: usize,
    pub auto_replied: usize,
    pub manually_answered: usize,
    pub pending: usize,
    /// Percentage of answered questions that were auto-replied (0 when none)
    pub auto_reply_rate: f64,
    /// Questions answered strictly within the last 7 days
    pub last_week: usize,
}

/// Pending questions awaiting reviewer action plus the capped answer history.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TriageLedger {
    pending: Vec<PendingQuestion>,
    history: Vec<AnsweredQuestion>,
}

impl TriageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a question for reviewer action.
    pub fn add_pending(&mut self, question: PendingQuestion) {
        self.pending.push(question);
    }

    /// Questions awaiting reviewer action, in arrival order.
    pub fn pending(&self) -> &[PendingQuestion] {
        &self.pending
    }

    /// Remove a pending question by email id (approve / edit / ignore).
    ///
    /// `None` when no pending question has that email id.
    pub fn take_pending(&mut self, email_id: &str) -> Option<PendingQuestion> {
        let index = self.pending.iter().position(|p| p.email.id == email_id)?;
        Some(self.pending.remove(index))
    }

    /// Resolve a pending question into an answered record.
    ///
    /// Removes it from the queue, appends the terminal record to history,
    /// and returns it so the caller can also add the answer to the FAQ
    /// store when `added_to_faq` is set. `None` when the email id is not
    /// pending.
    pub fn resolve_pending(
        &mut self,
        email_id: &str,
        response: String,
        added_to_faq: bool,
        now: DateTime<Utc>,
    ) -> Option<AnsweredQuestion> {
        let pending = self.take_pending(email_id)?;
        let answered = AnsweredQuestion {
            email_id: pending.email.id,
            from: pending.email.from,
            subject: pending.email.subject,
            question: pending.email.body,
            response,
            answered_at: now,
            was_auto_reply: false,
            added_to_faq,
        };
        self.add_to_history(answered.clone());
        Some(answered)
    }

    /// Append an answered question, trimming to the most recent
    /// [`HISTORY_CAP`] entries.
    pub fn add_to_history(&mut self, answered: AnsweredQuestion) {
        self.history.push(answered);
        if self.history.len() > HISTORY_CAP {
            let excess = self.history.len() - HISTORY_CAP;
            self.history.drain(..excess);
        }
    }

    /// Answered questions, oldest first.
    pub fn history(&self) -> &[AnsweredQuestion] {
        &self.history
    }

    /// Derive aggregate statistics as of `now`.
    pub fn course_stats(&self, now: DateTime<Utc>) -> CourseStats {
        let total = self.history.len();
        let auto_replied = self.history.iter().filter(|a| a.was_auto_reply).count();
        let week_ago = now - Duration::days(7);
        let last_week = self
            .history
            .iter()
            .filter(|a| a.answered_at > week_ago)
            .count();

        CourseStats {
            total_questions: total,
            auto_replied,
            manually_answered: total - auto_replied,
            pending: self.pending.len(),
            auto_reply_rate: if total == 0 {
                0.0
            } else {
                auto_replied as f64 / total as f64 * 100.0
            },
            last_week,
        }
    }
}
