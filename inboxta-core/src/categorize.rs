//! Rule-based email categorization for reviewer triage
//!
//! Priority order, first match wins:
//! 1. Syllabus assignment-name containment (before all pattern rules)
//! 2. Pattern rule tiers: schedule_changes, then assignments, then
//!    announcements; subject patterns before snippet patterns within a tier
//! 3. Otherwise `general`
//!
//! Rules are data, not code: an ordered list of [`CategoryRule`] values so
//! tests can enumerate them and the priority order stays visible.

use crate::types::{CategorizedEmail, EmailCategory, EmailData, SyllabusData};
use once_cell::sync::Lazy;
use regex::Regex;

/// Characters of body used as the matchable snippet.
const SNIPPET_LEN: usize = 200;
/// Assignment names shorter than this are too noisy to match on.
const MIN_ASSIGNMENT_NAME_LEN: usize = 4;

/// One categorization rule tier.
pub struct CategoryRule {
    pub category: EmailCategory,
    pub priority: u8,
    pub subject_patterns: Vec<Regex>,
    pub snippet_patterns: Vec<Regex>,
}

fn patterns(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .map(|p| Regex::new(p).expect("static category pattern must compile"))
        .collect()
}

/// The rule tiers, in evaluation order.
pub static CATEGORY_RULES: Lazy<Vec<CategoryRule>> = Lazy::new(|| {
    vec![
        CategoryRule {
            category: EmailCategory::ScheduleChanges,
            priority: 1,
            subject_patterns: patterns(&[
                r"(?i)\bcancell?ed\b",
                r"(?i)\bcancellation\b",
                r"(?i)\breschedul",
                r"(?i)room\s+change",
                r"(?i)time\s+change",
                r"(?i)\bpostponed\b",
                r"(?i)moved\s+to\b",
            ]),
            snippet_patterns: patterns(&[
                r"(?i)class\s+(?:is\s+)?cancell?ed",
                r"(?i)\breschedul",
                r"(?i)new\s+(?:room|location|time)\b",
                r"(?i)\bpostponed\b",
            ]),
        },
        CategoryRule {
            category: EmailCategory::Assignments,
            priority: 2,
            subject_patterns: patterns(&[
                r"(?i)\bhomework\b",
                r"(?i)\bhw\s*\d",
                r"(?i)\bassignment\b",
                r"(?i)\bproblem\s+set\b",
                r"(?i)\bdue\b",
                r"(?i)\bexam\b",
                r"(?i)\bmidterm\b",
                r"(?i)\bquiz\b",
                r"(?i)\bgrad(?:e|es|ed|ing)\b",
                r"(?i)\bsubmission\b",
            ]),
            snippet_patterns: patterns(&[
                r"(?i)\bdue\s+(?:on|by|date|next|this)\b",
                r"(?i)\bsubmit\b",
                r"(?i)\bextension\b",
                r"(?i)\blate\s+polic",
            ]),
        },
        CategoryRule {
            category: EmailCategory::Announcements,
            priority: 3,
            subject_patterns: patterns(&[
                r"(?i)\breminder\b",
                r"(?i)\bimportant\b",
                r"(?i)\bannouncement\b",
                r"(?i)\bfyi\b",
                r"(?i)\bheads\s+up\b",
            ]),
            snippet_patterns: patterns(&[
                r"(?i)\breminder\b",
                r"(?i)please\s+note\b",
                r"(?i)don'?t\s+forget\b",
            ]),
        },
    ]
});

/// Categorized buckets for a batch of emails.
///
/// All four buckets are always present; each is sorted most recent first.
#[derive(Debug, Clone, Default)]
pub struct GroupedEmails {
    pub assignments: Vec<CategorizedEmail>,
    pub announcements: Vec<CategorizedEmail>,
    pub schedule_changes: Vec<CategorizedEmail>,
    pub general: Vec<CategorizedEmail>,
}

impl GroupedEmails {
    /// The bucket for a category.
    pub fn bucket(&self, category: EmailCategory) -> &[CategorizedEmail] {
        match category {
            EmailCategory::Assignments => &self.assignments,
            EmailCategory::Announcements => &self.announcements,
            EmailCategory::ScheduleChanges => &self.schedule_changes,
            EmailCategory::General => &self.general,
        }
    }

    fn bucket_mut(&mut self, category: EmailCategory) -> &mut Vec<CategorizedEmail> {
        match category {
            EmailCategory::Assignments => &mut self.assignments,
            EmailCategory::Announcements => &mut self.announcements,
            EmailCategory::ScheduleChanges => &mut self.schedule_changes,
            EmailCategory::General => &mut self.general,
        }
    }
}

/// Categorize one email against the rule tiers and syllabus assignment names.
pub fn categorize_email(email: &EmailData, syllabus: &SyllabusData) -> CategorizedEmail {
    let snippet: String = email.body.chars().take(SNIPPET_LEN).collect();

    // Assignment names win over every pattern rule
    let haystack = format!("{} {}", email.subject, snippet).to_lowercase();
    let matched_names: Vec<String> = syllabus
        .assignment_names
        .iter()
        .map(|n| n.to_lowercase())
        .filter(|n| n.len() >= MIN_ASSIGNMENT_NAME_LEN && haystack.contains(n.as_str()))
        .collect();
    if !matched_names.is_empty() {
        return CategorizedEmail {
            email: email.clone(),
            category: EmailCategory::Assignments,
            matched_keywords: matched_names,
        };
    }

    for rule in CATEGORY_RULES.iter() {
        for pattern in &rule.subject_patterns {
            if let Some(m) = pattern.find(&email.subject) {
                return CategorizedEmail {
                    email: email.clone(),
                    category: rule.category,
                    matched_keywords: vec![m.as_str().to_string()],
                };
            }
        }
        for pattern in &rule.snippet_patterns {
            if let Some(m) = pattern.find(&snippet) {
                return CategorizedEmail {
                    email: email.clone(),
                    category: rule.category,
                    matched_keywords: vec![m.as_str().to_string()],
                };
            }
        }
    }

    CategorizedEmail {
        email: email.clone(),
        category: EmailCategory::General,
        matched_keywords: Vec::new(),
    }
}

/// Bucket a batch of emails, each bucket sorted by date descending.
pub fn group_emails(emails: &[EmailData], syllabus: &SyllabusData) -> GroupedEmails {
    let mut grouped = GroupedEmails::default();
    for email in emails {
        let categorized = categorize_email(email, syllabus);
        grouped.bucket_mut(categorized.category).push(categorized);
    }

    for category in EmailCategory::ALL {
        grouped
            .bucket_mut(category)
            .sort_by(|a, b| b.email.date.cmp(&a.email.date));
    }

    grouped
}
