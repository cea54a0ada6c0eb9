//! Prompt context builder
//!
//! Serializes a knowledge base into the text block the decision engine
//! hands to the completion service: syllabus summary, key dates (in stored
//! order), policies, and the most recently created FAQs, with a literal
//! `---` separator between sections.

use crate::types::KnowledgeBase;

/// How many of the most recent FAQs make it into the context.
const MAX_CONTEXT_FAQS: usize = 10;

/// Section separator in the rendered block.
const SECTION_SEPARATOR: &str = "---";

/// Render a knowledge base as a prompt-ready text block.
///
/// Returns an empty string when the knowledge base is entirely empty.
pub fn build_context(kb: &KnowledgeBase) -> String {
    let mut sections: Vec<String> = Vec::new();

    if let Some(summary) = &kb.syllabus_summary {
        sections.push(format!("SYLLABUS SUMMARY:\n{}", summary));
    }

    if !kb.key_dates.is_empty() {
        let mut section = String::from("KEY DATES:");
        // Chronological as stored, not re-sorted
        for key_date in &kb.key_dates {
            section.push_str(&format!("\n- {}: {}", key_date.date, key_date.description));
        }
        sections.push(section);
    }

    if !kb.policies.is_empty() {
        let mut section = String::from("COURSE POLICIES:");
        for policy in &kb.policies {
            section.push_str(&format!("\n- {}", policy));
        }
        sections.push(section);
    }

    if !kb.faqs.is_empty() {
        let mut section = String::from("FREQUENTLY ASKED QUESTIONS:");
        // Most recently created first; insertion order is creation order
        for faq in kb.faqs.iter().rev().take(MAX_CONTEXT_FAQS) {
            section.push_str(&format!("\nQ: {}\nA: {}", faq.question, faq.answer));
        }
        sections.push(section);
    }

    sections.join(&format!("\n{}\n", SECTION_SEPARATOR))
}
