//! Lexical FAQ similarity search
//!
//! Scores FAQs against a query by word overlap: the query is tokenized into
//! lowercase words longer than two characters, each word found as a
//! substring of the FAQ question counts double, each found in the answer
//! counts once, and the total is normalized by `word_count * 3`.
//!
//! The score is not hard-capped and repeated query words inflate it (no
//! deduplication). That is intentional: the downstream thresholds (0.8
//! short-circuit, 0.85 auto-reply) were tuned against this exact function,
//! so it must not be "fixed" quietly.

use crate::types::{Faq, KnowledgeBase};
use std::cmp::Ordering;

/// Weight of a query word found in the FAQ question.
const QUESTION_WEIGHT: f64 = 2.0;
/// Weight of a query word found in the FAQ answer.
const ANSWER_WEIGHT: f64 = 1.0;
/// Normalization factor per query word (question + answer weights capped at 3).
const PER_WORD_SCALE: f64 = 3.0;
/// Minimum word length to participate in matching.
const MIN_WORD_LEN: usize = 3;

/// An FAQ with its similarity to a query.
#[derive(Debug, Clone)]
pub struct FaqMatch {
    pub faq: Faq,
    pub similarity: f64,
}

/// Rank a knowledge base's FAQs against a query.
///
/// Returns matches with similarity > 0, sorted descending. Ties keep the
/// FAQ insertion order (stable sort).
pub fn search_faqs(kb: &KnowledgeBase, query: &str) -> Vec<FaqMatch> {
    let lowered = query.to_lowercase();
    let words: Vec<&str> = lowered
        .split_whitespace()
        .filter(|w| w.len() >= MIN_WORD_LEN)
        .collect();

    if words.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<FaqMatch> = kb
        .faqs
        .iter()
        .filter_map(|faq| {
            let similarity = score_faq(faq, &words);
            (similarity > 0.0).then(|| FaqMatch {
                faq: faq.clone(),
                similarity,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    matches
}

/// Similarity of one FAQ against pre-tokenized query words.
fn score_faq(faq: &Faq, words: &[&str]) -> f64 {
    let question = faq.question.to_lowercase();
    let answer = faq.answer.to_lowercase();

    let mut match_count = 0.0;
    for word in words {
        if question.contains(word) {
            match_count += QUESTION_WEIGHT;
        }
        if answer.contains(word) {
            match_count += ANSWER_WEIGHT;
        }
    }

    match_count / (words.len() as f64 * PER_WORD_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FaqSource;

    fn kb_with(faqs: Vec<(&str, &str)>) -> KnowledgeBase {
        let mut kb = KnowledgeBase::new("cs101");
        for (q, a) in faqs {
            kb.faqs
                .push(Faq::new(q.to_string(), a.to_string(), FaqSource::Manual));
        }
        kb
    }

    #[test]
    fn test_scores_question_hits_double() {
        let kb = kb_with(vec![("When is the midterm?", "March 15 at 2pm")]);
        let matches = search_faqs(&kb, "when is the midterm exam");

        // Words len >= 3: when, the, midterm, exam. Three hit the question
        // (2.0 each), none hit the answer: 6 / (4 * 3) = 0.5.
        assert_eq!(matches.len(), 1);
        assert!((matches[0].similarity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_full_overlap_reaches_one() {
        let kb = kb_with(vec![(
            "When is the midterm exam?",
            "The midterm exam is March 15 at 2pm, when class meets",
        )]);
        let matches = search_faqs(&kb, "when the midterm exam");

        // Every query word appears in both question and answer: 3.0 per word.
        assert!((matches[0].similarity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_words_inflate_score() {
        let kb = kb_with(vec![("When is the midterm?", "March 15")]);
        let once = search_faqs(&kb, "midterm schedule")[0].similarity;
        let twice = search_faqs(&kb, "midterm midterm")[0].similarity;
        assert!(twice > once);
    }

    #[test]
    fn test_short_words_ignored() {
        let kb = kb_with(vec![("Is it on?", "It is")]);
        assert!(search_faqs(&kb, "is it on an ok").is_empty());
    }

    #[test]
    fn test_zero_similarity_excluded() {
        let kb = kb_with(vec![
            ("When is the midterm?", "March 15"),
            ("What textbook do we use?", "None required"),
        ]);
        let matches = search_faqs(&kb, "midterm date");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].faq.question, "When is the midterm?");
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let kb = kb_with(vec![
            ("office hours monday", "room 204"),
            ("office hours tuesday", "room 204"),
        ]);
        let matches = search_faqs(&kb, "office hours");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].similarity, matches[1].similarity);
        assert_eq!(matches[0].faq.question, "office hours monday");
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let kb = kb_with(vec![("When is the midterm?", "March 15")]);
        assert!(search_faqs(&kb, "").is_empty());
        assert!(search_faqs(&kb, "a an it").is_empty());
    }
}
