//! Knowledge store: per-course knowledge bases behind a two-tier cache
//!
//! All reads and writes go through an in-process cache keyed by course id,
//! optionally backed by a durable [`KnowledgeBackend`]. With no backend
//! configured the cache *is* the store — an explicit capability-degradation
//! mode used for ephemeral and test contexts, not an error.
//!
//! Consistency: writes update the cache synchronously and the backend
//! best-effort. A backend write error is propagated so the caller can warn
//! the user, but the cache already reflects the change, so subsequent reads
//! in the same process see it. A backend read error falls back to the cache
//! rather than failing the caller.
//!
//! The cache is a plain map with no locking; concurrent writers to the same
//! course race and the last write wins. The backend is the source of truth
//! and writes are idempotent upserts.

use crate::error::Result;
use crate::search::{search_faqs, FaqMatch};
use crate::types::{Faq, FaqSource, KeyDate, KnowledgeBase};
use std::collections::HashMap;

/// Durable storage contract for knowledge bases.
///
/// Implemented by whatever persistence the host application uses; the core
/// only needs read/write of whole knowledge bases.
pub trait KnowledgeBackend: Send + Sync {
    /// Read a course's knowledge base, `None` when the course has none yet.
    fn read(&self, course_id: &str) -> Result<Option<KnowledgeBase>>;

    /// Upsert a course's knowledge base. May fail transiently.
    fn write(&self, course_id: &str, kb: &KnowledgeBase) -> Result<()>;
}

/// Cached knowledge-base store with an optional durable backend.
pub struct KnowledgeStore {
    cache: HashMap<String, KnowledgeBase>,
    backend: Option<Box<dyn KnowledgeBackend>>,
}

impl KnowledgeStore {
    /// Cache-only store. The cache is the store; nothing is persisted.
    pub fn in_memory() -> Self {
        Self {
            cache: HashMap::new(),
            backend: None,
        }
    }

    /// Store backed by durable storage, with the cache in front.
    pub fn with_backend(backend: Box<dyn KnowledgeBackend>) -> Self {
        Self {
            cache: HashMap::new(),
            backend: Some(backend),
        }
    }

    /// True when a durable backend is configured.
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Get a course's knowledge base, `None` when the course has none.
    ///
    /// Backend read errors degrade to a cache-only answer.
    pub fn get(&mut self, course_id: &str) -> Result<Option<KnowledgeBase>> {
        if let Some(kb) = self.cache.get(course_id) {
            return Ok(Some(kb.clone()));
        }

        if let Some(backend) = &self.backend {
            match backend.read(course_id) {
                Ok(Some(kb)) => {
                    self.cache.insert(course_id.to_string(), kb.clone());
                    return Ok(Some(kb));
                }
                Ok(None) => return Ok(None),
                Err(e) => {
                    tracing::warn!(
                        course_id,
                        error = %e,
                        "backend read failed, falling back to cache"
                    );
                    return Ok(None);
                }
            }
        }

        Ok(None)
    }

    /// Upsert a knowledge base.
    ///
    /// The cache is updated first; a backend write error is propagated but
    /// the cached copy stays in place.
    pub fn save(&mut self, kb: KnowledgeBase) -> Result<()> {
        let course_id = kb.course_id.clone();
        self.cache.insert(course_id.clone(), kb);

        if let Some(backend) = &self.backend {
            // Cache insert above makes the write visible in-process even
            // when persistence fails.
            let kb = &self.cache[&course_id];
            backend.write(&course_id, kb)?;
        }

        Ok(())
    }

    /// Add an FAQ to a course, creating the knowledge base if needed.
    pub fn add_faq(
        &mut self,
        course_id: &str,
        question: String,
        answer: String,
        source: FaqSource,
    ) -> Result<Faq> {
        let mut kb = self
            .get(course_id)?
            .unwrap_or_else(|| KnowledgeBase::new(course_id));
        let faq = Faq::new(question, answer, source);
        kb.faqs.push(faq.clone());
        self.save(kb)?;

        tracing::debug!(course_id, faq_id = %faq.id, "added FAQ");
        Ok(faq)
    }

    /// Edit an FAQ's question and/or answer text.
    ///
    /// Returns `Ok(false)` when the course or FAQ does not exist.
    pub fn update_faq(
        &mut self,
        course_id: &str,
        faq_id: &str,
        question: Option<String>,
        answer: Option<String>,
    ) -> Result<bool> {
        let Some(mut kb) = self.get(course_id)? else {
            return Ok(false);
        };
        let Some(faq) = kb.faqs.iter_mut().find(|f| f.id == faq_id) else {
            return Ok(false);
        };

        if let Some(question) = question {
            faq.question = question;
        }
        if let Some(answer) = answer {
            faq.answer = answer;
        }
        self.save(kb)?;
        Ok(true)
    }

    /// Remove an FAQ. Returns `Ok(false)` when the course or FAQ is absent.
    pub fn remove_faq(&mut self, course_id: &str, faq_id: &str) -> Result<bool> {
        let Some(mut kb) = self.get(course_id)? else {
            return Ok(false);
        };
        let before = kb.faqs.len();
        kb.faqs.retain(|f| f.id != faq_id);
        if kb.faqs.len() == before {
            return Ok(false);
        }
        self.save(kb)?;
        Ok(true)
    }

    /// Set the syllabus summary, creating the knowledge base if needed.
    pub fn update_syllabus_summary(&mut self, course_id: &str, summary: String) -> Result<()> {
        let mut kb = self
            .get(course_id)?
            .unwrap_or_else(|| KnowledgeBase::new(course_id));
        kb.syllabus_summary = Some(summary);
        self.save(kb)
    }

    /// Append a key date, creating the knowledge base if needed.
    pub fn add_key_date(&mut self, course_id: &str, date: String, description: String) -> Result<()> {
        let mut kb = self
            .get(course_id)?
            .unwrap_or_else(|| KnowledgeBase::new(course_id));
        kb.key_dates.push(KeyDate { date, description });
        self.save(kb)
    }

    /// Append a policy, creating the knowledge base if needed.
    pub fn add_policy(&mut self, course_id: &str, policy: String) -> Result<()> {
        let mut kb = self
            .get(course_id)?
            .unwrap_or_else(|| KnowledgeBase::new(course_id));
        kb.policies.push(policy);
        self.save(kb)
    }

    /// List a course's FAQs in insertion order (empty when the course has none).
    pub fn list_faqs(&mut self, course_id: &str) -> Result<Vec<Faq>> {
        Ok(self.get(course_id)?.map(|kb| kb.faqs).unwrap_or_default())
    }

    /// Rank a course's FAQs against a query (empty when the course has none).
    pub fn search(&mut self, course_id: &str, query: &str) -> Result<Vec<FaqMatch>> {
        Ok(self
            .get(course_id)?
            .map(|kb| search_faqs(&kb, query))
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Backend whose reads always fail and whose writes can be toggled to fail.
    struct FlakyBackend {
        fail_reads: bool,
        fail_writes: bool,
        writes: AtomicUsize,
        stored: Mutex<HashMap<String, KnowledgeBase>>,
    }

    impl FlakyBackend {
        fn new(fail_reads: bool, fail_writes: bool) -> Self {
            Self {
                fail_reads,
                fail_writes,
                writes: AtomicUsize::new(0),
                stored: Mutex::new(HashMap::new()),
            }
        }
    }

    impl KnowledgeBackend for FlakyBackend {
        fn read(&self, course_id: &str) -> Result<Option<KnowledgeBase>> {
            if self.fail_reads {
                return Err(Error::Store("read unavailable".to_string()));
            }
            Ok(self.stored.lock().unwrap().get(course_id).cloned())
        }

        fn write(&self, course_id: &str, kb: &KnowledgeBase) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes {
                return Err(Error::Store("write unavailable".to_string()));
            }
            self.stored
                .lock()
                .unwrap()
                .insert(course_id.to_string(), kb.clone());
            Ok(())
        }
    }

    #[test]
    fn test_in_memory_crud() {
        let mut store = KnowledgeStore::in_memory();
        assert!(!store.has_backend());
        assert!(store.get("cs101").unwrap().is_none());

        let faq = store
            .add_faq(
                "cs101",
                "When is the midterm?".to_string(),
                "March 15 at 2pm".to_string(),
                FaqSource::Manual,
            )
            .unwrap();

        let kb = store.get("cs101").unwrap().unwrap();
        assert_eq!(kb.course_id, "cs101");
        assert_eq!(kb.faqs.len(), 1);
        assert_eq!(kb.faqs[0].id, faq.id);

        assert!(store
            .update_faq(
                "cs101",
                &faq.id,
                None,
                Some("March 15 at 2pm in Hall B".to_string()),
            )
            .unwrap());
        let faqs = store.list_faqs("cs101").unwrap();
        assert_eq!(faqs[0].answer, "March 15 at 2pm in Hall B");
        assert_eq!(faqs[0].question, "When is the midterm?");

        assert!(store.remove_faq("cs101", &faq.id).unwrap());
        assert!(store.list_faqs("cs101").unwrap().is_empty());
    }

    #[test]
    fn test_search_through_store() {
        let mut store = KnowledgeStore::in_memory();
        assert!(store.search("cs101", "midterm date").unwrap().is_empty());

        store
            .add_faq(
                "cs101",
                "When is the midterm?".to_string(),
                "March 15".to_string(),
                FaqSource::Manual,
            )
            .unwrap();
        let matches = store.search("cs101", "midterm date").unwrap();
        assert_eq!(matches.len(), 1);
        assert!(matches[0].similarity > 0.0);
    }

    #[test]
    fn test_missing_faq_is_false_not_error() {
        let mut store = KnowledgeStore::in_memory();
        assert!(!store.update_faq("cs101", "nope", None, None).unwrap());
        assert!(!store.remove_faq("cs101", "nope").unwrap());

        store
            .add_policy("cs101", "No late submissions".to_string())
            .unwrap();
        assert!(!store.remove_faq("cs101", "nope").unwrap());
    }

    #[test]
    fn test_faq_order_is_insertion_order() {
        let mut store = KnowledgeStore::in_memory();
        for i in 0..5 {
            store
                .add_faq(
                    "cs101",
                    format!("question {}", i),
                    format!("answer {}", i),
                    FaqSource::Manual,
                )
                .unwrap();
        }
        let faqs = store.list_faqs("cs101").unwrap();
        let questions: Vec<_> = faqs.iter().map(|f| f.question.as_str()).collect();
        assert_eq!(
            questions,
            vec![
                "question 0",
                "question 1",
                "question 2",
                "question 3",
                "question 4"
            ]
        );
    }

    #[test]
    fn test_backend_read_failure_falls_back_to_cache() {
        let mut store = KnowledgeStore::with_backend(Box::new(FlakyBackend::new(true, true)));

        // Cold read degrades to "not found" instead of erroring
        assert!(store.get("cs101").unwrap().is_none());

        // Write errors propagate but the cache keeps the change
        let err = store.update_syllabus_summary("cs101", "Intro to CS".to_string());
        assert!(err.is_err());
        let kb = store.get("cs101").unwrap().unwrap();
        assert_eq!(kb.syllabus_summary.as_deref(), Some("Intro to CS"));
    }

    #[test]
    fn test_backend_round_trip() {
        let mut store = KnowledgeStore::with_backend(Box::new(FlakyBackend::new(false, false)));
        store
            .add_key_date("cs101", "2026-03-15".to_string(), "Midterm".to_string())
            .unwrap();

        // Fresh store over the same backend sees the write
        let backend = match store.backend.take() {
            Some(b) => b,
            None => unreachable!(),
        };
        let mut fresh = KnowledgeStore::with_backend(backend);
        let kb = fresh.get("cs101").unwrap().unwrap();
        assert_eq!(kb.key_dates.len(), 1);
        assert_eq!(kb.key_dates[0].description, "Midterm");
    }
}
