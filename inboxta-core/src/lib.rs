//! # inboxta-core
//!
//! Core library for inboxta - a triage engine for course email.
//!
//! This library provides:
//! - A per-course knowledge store (FAQs, key dates, policies) with a
//!   two-tier cache over an optional durable backend
//! - Lexical FAQ similarity search
//! - A confidence-scored decision engine with model-tier escalation and an
//!   auto-reply gate
//! - A rule-based email categorizer for reviewer triage
//! - A pending/history ledger with aggregate statistics
//!
//! ## Decision flow
//!
//! An inbound question plus a course's knowledge base flow into
//! [`analyze_question`]. A near-exact FAQ match answers immediately; other
//! questions go to the configured [`CompletionService`], with one optional
//! escalation to the next cost tier when confidence is low. The resulting
//! [`Decision`](types::Decision) either clears [`should_auto_reply`] or is
//! queued for a human reviewer in the [`TriageLedger`].
//!
//! ## Example
//!
//! ```rust
//! use inboxta_core::types::FaqSource;
//! use inboxta_core::KnowledgeStore;
//!
//! let mut store = KnowledgeStore::in_memory();
//! store
//!     .add_faq(
//!         "cs101",
//!         "When is the midterm exam?".to_string(),
//!         "The midterm exam is March 15 at 2pm".to_string(),
//!         FaqSource::Manual,
//!     )
//!     .expect("in-memory store cannot fail");
//! ```

// Re-export commonly used items at the crate root
pub use categorize::{categorize_email, group_emails, GroupedEmails};
pub use config::Config;
pub use engine::{analyze_question, should_auto_reply, CompletionService, HttpCompletionService};
pub use error::{Error, Result};
pub use ledger::{CourseStats, TriageLedger};
pub use store::{KnowledgeBackend, KnowledgeStore};
pub use types::*;

// Public modules
pub mod categorize;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod search;
pub mod store;
pub mod types;
