//! Decision engine: confidence-scored answers with tier escalation
//!
//! [`analyze_question`] turns one inbound email plus a course knowledge base
//! into a [`Decision`]. High-similarity FAQ matches short-circuit without a
//! completion call; everything else goes to the completion service with the
//! knowledge context and a fixed JSON output contract. Completion failures
//! fold into a fail-closed low-confidence decision, never an error — the
//! visible outcome of an unconfident engine is always "routed to a human".

use crate::config::{LlmConfig, LlmProvider};
use crate::context::build_context;
use crate::error::{Error, Result};
use crate::search::{search_faqs, FaqMatch};
use crate::types::{AnalyzeOptions, Decision, EmailData, KnowledgeBase, ModelTier};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error as ThisError;

/// Similarity above which an FAQ match answers without a completion call.
pub const SHORT_CIRCUIT_SIMILARITY: f64 = 0.8;
/// Confidence assigned to short-circuited FAQ answers.
pub const SHORT_CIRCUIT_CONFIDENCE: f64 = 0.95;
/// Confidence when the model reply carried no parseable JSON.
pub const FALLBACK_CONFIDENCE: f64 = 0.5;
/// Confidence of the fail-closed decision after a completion error.
pub const ERROR_CONFIDENCE: f64 = 0.3;

/// How many FAQ matches a decision cites.
const MAX_MATCHED_FAQS: usize = 3;

const PARSE_FALLBACK_REASONING: &str = "could not parse structured response";
const ERROR_REASONING: &str = "error processing question, routing to professor for safety";

const SYSTEM_PROMPT_HEADER: &str = "You are a teaching assistant answering a student's emailed \
question using only the course knowledge provided below.\n\n\
Respond with a single JSON object, nothing else:\n\
{\"confidence\": <number between 0.0 and 1.0>, \"response\": \"<your reply to the student>\", \
\"reasoning\": \"<one sentence on how you decided>\"}\n\n\
Confidence bands:\n\
- 0.9-1.0: the answer comes directly from the course knowledge\n\
- 0.7-0.9: a reasonable inference from the course knowledge\n\
- 0.5-0.7: the knowledge only partially covers the question\n\
- 0.0-0.5: the question cannot be resolved from the knowledge";

// ============================================
// Completion service
// ============================================

/// Black-box completion capability: given prompts and a tier, return text.
///
/// The engine makes at most two sequential calls per question (original
/// plus at most one escalation), never concurrent ones. Timeouts are the
/// implementor's concern; the engine treats a single failure as terminal
/// for that attempt.
pub trait CompletionService: Send + Sync {
    fn complete(&self, system_prompt: &str, user_prompt: &str, tier: ModelTier) -> Result<String>;
}

// ============================================
// Model output parsing
// ============================================

/// Why a model reply could not be turned into a [`ParsedDecision`].
#[derive(ThisError, Debug)]
pub enum ParseError {
    /// No `{` found anywhere in the reply
    #[error("no JSON object found in model output")]
    NoJsonObject,

    /// A `{` was found but never balanced
    #[error("unbalanced JSON object in model output")]
    Unbalanced,

    /// The extracted object was not valid JSON of the expected shape
    #[error("invalid JSON in model output: {0}")]
    Json(#[from] serde_json::Error),
}

/// The structured fields the model is contracted to return.
#[derive(Debug, Deserialize)]
pub struct ParsedDecision {
    pub confidence: f64,
    pub response: String,
    #[serde(default)]
    pub reasoning: String,
}

/// Extract and parse the first balanced `{...}` object in free-form text.
///
/// Tolerates prose and code-fence wrapping around the object. The fallback
/// behavior on failure belongs to the caller.
pub fn parse_model_decision(raw: &str) -> std::result::Result<ParsedDecision, ParseError> {
    let object = extract_json_object(raw)?;
    Ok(serde_json::from_str(object)?)
}

/// Find the first balanced brace-delimited span, respecting JSON strings.
fn extract_json_object(raw: &str) -> std::result::Result<&str, ParseError> {
    let start = raw.find('{').ok_or(ParseError::NoJsonObject)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in raw[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&raw[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    Err(ParseError::Unbalanced)
}

// ============================================
// Analysis
// ============================================

/// Analyze one emailed question against a course knowledge base.
///
/// Never fails: completion-service errors produce the fail-closed
/// low-confidence decision instead of propagating.
pub fn analyze_question(
    email: &EmailData,
    kb: &KnowledgeBase,
    options: &AnalyzeOptions,
    service: &dyn CompletionService,
) -> Decision {
    let matches = search_faqs(kb, &email.body);

    // Short-circuit: a near-exact FAQ hit answers without a model call.
    // `model_used` still records the configured tier (intended cost tier,
    // not actual invocation).
    if let Some(best) = matches.first() {
        if best.similarity > SHORT_CIRCUIT_SIMILARITY {
            tracing::debug!(
                email_id = %email.id,
                faq_id = %best.faq.id,
                similarity = best.similarity,
                "FAQ short-circuit"
            );
            return Decision {
                confidence: SHORT_CIRCUIT_CONFIDENCE,
                response: best.faq.answer.clone(),
                matched_faq_ids: matched_ids(&matches),
                reasoning: format!(
                    "matched existing FAQ \"{}\" with high similarity",
                    best.faq.question
                ),
                model_used: options.model,
            };
        }
    }

    let decision = run_completion(email, kb, &matches, options.model, service);

    // Escalate once to the adjacent tier when confidence is low. The
    // escalated decision is adopted only if strictly more confident.
    if options.use_smart_model_for_low_confidence
        && decision.confidence < options.smart_model_threshold
    {
        if let Some(next_tier) = options.model.next() {
            tracing::info!(
                email_id = %email.id,
                confidence = decision.confidence,
                from_tier = %options.model,
                to_tier = %next_tier,
                "escalating low-confidence question"
            );
            let escalated = run_completion(email, kb, &matches, next_tier, service);
            if escalated.confidence > decision.confidence {
                return escalated;
            }
        }
    }

    decision
}

/// The auto-reply gate: true iff the decision clears the threshold.
pub fn should_auto_reply(decision: &Decision, threshold: f64) -> bool {
    decision.confidence >= threshold
}

/// One completion attempt at a fixed tier, folded to a Decision.
fn run_completion(
    email: &EmailData,
    kb: &KnowledgeBase,
    matches: &[FaqMatch],
    tier: ModelTier,
    service: &dyn CompletionService,
) -> Decision {
    let system_prompt = build_system_prompt(kb, matches);
    let user_prompt = build_user_prompt(email);

    match service.complete(&system_prompt, &user_prompt, tier) {
        Ok(raw) => match parse_model_decision(&raw) {
            Ok(parsed) => Decision {
                confidence: parsed.confidence.clamp(0.0, 1.0),
                response: parsed.response,
                matched_faq_ids: matched_ids(matches),
                reasoning: parsed.reasoning,
                model_used: tier,
            },
            Err(e) => {
                tracing::warn!(email_id = %email.id, error = %e, "unparseable model reply");
                Decision {
                    confidence: FALLBACK_CONFIDENCE,
                    response: raw,
                    matched_faq_ids: matched_ids(matches),
                    reasoning: PARSE_FALLBACK_REASONING.to_string(),
                    model_used: tier,
                }
            }
        },
        Err(e) => {
            tracing::warn!(email_id = %email.id, error = %e, "completion failed, failing closed");
            error_decision(email, tier, matched_ids(matches))
        }
    }
}

/// Fail-closed decision after a completion error: low confidence, templated
/// apology naming the subject, routed to the professor.
fn error_decision(email: &EmailData, tier: ModelTier, matched_faq_ids: Vec<String>) -> Decision {
    Decision {
        confidence: ERROR_CONFIDENCE,
        response: format!(
            "Thanks for your email about \"{}\". I want to make sure you get an accurate \
             answer, so I've passed your question along to the professor, who will follow \
             up with you soon.",
            email.subject
        ),
        matched_faq_ids,
        reasoning: ERROR_REASONING.to_string(),
        model_used: tier,
    }
}

fn matched_ids(matches: &[FaqMatch]) -> Vec<String> {
    matches
        .iter()
        .take(MAX_MATCHED_FAQS)
        .map(|m| m.faq.id.clone())
        .collect()
}

fn build_system_prompt(kb: &KnowledgeBase, matches: &[FaqMatch]) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT_HEADER);

    let context = build_context(kb);
    if !context.is_empty() {
        prompt.push_str("\n\nCOURSE KNOWLEDGE:\n");
        prompt.push_str(&context);
    }

    if !matches.is_empty() {
        prompt.push_str("\n\nSIMILAR PREVIOUSLY ANSWERED QUESTIONS:");
        for m in matches.iter().take(MAX_MATCHED_FAQS) {
            prompt.push_str(&format!("\nQ: {}\nA: {}", m.faq.question, m.faq.answer));
        }
    }

    prompt
}

fn build_user_prompt(email: &EmailData) -> String {
    format!(
        "From: {}\nSubject: {}\n\n{}",
        email.from, email.subject, email.body
    )
}

// ============================================
// HTTP-backed completion service
// ============================================

/// Default [`CompletionService`] over HTTP, mapping tiers to the model ids
/// configured in [`LlmConfig`].
pub struct HttpCompletionService {
    config: LlmConfig,
    endpoint: String,
    api_key: Option<String>,
    runtime: tokio::runtime::Runtime,
    http: reqwest::Client,
}

impl HttpCompletionService {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| config.provider.default_endpoint().to_string());
        let api_key = match config.provider {
            LlmProvider::Ollama => None,
            LlmProvider::Claude => config
                .api_key
                .clone()
                .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok()),
            LlmProvider::OpenAI => config
                .api_key
                .clone()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok()),
        };

        if matches!(config.provider, LlmProvider::Claude | LlmProvider::OpenAI) && api_key.is_none()
        {
            return Err(Error::Config(
                "llm.api_key (or provider env var) is required".to_string(),
            ));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Llm(format!("failed to build tokio runtime: {e}")))?;
        let timeout_secs = config.timeout_secs.max(1);
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Llm(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config: config.clone(),
            endpoint,
            api_key,
            runtime,
            http,
        })
    }
}

impl CompletionService for HttpCompletionService {
    fn complete(&self, system_prompt: &str, user_prompt: &str, tier: ModelTier) -> Result<String> {
        let model = self.config.model_for(tier);
        self.runtime.block_on(async {
            match self.config.provider {
                LlmProvider::Ollama => {
                    let url = format!("{}/api/generate", self.endpoint.trim_end_matches('/'));
                    // /api/generate has no system turn; prepend it
                    let prompt = format!("{system_prompt}\n\n{user_prompt}");
                    let resp = self
                        .http
                        .post(url)
                        .json(&json!({
                            "model": model,
                            "prompt": prompt,
                            "stream": false,
                        }))
                        .send()
                        .await
                        .map_err(|e| Error::Llm(format!("ollama request failed: {e}")))?;
                    let status = resp.status();
                    let body = resp
                        .text()
                        .await
                        .map_err(|e| Error::Llm(format!("ollama read body failed: {e}")))?;
                    if !status.is_success() {
                        return Err(Error::Llm(format!(
                            "ollama returned {}: {}",
                            status.as_u16(),
                            body
                        )));
                    }
                    let json: serde_json::Value = serde_json::from_str(&body)?;
                    json.get("response")
                        .and_then(|v| v.as_str())
                        .map(ToString::to_string)
                        .ok_or_else(|| {
                            Error::Llm("ollama response missing string field `response`".to_string())
                        })
                }
                LlmProvider::Claude => {
                    let url = format!("{}/v1/messages", self.endpoint.trim_end_matches('/'));
                    let mut headers = HeaderMap::new();
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                    headers.insert(
                        "x-api-key",
                        HeaderValue::from_str(self.api_key.as_deref().unwrap_or_default())
                            .map_err(|e| Error::Llm(format!("invalid claude api key header: {e}")))?,
                    );
                    headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));

                    let resp = self
                        .http
                        .post(url)
                        .headers(headers)
                        .json(&json!({
                            "model": model,
                            "max_tokens": 600,
                            "temperature": 0,
                            "system": system_prompt,
                            "messages": [{ "role": "user", "content": user_prompt }],
                        }))
                        .send()
                        .await
                        .map_err(|e| Error::Llm(format!("claude request failed: {e}")))?;
                    let status = resp.status();
                    let body = resp
                        .text()
                        .await
                        .map_err(|e| Error::Llm(format!("claude read body failed: {e}")))?;
                    if !status.is_success() {
                        return Err(Error::Llm(format!(
                            "claude returned {}: {}",
                            status.as_u16(),
                            body
                        )));
                    }
                    let json: serde_json::Value = serde_json::from_str(&body)?;
                    json.get("content")
                        .and_then(|v| v.as_array())
                        .and_then(|arr| arr.first())
                        .and_then(|v| v.get("text"))
                        .and_then(|v| v.as_str())
                        .map(ToString::to_string)
                        .ok_or_else(|| {
                            Error::Llm("claude response missing content[0].text".to_string())
                        })
                }
                LlmProvider::OpenAI => {
                    let url = format!(
                        "{}/v1/chat/completions",
                        self.endpoint.trim_end_matches('/')
                    );
                    let mut headers = HeaderMap::new();
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                    headers.insert(
                        AUTHORIZATION,
                        HeaderValue::from_str(&format!(
                            "Bearer {}",
                            self.api_key.as_deref().unwrap_or_default()
                        ))
                        .map_err(|e| Error::Llm(format!("invalid auth header: {e}")))?,
                    );

                    let resp = self
                        .http
                        .post(url)
                        .headers(headers)
                        .json(&json!({
                            "model": model,
                            "temperature": 0,
                            "messages": [
                                { "role": "system", "content": system_prompt },
                                { "role": "user", "content": user_prompt }
                            ]
                        }))
                        .send()
                        .await
                        .map_err(|e| Error::Llm(format!("openai request failed: {e}")))?;
                    let status = resp.status();
                    let body = resp
                        .text()
                        .await
                        .map_err(|e| Error::Llm(format!("openai read body failed: {e}")))?;
                    if !status.is_success() {
                        return Err(Error::Llm(format!(
                            "openai returned {}: {}",
                            status.as_u16(),
                            body
                        )));
                    }
                    let json: serde_json::Value = serde_json::from_str(&body)?;
                    json.get("choices")
                        .and_then(|v| v.as_array())
                        .and_then(|arr| arr.first())
                        .and_then(|v| v.get("message"))
                        .and_then(|v| v.get("content"))
                        .and_then(|v| v.as_str())
                        .map(ToString::to_string)
                        .ok_or_else(|| {
                            Error::Llm(
                                "openai response missing choices[0].message.content".to_string(),
                            )
                        })
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Faq, FaqSource};
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted completion service: pops canned results, records tiers.
    struct ScriptedService {
        responses: Mutex<VecDeque<Result<String>>>,
        calls: Mutex<Vec<ModelTier>>,
    }

    impl ScriptedService {
        fn new(responses: Vec<Result<String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_tiers(&self) -> Vec<ModelTier> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CompletionService for ScriptedService {
        fn complete(&self, _system: &str, _user: &str, tier: ModelTier) -> Result<String> {
            self.calls.lock().unwrap().push(tier);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Llm("no scripted response".to_string())))
        }
    }

    fn test_email(body: &str) -> EmailData {
        EmailData {
            id: "email-1".to_string(),
            thread_id: "thread-1".to_string(),
            from: "student@university.edu".to_string(),
            subject: "Question about the midterm".to_string(),
            body: body.to_string(),
            date: Utc::now(),
        }
    }

    fn kb_with_faq(question: &str, answer: &str) -> KnowledgeBase {
        let mut kb = KnowledgeBase::new("cs101");
        kb.faqs.push(Faq::new(
            question.to_string(),
            answer.to_string(),
            FaqSource::ProfessorApproved,
        ));
        kb
    }

    fn decision_json(confidence: f64, response: &str) -> String {
        format!(
            r#"{{"confidence": {confidence}, "response": "{response}", "reasoning": "from course knowledge"}}"#
        )
    }

    #[test]
    fn test_short_circuit_skips_completion() {
        let kb = kb_with_faq(
            "When is the midterm exam?",
            "The midterm exam is March 15 at 2pm, when class meets",
        );
        let service = ScriptedService::new(vec![]);
        let email = test_email("when is the midterm exam");

        let decision = analyze_question(&email, &kb, &AnalyzeOptions::default(), &service);

        assert_eq!(decision.confidence, SHORT_CIRCUIT_CONFIDENCE);
        assert_eq!(
            decision.response,
            "The midterm exam is March 15 at 2pm, when class meets"
        );
        assert_eq!(decision.matched_faq_ids.len(), 1);
        assert!(decision.reasoning.contains("When is the midterm exam?"));
        assert_eq!(decision.model_used, ModelTier::Mini);
        assert!(service.call_tiers().is_empty());
    }

    #[test]
    fn test_completion_decision_parsed() {
        let kb = kb_with_faq("When is the midterm?", "March 15");
        let service = ScriptedService::new(vec![Ok(decision_json(0.88, "It is on March 15."))]);
        let email = test_email("could you remind me of the schedule for the course");

        let decision = analyze_question(&email, &kb, &AnalyzeOptions::default(), &service);

        assert!((decision.confidence - 0.88).abs() < 1e-9);
        assert_eq!(decision.response, "It is on March 15.");
        assert_eq!(decision.reasoning, "from course knowledge");
        assert_eq!(service.call_tiers(), vec![ModelTier::Mini]);
    }

    #[test]
    fn test_parse_failure_falls_back_to_raw_text() {
        let kb = KnowledgeBase::new("cs101");
        let raw = "I think the answer is March 15 but I cannot be sure.";
        let service = ScriptedService::new(vec![Ok(raw.to_string())]);
        let email = test_email("when is the midterm");

        let decision = analyze_question(&email, &kb, &AnalyzeOptions::default(), &service);

        assert_eq!(decision.confidence, FALLBACK_CONFIDENCE);
        assert_eq!(decision.response, raw);
        assert_eq!(decision.reasoning, PARSE_FALLBACK_REASONING);
    }

    #[test]
    fn test_completion_error_fails_closed() {
        let kb = KnowledgeBase::new("cs101");
        let service = ScriptedService::new(vec![Err(Error::Llm("connection reset".to_string()))]);
        let email = test_email("when is the midterm");

        let decision = analyze_question(&email, &kb, &AnalyzeOptions::default(), &service);

        assert_eq!(decision.confidence, ERROR_CONFIDENCE);
        assert!(decision.response.contains("Question about the midterm"));
        assert_eq!(decision.reasoning, ERROR_REASONING);
        assert!(!should_auto_reply(&decision, 0.85));
    }

    #[test]
    fn test_escalation_adopts_strictly_better_decision() {
        let kb = KnowledgeBase::new("cs101");
        let service = ScriptedService::new(vec![
            Ok(decision_json(0.3, "Not sure.")),
            Ok(decision_json(0.8, "The syllabus says March 15.")),
        ]);
        let options = AnalyzeOptions {
            use_smart_model_for_low_confidence: true,
            ..Default::default()
        };

        let decision = analyze_question(&test_email("midterm?"), &kb, &options, &service);

        assert!((decision.confidence - 0.8).abs() < 1e-9);
        assert_eq!(decision.model_used, ModelTier::Standard);
        assert_eq!(
            service.call_tiers(),
            vec![ModelTier::Mini, ModelTier::Standard]
        );
    }

    #[test]
    fn test_escalation_never_decreases_confidence() {
        let kb = KnowledgeBase::new("cs101");
        let service = ScriptedService::new(vec![
            Ok(decision_json(0.4, "Original answer.")),
            Ok(decision_json(0.2, "Worse answer.")),
        ]);
        let options = AnalyzeOptions {
            use_smart_model_for_low_confidence: true,
            ..Default::default()
        };

        let decision = analyze_question(&test_email("midterm?"), &kb, &options, &service);

        // Retry discarded, original kept
        assert!((decision.confidence - 0.4).abs() < 1e-9);
        assert_eq!(decision.response, "Original answer.");
        assert_eq!(decision.model_used, ModelTier::Mini);
        assert_eq!(service.call_tiers().len(), 2);
    }

    #[test]
    fn test_no_escalation_past_top_tier() {
        let kb = KnowledgeBase::new("cs101");
        let service = ScriptedService::new(vec![Ok(decision_json(0.2, "Unsure."))]);
        let options = AnalyzeOptions {
            model: ModelTier::Frontier,
            use_smart_model_for_low_confidence: true,
            ..Default::default()
        };

        let decision = analyze_question(&test_email("midterm?"), &kb, &options, &service);

        assert_eq!(service.call_tiers(), vec![ModelTier::Frontier]);
        assert!((decision.confidence - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_no_escalation_when_disabled() {
        let kb = KnowledgeBase::new("cs101");
        let service = ScriptedService::new(vec![Ok(decision_json(0.2, "Unsure."))]);

        let decision =
            analyze_question(&test_email("midterm?"), &kb, &AnalyzeOptions::default(), &service);

        assert_eq!(service.call_tiers(), vec![ModelTier::Mini]);
        assert!((decision.confidence - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_clamped_to_unit_interval() {
        let kb = KnowledgeBase::new("cs101");
        let service = ScriptedService::new(vec![Ok(decision_json(1.4, "Certain."))]);

        let decision =
            analyze_question(&test_email("midterm?"), &kb, &AnalyzeOptions::default(), &service);

        assert_eq!(decision.confidence, 1.0);
    }

    #[test]
    fn test_should_auto_reply_boundary() {
        let decision = Decision {
            confidence: 0.85,
            response: "ok".to_string(),
            matched_faq_ids: vec![],
            reasoning: String::new(),
            model_used: ModelTier::Mini,
        };
        assert!(should_auto_reply(&decision, 0.85));
        assert!(!should_auto_reply(
            &Decision {
                confidence: 0.8499,
                ..decision.clone()
            },
            0.85
        ));
    }

    #[test]
    fn test_parse_accepts_code_fenced_json() {
        let raw = "Here you go:\n```json\n{\"confidence\": 0.9, \"response\": \"March 15\", \"reasoning\": \"syllabus\"}\n```";
        let parsed = parse_model_decision(raw).expect("fenced JSON should parse");
        assert_eq!(parsed.response, "March 15");
        assert!((parsed.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_parse_respects_braces_inside_strings() {
        let raw = r#"{"confidence": 0.7, "response": "use {curly} braces", "reasoning": "ok"}"#;
        let parsed = parse_model_decision(raw).expect("braces in strings should not confuse parse");
        assert_eq!(parsed.response, "use {curly} braces");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_model_decision("no json here"),
            Err(ParseError::NoJsonObject)
        ));
        assert!(matches!(
            parse_model_decision("{\"confidence\": 0.5"),
            Err(ParseError::Unbalanced)
        ));
        assert!(matches!(
            parse_model_decision("{\"confidence\": \"not a number\"}"),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn test_prompt_contains_context_and_similar_pairs() {
        let mut kb = kb_with_faq("When is the midterm?", "March 15");
        kb.syllabus_summary = Some("Intro to algorithms".to_string());
        let matches = search_faqs(&kb, "midterm date please");

        let prompt = build_system_prompt(&kb, &matches);
        assert!(prompt.contains("COURSE KNOWLEDGE:"));
        assert!(prompt.contains("Intro to algorithms"));
        assert!(prompt.contains("SIMILAR PREVIOUSLY ANSWERED QUESTIONS:"));
        assert!(prompt.contains("Q: When is the midterm?"));
    }
}
