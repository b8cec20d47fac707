//! AI trend summary for blood pressure readings.
//!
//! The readings are rendered into a plain-text prompt and sent to a text
//! generation backend. The backend sits behind [`TextGenerator`] so the
//! service logic (preconditions, single-flight, cancellation, prompt
//! shape) is testable without network access.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use salud_facil_data::models::BloodPressureReading;

use crate::i18n::{self, Language};

/// Minimum number of readings before an analysis is meaningful.
pub const MIN_READINGS: usize = 5;

/// Only the most recent readings go into the prompt.
const PROMPT_READING_LIMIT: usize = 20;

const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-04-17";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("need at least {needed} readings for an analysis, have {have}")]
    NotEnoughReadings { needed: usize, have: usize },

    #[error("an analysis is already running")]
    Busy,

    #[error("no API key configured (set GEMINI_API_KEY or API_KEY)")]
    MissingApiKey,

    #[error("request to the analysis backend failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("analysis backend returned status {0}")]
    UpstreamStatus(u16),

    #[error("analysis backend returned no text")]
    EmptyResponse,

    #[error("analysis was cancelled")]
    Cancelled,
}

/// Seam for the text generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt` under `system_instruction`.
    async fn generate(
        &self,
        system_instruction: &str,
        prompt: &str,
    ) -> Result<String, AnalysisError>;
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Read the API key from `GEMINI_API_KEY`, falling back to `API_KEY`.
    pub fn from_env() -> Result<Self, AnalysisError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| AnalysisError::MissingApiKey)?;
        if api_key.is_empty() {
            return Err(AnalysisError::MissingApiKey);
        }
        Ok(Self::new(api_key))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        system_instruction: &str,
        prompt: &str,
    ) -> Result<String, AnalysisError> {
        let url = format!(
            "{API_BASE}/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "systemInstruction": { "parts": [{ "text": system_instruction }] },
        });

        debug!("Requesting analysis from model {}", self.model);
        let response = self.http.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            error!("Analysis backend returned status {}", status);
            return Err(AnalysisError::UpstreamStatus(status.as_u16()));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Analysis service: at most one analysis in flight at a time.
pub struct AnalysisService {
    generator: Arc<dyn TextGenerator>,
    busy: AtomicBool,
}

/// Clears the busy flag on every exit path, including cancellation.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl AnalysisService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            busy: AtomicBool::new(false),
        }
    }

    /// Whether an analysis is currently running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Run an analysis over `readings`, in the user's language.
    ///
    /// Fails fast with [`AnalysisError::NotEnoughReadings`] below the
    /// minimum and [`AnalysisError::Busy`] while another analysis runs.
    /// Cancelling the token abandons the request and frees the service
    /// for the next call.
    pub async fn analyze(
        &self,
        readings: &[BloodPressureReading],
        lang: Language,
        cancel: CancellationToken,
    ) -> Result<String, AnalysisError> {
        if readings.len() < MIN_READINGS {
            return Err(AnalysisError::NotEnoughReadings {
                needed: MIN_READINGS,
                have: readings.len(),
            });
        }
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(AnalysisError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        let prompt = build_prompt(readings, lang);
        let instruction = system_instruction(lang);

        tokio::select! {
            _ = cancel.cancelled() => Err(AnalysisError::Cancelled),
            result = self.generator.generate(&instruction, &prompt) => result,
        }
    }
}

/// Render the last readings into one line each:
/// `31/01/2024: 128/82 mmHg, 66 bpm. Notes: N/A`.
fn build_prompt(readings: &[BloodPressureReading], lang: Language) -> String {
    let start = readings.len().saturating_sub(PROMPT_READING_LIMIT);
    let lines: Vec<String> = readings[start..]
        .iter()
        .map(|r| {
            let date = r
                .date
                .get(..10)
                .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
                .map(|day| i18n::format_date(lang, day))
                .unwrap_or_else(|| r.date.clone());
            let notes = if r.notes.is_empty() { "N/A" } else { &r.notes };
            format!(
                "{date}: {}/{} mmHg, {} bpm. Notes: {notes}",
                r.systolic, r.diastolic, r.pulse
            )
        })
        .collect();

    format!(
        "Please analyze these blood pressure readings:\n{}",
        lines.join("\n")
    )
}

fn system_instruction(lang: Language) -> String {
    format!(
        "You are a helpful health assistant. Your role is to analyze blood pressure data \
         provided by a user and present observations in a clear, easy-to-understand, and \
         neutral way. You MUST NOT provide medical advice, diagnoses, or treatment \
         recommendations. Your analysis should focus only on identifying patterns, trends, \
         and notable points within the data provided. Your entire response must be in the \
         language: {}. Use markdown for formatting, like bullet points.",
        lang.code()
    )
}

/// Split a generated summary into bullet lines, stripping markdown list
/// markers. Lines without a marker are kept as-is; blank lines vanish.
pub fn summary_bullets(summary: &str) -> Vec<String> {
    summary
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.trim_start_matches(['-', '*', '•'])
                .trim_start()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Notify;

    fn reading(date: &str, systolic: u16, notes: &str) -> BloodPressureReading {
        BloodPressureReading {
            id: 1,
            systolic,
            diastolic: 80,
            pulse: 66,
            notes: notes.to_string(),
            date: date.to_string(),
            reminder_time: String::new(),
            reminder_days: Vec::new(),
        }
    }

    fn five_readings() -> Vec<BloodPressureReading> {
        (1..=5)
            .map(|day| reading(&format!("2024-01-0{day}T08:00:00.000Z"), 120 + day, ""))
            .collect()
    }

    struct FixedGenerator(String);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _: &str, _: &str) -> Result<String, AnalysisError> {
            Ok(self.0.clone())
        }
    }

    /// Blocks until released, to hold the service busy from tests.
    struct BlockingGenerator {
        release: Arc<Notify>,
    }

    #[async_trait]
    impl TextGenerator for BlockingGenerator {
        async fn generate(&self, _: &str, _: &str) -> Result<String, AnalysisError> {
            self.release.notified().await;
            Ok("done".to_string())
        }
    }

    #[tokio::test]
    async fn too_few_readings_fail_fast() {
        let service = AnalysisService::new(Arc::new(FixedGenerator("ok".into())));
        let readings = vec![reading("2024-01-01T08:00:00Z", 120, "")];
        let err = service
            .analyze(&readings, Language::Es, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::NotEnoughReadings { needed: 5, have: 1 }
        ));
    }

    #[tokio::test]
    async fn second_analysis_while_busy_is_rejected() {
        let release = Arc::new(Notify::new());
        let service = Arc::new(AnalysisService::new(Arc::new(BlockingGenerator {
            release: release.clone(),
        })));

        let running = {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .analyze(&five_readings(), Language::Es, CancellationToken::new())
                    .await
            })
        };

        // Wait for the first call to take the busy flag.
        while !service.is_busy() {
            tokio::task::yield_now().await;
        }

        let err = service
            .analyze(&five_readings(), Language::Es, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Busy));

        release.notify_one();
        assert_eq!(running.await.unwrap().unwrap(), "done");
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn cancellation_frees_the_service() {
        let service = AnalysisService::new(Arc::new(BlockingGenerator {
            release: Arc::new(Notify::new()),
        }));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = service
            .analyze(&five_readings(), Language::Es, cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Cancelled));
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn prompt_carries_only_the_last_twenty_readings() {
        let readings: Vec<BloodPressureReading> = (1..=25)
            .map(|i| {
                reading(
                    &format!("2024-01-{:02}T08:00:00.000Z", (i % 28) + 1),
                    100 + i as u16,
                    "",
                )
            })
            .collect();
        let prompt = build_prompt(&readings, Language::Es);
        // 1 header line + 20 reading lines.
        assert_eq!(prompt.lines().count(), 21);
        assert!(!prompt.contains("105/80"));
        assert!(prompt.contains("125/80"));
    }

    #[test]
    fn prompt_lines_use_localized_dates_and_na_for_empty_notes() {
        let readings = vec![
            reading("2024-01-31T08:00:00.000Z", 128, ""),
            reading("2024-02-01T09:00:00.000Z", 130, "tras el café"),
        ];
        let prompt = build_prompt(&readings, Language::De);
        assert!(prompt.contains("31.01.2024: 128/80 mmHg, 66 bpm. Notes: N/A"));
        assert!(prompt.contains("01.02.2024: 130/80 mmHg, 66 bpm. Notes: tras el café"));
    }

    #[test]
    fn system_instruction_names_the_language() {
        assert!(system_instruction(Language::It).contains("language: it"));
    }

    #[test]
    fn bullets_strip_markers_and_blanks() {
        let summary = "- first point\n\n* second point\n  • third\nplain line\n- \n";
        assert_eq!(
            summary_bullets(summary),
            vec!["first point", "second point", "third", "plain line"]
        );
    }
}
