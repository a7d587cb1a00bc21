//! Plain-English explanations from an external text-generation service.
//!
//! Narration is best effort. The engine catches every [`NarrationError`] and
//! substitutes the fixed fallback text defined here, so a flaky or missing
//! service never fails a diagnosis.

use std::future::Future;

use serde::{Deserialize, Serialize};

use super::domain::{BusinessMetrics, ScoreBreakdown, SliderImpact, SliderKey, SliderStatus};
use super::simulation::SliderDeltas;
use crate::config::NarratorConfig;

pub const FALLBACK_EXPLANATION: &str = "Your health score combines how well your cash covers \
wages and loan repayments, how quickly your stock sells, and how your debts compare to what \
you own. A detailed explanation is not available right now, so use the breakdown above to \
see where the points were won and lost.";

pub const FALLBACK_BENEFITS: &str = "These changes would put your business on a steadier footing.";

pub const STEADY_STATE_BENEFIT: &str =
    "Keep up your current habits to maintain your business stability.";

const DIAGNOSIS_SYSTEM: &str = "You are a warm, plain-English business coach for non-experts.";
const SIMULATION_SYSTEM: &str = "You are a supportive business mentor who speaks in plain English.";
const PLAN_SYSTEM: &str = "You are a professional business mentor who simplifies complex finance.";
const TEMPERATURE: f32 = 0.4;

#[derive(Debug, thiserror::Error)]
pub enum NarrationError {
    #[error("no API key configured for the text-generation service")]
    MissingApiKey,
    #[error("text-generation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("text-generation service answered with status {0}")]
    Status(u16),
    #[error("text-generation service returned no text")]
    EmptyResponse,
    #[error("action plan was not valid JSON: {0}")]
    MalformedPlan(String),
}

/// Which prompt to use for an explanation.
#[derive(Debug, Clone, PartialEq)]
pub enum NarrationMode {
    Diagnosis,
    Simulation {
        previous_score: Option<u8>,
        adjustments: SliderDeltas,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NarrationRequest {
    pub health_score: u8,
    pub breakdown: ScoreBreakdown,
    pub impacts: Vec<SliderImpact>,
    pub sector: String,
    pub currency: String,
    pub mode: NarrationMode,
}

impl NarrationRequest {
    pub fn is_simulation(&self) -> bool {
        matches!(self.mode, NarrationMode::Simulation { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub score: u8,
    pub metrics: BusinessMetrics,
    pub impacts: Vec<SliderImpact>,
}

/// Three concrete steps and three longer-term tips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    #[serde(default)]
    pub action_steps: Vec<String>,
    #[serde(default)]
    pub growth_tips: Vec<String>,
}

impl ActionPlan {
    /// Static plan built from the sliders that still need work.
    pub fn fallback(impacts: &[SliderImpact]) -> Self {
        let mut action_steps: Vec<String> = impacts
            .iter()
            .filter(|impact| impact.status == SliderStatus::NeedsImprovement)
            .take(3)
            .map(|impact| suggestion(impact.key).to_string())
            .collect();
        if action_steps.is_empty() {
            action_steps.push(
                "Keep your current habits, every area of the business is already in great shape."
                    .to_string(),
            );
        }

        Self {
            action_steps,
            growth_tips: vec![
                "Review your numbers every month so small problems never grow into big ones."
                    .to_string(),
                "Keep a cash cushion that covers at least one month of wages.".to_string(),
                "Grow slowly and borrow only for things that will pay for themselves.".to_string(),
            ],
        }
    }
}

fn suggestion(key: SliderKey) -> &'static str {
    match key {
        SliderKey::InventoryDays => {
            "Sell slow-moving stock sooner so less of your money sits on the shelf."
        }
        SliderKey::MonthlyCashSurplus => {
            "Set aside a fixed share of every sale to build more cash on hand."
        }
        SliderKey::MonthlyWages => {
            "Match staff schedules to your busiest hours to ease wage costs."
        }
        SliderKey::MonthlyLoanPayment => {
            "Ask your lender about terms that lower your monthly repayment."
        }
        SliderKey::TotalAssets => "Put spare cash into equipment or stock that earns its keep.",
        SliderKey::TotalDebt => "Pay down your most expensive debt first to lighten what you owe.",
    }
}

/// External text generator. Calls are single shot; callers own the fallback.
pub trait Narrator: Send + Sync {
    fn explain(
        &self,
        request: &NarrationRequest,
    ) -> impl Future<Output = Result<String, NarrationError>> + Send;

    fn action_plan(
        &self,
        request: &PlanRequest,
    ) -> impl Future<Output = Result<ActionPlan, NarrationError>> + Send;
}

/// `"Cash Position: 25/25, Profit Margin: 10/30, ..."`
pub fn breakdown_phrases(breakdown: &ScoreBreakdown) -> String {
    breakdown
        .entries()
        .iter()
        .map(|(_, score)| format!("{}: {}/{}", score.label, score.current, score.max))
        .collect::<Vec<_>>()
        .join(", ")
}

fn impact_phrases(impacts: &[SliderImpact]) -> String {
    impacts
        .iter()
        .map(|impact| {
            let status = match impact.status {
                SliderStatus::Optimal => "optimal",
                SliderStatus::NeedsImprovement => "needs_improvement",
            };
            format!(
                "{} ({:.0}% of impact, {status})",
                impact.label,
                impact.impact_share * 100.0
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn diagnosis_prompt(request: &NarrationRequest) -> String {
    format!(
        "A business owner in the {sector} sector scored {score}/100.\n\
         \n\
         PERFORMANCE DATA: {breakdown}\n\
         IMPACT ANALYSIS: {impacts}\n\
         \n\
         Write one friendly, encouraging paragraph in simple English of at most 70 words. \
         Describe the score of {score}/100 with a simple analogy, praise the strongest area, \
         explain which weak area is pulling the score down, and suggest one practical action \
         for a metric marked needs_improvement. Never suggest changing a metric marked optimal. \
         If every metric is optimal, congratulate them and advise keeping their habits. \
         No financial jargon, no bullet points, no lists. Say \"cash on hand\" instead of \
         \"cash surplus\" and \"stock\" instead of \"inventory\".",
        sector = request.sector,
        score = request.health_score,
        breakdown = breakdown_phrases(&request.breakdown),
        impacts = impact_phrases(&request.impacts),
    )
}

pub fn simulation_prompt(request: &NarrationRequest) -> String {
    let (previous, adjustments) = match &request.mode {
        NarrationMode::Simulation {
            previous_score,
            adjustments,
        } => (*previous_score, adjustments.clone()),
        NarrationMode::Diagnosis => (None, SliderDeltas::new()),
    };
    let changes = adjustments
        .iter()
        .map(|(key, percent)| format!("{} {:+.0}%", key.label(), percent))
        .collect::<Vec<_>>()
        .join(", ");
    let score_change = match previous {
        Some(previous) => format!("from {previous} to {}", request.health_score),
        None => format!("to {}", request.health_score),
    };

    format!(
        "Business sector: {sector}\n\
         Score change: {score_change}\n\
         Changes applied: {changes}\n\
         Currency: {currency}\n\
         Performance after the change: {breakdown}\n\
         \n\
         Give exactly 3 benefits of these changes, one per line. Each benefit is one warm, \
         plain-English sentence of at most 20 words about how it helps the owner sleep better \
         or grow the business. No introduction, no numbering, no bullet points, no jargon.",
        sector = request.sector,
        currency = request.currency,
        breakdown = breakdown_phrases(&request.breakdown),
    )
}

pub fn plan_prompt(request: &PlanRequest) -> String {
    let currency = request.metrics.currency_label();
    let state = serde_json::to_string(&request.metrics).unwrap_or_default();

    format!(
        "You are coaching a small business in the {sector} sector.\n\
         Their simulated state: {state} ({currency}).\n\
         The target score is {score}/100.\n\
         IMPACT ANALYSIS: {impacts}\n\
         \n\
         Return ONLY a JSON object of the form \
         {{\"action_steps\": [3 strings], \"growth_tips\": [3 strings]}}. \
         Each entry is at most 20 words of simple, warm English with no emojis and no jargon. \
         Mention the currency ({currency}) with every money amount. Call inventory days \
         \"days your stock sits on the shelf\". Only suggest improvements for metrics marked \
         needs_improvement; for metrics marked optimal, congratulate the owner and tell them \
         to maintain it.",
        sector = request.metrics.sector_label(),
        score = request.score,
        impacts = impact_phrases(&request.impacts),
    )
}

/// Turns free-form benefit text into at most three clean sentences.
pub fn parse_benefits(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            line.trim_start_matches(|c: char| {
                c == '*' || c == '-' || c == '.' || c.is_ascii_digit() || c.is_whitespace()
            })
            .trim()
            .to_string()
        })
        .filter(|line| line.chars().count() > 5)
        .take(3)
        .collect()
}

/// OpenAI-compatible chat-completions client (Groq by default).
pub struct ChatNarrator {
    client: reqwest::Client,
    config: NarratorConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatNarrator {
    pub fn new(config: NarratorConfig) -> Result<Self, NarrationError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        json_mode: bool,
    ) -> Result<String, NarrationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(NarrationError::MissingApiKey)?;

        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            response_format: json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NarrationError::Status(status.as_u16()));
        }

        let reply: ChatResponse = response.json().await?;
        let text = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            Err(NarrationError::EmptyResponse)
        } else {
            Ok(text)
        }
    }
}

impl Narrator for ChatNarrator {
    async fn explain(&self, request: &NarrationRequest) -> Result<String, NarrationError> {
        if request.is_simulation() {
            self.complete(SIMULATION_SYSTEM, &simulation_prompt(request), false)
                .await
        } else {
            self.complete(DIAGNOSIS_SYSTEM, &diagnosis_prompt(request), false)
                .await
        }
    }

    async fn action_plan(&self, request: &PlanRequest) -> Result<ActionPlan, NarrationError> {
        let text = self
            .complete(PLAN_SYSTEM, &plan_prompt(request), true)
            .await?;
        serde_json::from_str(&text).map_err(|err| NarrationError::MalformedPlan(err.to_string()))
    }
}
