use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;

use super::domain::{LeadProfile, Offer};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_PROMPT: &str = "You are an AI trained to analyze B2B lead buying intent \
by matching prospect profiles against product offerings.";

/// What the classifier layer contributes to one lead's score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentSignal {
    pub score: u8,
    pub label: String,
    pub reasoning: String,
}

impl IntentSignal {
    /// The low-confidence floor used whenever no usable classification exists.
    pub fn degraded(reasoning: impl Into<String>) -> Self {
        Self {
            score: 10,
            label: "Low".to_string(),
            reasoning: reasoning.into(),
        }
    }
}

/// Outcome of one classification attempt. The orchestrator branches on these
/// variants instead of downcasting errors: quota exhaustion switches that lead
/// to rule-only fallback, everything else degrades to a low-confidence signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifierVerdict {
    Scored(IntentSignal),
    FormatError,
    QuotaExceeded,
    Failed(String),
}

/// Seam for the external intent classification call, injectable so tests can
/// substitute canned verdicts.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, lead: &LeadProfile, offer: &Offer) -> ClassifierVerdict;
}

/// Error raised while constructing a classifier client.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier API key contains characters not valid in a header")]
    InvalidApiKey,
    #[error("failed to build classifier HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Chat-completions client for the hosted classifier.
pub struct OpenAiClassifier {
    client: Client,
    auth_header: HeaderValue,
    model: String,
    endpoint: String,
}

impl OpenAiClassifier {
    pub fn new(
        api_key: &str,
        model: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, ClassifierError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let auth = format!("Bearer {}", api_key.trim());
        let auth_header =
            HeaderValue::from_str(&auth).map_err(|_| ClassifierError::InvalidApiKey)?;
        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            auth_header,
            model: model.into(),
            endpoint,
        })
    }

    /// Build a client when credentials are configured; `None` selects the
    /// rule-based-only operating mode.
    pub fn from_config(config: &ClassifierConfig) -> Result<Option<Self>, ClassifierError> {
        match &config.api_key {
            Some(key) => Ok(Some(Self::new(key, config.model.clone(), &config.base_url)?)),
            None => Ok(None),
        }
    }
}

impl IntentClassifier for OpenAiClassifier {
    fn classify(&self, lead: &LeadProfile, offer: &Offer) -> ClassifierVerdict {
        let prompt = build_prompt(lead, offer);
        let body = ChatRequest {
            model: &self.model,
            temperature: 0.3,
            max_tokens: 150,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.auth_header.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = match self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(&body)
            .send()
        {
            Ok(response) => response,
            Err(err) => return ClassifierVerdict::Failed(format!("classifier call failed: {err}")),
        };

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return ClassifierVerdict::QuotaExceeded;
        }
        if !response.status().is_success() {
            return ClassifierVerdict::Failed(format!(
                "classifier returned {}",
                response.status()
            ));
        }

        let parsed: ChatResponse = match response.json() {
            Ok(parsed) => parsed,
            Err(err) => {
                return ClassifierVerdict::Failed(format!("unreadable classifier response: {err}"))
            }
        };

        match parsed.choices.into_iter().next() {
            Some(choice) => parse_reply(&choice.message.content),
            None => ClassifierVerdict::Failed("classifier returned no choices".to_string()),
        }
    }
}

/// Carry the full prospect profile and offer context so the classifier can
/// judge fit, and pin the reply to a single parseable line.
pub(crate) fn build_prompt(lead: &LeadProfile, offer: &Offer) -> String {
    format!(
        "Analyze this lead's buying intent for our product:\n\
         \n\
         LEAD PROFILE:\n\
         - Name: {}\n\
         - Role: {}\n\
         - Company: {}\n\
         - Industry: {}\n\
         - Location: {}\n\
         - LinkedIn Bio: {}\n\
         \n\
         OUR PRODUCT/OFFER:\n\
         - Product: {}\n\
         - Value Propositions: {}\n\
         - Ideal Customer Profile: {}\n\
         \n\
         Evaluate:\n\
         1. Does their role indicate decision-making authority?\n\
         2. Does their industry/company match our ICP?\n\
         3. Does their bio show relevant experience or pain points our product solves?\n\
         4. Overall likelihood they would be interested in our offer\n\
         \n\
         Classify their buying intent as High, Medium, or Low.\n\
         Provide 1-2 sentences explaining your classification.\n\
         \n\
         Format: Intent|Reasoning\n\
         Example: High|VP of Sales in B2B SaaS matches ICP perfectly. \
         Bio mentions scaling outreach challenges.",
        lead.name,
        lead.role,
        lead.company,
        lead.industry,
        lead.location,
        lead.linkedin_bio,
        offer.name,
        offer.value_props.join(", "),
        offer.ideal_use_cases.join(", "),
    )
}

/// Split a `Label|Explanation` reply on the first pipe. Unknown labels keep
/// their text but score at the floor; a reply with no pipe at all is a
/// contract violation reported as `FormatError`.
pub(crate) fn parse_reply(raw: &str) -> ClassifierVerdict {
    let trimmed = raw.trim();
    let Some((label, reasoning)) = trimmed.split_once('|') else {
        return ClassifierVerdict::FormatError;
    };

    let label = label.trim();
    let score = match label {
        "High" => 50,
        "Medium" => 30,
        "Low" => 10,
        _ => 10,
    };

    ClassifierVerdict::Scored(IntentSignal {
        score,
        label: label.to_string(),
        reasoning: reasoning.trim().to_string(),
    })
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: usize,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}
