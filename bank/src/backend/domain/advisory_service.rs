//! Gateway to the generative advisory service.
//!
//! The gateway builds prompts, calls whatever `AdvisoryClient` is plugged in
//! and parses the answer. Every failure degrades to a placeholder: a fixed
//! message, an empty suggestion list or a zero score. Nothing here touches
//! the ledger, and an analysis never decides a proof.

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use shared::TransactionType;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::domain::errors::AdvisoryError;
use crate::backend::domain::models::{TaskDraft, Transaction};

pub const REPORT_EMPTY_FALLBACK: &str = "目前無法生成報告。";
pub const REPORT_UNAVAILABLE_FALLBACK: &str = "AI 服務目前無法使用，請檢查您的網路連線。";
pub const ANALYSIS_EMPTY_COMMENT: &str = "無法分析圖片";
pub const ANALYSIS_UNAVAILABLE_COMMENT: &str = "AI 視覺分析暫時無法使用";

const MIN_SUGGESTED_REWARD: u32 = 5;
const MAX_SUGGESTED_REWARD: u32 = 30;
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Base64 image sent alongside a prompt
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    /// Accepts raw base64 or a `data:image/...;base64,` URL
    pub fn from_data_url(image: &str) -> Self {
        if let Some(rest) = image.strip_prefix("data:") {
            if let Some((mime_type, data)) = rest.split_once(";base64,") {
                if mime_type.starts_with("image/") {
                    return Self { mime_type: mime_type.to_string(), data: data.to_string() };
                }
            }
        }
        Self { mime_type: DEFAULT_IMAGE_MIME.to_string(), data: image.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryRequest {
    pub prompt: String,
    pub image: Option<InlineImage>,
    /// Ask the model for a JSON body
    pub expects_json: bool,
}

/// Transport to a text-generation model. `Ok(None)` means the model answered
/// with no text.
#[async_trait]
pub trait AdvisoryClient: Send + Sync {
    async fn generate(&self, request: AdvisoryRequest) -> Result<Option<String>, AdvisoryError>;
}

/// Client used when no model is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableAdvisoryClient;

#[async_trait]
impl AdvisoryClient for UnavailableAdvisoryClient {
    async fn generate(&self, _request: AdvisoryRequest) -> Result<Option<String>, AdvisoryError> {
        Err(AdvisoryError::Unavailable("no advisory client configured".to_string()))
    }
}

/// Likelihood that a photo shows the task done. Advisory only.
#[derive(Debug, Clone, PartialEq)]
pub struct ProofAssessment {
    pub score: u8,
    pub comment: String,
}

#[derive(Deserialize)]
struct RawAssessment {
    score: Value,
    #[serde(default)]
    comment: String,
}

#[derive(Clone)]
pub struct AdvisoryService {
    client: Arc<dyn AdvisoryClient>,
    timeout: Duration,
}

impl AdvisoryService {
    pub fn new(client: Arc<dyn AdvisoryClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Short coaching summary of a child's activity
    pub async fn generate_report(&self, child_name: &str, transactions: &[Transaction]) -> String {
        let request = AdvisoryRequest {
            prompt: report_prompt(child_name, transactions),
            image: None,
            expects_json: false,
        };
        match self.call(request).await {
            Ok(Some(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => REPORT_EMPTY_FALLBACK.to_string(),
            Err(e) => {
                warn!("Report for {} unavailable: {}", child_name, e);
                REPORT_UNAVAILABLE_FALLBACK.to_string()
            }
        }
    }

    /// Up to three task ideas for the given interest
    pub async fn suggest_tasks(&self, interest: &str) -> Vec<TaskDraft> {
        let request = AdvisoryRequest {
            prompt: suggestion_prompt(interest),
            image: None,
            expects_json: true,
        };
        let text = match self.call(request).await {
            Ok(Some(text)) => text,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Task suggestions unavailable: {}", e);
                return Vec::new();
            }
        };
        match parse_suggestions(&text) {
            Ok(drafts) => {
                debug!("Received {} task suggestions for '{}'", drafts.len(), interest);
                drafts
            }
            Err(e) => {
                warn!("Discarding task suggestions: {}", e);
                Vec::new()
            }
        }
    }

    /// Score a proof photo against the task it claims to complete
    pub async fn analyze_proof(&self, image: &str, task_title: &str) -> ProofAssessment {
        let request = AdvisoryRequest {
            prompt: analysis_prompt(task_title),
            image: Some(InlineImage::from_data_url(image)),
            expects_json: true,
        };
        let unavailable = || ProofAssessment { score: 0, comment: ANALYSIS_UNAVAILABLE_COMMENT.to_string() };
        let text = match self.call(request).await {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => return ProofAssessment { score: 0, comment: ANALYSIS_EMPTY_COMMENT.to_string() },
            Err(e) => {
                warn!("Proof analysis for '{}' unavailable: {}", task_title, e);
                return unavailable();
            }
        };
        parse_assessment(&text).unwrap_or_else(|e| {
            warn!("Discarding proof analysis: {}", e);
            unavailable()
        })
    }

    async fn call(&self, request: AdvisoryRequest) -> Result<Option<String>, AdvisoryError> {
        match tokio::time::timeout(self.timeout, self.client.generate(request)).await {
            Ok(result) => result,
            Err(_) => Err(AdvisoryError::Timeout),
        }
    }
}

fn report_prompt(child_name: &str, transactions: &[Transaction]) -> String {
    let earning: Vec<String> = transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Earn)
        .map(|t| match &t.category {
            Some(category) => format!("{}: +{} 分鐘 ({})", t.description, t.amount, category),
            None => format!("{}: +{} 分鐘", t.description, t.amount),
        })
        .collect();
    let spending: Vec<String> = transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Spend)
        .map(|t| format!("{}: {} 分鐘", t.description, t.amount))
        .collect();

    format!(
        "扮演一位支持性的育兒教練。請分析孩子 \"{}\" 本週的活動紀錄。\n\
         請使用繁體中文 (Traditional Chinese) 回答。\n\n\
         賺取紀錄 (Earning History):\n{}\n\n\
         消費紀錄 (Spending History):\n{}\n\n\
         請提供一段約 3 句話的總結：\n\
         1. 肯定他們的努力（具體提到他們做得好的類別）。\n\
         2. 觀察他們的螢幕時間使用情況。\n\
         3. 給予下週一個正向、鼓勵的建議。\n\
         語氣要溫暖、鼓勵且簡潔。",
        child_name,
        earning.join("\n"),
        spending.join("\n")
    )
}

fn suggestion_prompt(interest: &str) -> String {
    format!(
        "針對對 \"{}\" 感興趣的孩子，建議 3 個有創意的家務或學習任務。\n\
         請只回傳一個 Raw JSON Array (不要 markdown code blocks)，包含以下物件：\n\
         - title (string): 任務標題 (請用繁體中文 Traditional Chinese)\n\
         - description (string): 任務描述 (請用繁體中文 Traditional Chinese)\n\
         - reward (number): 獎勵分鐘數 (介於 5 到 30 之間)\n\
         - category (string): 類別，必須是以下英文之一: Reading, Outdoor, Chore, Study, Health, Other",
        interest
    )
}

fn analysis_prompt(task_title: &str) -> String {
    format!(
        "你是一個嚴格但公平的任務審核員。\n\
         孩子聲稱完成了任務：\"{}\" 並上傳了這張照片作為證明。\n\
         請分析這張照片是否提供了完成任務的合理證據。\n\n\
         請回傳 JSON 格式：\n\
         {{\n  \"score\": (0-100 的整數，越高代表越有可能是真的完成),\n  \
         \"comment\": (一句簡短的繁體中文評語，說明你看到了什麼，以及是否符合任務要求)\n}}",
        task_title
    )
}

/// Remove markdown code fences the model may wrap JSON in
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

fn parse_suggestions(text: &str) -> Result<Vec<TaskDraft>, AdvisoryError> {
    let items: Vec<Value> = serde_json::from_str(&strip_code_fences(text))
        .map_err(|e| AdvisoryError::MalformedResponse(e.to_string()))?;

    let drafts = items
        .into_iter()
        .filter_map(|item| {
            let title = item.get("title")?.as_str()?.trim().to_string();
            if title.is_empty() {
                return None;
            }
            let description = item.get("description").and_then(Value::as_str).unwrap_or_default();
            let category = item.get("category").and_then(Value::as_str).unwrap_or_default();
            let reward = item
                .get("reward")
                .and_then(Value::as_f64)
                .map(|r| clamp_to(r, MIN_SUGGESTED_REWARD, MAX_SUGGESTED_REWARD))
                .unwrap_or(MIN_SUGGESTED_REWARD);
            Some(TaskDraft {
                title,
                description: description.trim().to_string(),
                reward,
                category: category.trim().to_string(),
            })
        })
        .collect();
    Ok(drafts)
}

fn parse_assessment(text: &str) -> Result<ProofAssessment, AdvisoryError> {
    let raw: RawAssessment = serde_json::from_str(&strip_code_fences(text))
        .map_err(|e| AdvisoryError::MalformedResponse(e.to_string()))?;
    let score = raw
        .score
        .as_f64()
        .ok_or_else(|| AdvisoryError::MalformedResponse(format!("score is not a number: {}", raw.score)))?;
    Ok(ProofAssessment {
        score: clamp_to(score, 0, 100) as u8,
        comment: raw.comment.trim().to_string(),
    })
}

fn clamp_to(value: f64, min: u32, max: u32) -> u32 {
    if value.is_nan() {
        return min;
    }
    value.round().clamp(f64::from(min), f64::from(max)) as u32
}
