use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::truncate_string;

/// An advertisement submitted for verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advertisement {
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of verifying one advertisement, as returned by
/// `GET /api/verification-results/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub id: i64,
    pub advertisement: i64,
    #[serde(default)]
    pub advertisement_content: Option<String>,
    pub user: i64,
    pub credibility_score: f64,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

/// Coarse reading of a credibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credibility {
    Low,
    Mixed,
    High,
}

impl Credibility {
    pub fn label(&self) -> &'static str {
        match self {
            Credibility::Low => "Low",
            Credibility::Mixed => "Mixed",
            Credibility::High => "High",
        }
    }
}

impl VerificationResult {
    pub fn credibility(&self) -> Credibility {
        if self.credibility_score < 0.4 {
            Credibility::Low
        } else if self.credibility_score < 0.7 {
            Credibility::Mixed
        } else {
            Credibility::High
        }
    }

    /// Score formatted the way the bot reports it, e.g. "0.35/1.00".
    pub fn score_display(&self) -> String {
        format!("{:.2}/1.00", self.credibility_score)
    }

    /// Short excerpt of the advertisement for list views.
    pub fn excerpt(&self, max_len: usize) -> String {
        match self.advertisement_content.as_deref() {
            Some(content) => truncate_string(content.trim(), max_len),
            None => format!("Ad #{}", self.advertisement),
        }
    }
}
