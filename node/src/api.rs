// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct OperationFilter {
    pub operation: Option<String>,
}

#[derive(Deserialize)]
pub struct CleanupParams {
    pub operation: Option<String>,
    /// Entries to keep. Signed so negative input reaches validation.
    pub keep: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CleanupResponse {
    pub deleted: usize,
    pub kept: usize,
}

#[derive(Serialize, Deserialize)]
pub struct AlertRequest {
    pub subject: String,
    pub is_spam: bool,
    pub confidence: f64,
    #[serde(default)]
    pub email_content: Option<String>,
    #[serde(default)]
    pub time_detected: Option<NaiveDateTime>,
}

#[derive(Serialize, Deserialize)]
pub struct SpamStatusRequest {
    pub is_spam: bool,
}

#[derive(Serialize, Deserialize)]
pub struct ConfidenceRequest {
    pub confidence: f64,
}

#[derive(Serialize, Deserialize)]
pub struct SubjectRequest {
    pub subject: String,
}

#[derive(Deserialize)]
pub struct ThresholdParams {
    pub threshold: Option<f64>,
}

#[derive(Serialize, Deserialize)]
pub struct BulkUpdateRequest {
    pub ids: Vec<i64>,
    #[serde(default)]
    pub is_spam: bool,
}

#[derive(Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<i64>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BulkResponse {
    pub affected: usize,
}
