use crate::dom::TableData;
use crate::error::{FleroviumError, Result};
use crate::inference::{InferenceConfig, InferenceService};
use crate::prediction::wire::{TableDetection, TableRecognition, TableRecord, WorkflowResult};
use crate::prediction::{PredictionBundle, TableBox, TextRoleScore, join_fragments};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Blocking HTTP client for the inference service
pub struct InferenceClient {
    config: InferenceConfig,
    http: Client,
}

impl InferenceClient {
    pub fn new(config: InferenceConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FleroviumError::NetworkFailure(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// GET `path` and decode the body as JSON
    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.endpoint(path);
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| FleroviumError::NetworkFailure(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FleroviumError::NetworkFailure(format!("{} returned {}: {}", path, status, body.trim())));
        }

        let body = response
            .text()
            .map_err(|e| FleroviumError::NetworkFailure(format!("Failed to read {} response: {}", path, e)))?;

        serde_json::from_str(&body).map_err(|e| FleroviumError::MalformedResponse(format!("{}: {}", path, e)))
    }
}

/// Base64 of a file path, the form the service expects in query strings
pub fn encode_path(path: &Path) -> String {
    STANDARD.encode(path.to_string_lossy().as_bytes())
}

impl InferenceService for InferenceClient {
    fn detect_and_classify(&self, image: &Path, workflow_id: &str) -> Result<PredictionBundle> {
        let responses: Vec<WorkflowResult> = self.get_json(
            "infer_workflow",
            &[("image_file_path", encode_path(image)), ("workflow_id", workflow_id.to_string())],
        )?;

        log::info!("Workflow '{}' returned {} result(s) for {}", workflow_id, responses.len(), image.display());
        PredictionBundle::from_responses(responses)
    }

    fn detect_tables(&self, image: &Path, model_id: &str) -> Result<Vec<TableBox>> {
        let detection: TableDetection = self
            .get_json("infer_table", &[("image_file_path", encode_path(image)), ("model_id", model_id.to_string())])?;

        log::info!("Table model '{}' returned {} box(es)", model_id, detection.predictions.len());
        Ok(detection.predictions)
    }

    fn classify_texts(&self, fragments: &[String]) -> Result<Vec<TextRoleScore>> {
        let joined = join_fragments(fragments);
        let scores: Vec<TextRoleScore> = self.get_json("infer_text", &[("texts", STANDARD.encode(joined.as_bytes()))])?;

        log::info!("Classified {} text fragment(s)", scores.len());
        Ok(scores)
    }

    fn recognize_table(&self, image: &Path) -> Result<TableData> {
        let recognition: TableRecognition = self.get_json("infer_tatr", &[("image_file_path", encode_path(image))])?;

        if !recognition.success {
            let reason = recognition.error.unwrap_or_else(|| "table recognition failed".to_string());
            return Err(FleroviumError::NetworkFailure(reason));
        }

        let data = recognition
            .data
            .ok_or_else(|| FleroviumError::MalformedResponse("infer_tatr: missing data".to_string()))?;

        let records: Vec<TableRecord> = serde_json::from_str(&data)
            .map_err(|e| FleroviumError::MalformedResponse(format!("infer_tatr data: {}", e)))?;

        Ok(TableData::from_records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path(Path::new("/tmp/a.png")), "L3RtcC9hLnBuZw==");
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = InferenceClient::new(InferenceConfig::new().base_url("http://127.0.0.1:5000/")).unwrap();
        assert_eq!(client.endpoint("infer_text"), "http://127.0.0.1:5000/infer_text");
    }
}
