use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ExtractImageRequest<'a> {
    pub url: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ExtractTextRequest<'a> {
    pub image_url: &'a str,
}

/// One text sent for analysis, tagged with the acquisition time of its image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisText {
    pub text: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeTextsRequest<'a> {
    pub texts: &'a [AnalysisText],
}

/// Reply envelope shared by every backend endpoint.
///
/// Error replies from the backend omit `success`, hence the default.
#[derive(Debug, Default, Deserialize)]
pub struct BackendReply {
    #[serde(default)]
    pub success: bool,
    pub image_url: Option<String>,
    pub text: Option<String>,
    pub analysis: Option<String>,
    pub error: Option<String>,
}
