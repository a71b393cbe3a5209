use serde::{Deserialize, Serialize};

use super::blog::BookDetails;

/// Kind of summary the backend produced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    /// Summary generated from a title/author search.
    #[default]
    Search,
    /// Summary generated from an uploaded PDF.
    Pdf,
}

/// A related book suggested alongside a summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Recommendation {
    pub title: String,
    pub author: Option<String>,
    pub thumbnail: Option<String>,
    pub reason: Option<String>,
}

/// Backend response for summary generation and PDF upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(default)]
    pub book: BookDetails,
    pub summary: String,
    #[serde(default, rename = "type")]
    pub kind: SummaryKind,
    #[serde(default)]
    pub amazon_link: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub results_count: Option<u32>,
}
