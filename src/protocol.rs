//! Wire shapes shared by the relay and the submission client.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output filename used when the user leaves the field empty.
pub const DEFAULT_FILENAME: &str = "generated_document.docx";

/// Fixed body text the relay answers with when forwarding fails.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Extensions the file picker offers. Advisory only.
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["docx", "pdf"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GenerateFromText,
    GenerateFromFile,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GenerateFromText => "generate-from-text",
            Self::GenerateFromFile => "generate-from-file",
        }
    }

    /// Path of the operation relative to an origin, e.g. `/api/generate-from-text`.
    pub fn path(&self) -> String {
        format!("/api/{}", self.name())
    }

    /// Message shown when the operation fails without a backend-provided reason.
    pub fn fallback_error(&self) -> &'static str {
        match self {
            Self::GenerateFromText => "Failed to generate document",
            Self::GenerateFromFile => "Failed to process file",
        }
    }

    /// Joins the operation path onto a base URL. An empty base yields a relative path.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextGenerationRequest {
    pub text: String,
    pub filename: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            document: None,
            error: Some(error.into()),
        }
    }
}

/// Empty filenames fall back to [`DEFAULT_FILENAME`]. Anything else is used as typed.
pub fn filename_or_default(filename: &str) -> String {
    if filename.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        filename.to_string()
    }
}
