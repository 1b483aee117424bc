use serde::{Deserialize, Serialize};

/// Export formats offered by every collection endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// File extension for saving the exported bytes.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "pdf" => Some(ExportFormat::Pdf),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw export produced by the server. The client treats the bytes as opaque
/// (the PDF rendering happens server-side) and only picks a filename.
#[derive(Debug, Clone)]
pub struct Export {
    /// Exported document bytes
    pub bytes: Vec<u8>,
    /// Content type reported by the server
    pub content_type: String,
    /// Suggested filename (from Content-Disposition, or synthesized)
    pub filename: String,
}
