//! Task creation requests
//!
//! Each [`TaskRequest`] variant describes one task-creation endpoint: the
//! path it is posted to, the scalar form fields it carries (all of which are
//! signed), and the files it uploads.

use std::path::{Path, PathBuf};

/// Known extraction modes for [`TaskRequest::Extract`]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExtractMode {
    /// Plain text (`extractText`)
    Text,
    /// Embedded images (`extractImages`)
    Images,
    /// Selected pages as a new document (`extractPages`)
    Pages,
    /// Any other mode string the service accepts
    Custom(String),
}

impl ExtractMode {
    /// Wire value of the mode
    pub fn as_str(&self) -> &str {
        match self {
            ExtractMode::Text => "extractText",
            ExtractMode::Images => "extractImages",
            ExtractMode::Pages => "extractPages",
            ExtractMode::Custom(mode) => mode,
        }
    }
}

impl From<&str> for ExtractMode {
    fn from(mode: &str) -> Self {
        match mode {
            "extractText" => ExtractMode::Text,
            "extractImages" => ExtractMode::Images,
            "extractPages" => ExtractMode::Pages,
            other => ExtractMode::Custom(other.to_string()),
        }
    }
}

impl std::fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file uploaded with a task request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePart {
    /// Multipart field name
    pub field: &'static str,
    /// Local path of the file
    pub path: PathBuf,
}

impl FilePart {
    fn new(field: &'static str, path: &Path) -> Self {
        Self {
            field,
            path: path.to_path_buf(),
        }
    }

    /// File name sent with the part (base name of the path)
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string()
    }

    /// Content type inferred from the file extension
    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("pdf") => "application/pdf",
            Some("zip") => "application/zip",
            Some("html") | Some("htm") => "text/html",
            Some("txt") => "text/plain",
            Some("doc") => "application/msword",
            Some("docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            _ => "application/octet-stream",
        }
    }
}

/// A task-creation request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskRequest {
    /// Extract text, images or pages from a document
    Extract {
        /// Input document
        input: PathBuf,
        /// Extraction mode
        mode: ExtractMode,
        /// Page range such as "1-3,5"; all pages when absent
        page_range: Option<String>,
    },
    /// Convert a document to another format
    Convert {
        /// Input document
        input: PathBuf,
        /// Target format (e.g., "image", "word")
        format: String,
        /// Conversion options as a JSON string
        config: Option<String>,
    },
    /// Flatten annotations and form fields into page content
    Flatten {
        /// Input document
        input: PathBuf,
        /// Page range; all pages when absent
        page_range: Option<String>,
    },
    /// Remove the open password from a document
    RemovePassword {
        /// Input document
        input: PathBuf,
        /// Current document password
        password: String,
    },
    /// Compare two documents
    Compare {
        /// Base document
        base: PathBuf,
        /// Document compared against the base
        compare: PathBuf,
        /// Result format (e.g., "json", "pdf")
        result_type: String,
        /// Comparison kind (e.g., "text", "overlay")
        compare_type: String,
    },
    /// Combine the documents in a zip archive into one
    Combine {
        /// Zip archive of input documents
        input_zip: PathBuf,
        /// Combine options as a JSON string
        config: Option<String>,
    },
    /// Render a web page or HTML into a document
    CreateFromHtml {
        /// URL of the page to render
        url: String,
        /// Source format: "url", "html" or "shtml"
        format: String,
        /// Rendering options as a JSON string
        config: Option<String>,
    },
}

impl TaskRequest {
    /// Extraction request without a page range
    pub fn extract(input: impl Into<PathBuf>, mode: impl Into<ExtractMode>) -> Self {
        TaskRequest::Extract {
            input: input.into(),
            mode: mode.into(),
            page_range: None,
        }
    }

    /// Restrict an extraction or flatten request to a page range
    ///
    /// Other request kinds have no page range and are returned unchanged.
    pub fn with_page_range(mut self, range: impl Into<String>) -> Self {
        match &mut self {
            TaskRequest::Extract { page_range, .. } | TaskRequest::Flatten { page_range, .. } => {
                *page_range = Some(range.into());
            }
            _ => {}
        }
        self
    }

    /// Endpoint path relative to the service base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            TaskRequest::Extract { .. } => "document/extract",
            TaskRequest::Convert { .. } => "document/convert",
            TaskRequest::Flatten { .. } => "document/flatten",
            TaskRequest::RemovePassword { .. } => "document/removePassword",
            TaskRequest::Compare { .. } => "document/compare",
            TaskRequest::Combine { .. } => "document/combine",
            TaskRequest::CreateFromHtml { .. } => "document/createFromHtml",
        }
    }

    /// Scalar form fields, in no particular order
    ///
    /// Absent and empty optional values are left out; they are neither sent
    /// nor signed.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let fields: Vec<(&'static str, Option<&str>)> = match self {
            TaskRequest::Extract {
                mode, page_range, ..
            } => vec![
                ("mode", Some(mode.as_str())),
                ("pageRange", page_range.as_deref()),
            ],
            TaskRequest::Convert { format, config, .. } => {
                vec![
                    ("format", Some(format.as_str())),
                    ("config", config.as_deref()),
                ]
            }
            TaskRequest::Flatten { page_range, .. } => vec![("pageRange", page_range.as_deref())],
            TaskRequest::RemovePassword { password, .. } => {
                vec![("password", Some(password.as_str()))]
            }
            TaskRequest::Compare {
                result_type,
                compare_type,
                ..
            } => vec![
                ("resultType", Some(result_type.as_str())),
                ("compareType", Some(compare_type.as_str())),
            ],
            TaskRequest::Combine { config, .. } => vec![("config", config.as_deref())],
            TaskRequest::CreateFromHtml {
                url,
                format,
                config,
            } => vec![
                ("url", Some(url.as_str())),
                ("format", Some(format.as_str())),
                ("config", config.as_deref()),
            ],
        };

        fields
            .into_iter()
            .filter_map(|(name, value)| match value {
                Some(v) if !v.is_empty() => Some((name, v.to_string())),
                _ => None,
            })
            .collect()
    }

    /// Files uploaded with the request
    pub fn files(&self) -> Vec<FilePart> {
        match self {
            TaskRequest::Extract { input, .. }
            | TaskRequest::Convert { input, .. }
            | TaskRequest::Flatten { input, .. }
            | TaskRequest::RemovePassword { input, .. } => {
                vec![FilePart::new("inputDocument", input)]
            }
            TaskRequest::Compare { base, compare, .. } => vec![
                FilePart::new("inputBaseDocument", base),
                FilePart::new("inputCompareDocument", compare),
            ],
            TaskRequest::Combine { input_zip, .. } => {
                vec![FilePart::new("inputZipDocument", input_zip)]
            }
            TaskRequest::CreateFromHtml { .. } => Vec::new(),
        }
    }
}
