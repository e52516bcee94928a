use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Archive operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Could not find header row (expected a \"{marker}\" column)")]
    HeaderNotFound { marker: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] minijinja::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Config,
    Render,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SiteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SiteError::ApiError(_) | SiteError::HttpStatusError { .. } => ErrorCategory::Network,
            SiteError::CsvError(_)
            | SiteError::HeaderNotFound { .. }
            | SiteError::SerializationError(_) => ErrorCategory::Data,
            SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => ErrorCategory::Config,
            SiteError::TemplateError(_) => ErrorCategory::Render,
            SiteError::IoError(_) | SiteError::ZipError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 表單可能只是暫時無法連線
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::Render | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SiteError::ApiError(_) => "Check your network connection and that the sheet is published",
            SiteError::HttpStatusError { .. } => {
                "Make sure the spreadsheet is shared with 'anyone with the link' and the URL is a CSV export"
            }
            SiteError::CsvError(_) => "Re-export the sheet as CSV; the file appears to be malformed",
            SiteError::HeaderNotFound { .. } => {
                "Add a 'Catalog ID' or 'Catalog Number' column to the header row of the sheet"
            }
            SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => {
                "Fix the configuration file or command line flags and try again"
            }
            SiteError::TemplateError(_) => "This is a bug in the bundled templates, please report it",
            SiteError::IoError(_) | SiteError::ZipError(_) => {
                "Check that the output directory is writable and has free space"
            }
            SiteError::SerializationError(_) => "Check the specimen data for unusual characters",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download the collection data: {}", self),
            ErrorCategory::Data => format!("The collection data could not be read: {}", self),
            ErrorCategory::Config => format!("Invalid configuration: {}", self),
            ErrorCategory::Render => format!("Failed to render the site: {}", self),
            ErrorCategory::Io => format!("Failed to write the site: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
