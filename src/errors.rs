use thiserror::Error;

/// Failure of the single provider call made for one ticker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("No quote found for symbol {0}")]
    NotFound(String),

    #[error("Quote provider unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed quote response: {0}")]
    Malformed(String),
}

impl FetchError {
    pub const fn kind(&self) -> &'static str {
        match self {
            FetchError::NotFound(_) => "not_found",
            FetchError::Unavailable(_) => "unavailable",
            FetchError::Malformed(_) => "malformed",
        }
    }

    /// Whether the error should end the render with an error view instead of
    /// falling back to mock data.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Could not resolve '{input}' to a ticker symbol: {reason}")]
    UnresolvedInput { input: String, reason: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Ticker lookup error: {0}")]
    LookupError(String),
}

impl DashboardError {
    pub fn unresolved(input: &str, reason: impl Into<String>) -> Self {
        DashboardError::UnresolvedInput {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable error code used in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardError::UnresolvedInput { .. } => "unresolved_input",
            DashboardError::Fetch(e) => e.kind(),
            DashboardError::RequestError(_) => "request",
            DashboardError::JsonError(_) => "json",
            DashboardError::TemplateError(_) => "template",
            DashboardError::IoError(_) => "io",
            DashboardError::LookupError(_) => "lookup",
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_not_found_is_terminal() {
        assert!(FetchError::NotFound("ZZZZ".into()).is_terminal());
        assert!(!FetchError::Unavailable("timeout".into()).is_terminal());
        assert!(!FetchError::Malformed("no table".into()).is_terminal());
    }

    #[test]
    fn fetch_kind_passes_through_dashboard_error() {
        let err: DashboardError = FetchError::NotFound("ZZZZ".into()).into();
        assert_eq!(err.kind(), "not_found");
        assert_eq!(err.to_string(), "No quote found for symbol ZZZZ");
    }

    #[test]
    fn unresolved_input_message_names_the_input() {
        let err = DashboardError::unresolved("NotARealCompanyXYZ", "no matching company or ticker");
        assert_eq!(err.kind(), "unresolved_input");
        assert!(err.to_string().contains("NotARealCompanyXYZ"));
    }
}
