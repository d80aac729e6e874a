#[derive(Debug, Clone, PartialEq)]
pub enum GraticuleError {
    /// Divisor requested for a non-finite spacing or one below `divisor::MIN_SPACING`.
    InvalidSpacing { raw: f64 },
    /// Host reported a view the grid cannot be built for (non-finite bounds or zoom).
    InvalidViewport(String),
    InvalidOptions(String),
    Config(String),
    AlreadyAttached,
}

impl std::fmt::Display for GraticuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraticuleError::InvalidSpacing { raw } => {
                write!(f, "grid spacing must be finite and at least 1e-12 degrees: raw={raw}")
            }
            GraticuleError::InvalidViewport(msg) => write!(f, "invalid viewport: {msg}"),
            GraticuleError::InvalidOptions(msg) => write!(f, "invalid graticule options: {msg}"),
            GraticuleError::Config(msg) => write!(f, "graticule config parse error: {msg}"),
            GraticuleError::AlreadyAttached => write!(f, "graticule engine is already attached"),
        }
    }
}

impl std::error::Error for GraticuleError {}

impl From<serde_json::Error> for GraticuleError {
    fn from(err: serde_json::Error) -> Self {
        GraticuleError::Config(err.to_string())
    }
}
