/// Broad class of failure. Each kind maps to a fixed process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input: day counts, catalog selections, cost bounds, flags.
    Validation,
    /// Pricing inputs outside the formula's domain (e.g. margin >= 1).
    Domain,
    /// Raised by the seasonal decomposition collaborator.
    Decomposition,
    /// File export failures.
    Io,
    /// Terminal setup, draw, or event failures in the TUI.
    Terminal,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Validation => 2,
            ErrorKind::Domain => 3,
            ErrorKind::Decomposition => 4,
            ErrorKind::Io => 5,
            ErrorKind::Terminal => 6,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Domain, message)
    }

    pub fn decomposition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decomposition, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Terminal, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code())
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::validation("x").exit_code(), 2);
        assert_eq!(AppError::domain("x").exit_code(), 3);
        assert_eq!(AppError::decomposition("x").exit_code(), 4);
        assert_eq!(AppError::io("x").exit_code(), 5);
        assert_eq!(AppError::terminal("x").exit_code(), 6);
    }

    #[test]
    fn display_is_the_bare_message() {
        let err = AppError::domain("Margin must be below 1.");
        assert_eq!(err.to_string(), "Margin must be below 1.");
        assert_eq!(err.kind(), ErrorKind::Domain);
    }
}
