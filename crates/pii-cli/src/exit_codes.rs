//! Exit codes for the pii-redact CLI.
//!
//! Exit code ranges:
//! - 0: success
//! - 10-19: user/environment errors (recoverable by user action)

/// Exit codes for pii-redact operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success: every record redacted, or configuration valid.
    Clean = 0,

    /// Invalid arguments or unreadable input/output.
    ArgsError = 10,

    /// Configuration missing or rejected.
    ConfigError = 11,

    /// Some records failed and were withheld from the output.
    RecordsFailed = 12,
}

impl ExitCode {
    /// Numeric process exit code.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Whether this code represents success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::ArgsError.as_i32(), 10);
        assert_eq!(ExitCode::ConfigError.as_i32(), 11);
        assert_eq!(ExitCode::RecordsFailed.as_i32(), 12);
        assert!(ExitCode::Clean.is_success());
        assert!(!ExitCode::RecordsFailed.is_success());
    }
}
