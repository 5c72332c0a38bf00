/// Result of comparing a candidate pair against the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    UsernameMismatch,
    PasswordMismatch,
}

impl ValidationOutcome {
    pub fn status(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    pub fn message(&self) -> &'static str {
        match self {
            ValidationOutcome::Valid => "User Is valid",
            ValidationOutcome::UsernameMismatch => "User Name is invalid",
            ValidationOutcome::PasswordMismatch => "Password is invalid",
        }
    }

    /// Label used for the `outcome` metrics dimension.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationOutcome::Valid => "valid",
            ValidationOutcome::UsernameMismatch => "username_mismatch",
            ValidationOutcome::PasswordMismatch => "password_mismatch",
        }
    }
}
