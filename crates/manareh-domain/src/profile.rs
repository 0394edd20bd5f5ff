//! User profile field rules.

use serde::{Deserialize, Serialize};

/// Minimum accepted password length in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Self-declared gender.
///
/// Wire format: `"male"` / `"female"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Parse the wire value. Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// Field-level rejections for profile input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("phone number must be 11 digits starting with 09")]
    InvalidPhone,
    #[error("national id must be 10 digits")]
    InvalidNationalId,
    #[error("password must be at least 6 characters")]
    InvalidPassword,
    #[error("gender must be male or female")]
    InvalidGender,
    #[error("required field is empty")]
    MissingField,
}

/// `local@domain.tld` shape: no whitespace, exactly one `@`, and a dot inside the domain.
pub fn validate_email(email: &str) -> Result<(), ProfileError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ProfileError::InvalidEmail);
    };
    let clean = |s: &str| !s.is_empty() && !s.contains('@') && !s.chars().any(char::is_whitespace);
    let dotted = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
    if clean(local) && clean(domain) && dotted {
        Ok(())
    } else {
        Err(ProfileError::InvalidEmail)
    }
}

/// Iranian mobile number: 11 ASCII digits starting with `09`.
pub fn validate_phone(phone: &str) -> Result<(), ProfileError> {
    if phone.len() == 11 && phone.starts_with("09") && phone.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ProfileError::InvalidPhone)
    }
}

pub fn validate_national_id(national_id: &str) -> Result<(), ProfileError> {
    if national_id.len() == 10 && national_id.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ProfileError::InvalidNationalId)
    }
}

pub fn validate_password(password: &str) -> Result<(), ProfileError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ProfileError::InvalidPassword)
    }
}

pub fn parse_gender(gender: &str) -> Result<Gender, ProfileError> {
    Gender::parse(gender).ok_or(ProfileError::InvalidGender)
}

/// Reject blank required fields (whitespace-only counts as blank).
pub fn require_non_empty<'a>(
    fields: impl IntoIterator<Item = &'a str>,
) -> Result<(), ProfileError> {
    if fields.into_iter().any(|f| f.trim().is_empty()) {
        Err(ProfileError::MissingField)
    } else {
        Ok(())
    }
}
