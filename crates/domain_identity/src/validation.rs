//! Credential validation rules
//!
//! # Rules
//!
//! - Display name: letters and spaces only, not blank
//! - Password: more than 8 characters
//! - Firm code: first letter `E`, `M` or `A` (employee, manager, admin),
//!   case-insensitive
//! - Signup email: `local@domain.tld`
//! - Signup phone (optional): digits, spaces, `+` and `-`
//! - Signup nationality (optional): a three-letter currency code
//!
//! Every rule is checked so the caller can show all problems at once.

use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Role};

use crate::error::IdentityError;

/// Passwords must be strictly longer than this
pub const MIN_PASSWORD_EXCLUSIVE: usize = 8;

/// Result of validating a form
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
    }

    /// Converts a failed result into `IdentityError::Validation`
    pub fn into_result(self) -> Result<(), IdentityError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(IdentityError::Validation(self.errors))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// First-step credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub name: String,
    pub password: String,
    pub firm_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub name: String,
    #[serde(default)]
    pub number: Option<String>,
    pub email: String,
    pub firm_code: String,
    #[serde(default)]
    pub nationality: Option<String>,
}

/// Role-scoped credential re-entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleLoginForm {
    pub code: String,
    pub password: String,
}

pub struct CredentialValidator;

impl CredentialValidator {
    pub fn validate_name(name: &str) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            result.add_error("Name is required");
        } else if !trimmed.chars().all(|c| c.is_alphabetic() || c == ' ') {
            result.add_error("Name may contain only letters and spaces");
        }
        result
    }

    pub fn validate_password(password: &str) -> ValidationResult {
        let mut result = ValidationResult::ok();
        if password.chars().count() <= MIN_PASSWORD_EXCLUSIVE {
            result.add_error(format!(
                "Password must be longer than {} characters",
                MIN_PASSWORD_EXCLUSIVE
            ));
        }
        result
    }

    /// Returns the role encoded in `code` alongside the validation result
    pub fn validate_firm_code(code: &str) -> (ValidationResult, Option<Role>) {
        let mut result = ValidationResult::ok();
        let role = Role::from_firm_code(code);
        if code.trim().is_empty() {
            result.add_error("Firm code is required");
        } else if role.is_none() {
            result.add_error("Firm code must start with E, M or A");
        }
        (result, role)
    }

    pub fn validate_login(form: &LoginForm) -> ValidationResult {
        let mut result = Self::validate_name(&form.name);
        result.merge(Self::validate_password(&form.password));
        result.merge(Self::validate_firm_code(&form.firm_code).0);
        result
    }

    pub fn validate_signup(form: &SignupForm) -> ValidationResult {
        let mut result = Self::validate_name(&form.name);
        result.merge(Self::validate_firm_code(&form.firm_code).0);

        if !is_plausible_email(form.email.trim()) {
            result.add_error("A valid email is required");
        }

        if let Some(number) = form.number.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            let allowed = number
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-'));
            if !allowed || !number.chars().any(|c| c.is_ascii_digit()) {
                result.add_error("Phone number may contain only digits, spaces, + and -");
            }
        }

        if let Some(code) = form.nationality.as_deref().filter(|n| !n.trim().is_empty()) {
            if Currency::new(code).is_err() {
                result.add_error(format!("Unknown nationality currency: {}", code.trim()));
            }
        }
        result
    }

    /// Validates role re-entry; the code must map to `selected`
    pub fn validate_role_login(selected: Role, form: &RoleLoginForm) -> ValidationResult {
        let (mut result, role) = Self::validate_firm_code(&form.code);
        if let Some(role) = role {
            if role != selected {
                result.add_error(format!("Code does not match the {} role", selected));
            }
        }
        result.merge(Self::validate_password(&form.password));
        result
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(name: &str, password: &str, firm_code: &str) -> LoginForm {
        LoginForm {
            name: name.to_string(),
            password: password.to_string(),
            firm_code: firm_code.to_string(),
        }
    }

    #[test]
    fn test_accepts_valid_login() {
        assert!(CredentialValidator::validate_login(&login("Jane Doe", "longenough1", "M100")).is_valid);
    }

    #[test]
    fn test_rejects_each_bad_field() {
        let name = CredentialValidator::validate_login(&login("John3", "longenough1", "M100"));
        assert_eq!(name.errors.len(), 1);

        let password = CredentialValidator::validate_login(&login("Jane Doe", "short1", "M100"));
        assert_eq!(password.errors.len(), 1);

        let code = CredentialValidator::validate_login(&login("Jane Doe", "longenough1", "X123"));
        assert_eq!(code.errors.len(), 1);

        let all = CredentialValidator::validate_login(&login("", "", ""));
        assert_eq!(all.errors.len(), 3);
    }

    #[test]
    fn test_password_boundary() {
        assert!(!CredentialValidator::validate_password("12345678").is_valid);
        assert!(CredentialValidator::validate_password("123456789").is_valid);
    }

    #[test]
    fn test_firm_code_is_case_insensitive() {
        let (result, role) = CredentialValidator::validate_firm_code("a42");
        assert!(result.is_valid);
        assert_eq!(role, Some(Role::Admin));
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_plausible_email("jane@aprova.io"));
        assert!(!is_plausible_email("jane@aprova"));
        assert!(!is_plausible_email("@aprova.io"));
        assert!(!is_plausible_email("jane.aprova.io"));
    }
}
