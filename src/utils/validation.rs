//! Input validation utilities

use validator::ValidationError;

use crate::constants::{self, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    let length = password.chars().count() as u64;
    if length < MIN_PASSWORD_LENGTH {
        return Err("Password must be at least 8 characters");
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err("Password must be at most 50 characters");
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_numeric()) {
        return Err("Password must contain at least one number");
    }
    Ok(())
}

/// `validator` adapter for [`validate_password`]
pub fn password_strength(password: &str) -> Result<(), ValidationError> {
    validate_password(password).map_err(|msg| {
        let mut err = ValidationError::new("password_strength");
        err.message = Some(msg.into());
        err
    })
}

/// Validate user role
pub fn validate_role(role: &str) -> Result<(), &'static str> {
    if constants::roles::ALL.contains(&role) {
        Ok(())
    } else {
        Err("Invalid role")
    }
}

/// Validate reservation status filter
pub fn validate_status(status: &str) -> Result<(), &'static str> {
    if constants::reservation_status::ALL.contains(&status) {
        Ok(())
    } else {
        Err("Invalid reservation status")
    }
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Collapse whitespace, drop control characters and capitalise each word
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(sanitize_string)
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase and trim an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Password123").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("nouppercase123").is_err());
        assert!(validate_password("NOLOWERCASE123").is_err());
        assert!(validate_password("NoNumbers").is_err());
        assert!(validate_password(&format!("Aa1{}", "x".repeat(60))).is_err());
    }

    #[test]
    fn test_password_strength_carries_message() {
        let err = password_strength("weak").unwrap_err();
        assert_eq!(err.code, "password_strength");
        assert!(err.message.is_some());
    }

    #[test]
    fn test_validate_role_and_status() {
        assert!(validate_role("admin").is_ok());
        assert!(validate_role("user").is_ok());
        assert!(validate_role("root").is_err());
        assert!(validate_status("cancelled").is_ok());
        assert!(validate_status("deleted").is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("  sala   de JUNTAS "), "Sala De Juntas");
        assert_eq!(title_case("north\twing"), "North Wing");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_keeps_words_apart() {
        assert_eq!(title_case("north\twing"), "North Wing");
        assert_eq!(title_case("sala\nazul\r\npiso 2"), "Sala Azul Piso 2");
        assert_eq!(title_case("sala\u{7}  azul"), "Sala Azul");
        assert_eq!(title_case(" \u{7} "), "");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }
}
