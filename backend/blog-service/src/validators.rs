use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

/// Input validation utilities for blog-service

// Compile regex patterns once at startup
static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._-]+$").expect("hardcoded username regex is invalid - fix source code")
});

static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$")
        .expect("hardcoded slug regex is invalid - fix source code")
});

static NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z\s'-]+$").expect("hardcoded name regex is invalid - fix source code")
});

/// Validate username shape (letters, numbers, dots, underscores, hyphens)
pub fn validate_username(username: &str) -> bool {
    !username.is_empty() && username.len() <= 100 && USERNAME_REGEX.is_match(username)
}

/// Validate slug shape (lowercase alphanumerics and single hyphens, no
/// leading/trailing hyphen)
pub fn validate_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.len() <= 100 && SLUG_REGEX.is_match(slug)
}

/// Validate password composition: minimum 8 characters with at least one
/// uppercase letter, one lowercase letter, one digit, and one special
/// character.
pub fn validate_password(password: &str) -> bool {
    if password.len() < 8 {
        return false;
    }

    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());

    has_uppercase && has_lowercase && has_digit && has_special
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(std::borrow::Cow::Borrowed(message));
    err
}

/// validator crate compatible check for username shape
pub fn username_validator(username: &str) -> Result<(), ValidationError> {
    if validate_username(username) {
        Ok(())
    } else {
        Err(invalid(
            "invalid_username",
            "Username can only contain letters, numbers, dots, underscores, or hyphens",
        ))
    }
}

/// validator crate compatible check for slug shape
pub fn slug_validator(slug: &str) -> Result<(), ValidationError> {
    if validate_slug(slug) {
        Ok(())
    } else {
        Err(invalid(
            "invalid_slug",
            "Slug must contain only lowercase letters, numbers, and hyphens, and cannot start or end with a hyphen",
        ))
    }
}

/// validator crate compatible check for password composition
pub fn password_validator(password: &str) -> Result<(), ValidationError> {
    if validate_password(password) {
        Ok(())
    } else {
        Err(invalid(
            "weak_password",
            "Password must be at least 8 characters and contain an uppercase letter, a lowercase letter, a number, and a special character",
        ))
    }
}

/// validator crate compatible check for person-name fields
pub fn person_name_validator(name: &str) -> Result<(), ValidationError> {
    if !name.is_empty() && name.len() <= 100 && NAME_REGEX.is_match(name) {
        Ok(())
    } else {
        Err(invalid(
            "invalid_name",
            "Name can only contain letters, spaces, hyphens, or apostrophes",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_username() {
        assert!(validate_username("alice"));
        assert!(validate_username("a.b_c-d9"));
    }

    #[test]
    fn test_invalid_username() {
        assert!(!validate_username(""));
        assert!(!validate_username("has space"));
        assert!(!validate_username("emoji🙂"));
    }

    #[test]
    fn test_valid_slug() {
        assert!(validate_slug("hello-world"));
        assert!(validate_slug("post-2"));
        assert!(validate_slug("a"));
    }

    #[test]
    fn test_invalid_slug() {
        assert!(!validate_slug(""));
        assert!(!validate_slug("-leading"));
        assert!(!validate_slug("trailing-"));
        assert!(!validate_slug("double--hyphen"));
        assert!(!validate_slug("Upper-Case"));
    }

    #[test]
    fn test_password_composition() {
        assert!(validate_password("Str0ng!pass"));
        assert!(!validate_password("short1!"));
        assert!(!validate_password("alllowercase1!"));
        assert!(!validate_password("ALLUPPERCASE1!"));
        assert!(!validate_password("NoDigits!!"));
        assert!(!validate_password("NoSpecial123"));
    }
}
