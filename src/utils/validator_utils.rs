use std::borrow::Cow;

use validator::ValidationError;

pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("is_required");
        error.message = Some(Cow::from("This field is required"));
        Err(error)
    } else {
        Ok(())
    }
}

/// `#RGB` or `#RRGGBB`.
pub fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix('#').unwrap_or("");
    let valid = matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_color");
        error.message = Some(Cow::from("Color must be a hex value like #E26C2D"));
        Err(error)
    }
}

/// Letters, digits and `@ . + - _` only.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    let valid = value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_username");
        error.message = Some(Cow::from("Username may contain only letters, digits and @/./+/-/_"));
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert!(validate_hex_color("#E26C2D").is_ok());
        assert!(validate_hex_color("#fff").is_ok());
        assert!(validate_hex_color("E26C2D").is_err());
        assert!(validate_hex_color("#GGGGGG").is_err());
        assert!(validate_hex_color("#12345").is_err());
    }

    #[test]
    fn usernames() {
        assert!(validate_username("chef.mario+1").is_ok());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("semi;colon").is_err());
    }

    #[test]
    fn required_rejects_blank() {
        assert!(validate_required("   ").is_err());
        assert!(validate_required("soup").is_ok());
    }
}
