use crate::errors::{PrequalError, Result};

const ID_LENGTH: usize = 10;
const PROVINCE_RANGE: std::ops::RangeInclusive<u32> = 1..=24;
const CHECK_COEFFICIENTS: [u32; 9] = [2, 1, 2, 1, 2, 1, 2, 1, 2];
const MIN_SPOUSE_ID_LENGTH: usize = 8;
const MIN_FULL_NAME_LENGTH: usize = 3;

/// ten ascii digits, without the checksum
pub fn is_id_shaped(id: &str) -> bool {
    id.len() == ID_LENGTH && id.bytes().all(|b| b.is_ascii_digit())
}

/// national id (cédula) check: province prefix, third digit and mod-10 check digit
pub fn is_valid_national_id(id: &str) -> bool {
    if !is_id_shaped(id) {
        return false;
    }

    let digits: Vec<u32> = id.bytes().map(|b| (b - b'0') as u32).collect();

    let province = digits[0] * 10 + digits[1];
    if !PROVINCE_RANGE.contains(&province) {
        return false;
    }

    if digits[2] > 5 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .zip(CHECK_COEFFICIENTS.iter())
        .map(|(digit, coefficient)| {
            let value = digit * coefficient;
            if value >= 10 {
                value - 9
            } else {
                value
            }
        })
        .sum();

    let expected = (10 - sum % 10) % 10;
    expected == digits[9]
}

pub fn validate_national_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(PrequalError::MissingField { field: "id_number" });
    }
    if !is_valid_national_id(id) {
        return Err(PrequalError::InvalidIdNumber { id: id.to_string() });
    }
    Ok(())
}

pub fn validate_full_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PrequalError::MissingField { field: "full_name" });
    }
    if trimmed.chars().count() < MIN_FULL_NAME_LENGTH {
        return Err(PrequalError::InvalidFullName { name: name.to_string() });
    }
    Ok(())
}

/// optional leading `+` then 7 to 15 digits
pub fn validate_phone(phone: &str) -> Result<()> {
    if phone.is_empty() {
        return Err(PrequalError::MissingField { field: "phone" });
    }
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let valid = (7..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit());
    if !valid {
        return Err(PrequalError::InvalidPhone { phone: phone.to_string() });
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(PrequalError::MissingField { field: "email" });
    }

    let invalid = || PrequalError::InvalidEmail { email: email.to_string() };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let dotted = domain
        .split('.')
        .collect::<Vec<_>>();
    if dotted.len() < 2 || dotted.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_spouse_id(spouse_id: Option<&str>, married: bool) -> Result<()> {
    let spouse_id = spouse_id.map(str::trim).filter(|s| !s.is_empty());
    match (married, spouse_id) {
        (true, None) => Err(PrequalError::SpouseIdRequired),
        (true, Some(id)) if id.chars().count() < MIN_SPOUSE_ID_LENGTH => {
            Err(PrequalError::InvalidSpouseId { id: id.to_string() })
        }
        (false, Some(_)) => Err(PrequalError::UnexpectedSpouseId),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_national_ids() {
        assert!(is_valid_national_id("1710034065"));
        assert!(is_valid_national_id("0926687856"));
        assert!(is_valid_national_id("1104680135"));
    }

    #[test]
    fn test_bad_check_digit_rejected() {
        assert!(!is_valid_national_id("1710034066"));
        assert!(!is_valid_national_id("0926687850"));
    }

    #[test]
    fn test_shape_rules() {
        assert!(!is_valid_national_id("171003406"));
        assert!(!is_valid_national_id("17100340651"));
        assert!(!is_valid_national_id("17100340a5"));
        // province 25 does not exist
        assert!(!is_valid_national_id("2510034065"));
        // province 00 does not exist
        assert!(!is_valid_national_id("0010034065"));
        // third digit above 5 belongs to companies
        assert!(!is_valid_national_id("1760034065"));
    }

    #[test]
    fn test_validate_national_id_errors() {
        assert!(matches!(validate_national_id(""), Err(PrequalError::MissingField { field: "id_number" })));
        assert!(matches!(validate_national_id("1234567890"), Err(PrequalError::InvalidIdNumber { .. })));
        assert!(validate_national_id("1710034065").is_ok());
    }

    #[test]
    fn test_phone_rules() {
        assert!(validate_phone("0991234567").is_ok());
        assert!(validate_phone("+593991234567").is_ok());
        assert!(validate_phone("123456").is_err());
        assert!(validate_phone("099-123-4567").is_err());
        assert!(validate_phone("+1234567890123456").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("ana.perez@example.com").is_ok());
        assert!(validate_email("ana@example").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ana perez@example.com").is_err());
        assert!(validate_email("ana@@example.com").is_err());
        assert!(validate_email("ana@example..com").is_err());
    }

    #[test]
    fn test_spouse_pairing() {
        assert!(validate_spouse_id(None, false).is_ok());
        assert!(validate_spouse_id(Some(""), false).is_ok());
        assert!(validate_spouse_id(Some("0926687856"), true).is_ok());
        assert!(matches!(validate_spouse_id(None, true), Err(PrequalError::SpouseIdRequired)));
        assert!(matches!(validate_spouse_id(Some("   "), true), Err(PrequalError::SpouseIdRequired)));
        assert!(matches!(validate_spouse_id(Some("1234"), true), Err(PrequalError::InvalidSpouseId { .. })));
        assert!(matches!(validate_spouse_id(Some("0926687856"), false), Err(PrequalError::UnexpectedSpouseId)));
    }
}
