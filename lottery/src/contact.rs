use crate::errors::ValidationError;

const COUNTRY_PREFIX: &str = "+91";
const NATIONAL_DIGITS: usize = 10;

/// Validate a participant contact number.
///
/// Accepts exactly `+91` followed by ten digits, the format the draw
/// notifications are sent to. Anything else is rejected before storage.
pub fn validate_phone(contact: &str) -> Result<(), ValidationError> {
    let national = contact
        .strip_prefix(COUNTRY_PREFIX)
        .ok_or_else(|| invalid(contact))?;
    if national.len() == NATIONAL_DIGITS && national.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(invalid(contact))
    }
}

fn invalid(contact: &str) -> ValidationError {
    ValidationError::InvalidPhoneNumber {
        contact: contact.to_string(),
    }
}
