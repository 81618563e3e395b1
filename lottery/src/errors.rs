use failure::Fail;

#[derive(Debug, Fail, PartialEq)]
pub enum ValidationError {
    #[fail(
        display = "contact number {} is invalid: expected +91 followed by 10 digits (e.g. +919876543210)",
        contact
    )]
    InvalidPhoneNumber { contact: String },
}
