pub mod contact;
pub mod draw;
pub mod errors;
