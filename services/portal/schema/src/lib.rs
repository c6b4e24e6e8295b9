pub mod application_drafts;
pub mod applications;
pub mod documents;
pub mod otp_codes;
pub mod users;
