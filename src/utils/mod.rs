pub mod ip_validator;
pub mod time_format;

pub use time_format::{format_timestamp, now_timestamp};
