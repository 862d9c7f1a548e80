pub mod options;
pub mod request_id;

pub use options::OptionsResponder;
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdMiddleware};
