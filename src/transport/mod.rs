//! Transport layer: canonical query, request signing, and wire-format decoding.

mod canonical;
mod decode;
mod encoding;
mod query_send_details;
mod send_sms;
mod signer;

pub use canonical::CanonicalQuery;
pub use query_send_details::decode_query_send_details_response;
pub use send_sms::decode_send_sms_response;
pub use signer::{assemble_url, sign};
