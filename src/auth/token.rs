//! Opaque session tokens.
//!
//! A token is `base64("<user id>:<unix millis>")`. Nothing on the server ever
//! decodes it: mutating routes only check that one was sent.

use base64ct::{Base64, Encoding};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

pub fn issue_token(user_id: Uuid) -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let token = Base64::encode_string(format!("{user_id}:{millis}").as_bytes());
    debug!(%user_id, "token issued");
    token
}
