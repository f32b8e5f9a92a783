pub mod chat;
pub mod conversations;
pub mod health;

use bson::oid::ObjectId;
use std::str::FromStr;

use crate::error::ApiError;

/// Parse a path/body id into an ObjectId, rejecting malformed input early
pub(crate) fn parse_conversation_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::from_str(raw)
        .map_err(|_| ApiError::BadRequest("Invalid conversation ID format".to_string()))
}
