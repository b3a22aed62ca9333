//! 24-character hex record identifiers.
//!
//! Layout of the 12 underlying bytes: 4-byte big-endian unix seconds, 5 bytes of
//! per-process randomness, 3-byte wrapping counter.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use lazy_static::lazy_static;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::shared::validation::OBJECT_ID_REGEX;

lazy_static! {
    static ref PROCESS_UNIQUE: [u8; 5] = rand::random();
    static ref COUNTER: AtomicU32 = AtomicU32::new(rand::random::<u32>() & 0x00FF_FFFF);
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, sqlx::Type, ToSchema)]
#[serde(transparent)]
#[sqlx(transparent)]
#[schema(value_type = String, example = "65f1c2a9e4b0a1b2c3d4e5f6")]
pub struct ObjectId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid object id: {0:?}")]
pub struct InvalidObjectId(pub String);

impl ObjectId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        let mut bytes = [0u8; 12];
        let secs = Utc::now().timestamp() as u32;
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(hex::encode(bytes))
    }

    pub fn parse(raw: &str) -> Result<Self, InvalidObjectId> {
        if OBJECT_ID_REGEX.is_match(raw) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(InvalidObjectId(raw.to_string()))
        }
    }

    /// Parse an identifier taken from a request, failing with 400 before any store call
    pub fn parse_param(raw: &str, entity: &str) -> Result<Self, AppError> {
        Self::parse(raw).map_err(|_| AppError::BadRequest(format!("Invalid {} ID", entity)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
