//! Deposit note wire format.
//!
//! Notes are ASCII strings whose fields are joined with `_` and decoded
//! positionally. The leading prefix names the note family and is compared
//! case-sensitively before any other field is trusted. Fields never contain the
//! separator; callers building notes are responsible for that.

use base64::{
    Engine as _,
    engine::general_purpose::STANDARD,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub const NOTE_SEPARATOR: char = '_';
pub const INFLUENCE_NOTE_PREFIX: &str = "awe";
pub const BUILD_NOTE_PREFIX: &str = "awebuild";
pub const PACK_PURCHASE_OPERATION: &str = "pp";

const INFLUENCE_NOTE_FIELDS: usize = 5;
const BUILD_NOTE_FIELDS: usize = 6;
const PACK_PURCHASE_NOTE_FIELDS: usize = 4;

#[cfg(test)]
mod tests;

/// Correlates a locally submitted deposit with the processed-notes tables.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Mint a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NoteDecodeError {
    #[error("transaction carries no note")]
    Missing,
    #[error("note is not valid base64: {0}")]
    Base64(String),
    #[error("note is not valid utf-8")]
    Utf8,
    #[error("expected note prefix '{expected}', found '{found}'")]
    Prefix {
        expected: &'static str,
        found: String,
    },
    #[error("expected {expected} note fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("note field '{field}' is not a decimal number: '{value}'")]
    NotNumeric { field: &'static str, value: String },
}

/// Decoded form of `awe_<receiver>_<assetIndex>_<depositAmount>_<noteId>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluenceDepositNote {
    pub receiver: String,
    pub asset_index: u64,
    /// Filled in after decode from the asset's on-chain name, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_title: Option<String>,
    pub influence_deposit: u64,
    pub note_id: NoteId,
}

impl InfluenceDepositNote {
    pub fn encode(&self) -> String {
        encode_influence_note(
            &self.receiver,
            self.asset_index,
            self.influence_deposit,
            &self.note_id,
        )
    }

    pub fn decode(note: &str) -> Result<Self, NoteDecodeError> {
        let fields = split_fields(note, INFLUENCE_NOTE_PREFIX, INFLUENCE_NOTE_FIELDS)?;
        Ok(Self {
            receiver: fields[1].to_string(),
            asset_index: parse_number("assetIndex", fields[2])?,
            asset_title: None,
            influence_deposit: parse_number("depositAmount", fields[3])?,
            note_id: NoteId::from(fields[4]),
        })
    }

    /// Decode a note field as returned by the indexer (base64).
    pub fn decode_base64(note: &str) -> Result<Self, NoteDecodeError> {
        Self::decode(&note_text_from_base64(note)?)
    }
}

/// Decoded form of
/// `awebuild_<receiver>_<assetIndex>_<depositAmount>_<objectType>_<noteId>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildNote {
    pub receiver: String,
    pub asset_index: u64,
    pub deposit: u64,
    pub object: String,
    pub note_id: NoteId,
}

impl BuildNote {
    pub fn encode(&self) -> String {
        encode_build_note(
            &self.receiver,
            self.asset_index,
            self.deposit,
            &self.object,
            &self.note_id,
        )
    }

    pub fn decode(note: &str) -> Result<Self, NoteDecodeError> {
        let fields = split_fields(note, BUILD_NOTE_PREFIX, BUILD_NOTE_FIELDS)?;
        Ok(Self {
            receiver: fields[1].to_string(),
            asset_index: parse_number("assetIndex", fields[2])?,
            deposit: parse_number("depositAmount", fields[3])?,
            object: fields[4].to_string(),
            note_id: NoteId::from(fields[5]),
        })
    }

    pub fn decode_base64(note: &str) -> Result<Self, NoteDecodeError> {
        Self::decode(&note_text_from_base64(note)?)
    }
}

/// Decoded form of `awe_pp_<packId>_<buyerAddress>`, plus the id of the
/// payment transaction it was found on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackPurchaseNote {
    pub pack_id: u64,
    pub buyer_address: String,
    #[serde(default)]
    pub tx_id: String,
}

impl PackPurchaseNote {
    pub fn encode(&self) -> String {
        encode_pack_purchase_note(self.pack_id, &self.buyer_address)
    }

    /// Decodes the note text; `tx_id` is left empty for the caller to fill.
    pub fn decode(note: &str) -> Result<Self, NoteDecodeError> {
        let fields =
            split_fields(note, INFLUENCE_NOTE_PREFIX, PACK_PURCHASE_NOTE_FIELDS)?;
        if fields[1] != PACK_PURCHASE_OPERATION {
            return Err(NoteDecodeError::Prefix {
                expected: PACK_PURCHASE_OPERATION,
                found: fields[1].to_string(),
            });
        }
        Ok(Self {
            pack_id: parse_number("packId", fields[2])?,
            buyer_address: fields[3].to_string(),
            tx_id: String::new(),
        })
    }
}

pub fn encode_influence_note(
    receiver: &str,
    asset_index: u64,
    deposit_amount: u64,
    note_id: &NoteId,
) -> String {
    join_fields(
        [
            INFLUENCE_NOTE_PREFIX.to_string(),
            receiver.to_string(),
            asset_index.to_string(),
            deposit_amount.to_string(),
            note_id.to_string(),
        ],
    )
}

pub fn encode_build_note(
    receiver: &str,
    asset_index: u64,
    deposit_amount: u64,
    object_type: &str,
    note_id: &NoteId,
) -> String {
    join_fields(
        [
            BUILD_NOTE_PREFIX.to_string(),
            receiver.to_string(),
            asset_index.to_string(),
            deposit_amount.to_string(),
            object_type.to_string(),
            note_id.to_string(),
        ],
    )
}

pub fn encode_pack_purchase_note(pack_id: u64, buyer_address: &str) -> String {
    join_fields([
        INFLUENCE_NOTE_PREFIX.to_string(),
        PACK_PURCHASE_OPERATION.to_string(),
        pack_id.to_string(),
        buyer_address.to_string(),
    ])
}

fn join_fields<const N: usize>(fields: [String; N]) -> String {
    itertools::join(fields, &NOTE_SEPARATOR.to_string())
}

/// Literal that every influence note sent to `manager` starts with.
pub fn influence_prefix(manager: &str) -> String {
    format!("{INFLUENCE_NOTE_PREFIX}{NOTE_SEPARATOR}{manager}")
}

/// Literal that every build note sent to `manager` starts with.
pub fn build_prefix(manager: &str) -> String {
    format!("{BUILD_NOTE_PREFIX}{NOTE_SEPARATOR}{manager}")
}

pub fn pack_purchase_prefix() -> String {
    format!("{INFLUENCE_NOTE_PREFIX}{NOTE_SEPARATOR}{PACK_PURCHASE_OPERATION}{NOTE_SEPARATOR}")
}

/// Decode an indexer note field into its UTF-8 text.
pub fn note_text_from_base64(note: &str) -> Result<String, NoteDecodeError> {
    let bytes = STANDARD
        .decode(note.trim())
        .map_err(|e| NoteDecodeError::Base64(e.to_string()))?;
    String::from_utf8(bytes).map_err(|_| NoteDecodeError::Utf8)
}

fn split_fields<'a>(
    note: &'a str,
    prefix: &'static str,
    expected: usize,
) -> Result<Vec<&'a str>, NoteDecodeError> {
    let fields: Vec<&str> = note.split(NOTE_SEPARATOR).collect();
    if fields[0] != prefix {
        return Err(NoteDecodeError::Prefix {
            expected: prefix,
            found: fields[0].to_string(),
        });
    }
    if fields.len() != expected {
        return Err(NoteDecodeError::FieldCount {
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn parse_number(field: &'static str, value: &str) -> Result<u64, NoteDecodeError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NoteDecodeError::NotNumeric {
            field,
            value: value.to_string(),
        });
    }
    value.parse().map_err(|_| NoteDecodeError::NotNumeric {
        field,
        value: value.to_string(),
    })
}
