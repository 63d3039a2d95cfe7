// lib/src/storage_engine/storage_utils.rs

use bincode::config::{self, BigEndian, Configuration, Fixint};
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::CareResult;

/// Standard bincode configuration for relational rows.
pub fn bincode_config() -> Configuration<BigEndian, Fixint> {
    config::standard()
        .with_big_endian()
        .with_fixed_int_encoding()
}

/// Encodes a relational row.
pub fn encode_row<T: Serialize>(row: &T) -> CareResult<Vec<u8>> {
    Ok(encode_to_vec(row, bincode_config())?)
}

/// Decodes a relational row.
pub fn decode_row<T: DeserializeOwned>(bytes: &[u8]) -> CareResult<T> {
    let (row, _) = decode_from_slice(bytes, bincode_config())?;
    Ok(row)
}

/// Patient collections keep self-describing JSON documents.
pub fn encode_document<T: Serialize>(doc: &T) -> CareResult<Vec<u8>> {
    Ok(serde_json::to_vec(doc)?)
}

pub fn decode_document<T: DeserializeOwned>(bytes: &[u8]) -> CareResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}
