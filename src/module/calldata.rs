//! Calldata layout: a 4-byte selector followed by the encoded arguments.

use crate::core::errors::CallError;
use crate::types::encoding::{Decode, DecodeError, Encode};
use crate::types::selector::{SELECTOR_SIZE, Selector};
use bytes::Bytes;

/// Builds calldata for `selector` with `args` encoded after it.
pub fn encode_call<A: Encode + ?Sized>(selector: Selector, args: &A) -> Vec<u8> {
    let mut out = Vec::new();
    selector.encode(&mut out);
    args.encode(&mut out);
    out
}

/// Decodes the arguments following the selector.
///
/// The whole argument area must be consumed.
pub fn decode_args<A: Decode>(calldata: &[u8]) -> Result<A, CallError> {
    let args = calldata.get(SELECTOR_SIZE..).unwrap_or(&[]);
    A::from_bytes(args).map_err(|e| CallError::InvalidCalldata {
        selector: Selector::from_calldata(calldata),
        reason: e.to_string(),
    })
}

pub fn encode_return<T: Encode + ?Sized>(value: &T) -> Bytes {
    Bytes::from(value.to_vec())
}

pub fn decode_return<T: Decode>(data: &[u8]) -> Result<T, DecodeError> {
    T::from_bytes(data)
}
