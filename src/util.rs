use alloc::string::{String, ToString};
use core::{any::type_name, char::REPLACEMENT_CHARACTER};

use zerocopy::FromBytes;

use crate::ReadError;

/// Read a `T` at `offset`, failing instead of panicking when the data is too short.
pub fn read_at<T: FromBytes + Copy>(data: &[u8], offset: usize) -> Result<T, ReadError> {
    data.get(offset..)
        .and_then(|data| T::read_from_prefix(data).ok())
        .map(|(value, _)| value)
        .ok_or_else(|| ReadError(type_name::<T>().to_string(), offset))
}

/// Borrow `length` bytes at `offset`.
pub fn slice_at(data: &[u8], offset: usize, length: usize) -> Result<&[u8], ReadError> {
    offset
        .checked_add(length)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| ReadError(type_name::<[u8]>().to_string(), offset))
}

/// Decode little endian UTF-16 code units. Unpaired surrogates become U+FFFD,
/// a trailing odd byte is ignored.
pub fn read_u16_string(data: &[u8]) -> String {
    let units = data.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]]));
    char::decode_utf16(units).map(|c| c.unwrap_or(REPLACEMENT_CHARACTER)).collect()
}
