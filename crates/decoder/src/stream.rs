use winnow::Parser;
use winnow::binary::{le_f32, le_f64, le_i16, le_i32, le_i64, le_u32, le_u64, le_u8};
use winnow::error::{ContextError, ErrMode};

use crate::error::DecodeError;

/// A little-endian cursor over a Binder transaction payload.
///
/// Tracks `pos` purely to apply Android's 4-byte alignment rule (§4.8):
/// every primitive narrower than 4 bytes pads the stream back up to the next
/// 4-byte boundary immediately after the read, `readByteUnaligned` being the
/// one documented exception.
pub struct Stream<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Stream<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Stream { input, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.input
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.input.len() < n {
            return Err(DecodeError::Truncated { needed: n, available: self.input.len() });
        }
        let (chunk, rest) = self.input.split_at(n);
        self.input = rest;
        self.pos += n;
        Ok(chunk)
    }

    /// Consume padding bytes until `pos` is a multiple of 4.
    pub fn align4(&mut self) -> Result<(), DecodeError> {
        let pad = (4 - self.pos % 4) % 4;
        if pad > 0 {
            self.take(pad)?;
        }
        Ok(())
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        let available = self.input.len();
        let value = le_i32
            .parse_next(&mut self.input)
            .map_err(|_: ErrMode<ContextError>| DecodeError::Truncated { needed: 4, available })?;
        self.pos += 4;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let available = self.input.len();
        let value = le_u32
            .parse_next(&mut self.input)
            .map_err(|_: ErrMode<ContextError>| DecodeError::Truncated { needed: 4, available })?;
        self.pos += 4;
        Ok(value)
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        let available = self.input.len();
        let value = le_i64
            .parse_next(&mut self.input)
            .map_err(|_: ErrMode<ContextError>| DecodeError::Truncated { needed: 8, available })?;
        self.pos += 8;
        Ok(value)
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        let available = self.input.len();
        let value = le_u64
            .parse_next(&mut self.input)
            .map_err(|_: ErrMode<ContextError>| DecodeError::Truncated { needed: 8, available })?;
        self.pos += 8;
        Ok(value)
    }

    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        let available = self.input.len();
        let value = le_i16
            .parse_next(&mut self.input)
            .map_err(|_: ErrMode<ContextError>| DecodeError::Truncated { needed: 2, available })?;
        self.pos += 2;
        Ok(value)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let available = self.input.len();
        let value = le_u8
            .parse_next(&mut self.input)
            .map_err(|_: ErrMode<ContextError>| DecodeError::Truncated { needed: 1, available })?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        let available = self.input.len();
        let value = le_f32
            .parse_next(&mut self.input)
            .map_err(|_: ErrMode<ContextError>| DecodeError::Truncated { needed: 4, available })?;
        self.pos += 4;
        Ok(value)
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        let available = self.input.len();
        let value = le_f64
            .parse_next(&mut self.input)
            .map_err(|_: ErrMode<ContextError>| DecodeError::Truncated { needed: 8, available })?;
        self.pos += 8;
        Ok(value)
    }
}
