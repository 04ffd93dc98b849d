//! Fixed-width little-endian readers for binary formats
//!
//! Every vendor binary layout supported here stores numbers little-endian.
//! The readers below:
//!
//! 1. Read exactly N bytes from the stream
//! 2. Fail with [`FormatError::UnexpectedEof`] if fewer are available
//! 3. Interpret the bytes as little-endian (`byteorder` resolves the host
//!    byte order at compile time, so big-endian hosts swap and little-endian
//!    hosts do not)

use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{FormatError, Result};

/// Longest fixed-length string field [`read_string`] accepts.
pub const MAX_STRING_LEN: usize = 65535;

/// Read one byte.
pub fn read_u8<R: Read + ?Sized>(r: &mut R) -> Result<u8> {
    Ok(r.read_u8()?)
}

/// Read an unsigned 16-bit little-endian integer.
pub fn read_u16_le<R: Read + ?Sized>(r: &mut R) -> Result<u16> {
    Ok(r.read_u16::<LittleEndian>()?)
}

/// Read a signed 16-bit little-endian integer.
pub fn read_i16_le<R: Read + ?Sized>(r: &mut R) -> Result<i16> {
    Ok(r.read_i16::<LittleEndian>()?)
}

/// Read an unsigned 32-bit little-endian integer.
pub fn read_u32_le<R: Read + ?Sized>(r: &mut R) -> Result<u32> {
    Ok(r.read_u32::<LittleEndian>()?)
}

/// Read a signed 32-bit little-endian integer.
pub fn read_i32_le<R: Read + ?Sized>(r: &mut R) -> Result<i32> {
    Ok(r.read_i32::<LittleEndian>()?)
}

/// Read an IEEE-754 single precision little-endian float.
pub fn read_f32_le<R: Read + ?Sized>(r: &mut R) -> Result<f32> {
    Ok(r.read_f32::<LittleEndian>()?)
}

/// Read an IEEE-754 double precision little-endian float.
pub fn read_f64_le<R: Read + ?Sized>(r: &mut R) -> Result<f64> {
    Ok(r.read_f64::<LittleEndian>()?)
}

/// Read a fixed-length string field of `len` bytes.
///
/// The field is cut at the first NUL byte; bytes that are not valid UTF-8 are
/// replaced. Lengths above [`MAX_STRING_LEN`] are rejected before reading.
pub fn read_string<R: Read + ?Sized>(r: &mut R, len: usize) -> Result<String> {
    if len > MAX_STRING_LEN {
        return Err(FormatError::StringTooLong {
            len,
            limit: MAX_STRING_LEN,
        }
        .into());
    }

    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;

    let end = buf.iter().position(|&b| b == 0).unwrap_or(len);
    Ok(String::from_utf8_lossy(&buf[..end]).into_owned())
}

/// Read exactly `len` raw bytes.
pub fn read_bytes<R: Read + ?Sized>(r: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let got = Read::take(&mut *r, len as u64).read_to_end(&mut buf)?;
    if got < len {
        return Err(FormatError::UnexpectedEof.into());
    }
    Ok(buf)
}

/// Skip `len` bytes, failing if the stream ends first.
pub fn skip<R: Read + ?Sized>(r: &mut R, len: u64) -> Result<()> {
    let skipped = io::copy(&mut Read::take(&mut *r, len), &mut io::sink())?;
    if skipped < len {
        return Err(FormatError::UnexpectedEof.into());
    }
    Ok(())
}

/// Decode a DEC PDP-11 single precision float.
///
/// The 32 bits are stored as two little-endian 16-bit words, high word first.
/// A biased exponent of 0 means zero regardless of the mantissa.
pub fn pdp11_f32(bytes: [u8; 4]) -> f64 {
    let [p0, p1, p2, p3] = bytes;
    let exponent = (i32::from(p1 & 0x7f) << 1) + i32::from(p0 >> 7) - 128;
    if exponent == -128 {
        return 0.0;
    }
    let mantissa = f64::from(128 + u32::from(p0 & 0x7f)) / 256.0
        + f64::from(p3) / 65536.0
        + f64::from(p2) / 16_777_216.0;
    let sign = if p1 & 0x80 == 0 { 1.0 } else { -1.0 };
    sign * mantissa * 2f64.powi(exponent)
}
