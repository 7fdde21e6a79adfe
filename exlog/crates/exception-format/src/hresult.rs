//! HRESULT codes: formatting, a handful of well-known values, and conversion
//! from operating-system error numbers.

use serde::{de, Deserialize, Deserializer};

/// Unspecified failure.
pub const E_FAIL: i32 = 0x8000_4005_u32 as i32;

/// One or more arguments are not valid.
pub const E_INVALIDARG: i32 = 0x8007_0057_u32 as i32;

/// Failed to allocate necessary memory.
pub const E_OUTOFMEMORY: i32 = 0x8007_000E_u32 as i32;

/// The operation was aborted.
pub const E_ABORT: i32 = 0x8000_4004_u32 as i32;

const FACILITY_WIN32: u32 = 7;
const SEVERITY_ERROR: u32 = 0x8000_0000;

/// Uppercase hexadecimal without a prefix or zero padding. Negative codes are
/// shown as their 32-bit two's-complement bit pattern, so `-2147024809` is
/// `80070057`.
///
/// The output never depends on the process locale.
pub fn to_hex(code: i32) -> String {
   format!("{code:X}")
}

/// Equivalent of `HRESULT_FROM_WIN32`: zero and values which are already
/// failure HRESULTs pass through; anything else becomes a failure in the
/// Win32 facility.
pub fn from_win32(code: i32) -> i32 {
   if code <= 0 {
      code
   } else {
      ((code as u32 & 0x0000_FFFF) | (FACILITY_WIN32 << 16) | SEVERITY_ERROR) as i32
   }
}

/// Accept anything representable as a signed *or* unsigned 32-bit integer.
///
/// HRESULTs are conventionally written as unsigned hex (`0x80070057`) but
/// carried around as signed values (`-2147024809`); both mean the same code.
pub fn from_i64(raw: i64) -> Option<i32> {
   i32::try_from(raw)
      .ok()
      .or_else(|| u32::try_from(raw).ok().map(|code| code as i32))
}

/// For use with `#[serde(deserialize_with = "hresult::deserialize")]`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
   D: Deserializer<'de>,
{
   let raw = i64::deserialize(deserializer)?;
   from_i64(raw).ok_or_else(|| {
      de::Error::custom(format!("HRESULT {raw} does not fit in 32 bits"))
   })
}
