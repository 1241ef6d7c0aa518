//! Template format engine
//!
//! [`render`] expands a record's template from a [`Catalog`] into a
//! caller-supplied byte buffer, `snprintf`-style: the buffer is never
//! overrun, any non-empty buffer ends up NUL-terminated, and the returned
//! [`Rendered::needed`] is the size the full output would have required,
//! terminator included. Calling it with an empty buffer measures the output.
//!
//! Directives:
//!
//! | template | output |
//! |----------|--------|
//! | `%%` | `%` |
//! | `%1`..`%8` | parameter, by type |
//! | `%` + anything else | the `%` is dropped, the next character is kept |
//! | trailing `%` | dropped |
//!
//! Catalogs are externally authored, so malformed directives are never an
//! error.

use super::catalog::Catalog;
use super::error::{LoggerError, Result};
use super::param::Param;
use super::record::{Record, PARAM_MAX};
use std::fmt::{self, Write};

/// Significant digits for real parameters, as C's `%g`
const REAL_PRECISION: usize = 6;

/// Outcome of a [`render`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendered {
    /// Bytes the full output needs, terminator included
    pub needed: usize,
    /// Bytes actually written, terminator excluded
    pub written: usize,
    /// Size of the buffer that was rendered into
    pub capacity: usize,
}

impl Rendered {
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.needed > self.capacity
    }

    /// The rendered text inside `buf`
    ///
    /// A cut that landed inside a multi-byte character is trimmed back to the
    /// last whole character.
    pub fn text<'b>(&self, buf: &'b [u8]) -> &'b str {
        let bytes = &buf[..self.written.min(buf.len())];
        match std::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
        }
    }
}

/// Render `record` against `catalog` into `buf`
///
/// Fails with [`LoggerError::UnknownMessage`] when the record's code has no
/// template; nothing is written to `buf` in that case. Never allocates.
pub fn render(catalog: &Catalog, record: &Record, buf: &mut [u8]) -> Result<Rendered> {
    let template = catalog
        .template(record.code())
        .ok_or_else(|| LoggerError::unknown_message(record.code()))?;

    let mut out = BoundedWriter::new(buf);
    expand(template, record, &mut out);
    Ok(out.finish())
}

/// Render into a newly allocated `String` of exactly the needed size
pub fn render_to_string(catalog: &Catalog, record: &Record) -> Result<String> {
    let template = catalog
        .template(record.code())
        .ok_or_else(|| LoggerError::unknown_message(record.code()))?;

    let mut measure = BoundedWriter::new(&mut []);
    expand(template, record, &mut measure);

    let mut text = String::with_capacity(measure.total);
    expand(template, record, &mut text);
    Ok(text)
}

/// Walk `template`, copying literal runs and substituting directives
fn expand<W: Write>(template: &str, record: &Record, out: &mut W) {
    let bytes = template.as_bytes();
    let mut literal = 0;
    let mut i = 0;

    // Neither writer can fail, so write results are ignored throughout.
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }

        let _ = out.write_str(&template[literal..i]);
        match bytes.get(i + 1) {
            Some(b'%') => {
                let _ = out.write_char('%');
                i += 2;
            }
            Some(digit @ b'1'..=b'8') => {
                let index = usize::from(*digit - b'1');
                debug_assert!(index < PARAM_MAX);
                write_param(out, &record.params()[index]);
                i += 2;
            }
            _ => i += 1,
        }
        literal = i;
    }

    let _ = out.write_str(&template[literal..]);
}

fn write_param<W: Write>(out: &mut W, param: &Param) {
    let _ = write!(out, "{}", param);
}

/// Write `value` the way C's `%g` does: six significant digits, trailing
/// zeros trimmed, exponent form below 1e-4 or from 1e6 up
pub(crate) fn write_general<W: Write>(out: &mut W, value: f64) -> fmt::Result {
    if value.is_nan() {
        return out.write_str("nan");
    }
    if value.is_infinite() {
        return out.write_str(if value < 0.0 { "-inf" } else { "inf" });
    }
    if value == 0.0 {
        return out.write_str(if value.is_sign_negative() { "-0" } else { "0" });
    }

    let mut scientific = StackText::new();
    write!(scientific, "{:.*e}", REAL_PRECISION - 1, value)?;
    let (mantissa, exponent) = match scientific.as_str().split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= REAL_PRECISION as i32 {
        out.write_str(trim_fraction(mantissa))?;
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(out, "e{}{:02}", sign, exponent.unsigned_abs())
    } else {
        let decimals = (REAL_PRECISION as i32 - 1 - exponent) as usize;
        let mut fixed = StackText::new();
        write!(fixed, "{:.*}", decimals, value)?;
        out.write_str(trim_fraction(fixed.as_str()))
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// Copies what fits below the terminator slot and counts everything
struct BoundedWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
    total: usize,
}

impl<'a> BoundedWriter<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            total: 0,
        }
    }

    fn finish(self) -> Rendered {
        if let Some(terminator) = self.buf.get_mut(self.pos) {
            *terminator = 0;
        }
        Rendered {
            needed: self.total + 1,
            written: self.pos,
            capacity: self.buf.len(),
        }
    }
}

impl Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let limit = self.buf.len().saturating_sub(1);
        let n = s.len().min(limit - self.pos);
        self.buf[self.pos..self.pos + n].copy_from_slice(&s.as_bytes()[..n]);
        self.pos += n;
        self.total += s.len();
        Ok(())
    }
}

/// Small stack buffer for intermediate number text
struct StackText {
    buf: [u8; 40],
    len: usize,
}

impl StackText {
    fn new() -> Self {
        Self {
            buf: [0; 40],
            len: 0,
        }
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }
}

impl Write for StackText {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}
