//! JSON field encoder
//!
//! Every `append_*` function writes one `"key":<value>,` fragment to the end of
//! a byte buffer. Fragments always carry a trailing separator; [`close_record`]
//! removes the last one and adds the enclosing braces.
//!
//! Keys are written verbatim. They come from call-site literals and must not
//! need escaping. Values are escaped following RFC 8259, and encoding never
//! fails: bytes that are not valid UTF-8 are written as `\u00XX` escapes of the
//! raw byte.

use chrono::{DateTime, SecondsFormat, Utc};
use std::io::Write;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Field separator that terminates every fragment
pub const SEPARATOR: u8 = b',';

#[inline]
fn append_key(dst: &mut Vec<u8>, key: &str) {
    dst.push(b'"');
    dst.extend_from_slice(key.as_bytes());
    dst.extend_from_slice(b"\":");
}

/// Append a string field
pub fn append_str(dst: &mut Vec<u8>, key: &str, val: &str) {
    append_key(dst, key);
    dst.push(b'"');
    escape_utf8(dst, val.as_bytes());
    dst.extend_from_slice(b"\",");
}

/// Append a string field whose value may contain invalid UTF-8
pub fn append_bytes_str(dst: &mut Vec<u8>, key: &str, val: &[u8]) {
    append_key(dst, key);
    dst.push(b'"');
    append_escaped(dst, val);
    dst.extend_from_slice(b"\",");
}

/// Append a signed integer field
pub fn append_int(dst: &mut Vec<u8>, key: &str, val: i64) {
    append_key(dst, key);
    // Writing into a Vec cannot fail
    let _ = write!(dst, "{}", val);
    dst.push(SEPARATOR);
}

/// Append an unsigned integer field
pub fn append_uint(dst: &mut Vec<u8>, key: &str, val: u64) {
    append_key(dst, key);
    let _ = write!(dst, "{}", val);
    dst.push(SEPARATOR);
}

/// Append a boolean field
pub fn append_bool(dst: &mut Vec<u8>, key: &str, val: bool) {
    append_key(dst, key);
    dst.extend_from_slice(if val { b"true" } else { b"false" });
    dst.push(SEPARATOR);
}

/// Append a timestamp field as a quoted RFC 3339 string with second precision
pub fn append_time(dst: &mut Vec<u8>, key: &str, val: DateTime<Utc>) {
    append_key(dst, key);
    dst.push(b'"');
    dst.extend_from_slice(val.to_rfc3339_opts(SecondsFormat::Secs, true).as_bytes());
    dst.extend_from_slice(b"\",");
}

/// Escape `src` as the body of a JSON string
///
/// Valid UTF-8 runs are escaped character by character; each byte that does
/// not start a valid sequence is replaced by `\u00XX` and decoding resumes at
/// the following byte.
pub fn append_escaped(dst: &mut Vec<u8>, mut src: &[u8]) {
    loop {
        match std::str::from_utf8(src) {
            Ok(_) => {
                escape_utf8(dst, src);
                return;
            }
            Err(err) => {
                let (valid, rest) = src.split_at(err.valid_up_to());
                escape_utf8(dst, valid);
                // `rest` is non-empty: from_utf8 only fails on a bad byte
                push_unicode_escape(dst, rest[0]);
                src = &rest[1..];
            }
        }
    }
}

/// Escape a byte slice already known to be valid UTF-8.
///
/// Only ASCII bytes are ever rewritten, so multi-byte sequences are copied
/// through untouched.
fn escape_utf8(dst: &mut Vec<u8>, src: &[u8]) {
    let mut start = 0;
    for (i, &byte) in src.iter().enumerate() {
        let escape: &[u8] = match byte {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            0x08 => b"\\b",
            0x0c => b"\\f",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            0x00..=0x1f => b"",
            _ => continue,
        };

        dst.extend_from_slice(&src[start..i]);
        if escape.is_empty() {
            push_unicode_escape(dst, byte);
        } else {
            dst.extend_from_slice(escape);
        }
        start = i + 1;
    }
    dst.extend_from_slice(&src[start..]);
}

#[inline]
fn push_unicode_escape(dst: &mut Vec<u8>, byte: u8) {
    dst.extend_from_slice(&[
        b'\\',
        b'u',
        b'0',
        b'0',
        HEX_DIGITS[(byte >> 4) as usize],
        HEX_DIGITS[(byte & 0x0f) as usize],
    ]);
}

/// Close a fragment sequence into a JSON object
///
/// Exactly one trailing separator is removed before wrapping. An empty buffer
/// yields `{}`.
pub fn close_record(buf: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(buf.len() + 2);
    close_record_into(buf, &mut out);
    out
}

/// Same as [`close_record`], appending to an existing output buffer
pub fn close_record_into(buf: &[u8], out: &mut Vec<u8>) {
    let body = match buf.last() {
        Some(&SEPARATOR) => &buf[..buf.len() - 1],
        _ => buf,
    };
    out.reserve(body.len() + 2);
    out.push(b'{');
    out.extend_from_slice(body);
    out.push(b'}');
}
