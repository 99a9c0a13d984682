//! The string encoding used when file names are sent in http headers.
//!
//! See the [string encoding][1] page of the backblaze documentation.
//!
//! [1]: https://www.backblaze.com/b2/docs/string_encoding.html

use std::fmt::Write;

const SAFE_BYTES: &[u8] = b"._-/~!$'()*;=:@";

fn is_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric() || SAFE_BYTES.contains(&b)
}

/// Encode a file name for use in the `X-Bz-File-Name` header.
///
/// Every byte of the utf-8 encoding that is not an ascii letter, an ascii digit or one
/// of `._-/~!$'()*;=:@` is replaced by `%` followed by its value in lowercase hex.
///
/// The hex is not zero padded, so bytes below `0x10` are written with a single digit.
///
/// ```
/// use b2_upload::encoding::encode_file_name;
///
/// assert_eq!(encode_file_name("photos/cat 1.jpg"), "photos/cat%201.jpg");
/// assert_eq!(encode_file_name("tab\there"), "tab%9here");
/// ```
pub fn encode_file_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for &b in raw.as_bytes() {
        if is_safe(b) {
            out.push(char::from(b));
        } else {
            // writing to a String cannot fail
            let _ = write!(out, "%{:x}", b);
        }
    }
    out
}
