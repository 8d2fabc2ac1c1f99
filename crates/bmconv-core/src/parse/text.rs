use encoding_rs::{SHIFT_JIS, UTF_8};
use tracing::debug;

/// Decode chart bytes as UTF-8, falling back to Shift-JIS.
///
/// A leading UTF-8 byte order mark is dropped.
pub fn decode_chart_text(bytes: &[u8]) -> String {
    let (decoded, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return decoded.into_owned();
    }

    debug!("Chart is not valid UTF-8, decoding as Shift-JIS");
    let (decoded, _, _) = SHIFT_JIS.decode(bytes);
    decoded.into_owned()
}
