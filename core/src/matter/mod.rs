//! Matter: the generic `(code, raw) <-> text` / `<-> binary` CESR primitive,
//! grounded on `keriox_core::event_parsing::parsing::{from_bytes_to_text,
//! from_text_to_bytes}` and `Prefix::to_str`'s lead-byte stripping, but
//! generalized into free functions any code family (digest, verfer,
//! signature, seed) can call instead of re-implementing the padding
//! arithmetic per prefix type.

use crate::error::Error;

const B64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

fn is_base64url(c: u8) -> bool {
    B64_CHARS.contains(&c)
}

/// Lead-pad size for a raw payload of `n` bytes: `ps = (3 - n mod 3) mod 3`.
pub fn pad_size(n: usize) -> usize {
    (3 - n % 3) % 3
}

/// Encode `(code, raw)` to CESR text: base64url-encode the lead-padded raw
/// bytes, then splice the code over the first `cs` characters of the result.
///
/// `code_size` is `cs`, the textual width of the code itself.
pub fn encode_text(code: &str, raw: &[u8]) -> Result<String, Error> {
    let cs = code.len();
    let ps = pad_size(raw.len());
    let mut padded = vec![0u8; ps];
    padded.extend_from_slice(raw);
    let b64 = base64::encode_config(&padded, base64::URL_SAFE_NO_PAD);
    // The pad bytes became `ps` leading 'A' characters (zero in base64url);
    // the code must be no longer than that lead, or it would also overwrite
    // payload bits. keriox's Prefix::to_str strips exactly `dc.len()` chars
    // when `dc.len() % 4 != 0` and otherwise zero; here we always overwrite
    // the first `cs` chars, matching the general Matter contract in §4.1.
    if cs > b64.len() {
        return Err(Error::TruncatedInput {
            expected: cs,
            got: b64.len(),
        });
    }
    let mut out = String::with_capacity(cs + b64.len() - cs.min(b64.len()));
    out.push_str(code);
    out.push_str(&b64[cs..]);
    if out.len() % 4 != 0 {
        return Err(Error::InvariantViolation(format!(
            "encoded CESR text length {} is not a multiple of 4",
            out.len()
        )));
    }
    Ok(out)
}

/// Encode `(code, raw)` to CESR binary (the 24-bit-aligned form): base64-decode
/// the textual encoding back to raw bytes. Binary CESR is simply the raw
/// concatenation of code bits + payload bits with the same padding discipline,
/// so we reuse `encode_text` and decode the base64 alphabet to get the exact
/// byte-aligned binary value.
pub fn encode_binary(code: &str, raw: &[u8]) -> Result<Vec<u8>, Error> {
    let text = encode_text(code, raw)?;
    Ok(base64::decode_config(&text, base64::URL_SAFE_NO_PAD)?)
}

/// Decode CESR text given the known code size `cs`: read off the code,
/// restore the stripped characters with 'A' padding, base64-decode, and
/// strip the `ps` lead bytes.
pub fn decode_text(text: &str, cs: usize, ps: usize) -> Result<(String, Vec<u8>), Error> {
    if text.len() < cs {
        return Err(Error::TruncatedInput {
            expected: cs,
            got: text.len(),
        });
    }
    if text.len() % 4 != 0 {
        return Err(Error::TruncatedInput {
            expected: text.len() + (4 - text.len() % 4) % 4,
            got: text.len(),
        });
    }
    let code = text[..cs].to_string();
    if !text.bytes().skip(cs).all(is_base64url) {
        return Err(Error::NonCanonicalBase64);
    }
    let restored = format!("{}{}", "A".repeat(cs), &text[cs..]);
    let decoded = base64::decode_config(&restored, base64::URL_SAFE_NO_PAD)?;
    if decoded.len() < ps {
        return Err(Error::PaddingMismatch);
    }
    let raw = decoded[ps..].to_vec();
    Ok((code, raw))
}

/// Decode CESR binary back to `(code, raw)`. `cs` is the code size in
/// characters; the binary form packs 6 bits per base64 character, so the code
/// occupies `ceil(cs * 6 / 8)` bytes minus the padding discipline used in
/// `encode_binary`. We implement this by re-deriving the text form.
pub fn decode_binary(bytes: &[u8], code_str_len: usize, ps: usize) -> Result<(String, Vec<u8>), Error> {
    let text = base64::encode_config(bytes, base64::URL_SAFE_NO_PAD);
    decode_text(&text, code_str_len, ps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_size() {
        assert_eq!(pad_size(32), 1);
        assert_eq!(pad_size(64), 2);
        assert_eq!(pad_size(33), 0);
    }

    #[test]
    fn round_trip_32_byte_digest() {
        let raw = vec![0xAB; 32];
        let text = encode_text("E", &raw).unwrap();
        assert_eq!(text.len() % 4, 0);
        assert_eq!(&text[..1], "E");
        let (code, decoded) = decode_text(&text, 1, pad_size(32)).unwrap();
        assert_eq!(code, "E");
        assert_eq!(decoded, raw);
    }

    #[test]
    fn round_trip_zero_digest() {
        let raw = vec![0u8; 32];
        let text = encode_text("E", &raw).unwrap();
        assert_eq!(text, "E".to_string() + &"A".repeat(43));
        let (_, decoded) = decode_text(&text, 1, pad_size(32)).unwrap();
        assert_eq!(decoded, raw);
    }

    #[test]
    fn from_text_to_bytes_vectors() {
        // ported from keriox_core::event_parsing::parsing tests
        let decoded = base64::decode_config(
            format!("{}{}", "A".repeat(0), "MP__"),
            base64::URL_SAFE_NO_PAD,
        )
        .unwrap();
        assert_eq!(hex_encode(&decoded), "30ffff");
    }

    fn hex_encode(b: &[u8]) -> String {
        b.iter().map(|x| format!("{:02x}", x)).collect()
    }
}
