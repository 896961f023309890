//! Attachment-group framing for signatures (§6.1, §4.10): a counter code
//! naming the kind and count of what follows, then each CESR primitive in
//! turn. Ported in spirit from `keriox_core::event_message::signature`,
//! narrowed to the two groups this crate's wire format actually emits
//! (controller-indexed and witness-indexed signatures) since the
//! transferable-receipt signer-data variants the teacher also carries are
//! out of this crate's scope (§9, receipt semantics: only non-transferable
//! receipts are implemented here).

use crate::codex::CounterCode;
use crate::error::Error;
use crate::prefix::IndexedSignature;

/// Render a group of indexed signatures as `-A##` (or `-B##` for witness
/// receipts) followed by each signature's CESR text, concatenated.
pub fn encode_group(code: CounterCode, sigs: &[IndexedSignature]) -> Result<String, Error> {
    let counter = code.encode(sigs.len() as u16)?;
    let mut out = counter;
    for sig in sigs {
        out.push_str(&sig.to_str());
    }
    Ok(out)
}

/// Parse a `-A##`/`-B##` group back into `(code, sigs, rest)`, where `rest`
/// is whatever text follows the group — readers MUST handle extra trailing
/// attachments (§6.1).
pub fn decode_group(text: &str) -> Result<(CounterCode, Vec<IndexedSignature>, &str), Error> {
    if text.len() < 4 {
        return Err(Error::TruncatedInput {
            expected: 4,
            got: text.len(),
        });
    }
    let code = CounterCode::from_prefix(&text[..2])?;
    let count = decode_count(&text[2..4])?;
    let mut rest = &text[4..];
    let mut sigs = Vec::with_capacity(count as usize);
    const SIG_WIDTH: usize = 4 + 88; // index primitive (4 chars) + Ed25519Sha512 signature (88 chars)
    for _ in 0..count {
        if rest.len() < SIG_WIDTH {
            return Err(Error::TruncatedInput {
                expected: SIG_WIDTH,
                got: rest.len(),
            });
        }
        sigs.push(rest[..SIG_WIDTH].parse()?);
        rest = &rest[SIG_WIDTH..];
    }
    Ok((code, sigs, rest))
}

fn decode_count(s: &str) -> Result<u16, Error> {
    const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
    let mut bytes = s.bytes();
    let hi = bytes
        .next()
        .and_then(|c| ALPHABET.find(c as char))
        .ok_or_else(|| Error::InvalidCode(s.to_string()))?;
    let lo = bytes
        .next()
        .and_then(|c| ALPHABET.find(c as char))
        .ok_or_else(|| Error::InvalidCode(s.to_string()))?;
    Ok((hi * 64 + lo) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefix::SelfSigningPrefix;

    #[test]
    fn round_trip_controller_sig_group() {
        let sigs = vec![
            IndexedSignature::new(SelfSigningPrefix::Ed25519Sha512(vec![1; 64]), 0),
            IndexedSignature::new(SelfSigningPrefix::Ed25519Sha512(vec![2; 64]), 2),
        ];
        let text = encode_group(CounterCode::ControllerIdxSigs, &sigs).unwrap();
        let (code, decoded, rest) = decode_group(&text).unwrap();
        assert_eq!(code, CounterCode::ControllerIdxSigs);
        assert_eq!(decoded, sigs);
        assert!(rest.is_empty());
    }

    #[test]
    fn trailing_attachments_are_preserved_in_rest() {
        let sigs = vec![IndexedSignature::new(SelfSigningPrefix::Ed25519Sha512(vec![9; 64]), 0)];
        let mut text = encode_group(CounterCode::ControllerIdxSigs, &sigs).unwrap();
        text.push_str("-Cxx-extra-trailing-bytes");
        let (_, _, rest) = decode_group(&text).unwrap();
        assert_eq!(rest, "-Cxx-extra-trailing-bytes");
    }
}
