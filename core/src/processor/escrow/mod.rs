//! The multi-stage escrow pipeline (§4.11): events that fail validation for
//! a locally-recoverable reason are held here instead of rejected outright,
//! and promoted back into the KEL once the missing ingredient (a signature,
//! a delegator anchor, a witness receipt) arrives. Ported in spirit from
//! `keriox_core::processor::escrow`'s per-reason escrow types, collapsed
//! onto this crate's synchronous `EventLog` storage contract instead of a
//! notification bus with its own escrow-specific database trait.

pub mod delegation;
pub mod out_of_order;
pub mod partially_signed;
pub mod partially_witnessed;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::database::{keys, EventLog};
use crate::error::Error;
use crate::event_message::signed_event_message::{parse_message, Message, SignedEventMessage};
use crate::prefix::Prefix;

/// Timeouts for each stage (§4.11's escrow TTL policy). Entries older than
/// their stage's timeout are `EscrowExpired` rather than retried forever.
#[derive(Debug, Clone)]
pub struct EscrowConfig {
    pub out_of_order_timeout: Duration,
    pub partially_signed_timeout: Duration,
    pub partially_witnessed_timeout: Duration,
    pub delegation_timeout: Duration,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            out_of_order_timeout: Duration::from_secs(3600),
            partially_signed_timeout: Duration::from_secs(3600),
            partially_witnessed_timeout: Duration::from_secs(3600),
            delegation_timeout: Duration::from_secs(3600),
        }
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// One escrowed event: the wire-encoded `SignedEventMessage` prefixed by the
/// unix timestamp it first entered the stage at.
fn encode_entry(entered_at: u64, signed: &SignedEventMessage) -> Result<Vec<u8>, Error> {
    let mut out = entered_at.to_be_bytes().to_vec();
    out.extend(signed.encode()?);
    Ok(out)
}

fn decode_entry(bytes: &[u8]) -> Result<(u64, SignedEventMessage), Error> {
    if bytes.len() < 8 {
        return Err(Error::StorageCorrupt("escrow entry shorter than its timestamp prefix".into()));
    }
    let mut ts = [0u8; 8];
    ts.copy_from_slice(&bytes[..8]);
    let entered_at = u64::from_be_bytes(ts);
    let (message, _rest) = parse_message(&bytes[8..])?;
    match message {
        Message::Event(signed) => Ok((entered_at, signed)),
        Message::NontransferableRct(_) => Err(Error::StorageCorrupt("escrow entry is a receipt, not an event".into())),
    }
}

/// Shared plumbing every per-reason escrow stage is built on: a flat
/// `escrow/{stage}/{aid}/{sn_hex}` namespace in the underlying `EventLog`.
pub(crate) struct StageStore {
    db: std::sync::Arc<dyn EventLog + Send + Sync>,
    stage: &'static str,
    timeout: Duration,
}

impl StageStore {
    fn new(db: std::sync::Arc<dyn EventLog + Send + Sync>, stage: &'static str, timeout: Duration) -> Self {
        Self { db, stage, timeout }
    }

    fn key(&self, aid: &str, sn: u64) -> String {
        keys::escrow(self.stage, &format!("{aid}/{sn:016x}"))
    }

    /// Replace whatever is held for `(aid, sn)` with `signed`, resetting its
    /// entry time.
    fn put(&self, signed: &SignedEventMessage) -> Result<(), Error> {
        let aid = signed.event_message.data.prefix.to_str();
        let sn = signed.event_message.data.sn;
        self.db.put(&self.key(&aid, sn), &encode_entry(now_unix(), signed)?)
    }

    fn get(&self, aid: &str, sn: u64) -> Result<Option<(u64, SignedEventMessage)>, Error> {
        match self.db.get(&self.key(aid, sn))? {
            None => Ok(None),
            Some(bytes) => Ok(Some(decode_entry(&bytes)?)),
        }
    }

    fn remove(&self, aid: &str, sn: u64) -> Result<(), Error> {
        self.db.del(&self.key(aid, sn))
    }

    /// Every entry currently held in this stage, oldest-contribution
    /// timestamp included, dropping (and deleting) whatever has outlived
    /// this stage's timeout.
    fn live_entries(&self) -> Result<Vec<SignedEventMessage>, Error> {
        let mut out = vec![];
        for (key, bytes) in self.db.list(&keys::escrow_prefix(self.stage))? {
            let (entered_at, signed) = decode_entry(&bytes)?;
            if now_unix().saturating_sub(entered_at) > self.timeout.as_secs() {
                self.db.del(&key)?;
                continue;
            }
            out.push(signed);
        }
        Ok(out)
    }
}
