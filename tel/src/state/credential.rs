//! Credential lifecycle state (§3.4: "issued/revoked"). Ported from
//! `support/teliox::state::vc_state::TelState`, keeping the issuing event's
//! own digest in `Issued` so the next `rev`'s `p` has something to bind
//! against, the way the teacher's `Issued(Vec<u8>)` holds the serialized
//! `iss`/`bis` event.

use keri_core::sai::said::SelfAddressingIdentifier;

use crate::error::Error;
use crate::event::credential::{CredentialEvent, CredentialEventData};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialState {
    NotIssued,
    Issued(SelfAddressingIdentifier),
    Revoked,
}

impl Default for CredentialState {
    fn default() -> Self {
        CredentialState::NotIssued
    }
}

impl CredentialState {
    /// Apply `event`, whose own digest is `event_digest`. Double-issuance
    /// and revoke-before-issue are fatal (§4.8: "Credential double-issuance
    /// and revoke-before-issue are fatal"), surfaced as `TypeForbidden`
    /// rather than an escrow-worthy ordering failure, since no future
    /// arrival can ever make them valid.
    pub fn apply(&self, event: &CredentialEvent, event_digest: SelfAddressingIdentifier) -> Result<Self, Error> {
        match (&event.event_data, self) {
            (CredentialEventData::Iss(_), CredentialState::NotIssued) => {
                if event.sn != 0 {
                    return Err(keri_core::error::Error::OutOfOrderSequence {
                        expected: 0,
                        got: event.sn,
                    }
                    .into());
                }
                Ok(CredentialState::Issued(event_digest))
            }
            (CredentialEventData::Iss(_), _) => {
                Err(keri_core::error::Error::TypeForbidden("iss: credential already has a lifecycle".into()).into())
            }
            (CredentialEventData::Rev(rev), CredentialState::Issued(last)) => {
                if &rev.prior_event_digest != last {
                    return Err(keri_core::error::Error::PriorMismatch.into());
                }
                if event.sn != 1 {
                    return Err(keri_core::error::Error::OutOfOrderSequence {
                        expected: 1,
                        got: event.sn,
                    }
                    .into());
                }
                Ok(CredentialState::Revoked)
            }
            (CredentialEventData::Rev(_), _) => {
                Err(keri_core::error::Error::TypeForbidden("rev: credential not issued or already revoked".into()).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::credential::{CredentialIssuance, CredentialRevocation};
    use keri_core::prefix::IdentifierPrefix;
    use keri_core::sai::derivation::SelfAddressing;

    fn said(bytes: &[u8]) -> SelfAddressingIdentifier {
        SelfAddressingIdentifier::derive(SelfAddressing::Blake3_256, bytes)
    }

    #[test]
    fn iss_then_matching_rev_revokes() {
        let cred_id = IdentifierPrefix::SelfAddressing(said(b"credential"));
        let registry_id = IdentifierPrefix::SelfAddressing(said(b"registry"));

        let iss = CredentialEvent::new(cred_id.clone(), 0, CredentialEventData::Iss(CredentialIssuance { registry_id }));
        let iss_digest = said(b"iss event bytes");
        let state = CredentialState::default().apply(&iss, iss_digest.clone()).unwrap();
        assert_eq!(state, CredentialState::Issued(iss_digest.clone()));

        let rev = CredentialEvent::new(cred_id, 1, CredentialEventData::Rev(CredentialRevocation { prior_event_digest: iss_digest }));
        let rev_digest = said(b"rev event bytes");
        let state = state.apply(&rev, rev_digest).unwrap();
        assert_eq!(state, CredentialState::Revoked);
    }

    #[test]
    fn double_issuance_is_type_forbidden() {
        let cred_id = IdentifierPrefix::SelfAddressing(said(b"credential"));
        let registry_id = IdentifierPrefix::SelfAddressing(said(b"registry"));
        let iss = CredentialEvent::new(
            cred_id,
            0,
            CredentialEventData::Iss(CredentialIssuance { registry_id }),
        );
        let state = CredentialState::default().apply(&iss, said(b"first")).unwrap();
        let err = state.apply(&iss, said(b"second")).unwrap_err();
        assert!(matches!(err, Error::Core(keri_core::error::Error::TypeForbidden(_))));
    }

    #[test]
    fn revoke_before_issue_is_type_forbidden() {
        let cred_id = IdentifierPrefix::SelfAddressing(said(b"credential"));
        let rev = CredentialEvent::new(
            cred_id,
            0,
            CredentialEventData::Rev(CredentialRevocation { prior_event_digest: said(b"nonexistent") }),
        );
        let err = CredentialState::default().apply(&rev, said(b"bytes")).unwrap_err();
        assert!(matches!(err, Error::Core(keri_core::error::Error::TypeForbidden(_))));
    }

    #[test]
    fn rev_with_wrong_prior_digest_is_rejected() {
        let cred_id = IdentifierPrefix::SelfAddressing(said(b"credential"));
        let registry_id = IdentifierPrefix::SelfAddressing(said(b"registry"));
        let iss = CredentialEvent::new(cred_id.clone(), 0, CredentialEventData::Iss(CredentialIssuance { registry_id }));
        let state = CredentialState::default().apply(&iss, said(b"iss digest")).unwrap();

        let rev = CredentialEvent::new(cred_id, 1, CredentialEventData::Rev(CredentialRevocation { prior_event_digest: said(b"wrong digest") }));
        let err = state.apply(&rev, said(b"rev digest")).unwrap_err();
        assert!(matches!(err, Error::Core(keri_core::error::Error::PriorMismatch)));
    }
}
