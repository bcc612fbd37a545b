/*!
    Certificate trust decisions against a Certificate Issuer (CI) key.

    A certificate is accepted when, in order:
    1. its CA key identifier names the CI key (when one is configured)
    2. its signature verifies under the CI public key
    3. the check date lies within its effective / expiration dates
    4. its serial number is not revoked

    Only a `TrustedCertificate` can feed key agreement, so an untrusted
    certificate never produces key material.
*/

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::{debug, warn};

use rsp_core::utils::unsigned_be;
use rsp_format::CertificateRecord;

use crate::crypto::verify;
use crate::curves::CurveRegistry;
use crate::error::{EckaError, EckaResult, TrustFailure};
use crate::keys::{PublicKey, decode_public_key};

#[derive(Debug, Clone)]
pub struct TrustAnchor {
    ci_public_key: PublicKey,
    ci_key_id: Option<Vec<u8>>,
    revoked_serials: BTreeSet<Vec<u8>>,
}

impl TrustAnchor {
    pub fn new(ci_public_key: PublicKey) -> Self {
        Self {
            ci_public_key,
            ci_key_id: None,
            revoked_serials: BTreeSet::new(),
        }
    }

    /**
        Also require the certificate's CA key identifier to equal `key_id`.
    */
    pub fn with_ci_key_id(mut self, key_id: impl Into<Vec<u8>>) -> Self {
        self.ci_key_id = Some(key_id.into());
        self
    }

    /**
        Reject certificates with this serial number. Leading zero bytes
        are ignored when comparing.
    */
    pub fn revoke(&mut self, serial: &[u8]) {
        self.revoked_serials.insert(unsigned_be(serial).to_vec());
    }

    pub fn is_revoked(&self, serial: &[u8]) -> bool {
        self.revoked_serials.contains(unsigned_be(serial))
    }

    pub fn ci_public_key(&self) -> &PublicKey {
        &self.ci_public_key
    }

    pub fn ci_key_id(&self) -> Option<&[u8]> {
        self.ci_key_id.as_deref()
    }

    pub fn verify(
        &self,
        record: &CertificateRecord,
        registry: &CurveRegistry,
        now: NaiveDate,
    ) -> EckaResult<TrustedCertificate> {
        if let Err(failure) = self.check(record, now) {
            warn!(
                serial = %hex::encode_upper(&record.serial),
                %failure,
                "rejecting certificate"
            );
            return Err(EckaError::CertificateNotTrusted(failure));
        }

        let public_key = decode_public_key(&record.public_key, registry)?;
        debug!(
            serial = %hex::encode_upper(&record.serial),
            curve = %public_key.curve(),
            "certificate trusted"
        );
        Ok(TrustedCertificate {
            record: record.clone(),
            public_key,
        })
    }

    fn check(&self, record: &CertificateRecord, now: NaiveDate) -> Result<(), TrustFailure> {
        if let Some(key_id) = &self.ci_key_id
            && record.ca_key_id != *key_id
        {
            return Err(TrustFailure::IssuerMismatch);
        }
        verify(&self.ci_public_key, &record.signature, record.signed_bytes())
            .map_err(|_| TrustFailure::BadSignature)?;
        if let Some(effective) = &record.effective_date
            && now < effective.date()
        {
            return Err(TrustFailure::NotYetValid);
        }
        if now > record.expiration_date.date() {
            return Err(TrustFailure::Expired);
        }
        if self.is_revoked(&record.serial) {
            return Err(TrustFailure::Revoked);
        }
        Ok(())
    }
}

/**
    A certificate that passed `TrustAnchor::verify`, with its decoded
    public key.
*/
#[derive(Debug, Clone)]
pub struct TrustedCertificate {
    record: CertificateRecord,
    public_key: PublicKey,
}

impl TrustedCertificate {
    pub fn record(&self) -> &CertificateRecord {
        &self.record
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}
