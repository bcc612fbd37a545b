use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use tracing::{debug, warn};

use rsp_format::{
    Apdu, CertificateRecord, ControlReferenceTemplate, FormatError, KeyEstablishmentResponse,
    ResponseApdu, ScenarioFlags, install_for_key_establishment, send_off_card_certificate,
};

use crate::config::Config;
use crate::error::{EckaError, EckaResult};
use crate::establish::{
    ReceiptParams, SessionKeys, compute_key_data, send_key_parameters, shared_info_for,
    verify_receipt,
};
use crate::keys::KeyPair;
use crate::trust::TrustedCertificate;

/**
    Global session counter for monotonically-increasing session numbers.
*/
static SESSION_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    Started,
    KeyParametersSent,
    Established,
    /// A step failed. Nothing more can be done with this session.
    Failed,
}

/**
    Off-card side of one key establishment attempt.

    The ephemeral key pair is generated when the key parameters are sent
    and dropped as soon as the card's response has been processed. Any
    failed step poisons the session; start a new one to retry.
*/
pub struct Session<'a> {
    /// Monotonically-increasing session number (for logging).
    number: u64,
    config: &'a Config,
    stage: SessionStage,
    certificate_sent: bool,
    card: Option<TrustedCertificate>,
    ephemeral: Option<KeyPair>,
    crt: Option<ControlReferenceTemplate>,
}

impl<'a> Session<'a> {
    pub fn new(config: &'a Config) -> Self {
        Session {
            number: SESSION_COUNTER.fetch_add(1, Ordering::Relaxed),
            config,
            stage: SessionStage::Started,
            certificate_sent: false,
            card: None,
            ephemeral: None,
            crt: None,
        }
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn stage(&self) -> SessionStage {
        self.stage
    }

    /// The card's certificate, once accepted.
    pub fn card_certificate(&self) -> Option<&TrustedCertificate> {
        self.card.as_ref()
    }

    /**
        INSTALL [for personalization] of the security domain `aid`.
    */
    pub fn install(&mut self, aid: &[u8]) -> EckaResult<Apdu> {
        self.step(|session| {
            session.expect_stage(SessionStage::Started)?;
            debug!(session = session.number, aid = %hex::encode_upper(aid), "install");
            Ok(install_for_key_establishment(aid)?)
        })
    }

    /**
        Check our own certificate against the CI and build the STORE DATA
        that sends it to the card.
    */
    pub fn send_certificate(&mut self, certificate: &[u8], now: NaiveDate) -> EckaResult<Apdu> {
        self.step(|session| {
            session.expect_stage(SessionStage::Started)?;
            let record = CertificateRecord::from_bytes(certificate)?;
            session
                .config
                .trust
                .verify(&record, &session.config.registry, now)?;
            let apdu = send_off_card_certificate(certificate)?;
            session.certificate_sent = true;
            debug!(session = session.number, "off-card certificate accepted");
            Ok(apdu)
        })
    }

    /**
        Accept the card's ECASD certificate. Its public key is only used
        after it passed the trust check.
    */
    pub fn accept_card_certificate(
        &mut self,
        certificate: &[u8],
        now: NaiveDate,
    ) -> EckaResult<&TrustedCertificate> {
        self.step(|session| {
            session.expect_stage(SessionStage::Started)?;
            let record = CertificateRecord::from_bytes(certificate)?;
            let trusted = session
                .config
                .trust
                .verify(&record, &session.config.registry, now)?;
            debug!(session = session.number, "card certificate accepted");
            session.card = Some(trusted);
            Ok(())
        })?;
        self.card
            .as_ref()
            .ok_or(EckaError::SessionState("has no card certificate"))
    }

    /**
        Generate the ephemeral key pair on the card key's curve and build
        the signed key parameters for `crt`, answering `challenge`.
    */
    pub fn send_key_parameters(
        &mut self,
        crt: ControlReferenceTemplate,
        challenge: &[u8],
    ) -> EckaResult<Apdu> {
        self.step(|session| {
            session.expect_stage(SessionStage::Started)?;
            if !session.certificate_sent {
                return Err(EckaError::SessionState("has not sent its certificate"));
            }
            let card = session
                .card
                .as_ref()
                .ok_or(EckaError::SessionState("has no trusted card certificate"))?;

            let registry = &session.config.registry;
            let key_param_ref = registry.reference_for(card.public_key())?;
            let ephemeral = KeyPair::generate(card.public_key().curve())?;
            let apdu = send_key_parameters(
                challenge,
                &ephemeral,
                &crt.to_bytes()?,
                key_param_ref,
                session.config.signature_encoding,
            )?;

            debug!(
                session = session.number,
                key_id = crt.key_id,
                key_version = crt.key_version,
                curve = %ephemeral.public.curve(),
                "key parameters sent"
            );
            session.ephemeral = Some(ephemeral);
            session.crt = Some(crt);
            session.stage = SessionStage::KeyParametersSent;
            Ok(apdu)
        })
    }

    /**
        Derive the key set from the card's response and check its receipt.
    */
    pub fn complete(&mut self, response: &ResponseApdu) -> EckaResult<SessionKeys> {
        self.step(|session| {
            session.expect_stage(SessionStage::KeyParametersSent)?;
            // The ephemeral private key is used for this one derivation only.
            let ephemeral = session
                .ephemeral
                .take()
                .ok_or(EckaError::SessionState("has no ephemeral key"))?;
            let (Some(card), Some(crt)) = (&session.card, &session.crt) else {
                return Err(EckaError::SessionState("is missing key parameters"));
            };

            if !response.is_success() {
                return Err(FormatError::InvalidResponse(format!(
                    "status word {:04X}",
                    response.sw
                ))
                .into());
            }
            let response = KeyEstablishmentResponse::from_bytes(&response.data)?;
            let derivation_random = response.derivation_random.as_deref();
            if crt
                .scenario
                .contains(ScenarioFlags::INCLUDE_DERIVATION_RANDOM)
                && derivation_random.is_none()
            {
                return Err(FormatError::MissingField("derivation random").into());
            }

            let key_count = crt.qualifier.key_count();
            let key_length = usize::from(crt.key_length);
            let bits = session.config.key_data_bits.max((key_count + 1) * key_length * 8);
            let shared_info = shared_info_for(
                crt,
                derivation_random,
                card.record().ecasd_image_number.as_deref(),
            )?;
            let material =
                compute_key_data(&ephemeral.private, card.public_key(), &shared_info, bits)?;
            drop(ephemeral);
            let keys = material.split(key_length, key_count)?;

            let host = crt.host.as_ref();
            let receipt = ReceiptParams {
                derivation_random,
                sdin: host.map(|h| h.sdin.as_slice()),
                host_id: host.map(|h| h.host_id.as_slice()),
                ..ReceiptParams::new(crt.key_id, crt.key_version, crt.scenario)
            };
            verify_receipt(&receipt, keys.receipt_key(), &response.receipt)?;

            debug!(
                session = session.number,
                keys = keys.key_count(),
                "key set established"
            );
            session.stage = SessionStage::Established;
            Ok(keys)
        })
    }

    fn expect_stage(&self, stage: SessionStage) -> EckaResult<()> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(EckaError::SessionState("step called out of order"))
        }
    }

    fn step<T>(&mut self, f: impl FnOnce(&mut Self) -> EckaResult<T>) -> EckaResult<T> {
        if self.stage == SessionStage::Failed {
            return Err(EckaError::SessionState("failed earlier"));
        }
        let result = f(self);
        if let Err(error) = &result {
            warn!(session = self.number, %error, "key establishment failed");
            self.stage = SessionStage::Failed;
            self.ephemeral = None;
        }
        result
    }
}
