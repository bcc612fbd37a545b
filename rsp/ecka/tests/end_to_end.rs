mod common;

use hex_literal::hex;

use rsp_ecka::format::{CertificateRecord, CertificateType, KeyQualifier, KeyUsage, ScenarioFlags};
use rsp_ecka::{
    Curve, CurveRegistry, EckaError, KeyPair, ReceiptParams, Session, SessionKeys, SessionStage,
    TrustAnchor, TrustFailure, compute_key_data, compute_receipt, compute_shared_info,
    crypto::{derive_shared_secret, verify},
    make_crt, make_signing_data,
};

use common::{CardSimulator, SMDP_CERTIFICATE, ci_config, hex, today};

const ISD_P_AID: [u8; 16] = hex!("A0000005591010FFFFFFFF8900001100");

fn collect(keys: &SessionKeys) -> Vec<Vec<u8>> {
    keys.keys().map(<[u8]>::to_vec).collect()
}

#[test]
fn three_key_establishment_with_derivation_random() {
    let config = ci_config();
    let mut card = CardSimulator::new(ci_config());
    let mut session = Session::new(&config);

    let response = card.transmit(&session.install(&ISD_P_AID).unwrap());
    assert!(response.is_success());

    session
        .accept_card_certificate(&card.ecasd_certificate(), today())
        .unwrap();

    let apdu = session
        .send_certificate(&hex(SMDP_CERTIFICATE), today())
        .unwrap();
    let challenge = card.transmit(&apdu);
    assert!(challenge.is_success());

    let crt = make_crt(
        3,
        Some(&hex!("89049032123451234512345678901235")),
        Some(&hex!("0102030405060708090A0B0C0D0E0F10")),
        0x01,
        0x30,
        ScenarioFlags::INCLUDE_DERIVATION_RANDOM,
    );
    let apdu = session.send_key_parameters(crt, &challenge.data).unwrap();
    let response = card.transmit(&apdu);
    assert!(response.is_success());

    let keys = session.complete(&response).unwrap();
    assert_eq!(session.stage(), SessionStage::Established);
    assert_eq!(keys.key_count(), 3);
    let card_keys = card.keys().unwrap();
    assert_eq!(keys.receipt_key(), card_keys.receipt_key());
    assert_eq!(collect(&keys), collect(card_keys));
}

#[test]
fn single_key_establishment() {
    let config = ci_config();
    let mut card = CardSimulator::new(ci_config());
    let mut session = Session::new(&config);

    card.transmit(&session.install(&ISD_P_AID).unwrap());
    session
        .accept_card_certificate(&card.ecasd_certificate(), today())
        .unwrap();
    let challenge = card.transmit(
        &session
            .send_certificate(&hex(SMDP_CERTIFICATE), today())
            .unwrap(),
    );
    let crt = make_crt(1, None, None, 0x02, 0x31, ScenarioFlags::NONE);
    let response = card.transmit(&session.send_key_parameters(crt, &challenge.data).unwrap());

    let keys = session.complete(&response).unwrap();
    assert_eq!(keys.key_count(), 1);
    assert_eq!(collect(&keys), collect(card.keys().unwrap()));
}

#[test]
fn untrusted_card_certificate_yields_no_keys() {
    let rogue = KeyPair::generate(Curve::P256).unwrap();
    let config = rsp_ecka::Config::new(TrustAnchor::new(rogue.public));
    let card = CardSimulator::new(ci_config());
    let mut session = Session::new(&config);

    let err = session
        .accept_card_certificate(&card.ecasd_certificate(), today())
        .unwrap_err();
    assert_eq!(
        err,
        EckaError::CertificateNotTrusted(TrustFailure::BadSignature)
    );
    assert!(err.is_fatal());
    assert!(session.card_certificate().is_none());
    assert_eq!(session.stage(), SessionStage::Failed);

    let crt = make_crt(1, None, None, 0x01, 0x30, ScenarioFlags::NONE);
    assert!(matches!(
        session.send_key_parameters(crt, &[0; 16]),
        Err(EckaError::SessionState(_))
    ));
}

#[test]
fn card_rejects_untrusted_off_card_certificate() {
    let rogue = KeyPair::generate(Curve::P256).unwrap();
    let mut card = CardSimulator::new(rsp_ecka::Config::new(TrustAnchor::new(rogue.public)));
    let config = ci_config();
    let mut session = Session::new(&config);

    card.transmit(&session.install(&ISD_P_AID).unwrap());
    let response = card.transmit(
        &session
            .send_certificate(&hex(SMDP_CERTIFICATE), today())
            .unwrap(),
    );
    assert_eq!(response.sw, common::SW_WRONG_DATA);
    assert!(card.keys().is_none());
}

#[test]
fn receipt_mismatch_is_fatal() {
    let config = ci_config();
    let mut card = CardSimulator::new(ci_config());
    card.corrupt_receipt = true;
    let mut session = Session::new(&config);

    card.transmit(&session.install(&ISD_P_AID).unwrap());
    session
        .accept_card_certificate(&card.ecasd_certificate(), today())
        .unwrap();
    let challenge = card.transmit(
        &session
            .send_certificate(&hex(SMDP_CERTIFICATE), today())
            .unwrap(),
    );
    let crt = make_crt(1, None, None, 0x01, 0x30, ScenarioFlags::INCLUDE_DERIVATION_RANDOM);
    let response = card.transmit(&session.send_key_parameters(crt, &challenge.data).unwrap());

    let err = session.complete(&response).unwrap_err();
    assert_eq!(err, EckaError::ReceiptMismatch);
    assert!(err.is_fatal());
    assert_eq!(session.stage(), SessionStage::Failed);
    assert!(matches!(
        session.complete(&response),
        Err(EckaError::SessionState(_))
    ));
}

#[test]
fn ephemeral_agreement_on_both_sides() {
    let entity = KeyPair::generate(Curve::P256).unwrap();
    let card = KeyPair::generate(Curve::P256).unwrap();

    let zab_a = derive_shared_secret(&entity.private, &card.public).unwrap();
    let zab_b = derive_shared_secret(&card.private, &entity.public).unwrap();
    assert_eq!(zab_a.as_slice(), zab_b.as_slice());

    let dr = hex!("A1A2A3A4A5A6A7A8");
    let info =
        compute_shared_info(KeyQualifier::SingleKey, Some(&dr), None, None, None).unwrap();
    let a = compute_key_data(&entity.private, &card.public, &info, 128).unwrap();
    let b = compute_key_data(&card.private, &entity.public, &info, 128).unwrap();
    assert_eq!(a.len(), 16);
    assert_eq!(a.as_bytes(), b.as_bytes());

    let params = ReceiptParams {
        derivation_random: Some(&dr),
        ..ReceiptParams::new(0x01, 0x30, ScenarioFlags::INCLUDE_DERIVATION_RANDOM)
    };
    assert_eq!(
        compute_receipt(&params, a.as_bytes()).unwrap(),
        compute_receipt(&params, b.as_bytes()).unwrap()
    );
}

#[test]
fn fixture_signing_data_is_reproduced() {
    let record = CertificateRecord::from_hex(SMDP_CERTIFICATE).unwrap();
    let registry = CurveRegistry::standard();
    let data = make_signing_data(
        &record,
        &registry,
        CertificateType::SmDp,
        &[],
        KeyUsage::KEY_AGREEMENT,
    )
    .unwrap();
    assert_eq!(data, record.signed_bytes());

    let config = ci_config();
    verify(config.trust.ci_public_key(), &record.signature, &data).unwrap();
}
