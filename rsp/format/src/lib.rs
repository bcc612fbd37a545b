#![allow(clippy::doc_overindented_list_items)]

mod apdu;
mod certificate;
mod crt;
mod date;
mod error;
mod key_parameters;
mod shared_info;
mod types;

pub use self::apdu::{
    Apdu, KeyEstablishmentResponse, ResponseApdu, SW_SUCCESS, install_for_key_establishment,
    send_off_card_certificate, store_key_parameters,
};
pub use self::certificate::{
    CertificateRecord, DiscretionaryData, EncodedPublicKey, assemble_certificate,
};
pub use self::crt::{ControlReferenceTemplate, HostIdentification};
pub use self::date::CertDate;
pub use self::error::{FormatError, FormatResult};
pub use self::key_parameters::KeyParameters;
pub use self::shared_info::SharedInfo;
pub use self::types::{CertificateType, KeyQualifier, KeyType, KeyUsage, ScenarioFlags};
