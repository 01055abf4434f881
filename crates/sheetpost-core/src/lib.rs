pub mod classify;
pub mod dispatch;
pub mod email;
pub mod error;
pub mod grid;
pub mod personalize;
pub mod resolve;

pub use classify::*;
pub use dispatch::{
    dispatch, eligible_recipients, is_eligible, DispatchRequest, DispatchResult, Mailer,
    OutgoingMail, SendFailure, TemplateKind,
};
pub use email::{canonicalize_email, clean_email, is_valid_email_format};
pub use error::CoreError;
pub use grid::{normalize, RawGrid, Record};
pub use personalize::personalize_certificate;
pub use resolve::{resolve_field, FieldSpec, CERTIFICATE_FIELD, EMAIL_FIELD, NAME_FIELD};
