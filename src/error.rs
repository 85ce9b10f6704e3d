// 🚨 IBAN Errors - One error type, one enumerated code
// Every failure of the engine surfaces as an IbanError carrying an IbanErrorKind

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR KIND
// ============================================================================

/// Enumerated failure codes. The message of an error is derived from its kind only.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IbanErrorKind {
    #[error("Data could not be loaded")]
    DataLoadFailure,

    #[error("No Iban Calculation for this accountnumber")]
    NoCalculation,

    #[error("BBAN could not be generated.")]
    BBANError,

    #[error("IBAN could not be generated.")]
    IbanGeneratingError,

    #[error("IBAN could not be generated because not all parameters were set.")]
    IbanGeneratingNotAllParameters,

    #[error("The generated IBAN does not match the required formatting of the country.")]
    IbanGeneratingFormatting,

    #[error("IBAN could not be generated because check digit could not be calculated.")]
    IbanGeneratingCheckDigit,

    #[error("IBAN is not well formatted.")]
    IbanValidatingFormatting,

    #[error("The bank ident does not fit the formatting rule.")]
    BankIdentNotValid,

    #[error("For validating an iban please submit the iban code.")]
    IbanValidationIbanNeeded,

    #[error("Getting a bic is not supported for this country yet")]
    GetBicNoAllowedForCountry,
}

// ============================================================================
// ERROR
// ============================================================================

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// IbanError - the single error type of the engine
///
/// Lower-level failures (regex, numeric, provider internals) are wrapped once
/// as the `cause` of the nearest kind.
#[derive(Debug)]
pub struct IbanError {
    kind: IbanErrorKind,
    cause: Option<Cause>,
}

impl IbanError {
    pub fn new(kind: IbanErrorKind) -> Self {
        IbanError { kind, cause: None }
    }

    /// Wrap a lower-level error under the given kind
    pub fn with_cause<E>(kind: IbanErrorKind, cause: E) -> Self
    where
        E: Into<Cause>,
    {
        IbanError {
            kind,
            cause: Some(cause.into()),
        }
    }

    pub fn kind(&self) -> IbanErrorKind {
        self.kind
    }

    /// Fixed, human readable message for this error's kind
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl fmt::Display for IbanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for IbanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

impl From<IbanErrorKind> for IbanError {
    fn from(kind: IbanErrorKind) -> Self {
        IbanError::new(kind)
    }
}

pub type Result<T> = std::result::Result<T, IbanError>;

// ============================================================================
// TESTS
// ============================================================================
