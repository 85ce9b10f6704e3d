// ⏳ Async Entry Points - Offload to the blocking pool
//
// Each call runs the synchronous operation on tokio's blocking pool and awaits it.
// A task that fails to complete (panic) surfaces as IbanGeneratingError.
// No ordering, cancellation or backpressure semantics are added: a dropped future
// does not stop the computation.

use std::sync::Arc;

use crate::entities::{BankIdentifierCode, CountryCode, IbanBic};
use crate::error::{IbanError, IbanErrorKind, Result};
use crate::registry::ManagerRegistry;

async fn offload<T, F>(kind: IbanErrorKind, operation: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(|e| IbanError::with_cause(kind, e))?
}

pub async fn generate_iban_async(
    registry: Arc<ManagerRegistry>,
    country_code: CountryCode,
    bank_ident: String,
    account_number: String,
) -> Result<IbanBic> {
    offload(IbanErrorKind::IbanGeneratingError, move || {
        registry.generate_iban(country_code, &bank_ident, &account_number)
    })
    .await
}

pub async fn validate_iban_async(registry: Arc<ManagerRegistry>, iban: String) -> Result<bool> {
    offload(IbanErrorKind::IbanGeneratingError, move || {
        registry.validate_iban(&iban)
    })
    .await
}

pub async fn get_bic_async(
    registry: Arc<ManagerRegistry>,
    iban: String,
) -> Result<BankIdentifierCode> {
    offload(IbanErrorKind::IbanGeneratingError, move || {
        registry.get_bic(&iban)
    })
    .await
}

// ============================================================================
// TESTS
// ============================================================================
