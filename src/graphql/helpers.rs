use async_graphql::ErrorExtensions;
use validator::Validate;

use crate::errors::{AppError, AppResult};

/// Converts a service result, attaching the stable `code` extension on failure.
pub fn with_code<T>(result: AppResult<T>) -> async_graphql::Result<T> {
    result.map_err(|err| err.extend())
}

pub fn validated<T: Validate>(input: T) -> async_graphql::Result<T> {
    input
        .validate()
        .map_err(|err| AppError::from(err).extend())?;
    Ok(input)
}
