//! JSON answers for unrouted requests.

use crate::error::AppError;

/// Known path, unsupported method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Unknown path.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
