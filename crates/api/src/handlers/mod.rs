//! Request handlers. Each handler delegates to the search pipeline held in
//! [`AppState`](crate::state::AppState) and maps errors via
//! [`AppError`](crate::error::AppError).

pub mod search;
