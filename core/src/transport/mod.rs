//! Wire-level request/response model and the pluggable transport seam.

mod traits;
mod types;

pub use traits::Transport;
pub use types::{preview_body, ApiRequest, ApiResponse, Credentials, Method, BODY_PREVIEW_LIMIT};

#[cfg(test)]
pub(crate) mod fake;
