#[allow(clippy::module_inception)]
pub mod error;
pub mod transport;

pub use error::{ApiError, AuthError, StorageError, WorkspaceError};
pub use transport::{TransportError, TransportErrorKind};
