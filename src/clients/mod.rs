//! Typed clients for the MDS Cloud services. Each call asks the shared
//! [`AuthManager`](crate::auth::AuthManager) for a token first.

pub mod error;
pub mod file;
pub mod functions;
pub mod identity;
pub mod queue;
pub mod service;
pub mod state_machine;

pub use error::ClientError;
pub use file::FileServiceClient;
pub use functions::ServerlessFunctionsClient;
pub use identity::IdentityClient;
pub use queue::QueueServiceClient;
pub use state_machine::StateMachineServiceClient;
