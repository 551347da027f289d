pub mod batcher;
pub mod client;
pub mod requester;

pub use crate::domain::model::{ChunkOutcome, MembershipChangeRequest, MembershipOperation, OperationResult};
pub use crate::domain::ports::{HttpMethod, HttpRequest, HttpTransport, TransportError};
pub use crate::utils::error::Result;
