//! Client state layer: typed API client, durable session and the cached,
//! searchable question snapshot the presentation layer renders from.

pub mod http;
pub mod session;
pub mod state;

pub use http::{ApiClient, ClientError};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use state::ClientState;
