pub mod credential;
pub mod session;
pub mod user;

pub use credential::{CredentialEntry, CredentialMap};
pub use session::{PersistedSession, Session};
pub use user::{NewUser, Role, UnknownRole, UserProfile};
