pub mod backend;
pub mod header;
pub mod identity;
pub mod settings;
pub mod validator;

pub use backend::{AuthBackend, AuthOutcome, JwtBackend, WebSocketJwtBackend};
pub use header::token_from_header;
pub use identity::{AUTHENTICATED, AuthUser, Claims, Credentials, Identity};
pub use settings::{AuthSettings, DecodeOptions, KeyMaterial};
pub use validator::JwtValidator;
