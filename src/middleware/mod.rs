/*
 * Responsibility
 * - middleware の公開インターフェース
 * - session: JWT → Session (claims) を extensions に載せる
 * - authentication: AuthBackend の結果 (Credentials, AuthUser) を extensions に載せる
 * - policy: route ごとのアクセス方針
 * - http: request id / trace / timeout
 */
pub mod authentication;
pub mod http;
pub mod policy;
pub mod session;

pub use policy::{AccessPolicy, protect};
pub use session::{Session, SessionAuth};
