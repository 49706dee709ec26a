/*!
 * Authentication context extractors
 *
 * Responsibility:
 * - middleware が extensions に格納した認証結果を handler に渡す
 * - 型定義は services::auth / middleware::session 側に置き、ここは取り出しのみ
 *
 * Public API:
 * - SessionClaims (session middleware の結果)
 * - CurrentUser (authentication middleware の結果)
 */

mod core;

pub use self::core::{CurrentUser, SessionClaims};
