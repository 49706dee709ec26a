/*
 * Responsibility
 * - 検証済みトークンから作られる主体 (Identity) の型
 * - 認証済み / 匿名を表す AuthUser と Credentials (scope の集合)
 *
 * Notes
 * - Identity は検証成功後にしか作られない。作られた時点で authenticated。
 */
use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::AuthError;

/// Decoded JWT payload, unfiltered.
pub type Claims = serde_json::Map<String, Value>;

pub const AUTHENTICATED: &str = "authenticated";

/// A user whose token passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    username: String,
    token: String,
    claims: Claims,
}

impl Identity {
    /// Builds the identity from decoded claims.
    ///
    /// The username claim must be a string or a number.
    pub fn from_claims(
        username_field: &str,
        token: impl Into<String>,
        claims: Claims,
    ) -> Result<Self, AuthError> {
        let username = match claims.get(username_field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(AuthError::invalid_token(format!(
                    "Token is missing the \"{username_field}\" claim"
                )));
            }
        };

        Ok(Self {
            username,
            token: token.into(),
            claims,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn display_name(&self) -> &str {
        &self.username
    }

    /// The encoded JWT as it arrived.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthUser {
    Authenticated(Identity),
    Anonymous,
}

impl AuthUser {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Anonymous => None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.identity().map(Identity::display_name).unwrap_or("")
    }
}

/// Scopes granted to the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    scopes: BTreeSet<String>,
}

impl Credentials {
    pub fn new<I, T>(scopes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn authenticated() -> Self {
        Self::new([AUTHENTICATED])
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> Claims {
        match value {
            Value::Object(map) => map,
            _ => panic!("claims must be an object"),
        }
    }

    #[test]
    fn identity_keeps_token_and_claims() {
        let payload = claims(json!({"username": "user", "role": "admin"}));
        let identity = Identity::from_claims("username", "a.b.c", payload.clone()).unwrap();

        assert_eq!(identity.username(), "user");
        assert_eq!(identity.display_name(), "user");
        assert_eq!(identity.token(), "a.b.c");
        assert_eq!(identity.claims(), &payload);
    }

    #[test]
    fn numeric_username_is_accepted() {
        let identity =
            Identity::from_claims("user_id", "t", claims(json!({"user_id": 42}))).unwrap();
        assert_eq!(identity.username(), "42");
    }

    #[test]
    fn missing_username_is_invalid_token() {
        let err = Identity::from_claims("username", "t", claims(json!({"sub": "x"}))).unwrap_err();
        assert_eq!(
            err,
            AuthError::invalid_token("Token is missing the \"username\" claim")
        );

        let err = Identity::from_claims("username", "t", claims(json!({"username": null})))
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::AuthErrorKind::InvalidToken);
    }

    #[test]
    fn anonymous_user() {
        let user = AuthUser::Anonymous;
        assert!(!user.is_authenticated());
        assert_eq!(user.display_name(), "");
        assert!(user.identity().is_none());
    }

    #[test]
    fn credentials() {
        assert!(Credentials::default().is_empty());
        assert!(Credentials::authenticated().contains("authenticated"));

        let creds = Credentials::new(["write", "read", "read"]);
        assert_eq!(creds.scopes().collect::<Vec<_>>(), ["read", "write"]);
        assert!(!creds.contains("authenticated"));
    }
}
