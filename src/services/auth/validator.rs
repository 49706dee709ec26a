use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, Validation};

use crate::error::{AuthError, SetupError};
use crate::services::auth::header;
use crate::services::auth::identity::{Claims, Identity};
use crate::services::auth::settings::AuthSettings;

/// Token extraction + validation bound to one [`AuthSettings`].
///
/// - Key material is intentionally not printable via Debug.
/// - Cheap to share behind an `Arc`; nothing is mutated after `new`.
#[derive(Clone)]
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    prefix: String,
    username_field: String,
    query_param: String,
}

impl std::fmt::Debug for JwtValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtValidator")
            .field("validation", &self.validation)
            .field("prefix", &self.prefix)
            .field("username_field", &self.username_field)
            .field("query_param", &self.query_param)
            .finish()
    }
}

impl JwtValidator {
    pub fn new(settings: &AuthSettings) -> Result<Self, SetupError> {
        let algorithm = settings.algorithm();
        let decoding_key = settings.key().decoding_key(algorithm)?;
        let options = settings.options();

        let mut validation = Validation::new(algorithm);
        validation.required_spec_claims = options.require.iter().cloned().collect();
        validation.leeway = options.leeway;
        validation.validate_exp = options.verify_exp;
        validation.validate_nbf = options.verify_nbf;

        // A configured audience or issuer must also be present in the token.
        match settings.audience() {
            Some([]) => return Err(SetupError::EmptyClaimList { claim: "aud" }),
            Some(audience) if options.verify_aud => {
                validation.set_audience(audience);
                validation.required_spec_claims.insert("aud".to_string());
            }
            _ => validation.validate_aud = false,
        }

        match settings.issuer() {
            Some([]) => return Err(SetupError::EmptyClaimList { claim: "iss" }),
            Some(issuer) => {
                validation.set_issuer(issuer);
                validation.required_spec_claims.insert("iss".to_string());
            }
            None => {}
        }

        if !options.verify_signature {
            tracing::warn!(
                ?algorithm,
                "JWT signature verification is disabled; tokens are trusted as-is"
            );
            validation.insecure_disable_signature_validation();
        }

        Ok(Self {
            decoding_key,
            validation,
            prefix: settings.prefix().to_string(),
            username_field: settings.username_field().to_string(),
            query_param: settings.query_param().to_string(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn username_field(&self) -> &str {
        &self.username_field
    }

    pub fn query_param(&self) -> &str {
        &self.query_param
    }

    /// Header parsing with the configured scheme prefix.
    pub fn token_from_header<'a>(&self, value: Option<&'a str>) -> Result<&'a str, AuthError> {
        header::token_from_header(value, &self.prefix)
    }

    /// Verify and decode a token into its full claims map.
    ///
    /// Every failure of the decode primitive becomes `InvalidToken`.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::invalid_token(describe(&e)))?;

        Ok(data.claims)
    }

    /// Decode, then build the [`Identity`] from the username claim.
    pub fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self.decode(token)?;
        Identity::from_claims(&self.username_field, token, claims)
    }
}

fn describe(err: &JwtError) -> String {
    match err.kind() {
        ErrorKind::InvalidSignature => "Signature verification failed".to_string(),
        ErrorKind::ExpiredSignature => "Signature has expired".to_string(),
        ErrorKind::ImmatureSignature => "The token is not yet valid (nbf)".to_string(),
        ErrorKind::InvalidAudience => "Invalid audience".to_string(),
        ErrorKind::InvalidIssuer => "Invalid issuer".to_string(),
        ErrorKind::InvalidSubject => "Invalid subject".to_string(),
        ErrorKind::InvalidAlgorithm => "The specified alg value is not allowed".to_string(),
        ErrorKind::MissingRequiredClaim(claim) => format!("Token is missing the \"{claim}\" claim"),
        ErrorKind::InvalidToken => "Invalid token: expected header.payload.signature".to_string(),
        ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            format!("Invalid token: {err}")
        }
        _ => err.to_string(),
    }
}
