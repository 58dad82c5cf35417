use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;

use crate::utils::base64url_decode;

use super::errors::TokenVerificationError;
use super::jwks::{Jwk, Jwks};

const GOOGLE_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];

// Tolerate the local clock running this many seconds behind the provider
const CLOCK_SKEW_SECS: i64 = 2;

#[allow(unused)]
#[derive(Debug, Deserialize, Clone)]
pub(super) struct IdInfo {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub azp: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub iat: i64,
    pub exp: i64,
    pub nbf: Option<i64>,
}

fn convert_jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, TokenVerificationError> {
    let component = |value: &Option<String>, name: &str| {
        value
            .clone()
            .ok_or_else(|| TokenVerificationError::MissingKeyComponent(name.to_string()))
    };

    match jwk.kty.as_str() {
        "RSA" => Ok(DecodingKey::from_rsa_components(
            &component(&jwk.n, "n")?,
            &component(&jwk.e, "e")?,
        )?),
        "EC" => Ok(DecodingKey::from_ec_components(
            &component(&jwk.x, "x")?,
            &component(&jwk.y, "y")?,
        )?),
        "oct" => {
            let k = base64url_decode(&component(&jwk.k, "k")?)?;
            Ok(DecodingKey::from_secret(&k))
        }
        kty => Err(TokenVerificationError::UnsupportedAlgorithm(kty.to_string())),
    }
}

/// The header algorithm must belong to the key's family
fn check_algorithm(jwk: &Jwk, alg: Algorithm) -> Result<(), TokenVerificationError> {
    use Algorithm::*;

    let family_ok = match jwk.kty.as_str() {
        "RSA" => matches!(alg, RS256 | RS384 | RS512 | PS256 | PS384 | PS512),
        "EC" => matches!(alg, ES256 | ES384),
        "oct" => matches!(alg, HS256 | HS384 | HS512),
        _ => false,
    };
    let declared_ok = jwk
        .alg
        .as_deref()
        .is_none_or(|declared| declared == format!("{alg:?}"));

    if family_ok && declared_ok {
        Ok(())
    } else {
        Err(TokenVerificationError::UnsupportedAlgorithm(format!("{alg:?}")))
    }
}

fn decode_token(token: &str) -> Result<IdInfo, TokenVerificationError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenVerificationError::InvalidTokenFormat);
    }
    let decoded_payload = base64url_decode(parts[1])?;
    let idinfo: IdInfo = serde_json::from_slice(&decoded_payload)?;
    Ok(idinfo)
}

fn verify_signature(
    token: &str,
    decoding_key: &DecodingKey,
    alg: Algorithm,
) -> Result<bool, TokenVerificationError> {
    let (message, signature) = token
        .rsplit_once('.')
        .ok_or(TokenVerificationError::InvalidTokenFormat)?;

    Ok(jsonwebtoken::crypto::verify(
        signature,
        message.as_bytes(),
        decoding_key,
        alg,
    )?)
}

/// Verify an id token against an already fetched key set
pub(super) fn verify_idtoken(
    token: &str,
    audience: &str,
    jwks: &Jwks,
    now: i64,
) -> Result<IdInfo, TokenVerificationError> {
    let header = jsonwebtoken::decode_header(token)?;

    let kid = header
        .kid
        .ok_or(TokenVerificationError::MissingKeyComponent(
            "kid".to_string(),
        ))?;
    let alg = header.alg;
    let idinfo = decode_token(token)?;

    tracing::debug!("Algorithm from JWT header: {:?}", alg);

    let jwk = jwks.find(&kid).ok_or(TokenVerificationError::NoMatchingKey)?;
    check_algorithm(jwk, alg)?;
    let decoding_key = convert_jwk_to_decoding_key(jwk)?;

    if !verify_signature(token, &decoding_key, alg)? {
        return Err(TokenVerificationError::InvalidTokenSignature);
    }

    if idinfo.aud != audience {
        return Err(TokenVerificationError::InvalidTokenAudience(
            audience.to_string(),
            idinfo.aud.to_string(),
        ));
    }

    if !GOOGLE_ISSUERS.contains(&idinfo.iss.as_str()) {
        return Err(TokenVerificationError::InvalidTokenIssuer(
            idinfo.iss.to_string(),
        ));
    }

    if let Some(nbf) = idinfo.nbf {
        if now + CLOCK_SKEW_SECS < nbf {
            return Err(TokenVerificationError::TokenNotYetValidNotBeFore(now, nbf));
        }
    }

    if now + CLOCK_SKEW_SECS < idinfo.iat {
        return Err(TokenVerificationError::TokenNotYetValidIssuedAt(
            now, idinfo.iat,
        ));
    } else if now > idinfo.exp {
        return Err(TokenVerificationError::TokenExpired);
    }

    Ok(idinfo)
}
