use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ring::rand::SecureRandom;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Invalid format: {0}")]
    Format(String),
}

pub(crate) fn base64url_decode(input: &str) -> Result<Vec<u8>, UtilError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|_| UtilError::Format("Failed to decode base64url".to_string()))?;
    Ok(decoded)
}

fn random_u32() -> Result<u32, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut buf = [0u8; 4];
    rng.fill(&mut buf)
        .map_err(|_| UtilError::Crypto("Failed to generate random bytes".to_string()))?;
    Ok(u32::from_le_bytes(buf))
}

const CODE_SPAN: u32 = 900_000;

/// Largest multiple of `span` representable in a u32. Draws at or above it are
/// rejected so every residue is equally likely.
fn rejection_bound(span: u32) -> u32 {
    u32::MAX - u32::MAX % span
}

/// Uniform value in `0..span` from `draw`, redrawing on the biased tail
fn uniform_below(
    span: u32,
    mut draw: impl FnMut() -> Result<u32, UtilError>,
) -> Result<u32, UtilError> {
    let bound = rejection_bound(span);
    loop {
        let r = draw()?;
        if r < bound {
            return Ok(r % span);
        }
    }
}

/// Random six digit code in `100000..=999999`
pub(crate) fn gen_numeric_code() -> Result<String, UtilError> {
    let value = 100_000 + uniform_below(CODE_SPAN, random_u32)?;
    Ok(value.to_string())
}
