/// Errors produced when talking to the Discord REST API.
#[derive(Debug, thiserror::Error)]
pub enum DiscordError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Discord returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no bot token configured")]
    NoToken,
}

/// Why an inbound request failed signature verification.
///
/// Only logged; callers answer every variant with the same generic 401.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("public key is not a valid Ed25519 key")]
    InvalidKey,

    #[error("missing {0} header")]
    MissingHeader(&'static str),

    #[error("signature is not 64 bytes of hex")]
    MalformedSignature,

    #[error("signature does not match")]
    Mismatch,
}
