//! SigV4 signing for Bedrock runtime requests
//!
//! Static keys from the credential resolver are wrapped as AWS SDK
//! credentials and signed with `aws-sigv4`. The canonical URI is
//! percent-encoded a second time (the rule for every service except S3), so
//! a path that already carries `%3A` is signed as `%253A`.

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    PayloadChecksumKind, SignableBody, SignableRequest, SigningParams, SigningSettings, sign,
};
use aws_sigv4::sign::v4;
use dilemma_application::ports::provider::{AwsCredentials, GatewayError};
use std::time::SystemTime;

/// Signing name of the Bedrock runtime
pub const SERVICE: &str = "bedrock";

/// Provider name recorded on the wrapped credentials
const CREDENTIALS_SOURCE: &str = "dilemma-credential-resolver";

/// Settings used for every Bedrock request: payload hash sent as
/// `x-amz-content-sha256`, double-encoded canonical URI
pub fn settings() -> SigningSettings {
    let mut settings = SigningSettings::default();
    settings.payload_checksum_kind = PayloadChecksumKind::XAmzSha256;
    settings
}

/// One request to sign
pub struct Signable<'a> {
    pub method: &'a str,
    pub url: &'a str,
    pub headers: &'a [(&'a str, &'a str)],
    pub body: &'a [u8],
}

/// Sign `request` and return the headers to add to it
pub fn sign_request(
    request: &Signable<'_>,
    credentials: &AwsCredentials,
    region: &str,
    time: SystemTime,
    settings: SigningSettings,
) -> Result<Vec<(String, String)>, GatewayError> {
    let identity = Credentials::new(
        &credentials.access_key_id,
        &credentials.secret_access_key,
        credentials.session_token.clone(),
        None,
        CREDENTIALS_SOURCE,
    )
    .into();

    let params: SigningParams<'_> = v4::SigningParams::builder()
        .identity(&identity)
        .region(region)
        .name(SERVICE)
        .time(time)
        .settings(settings)
        .build()
        .map_err(|e| GatewayError::Signing(e.to_string()))?
        .into();

    let signable = SignableRequest::new(
        request.method,
        request.url,
        request.headers.iter().copied(),
        SignableBody::Bytes(request.body),
    )
    .map_err(|e| GatewayError::Signing(e.to_string()))?;

    let (instructions, _signature) = sign(signable, &params)
        .map_err(|e| GatewayError::Signing(e.to_string()))?
        .into_parts();

    Ok(instructions
        .headers()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect())
}

/// Percent-encode one path segment, leaving only RFC 3986 unreserved bytes
pub fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
