use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use ferrous_doh_domain::DomainError;

/// Standard alphabet, `=` padding optional.
const DOH_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode the `dns` query parameter of a DoH GET request.
///
/// URL-safe `-` and `_` are mapped onto `+` and `/` first, so input in
/// either alphabet (or a mix of both) is accepted.
pub fn decode_dns_param(value: &str) -> Result<Vec<u8>, DomainError> {
    let normalized: String = value
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    DOH_BASE64
        .decode(normalized)
        .map_err(|e| DomainError::Decode(e.to_string()))
}
