//! Steam OpenID 2.0 sign-in redirect.

use url::Url;

use crate::error::StorefrontError;

const STEAM_OPENID_LOGIN: &str = "https://steamcommunity.com/openid/login";
const OPENID_NS: &str = "http://specs.openid.net/auth/2.0";
const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";

/// Path on the site Steam redirects back to.
pub const CALLBACK_PATH: &str = "/auth/steam/callback";

/// Validate a site origin and strip any trailing slash.
///
/// # Errors
///
/// Returns [`StorefrontError::InvalidOrigin`] unless the origin is an
/// absolute http(s) URL.
pub fn normalize_origin(origin: &str) -> Result<String, StorefrontError> {
    let invalid = |reason: String| StorefrontError::InvalidOrigin {
        origin: origin.to_string(),
        reason,
    };

    let trimmed = origin.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Build the Steam `checkid_setup` URL for an origin.
///
/// Steam returns the player to `<origin>/auth/steam/callback`; the realm is
/// the origin itself.
///
/// # Errors
///
/// Returns [`StorefrontError::InvalidOrigin`] for origins that are not
/// absolute http(s) URLs.
pub fn steam_login_url(origin: &str) -> Result<String, StorefrontError> {
    let origin = normalize_origin(origin)?;
    let encoded_origin = urlencoding::encode(&origin);

    Ok(format!(
        "{STEAM_OPENID_LOGIN}?\
        openid.ns={OPENID_NS}&\
        openid.mode=checkid_setup&\
        openid.return_to={encoded_origin}{CALLBACK_PATH}&\
        openid.realm={encoded_origin}&\
        openid.identity={IDENTIFIER_SELECT}&\
        openid.claimed_id={IDENTIFIER_SELECT}"
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url() {
        let url = steam_login_url("https://winner.to/").unwrap();

        assert_eq!(
            url,
            "https://steamcommunity.com/openid/login?\
             openid.ns=http://specs.openid.net/auth/2.0&\
             openid.mode=checkid_setup&\
             openid.return_to=https%3A%2F%2Fwinner.to/auth/steam/callback&\
             openid.realm=https%3A%2F%2Fwinner.to&\
             openid.identity=http://specs.openid.net/auth/2.0/identifier_select&\
             openid.claimed_id=http://specs.openid.net/auth/2.0/identifier_select"
        );
    }

    #[test]
    fn test_login_url_keeps_port() {
        let url = steam_login_url("http://localhost:5173").unwrap();
        assert!(url.contains("openid.realm=http%3A%2F%2Flocalhost%3A5173&"));
        assert!(url.contains("openid.return_to=http%3A%2F%2Flocalhost%3A5173/auth/steam/callback&"));
    }

    #[test]
    fn test_invalid_origins() {
        for origin in ["", "winner.to", "ftp://winner.to", "mailto:ops@winner.to"] {
            assert!(
                matches!(
                    steam_login_url(origin),
                    Err(StorefrontError::InvalidOrigin { .. })
                ),
                "{origin:?} should be rejected"
            );
        }
    }
}
