use crate::error::CrosscastError;

/// Build a user-facing sign-in URL from an authorization endpoint and
/// provider-specific query parameters. Pure string building; values are
/// URL-encoded and round-trip through a parse.
pub fn sign_in_url(base: &str, params: &[(&str, &str)]) -> Result<String, CrosscastError> {
    let mut url = reqwest::Url::parse(base)
        .map_err(|e| CrosscastError::RequestConstruction(format!("invalid URL '{base}': {e}")))?;

    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }

    Ok(url.into())
}
