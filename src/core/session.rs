// OAuth completion: the backend redirects back with `#access_token=...` appended.

use reqwest::Url;

/// Extracts the `access_token` parameter from the fragment of a redirect URL.
pub fn token_from_redirect(redirect_url: &str) -> Option<String> {
    let url = Url::parse(redirect_url).ok()?;
    let fragment = url.fragment()?;
    // The fragment uses query-string encoding; reuse the query parser on it.
    let params = Url::parse(&format!("http://fragment.invalid/?{fragment}")).ok()?;
    params
        .query_pairs()
        .find(|(key, _)| key == "access_token")
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}
