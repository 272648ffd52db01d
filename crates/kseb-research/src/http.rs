//! Shared reqwest helpers.

use kseb_core::ResearchError;
use url::Url;

/// Browser-like User-Agent; some publishers refuse the reqwest default.
pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub(crate) fn transport(err: &reqwest::Error) -> ResearchError {
    ResearchError::Transport(err.to_string())
}

/// Reject anything that is not an absolute http(s) URL.
pub(crate) fn parse_http_url(raw: &str) -> Result<Url, ResearchError> {
    let url = Url::parse(raw.trim()).map_err(|e| ResearchError::Parse(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ResearchError::Parse(format!("unsupported scheme '{other}'"))),
    }
}

/// Send a request and fail on non-2xx status.
pub(crate) async fn send_checked(
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, ResearchError> {
    let response = request.send().await.map_err(|e| transport(&e))?;
    let status = response.status();
    if !status.is_success() {
        return Err(ResearchError::Http {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_url() {
        assert!(parse_http_url("https://example.com/a").is_ok());
        assert!(parse_http_url(" http://example.com ").is_ok());
        assert!(matches!(parse_http_url("ftp://x"), Err(ResearchError::Parse(_))));
        assert!(matches!(parse_http_url("not a url"), Err(ResearchError::Parse(_))));
    }
}
