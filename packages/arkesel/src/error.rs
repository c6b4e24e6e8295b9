/// Errors from Arkesel API calls.
#[derive(Debug, thiserror::Error)]
pub enum ArkeselError {
    /// Could not build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// Connection failure or timeout.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    /// Arkesel answered with a non-2xx status or a failure payload.
    #[error("Arkesel {endpoint} rejected the request ({status}): {message}")]
    Rejected {
        endpoint: &'static str,
        status: u16,
        message: String,
    },
    /// Response body was not the expected JSON.
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        source: reqwest::Error,
    },
}
