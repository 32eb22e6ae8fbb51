use std::{env, time::Duration};

/// The default endpoint the console talks to
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Runtime configuration of the console core
#[derive(Debug, Clone)]
pub struct Config {
    /// Base url of the booking and room API
    pub base_url: String,
    /// How long a single request may take before it fails as a network error.
    /// There is no retry policy, a request is attempted exactly once.
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Self {
        let base_url =
            env::var("FRONTDESK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let request_timeout = env::var("FRONTDESK_REQUEST_TIMEOUT")
            .ok()
            .map(|x| {
                x.parse::<u64>()
                    .expect("Timeout must be a number of seconds")
            })
            .map(Duration::from_secs);

        Self {
            base_url,
            request_timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: None,
        }
    }
}
