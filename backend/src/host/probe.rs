//! Upgrade of the advertised site URL to HTTPS.
//!
//! Sites configured with an `http://` root are often served over HTTPS as
//! well. The annotation application fetches files from the site URL it is
//! given, so the secure twin is preferred whenever it answers.

use crate::error::Result;
use log::debug;
use std::time::Duration;

#[allow(async_fn_in_trait)]
pub trait SiteProbe {
    /// Whether anything answers at `url`, whatever the status code.
    async fn is_reachable(&self, url: &str) -> bool;
}

/// Probe issuing a plain GET with a bounded timeout.
#[derive(Clone)]
pub struct HttpsProbe {
    client: reqwest::Client,
}

impl HttpsProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl SiteProbe for HttpsProbe {
    async fn is_reachable(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(_) => true,
            Err(e) => {
                debug!("HTTPS probe of {} failed: {}", url, e);
                false
            }
        }
    }
}

/// The `https://` twin of an `http://` site root.
pub fn https_twin(wwwroot: &str) -> Option<String> {
    wwwroot
        .strip_prefix("http://")
        .map(|rest| format!("https://{}", rest))
}

/// Site URL handed to the client: the secure twin when it answers, the
/// configured root otherwise.
pub async fn resolve_site_url<P: SiteProbe>(wwwroot: &str, probe: &P) -> String {
    if let Some(secure) = https_twin(wwwroot) {
        if probe.is_reachable(&secure).await {
            return secure;
        }
    }
    wwwroot.to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Probe answering from a fixed verdict and recording what it was asked.
    pub(crate) struct StubProbe {
        pub reachable: bool,
        pub asked: RefCell<Vec<String>>,
    }

    impl StubProbe {
        pub(crate) fn new(reachable: bool) -> Self {
            Self {
                reachable,
                asked: RefCell::new(Vec::new()),
            }
        }
    }

    impl SiteProbe for StubProbe {
        async fn is_reachable(&self, url: &str) -> bool {
            self.asked.borrow_mut().push(url.to_string());
            self.reachable
        }
    }

    #[actix_web::test]
    async fn insecure_root_upgraded_when_secure_twin_answers() {
        let probe = StubProbe::new(true);
        assert_eq!(resolve_site_url("http://lms.test", &probe).await, "https://lms.test");
        assert_eq!(probe.asked.borrow().as_slice(), ["https://lms.test"]);
    }

    #[actix_web::test]
    async fn insecure_root_kept_when_twin_is_silent() {
        let probe = StubProbe::new(false);
        assert_eq!(resolve_site_url("http://lms.test", &probe).await, "http://lms.test");
    }

    #[actix_web::test]
    async fn secure_root_is_not_probed() {
        let probe = StubProbe::new(false);
        assert_eq!(resolve_site_url("https://lms.test", &probe).await, "https://lms.test");
        assert!(probe.asked.borrow().is_empty());
    }

    #[test]
    fn https_probe_builds_with_timeout() {
        assert!(HttpsProbe::new(Duration::from_millis(200)).is_ok());
    }

    #[test]
    fn twin_only_for_plain_http() {
        assert_eq!(https_twin("http://a.b/moodle"), Some("https://a.b/moodle".to_string()));
        assert_eq!(https_twin("https://a.b"), None);
        assert_eq!(https_twin("ftp://a.b"), None);
    }
}
