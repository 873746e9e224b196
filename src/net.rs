//! Connectivity pre-check.
//!
//! `ansible-pull` fails in confusing ways behind a captive portal, so runs
//! start with a probe of Firefox's portal-detection endpoint: a plain-HTTP
//! URL with a fixed response body. Any transport error or unexpected body
//! means "not really online".

use std::time::Duration;

use ureq::Agent;

const PROBE_URL: &str = "http://detectportal.firefox.com/success.txt";
const PROBE_EXPECTED: &str = "success\n";
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Whether the Internet is reachable (and not intercepted by a portal).
pub fn is_online() -> bool {
    probe(PROBE_URL)
}

fn probe(url: &str) -> bool {
    let config = ureq::config::Config::builder()
        .timeout_global(Some(PROBE_TIMEOUT))
        .build();
    let agent: Agent = config.new_agent();

    let response = match agent.get(url).call() {
        Ok(response) => response,
        Err(err) => {
            log::error!("Unable to connect to {url}: {err}");
            return false;
        }
    };

    match response.into_body().read_to_string() {
        Ok(body) if body == PROBE_EXPECTED => true,
        Ok(body) => {
            log::error!("Response from {url} was not {PROBE_EXPECTED:?} as expected. Received: {body:?}");
            false
        }
        Err(err) => {
            log::error!("Unable to read the response from {url}: {err}");
            false
        }
    }
}
