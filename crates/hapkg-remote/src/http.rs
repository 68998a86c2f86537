use crate::{ManifestKind, ManifestSource, SourceConfig, SourceError};
use std::io::Read;
use std::time::Duration;
use tracing::debug;

/// Downloads release manifests from the raw file host.
///
/// Each manifest is a single `GET <base_url>/<version>/<path>` bounded by the
/// configured timeout. Any non-2xx status fails the fetch with the response
/// body attached; there is no retry.
pub struct HttpSource {
    base_url: String,
    version: String,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(config: &SourceConfig, version: &str) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            base_url: config.base_url.clone(),
            version: version.to_owned(),
            agent,
        }
    }

    pub fn url(&self, kind: ManifestKind) -> String {
        format!("{}/{}/{}", self.base_url, self.version, kind.relative_path())
    }

    fn do_get(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let resp = self.agent.get(url).call().map_err(|e| SourceError::Http {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let code = resp.status().as_u16();
        let mut reader = resp.into_body().into_reader();
        let mut body = Vec::new();
        reader
            .read_to_end(&mut body)
            .map_err(|e| SourceError::Http {
                url: url.to_owned(),
                reason: format!("failed to read the body: {e}"),
            })?;

        if !(200..300).contains(&code) {
            return Err(SourceError::Status {
                url: url.to_owned(),
                status: code,
                body: String::from_utf8_lossy(&body).trim().to_owned(),
            });
        }
        Ok(body)
    }
}

impl ManifestSource for HttpSource {
    fn fetch(&self, kind: ManifestKind) -> Result<Vec<u8>, SourceError> {
        let url = self.url(kind);
        debug!("GET {url}");
        let body = self.do_get(&url)?;
        debug!("GET {url}: {} bytes", body.len());
        Ok(body)
    }

    fn location(&self, kind: ManifestKind) -> String {
        self.url(kind)
    }
}
