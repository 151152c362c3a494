//! Outbound request path.
//!
//! Sends are plain HTTP requests, independent of the event stream: the
//! server rebroadcasts accepted messages to every subscriber, so the
//! sender sees its own message only when the stream echoes it back.
//! Nothing here renders anything, and sends are never gated on the
//! stream's connection state.

use std::path::{Path, PathBuf};

use reqwest::multipart;

use dropwire_proto::{TextPayload, UploadResponse};

use crate::{ClientConfig, ClientError};

/// Outbound dispatcher bound to one server and one client identity.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    http: reqwest::Client,
    config: ClientConfig,
    sender_id: String,
}

impl Dispatcher {
    /// Create a dispatcher for the given server and identity.
    pub fn new(config: ClientConfig, sender_id: String) -> Self {
        Self { http: reqwest::Client::new(), config, sender_id }
    }

    /// Submit a text message via `POST /send`.
    ///
    /// The caller is responsible for the empty-input guard; by the time
    /// this runs the input line has already been cleared.
    pub async fn send_text(&self, content: &str, sender_name: &str) -> Result<(), ClientError> {
        let payload = TextPayload {
            content: content.to_owned(),
            sender_id: self.sender_id.clone(),
            sender_name: sender_name.to_owned(),
        };

        self.http
            .post(format!("{}/send", self.config.base_url))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Upload files via `POST /upload` as one multipart request with
    /// repeated `files` parts.
    ///
    /// Returns the server's response on transport success; an `error`
    /// field in that response is surfaced as [`ClientError::Rejected`].
    pub async fn send_files(
        &self,
        paths: &[PathBuf],
        sender_name: &str,
    ) -> Result<UploadResponse, ClientError> {
        let mut form = multipart::Form::new()
            .text("socket_id", self.sender_id.clone())
            .text("sender_name", sender_name.to_owned());

        for path in paths {
            let bytes = tokio::fs::read(path).await?;
            let filename = path
                .file_name()
                .map_or_else(|| "file".to_owned(), |name| name.to_string_lossy().into_owned());
            form = form.part("files", multipart::Part::bytes(bytes).file_name(filename));
        }

        let response: UploadResponse = self
            .http
            .post(format!("{}/upload", self.config.base_url))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = &response.error {
            return Err(ClientError::Rejected(error.clone()));
        }
        Ok(response)
    }

    /// Download a shared file into the user downloads directory.
    pub async fn fetch_file(&self, url: &str, filename: &str) -> Result<PathBuf, ClientError> {
        let dest_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .ok_or(ClientError::NoDownloadDir)?;
        self.fetch_file_to(url, filename, &dest_dir).await
    }

    /// Download a shared file into `dest_dir`.
    ///
    /// Relative URLs (the server's usual form) are resolved against the
    /// configured base. Only the final component of `filename` is used
    /// for the destination.
    pub async fn fetch_file_to(
        &self,
        url: &str,
        filename: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, ClientError> {
        let bytes = self
            .http
            .get(self.config.resolve(url))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let safe_name = Path::new(filename)
            .file_name()
            .map_or_else(|| "download".to_owned(), |name| name.to_string_lossy().into_owned());
        let dest = dest_dir.join(safe_name);
        tokio::fs::write(&dest, &bytes).await?;
        Ok(dest)
    }
}
