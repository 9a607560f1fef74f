//! Artifact retrieval.

use crate::error::{Error, Result};
use crate::types::{DocId, Event, SavedArtifact};
use crate::utils;
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::DocTaskClient;
use super::response;

/// Download endpoint path
const DOWNLOAD_ENDPOINT: &str = "download";

/// Query parameter carrying the document identifier
const DOC_ID_PARAM: &str = "docId";

/// Query parameter carrying the requested file name
const FILE_NAME_PARAM: &str = "fileName";

/// Copy a response body into a sink chunk by chunk, then flush it
async fn stream_into<W>(mut response: reqwest::Response, sink: &mut W) -> Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        sink.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    sink.flush().await?;
    Ok(written)
}

impl DocTaskClient {
    /// Send the signed download request and check its status
    async fn request_download(
        &self,
        doc_id: &DocId,
        file_name: Option<&str>,
    ) -> Result<reqwest::Response> {
        if doc_id.as_str().is_empty() {
            return Err(Error::validation("cannot download an empty document id"));
        }

        let mut params = self.signing_params();
        params
            .insert(DOC_ID_PARAM, doc_id.as_str())
            .insert_opt(FILE_NAME_PARAM, file_name);

        let url = self.endpoint_url(DOWNLOAD_ENDPOINT)?;
        let response = self
            .http
            .get(url)
            .query(&self.signed_query(&params))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(
                        doc_id = %doc_id,
                        status = status.as_u16(),
                        error = %e,
                        "Could not read download error body"
                    );
                    format!("<body unavailable: {}>", e)
                }
            };
            return Err(response::api_error(DOWNLOAD_ENDPOINT, status, body));
        }
        Ok(response)
    }

    /// Stream a finished artifact into `sink` and return the number of bytes written
    ///
    /// The sink is flushed on success. On error it may hold a prefix of the
    /// artifact; cleaning that up is the caller's business.
    pub async fn download<W>(
        &self,
        doc_id: DocId,
        file_name: Option<&str>,
        sink: &mut W,
    ) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let response = self.request_download(&doc_id, file_name).await?;
        let bytes = stream_into(response, sink).await?;
        tracing::info!(doc_id = %doc_id, bytes, "Artifact downloaded");
        Ok(bytes)
    }

    /// Download a finished artifact to a file
    ///
    /// The body is written to `<output>.part` and renamed into place once it is
    /// complete and synced. No file is created if the service rejects the
    /// request, and the partial file is removed if the transfer fails. When
    /// the output exists, [`DownloadConfig::file_collision`] decides between
    /// replacing it and picking a free `name (N).ext`.
    ///
    /// [`DownloadConfig::file_collision`]: crate::config::DownloadConfig::file_collision
    pub async fn download_to_path(
        &self,
        doc_id: DocId,
        output_path: impl AsRef<Path>,
    ) -> Result<SavedArtifact> {
        let output_path = output_path.as_ref();
        let target = utils::get_unique_path(output_path, self.config.download.file_collision)?;
        let file_name = if self.config.download.send_file_name {
            utils::file_name_str(output_path)
        } else {
            None
        };

        let response = self.request_download(&doc_id, file_name).await?;

        let part_path = utils::partial_path(&target);
        let written = async {
            let mut file = tokio::fs::File::create(&part_path).await?;
            let bytes = stream_into(response, &mut file).await?;
            file.sync_all().await?;
            Ok::<u64, Error>(bytes)
        }
        .await;

        let bytes = match written {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    doc_id = %doc_id,
                    path = %part_path.display(),
                    error = %e,
                    "Artifact transfer failed, removing partial file"
                );
                tokio::fs::remove_file(&part_path).await.ok();
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&part_path, &target).await {
            tokio::fs::remove_file(&part_path).await.ok();
            return Err(e.into());
        }

        tracing::info!(
            doc_id = %doc_id,
            path = %target.display(),
            bytes,
            "Artifact saved"
        );
        self.emit(Event::Downloaded {
            doc_id,
            path: target.clone(),
            bytes,
        });

        Ok(SavedArtifact {
            path: target,
            bytes,
        })
    }
}
