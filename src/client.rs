// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Zenodo Deposit library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use crate::config::Config;
use crate::error::{
    BodyError, ClientError, DecodeSnafu, EncodeSnafu, InvalidUrlSnafu, ReadFileSnafu,
    RejectedSnafu, Result,
};
use crate::types::{Deposition, DepositionFileUpload, UpdateDeposition};
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use std::path::Path;
use std::sync::Arc;
use surf::http::{mime, Method};
use surf::{middleware::Next, Request, Response, StatusCode};
use tracing::{event, Level};
use url::Url;

const DEPOSITIONS: &str = "api/deposit/depositions";

/// Body of an outgoing request.
enum Payload {
    /// No body. The request is still labelled as JSON.
    Empty,
    Json(Vec<u8>),
    Bytes(Vec<u8>),
}

/// Asynchronous client for the deposition API.
///
/// Every operation performs exactly one HTTP round trip. Nothing is retried and nothing is cached;
/// the values returned by one call are plain data which can be passed into the next, e.g. the
/// bucket link of a freshly created deposition into [upload_file](Client::upload_file).
///
/// Cloning a `Client` is cheap and clones share the configuration.
#[derive(Clone, Debug)]
pub struct Client {
    config: Arc<Config>,
    http: surf::Client,
}

impl Client {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            http: surf::Client::new().with(trace),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create an empty deposition. The service assigns its identity, state and links.
    pub async fn create_deposition(&self) -> Result<Deposition> {
        let url = self.config.endpoint(DEPOSITIONS)?;
        self.request(
            "create deposition",
            Method::Post,
            url,
            Payload::Json(b"{}".to_vec()),
            StatusCode::Created,
        )
        .await
    }

    pub async fn get_deposition(&self, id: u64) -> Result<Deposition> {
        let url = self.deposition_url(id)?;
        self.request(
            "get deposition",
            Method::Get,
            url,
            Payload::Empty,
            StatusCode::Ok,
        )
        .await
    }

    /// Replace the deposition on the service with `deposition`.
    ///
    /// The whole deposition is sent, nested under `metadata`. Pass back a value obtained from
    /// [get_deposition](Client::get_deposition) or [create_deposition](Client::create_deposition)
    /// with only the fields you want to change modified; fields left out may be cleared by the
    /// service.
    pub async fn update_deposition(&self, deposition: &Deposition) -> Result<Deposition> {
        let url = self.deposition_url(deposition.id)?;
        let body = serde_json::to_vec(&UpdateDeposition {
            metadata: deposition,
        })
        .context(EncodeSnafu)?;
        self.request(
            "update deposition",
            Method::Put,
            url,
            Payload::Json(body),
            StatusCode::Ok,
        )
        .await
    }

    /// Delete a deposition. Any local copy of it is stale afterwards.
    pub async fn delete_deposition(&self, id: u64) -> Result<()> {
        let url = self.deposition_url(id)?;
        self.exchange(
            "delete deposition",
            Method::Delete,
            url,
            Payload::Empty,
            StatusCode::NoContent,
        )
        .await?;
        Ok(())
    }

    /// All depositions of the token's owner, in the order the service returns them.
    pub async fn list_depositions(&self) -> Result<Vec<Deposition>> {
        let url = self.config.endpoint(DEPOSITIONS)?;
        self.request(
            "list depositions",
            Method::Get,
            url,
            Payload::Empty,
            StatusCode::Ok,
        )
        .await
    }

    /// Upload the file at `path` into a bucket as `file_name`.
    ///
    /// `bucket_url` is the `bucket` link of a deposition (see [Deposition::bucket_url]). The file
    /// is read completely before the request is sent, so a missing or unreadable file fails
    /// without touching the network.
    pub async fn upload_file(
        &self,
        bucket_url: &str,
        file_name: &str,
        path: impl AsRef<Path>,
    ) -> Result<DepositionFileUpload> {
        self.config.access_token()?;
        let path = path.as_ref();
        let bytes = async_std::fs::read(path)
            .await
            .context(ReadFileSnafu { path })?;
        let url = object_url(bucket_url, file_name)?;
        self.request(
            "upload file",
            Method::Put,
            url,
            Payload::Bytes(bytes),
            StatusCode::Created,
        )
        .await
    }

    fn deposition_url(&self, id: u64) -> Result<Url> {
        self.config.endpoint(&format!("{}/{}", DEPOSITIONS, id))
    }

    async fn request<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        url: Url,
        payload: Payload,
        expected: StatusCode,
    ) -> Result<T> {
        let body = self
            .exchange(operation, method, url, payload, expected)
            .await?;
        serde_json::from_str(&body).context(DecodeSnafu)
    }

    /// Send one authenticated request and return the response body if the status is `expected`.
    ///
    /// Any other status is a [Rejected](crate::DepositError::Rejected) error carrying the body
    /// verbatim.
    async fn exchange(
        &self,
        operation: &'static str,
        method: Method,
        url: Url,
        payload: Payload,
        expected: StatusCode,
    ) -> Result<String> {
        let token = self.config.access_token()?;

        let mut req = Request::new(method, url);
        req.insert_header("Authorization", format!("Bearer {}", token));
        match payload {
            Payload::Empty => req.set_content_type(mime::JSON),
            Payload::Json(bytes) => {
                req.set_body(bytes);
                req.set_content_type(mime::JSON);
            }
            Payload::Bytes(bytes) => {
                req.set_body(bytes);
                req.set_content_type(mime::BYTE_STREAM);
            }
        }

        let mut res = self.http.send(req).await.context(ClientError)?;
        let status = res.status();
        let body = res.body_string().await.context(BodyError)?;
        if status != expected {
            event!(
                Level::WARN,
                "couldn't {}: expected status {}, got {}",
                operation,
                expected,
                status
            );
            return RejectedSnafu {
                operation,
                status,
                body,
            }
            .fail();
        }
        Ok(body)
    }
}

/// URL of the object `file_name` in the bucket at `bucket_url`.
fn object_url(bucket_url: &str, file_name: &str) -> Result<Url> {
    let url = format!("{}/{}", bucket_url.trim_end_matches('/'), file_name);
    Url::parse(&url).context(InvalidUrlSnafu { url })
}

/// Client middleware which logs requests and responses.
///
/// Only the method, URL and status are logged. Headers are not, since they carry the access
/// token.
pub fn trace(
    req: Request,
    client: surf::Client,
    next: Next<'_>,
) -> BoxFuture<surf::Result<Response>> {
    Box::pin(async move {
        event!(
            Level::DEBUG,
            "--> sending request {{method: {}, url: {}}}",
            req.method(),
            req.url(),
        );
        let res = next.run(req, client).await?;
        event!(
            Level::DEBUG,
            "<-- received response {{status: {}, content-type: {:?}}}",
            res.status(),
            res.content_type(),
        );
        Ok(res)
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn object_url_joins_bucket_and_name() {
        assert_eq!(
            object_url("https://sandbox.zenodo.org/api/files/568377dd", "f.txt")
                .unwrap()
                .as_str(),
            "https://sandbox.zenodo.org/api/files/568377dd/f.txt"
        );
        assert_eq!(
            object_url("https://sandbox.zenodo.org/api/files/568377dd/", "f.txt")
                .unwrap()
                .as_str(),
            "https://sandbox.zenodo.org/api/files/568377dd/f.txt"
        );
    }

    #[test]
    fn object_url_rejects_relative_bucket() {
        let err = object_url("not a bucket", "f.txt").unwrap_err();
        assert!(matches!(err, crate::DepositError::InvalidUrl { .. }));
    }

    #[test]
    fn deposition_urls() {
        let client = Client::new(Config::new().with_sandbox_mode(false));
        assert_eq!(
            client.deposition_url(42).unwrap().as_str(),
            "https://zenodo.org/api/deposit/depositions/42"
        );
    }
}
