// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Zenodo Deposit library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! In-process stand-in for the deposition service.
//!
//! Every request is recorded and answered with one canned status and body.

#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use tide::http::mime;
use tide::{Request, Response, StatusCode};
use url::Url;
use zenodo_deposit::{Client, Config};

pub const TOKEN: &str = "test-token";

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    reply: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct MockService {
    pub url: Url,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockService {
    /// Start a mock on an ephemeral port which answers every request with `status` and `reply`.
    pub fn start(status: StatusCode, reply: impl Into<String>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let mut app = tide::with_state(MockState {
            status,
            reply: reply.into(),
            requests: requests.clone(),
        });
        app.at("/api/deposit/depositions")
            .get(record)
            .post(record);
        app.at("/api/deposit/depositions/:id")
            .get(record)
            .put(record)
            .delete(record);
        app.at("/api/files/:bucket/:key").put(record);

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
        async_std::task::spawn(app.listen(listener));
        Self { url, requests }
    }

    pub fn json(status: StatusCode, reply: serde_json::Value) -> Self {
        Self::start(status, reply.to_string())
    }

    pub fn config(&self) -> Config {
        Config::new()
            .with_access_token(TOKEN)
            .with_base_url(self.url.clone())
    }

    pub fn client(&self) -> Client {
        Client::new(self.config())
    }

    pub fn bucket(&self, id: &str) -> String {
        format!("{}api/files/{}", self.url, id)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The only request the mock received.
    pub fn single_request(&self) -> Recorded {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request: {:?}", requests);
        requests.into_iter().next().unwrap()
    }
}

async fn record(mut req: Request<MockState>) -> tide::Result {
    let body = req.body_bytes().await?;
    let recorded = Recorded {
        method: req.method().to_string(),
        path: req.url().path().to_string(),
        authorization: req.header("Authorization").map(|h| h.as_str().to_string()),
        content_type: req.header("Content-Type").map(|h| h.as_str().to_string()),
        body,
    };
    let state = req.state();
    state.requests.lock().unwrap().push(recorded);

    let mut res = Response::new(state.status);
    if !state.reply.is_empty() {
        res.set_body(state.reply.clone());
        res.set_content_type(mime::JSON);
    }
    Ok(res)
}

/// A deposition as the service returns it right after creation.
pub fn deposition_json(id: u64) -> serde_json::Value {
    let api = format!("https://sandbox.zenodo.org/api/deposit/depositions/{}", id);
    serde_json::json!({
        "conceptrecid": format!("{}", id - 1),
        "created": "2023-03-14T09:26:53.123456+00:00",
        "modified": "2023-03-14T09:26:53.164572+00:00",
        "doi": "",
        "doi_url": "https://doi.org/",
        "files": [],
        "id": id,
        "links": {
            "bucket": format!("https://sandbox.zenodo.org/api/files/bucket-{}", id),
            "discard": format!("{}/actions/discard", api),
            "edit": format!("{}/actions/edit", api),
            "files": format!("{}/files", api),
            "html": format!("https://sandbox.zenodo.org/deposit/{}", id),
            "latest_draft": api.clone(),
            "latest_draft_html": format!("https://sandbox.zenodo.org/deposit/{}", id),
            "publish": format!("{}/actions/publish", api),
            "self": api
        },
        "metadata": {
            "access_right": "open",
            "creators": [{"affiliation": "Zenodo", "name": "Doe, John"}],
            "description": "Raw measurements",
            "keywords": ["test"],
            "license": "CC-BY-4.0",
            "prereserve_doi": {"doi": format!("10.5072/zenodo.{}", id), "recid": id},
            "publication_date": "2023-03-14",
            "title": "Original title",
            "upload_type": "dataset"
        },
        "owner": 1,
        "record_id": id,
        "state": "inprogress",
        "submitted": false,
        "title": "Original title"
    })
}
