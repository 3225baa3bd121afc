// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Zenodo Deposit library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! # Typed client for the Zenodo deposition API.
//!
//! Depositions returned by the service correspond directly to Rust data structures via the serde
//! serialization and deserialization interfaces. The structures in [types] keep every field the
//! service sends, including fields this crate does not model, so a deposition which was read,
//! modified and sent back loses nothing on the way.
//!
//! A [Client] owns a [Config] (access token and sandbox or production instance) and exposes one
//! method per endpoint: create, get, update, delete and list depositions, plus uploading a file
//! into the bucket of a deposition. Each method is a single authenticated request. The expected
//! status is checked and any other status becomes [DepositError::Rejected], which carries the
//! response body as sent by the service. Nothing is retried.
//!
//! [blocking::Client] offers the same operations for synchronous callers.
//!
//! ```no_run
//! use zenodo_deposit::{Client, Config};
//!
//! # async fn example() -> zenodo_deposit::Result<()> {
//! let client = Client::new(Config::from_env()?.with_access_token("my-token"));
//! let mut deposition = client.create_deposition().await?;
//! if let Some(bucket) = deposition.bucket_url() {
//!     client.upload_file(bucket, "data.csv", "out/data.csv").await?;
//! }
//! deposition.title = "Measurements".into();
//! let deposition = client.update_deposition(&deposition).await?;
//! client.delete_deposition(deposition.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::Client;
pub use config::{Config, Environment};
pub use error::*;
pub use types::*;
