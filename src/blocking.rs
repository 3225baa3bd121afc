// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Zenodo Deposit library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! A synchronous deposition client.
//!
//! Each method blocks the calling thread until its single round trip completes. Do not call these
//! methods from inside an async task; use [crate::client::Client] there instead.

use crate::config::Config;
use crate::error::Result;
use crate::types::{Deposition, DepositionFileUpload};
use async_std::task::block_on;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct Client {
    inner: crate::client::Client,
}

impl Client {
    pub fn new(config: Config) -> Self {
        Self {
            inner: crate::client::Client::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        self.inner.config()
    }

    pub fn create_deposition(&self) -> Result<Deposition> {
        block_on(self.inner.create_deposition())
    }

    pub fn get_deposition(&self, id: u64) -> Result<Deposition> {
        block_on(self.inner.get_deposition(id))
    }

    pub fn update_deposition(&self, deposition: &Deposition) -> Result<Deposition> {
        block_on(self.inner.update_deposition(deposition))
    }

    pub fn delete_deposition(&self, id: u64) -> Result<()> {
        block_on(self.inner.delete_deposition(id))
    }

    pub fn list_depositions(&self) -> Result<Vec<Deposition>> {
        block_on(self.inner.list_depositions())
    }

    pub fn upload_file(
        &self,
        bucket_url: &str,
        file_name: &str,
        path: impl AsRef<Path>,
    ) -> Result<DepositionFileUpload> {
        block_on(self.inner.upload_file(bucket_url, file_name, path))
    }
}

impl From<crate::client::Client> for Client {
    fn from(inner: crate::client::Client) -> Self {
        Self { inner }
    }
}
