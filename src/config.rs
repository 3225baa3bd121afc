// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Zenodo Deposit library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Client configuration: the bearer token and the service instance to talk to.

use crate::error::{ConfigSnafu, InvalidUrlSnafu, MissingTokenSnafu, Result};
use snafu::{OptionExt, ResultExt};
use std::env;
use std::fmt::{self, Debug, Formatter};
use url::Url;

pub const SANDBOX_URL: &str = "https://sandbox.zenodo.org";
pub const PRODUCTION_URL: &str = "https://zenodo.org";

/// Environment variable holding the personal access token.
pub const TOKEN_VAR: &str = "ZENODO_ACCESS_TOKEN";
/// Environment variable selecting the sandbox (`true`/`1`) or production (`false`/`0`) instance.
pub const SANDBOX_VAR: &str = "ZENODO_SANDBOX";

/// Which instance of the service requests are sent to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Production,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Sandbox
    }
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_URL,
            Environment::Production => PRODUCTION_URL,
        }
    }
}

/// Configuration shared by every operation of a [Client](crate::client::Client).
///
/// A `Config` is built once and moved into a client. Two clients with different configurations
/// (for instance, two accounts) can be used side by side.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    access_token: Option<String>,
    environment: Environment,
    base_url: Option<Url>,
}

impl Config {
    /// A sandbox configuration without a token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the configuration from `ZENODO_ACCESS_TOKEN` and `ZENODO_SANDBOX`.
    ///
    /// Both variables are optional. A missing token is only reported when an operation runs, the
    /// same as a `Config` that never had [set_access_token](Self::set_access_token) called.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::var(TOKEN_VAR).ok(), env::var(SANDBOX_VAR).ok())
    }

    fn from_vars(token: Option<String>, sandbox: Option<String>) -> Result<Self> {
        let mut config = Self::new();
        if let Some(token) = token {
            config.set_access_token(token);
        }
        if let Some(sandbox) = sandbox {
            config.set_sandbox_mode(parse_flag(&sandbox).context(ConfigSnafu {
                message: format!("{} must be true or false, got {:?}", SANDBOX_VAR, sandbox),
            })?);
        }
        Ok(config)
    }

    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    pub fn set_sandbox_mode(&mut self, sandbox: bool) {
        self.environment = if sandbox {
            Environment::Sandbox
        } else {
            Environment::Production
        };
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.set_access_token(token);
        self
    }

    pub fn with_sandbox_mode(mut self, sandbox: bool) -> Self {
        self.set_sandbox_mode(sandbox);
        self
    }

    /// Send requests to `url` instead of the fixed URL of the selected environment.
    pub fn with_base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn is_sandbox(&self) -> bool {
        self.environment == Environment::Sandbox
    }

    /// The configured token, or [MissingToken](crate::DepositError::MissingToken) if it is unset
    /// or empty.
    pub fn access_token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .context(MissingTokenSnafu)
    }

    pub fn base_url(&self) -> Result<Url> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => {
                let url = self.environment.base_url();
                Url::parse(url).context(InvalidUrlSnafu { url })
            }
        }
    }

    /// Resolve `path` against the base URL, keeping any path prefix the base URL carries.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url()?;
        let url = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&url).context(InvalidUrlSnafu { url })
    }
}

// The token stays out of logs and panic messages.
impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
