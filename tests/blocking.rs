// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Zenodo Deposit library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

mod common;

use common::{deposition_json, MockService};
use serde_json::json;
use tide::StatusCode;
use zenodo_deposit::{blocking, Config, DepositError};

// The mock runs on the async-std executor's threads, so plain #[test] functions can block on it.

#[test]
fn blocking_get() {
    let mock = MockService::json(StatusCode::Ok, deposition_json(5));
    let client = blocking::Client::new(mock.config());
    let deposition = client.get_deposition(5).unwrap();
    assert_eq!(deposition.id, 5);
    assert_eq!(mock.single_request().path, "/api/deposit/depositions/5");
}

#[test]
fn blocking_list_and_delete() {
    let mock = MockService::json(StatusCode::Ok, json!([deposition_json(1), deposition_json(2)]));
    let client = blocking::Client::new(mock.config());
    assert_eq!(client.list_depositions().unwrap().len(), 2);
    // The mock answers 200, not 204, so the delete is refused.
    let err = client.delete_deposition(1).unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::Ok));
    assert_eq!(mock.request_count(), 2);
}

#[test]
fn blocking_without_token() {
    let mock = MockService::json(StatusCode::Created, json!({"id": 1}));
    let client = blocking::Client::new(Config::new().with_base_url(mock.url.clone()));
    assert!(matches!(
        client.create_deposition(),
        Err(DepositError::MissingToken)
    ));
    assert_eq!(mock.request_count(), 0);
}
