// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Zenodo Deposit library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Request and response bodies of the deposition API.
//!
//! Every field is a [Field], which remembers whether the service left it out, sent `null` or sent
//! a value, and every object keeps the fields it does not model in a flattened `extra` map.
//! Timestamps and coordinates are kept exactly as written. Deserializing a response and
//! serializing it again therefore reproduces what the service sent, which is what the update
//! endpoint expects.

use chrono::{DateTime, FixedOffset, ParseError};
use fmt::{Display, Formatter};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::ops::Deref;

/// Fields of an object which have no typed counterpart in this crate.
pub type Extra = Map<String, Value>;

/// A field of a service object: left out, explicitly `null`, or set.
///
/// Absent fields are skipped when serializing and `null` is written back as `null`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_deref(&self) -> Option<&T::Target>
    where
        T: Deref,
    {
        self.get().map(Deref::deref)
    }

    /// The value, replacing an absent or `null` field with `f()` first.
    pub fn get_or_insert_with(&mut self, f: impl FnOnce() -> T) -> &mut T {
        if !matches!(self, Field::Value(_)) {
            *self = Field::Value(f());
        }
        match self {
            Field::Value(v) => v,
            _ => unreachable!(),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(v: T) -> Self {
        Field::Value(v)
    }
}

impl<'a> From<&'a str> for Field<String> {
    fn from(v: &'a str) -> Self {
        Field::Value(v.to_string())
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Value(v) => serializer.serialize_some(v),
            _ => serializer.serialize_none(),
        }
    }
}

// Missing fields never reach this impl; they take the `Absent` default.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Field::Value(v),
            None => Field::Null,
        })
    }
}

/// An RFC 3339 timestamp, kept as the service wrote it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parse(&self) -> Result<DateTime<FixedOffset>, ParseError> {
        DateTime::parse_from_rfc3339(&self.0)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(time: DateTime<FixedOffset>) -> Self {
        Self(time.to_rfc3339())
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DepositionState {
    #[serde(rename = "inprogress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
    #[serde(rename = "error")]
    Error,
}

/// A deposition. `id` is required: a response without one fails to decode.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Deposition {
    /// Creation time of the deposition.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub created: Field<Timestamp>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub doi: Field<String>,
    /// Persistent link to the published deposition. Only present once published.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub doi_url: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub files: Field<Vec<DepositionFile>>,
    pub id: u64,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub links: Field<DepositionLinks>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub metadata: Field<DepositionMetadata>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub modified: Field<Timestamp>,
    /// User identifier of the owner.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub owner: Field<u64>,
    /// Only present for published depositions.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub record_id: Field<u64>,
    /// URL of the public version of the record. Only present for published depositions.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub record_url: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub state: Field<DepositionState>,
    /// True once the deposition has been published.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub submitted: Field<bool>,
    /// Set by the service from the metadata title.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub title: Field<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Deposition {
    /// Upload target for files of this deposition, if the service provided one.
    pub fn bucket_url(&self) -> Option<&str> {
        self.links.get()?.bucket.as_deref()
    }

    pub fn is_published(&self) -> bool {
        self.submitted.get().copied().unwrap_or(false)
    }

    /// The metadata block, created empty if the service did not send one.
    pub fn metadata_mut(&mut self) -> &mut DepositionMetadata {
        self.metadata.get_or_insert_with(Default::default)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DepositionLinks {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub bucket: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub discard: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub edit: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub files: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub html: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub latest_draft: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub latest_draft_html: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub publish: Field<String>,
    #[serde(rename = "self", skip_serializing_if = "Field::is_absent")]
    pub self_link: Field<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Descriptive metadata of a deposition.
///
/// Controlled vocabularies (`upload_type`, `publication_type`, `image_type`, `access_right`,
/// license identifiers) are plain strings; the service validates them.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DepositionMetadata {
    /// publication, poster, presentation, dataset, image, video, software, lesson,
    /// physicalobject or other.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub upload_type: Field<String>,
    /// Kind of publication when `upload_type` is publication, e.g. article, preprint or thesis.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub publication_type: Field<String>,
    /// figure, plot, drawing, diagram, photo or other.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub image_type: Field<String>,
    /// ISO 8601 date (YYYY-MM-DD).
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub publication_date: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub title: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub creators: Field<Vec<Creator>>,
    /// Abstract of the deposition. May contain HTML.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub description: Field<String>,
    /// open, embargoed, restricted or closed.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub access_right: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub license: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub embargo_date: Field<String>,
    /// Conditions for granting access when `access_right` is restricted.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub access_conditions: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub doi: Field<String>,
    /// Ask the service to reserve a DOI before publishing.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub preserve_doi: Field<bool>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub keywords: Field<Vec<String>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub notes: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub related_identifiers: Field<Vec<RelatedIdentifier>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub contributors: Field<Vec<Contributor>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub references: Field<Vec<String>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub communities: Field<Vec<Community>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub grants: Field<Vec<Grant>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub journal_title: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub journal_volume: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub journal_issue: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub journal_pages: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub conference_title: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub conference_acronym: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub conference_dates: Field<String>,
    /// City and country, e.g. "Amsterdam, The Netherlands".
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub conference_place: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub conference_url: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub conference_session: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub conference_session_part: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub imprint_publisher: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub imprint_isbn: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub imprint_place: Field<String>,
    #[serde(rename = "partof_title", skip_serializing_if = "Field::is_absent")]
    pub part_of_title: Field<String>,
    #[serde(rename = "partof_pages", skip_serializing_if = "Field::is_absent")]
    pub part_of_pages: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub thesis_supervisors: Field<Vec<ThesisSupervisor>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub thesis_university: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub subjects: Field<Vec<Subject>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub version: Field<String>,
    /// ISO 639-2 or 639-3 code.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub language: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub locations: Field<Vec<Location>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub dates: Field<Vec<DateInterval>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub method: Field<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Creator {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub affiliation: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub orcid: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub gnd: Field<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Contributor {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    /// Role of the contributor, e.g. Editor or DataCurator.
    #[serde(rename = "type", skip_serializing_if = "Field::is_absent")]
    pub kind: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub affiliation: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub orcid: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub gnd: Field<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThesisSupervisor {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub affiliation: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub orcid: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub gnd: Field<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Persistent identifier of a related publication or dataset (DOI, Handle, ARK, arXiv, URL, ...).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RelatedIdentifier {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub identifier: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub relation: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub resource_type: Field<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Community {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub identifier: Field<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// An OpenAIRE-supported grant which funded the work.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Grant {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub id: Field<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A term from a taxonomy or controlled vocabulary, identified by a URL.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Subject {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub term: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub identifier: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub scheme: Field<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Coordinates are kept as the JSON numbers the service sent, so `52` stays `52`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Location {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub lat: Field<Number>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub long: Field<Number>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub place: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub description: Field<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Location {
    /// Latitude and longitude, if both are set.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat.get()?.as_f64()?, self.long.get()?.as_f64()?))
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DateInterval {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub start: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub end: Field<String>,
    /// Collected, Valid or Withdrawn.
    #[serde(rename = "type", skip_serializing_if = "Field::is_absent")]
    pub kind: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub description: Field<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A file already attached to a deposition. Only ever produced by the service.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DepositionFile {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub id: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub filename: Field<String>,
    /// Size in bytes.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub filesize: Field<u64>,
    /// MD5 checksum computed by the service.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub checksum: Field<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Object version created in a bucket by an upload.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DepositionFileUpload {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub created: Field<Timestamp>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub updated: Field<Timestamp>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub version_id: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub key: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub size: Field<u64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub mimetype: Field<String>,
    /// Prefixed with the algorithm, e.g. `md5:...`.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub checksum: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub is_head: Field<bool>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub delete_marker: Field<bool>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub links: Field<DepositionFileUploadLinks>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DepositionFileUploadLinks {
    #[serde(rename = "self", skip_serializing_if = "Field::is_absent")]
    pub self_link: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub version: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub uploads: Field<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Request body for the endpoint PUT /api/deposit/depositions/{id}.
///
/// The service receives the whole deposition under `metadata`, not just its metadata block.
#[derive(Clone, Debug, Serialize)]
pub struct UpdateDeposition<'a> {
    pub metadata: &'a Deposition,
}

macro_rules! display_as_json {
    ($($t:ty),*) => {
        $(
            impl Display for $t {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    fmt_as_json(self, f)
                }
            }
        )*
    };
}

display_as_json!(
    Deposition,
    DepositionMetadata,
    DepositionLinks,
    DepositionFile,
    DepositionFileUpload
);

// Display implementation for types which serialize to JSON. Displays as a valid JSON object.
pub fn fmt_as_json<T: Serialize>(v: &T, f: &mut Formatter<'_>) -> fmt::Result {
    let string = serde_json::to_string(v).map_err(|_| fmt::Error)?;
    write!(f, "{}", string)
}
