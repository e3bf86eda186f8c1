// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Captured media attached to a job order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Kind of a captured image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    SetupImage,
    BoxReadingImage,
    RouterReadingImage,
    SpeedTestImage,
    SignedContractImage,
    ClientSignatureImage,
    HouseFrontImage,
    /// Only required for antenna and local connections.
    PortLabelImage,
}

impl MediaKind {
    /// Captures required on every completed installation.
    pub const STANDARD: [Self; 7] = [
        Self::SetupImage,
        Self::BoxReadingImage,
        Self::RouterReadingImage,
        Self::SpeedTestImage,
        Self::SignedContractImage,
        Self::ClientSignatureImage,
        Self::HouseFrontImage,
    ];

    pub const ALL: [Self; 8] = [
        Self::SetupImage,
        Self::BoxReadingImage,
        Self::RouterReadingImage,
        Self::SpeedTestImage,
        Self::SignedContractImage,
        Self::ClientSignatureImage,
        Self::HouseFrontImage,
        Self::PortLabelImage,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SetupImage => "setup_image",
            Self::BoxReadingImage => "box_reading_image",
            Self::RouterReadingImage => "router_reading_image",
            Self::SpeedTestImage => "speed_test_image",
            Self::SignedContractImage => "signed_contract_image",
            Self::ClientSignatureImage => "client_signature_image",
            Self::HouseFrontImage => "house_front_image",
            Self::PortLabelImage => "port_label_image",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::InvalidMediaKind {
                value: s.to_string(),
            })
    }
}

/// Durable reference returned by the media store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A newly captured file that has not been uploaded yet.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A media slot on a submission: either a reference kept from an earlier
/// submission or a new file to upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "value")]
pub enum MediaCapture {
    Existing(MediaRef),
    Attached(MediaFile),
}

impl MediaCapture {
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        matches!(self, Self::Attached(_))
    }

    #[must_use]
    pub const fn existing(&self) -> Option<&MediaRef> {
        match self {
            Self::Existing(reference) => Some(reference),
            Self::Attached(_) => None,
        }
    }
}

/// Per-kind collection of media slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaSet<T> {
    slots: BTreeMap<MediaKind, T>,
}

impl<T> Default for MediaSet<T> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl<T> MediaSet<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, kind: MediaKind) -> Option<&T> {
        self.slots.get(&kind)
    }

    #[must_use]
    pub fn contains(&self, kind: MediaKind) -> bool {
        self.slots.contains_key(&kind)
    }

    /// Fills a slot, returning the previous occupant.
    pub fn insert(&mut self, kind: MediaKind, value: T) -> Option<T> {
        self.slots.insert(kind, value)
    }

    pub fn remove(&mut self, kind: MediaKind) -> Option<T> {
        self.slots.remove(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MediaKind, &T)> {
        self.slots.iter().map(|(kind, value)| (*kind, value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T> FromIterator<(MediaKind, T)> for MediaSet<T> {
    fn from_iter<I: IntoIterator<Item = (MediaKind, T)>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

impl MediaSet<MediaCapture> {
    /// Slots that carry a file still to be uploaded.
    pub fn attachments(&self) -> impl Iterator<Item = (MediaKind, &MediaFile)> {
        self.slots.iter().filter_map(|(kind, capture)| match capture {
            MediaCapture::Attached(file) => Some((*kind, file)),
            MediaCapture::Existing(_) => None,
        })
    }

    #[must_use]
    pub fn has_attachments(&self) -> bool {
        self.slots.values().any(MediaCapture::is_attached)
    }

    /// The existing references only; `None` if any slot is a new attachment.
    #[must_use]
    pub fn as_refs(&self) -> Option<MediaSet<MediaRef>> {
        self.slots
            .iter()
            .map(|(kind, capture)| capture.existing().map(|r| (*kind, r.clone())))
            .collect()
    }
}

impl From<&MediaSet<MediaRef>> for MediaSet<MediaCapture> {
    fn from(refs: &MediaSet<MediaRef>) -> Self {
        refs.iter()
            .map(|(kind, r)| (kind, MediaCapture::Existing(r.clone())))
            .collect()
    }
}
