// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Region → City → Barangay → Location hierarchy.
//!
//! The hierarchy itself is maintained by the lookup collaborator; this
//! module only indexes it, answers cascading child lookups, and validates
//! selection paths. A path carried on a submission must never hold a
//! descendant that belongs to a different ancestor than the one selected.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::types::LocationId;

/// Level of a node in the hierarchy, shallowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Region,
    City,
    Barangay,
    Location,
}

impl LocationKind {
    /// Every level, shallowest first.
    pub const ALL: [Self; 4] = [Self::Region, Self::City, Self::Barangay, Self::Location];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::City => "city",
            Self::Barangay => "barangay",
            Self::Location => "location",
        }
    }

    /// Zero-based depth; `Region` is 0.
    #[must_use]
    pub const fn depth(&self) -> usize {
        match self {
            Self::Region => 0,
            Self::City => 1,
            Self::Barangay => 2,
            Self::Location => 3,
        }
    }

    /// The kind one level up, `None` for `Region`.
    #[must_use]
    pub const fn parent_kind(&self) -> Option<Self> {
        match self {
            Self::Region => None,
            Self::City => Some(Self::Region),
            Self::Barangay => Some(Self::City),
            Self::Location => Some(Self::Barangay),
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "region" => Ok(Self::Region),
            "city" => Ok(Self::City),
            "barangay" => Ok(Self::Barangay),
            "location" => Ok(Self::Location),
            _ => Err(DomainError::InvalidLocationKind {
                value: s.to_string(),
            }),
        }
    }
}

/// A node of the location hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationNode {
    pub id: LocationId,
    pub kind: LocationKind,
    pub name: String,
    /// `None` only for regions.
    pub parent_id: Option<LocationId>,
}

/// A (possibly partial) selection path through the hierarchy.
///
/// The `select_*` setters enforce the cascade-reset rule: changing a level
/// clears every deeper level. Direct field assignment bypasses that, which
/// is why submissions are still checked with
/// [`LocationHierarchy::validate_path`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationPath {
    pub region: Option<LocationId>,
    pub city: Option<LocationId>,
    pub barangay: Option<LocationId>,
    pub location: Option<LocationId>,
}

impl LocationPath {
    #[must_use]
    pub const fn new(
        region: Option<LocationId>,
        city: Option<LocationId>,
        barangay: Option<LocationId>,
        location: Option<LocationId>,
    ) -> Self {
        Self {
            region,
            city,
            barangay,
            location,
        }
    }

    /// Returns the selection at `kind`.
    #[must_use]
    pub const fn get(&self, kind: LocationKind) -> Option<LocationId> {
        match kind {
            LocationKind::Region => self.region,
            LocationKind::City => self.city,
            LocationKind::Barangay => self.barangay,
            LocationKind::Location => self.location,
        }
    }

    /// The four levels paired with their selection, shallowest first.
    #[must_use]
    pub const fn levels(&self) -> [(LocationKind, Option<LocationId>); 4] {
        [
            (LocationKind::Region, self.region),
            (LocationKind::City, self.city),
            (LocationKind::Barangay, self.barangay),
            (LocationKind::Location, self.location),
        ]
    }

    /// Sets the selection at `kind` and clears every deeper level.
    ///
    /// Re-selecting the value already held keeps the descendants.
    pub fn select(&mut self, kind: LocationKind, id: Option<LocationId>) {
        if self.get(kind) == id {
            return;
        }
        match kind {
            LocationKind::Region => {
                self.region = id;
                self.city = None;
                self.barangay = None;
                self.location = None;
            }
            LocationKind::City => {
                self.city = id;
                self.barangay = None;
                self.location = None;
            }
            LocationKind::Barangay => {
                self.barangay = id;
                self.location = None;
            }
            LocationKind::Location => {
                self.location = id;
            }
        }
    }

    pub fn select_region(&mut self, id: Option<LocationId>) {
        self.select(LocationKind::Region, id);
    }

    pub fn select_city(&mut self, id: Option<LocationId>) {
        self.select(LocationKind::City, id);
    }

    pub fn select_barangay(&mut self, id: Option<LocationId>) {
        self.select(LocationKind::Barangay, id);
    }

    pub fn select_location(&mut self, id: Option<LocationId>) {
        self.select(LocationKind::Location, id);
    }
}

/// Read-only index over the location nodes supplied by the lookup provider.
#[derive(Debug, Clone, Default)]
pub struct LocationHierarchy {
    nodes: HashMap<LocationId, LocationNode>,
    children: HashMap<Option<LocationId>, Vec<LocationId>>,
}

impl LocationHierarchy {
    /// Builds the index, checking that every node hangs off a parent exactly
    /// one level higher.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidHierarchy` if a node has a missing or
    /// wrongly-kinded parent, or if a region has a parent.
    pub fn from_nodes(nodes: Vec<LocationNode>) -> Result<Self, DomainError> {
        let index: HashMap<LocationId, LocationNode> =
            nodes.into_iter().map(|node| (node.id, node)).collect();

        let mut children: HashMap<Option<LocationId>, Vec<LocationId>> = HashMap::new();
        for node in index.values() {
            match (node.kind.parent_kind(), node.parent_id) {
                (None, None) => {}
                (None, Some(_)) => {
                    return Err(DomainError::InvalidHierarchy {
                        node_id: node.id,
                        reason: String::from("a region cannot have a parent"),
                    });
                }
                (Some(_), None) => {
                    return Err(DomainError::InvalidHierarchy {
                        node_id: node.id,
                        reason: format!("a {} must have a parent", node.kind),
                    });
                }
                (Some(expected), Some(parent_id)) => {
                    let parent_kind = index.get(&parent_id).map(|p| p.kind);
                    if parent_kind != Some(expected) {
                        return Err(DomainError::InvalidHierarchy {
                            node_id: node.id,
                            reason: format!(
                                "parent {parent_id} of a {} must be a {expected}",
                                node.kind
                            ),
                        });
                    }
                }
            }
            children.entry(node.parent_id).or_default().push(node.id);
        }

        for ids in children.values_mut() {
            ids.sort_by(|a, b| {
                let name_a = index.get(a).map(|n| n.name.as_str());
                let name_b = index.get(b).map(|n| n.name.as_str());
                name_a.cmp(&name_b).then(a.cmp(b))
            });
        }

        Ok(Self {
            nodes: index,
            children,
        })
    }

    #[must_use]
    pub fn node(&self, id: LocationId) -> Option<&LocationNode> {
        self.nodes.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct children of `id`, ordered by name. Unknown ids and leaves
    /// yield an empty list.
    #[must_use]
    pub fn children_of(&self, id: LocationId) -> Vec<&LocationNode> {
        self.collect_children(Some(id))
    }

    fn collect_children(&self, parent: Option<LocationId>) -> Vec<&LocationNode> {
        self.children
            .get(&parent)
            .map(|ids| ids.iter().filter_map(|id| self.nodes.get(id)).collect())
            .unwrap_or_default()
    }

    /// Validates that every non-empty level of `path` is a node of the right
    /// kind whose parent is the selection one level up.
    ///
    /// A level below an empty level must itself be empty: its parent would
    /// have to match "nothing selected".
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPath` naming the first level that breaks.
    pub fn validate_path(&self, path: &LocationPath) -> Result<(), DomainError> {
        let mut previous: Option<LocationId> = None;
        for (level, selection) in path.levels() {
            if let Some(id) = selection {
                let consistent = self
                    .nodes
                    .get(&id)
                    .is_some_and(|node| node.kind == level && node.parent_id == previous);
                if !consistent {
                    return Err(DomainError::InvalidPath { level });
                }
            }
            previous = selection;
        }
        Ok(())
    }
}
