//! Looks up a list of place names one after another.

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{info, warn};

use crate::geocode::{Coordinate, GeocodeClient, LookupError};

/// Looked up when no names are given.
pub const DEFAULT_LANDMARKS: [&str; 5] = [
    "Great Wall of China",
    "Petra",
    "Colosseum",
    "Chichen Itza",
    "Machu Picchu",
];

/// What to do when a single lookup fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole batch on the first failure.
    #[default]
    FailFast,

    /// Log the failure, skip the name and carry on.
    KeepGoing,
}

#[derive(Debug, Error)]
#[error("failed to look up {name:?}")]
pub struct BatchError {
    pub name: String,

    #[source]
    pub source: LookupError,
}

/// Place names mapped to their coordinates, in the order they were first
/// inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookups(Vec<(String, Coordinate)>);

impl Lookups {
    /// Insert or replace the coordinate of `name`. A replaced entry keeps its
    /// original position.
    pub fn insert(&mut self, name: impl Into<String>, coordinate: Coordinate) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = coordinate,
            None => self.0.push((name, coordinate)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Coordinate> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, coordinate)| coordinate)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Coordinate)> {
        self.0
            .iter()
            .map(|(name, coordinate)| (name.as_str(), coordinate))
    }
}

impl Serialize for Lookups {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Look up every name in order, one request at a time.
pub async fn lookup_all<S: AsRef<str>>(
    client: &GeocodeClient,
    names: &[S],
    policy: FailurePolicy,
) -> Result<Lookups, BatchError> {
    let mut lookups = Lookups::default();
    for name in names {
        let name = name.as_ref();
        match client.lookup(name).await {
            Ok(coordinate) => lookups.insert(name, coordinate),
            Err(source) if policy == FailurePolicy::KeepGoing => {
                let error = anyhow::Error::from(source);
                warn!(name, "⚠️ Skipping: {error:#}");
            }
            Err(source) => {
                return Err(BatchError {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }
    info!(found = lookups.len(), requested = names.len(), "✅ Done");
    Ok(lookups)
}
