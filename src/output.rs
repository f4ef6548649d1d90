use anyhow::{Context, Result};
use clap::ValueEnum;
use geojson::{Feature, FeatureCollection, JsonObject, Value};

use crate::{batch::Lookups, geocode::Coordinate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One `name: (latitude, longitude)` line per place
    Debug,

    /// A JSON object mapping each name to its coordinate
    #[default]
    Json,

    /// A GeoJSON feature collection of points
    Geojson,
}

/// Render the lookups in the given format.
pub fn render(lookups: &Lookups, format: Format) -> Result<String> {
    match format {
        Format::Debug => Ok(render_debug(lookups)),
        Format::Json => serde_json::to_string_pretty(lookups)
            .context("failed to serialize the lookups"),
        Format::Geojson => Ok(to_feature_collection(lookups)?.to_string()),
    }
}

fn render_debug(lookups: &Lookups) -> String {
    lookups
        .iter()
        .map(|(name, Coordinate { latitude, longitude })| {
            format!("{name}: ({latitude}, {longitude})\n")
        })
        .collect()
}

fn to_feature_collection(lookups: &Lookups) -> Result<FeatureCollection> {
    let features = lookups
        .iter()
        .map(|(name, coordinate)| to_feature(name, coordinate))
        .collect::<Result<_>>()?;
    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

fn to_feature(name: &str, coordinate: &Coordinate) -> Result<Feature> {
    let position = coordinate
        .to_position()
        .with_context(|| format!("cannot place {name:?} on a map"))?;
    let mut properties = JsonObject::new();
    properties.insert("name".into(), name.into());
    Ok(Feature {
        geometry: Some(Value::Point(position).into()),
        properties: Some(properties),
        ..Default::default()
    })
}
