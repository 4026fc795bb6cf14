//! Stadium (`.hbs`) file schema
//!
//! Stadiums are JSON documents describing the field geometry and physics.
//! They are parsed into typed structs for inspection and re-serialized for
//! [`HostRoom::set_custom_stadium`](crate::host::HostRoom::set_custom_stadium).
//! The geometry is not validated here; the host rejects what it cannot load.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A custom stadium
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stadium {
    pub name: String,
    /// Camera bounds
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_view_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_follow: Option<String>,
    pub spawn_distance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_be_stored: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kick_off_reset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<Background>,
    #[serde(default)]
    pub traits: HashMap<String, Value>,
    #[serde(default)]
    pub vertexes: Vec<Vertex>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub discs: Vec<Disc>,
    #[serde(default)]
    pub planes: Vec<Plane>,
    #[serde(default)]
    pub joints: Vec<Value>,
    #[serde(default)]
    pub red_spawn_points: Vec<[f64; 2]>,
    #[serde(default)]
    pub blue_spawn_points: Vec<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_physics: Option<PlayerPhysics>,
    /// Either `"disc0"` or a disc object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ball_physics: Option<Value>,
}

impl Stadium {
    /// Parse a stadium from `.hbs` JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read and parse a `.hbs` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize back to the JSON text the host expects
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kick_off_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_line: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b_coef: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_mask: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_group: Option<Vec<String>>,
    #[serde(rename = "trait", default, skip_serializing_if = "Option::is_none")]
    pub trait_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub v0: usize,
    pub v1: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b_coef: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_mask: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_group: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vis: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    #[serde(rename = "trait", default, skip_serializing_if = "Option::is_none")]
    pub trait_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub p0: [f64; 2],
    pub p1: [f64; 2],
    /// `"red"` or `"blue"`
    pub team: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inv_mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damping: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b_coef: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_mask: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_group: Option<Vec<String>>,
    #[serde(rename = "trait", default, skip_serializing_if = "Option::is_none")]
    pub trait_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plane {
    pub normal: [f64; 2],
    pub dist: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b_coef: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_mask: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_group: Option<Vec<String>>,
    #[serde(rename = "trait", default, skip_serializing_if = "Option::is_none")]
    pub trait_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPhysics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b_coef: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inv_mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damping: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kicking_acceleration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kicking_damping: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kick_strength: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kickback: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_group: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity: Option<[f64; 2]>,
}
