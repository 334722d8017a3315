use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api_resource;

/// A site (plant) of the Dispatch system.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Site {
    /// Site id.
    pub id: i64,
    /// Human readable name.
    #[serde(default)]
    pub description: String,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An area within a site.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Area {
    /// Area id.
    pub id: i64,
    /// Area code.
    pub code: String,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A production line within an area.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Line {
    /// Line id.
    pub id: i64,
    /// Line code.
    pub code: String,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A machine on a line.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Machine {
    /// Machine id.
    pub id: i64,
    /// Machine code.
    pub code: String,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A kind of dispatch, e.g. a maintenance call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DispatchType {
    /// Dispatch type id.
    pub id: i64,
    /// Dispatch type code.
    pub code: String,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A dispatch record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dispatch {
    /// Dispatch id.
    pub id: i64,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

api_resource!(Site, "sites/");
api_resource!(Area, "areas/");
api_resource!(Line, "lines/");
api_resource!(Machine, "machines/");
api_resource!(DispatchType, "dispatchtypes/");
