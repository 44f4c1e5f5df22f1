//! Screen layout: named regions placed in percentage units

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Regions the public display knows how to place
pub const REGIONS: [&str; 3] = ["timer", "teams", "note"];

/// A percentage of the parent box, e.g. `"25%"`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "PercentRepr", into = "String")]
pub struct Percent(pub f64);

#[derive(Deserialize)]
#[serde(untagged)]
enum PercentRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<PercentRepr> for Percent {
    type Error = String;

    fn try_from(repr: PercentRepr) -> Result<Self, Self::Error> {
        match repr {
            PercentRepr::Number(value) => Ok(Percent(value)),
            PercentRepr::Text(text) => text.parse(),
        }
    }
}

impl std::str::FromStr for Percent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
        number
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Percent)
            .ok_or_else(|| format!("invalid percentage: '{}'", s))
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl From<Percent> for String {
    fn from(value: Percent) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub top: Percent,
    pub left: Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: Percent,
    pub height: Percent,
}

/// Placement of one region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Position,
    pub size: Size,
}

impl Placement {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            position: Position {
                top: Percent(top),
                left: Percent(left),
            },
            size: Size {
                width: Percent(width),
                height: Percent(height),
            },
        }
    }
}

/// Mapping of region name to placement, as saved by the layout editor
///
/// Deserializing never fails on a bad region: regions with a missing or
/// non-finite position or size are dropped with a warning.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Layout(pub BTreeMap<String, Placement>);

impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Value::Object(regions) = Value::deserialize(deserializer)? else {
            warn!("Ignoring layout that is not an object");
            return Ok(Self::default());
        };

        let mut layout = Self::default();
        for (name, placement) in regions {
            match serde_json::from_value::<Placement>(placement) {
                Ok(placement) => {
                    layout.0.insert(name, placement);
                }
                Err(e) => warn!("Ignoring placement for region '{}': {}", name, e),
            }
        }
        Ok(layout)
    }
}

impl Layout {
    /// Named layout presets offered by the admin console
    pub fn preset(name: &str) -> Option<Self> {
        let regions = match name {
            "default" => [
                ("timer", Placement::new(5.0, 5.0, 25.0, 60.0)),
                ("teams", Placement::new(5.0, 70.0, 25.0, 80.0)),
                ("note", Placement::new(70.0, 5.0, 40.0, 15.0)),
            ],
            "timer-focus" => [
                ("timer", Placement::new(25.0, 35.0, 30.0, 50.0)),
                ("teams", Placement::new(5.0, 70.0, 25.0, 90.0)),
                ("note", Placement::new(5.0, 5.0, 30.0, 15.0)),
            ],
            _ => return None,
        };

        Some(Self(
            regions
                .into_iter()
                .map(|(name, placement)| (name.to_string(), placement))
                .collect(),
        ))
    }

    pub fn preset_names() -> &'static [&'static str] {
        &["default", "timer-focus"]
    }

    pub fn get(&self, region: &str) -> Option<&Placement> {
        self.0.get(region)
    }
}

/// Resolved box of one region on the display.
///
/// Fields mirror CSS box properties; `None` means `auto`. A renderer must
/// honour `right`/`bottom` only when they are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionBox {
    pub absolute: bool,
    pub top: Option<Percent>,
    pub left: Option<Percent>,
    pub width: Option<Percent>,
    pub height: Option<Percent>,
    pub right: Option<Percent>,
    pub bottom: Option<Percent>,
}

/// Current placement of every known region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    regions: BTreeMap<String, RegionBox>,
}

impl Stage {
    /// Stage before any layout is applied: the roster is anchored to the
    /// right edge, the note to the bottom edge, the timer is in normal flow
    pub fn new() -> Self {
        Self {
            regions: REGIONS
                .iter()
                .map(|name| (name.to_string(), base_box(name)))
                .collect(),
        }
    }

    /// Stage with `layout` already applied
    pub fn with_layout(layout: &Layout) -> Self {
        let mut stage = Self::new();
        stage.apply(layout);
        stage
    }

    /// Apply a layout.
    ///
    /// Each region present in `layout` becomes absolutely positioned by
    /// top/left/width/height, and any `right`/`bottom` it carried is cleared.
    /// Regions absent from `layout` keep their current placement.
    pub fn apply(&mut self, layout: &Layout) {
        for (name, placement) in &layout.0 {
            let Some(region) = self.regions.get_mut(name) else {
                debug!("Ignoring placement for unknown region '{}'", name);
                continue;
            };
            *region = RegionBox {
                absolute: true,
                top: Some(placement.position.top),
                left: Some(placement.position.left),
                width: Some(placement.size.width),
                height: Some(placement.size.height),
                right: None,
                bottom: None,
            };
        }
    }

    pub fn region(&self, name: &str) -> Option<&RegionBox> {
        self.regions.get(name)
    }

    pub fn regions(&self) -> &BTreeMap<String, RegionBox> {
        &self.regions
    }
}

fn base_box(region: &str) -> RegionBox {
    match region {
        "teams" => RegionBox {
            absolute: true,
            top: Some(Percent(5.0)),
            right: Some(Percent(2.0)),
            ..Default::default()
        },
        "note" => RegionBox {
            absolute: true,
            left: Some(Percent(5.0)),
            bottom: Some(Percent(5.0)),
            ..Default::default()
        },
        _ => RegionBox::default(),
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}
