//! Vehicle geometry description.
//!
//! The description mirrors what a vehicle file provides: every attribute is
//! optional on disk so a partially specified vehicle still deserializes, and
//! `resolve` turns it into the checked per-component geometry the drag and
//! lift models consume. A missing attribute is reported with the component
//! tag and attribute name.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::constants::{
    DEFAULT_AFFECTED_TO_WETTED, DEFAULT_EXPOSED_TO_WETTED, DEFAULT_WETTED_TO_REFERENCE,
};
use crate::error::{AeroError, Result};

/// Tag of the wing that carries the aircraft lift.
pub const MAIN_WING_TAG: &str = "main_wing";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WingAreas {
    pub reference: Option<f64>,
    pub wetted: Option<f64>,
    pub exposed: Option<f64>,
    pub affected: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Chords {
    pub root: Option<f64>,
    pub tip: Option<f64>,
    pub mean_aerodynamic: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Twists {
    pub root_deg: f64,
    pub tip_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wing {
    pub tag: String,
    #[serde(default)]
    pub areas: WingAreas,
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
    #[serde(default)]
    pub quarter_chord_sweep_deg: Option<f64>,
    #[serde(default)]
    pub thickness_to_chord: Option<f64>,
    #[serde(default)]
    pub taper: Option<f64>,
    #[serde(default)]
    pub span_efficiency: Option<f64>,
    #[serde(default)]
    pub projected_span: Option<f64>,
    #[serde(default)]
    pub chords: Chords,
    #[serde(default)]
    pub twists: Twists,
    #[serde(default)]
    pub vertical: bool,
    #[serde(default = "default_true")]
    pub symmetric: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FuselageAreas {
    pub wetted: Option<f64>,
    pub front_projected: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FuselageLengths {
    pub nose: Option<f64>,
    pub tail: Option<f64>,
    pub cabin: Option<f64>,
    pub total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fuselage {
    pub tag: String,
    #[serde(default)]
    pub areas: FuselageAreas,
    #[serde(default)]
    pub lengths: FuselageLengths,
    #[serde(default)]
    pub effective_diameter: Option<f64>,
}

/// A propulsion system with its nacelles (all engines of one type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Propulsor {
    pub tag: String,
    #[serde(default)]
    pub number_of_engines: Option<f64>,
    #[serde(default)]
    pub nacelle_diameter: Option<f64>,
    #[serde(default)]
    pub engine_length: Option<f64>,
    /// Wetted area of one nacelle
    #[serde(default)]
    pub wetted_area: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub tag: String,
    #[serde(default)]
    pub reference_area: Option<f64>,
    #[serde(default)]
    pub wings: Vec<Wing>,
    #[serde(default)]
    pub fuselages: Vec<Fuselage>,
    #[serde(default)]
    pub propulsors: Vec<Propulsor>,
}

impl Wing {
    /// Fill wetted, exposed and affected areas that were not given, using
    /// wetted = 2·reference, exposed = 0.8·wetted, affected = 0.6·wetted.
    pub fn apply_area_convention(&mut self) {
        let Some(reference) = self.areas.reference else {
            return;
        };
        let wetted = *self
            .areas
            .wetted
            .get_or_insert(DEFAULT_WETTED_TO_REFERENCE * reference);
        self.areas.exposed.get_or_insert(DEFAULT_EXPOSED_TO_WETTED * wetted);
        self.areas.affected.get_or_insert(DEFAULT_AFFECTED_TO_WETTED * wetted);
    }

    pub fn is_main(&self) -> bool {
        self.tag == MAIN_WING_TAG
    }

    pub(crate) fn resolve(&self) -> Result<WingGeometry> {
        let tag = self.tag.as_str();
        Ok(WingGeometry {
            tag: self.tag.clone(),
            reference_area: positive(tag, "areas.reference", self.areas.reference)?,
            wetted_area: positive(tag, "areas.wetted", self.areas.wetted)?,
            mean_aerodynamic_chord: positive(
                tag,
                "chords.mean_aerodynamic",
                self.chords.mean_aerodynamic,
            )?,
            thickness_to_chord: positive(tag, "thickness_to_chord", self.thickness_to_chord)?,
            sweep_rad: required(tag, "quarter_chord_sweep_deg", self.quarter_chord_sweep_deg)?
                .to_radians(),
            main: self.is_main(),
        })
    }
}

impl Vehicle {
    /// Apply the wing area convention to every wing.
    pub fn apply_area_convention(&mut self) {
        for wing in &mut self.wings {
            wing.apply_area_convention();
        }
    }

    pub fn main_wing(&self) -> Result<&Wing> {
        self.wings
            .iter()
            .find(|w| w.is_main())
            .ok_or_else(|| AeroError::UnknownComponent(MAIN_WING_TAG.to_string()))
    }

    pub fn wing(&self, tag: &str) -> Option<&Wing> {
        self.wings.iter().find(|w| w.tag == tag)
    }

    /// Check every attribute the drag models need and return the resolved
    /// geometry. Area conventions are not applied here.
    pub fn resolve(&self) -> Result<VehicleGeometry> {
        let reference_area = positive(&self.tag, "reference_area", self.reference_area)?;

        let mut seen = HashSet::new();
        let tags = self
            .wings
            .iter()
            .map(|w| &w.tag)
            .chain(self.fuselages.iter().map(|f| &f.tag))
            .chain(self.propulsors.iter().map(|p| &p.tag));
        for tag in tags {
            if !seen.insert(tag.as_str()) || tag == crate::parasite::PYLON_TAG {
                return Err(AeroError::InvalidParameter {
                    name: "tag",
                    reason: format!("component tag '{tag}' is duplicated or reserved"),
                });
            }
        }

        let main = self.main_wing()?;
        let main_wing = MainWingGeometry {
            aspect_ratio: positive(&main.tag, "aspect_ratio", main.aspect_ratio)?,
            span_efficiency: positive(&main.tag, "span_efficiency", main.span_efficiency)?,
        };

        let wings = self
            .wings
            .iter()
            .map(Wing::resolve)
            .collect::<Result<Vec<_>>>()?;

        let fuselages = self
            .fuselages
            .iter()
            .map(|f| {
                let tag = f.tag.as_str();
                Ok(FuselageGeometry {
                    tag: f.tag.clone(),
                    wetted_area: positive(tag, "areas.wetted", f.areas.wetted)?,
                    front_projected_area: positive(
                        tag,
                        "areas.front_projected",
                        f.areas.front_projected,
                    )?,
                    nose_length: positive(tag, "lengths.nose", f.lengths.nose)?,
                    tail_length: positive(tag, "lengths.tail", f.lengths.tail)?,
                    cabin_length: positive(tag, "lengths.cabin", f.lengths.cabin)?,
                    effective_diameter: positive(tag, "effective_diameter", f.effective_diameter)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let propulsors = self
            .propulsors
            .iter()
            .map(|p| {
                let tag = p.tag.as_str();
                let nacelle_diameter = positive(tag, "nacelle_diameter", p.nacelle_diameter)?;
                Ok(PropulsorGeometry {
                    tag: p.tag.clone(),
                    number_of_engines: positive(tag, "number_of_engines", p.number_of_engines)?,
                    nacelle_diameter,
                    engine_length: positive(tag, "engine_length", p.engine_length)?,
                    wetted_area: positive(tag, "wetted_area", p.wetted_area)?,
                    nacelle_reference_area: std::f64::consts::PI * nacelle_diameter.powi(2) / 4.0,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(VehicleGeometry {
            reference_area,
            main_wing,
            wings,
            fuselages,
            propulsors,
        })
    }
}

fn required(component: &str, attribute: &'static str, value: Option<f64>) -> Result<f64> {
    value.ok_or_else(|| AeroError::missing(component, attribute))
}

fn positive(component: &str, attribute: &'static str, value: Option<f64>) -> Result<f64> {
    let value = required(component, attribute, value)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(AeroError::InvalidParameter {
            name: attribute,
            reason: format!("{component}: must be positive, got {value}"),
        });
    }
    Ok(value)
}

/// Checked geometry of a wing, as used by the parasite and compressibility models.
#[derive(Debug, Clone, PartialEq)]
pub struct WingGeometry {
    pub tag: String,
    pub reference_area: f64,
    pub wetted_area: f64,
    pub mean_aerodynamic_chord: f64,
    pub thickness_to_chord: f64,
    pub sweep_rad: f64,
    pub main: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MainWingGeometry {
    pub aspect_ratio: f64,
    pub span_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuselageGeometry {
    pub tag: String,
    pub wetted_area: f64,
    pub front_projected_area: f64,
    pub nose_length: f64,
    pub tail_length: f64,
    pub cabin_length: f64,
    pub effective_diameter: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropulsorGeometry {
    pub tag: String,
    pub number_of_engines: f64,
    pub nacelle_diameter: f64,
    pub engine_length: f64,
    pub wetted_area: f64,
    /// π d²/4
    pub nacelle_reference_area: f64,
}

/// Flight-condition independent geometry prepared once per vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleGeometry {
    pub reference_area: f64,
    pub main_wing: MainWingGeometry,
    pub wings: Vec<WingGeometry>,
    pub fuselages: Vec<FuselageGeometry>,
    pub propulsors: Vec<PropulsorGeometry>,
}

impl VehicleGeometry {
    /// Sum of component wetted areas, counting every nacelle of a propulsor.
    pub fn total_wetted_area(&self) -> f64 {
        self.wings.iter().map(|w| w.wetted_area).sum::<f64>()
            + self.fuselages.iter().map(|f| f.wetted_area).sum::<f64>()
            + self
                .propulsors
                .iter()
                .map(|p| p.wetted_area * p.number_of_engines)
                .sum::<f64>()
    }
}
