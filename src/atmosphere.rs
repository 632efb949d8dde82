//! Gas properties of air and the ICAO standard atmosphere.
//!
//! `Air` is the gas property provider used to derive Reynolds numbers for a
//! flight-state batch. `StandardAtmosphere` produces consistent freestream
//! properties at altitude for polar sweeps.

use serde::{Deserialize, Serialize};

use crate::constants::{
    GAMMA_AIR, G_ACCEL_MPS2, R_AIR, SUTHERLAND_MU0, SUTHERLAND_S, SUTHERLAND_T0,
};
use crate::error::{AeroError, Result};

/// Ideal-gas model of dry air.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Air {
    /// Specific gas constant (J/(kg·K))
    pub gas_specific_constant: f64,
    /// Ratio of specific heats
    pub specific_heat_ratio: f64,
}

impl Default for Air {
    fn default() -> Self {
        Self {
            gas_specific_constant: R_AIR,
            specific_heat_ratio: GAMMA_AIR,
        }
    }
}

impl Air {
    /// Speed of sound for each row, a = sqrt(γ R T).
    ///
    /// Pressure does not enter the ideal-gas relation but is validated so a
    /// malformed row is reported here rather than surfacing later as NaN.
    ///
    /// # Arguments
    /// * `temperature` - Static temperature column in Kelvin
    /// * `pressure` - Static pressure column in Pa
    ///
    /// # Errors
    /// `InvalidValue` naming the first non-positive or non-finite entry,
    /// `LengthMismatch` if the columns differ in length.
    pub fn speed_of_sound(&self, temperature: &[f64], pressure: &[f64]) -> Result<Vec<f64>> {
        if pressure.len() != temperature.len() {
            return Err(AeroError::LengthMismatch {
                field: "pressure",
                expected: temperature.len(),
                found: pressure.len(),
            });
        }
        require_positive("temperature", temperature)?;
        require_positive("pressure", pressure)?;

        Ok(temperature
            .iter()
            .map(|&t| self.speed_of_sound_at(t))
            .collect())
    }

    /// Speed of sound for a single temperature (K).
    pub fn speed_of_sound_at(&self, temperature_k: f64) -> f64 {
        (self.specific_heat_ratio * self.gas_specific_constant * temperature_k).sqrt()
    }

    /// Density from the ideal gas law, ρ = p / (R T).
    pub fn density(&self, temperature: &[f64], pressure: &[f64]) -> Result<Vec<f64>> {
        if pressure.len() != temperature.len() {
            return Err(AeroError::LengthMismatch {
                field: "pressure",
                expected: temperature.len(),
                found: pressure.len(),
            });
        }
        require_positive("temperature", temperature)?;
        require_positive("pressure", pressure)?;

        Ok(temperature
            .iter()
            .zip(pressure)
            .map(|(&t, &p)| p / (self.gas_specific_constant * t))
            .collect())
    }

    /// Dynamic viscosity using Sutherland's formula.
    ///
    /// # Returns
    /// Dynamic viscosity in Pa·s (kg/m·s)
    pub fn dynamic_viscosity(&self, temperature: &[f64]) -> Result<Vec<f64>> {
        require_positive("temperature", temperature)?;
        Ok(temperature.iter().map(|&t| sutherland_viscosity(t)).collect())
    }
}

fn sutherland_viscosity(temperature_k: f64) -> f64 {
    SUTHERLAND_MU0 * (SUTHERLAND_T0 + SUTHERLAND_S) / (temperature_k + SUTHERLAND_S)
        * (temperature_k / SUTHERLAND_T0).powf(1.5)
}

pub(crate) fn require_positive(field: &'static str, values: &[f64]) -> Result<()> {
    match values
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v <= 0.0)
    {
        Some((row, &value)) => Err(AeroError::InvalidValue { field, row, value }),
        None => Ok(()),
    }
}

/// ICAO Standard Atmosphere layer definitions
#[derive(Debug, Clone)]
struct AtmosphereLayer {
    /// Base geopotential altitude of this layer (m)
    base_altitude: f64,
    /// Base temperature at layer start (K)
    base_temperature: f64,
    /// Base pressure at layer start (Pa)
    base_pressure: f64,
    /// Temperature lapse rate (K/m)
    lapse_rate: f64,
}

/// ICAO Standard Atmosphere layer data up to 84 km
const ICAO_LAYERS: &[AtmosphereLayer] = &[
    // Troposphere (0 - 11 km)
    AtmosphereLayer {
        base_altitude: 0.0,
        base_temperature: 288.15,
        base_pressure: 101325.0,
        lapse_rate: -0.0065,
    },
    // Tropopause (11 - 20 km)
    AtmosphereLayer {
        base_altitude: 11000.0,
        base_temperature: 216.65,
        base_pressure: 22632.1,
        lapse_rate: 0.0,
    },
    // Stratosphere 1 (20 - 32 km)
    AtmosphereLayer {
        base_altitude: 20000.0,
        base_temperature: 216.65,
        base_pressure: 5474.89,
        lapse_rate: 0.001,
    },
    // Stratosphere 2 (32 - 47 km)
    AtmosphereLayer {
        base_altitude: 32000.0,
        base_temperature: 228.65,
        base_pressure: 868.02,
        lapse_rate: 0.0028,
    },
    // Stratopause (47 - 51 km)
    AtmosphereLayer {
        base_altitude: 47000.0,
        base_temperature: 270.65,
        base_pressure: 110.91,
        lapse_rate: 0.0,
    },
    // Mesosphere 1 (51 - 71 km)
    AtmosphereLayer {
        base_altitude: 51000.0,
        base_temperature: 270.65,
        base_pressure: 66.94,
        lapse_rate: -0.0028,
    },
    // Mesosphere 2 (71 - 84 km)
    AtmosphereLayer {
        base_altitude: 71000.0,
        base_temperature: 214.65,
        base_pressure: 3.96,
        lapse_rate: -0.002,
    },
];

/// Freestream properties at a single altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereConditions {
    pub temperature_k: f64,
    pub pressure_pa: f64,
    pub density_kg_m3: f64,
    pub speed_of_sound_mps: f64,
    pub dynamic_viscosity_pa_s: f64,
}

/// ICAO standard atmosphere evaluated with a given gas model.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAtmosphere {
    pub air: Air,
}

impl StandardAtmosphere {
    /// Conditions at a geopotential altitude, clamped to 0..=84 km.
    pub fn at_altitude(&self, altitude_m: f64) -> AtmosphereConditions {
        let altitude = altitude_m.clamp(0.0, 84000.0);

        let layer = ICAO_LAYERS
            .iter()
            .rev()
            .find(|layer| altitude >= layer.base_altitude)
            .unwrap_or(&ICAO_LAYERS[0]);

        let height_diff = altitude - layer.base_altitude;
        let temperature = layer.base_temperature + layer.lapse_rate * height_diff;
        let r = self.air.gas_specific_constant;

        let pressure = if layer.lapse_rate.abs() < 1e-10 {
            // Isothermal layer
            layer.base_pressure * (-G_ACCEL_MPS2 * height_diff / (r * layer.base_temperature)).exp()
        } else {
            let temp_ratio = temperature / layer.base_temperature;
            layer.base_pressure * temp_ratio.powf(-G_ACCEL_MPS2 / (layer.lapse_rate * r))
        };

        AtmosphereConditions {
            temperature_k: temperature,
            pressure_pa: pressure,
            density_kg_m3: pressure / (r * temperature),
            speed_of_sound_mps: self.air.speed_of_sound_at(temperature),
            dynamic_viscosity_pa_s: sutherland_viscosity(temperature),
        }
    }
}
