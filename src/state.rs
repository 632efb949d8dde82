//! Flight-state batches.
//!
//! A `FlightState` holds N flight conditions as parallel columns; row `i` of
//! every column describes one evaluation point. States are assembled through
//! `FlightStateBuilder`, which refuses to produce a partially populated or
//! physically invalid batch.

use serde::{Deserialize, Serialize};

use crate::atmosphere::{require_positive, Air};
use crate::drag::DragBreakdown;
use crate::error::{AeroError, Result};
use crate::lift::LiftBreakdown;

/// Freestream columns of a flight-state batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freestream {
    pub mach_number: Vec<f64>,
    /// kg/m³
    pub density: Vec<f64>,
    /// Pa·s
    pub dynamic_viscosity: Vec<f64>,
    /// K
    pub temperature: Vec<f64>,
    /// Pa
    pub pressure: Vec<f64>,
    /// Unit Reynolds number (1/m), ρ a M / μ
    pub reynolds_number: Vec<f64>,
}

/// Aerodynamic inputs and the results written back by an evaluation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AerodynamicConditions {
    /// Radians
    pub angle_of_attack: Vec<f64>,
    pub lift_coefficient: Option<Vec<f64>>,
    pub drag_coefficient: Option<Vec<f64>>,
    pub lift_breakdown: Option<LiftBreakdown>,
    pub drag_breakdown: Option<DragBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightState {
    pub freestream: Freestream,
    pub aerodynamics: AerodynamicConditions,
}

impl FlightState {
    /// Start building a batch of `rows` flight conditions.
    pub fn builder(rows: usize) -> FlightStateBuilder {
        FlightStateBuilder {
            rows,
            ..Default::default()
        }
    }

    /// Number of rows in the batch.
    pub fn len(&self) -> usize {
        self.freestream.mach_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop any results from a previous evaluation.
    pub fn clear_results(&mut self) {
        let aero = &mut self.aerodynamics;
        aero.lift_coefficient = None;
        aero.drag_coefficient = None;
        aero.lift_breakdown = None;
        aero.drag_breakdown = None;
    }
}

/// Column-by-column constructor for `FlightState`.
#[derive(Debug, Clone, Default)]
pub struct FlightStateBuilder {
    rows: usize,
    mach_number: Option<Vec<f64>>,
    density: Option<Vec<f64>>,
    dynamic_viscosity: Option<Vec<f64>>,
    temperature: Option<Vec<f64>>,
    pressure: Option<Vec<f64>>,
    reynolds_number: Option<Vec<f64>>,
    angle_of_attack: Option<Vec<f64>>,
    derive_reynolds: Option<Air>,
}

impl FlightStateBuilder {
    pub fn mach_number(mut self, values: impl Into<Vec<f64>>) -> Self {
        self.mach_number = Some(values.into());
        self
    }

    pub fn density(mut self, values: impl Into<Vec<f64>>) -> Self {
        self.density = Some(values.into());
        self
    }

    pub fn dynamic_viscosity(mut self, values: impl Into<Vec<f64>>) -> Self {
        self.dynamic_viscosity = Some(values.into());
        self
    }

    pub fn temperature(mut self, values: impl Into<Vec<f64>>) -> Self {
        self.temperature = Some(values.into());
        self
    }

    pub fn pressure(mut self, values: impl Into<Vec<f64>>) -> Self {
        self.pressure = Some(values.into());
        self
    }

    pub fn reynolds_number(mut self, values: impl Into<Vec<f64>>) -> Self {
        self.reynolds_number = Some(values.into());
        self
    }

    pub fn angle_of_attack(mut self, values: impl Into<Vec<f64>>) -> Self {
        self.angle_of_attack = Some(values.into());
        self
    }

    /// Derive the Reynolds number column from the other freestream columns
    /// using the speed of sound of `air`. An explicitly set Reynolds column
    /// takes precedence.
    pub fn reynolds_from(mut self, air: Air) -> Self {
        self.derive_reynolds = Some(air);
        self
    }

    /// Validate every column and assemble the batch.
    ///
    /// # Errors
    /// * `EmptyBatch` for zero rows
    /// * `MissingField` if a column was never set
    /// * `LengthMismatch` if a column does not have `rows` entries
    /// * `InvalidValue` naming the field and row of the first bad entry
    pub fn build(self) -> Result<FlightState> {
        if self.rows == 0 {
            return Err(AeroError::EmptyBatch);
        }
        let rows = self.rows;

        let mach_number = take_column("mach_number", self.mach_number, rows)?;
        let density = take_column("density", self.density, rows)?;
        let dynamic_viscosity = take_column("dynamic_viscosity", self.dynamic_viscosity, rows)?;
        let temperature = take_column("temperature", self.temperature, rows)?;
        let pressure = take_column("pressure", self.pressure, rows)?;
        let angle_of_attack = take_column("angle_of_attack", self.angle_of_attack, rows)?;

        require_non_negative("mach_number", &mach_number)?;
        require_positive("density", &density)?;
        require_positive("dynamic_viscosity", &dynamic_viscosity)?;
        require_positive("temperature", &temperature)?;
        require_positive("pressure", &pressure)?;
        require_finite("angle_of_attack", &angle_of_attack)?;

        let reynolds_number = match (self.reynolds_number, self.derive_reynolds) {
            (Some(values), _) => take_column("reynolds_number", Some(values), rows)?,
            (None, Some(air)) => {
                let speed_of_sound = air.speed_of_sound(&temperature, &pressure)?;
                (0..rows)
                    .map(|i| density[i] * speed_of_sound[i] * mach_number[i] / dynamic_viscosity[i])
                    .collect()
            }
            (None, None) => return Err(AeroError::MissingField { field: "reynolds_number" }),
        };
        // Skin friction takes log10(Re), so a zero Reynolds number is as fatal as a negative one.
        require_positive("reynolds_number", &reynolds_number)?;

        Ok(FlightState {
            freestream: Freestream {
                mach_number,
                density,
                dynamic_viscosity,
                temperature,
                pressure,
                reynolds_number,
            },
            aerodynamics: AerodynamicConditions {
                angle_of_attack,
                ..Default::default()
            },
        })
    }
}

fn take_column(field: &'static str, values: Option<Vec<f64>>, rows: usize) -> Result<Vec<f64>> {
    let values = values.ok_or(AeroError::MissingField { field })?;
    if values.len() != rows {
        return Err(AeroError::LengthMismatch {
            field,
            expected: rows,
            found: values.len(),
        });
    }
    Ok(values)
}

fn require_finite(field: &'static str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(row) => Err(AeroError::InvalidValue {
            field,
            row,
            value: values[row],
        }),
        None => Ok(()),
    }
}

fn require_non_negative(field: &'static str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite() || *v < 0.0) {
        Some(row) => Err(AeroError::InvalidValue {
            field,
            row,
            value: values[row],
        }),
        None => Ok(()),
    }
}

/// `count` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}
