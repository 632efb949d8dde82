//! Regression harness for the Fidelity Zero analysis.
//!
//! Provides the reference vehicle, the flight-state batches the analysis is
//! checked against, stored reference columns and a row-wise comparison that
//! names the first contributor out of tolerance.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::atmosphere::Air;
use crate::constants::FUSELAGE_LIFT_CORRECTION;
use crate::error::Result;
use crate::geometry::{
    Chords, Fuselage, FuselageAreas, FuselageLengths, Propulsor, Twists, Vehicle, Wing, WingAreas,
    MAIN_WING_TAG,
};
use crate::lift::LinearLift;
use crate::state::{linspace, FlightState};

/// Relative tolerance of the regression comparison.
pub const REGRESSION_TOLERANCE: f64 = 1e-4;

/// Number of rows in the legacy regression batch.
pub const LEGACY_BATCH_ROWS: usize = 11;

/// Boeing 737-800 class transport, with the wing area convention applied.
///
/// Tail section data and nacelle size are calibrated so the vehicle
/// reproduces the legacy drag columns on [`legacy_batch`].
pub fn reference_vehicle() -> Vehicle {
    let main_wing = Wing {
        tag: MAIN_WING_TAG.to_string(),
        areas: WingAreas {
            reference: Some(124.862),
            ..Default::default()
        },
        aspect_ratio: Some(10.18),
        quarter_chord_sweep_deg: Some(25.0),
        thickness_to_chord: Some(0.1),
        taper: Some(0.1),
        span_efficiency: Some(0.9),
        projected_span: Some(34.32),
        chords: Chords {
            root: Some(7.76),
            tip: Some(0.782),
            mean_aerodynamic: Some(4.235),
        },
        twists: Twists {
            root_deg: 4.0,
            tip_deg: -4.0,
        },
        vertical: false,
        symmetric: true,
    };

    let horizontal_stabilizer = Wing {
        tag: "horizontal_stabilizer".to_string(),
        areas: WingAreas {
            reference: Some(32.488),
            ..Default::default()
        },
        aspect_ratio: Some(6.16),
        quarter_chord_sweep_deg: Some(30.0),
        thickness_to_chord: Some(0.0883495),
        taper: Some(0.4),
        span_efficiency: Some(0.9),
        projected_span: Some(14.2),
        chords: Chords {
            root: Some(4.7),
            tip: Some(0.955),
            mean_aerodynamic: Some(14.9333),
        },
        twists: Twists {
            root_deg: 3.0,
            tip_deg: 3.0,
        },
        vertical: false,
        symmetric: true,
    };

    let vertical_stabilizer = Wing {
        tag: "vertical_stabilizer".to_string(),
        areas: WingAreas {
            reference: Some(27.316),
            ..Default::default()
        },
        aspect_ratio: Some(1.91),
        quarter_chord_sweep_deg: Some(25.0),
        thickness_to_chord: Some(0.0831015),
        taper: Some(0.25),
        span_efficiency: Some(0.9),
        projected_span: Some(7.777),
        chords: Chords {
            root: Some(8.19),
            tip: Some(0.95),
            mean_aerodynamic: Some(3.98864),
        },
        twists: Twists::default(),
        vertical: true,
        symmetric: false,
    };

    let fuselage = Fuselage {
        tag: "fuselage".to_string(),
        areas: FuselageAreas {
            wetted: Some(446.718),
            front_projected: Some(12.57),
        },
        lengths: FuselageLengths {
            nose: Some(6.4),
            tail: Some(8.0),
            cabin: Some(28.85),
            total: Some(38.02),
        },
        effective_diameter: Some(3.74),
    };

    let turbofan = Propulsor {
        tag: "turbofan".to_string(),
        number_of_engines: Some(2.0),
        nacelle_diameter: Some(1.84588),
        engine_length: Some(3.46587),
        wetted_area: Some(24.3703),
    };

    let mut vehicle = Vehicle {
        tag: "Boeing_737800".to_string(),
        reference_area: Some(124.862),
        wings: vec![main_wing, horizontal_stabilizer, vertical_stabilizer],
        fuselages: vec![fuselage],
        propulsors: vec![turbofan],
    };
    vehicle.apply_area_convention();
    vehicle
}

/// Linear lift surrogate reproducing the legacy lift polar of the reference
/// vehicle, with the fuselage contribution removed.
pub fn reference_lift_model() -> LinearLift {
    LinearLift::new(
        0.23736990423087748 / FUSELAGE_LIFT_CORRECTION,
        7.438832496321885 / FUSELAGE_LIFT_CORRECTION,
    )
}

/// Evenly spaced freestream samples in shuffled order.
///
/// Mach, density, viscosity and temperature are each spread over their
/// typical range and shuffled independently with `rng`; pressure is spread
/// in order and the angle of attack sweeps ±0.174 rad. Reynolds numbers are
/// derived with `air`.
pub fn random_batch<R: Rng + ?Sized>(rng: &mut R, rows: usize, air: Air) -> Result<FlightState> {
    let mut shuffled = |start: f64, end: f64| {
        let mut values = linspace(start, end, rows);
        values.shuffle(&mut *rng);
        values
    };
    let mach_number = shuffled(0.05, 0.9);
    let density = shuffled(0.3, 1.3);
    let dynamic_viscosity = shuffled(5.0e-6, 2.0e-5);
    let temperature = shuffled(200.0, 300.0);

    FlightState::builder(rows)
        .mach_number(mach_number)
        .density(density)
        .dynamic_viscosity(dynamic_viscosity)
        .temperature(temperature)
        .pressure(linspace(1e5, 1e6, rows))
        .angle_of_attack(linspace(-0.174, 0.174, rows))
        .reynolds_from(air)
        .build()
}

/// The batch the legacy reference values were produced on.
pub fn legacy_batch(air: Air) -> Result<FlightState> {
    FlightState::builder(LEGACY_BATCH_ROWS)
        .mach_number([0.9, 0.475, 0.05, 0.39, 0.815, 0.645, 0.305, 0.22, 0.56, 0.73, 0.135])
        .density([0.8, 1.0, 0.5, 1.1, 0.4, 1.3, 0.6, 0.3, 0.9, 0.7, 1.2])
        .dynamic_viscosity([
            1.85e-5, 1.55e-5, 1.4e-5, 1.1e-5, 2.0e-5, 8.0e-6, 6.5e-6, 9.5e-6, 1.7e-5, 1.25e-5,
            5.0e-6,
        ])
        .temperature([
            270.0, 250.0, 280.0, 260.0, 240.0, 200.0, 290.0, 230.0, 210.0, 300.0, 220.0,
        ])
        .pressure(linspace(1e5, 1e6, LEGACY_BATCH_ROWS))
        .angle_of_attack(linspace(-0.174, 0.174, LEGACY_BATCH_ROWS))
        .reynolds_from(air)
        .build()
}

/// Expected result columns keyed by contributor name.
///
/// Contributor names: `lift`, `cd_tot`, `cd_i`, `cd_m`, `cd_p_total`,
/// `cd_c_total`, `cd_p_<component>`, `cd_c_<wing>`, and the short forms
/// `cd_p_wing`, `cd_p_fuse` and `cd_c` for the main wing and fuselage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferenceColumns {
    columns: BTreeMap<String, Vec<f64>>,
}

impl ReferenceColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, contributor: &str, values: impl Into<Vec<f64>>) -> Self {
        self.insert(contributor, values);
        self
    }

    pub fn insert(&mut self, contributor: &str, values: impl Into<Vec<f64>>) {
        self.columns.insert(contributor.to_string(), values.into());
    }

    pub fn get(&self, contributor: &str) -> Option<&[f64]> {
        self.columns.get(contributor).map(Vec::as_slice)
    }

    pub fn contributors(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

/// Legacy reference columns for [`legacy_batch`] evaluated on
/// [`reference_vehicle`] with [`reference_lift_model`].
pub fn legacy_references() -> ReferenceColumns {
    ReferenceColumns::new()
        .with(
            "lift",
            [
                -2.42489437, -0.90696416, -0.53991953, -0.3044834, -0.03710598, 0.31061936,
                0.52106899, 0.77407765, 1.22389024, 1.86240501, 1.54587835,
            ],
        )
        .with(
            "cd_c",
            [
                2.08459463e-09, 1.08648911e-09, 4.40666169e-23, 1.88258599e-09, 3.71806409e-04,
                6.07658788e-05, 2.38156998e-09, 4.35875057e-11, 7.93890380e-05, 2.19714380e-03,
                6.81119259e-14,
            ],
        )
        .with(
            "cd_p_fuse",
            [
                0.00581516, 0.00688254, 0.01062775, 0.00675354, 0.00682628, 0.00574868,
                0.00707676, 0.00876415, 0.00686934, 0.00614271, 0.00718073,
            ],
        )
        .with(
            "cd_p_wing",
            [
                0.00568318, 0.00574321, 0.00911242, 0.00555159, 0.00636405, 0.0048708,
                0.00579879, 0.00734795, 0.00582637, 0.0054087, 0.00583051,
            ],
        )
        .with(
            "cd_i",
            [
                2.37792323e-01, 3.36989611e-02, 1.29763962e-02, 3.78292450e-03, 5.68310476e-05,
                3.85710691e-03, 1.11551856e-02, 2.55851168e-02, 6.14241594e-02, 1.40294860e-01,
                9.83364067e-02,
            ],
        )
        .with("cd_m", [0.00116061; LEGACY_BATCH_ROWS])
        .with(
            "cd_tot",
            [
                0.2595146, 0.05226547, 0.04064861, 0.02131243, 0.01927301, 0.01923316,
                0.02958776, 0.048638, 0.08073247, 0.16186261, 0.11868474,
            ],
        )
}

#[derive(Debug, Error, PartialEq)]
pub enum RegressionFailure {
    #[error("flight state has not been evaluated")]
    NotEvaluated,

    #[error("no result column for contributor '{0}'")]
    UnknownContributor(String),

    #[error("contributor '{contributor}' has {found} rows, expected {expected}")]
    RowCount {
        contributor: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "contributor '{contributor}' row {row}: expected {expected:e}, got {actual:e} \
         (relative error {relative_error:e})"
    )]
    Mismatch {
        contributor: String,
        row: usize,
        expected: f64,
        actual: f64,
        relative_error: f64,
    },
}

/// Result column of an evaluated state for a contributor name.
pub fn result_column<'a>(
    state: &'a FlightState,
    contributor: &str,
) -> std::result::Result<&'a [f64], RegressionFailure> {
    let aero = &state.aerodynamics;
    let unknown = || RegressionFailure::UnknownContributor(contributor.to_string());

    if contributor == "lift" {
        return aero
            .lift_coefficient
            .as_deref()
            .ok_or(RegressionFailure::NotEvaluated);
    }
    let drag = aero
        .drag_breakdown
        .as_ref()
        .ok_or(RegressionFailure::NotEvaluated)?;

    let column = match contributor {
        "cd_tot" => &drag.total,
        "cd_i" => &drag.induced.total,
        "cd_m" => &drag.miscellaneous.total,
        "cd_p_total" => &drag.parasite_total,
        "cd_c_total" => &drag.compressible_total,
        "cd_c" => &drag.compressible.get(MAIN_WING_TAG).ok_or_else(unknown)?.compressibility_drag,
        "cd_p_wing" => &drag.parasite.get(MAIN_WING_TAG).ok_or_else(unknown)?.parasite_drag_coefficient,
        "cd_p_fuse" => &drag.parasite.get("fuselage").ok_or_else(unknown)?.parasite_drag_coefficient,
        other => {
            if let Some(tag) = other.strip_prefix("cd_p_") {
                &drag.parasite.get(tag).ok_or_else(unknown)?.parasite_drag_coefficient
            } else if let Some(tag) = other.strip_prefix("cd_c_") {
                &drag.compressible.get(tag).ok_or_else(unknown)?.compressibility_drag
            } else {
                return Err(unknown());
            }
        }
    };
    Ok(column.as_slice())
}

/// Compare every reference column with the evaluated state.
///
/// The relative error of each row must not exceed `tolerance`; a zero
/// reference value is compared absolutely.
///
/// # Errors
/// The first failing contributor and row, in contributor name order.
pub fn check(
    state: &FlightState,
    references: &ReferenceColumns,
    tolerance: f64,
) -> std::result::Result<(), RegressionFailure> {
    for (contributor, expected) in &references.columns {
        let actual = result_column(state, contributor)?;
        if actual.len() != expected.len() {
            return Err(RegressionFailure::RowCount {
                contributor: contributor.clone(),
                expected: expected.len(),
                found: actual.len(),
            });
        }
        for (row, (&e, &a)) in expected.iter().zip(actual).enumerate() {
            let relative_error = if e == 0.0 {
                a.abs()
            } else {
                ((a - e) / e).abs()
            };
            // NaN never passes
            if !(relative_error <= tolerance) {
                return Err(RegressionFailure::Mismatch {
                    contributor: contributor.clone(),
                    row,
                    expected: e,
                    actual: a,
                    relative_error,
                });
            }
        }
    }
    Ok(())
}
