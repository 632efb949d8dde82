//! Component parasite drag.
//!
//! Every component drag column is referenced to the vehicle reference area so
//! the columns can be summed directly into the parasite total.

use serde::{Deserialize, Serialize};

use crate::constants::{FUSELAGE_FORM_FACTOR_MACH_LIMIT, PYLON_DRAG_FRACTION};
use crate::friction::{compressible_turbulent_flat_plate, SkinFriction};
use crate::geometry::{FuselageGeometry, PropulsorGeometry, WingGeometry};
use crate::state::Freestream;

/// Breakdown key of the pylon contribution; no component may use it as a tag.
pub const PYLON_TAG: &str = "pylon";

/// Parasite drag of one component over a batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParasiteDrag {
    /// Drag coefficient referenced to the vehicle reference area
    pub parasite_drag_coefficient: Vec<f64>,
    pub wetted_area: f64,
    /// Area the component's own coefficient is based on
    pub reference_area: f64,
    pub skin_friction_coefficient: Vec<f64>,
    pub compressibility_factor: Vec<f64>,
    pub reynolds_factor: Vec<f64>,
    pub form_factor: Vec<f64>,
}

impl ParasiteDrag {
    fn from_rows(
        frictions: Vec<SkinFriction>,
        form_factor: Vec<f64>,
        wetted_area: f64,
        reference_area: f64,
        scale: f64,
    ) -> Self {
        // scale converts k·cf·S_wet/S_component to the vehicle reference area
        let parasite_drag_coefficient = frictions
            .iter()
            .zip(&form_factor)
            .map(|(sf, k)| k * sf.coefficient * wetted_area / reference_area * scale)
            .collect();

        Self {
            parasite_drag_coefficient,
            wetted_area,
            reference_area,
            skin_friction_coefficient: frictions.iter().map(|sf| sf.coefficient).collect(),
            compressibility_factor: frictions.iter().map(|sf| sf.compressibility_factor).collect(),
            reynolds_factor: frictions.iter().map(|sf| sf.reynolds_factor).collect(),
            form_factor,
        }
    }
}

fn skin_friction(freestream: &Freestream, length: f64) -> Vec<SkinFriction> {
    freestream
        .reynolds_number
        .iter()
        .zip(&freestream.mach_number)
        .zip(&freestream.temperature)
        .map(|((re, m), t)| compressible_turbulent_flat_plate(re * length, *m, *t))
        .collect()
}

/// Wing parasite drag with a thickness and sweep dependent form factor.
///
/// # Arguments
/// * `freestream` - Batch freestream columns
/// * `wing` - Resolved wing geometry
/// * `vehicle_reference_area` - Area the result is referenced to
/// * `form_factor_constant` - C in the thickness form factor (1.1 for conventional sections)
pub fn wing_parasite_drag(
    freestream: &Freestream,
    wing: &WingGeometry,
    vehicle_reference_area: f64,
    form_factor_constant: f64,
) -> ParasiteDrag {
    let frictions = skin_friction(freestream, wing.mean_aerodynamic_chord);

    let cos2 = wing.sweep_rad.cos().powi(2);
    let tc = wing.thickness_to_chord;
    let c = form_factor_constant;
    let form_factor = freestream
        .mach_number
        .iter()
        .map(|m| {
            let root = 1.0 - m * m * cos2;
            1.0 + 2.0 * c * tc * cos2 / root.sqrt()
                + c * c * cos2 * tc * tc * (1.0 + 5.0 * cos2) / (2.0 * root)
        })
        .collect();

    ParasiteDrag::from_rows(
        frictions,
        form_factor,
        wing.wetted_area,
        wing.reference_area,
        wing.reference_area / vehicle_reference_area,
    )
}

/// Fuselage parasite drag using the body-of-revolution velocity increment.
pub fn fuselage_parasite_drag(
    freestream: &Freestream,
    fuselage: &FuselageGeometry,
    vehicle_reference_area: f64,
    velocity_increment_factor: f64,
) -> ParasiteDrag {
    let length = fuselage.cabin_length + fuselage.nose_length + fuselage.tail_length;
    let frictions = skin_friction(freestream, length);

    let d_over_l = fuselage.effective_diameter / fuselage.cabin_length;
    let form_factor = freestream
        .mach_number
        .iter()
        .map(|&m| {
            let du = body_velocity_increment(m, d_over_l);
            (1.0 + velocity_increment_factor * du).powi(2)
        })
        .collect();

    ParasiteDrag::from_rows(
        frictions,
        form_factor,
        fuselage.wetted_area,
        fuselage.front_projected_area,
        fuselage.front_projected_area / vehicle_reference_area,
    )
}

/// Maximum surface velocity increment Δu/u of an ellipsoid of revolution.
fn body_velocity_increment(mach: f64, d_over_l: f64) -> f64 {
    let ratio2 = d_over_l * d_over_l;
    if mach < FUSELAGE_FORM_FACTOR_MACH_LIMIT {
        let beta2 = 1.0 - mach * mach;
        let d = (1.0 - beta2 * ratio2).sqrt();
        let a = 2.0 * beta2 * ratio2 * (d.atanh() - d) / d.powi(3);
        a / ((2.0 - a) * beta2.sqrt())
    } else {
        let d = (1.0 - ratio2).sqrt();
        let a = 2.0 * ratio2 * (d.atanh() - d) / d.powi(3);
        a / (2.0 - a)
    }
}

/// Nacelle parasite drag of all engines of a propulsor.
pub fn propulsor_parasite_drag(
    freestream: &Freestream,
    propulsor: &PropulsorGeometry,
    vehicle_reference_area: f64,
) -> ParasiteDrag {
    let frictions = skin_friction(freestream, propulsor.engine_length);

    let k = 1.0 + 0.35 * propulsor.nacelle_diameter / propulsor.engine_length;
    let form_factor = vec![k; frictions.len()];

    ParasiteDrag::from_rows(
        frictions,
        form_factor,
        propulsor.wetted_area,
        propulsor.nacelle_reference_area,
        propulsor.nacelle_reference_area / vehicle_reference_area * propulsor.number_of_engines,
    )
}

/// Pylon drag as a fixed fraction of the summed nacelle drag.
///
/// Only the coefficient column is populated; the friction columns stay empty.
pub fn pylon_parasite_drag(propulsors: &[ParasiteDrag], rows: usize) -> ParasiteDrag {
    let mut coefficient = vec![0.0; rows];
    for propulsor in propulsors {
        for (total, cd) in coefficient.iter_mut().zip(&propulsor.parasite_drag_coefficient) {
            *total += PYLON_DRAG_FRACTION * cd;
        }
    }

    ParasiteDrag {
        parasite_drag_coefficient: coefficient,
        ..Default::default()
    }
}
