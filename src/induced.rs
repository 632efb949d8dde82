//! Lift-induced drag.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::geometry::MainWingGeometry;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InducedDrag {
    pub total: Vec<f64>,
    /// Oswald efficiency used for each row
    pub efficiency_factor: Vec<f64>,
    pub aspect_ratio: f64,
}

/// Induced drag `CL² / (π AR e)` of the main wing.
///
/// When no Oswald factor is configured it is estimated per row from the span
/// efficiency and the parasite drag, `e = 1 / (1/e_span + π AR K CDp)`.
///
/// # Arguments
/// * `lift_coefficient` - Total lift coefficient column
/// * `parasite_total` - Parasite drag total column of the same batch
/// * `main_wing` - Aspect ratio and span efficiency of the main wing
/// * `oswald_efficiency` - Fixed Oswald factor, if any
/// * `viscous_factor` - K, the lift-dependent viscous drag factor
pub fn induced_drag(
    lift_coefficient: &[f64],
    parasite_total: &[f64],
    main_wing: &MainWingGeometry,
    oswald_efficiency: Option<f64>,
    viscous_factor: f64,
) -> InducedDrag {
    let ar = main_wing.aspect_ratio;
    let efficiency_factor: Vec<f64> = match oswald_efficiency {
        Some(e) => vec![e; lift_coefficient.len()],
        None => parasite_total
            .iter()
            .map(|cdp| 1.0 / (1.0 / main_wing.span_efficiency + PI * ar * viscous_factor * cdp))
            .collect(),
    };

    let total = lift_coefficient
        .iter()
        .zip(&efficiency_factor)
        .map(|(cl, e)| cl * cl / (PI * ar * e))
        .collect();

    InducedDrag {
        total,
        efficiency_factor,
        aspect_ratio: ar,
    }
}
