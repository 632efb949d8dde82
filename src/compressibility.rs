//! Compressibility (wave) drag of lifting surfaces.
//!
//! The crest-critical Mach number of each wing comes from a quadratic fit in
//! the sweep-corrected thickness ratio and section lift coefficient. Drag rise
//! above it follows Shevell's correlation, which grows steeply but smoothly, so
//! no separate onset threshold is applied.

use serde::{Deserialize, Serialize};

use crate::constants::{CREST_CRITICAL_FIT, SHEVELL_RISE_EXPONENT, SHEVELL_RISE_SCALE};
use crate::geometry::WingGeometry;

/// Compressibility drag of one wing over a batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompressibilityDrag {
    pub compressibility_drag: Vec<f64>,
    /// Sweep-corrected thickness ratio
    pub thickness_to_chord: f64,
    /// Quarter-chord sweep in radians
    pub wing_sweep: f64,
    pub crest_critical: Vec<f64>,
    pub divergence_mach: Vec<f64>,
}

/// Crest-critical Mach number of a swept section.
///
/// # Arguments
/// * `thickness_to_chord` - Streamwise t/c
/// * `section_lift` - Wing lift coefficient
/// * `cos_sweep` - Cosine of the quarter-chord sweep
pub fn crest_critical_mach(thickness_to_chord: f64, section_lift: f64, cos_sweep: f64) -> f64 {
    let tc = thickness_to_chord / cos_sweep;
    let cl = section_lift / (cos_sweep * cos_sweep);
    let [c0, c_tc, c_cl, c_tc2, c_tccl, c_cl2] = CREST_CRITICAL_FIT;

    let fit = c0 + c_tc * tc + c_cl * cl + c_tc2 * tc * tc + c_tccl * tc * cl + c_cl2 * cl * cl;
    fit / cos_sweep
}

/// Compressibility drag of a wing, referenced to the vehicle reference area.
///
/// The main wing uses the compressible wings lift; every other wing is
/// evaluated at zero lift.
///
/// # Arguments
/// * `mach_number` - Freestream Mach column
/// * `wing` - Resolved wing geometry
/// * `wing_lift` - Lift column of this wing, `None` for zero lift
/// * `reference_area` - Vehicle reference area in m²
pub fn wing_compressibility_drag(
    mach_number: &[f64],
    wing: &WingGeometry,
    wing_lift: Option<&[f64]>,
    reference_area: f64,
) -> CompressibilityDrag {
    let cos_sweep = wing.sweep_rad.cos();
    let scale = cos_sweep.powi(3) * wing.reference_area / reference_area;

    let crest_critical: Vec<f64> = (0..mach_number.len())
        .map(|i| {
            let cl = wing_lift.map_or(0.0, |lift| lift[i]);
            crest_critical_mach(wing.thickness_to_chord, cl, cos_sweep)
        })
        .collect();

    let divergence_mach = crest_critical
        .iter()
        .map(|mcc| mcc * (1.02 + 0.08 * (1.0 - cos_sweep)))
        .collect();

    // exp/ln keeps very small rises representable; M = 0 gives exp(-inf) = 0
    let compressibility_drag = mach_number
        .iter()
        .zip(&crest_critical)
        .map(|(m, mcc)| {
            SHEVELL_RISE_SCALE * (SHEVELL_RISE_EXPONENT * (m / mcc).ln()).exp() * scale
        })
        .collect();

    CompressibilityDrag {
        compressibility_drag,
        thickness_to_chord: wing.thickness_to_chord / cos_sweep,
        wing_sweep: wing.sweep_rad,
        crest_critical,
        divergence_mach,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_wing() -> WingGeometry {
        WingGeometry {
            tag: "main_wing".to_string(),
            reference_area: 124.862,
            wetted_area: 2.0 * 124.862,
            mean_aerodynamic_chord: 4.235,
            thickness_to_chord: 0.1,
            sweep_rad: 25.0_f64.to_radians(),
            main: true,
        }
    }

    #[test]
    fn test_monotone_in_mach() {
        let mach: Vec<f64> = (0..=18).map(|i| 0.05 * i as f64).collect();
        let lift = vec![0.5; mach.len()];
        let drag = wing_compressibility_drag(&mach, &main_wing(), Some(&lift), 124.862);

        assert_eq!(drag.compressibility_drag[0], 0.0);
        for pair in drag.compressibility_drag.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn test_negligible_at_low_speed() {
        let drag = wing_compressibility_drag(&[0.05], &main_wing(), Some(&[-0.47362898]), 124.862);
        assert!(drag.compressibility_drag[0] >= 0.0);
        assert!(drag.compressibility_drag[0] < 1e-20);
    }

    #[test]
    fn test_cruise_value() {
        // M 0.73 with the compressible wings lift of the legacy batch row 9
        let lift = 1.86240501 / 1.14;
        let drag = wing_compressibility_drag(&[0.73], &main_wing(), Some(&[lift]), 124.862);
        let expected = 2.19714380e-03;
        assert!((drag.compressibility_drag[0] - expected).abs() / expected < 1e-4);
    }

    #[test]
    fn test_divergence_above_crest_critical() {
        let drag = wing_compressibility_drag(&[0.8], &main_wing(), None, 124.862);
        assert!(drag.divergence_mach[0] > drag.crest_critical[0]);
        assert!((drag.thickness_to_chord - 0.1 / 25.0_f64.to_radians().cos()).abs() < 1e-15);
    }

    #[test]
    fn test_scaled_by_wing_area() {
        let mut tail = main_wing();
        tail.main = false;
        let own = wing_compressibility_drag(&[0.85], &tail, None, tail.reference_area);
        tail.reference_area = 31.2155;
        let scaled = wing_compressibility_drag(&[0.85], &tail, None, 124.862);
        let ratio = scaled.compressibility_drag[0] / own.compressibility_drag[0];
        assert!((ratio - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_lift_lowers_crest_critical() {
        let cos = 25.0_f64.to_radians().cos();
        assert!(crest_critical_mach(0.1, 0.6, cos) < crest_critical_mach(0.1, 0.0, cos));
        assert!(crest_critical_mach(0.12, 0.0, cos) < crest_critical_mach(0.08, 0.0, cos));
    }
}
