//! Miscellaneous drag: excrescences and small-item allowances.

use serde::{Deserialize, Serialize};

use crate::constants::{
    ESDU_EXCRESCENCE_A, ESDU_EXCRESCENCE_B, ESDU_EXCRESCENCE_C, ESDU_EXCRESCENCE_SCALE,
    EXCRESCENCE_WETTED_AREA_FACTOR,
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MiscellaneousDrag {
    pub excrescence: Vec<f64>,
    /// Not modelled; always zero
    pub fuselage_base: Vec<f64>,
    /// Not modelled; always zero
    pub fuselage_upsweep: Vec<f64>,
    /// Not modelled; always zero
    pub nacelle_base: Vec<f64>,
    /// Not modelled; always zero
    pub control_gaps: Vec<f64>,
    pub total: Vec<f64>,
    /// Wetted area after the growth allowance (m²)
    pub total_wetted_area: f64,
    pub reference_area: f64,
}

/// Excrescence drag coefficient from the ESDU 94044 drag area fit.
///
/// # Arguments
/// * `total_wetted_area` - Sum of component wetted areas in m²
/// * `reference_area` - Vehicle reference area in m²
pub fn excrescence_drag_coefficient(total_wetted_area: f64, reference_area: f64) -> f64 {
    let s = EXCRESCENCE_WETTED_AREA_FACTOR * total_wetted_area;
    let drag_area = ESDU_EXCRESCENCE_SCALE
        * (ESDU_EXCRESCENCE_A + ESDU_EXCRESCENCE_B * s + ESDU_EXCRESCENCE_C * s * s);
    drag_area / reference_area
}

/// Miscellaneous drag for a batch. The value does not depend on flight condition.
pub fn miscellaneous_drag(
    rows: usize,
    total_wetted_area: f64,
    reference_area: f64,
) -> MiscellaneousDrag {
    let excrescence = vec![excrescence_drag_coefficient(total_wetted_area, reference_area); rows];
    let zeros = vec![0.0; rows];

    let mut drag = MiscellaneousDrag {
        excrescence,
        fuselage_base: zeros.clone(),
        fuselage_upsweep: zeros.clone(),
        nacelle_base: zeros.clone(),
        control_gaps: zeros,
        total: Vec::new(),
        total_wetted_area: EXCRESCENCE_WETTED_AREA_FACTOR * total_wetted_area,
        reference_area,
    };
    drag.total = (0..rows)
        .map(|i| {
            drag.excrescence[i]
                + drag.fuselage_base[i]
                + drag.fuselage_upsweep[i]
                + drag.nacelle_base[i]
                + drag.control_gaps[i]
        })
        .collect();
    drag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vehicle_excrescence() {
        // Wings at the 2x wetted convention, fuselage, two nacelles
        let wetted = 2.0 * (124.862 + 32.488 + 27.316) + 446.718 + 2.0 * 24.3703;
        let cd = excrescence_drag_coefficient(wetted, 124.862);
        assert!((cd - 0.00116061).abs() / 0.00116061 < 1e-4);
        assert!((cd - 1.16060992897e-3).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_across_rows() {
        let drag = miscellaneous_drag(5, 800.0, 124.862);
        assert_eq!(drag.total.len(), 5);
        assert!(drag.total.iter().all(|cd| *cd == drag.total[0]));
        assert!(drag.fuselage_base.iter().all(|cd| *cd == 0.0));
        assert_eq!(drag.total, drag.excrescence);
    }
}
