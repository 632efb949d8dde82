//! Fidelity Zero aerodynamic analysis.
//!
//! `FidelityZero` owns a vehicle description, the analysis settings and a
//! lift model. `initialize` checks and prepares everything that does not
//! depend on flight condition; `evaluate` then computes lift and drag for a
//! whole flight-state batch and records the breakdowns on the state.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::drag::drag_breakdown;
use crate::error::{AeroError, Result};
use crate::geometry::{Vehicle, VehicleGeometry};
use crate::lift::{correct_lift, LiftModel, VortexLattice};
use crate::miscellaneous::excrescence_drag_coefficient;
use crate::settings::Settings;
use crate::state::FlightState;

/// Total coefficient column of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub total: Vec<f64>,
}

/// Result of one evaluation, independent of the evaluated state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub lift: Coefficient,
    pub drag: Coefficient,
}

#[derive(Debug)]
pub struct FidelityZero {
    vehicle: Vehicle,
    settings: Settings,
    lift_model: Box<dyn LiftModel>,
    geometry: Option<VehicleGeometry>,
}

impl FidelityZero {
    /// Analysis of `vehicle` with default settings and a vortex lattice lift model.
    pub fn new(vehicle: Vehicle) -> Self {
        Self {
            vehicle,
            settings: Settings::default(),
            lift_model: Box::new(VortexLattice::default()),
            geometry: None,
        }
    }

    /// Replace the settings. The analysis must be initialized again.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self.geometry = None;
        self
    }

    /// Replace the lift model. The analysis must be initialized again.
    pub fn with_lift_model(mut self, lift_model: impl LiftModel + 'static) -> Self {
        self.lift_model = Box::new(lift_model);
        self.geometry = None;
        self
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn lift_model(&self) -> &dyn LiftModel {
        self.lift_model.as_ref()
    }

    /// Prepared geometry, once initialized.
    pub fn geometry(&self) -> Option<&VehicleGeometry> {
        self.geometry.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.geometry.is_some()
    }

    /// Validate settings and geometry, apply the wing area convention and
    /// train the lift model.
    ///
    /// Calling it again gives the same prepared state.
    ///
    /// # Errors
    /// `MissingGeometry` for the first absent attribute, `InvalidParameter`
    /// for bad settings or geometry values, `Singular` if a lattice cannot be
    /// solved.
    pub fn initialize(&mut self) -> Result<()> {
        self.geometry = None;
        self.settings.validate()?;
        self.vehicle.apply_area_convention();

        let geometry = self.vehicle.resolve()?;
        self.lift_model.train(&self.vehicle)?;

        info!(
            vehicle = %self.vehicle.tag,
            wings = geometry.wings.len(),
            fuselages = geometry.fuselages.len(),
            propulsors = geometry.propulsors.len(),
            reference_area = geometry.reference_area,
            excrescence_drag = excrescence_drag_coefficient(
                geometry.total_wetted_area(),
                geometry.reference_area
            ),
            "fidelity zero analysis initialized"
        );
        self.geometry = Some(geometry);
        Ok(())
    }

    /// Evaluate lift and drag for every row of `state`.
    ///
    /// Previous results on the state are replaced; the inputs are not
    /// modified, so evaluating twice gives identical results.
    ///
    /// # Errors
    /// `NotInitialized` before `initialize`, `LengthMismatch` if the state's
    /// columns were edited to different lengths or the lift model returns the
    /// wrong number of rows, `InvalidValue` naming the first coefficient
    /// that is not finite and its row.
    pub fn evaluate(&self, state: &mut FlightState) -> Result<EvaluationResult> {
        let geometry = self.geometry.as_ref().ok_or(AeroError::NotInitialized)?;
        check_shape(state)?;
        state.clear_results();

        let freestream = &state.freestream;
        let inviscid = self
            .lift_model
            .inviscid_lift(&state.aerodynamics.angle_of_attack)?;
        if inviscid.len() != state.len() {
            return Err(AeroError::LengthMismatch {
                field: "lift_coefficient",
                expected: state.len(),
                found: inviscid.len(),
            });
        }
        let lift = correct_lift(
            inviscid,
            &freestream.mach_number,
            self.settings.maximum_lift_coefficient,
        );
        let drag = drag_breakdown(freestream, &lift, geometry, &self.settings);

        let contributors: [(&'static str, &[f64]); 5] = [
            ("lift_coefficient", lift.total.as_slice()),
            ("parasite_drag", drag.parasite_total.as_slice()),
            ("induced_drag", drag.induced.total.as_slice()),
            ("compressibility_drag", drag.compressible_total.as_slice()),
            ("drag_coefficient", drag.total.as_slice()),
        ];
        for (field, column) in contributors {
            if let Some(row) = column.iter().position(|v| !v.is_finite()) {
                return Err(AeroError::InvalidValue {
                    field,
                    row,
                    value: column[row],
                });
            }
        }

        debug!(
            rows = state.len(),
            max_lift = lift.total.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            max_drag = drag.total.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            "evaluated flight state batch"
        );

        let result = EvaluationResult {
            lift: Coefficient {
                total: lift.total.clone(),
            },
            drag: Coefficient {
                total: drag.total.clone(),
            },
        };

        let aero = &mut state.aerodynamics;
        aero.lift_coefficient = Some(lift.total.clone());
        aero.drag_coefficient = Some(drag.total.clone());
        aero.lift_breakdown = Some(lift);
        aero.drag_breakdown = Some(drag);

        Ok(result)
    }

    /// Evaluate independent batches in parallel. Results keep the input order.
    pub fn evaluate_batches(&self, states: &mut [FlightState]) -> Vec<Result<EvaluationResult>> {
        states
            .par_iter_mut()
            .map(|state| self.evaluate(state))
            .collect()
    }
}

fn check_shape(state: &FlightState) -> Result<()> {
    let rows = state.len();
    if rows == 0 {
        return Err(AeroError::EmptyBatch);
    }
    let fs = &state.freestream;
    let columns: [(&'static str, usize); 6] = [
        ("density", fs.density.len()),
        ("dynamic_viscosity", fs.dynamic_viscosity.len()),
        ("temperature", fs.temperature.len()),
        ("pressure", fs.pressure.len()),
        ("reynolds_number", fs.reynolds_number.len()),
        ("angle_of_attack", state.aerodynamics.angle_of_attack.len()),
    ];
    match columns.iter().find(|(_, len)| *len != rows) {
        Some(&(field, found)) => Err(AeroError::LengthMismatch {
            field,
            expected: rows,
            found,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::Air;
    use crate::lift::LinearLift;
    use crate::regression::reference_vehicle;

    fn analysis() -> FidelityZero {
        let mut analysis = FidelityZero::new(reference_vehicle())
            .with_lift_model(LinearLift::new(0.2, 6.5));
        analysis.initialize().unwrap();
        analysis
    }

    fn batch(mach: &[f64]) -> FlightState {
        let n = mach.len();
        FlightState::builder(n)
            .mach_number(mach.to_vec())
            .density(vec![0.5; n])
            .dynamic_viscosity(vec![1.5e-5; n])
            .temperature(vec![230.0; n])
            .pressure(vec![3e4; n])
            .angle_of_attack(vec![0.03; n])
            .reynolds_from(Air::default())
            .build()
            .unwrap()
    }

    #[test]
    fn test_evaluate_before_initialize() {
        let analysis = FidelityZero::new(reference_vehicle());
        let err = analysis.evaluate(&mut batch(&[0.5])).unwrap_err();
        assert!(matches!(err, AeroError::NotInitialized));
    }

    #[test]
    fn test_evaluate_writes_results_back() {
        let analysis = analysis();
        let mut state = batch(&[0.4, 0.7]);
        let result = analysis.evaluate(&mut state).unwrap();

        let aero = &state.aerodynamics;
        assert_eq!(aero.lift_coefficient.as_ref(), Some(&result.lift.total));
        assert_eq!(aero.drag_coefficient.as_ref(), Some(&result.drag.total));
        let drag = aero.drag_breakdown.as_ref().unwrap();
        assert_eq!(drag.total, result.drag.total);
        assert!(drag.compressible.contains_key("main_wing"));
        assert!(drag.parasite.contains_key("fuselage"));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut analysis = analysis();
        let geometry = analysis.geometry().cloned();
        analysis.initialize().unwrap();
        assert_eq!(analysis.geometry().cloned(), geometry);
    }

    #[test]
    fn test_settings_change_requires_initialize() {
        let analysis = analysis().with_settings(Settings::default());
        assert!(!analysis.is_initialized());
    }

    /// Lift model that drops the last row of every batch.
    #[derive(Debug)]
    struct TruncatedLift(LinearLift);

    impl LiftModel for TruncatedLift {
        fn train(&mut self, _vehicle: &Vehicle) -> Result<()> {
            Ok(())
        }

        fn inviscid_lift(&self, angle_of_attack: &[f64]) -> Result<Vec<f64>> {
            let rows = angle_of_attack.len().saturating_sub(1);
            Ok(angle_of_attack[..rows].iter().map(|a| self.0.lift_at(*a)).collect())
        }
    }

    /// Lift model that returns a fixed value for every row.
    #[derive(Debug)]
    struct ConstantLift(f64);

    impl LiftModel for ConstantLift {
        fn train(&mut self, _vehicle: &Vehicle) -> Result<()> {
            Ok(())
        }

        fn inviscid_lift(&self, angle_of_attack: &[f64]) -> Result<Vec<f64>> {
            Ok(vec![self.0; angle_of_attack.len()])
        }
    }

    #[test]
    fn test_non_finite_parasite_drag_names_row() {
        let analysis = analysis();
        // Beyond M = 1/cos Λ the wing form factor has no real value
        let err = analysis.evaluate(&mut batch(&[0.5, 1.3])).unwrap_err();
        assert!(matches!(
            err,
            AeroError::InvalidValue { field: "parasite_drag", row: 1, .. }
        ));
    }

    #[test]
    fn test_non_finite_lift_is_named() {
        let mut analysis =
            FidelityZero::new(reference_vehicle()).with_lift_model(ConstantLift(f64::INFINITY));
        analysis.initialize().unwrap();
        let err = analysis.evaluate(&mut batch(&[0.4, 0.6])).unwrap_err();
        assert!(matches!(
            err,
            AeroError::InvalidValue { field: "lift_coefficient", row: 0, .. }
        ));
    }

    #[test]
    fn test_short_lift_column_is_rejected() {
        let mut analysis = FidelityZero::new(reference_vehicle())
            .with_lift_model(TruncatedLift(LinearLift::new(0.2, 6.5)));
        analysis.initialize().unwrap();
        let mut state = batch(&[0.3, 0.5, 0.7]);
        match analysis.evaluate(&mut state).unwrap_err() {
            AeroError::LengthMismatch {
                field,
                expected,
                found,
            } => {
                assert_eq!(field, "lift_coefficient");
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(state.aerodynamics.drag_breakdown.is_none());
    }

    #[test]
    fn test_edited_state_is_rejected() {
        let analysis = analysis();
        let mut state = batch(&[0.4, 0.7]);
        state.freestream.temperature.pop();
        assert!(matches!(
            analysis.evaluate(&mut state).unwrap_err(),
            AeroError::LengthMismatch { field: "temperature", .. }
        ));
    }

    #[test]
    fn test_evaluate_batches_matches_sequential() {
        let analysis = analysis();
        let mut states = vec![batch(&[0.3, 0.5]), batch(&[0.6]), batch(&[0.2, 0.7, 0.8])];
        let parallel = analysis.evaluate_batches(&mut states);
        for (state, result) in states.iter_mut().zip(parallel) {
            let sequential = analysis.evaluate(state).unwrap();
            assert_eq!(result.unwrap(), sequential);
        }
    }
}
