//! Lift of the vehicle.
//!
//! A `LiftModel` supplies the inviscid lift of the wings as a function of
//! angle of attack. It is trained once per vehicle; evaluation then applies
//! the compressibility and fuselage corrections column-wise.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use tracing::debug;

use crate::constants::{FUSELAGE_LIFT_CORRECTION, MIN_DIVISION_THRESHOLD};
use crate::error::{AeroError, Result};
use crate::geometry::{Vehicle, Wing};

/// Smallest compressibility factor β; caps the correction near Mach 1 at 10.
const MIN_COMPRESSIBILITY_BETA: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LiftBreakdown {
    pub inviscid_wings: Vec<f64>,
    pub compressible_wings: Vec<f64>,
    pub total: Vec<f64>,
}

/// Inviscid lift surrogate of a vehicle's wings.
pub trait LiftModel: Send + Sync + fmt::Debug {
    /// Fit the model to a vehicle. Calling it again refits from scratch.
    fn train(&mut self, vehicle: &Vehicle) -> Result<()>;

    /// Inviscid wings lift coefficient, referenced to the vehicle area, for
    /// each angle of attack (radians).
    fn inviscid_lift(&self, angle_of_attack: &[f64]) -> Result<Vec<f64>>;
}

/// Lift linear in angle of attack, `CL = CL0 + CLα·α`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearLift {
    pub zero_lift_coefficient: f64,
    /// Per radian
    pub lift_curve_slope: f64,
}

impl LinearLift {
    pub fn new(zero_lift_coefficient: f64, lift_curve_slope: f64) -> Self {
        Self {
            zero_lift_coefficient,
            lift_curve_slope,
        }
    }

    pub fn lift_at(&self, angle_of_attack: f64) -> f64 {
        self.zero_lift_coefficient + self.lift_curve_slope * angle_of_attack
    }

    /// Least-squares line through `(angle, lift)` samples.
    pub fn fit(angles: &[f64], lifts: &[f64]) -> Result<Self> {
        let n = angles.len() as f64;
        if angles.len() < 2 || angles.len() != lifts.len() {
            return Err(AeroError::InvalidParameter {
                name: "training_angles",
                reason: "a linear fit needs at least two samples".to_string(),
            });
        }
        let mean_a = angles.iter().sum::<f64>() / n;
        let mean_l = lifts.iter().sum::<f64>() / n;
        let sxx: f64 = angles.iter().map(|a| (a - mean_a).powi(2)).sum();
        let sxy: f64 = angles
            .iter()
            .zip(lifts)
            .map(|(a, l)| (a - mean_a) * (l - mean_l))
            .sum();
        if sxx < MIN_DIVISION_THRESHOLD {
            return Err(AeroError::InvalidParameter {
                name: "training_angles",
                reason: "training angles must not all be equal".to_string(),
            });
        }
        let slope = sxy / sxx;
        Ok(Self::new(mean_l - slope * mean_a, slope))
    }
}

impl LiftModel for LinearLift {
    /// A linear surrogate is already fitted; training leaves it unchanged.
    fn train(&mut self, _vehicle: &Vehicle) -> Result<()> {
        Ok(())
    }

    fn inviscid_lift(&self, angle_of_attack: &[f64]) -> Result<Vec<f64>> {
        Ok(angle_of_attack.iter().map(|&a| self.lift_at(a)).collect())
    }
}

/// Weissinger vortex lattice: one spanwise row of horseshoe vortices per
/// lifting wing, bound on the quarter-chord line with control points on the
/// three-quarter-chord line. Vertical wings carry no lift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VortexLattice {
    pub panels_per_semispan: usize,
    /// Degrees
    pub training_angles: Vec<f64>,
    #[serde(skip)]
    polar: Option<LinearLift>,
}

impl Default for VortexLattice {
    fn default() -> Self {
        Self {
            panels_per_semispan: 50,
            training_angles: vec![-10.0, -5.0, 0.0, 5.0, 10.0],
            polar: None,
        }
    }
}

impl VortexLattice {
    pub fn new(panels_per_semispan: usize, training_angles: Vec<f64>) -> Self {
        Self {
            panels_per_semispan,
            training_angles,
            polar: None,
        }
    }

    /// Fitted polar, once trained.
    pub fn polar(&self) -> Option<LinearLift> {
        self.polar
    }
}

impl LiftModel for VortexLattice {
    fn train(&mut self, vehicle: &Vehicle) -> Result<()> {
        if self.panels_per_semispan == 0 {
            return Err(AeroError::InvalidParameter {
                name: "panels_per_semispan",
                reason: "must be at least 1".to_string(),
            });
        }
        let reference_area = vehicle
            .reference_area
            .ok_or_else(|| AeroError::missing(&vehicle.tag, "reference_area"))?;
        let angles: Vec<f64> = self.training_angles.iter().map(|a| a.to_radians()).collect();

        let mut lifts = vec![0.0; angles.len()];
        for wing in vehicle.wings.iter().filter(|w| !w.vertical) {
            let panels = WingLattice::new(wing, self.panels_per_semispan)?;
            let wing_lift = panels.lift_coefficients(&angles)?;
            for (total, cl) in lifts.iter_mut().zip(wing_lift) {
                *total += cl * panels.area / reference_area;
            }
        }

        let polar = LinearLift::fit(&angles, &lifts)?;
        debug!(
            zero_lift = polar.zero_lift_coefficient,
            slope = polar.lift_curve_slope,
            "vortex lattice polar trained"
        );
        self.polar = Some(polar);
        Ok(())
    }

    fn inviscid_lift(&self, angle_of_attack: &[f64]) -> Result<Vec<f64>> {
        self.polar
            .ok_or(AeroError::NotInitialized)?
            .inviscid_lift(angle_of_attack)
    }
}

/// Horseshoe layout of one wing.
struct WingLattice<'a> {
    tag: &'a str,
    area: f64,
    panel_width: f64,
    symmetric: bool,
    /// Control point (x, y) and local twist per panel
    control_points: Vec<(f64, f64, f64)>,
    /// Bound vortex end points per panel
    bound_vortices: Vec<((f64, f64), (f64, f64))>,
}

impl<'a> WingLattice<'a> {
    fn new(wing: &'a Wing, panels: usize) -> Result<Self> {
        let tag = wing.tag.as_str();
        let get = |attribute: &'static str, value: Option<f64>| {
            value.ok_or_else(|| AeroError::missing(tag, attribute))
        };
        let area = get("areas.reference", wing.areas.reference)?;
        let span = get("projected_span", wing.projected_span)?;
        let root_chord = get("chords.root", wing.chords.root)?;
        let tip_chord = get("chords.tip", wing.chords.tip)?;
        let tan_sweep = get("quarter_chord_sweep_deg", wing.quarter_chord_sweep_deg)?
            .to_radians()
            .tan();
        let root_twist = wing.twists.root_deg.to_radians();
        let tip_twist = wing.twists.tip_deg.to_radians();

        // Asymmetric wings are modelled as a single panel row over the full span
        let semispan = if wing.symmetric { span / 2.0 } else { span };
        let dy = semispan / panels as f64;

        let control_points = (0..panels)
            .map(|j| {
                let y = (j as f64 + 0.5) * dy;
                let eta = y / semispan;
                let chord = root_chord + (tip_chord - root_chord) * eta;
                let twist = root_twist + (tip_twist - root_twist) * eta;
                (y * tan_sweep + 0.5 * chord, y, twist)
            })
            .collect();
        let bound_vortices = (0..panels)
            .map(|j| {
                let ya = j as f64 * dy;
                let yb = (j + 1) as f64 * dy;
                ((ya * tan_sweep, ya), (yb * tan_sweep, yb))
            })
            .collect();

        Ok(Self {
            tag,
            area,
            panel_width: dy,
            symmetric: wing.symmetric,
            control_points,
            bound_vortices,
        })
    }

    fn influence_matrix(&self) -> DMatrix<f64> {
        let n = self.control_points.len();
        DMatrix::from_fn(n, n, |i, j| {
            let (x, y, _) = self.control_points[i];
            let ((xa, ya), (xb, yb)) = self.bound_vortices[j];
            let mut w = horseshoe_downwash(x, y, xa, ya, xb, yb);
            if self.symmetric {
                w += horseshoe_downwash(x, y, xb, -yb, xa, -ya);
            }
            w
        })
    }

    /// Wing lift coefficient, on the wing's own area, at each angle (radians).
    fn lift_coefficients(&self, angles: &[f64]) -> Result<Vec<f64>> {
        let lu = self.influence_matrix().lu();
        let halves = if self.symmetric { 2.0 } else { 1.0 };

        angles
            .iter()
            .map(|alpha| {
                let rhs = DVector::from_iterator(
                    self.control_points.len(),
                    self.control_points.iter().map(|(_, _, twist)| -(alpha + twist).sin()),
                );
                let gamma = lu
                    .solve(&rhs)
                    .ok_or_else(|| AeroError::Singular(self.tag.to_string()))?;
                Ok(2.0 * halves * gamma.sum() * self.panel_width / self.area)
            })
            .collect()
    }
}

/// Normal velocity at (x, y) induced by a unit-strength horseshoe vortex with
/// bound segment A→B and trailing legs to +x infinity.
fn horseshoe_downwash(x: f64, y: f64, xa: f64, ya: f64, xb: f64, yb: f64) -> f64 {
    let ra = ((x - xa).powi(2) + (y - ya).powi(2)).sqrt();
    let rb = ((x - xb).powi(2) + (y - yb).powi(2)).sqrt();

    let denominator = (x - xa) * (y - yb) - (x - xb) * (y - ya);
    let bound = if denominator.abs() > MIN_DIVISION_THRESHOLD {
        (((xb - xa) * (x - xa) + (yb - ya) * (y - ya)) / ra
            - ((xb - xa) * (x - xb) + (yb - ya) * (y - yb)) / rb)
            / denominator
    } else {
        0.0
    };
    let leg_a = (1.0 + (x - xa) / ra) / (ya - y);
    let leg_b = -(1.0 + (x - xb) / rb) / (yb - y);

    (bound + leg_a + leg_b) / (4.0 * PI)
}

/// Apply the compressibility and fuselage corrections to inviscid lift.
///
/// # Arguments
/// * `inviscid_wings` - Inviscid wings lift column
/// * `mach_number` - Freestream Mach column
/// * `maximum_lift_coefficient` - Symmetric clamp on the total, if any
pub fn correct_lift(
    inviscid_wings: Vec<f64>,
    mach_number: &[f64],
    maximum_lift_coefficient: Option<f64>,
) -> LiftBreakdown {
    let compressible_wings: Vec<f64> = inviscid_wings
        .iter()
        .zip(mach_number)
        .map(|(cl, m)| cl / compressibility_beta(*m))
        .collect();

    let total = compressible_wings
        .iter()
        .map(|cl| {
            let cl = cl * FUSELAGE_LIFT_CORRECTION;
            match maximum_lift_coefficient {
                Some(cl_max) => cl.clamp(-cl_max, cl_max),
                None => cl,
            }
        })
        .collect();

    LiftBreakdown {
        inviscid_wings,
        compressible_wings,
        total,
    }
}

/// Prandtl-Glauert factor below Mach 1, Ackeret factor above it.
fn compressibility_beta(mach: f64) -> f64 {
    (1.0 - mach * mach).abs().sqrt().max(MIN_COMPRESSIBILITY_BETA)
}
