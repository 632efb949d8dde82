//! Drag breakdown of a vehicle over a flight-state batch.
//!
//! Each category is computed column-wise and kept in the breakdown so callers
//! can query any contributor. Maps are ordered by component tag.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::compressibility::{wing_compressibility_drag, CompressibilityDrag};
use crate::geometry::VehicleGeometry;
use crate::induced::{induced_drag, InducedDrag};
use crate::lift::LiftBreakdown;
use crate::miscellaneous::{miscellaneous_drag, MiscellaneousDrag};
use crate::parasite::{
    fuselage_parasite_drag, propulsor_parasite_drag, pylon_parasite_drag, wing_parasite_drag,
    ParasiteDrag, PYLON_TAG,
};
use crate::settings::Settings;
use crate::state::Freestream;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DragBreakdown {
    pub parasite: BTreeMap<String, ParasiteDrag>,
    pub parasite_total: Vec<f64>,
    pub induced: InducedDrag,
    pub compressible: BTreeMap<String, CompressibilityDrag>,
    pub compressible_total: Vec<f64>,
    pub miscellaneous: MiscellaneousDrag,
    pub coefficient_increment: Vec<f64>,
    /// Sum of every category before the trim correction
    pub untrimmed: Vec<f64>,
    pub trim: Vec<f64>,
    pub spoiler: Vec<f64>,
    pub total: Vec<f64>,
}

impl DragBreakdown {
    pub fn rows(&self) -> usize {
        self.total.len()
    }

    /// Row-wise sum of every category; equals `total` for a consistent breakdown.
    pub fn category_sum(&self) -> Vec<f64> {
        sum_columns(&[
            &self.compressible_total,
            &self.induced.total,
            &self.miscellaneous.total,
            &self.parasite_total,
            &self.coefficient_increment,
            &self.trim,
            &self.spoiler,
        ])
    }
}

fn sum_columns(columns: &[&[f64]]) -> Vec<f64> {
    let rows = columns.first().map_or(0, |c| c.len());
    (0..rows).map(|i| columns.iter().map(|c| c[i]).sum()).collect()
}

/// Evaluate every drag category for one batch.
///
/// # Arguments
/// * `freestream` - Batch freestream columns
/// * `lift` - Lift breakdown of the same batch
/// * `geometry` - Resolved vehicle geometry
/// * `settings` - Model factors and increments
pub fn drag_breakdown(
    freestream: &Freestream,
    lift: &LiftBreakdown,
    geometry: &VehicleGeometry,
    settings: &Settings,
) -> DragBreakdown {
    let rows = freestream.mach_number.len();
    let s_ref = geometry.reference_area;

    let mut parasite = BTreeMap::new();
    for wing in &geometry.wings {
        let drag =
            wing_parasite_drag(freestream, wing, s_ref, settings.wing_parasite_drag_form_factor);
        parasite.insert(wing.tag.clone(), drag);
    }
    for fuselage in &geometry.fuselages {
        let drag = fuselage_parasite_drag(
            freestream,
            fuselage,
            s_ref,
            settings.fuselage_parasite_drag_form_factor,
        );
        parasite.insert(fuselage.tag.clone(), drag);
    }
    let nacelles: Vec<ParasiteDrag> = geometry
        .propulsors
        .iter()
        .map(|p| propulsor_parasite_drag(freestream, p, s_ref))
        .collect();
    if !nacelles.is_empty() {
        parasite.insert(PYLON_TAG.to_string(), pylon_parasite_drag(&nacelles, rows));
    }
    for (propulsor, drag) in geometry.propulsors.iter().zip(nacelles) {
        parasite.insert(propulsor.tag.clone(), drag);
    }

    let parasite_columns: Vec<&[f64]> = parasite
        .values()
        .map(|p| p.parasite_drag_coefficient.as_slice())
        .collect();
    let parasite_total = if parasite_columns.is_empty() {
        vec![0.0; rows]
    } else {
        sum_columns(&parasite_columns)
    };

    let induced = induced_drag(
        &lift.total,
        &parasite_total,
        &geometry.main_wing,
        settings.oswald_efficiency_factor,
        settings.viscous_lift_dependent_drag_factor,
    );

    let mut compressible = BTreeMap::new();
    let mut compressible_total = vec![0.0; rows];
    for wing in &geometry.wings {
        let wing_lift = wing.main.then_some(lift.compressible_wings.as_slice());
        let drag = wing_compressibility_drag(&freestream.mach_number, wing, wing_lift, s_ref);
        for (total, cd) in compressible_total.iter_mut().zip(&drag.compressibility_drag) {
            *total += cd;
        }
        compressible.insert(wing.tag.clone(), drag);
    }

    let miscellaneous = miscellaneous_drag(rows, geometry.total_wetted_area(), s_ref);
    let coefficient_increment = vec![settings.drag_coefficient_increment; rows];

    let untrimmed = sum_columns(&[
        &parasite_total,
        &induced.total,
        &compressible_total,
        &miscellaneous.total,
        &coefficient_increment,
    ]);
    let trim: Vec<f64> = untrimmed
        .iter()
        .map(|cd| cd * (settings.trim_drag_correction_factor - 1.0))
        .collect();
    let spoiler = vec![settings.spoiler_drag_increment; rows];
    let total = sum_columns(&[&untrimmed, &trim, &spoiler]);

    DragBreakdown {
        parasite,
        parasite_total,
        induced,
        compressible,
        compressible_total,
        miscellaneous,
        coefficient_increment,
        untrimmed,
        trim,
        spoiler,
        total,
    }
}
