use rand::rngs::StdRng;
use rand::SeedableRng;

use fidelity_zero::regression::{
    check, legacy_batch, legacy_references, random_batch, reference_lift_model,
    reference_vehicle, ReferenceColumns, RegressionFailure, REGRESSION_TOLERANCE,
};
use fidelity_zero::{AeroError, Air, FidelityZero, FlightState, LiftModel, Settings, VortexLattice};

fn reference_analysis() -> FidelityZero {
    let mut analysis =
        FidelityZero::new(reference_vehicle()).with_lift_model(reference_lift_model());
    analysis.initialize().unwrap();
    analysis
}

fn evaluated_legacy_batch() -> FlightState {
    let mut state = legacy_batch(Air::default()).unwrap();
    reference_analysis().evaluate(&mut state).unwrap();
    state
}

#[test]
fn test_legacy_regression() {
    let state = evaluated_legacy_batch();
    check(&state, &legacy_references(), REGRESSION_TOLERANCE).unwrap();
}

#[test]
fn test_component_breakdown_regression() {
    let state = evaluated_legacy_batch();
    let references = ReferenceColumns::new()
        .with(
            "cd_p_total",
            [
                1.4993908560e-02, 1.6381031645e-02, 2.5714577738e-02, 1.5951019572e-02,
                1.7193798723e-02, 1.3773911931e-02, 1.6691816966e-02, 2.0938526650e-02,
                1.6484837278e-02, 1.5013827652e-02, 1.6860590928e-02,
            ],
        )
        .with(
            "cd_c_total",
            [
                4.7919380631e-04, 4.2478437011e-08, 2.4454361944e-22, 4.1905107206e-09,
                4.8393162413e-04, 6.4415170169e-05, 2.4446771563e-09, 4.4115774913e-11,
                7.9850000520e-05, 2.2194977737e-03, 6.8526556506e-14,
            ],
        )
        .with(
            "cd_p_horizontal_stabilizer",
            [
                1.1390013323e-03, 1.1973934426e-03, 1.8495815710e-03, 1.1628408736e-03,
                1.2872705032e-03, 1.0187689080e-03, 1.2132482430e-03, 1.5140437080e-03,
                1.2096919738e-03, 1.1166398275e-03, 1.2220031910e-03,
            ],
        )
        .with(
            "cd_p_vertical_stabilizer",
            [
                1.1852790405e-03, 1.2228393770e-03, 1.9503856013e-03, 1.1834191942e-03,
                1.3386763018e-03, 1.0322439450e-03, 1.2374534997e-03, 1.5704052941e-03,
                1.2384450770e-03, 1.1427828553e-03, 1.2455880803e-03,
            ],
        )
        .with(
            "cd_p_turbofan",
            [
                9.7607662877e-04, 1.1125409037e-03, 1.8120349888e-03, 1.0830271133e-03,
                1.1479362971e-03, 9.1951621896e-04, 1.1379741903e-03, 1.4516496315e-03,
                1.1174921062e-03, 1.0024934842e-03, 1.1514628135e-03,
            ],
        )
        .with(
            "cd_p_pylon",
            [
                1.9521532575e-04, 2.2250818074e-04, 3.6240699777e-04, 2.1660542266e-04,
                2.2958725941e-04, 1.8390324379e-04, 2.2759483807e-04, 2.9032992630e-04,
                2.2349842124e-04, 2.0049869684e-04, 2.3029256270e-04,
            ],
        );
    check(&state, &references, REGRESSION_TOLERANCE).unwrap();

    let drag = state.aerodynamics.drag_breakdown.as_ref().unwrap();
    let tail = &drag.compressible["horizontal_stabilizer"].compressibility_drag;
    let fin = &drag.compressible["vertical_stabilizer"].compressibility_drag;
    assert!((tail[0] - 1.8929076963e-04).abs() / 1.8929076963e-04 < REGRESSION_TOLERANCE);
    assert!((fin[0] - 2.8990095208e-04).abs() / 2.8990095208e-04 < REGRESSION_TOLERANCE);
}

#[test]
fn test_legacy_totals_at_checkpoints() {
    let state = evaluated_legacy_batch();
    let drag = state.aerodynamics.drag_breakdown.as_ref().unwrap();
    let relative = |actual: f64, expected: f64| (actual - expected).abs() / expected;

    assert!(relative(drag.total[0], 0.2595146) < REGRESSION_TOLERANCE);
    assert!(relative(drag.total[4], 0.01927301) < REGRESSION_TOLERANCE);
    for cd in &drag.miscellaneous.total {
        assert!(relative(*cd, 0.00116061) < REGRESSION_TOLERANCE);
    }
}

#[test]
fn test_total_is_sum_of_categories() {
    let settings = Settings {
        drag_coefficient_increment: 0.0005,
        spoiler_drag_increment: 0.003,
        ..Default::default()
    };
    let mut analysis = FidelityZero::new(reference_vehicle())
        .with_settings(settings)
        .with_lift_model(reference_lift_model());
    analysis.initialize().unwrap();

    let mut state = legacy_batch(Air::default()).unwrap();
    analysis.evaluate(&mut state).unwrap();
    let drag = state.aerodynamics.drag_breakdown.as_ref().unwrap();
    for (total, sum) in drag.total.iter().zip(drag.category_sum()) {
        assert!((total - sum).abs() < 1e-9);
    }
}

#[test]
fn test_four_category_sum_without_trim() {
    let settings = Settings {
        trim_drag_correction_factor: 1.0,
        ..Default::default()
    };
    let mut analysis = FidelityZero::new(reference_vehicle())
        .with_settings(settings)
        .with_lift_model(reference_lift_model());
    analysis.initialize().unwrap();

    let mut state = legacy_batch(Air::default()).unwrap();
    let result = analysis.evaluate(&mut state).unwrap();
    let drag = state.aerodynamics.drag_breakdown.as_ref().unwrap();
    for i in 0..state.len() {
        let sum = drag.compressible_total[i]
            + drag.induced.total[i]
            + drag.miscellaneous.total[i]
            + drag.parasite_total[i];
        assert!((result.drag.total[i] - sum).abs() < 1e-9);
    }
}

#[test]
fn test_evaluation_is_idempotent() {
    let analysis = reference_analysis();
    let mut state = legacy_batch(Air::default()).unwrap();
    let first = analysis.evaluate(&mut state).unwrap();
    let breakdown = state.aerodynamics.drag_breakdown.clone();
    let second = analysis.evaluate(&mut state).unwrap();

    assert_eq!(first, second);
    assert_eq!(breakdown, state.aerodynamics.drag_breakdown);
}

#[test]
fn test_breakdown_properties() {
    let state = evaluated_legacy_batch();
    let drag = state.aerodynamics.drag_breakdown.as_ref().unwrap();

    let misc = &drag.miscellaneous.total;
    assert!(misc.iter().all(|cd| *cd == misc[0]));

    for component in drag.parasite.values() {
        assert!(component.parasite_drag_coefficient.iter().all(|cd| *cd >= 0.0));
    }
    for wing in drag.compressible.values() {
        assert!(wing.compressibility_drag.iter().all(|cd| *cd >= 0.0));
    }

    // Row 2 flies at M 0.05
    let main_wing = &drag.compressible["main_wing"].compressibility_drag;
    assert!(main_wing[2] < 1e-20);
}

#[test]
fn test_compressibility_drag_rises_with_mach() {
    let n = 18;
    let mach: Vec<f64> = (1..=n).map(|i| 0.05 * i as f64).collect();
    let mut state = FlightState::builder(n)
        .mach_number(mach)
        .density(vec![0.4; n])
        .dynamic_viscosity(vec![1.45e-5; n])
        .temperature(vec![220.0; n])
        .pressure(vec![25000.0; n])
        .angle_of_attack(vec![0.02; n])
        .reynolds_from(Air::default())
        .build()
        .unwrap();
    reference_analysis().evaluate(&mut state).unwrap();

    let drag = state.aerodynamics.drag_breakdown.as_ref().unwrap();
    for wing in drag.compressible.values() {
        for pair in wing.compressibility_drag.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }
}

#[test]
fn test_random_batches_in_parallel() {
    let analysis = reference_analysis();
    let mut states: Vec<FlightState> = (0..4)
        .map(|seed| random_batch(&mut StdRng::seed_from_u64(seed), 11, Air::default()).unwrap())
        .collect();

    let results = analysis.evaluate_batches(&mut states);
    for (state, result) in states.iter().zip(results) {
        let result = result.unwrap();
        assert_eq!(result.drag.total.len(), 11);
        assert_eq!(state.aerodynamics.drag_coefficient.as_ref(), Some(&result.drag.total));
        assert!(result.drag.total.iter().all(|cd| cd.is_finite() && *cd > 0.0));
    }
}

#[test]
fn test_regression_failure_names_contributor() {
    let state = evaluated_legacy_batch();
    let mut wing = legacy_references().get("cd_p_wing").unwrap().to_vec();
    wing[5] *= 1.001;
    let references = ReferenceColumns::new().with("cd_p_wing", wing);

    match check(&state, &references, REGRESSION_TOLERANCE) {
        Err(RegressionFailure::Mismatch { contributor, row, .. }) => {
            assert_eq!(contributor, "cd_p_wing");
            assert_eq!(row, 5);
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    let references = ReferenceColumns::new().with("cd_p_winglet", [0.0; 11]);
    assert!(matches!(
        check(&state, &references, REGRESSION_TOLERANCE),
        Err(RegressionFailure::UnknownContributor(_))
    ));
}

#[test]
fn test_missing_geometry_is_reported_at_initialize() {
    let mut vehicle = reference_vehicle();
    vehicle.fuselages[0].effective_diameter = None;
    let err = FidelityZero::new(vehicle).initialize().unwrap_err();
    match err {
        AeroError::MissingGeometry {
            component,
            attribute,
        } => {
            assert_eq!(component, "fuselage");
            assert_eq!(attribute, "effective_diameter");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_vortex_lattice_polar_of_reference_vehicle() {
    let mut model = VortexLattice::default();
    model.train(&reference_vehicle()).unwrap();
    let polar = model.polar().unwrap();
    assert!(polar.lift_curve_slope > 6.0 && polar.lift_curve_slope < 7.0);
    assert!(polar.zero_lift_coefficient > 0.1 && polar.zero_lift_coefficient < 0.2);

    let mut analysis = FidelityZero::new(reference_vehicle());
    analysis.initialize().unwrap();
    let mut state = legacy_batch(Air::default()).unwrap();
    let result = analysis.evaluate(&mut state).unwrap();
    assert!(result.lift.total.iter().all(|cl| cl.is_finite()));
}
