/// Physical constants and model coefficients used by the aerodynamic analysis

/// Gravitational acceleration in m/s²
pub const G_ACCEL_MPS2: f64 = 9.80665;

/// Specific gas constant for dry air in J/(kg·K)
pub const R_AIR: f64 = 287.0528742;

/// Ratio of specific heats for air
pub const GAMMA_AIR: f64 = 1.4;

/// Sutherland reference temperature (K)
pub const SUTHERLAND_T0: f64 = 273.15;

/// Dynamic viscosity of air at the Sutherland reference temperature (Pa·s)
pub const SUTHERLAND_MU0: f64 = 1.716e-5;

/// Sutherland's constant for air (K)
pub const SUTHERLAND_S: f64 = 110.4;

/// Constant in the compressible turbulent flat plate reference temperature
/// relation (K).
pub const REFERENCE_TEMPERATURE_OFFSET_K: f64 = 216.0;

/// Lift added by the fuselage, as a multiplier on the wings' lift.
///
/// Value: 1.14, an empirical carry-over factor for conventional tube-and-wing
/// transports with the wing mounted low on a circular fuselage.
pub const FUSELAGE_LIFT_CORRECTION: f64 = 1.14;

/// Pylon parasite drag as a fraction of the nacelle parasite drag
pub const PYLON_DRAG_FRACTION: f64 = 0.20;

/// Wetted area growth allowance applied before the excrescence correlation
pub const EXCRESCENCE_WETTED_AREA_FACTOR: f64 = 1.10;

/// ESDU 94044 figure 1 excrescence drag area fit, D/q = K (A + B·S + C·S²)
pub const ESDU_EXCRESCENCE_SCALE: f64 = 0.40;
pub const ESDU_EXCRESCENCE_A: f64 = 0.0184;
pub const ESDU_EXCRESCENCE_B: f64 = 0.000469;
pub const ESDU_EXCRESCENCE_C: f64 = -1.13e-7;

/// Crest-critical Mach number fit (M_cc·cos Λ) as a quadratic in the
/// sweep-corrected thickness ratio and lift coefficient.
///
/// Order: 1, tc, cl, tc², tc·cl, cl²
pub const CREST_CRITICAL_FIT: [f64; 6] = [
    0.922321524499352,
    -1.153885166170620,
    -0.304541067183461,
    0.332881324404729,
    0.467317361111105,
    0.087490431201549,
];

/// Shevell compressibility drag rise, ΔCD/cos³Λ = A (M/M_cc)^B
pub const SHEVELL_RISE_SCALE: f64 = 0.0019;
pub const SHEVELL_RISE_EXPONENT: f64 = 14.641;

/// Fuselage form factor switches to its supersonic branch above this Mach number
pub const FUSELAGE_FORM_FACTOR_MACH_LIMIT: f64 = 0.95;

/// Default wing area ratios applied when a wing does not specify them
pub const DEFAULT_WETTED_TO_REFERENCE: f64 = 2.0;
pub const DEFAULT_EXPOSED_TO_WETTED: f64 = 0.8;
pub const DEFAULT_AFFECTED_TO_WETTED: f64 = 0.6;

/// Minimum threshold for preventing division by zero in general calculations
pub const MIN_DIVISION_THRESHOLD: f64 = 1e-12;
