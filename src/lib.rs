//! # Fidelity Zero
//!
//! Batched lift and drag estimation for conventional fixed-wing aircraft in
//! conceptual design. A vehicle description and a batch of flight conditions
//! go in; total lift and drag coefficients and a full drag breakdown come out.
//!
//! ```no_run
//! use fidelity_zero::{regression, Air, FidelityZero};
//!
//! let mut analysis = FidelityZero::new(regression::reference_vehicle());
//! analysis.initialize()?;
//!
//! let mut state = regression::legacy_batch(Air::default())?;
//! let result = analysis.evaluate(&mut state)?;
//! println!("CD = {:?}", result.drag.total);
//! # Ok::<(), fidelity_zero::AeroError>(())
//! ```

// Re-export the main types and functions
pub use analysis::{Coefficient, EvaluationResult, FidelityZero};
pub use atmosphere::{Air, AtmosphereConditions, StandardAtmosphere};
pub use drag::DragBreakdown;
pub use error::{AeroError, Result};
pub use geometry::{Fuselage, Propulsor, Vehicle, Wing};
pub use lift::{LiftBreakdown, LiftModel, LinearLift, VortexLattice};
pub use motor::MotorLoFid;
pub use settings::Settings;
pub use state::{FlightState, FlightStateBuilder};

// Module declarations
pub mod analysis;
pub mod atmosphere;
pub mod compressibility;
pub mod constants;
pub mod drag;
pub mod error;
pub mod friction;
pub mod geometry;
pub mod induced;
pub mod io;
pub mod lift;
pub mod miscellaneous;
pub mod motor;
pub mod parasite;
pub mod regression;
pub mod settings;
pub mod state;
