use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::PathBuf;
use tracing::{info, Level};

use fidelity_zero::regression::{self, legacy_references, result_column, REGRESSION_TOLERANCE};
use fidelity_zero::{
    io, Air, FidelityZero, FlightState, MotorLoFid, Settings, StandardAtmosphere, Vehicle,
    VortexLattice,
};

#[derive(Parser)]
#[command(name = "fidelity")]
#[command(version)]
#[command(about = "Conceptual-design lift and drag estimation", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate lift and drag over an angle of attack sweep at one Mach number
    Evaluate {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Mach number
        #[arg(short, long, default_value = "0.78")]
        mach: f64,

        #[command(flatten)]
        sweep: SweepArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Drag polars at several Mach numbers, evaluated in parallel
    Polar {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Mach numbers (comma separated)
        #[arg(short, long, value_delimiter = ',', default_value = "0.4,0.6,0.78")]
        mach: Vec<f64>,

        #[command(flatten)]
        sweep: SweepArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Check the reference vehicle against the stored regression values
    Regression {
        /// Relative tolerance
        #[arg(long, default_value_t = REGRESSION_TOLERANCE)]
        tolerance: f64,
    },

    /// Operating point of a low-fidelity electric motor
    Motor {
        /// Winding resistance (ohm)
        #[arg(long)]
        resistance: f64,

        /// No-load current (A)
        #[arg(long)]
        no_load_current: f64,

        /// Speed constant Kv (rad/s/V)
        #[arg(long)]
        speed_constant: f64,

        #[arg(long, default_value = "1.0")]
        gear_ratio: f64,

        #[arg(long, default_value = "1.0")]
        gearbox_efficiency: f64,

        /// Expected current (A)
        #[arg(long, default_value = "0.0")]
        expected_current: f64,

        #[arg(long, default_value = "0.95")]
        motor_efficiency: f64,

        /// Supply voltages (V, comma separated)
        #[arg(long, value_delimiter = ',', required = true)]
        voltage: Vec<f64>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },
}

#[derive(Args)]
struct AnalysisArgs {
    /// Vehicle file (JSON); the reference transport when omitted
    #[arg(long)]
    vehicle: Option<PathBuf>,

    /// Analysis settings file (JSON)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Lift model
    #[arg(long, default_value = "vortex-lattice")]
    lift_model: LiftModelChoice,
}

#[derive(Args)]
struct SweepArgs {
    /// Geopotential altitude (m)
    #[arg(short, long, default_value = "10668.0")]
    altitude: f64,

    /// First angle of attack (degrees)
    #[arg(long, default_value = "-4.0", allow_negative_numbers = true)]
    alpha_start: f64,

    /// Last angle of attack (degrees)
    #[arg(long, default_value = "10.0", allow_negative_numbers = true)]
    alpha_end: f64,

    /// Number of angles in the sweep
    #[arg(long, default_value = "15")]
    steps: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Table,
    /// Complete flight state including the drag breakdown, as JSON
    Full,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LiftModelChoice {
    VortexLattice,
    /// Linear polar of the legacy reference vehicle
    Reference,
}

#[derive(Debug, Serialize, Deserialize)]
struct PolarPoint {
    alpha_deg: f64,
    lift_coefficient: f64,
    drag_coefficient: f64,
    lift_to_drag: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Polar {
    mach: f64,
    altitude: f64,
    points: Vec<PolarPoint>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MotorPoint {
    voltage: f64,
    omega: f64,
    torque: f64,
    current: f64,
    efficiency: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match cli.command {
        Commands::Evaluate {
            analysis,
            mach,
            sweep,
            output,
        } => {
            let analysis = build_analysis(&analysis)?;
            let mut state = sweep_state(mach, &sweep)?;
            analysis.evaluate(&mut state)?;

            if let OutputFormat::Full = output {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                let polar = to_polar(&state, mach, sweep.altitude);
                display_polars(&[polar], output)?;
            }
        }

        Commands::Polar {
            analysis,
            mach,
            sweep,
            output,
        } => {
            let analysis = build_analysis(&analysis)?;
            let mut states = mach
                .iter()
                .map(|&m| sweep_state(m, &sweep))
                .collect::<Result<Vec<_>, _>>()?;

            for result in analysis.evaluate_batches(&mut states) {
                result?;
            }

            if let OutputFormat::Full = output {
                println!("{}", serde_json::to_string_pretty(&states)?);
            } else {
                let polars: Vec<Polar> = states
                    .iter()
                    .zip(&mach)
                    .map(|(state, &m)| to_polar(state, m, sweep.altitude))
                    .collect();
                display_polars(&polars, output)?;
            }
        }

        Commands::Regression { tolerance } => {
            run_regression(tolerance)?;
        }

        Commands::Motor {
            resistance,
            no_load_current,
            speed_constant,
            gear_ratio,
            gearbox_efficiency,
            expected_current,
            motor_efficiency,
            voltage,
            output,
        } => {
            let motor = MotorLoFid {
                resistance,
                no_load_current,
                speed_constant,
                gear_ratio,
                gearbox_efficiency,
                expected_current,
                motor_efficiency,
            };
            let current = motor.current(&voltage)?;
            let points: Vec<MotorPoint> = (0..voltage.len())
                .map(|i| MotorPoint {
                    voltage: voltage[i],
                    omega: current.speed.omega[i],
                    torque: current.speed.torque[i],
                    current: current.current[i],
                    efficiency: current.efficiency[i],
                })
                .collect();
            display_motor(&points, output)?;
        }
    }

    Ok(())
}

fn build_analysis(args: &AnalysisArgs) -> Result<FidelityZero, Box<dyn Error>> {
    let vehicle: Vehicle = match &args.vehicle {
        Some(path) => io::load(path)?,
        None => regression::reference_vehicle(),
    };
    let settings: Settings = match &args.settings {
        Some(path) => io::load(path)?,
        None => Settings::default(),
    };

    let analysis = FidelityZero::new(vehicle).with_settings(settings);
    let mut analysis = match args.lift_model {
        LiftModelChoice::VortexLattice => analysis.with_lift_model(VortexLattice::default()),
        LiftModelChoice::Reference => analysis.with_lift_model(regression::reference_lift_model()),
    };
    analysis.initialize()?;
    Ok(analysis)
}

/// Angle of attack sweep at one Mach number and altitude.
fn sweep_state(mach: f64, sweep: &SweepArgs) -> Result<FlightState, Box<dyn Error>> {
    let atmosphere = StandardAtmosphere::default();
    let conditions = atmosphere.at_altitude(sweep.altitude);
    let n = sweep.steps;
    let alpha = fidelity_zero::state::linspace(
        sweep.alpha_start.to_radians(),
        sweep.alpha_end.to_radians(),
        n,
    );
    info!(
        mach,
        altitude = sweep.altitude,
        density = conditions.density_kg_m3,
        "building sweep"
    );

    let state = FlightState::builder(n)
        .mach_number(vec![mach; n])
        .density(vec![conditions.density_kg_m3; n])
        .dynamic_viscosity(vec![conditions.dynamic_viscosity_pa_s; n])
        .temperature(vec![conditions.temperature_k; n])
        .pressure(vec![conditions.pressure_pa; n])
        .angle_of_attack(alpha)
        .reynolds_from(atmosphere.air)
        .build()?;
    Ok(state)
}

fn to_polar(state: &FlightState, mach: f64, altitude: f64) -> Polar {
    let aero = &state.aerodynamics;
    let lift = aero.lift_coefficient.as_deref().unwrap_or_default();
    let drag = aero.drag_coefficient.as_deref().unwrap_or_default();

    let points = aero
        .angle_of_attack
        .iter()
        .zip(lift.iter().zip(drag))
        .map(|(alpha, (&cl, &cd))| PolarPoint {
            alpha_deg: alpha.to_degrees(),
            lift_coefficient: cl,
            drag_coefficient: cd,
            lift_to_drag: cl / cd,
        })
        .collect();

    Polar {
        mach,
        altitude,
        points,
    }
}

fn display_polars(polars: &[Polar], format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json | OutputFormat::Full => {
            println!("{}", serde_json::to_string_pretty(polars)?);
        }

        OutputFormat::Csv => {
            println!("mach,altitude,alpha_deg,cl,cd,l_over_d");
            for polar in polars {
                for p in &polar.points {
                    println!(
                        "{:.4},{:.1},{:.3},{:.6},{:.6},{:.3}",
                        polar.mach,
                        polar.altitude,
                        p.alpha_deg,
                        p.lift_coefficient,
                        p.drag_coefficient,
                        p.lift_to_drag
                    );
                }
            }
        }

        OutputFormat::Table => {
            for polar in polars {
                println!("╔════════════════════════════════════════╗");
                println!("║         DRAG POLAR                     ║");
                println!("║ Mach:              {:>8.3}            ║", polar.mach);
                println!("║ Altitude:          {:>8.1} m          ║", polar.altitude);
                println!("╚════════════════════════════════════════╝");
                println!("┌──────────┬──────────┬──────────┬──────────┐");
                println!("│ α (deg)  │    CL    │    CD    │   L/D    │");
                println!("├──────────┼──────────┼──────────┼──────────┤");
                for p in &polar.points {
                    println!(
                        "│ {:>8.2} │ {:>8.4} │ {:>8.5} │ {:>8.2} │",
                        p.alpha_deg, p.lift_coefficient, p.drag_coefficient, p.lift_to_drag
                    );
                }
                println!("└──────────┴──────────┴──────────┴──────────┘");
            }
        }
    }

    Ok(())
}

fn run_regression(tolerance: f64) -> Result<(), Box<dyn Error>> {
    let mut analysis = FidelityZero::new(regression::reference_vehicle())
        .with_lift_model(regression::reference_lift_model());
    analysis.initialize()?;

    let mut state = regression::legacy_batch(Air::default())?;
    analysis.evaluate(&mut state)?;

    let references = legacy_references();
    println!("╔════════════════════════════════════════╗");
    println!("║         REGRESSION CHECK               ║");
    println!("╠════════════════════════════════════════╣");
    for contributor in references.contributors() {
        let expected = references.get(contributor).unwrap_or_default();
        let actual = result_column(&state, contributor)?;
        let worst = expected
            .iter()
            .zip(actual)
            .map(|(e, a)| if *e == 0.0 { a.abs() } else { ((a - e) / e).abs() })
            .fold(0.0, f64::max);
        println!("║ {:<12} max rel. error {:>10.3e} ║", contributor, worst);
    }
    println!("╚════════════════════════════════════════╝");

    regression::check(&state, &references, tolerance)?;
    println!("All contributors within {tolerance:e}");
    Ok(())
}

fn display_motor(points: &[MotorPoint], format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json | OutputFormat::Full => {
            println!("{}", serde_json::to_string_pretty(points)?);
        }

        OutputFormat::Csv => {
            println!("voltage,omega,torque,current,efficiency");
            for p in points {
                println!(
                    "{:.3},{:.3},{:.4},{:.3},{:.4}",
                    p.voltage, p.omega, p.torque, p.current, p.efficiency
                );
            }
        }

        OutputFormat::Table => {
            println!("┌──────────┬────────────┬──────────┬──────────┬──────────┐");
            println!("│ Volt (V) │ ω (rad/s)  │ Q (N·m)  │ I (A)    │   η      │");
            println!("├──────────┼────────────┼──────────┼──────────┼──────────┤");
            for p in points {
                println!(
                    "│ {:>8.2} │ {:>10.2} │ {:>8.3} │ {:>8.2} │ {:>8.4} │",
                    p.voltage, p.omega, p.torque, p.current, p.efficiency
                );
            }
            println!("└──────────┴────────────┴──────────┴──────────┴──────────┘");
        }
    }

    Ok(())
}
