//! Turbulent skin friction of a flat plate with compressibility and
//! reference-temperature corrections.

use crate::constants::REFERENCE_TEMPERATURE_OFFSET_K;

/// Skin friction at one flight condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinFriction {
    /// Corrected skin friction coefficient
    pub coefficient: f64,
    /// Ratio of freestream to reference temperature
    pub compressibility_factor: f64,
    /// Reynolds number correction at the reference temperature
    pub reynolds_factor: f64,
}

/// Compressible turbulent flat plate skin friction.
///
/// The incompressible Schlichting fit `0.455 / log10(Re)^2.58` is corrected
/// to the reference temperature of the boundary layer, with an adiabatic wall
/// (recovery factor folded into the 0.178 coefficient).
///
/// # Arguments
/// * `reynolds_number` - Reynolds number based on the component length
/// * `mach_number` - Freestream Mach number
/// * `temperature` - Freestream static temperature in Kelvin
pub fn compressible_turbulent_flat_plate(
    reynolds_number: f64,
    mach_number: f64,
    temperature: f64,
) -> SkinFriction {
    let cf_incompressible = 0.455 / reynolds_number.log10().powf(2.58);

    let m2 = mach_number * mach_number;
    let wall_temperature = temperature * (1.0 + 0.178 * m2);
    let reference_temperature =
        temperature * (1.0 + 0.035 * m2 + 0.45 * (wall_temperature / temperature - 1.0));
    let compressibility_factor = temperature / reference_temperature;

    let reference_reynolds = reynolds_number
        * (reference_temperature / temperature).powf(1.5)
        * ((reference_temperature + REFERENCE_TEMPERATURE_OFFSET_K)
            / (temperature + REFERENCE_TEMPERATURE_OFFSET_K));
    let reynolds_factor = (reynolds_number / reference_reynolds).powf(0.2);

    SkinFriction {
        coefficient: cf_incompressible * compressibility_factor * reynolds_factor,
        compressibility_factor,
        reynolds_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incompressible_limit() {
        let sf = compressible_turbulent_flat_plate(1e7, 0.0, 288.15);
        let expected = 0.455 / 7.0_f64.powf(2.58);
        assert!((sf.coefficient - expected).abs() < 1e-15);
        assert_eq!(sf.compressibility_factor, 1.0);
        assert_eq!(sf.reynolds_factor, 1.0);
    }

    #[test]
    fn test_compressibility_reduces_friction() {
        let low = compressible_turbulent_flat_plate(3e7, 0.2, 250.0);
        let high = compressible_turbulent_flat_plate(3e7, 0.8, 250.0);
        assert!(high.coefficient < low.coefficient);
        assert!(high.compressibility_factor < 1.0);
        assert!(high.reynolds_factor < 1.0);
    }

    #[test]
    fn test_friction_falls_with_reynolds_number() {
        let short = compressible_turbulent_flat_plate(1e6, 0.5, 250.0);
        let long = compressible_turbulent_flat_plate(1e8, 0.5, 250.0);
        assert!(long.coefficient < short.coefficient);
        assert!(long.coefficient > 0.0);
    }
}
