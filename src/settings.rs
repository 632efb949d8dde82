//! Analysis settings.
//!
//! Settings deserialize with per-field defaults, so a settings file only needs
//! the values it overrides.

use serde::{Deserialize, Serialize};

use crate::error::{AeroError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Multiplier applied to the untrimmed drag to account for trim drag
    pub trim_drag_correction_factor: f64,
    /// Thickness form factor constant in the wing parasite drag correlation
    pub wing_parasite_drag_form_factor: f64,
    /// Velocity-increment multiplier in the fuselage form factor
    pub fuselage_parasite_drag_form_factor: f64,
    /// Fixed Oswald efficiency; when absent it is estimated from parasite drag
    pub oswald_efficiency_factor: Option<f64>,
    /// Lift-dependent viscous drag factor used in the Oswald estimate
    pub viscous_lift_dependent_drag_factor: f64,
    /// Constant added to the untrimmed drag coefficient
    pub drag_coefficient_increment: f64,
    /// Constant added to the trimmed drag coefficient
    pub spoiler_drag_increment: f64,
    /// Symmetric clamp on the total lift coefficient; unbounded when absent
    pub maximum_lift_coefficient: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trim_drag_correction_factor: 1.02,
            wing_parasite_drag_form_factor: 1.1,
            fuselage_parasite_drag_form_factor: 2.3,
            oswald_efficiency_factor: None,
            viscous_lift_dependent_drag_factor: 0.38,
            drag_coefficient_increment: 0.0,
            spoiler_drag_increment: 0.0,
            maximum_lift_coefficient: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let invalid = |name: &'static str, value: f64| AeroError::InvalidParameter {
            name,
            reason: format!("must be finite and positive, got {value}"),
        };

        for (name, value) in [
            ("trim_drag_correction_factor", self.trim_drag_correction_factor),
            ("wing_parasite_drag_form_factor", self.wing_parasite_drag_form_factor),
            ("fuselage_parasite_drag_form_factor", self.fuselage_parasite_drag_form_factor),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(name, value));
            }
        }
        if !self.viscous_lift_dependent_drag_factor.is_finite()
            || self.viscous_lift_dependent_drag_factor < 0.0
        {
            return Err(AeroError::InvalidParameter {
                name: "viscous_lift_dependent_drag_factor",
                reason: format!(
                    "must be finite and non-negative, got {}",
                    self.viscous_lift_dependent_drag_factor
                ),
            });
        }
        if let Some(e) = self.oswald_efficiency_factor {
            if !e.is_finite() || e <= 0.0 {
                return Err(invalid("oswald_efficiency_factor", e));
            }
        }
        if let Some(cl_max) = self.maximum_lift_coefficient {
            if cl_max.is_nan() || cl_max <= 0.0 {
                return Err(invalid("maximum_lift_coefficient", cl_max));
            }
        }
        for (name, value) in [
            ("drag_coefficient_increment", self.drag_coefficient_increment),
            ("spoiler_drag_increment", self.spoiler_drag_increment),
        ] {
            if !value.is_finite() {
                return Err(AeroError::InvalidParameter {
                    name,
                    reason: format!("must be finite, got {value}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_settings_file() {
        let settings: Settings =
            serde_json::from_str(r#"{ "trim_drag_correction_factor": 1.0 }"#).unwrap();
        assert_eq!(settings.trim_drag_correction_factor, 1.0);
        assert_eq!(settings.fuselage_parasite_drag_form_factor, 2.3);
        assert_eq!(settings.oswald_efficiency_factor, None);
    }

    #[test]
    fn test_rejects_bad_values() {
        let settings = Settings {
            trim_drag_correction_factor: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            oswald_efficiency_factor: Some(-0.8),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
