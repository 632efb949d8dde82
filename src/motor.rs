//! Low-fidelity DC electric motor.
//!
//! The motor runs at a fixed efficiency; rotation rate, torque and current
//! follow in closed form from the supply voltage.

use serde::{Deserialize, Serialize};

use crate::atmosphere::require_positive;
use crate::error::{AeroError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorLoFid {
    /// Ohms
    pub resistance: f64,
    /// Amps
    pub no_load_current: f64,
    /// Kv in rad/s/V
    pub speed_constant: f64,
    pub gear_ratio: f64,
    pub gearbox_efficiency: f64,
    /// Amps; sets the gearbox loss folded into the no-load current
    pub expected_current: f64,
    pub motor_efficiency: f64,
}

/// Shaft speed and torque at each supply voltage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorSpeed {
    /// rad/s
    pub omega: Vec<f64>,
    /// N·m
    pub torque: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorCurrent {
    /// Amps, never negative
    pub current: Vec<f64>,
    /// Zero where no current flows
    pub efficiency: Vec<f64>,
    pub speed: MotorSpeed,
}

impl MotorLoFid {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("resistance", self.resistance),
            ("speed_constant", self.speed_constant),
            ("gear_ratio", self.gear_ratio),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AeroError::InvalidParameter {
                    name,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// No-load current including the gearbox loss at the expected current.
    pub fn effective_no_load_current(&self) -> f64 {
        self.no_load_current + self.expected_current * (1.0 - self.gearbox_efficiency)
    }

    /// Rotation rate and torque of the output shaft.
    ///
    /// # Arguments
    /// * `voltage` - Supply voltage column in volts
    ///
    /// # Errors
    /// `InvalidParameter` for a malformed motor, `InvalidValue` for a voltage
    /// at which the motor has no real operating point.
    pub fn omega(&self, voltage: &[f64]) -> Result<MotorSpeed> {
        self.validate()?;
        require_positive("voltage", voltage)?;

        let r = self.resistance;
        let io = self.effective_no_load_current();
        let kv = self.speed_constant / self.gear_ratio;
        let eta = self.motor_efficiency;

        let mut omega = Vec::with_capacity(voltage.len());
        let mut torque = Vec::with_capacity(voltage.len());
        for (row, &v) in voltage.iter().enumerate() {
            let discriminant = r * r * io * io - 2.0 * r * eta * io * v - 2.0 * r * io * v
                + eta * eta * v * v
                - 2.0 * eta * v * v
                + v * v;
            if discriminant < 0.0 {
                return Err(AeroError::InvalidValue {
                    field: "voltage",
                    row,
                    value: v,
                });
            }
            let w = kv * v / 2.0 + kv * discriminant.sqrt() / 2.0 - kv * r * io / 2.0
                + kv * eta * v / 2.0;
            omega.push(w);
            torque.push(((v - w / kv) / r - io) / kv);
        }

        Ok(MotorSpeed { omega, torque })
    }

    /// Current drawn and the resulting motor efficiency. The motor does not
    /// regenerate, so the current is clamped at zero.
    pub fn current(&self, voltage: &[f64]) -> Result<MotorCurrent> {
        let speed = self.omega(voltage)?;
        let io = self.effective_no_load_current();

        let current: Vec<f64> = voltage
            .iter()
            .zip(&speed.omega)
            .map(|(v, w)| {
                let i = (v - w * self.gear_ratio / self.speed_constant) / self.resistance;
                i.max(0.0)
            })
            .collect();

        let efficiency = current
            .iter()
            .zip(voltage)
            .map(|(&i, &v)| {
                if i > 0.0 {
                    (1.0 - io / i) * (1.0 - i * self.resistance / v)
                } else {
                    0.0
                }
            })
            .collect();

        Ok(MotorCurrent {
            current,
            efficiency,
            speed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motor() -> MotorLoFid {
        MotorLoFid {
            resistance: 0.008,
            no_load_current: 4.5,
            speed_constant: 5.0,
            gear_ratio: 1.0,
            gearbox_efficiency: 1.0,
            expected_current: 0.0,
            motor_efficiency: 0.95,
        }
    }

    #[test]
    fn test_omega_and_torque() {
        let speed = motor().omega(&[500.0]).unwrap();
        assert!((speed.omega[0] - 2496.295550859272).abs() < 1e-6);
        assert!((speed.torque[0] - 17.622245703638875).abs() < 1e-6);
    }

    #[test]
    fn test_current_recovers_motor_efficiency() {
        let geared = MotorLoFid {
            gear_ratio: 2.0,
            gearbox_efficiency: 0.98,
            expected_current: 100.0,
            ..motor()
        };
        let current = geared.current(&[500.0]).unwrap();
        assert!((current.current[0] - 135.60208369904103).abs() < 1e-6);
        assert!((current.efficiency[0] - 0.95).abs() < 1e-9);
        assert!((current.speed.omega[0] - 1247.2879583260192).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_bad_motor_and_voltage() {
        let broken = MotorLoFid {
            resistance: 0.0,
            ..motor()
        };
        assert!(broken.omega(&[500.0]).is_err());
        assert!(motor().omega(&[500.0, -1.0]).is_err());
    }

    #[test]
    fn test_no_real_operating_point() {
        let lossy = MotorLoFid {
            resistance: 0.05,
            no_load_current: 2.0,
            speed_constant: 50.0,
            motor_efficiency: 0.9,
            ..motor()
        };
        assert!(matches!(
            lossy.omega(&[12.0]).unwrap_err(),
            AeroError::InvalidValue { field: "voltage", row: 0, .. }
        ));
    }
}
