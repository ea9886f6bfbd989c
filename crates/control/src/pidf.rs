//! PIDF (Proportional-Integral-Derivative-Feedforward) Controller
//!
//! A closed-loop controller with anti-windup, output saturation and optional
//! continuous (circular) input, used for both the drive velocity loop and the
//! turning angle loop of a swerve module.

use serde::{Deserialize, Serialize};
use swerve_core::FeedbackController;

/// Configuration for a PIDF controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidfConfig {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
    /// Derivative gain
    pub kd: f64,
    /// Feedforward gain (applied to the setpoint)
    pub kf: f64,
    /// Integral zone: only accumulate integral when |error| < i_zone (None = always)
    pub i_zone: Option<f64>,
    /// Maximum integral accumulator magnitude (anti-windup)
    pub i_max: f64,
    /// Minimum output value
    pub output_min: f64,
    /// Maximum output value
    pub output_max: f64,
    /// Loop period used by `calculate` (s)
    pub period: f64,
    /// Error magnitude considered on target
    pub tolerance: f64,
    /// Circular input bounds [min, max]
    pub continuous_input: Option<[f64; 2]>,
}

impl Default for PidfConfig {
    fn default() -> Self {
        Self {
            kp: 0.0,
            ki: 0.0,
            kd: 0.0,
            kf: 0.0,
            i_zone: None,
            i_max: f64::MAX,
            output_min: f64::NEG_INFINITY,
            output_max: f64::INFINITY,
            period: 0.02,
            tolerance: 0.05,
            continuous_input: None,
        }
    }
}

impl PidfConfig {
    /// Create a P-only controller
    pub fn p(kp: f64) -> Self {
        Self { kp, ..Default::default() }
    }

    /// Create a PI controller
    pub fn pi(kp: f64, ki: f64) -> Self {
        Self { kp, ki, ..Default::default() }
    }

    /// Create a PID controller
    pub fn pid(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd, ..Default::default() }
    }

    /// Create a PIDF controller with all gains
    pub fn pidf(kp: f64, ki: f64, kd: f64, kf: f64) -> Self {
        Self { kp, ki, kd, kf, ..Default::default() }
    }

    /// Set output limits
    pub fn with_limits(mut self, min: f64, max: f64) -> Self {
        self.output_min = min;
        self.output_max = max;
        self
    }

    /// Set integral anti-windup limit
    pub fn with_i_max(mut self, i_max: f64) -> Self {
        self.i_max = i_max;
        self
    }

    /// Set integral zone
    pub fn with_i_zone(mut self, i_zone: f64) -> Self {
        self.i_zone = Some(i_zone);
        self
    }

    /// Set the loop period used by `calculate`
    pub fn with_period(mut self, period: f64) -> Self {
        self.period = period;
        self
    }

    /// Set the on-target tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Treat inputs as circular over [min, max]
    pub fn with_continuous_input(mut self, min: f64, max: f64) -> Self {
        self.continuous_input = Some([min, max]);
        self
    }

    /// Check gains and limits for values the controller cannot run with
    pub fn validate(&self) -> Result<(), String> {
        let gains = [self.kp, self.ki, self.kd, self.kf];
        if gains.iter().any(|g| !g.is_finite()) {
            return Err("gains must be finite".into());
        }
        if !(self.period.is_finite() && self.period > 0.0) {
            return Err(format!("period must be positive, got {}", self.period));
        }
        if self.output_min > self.output_max {
            return Err(format!(
                "output_min {} exceeds output_max {}",
                self.output_min, self.output_max
            ));
        }
        if let Some([min, max]) = self.continuous_input {
            if !(max > min) {
                return Err(format!("continuous input range [{}, {}] is empty", min, max));
            }
        }
        Ok(())
    }
}

/// Wrap `input` into [min, max)
fn input_modulus(input: f64, min: f64, max: f64) -> f64 {
    let modulus = max - min;
    let turns = ((input - min) / modulus).floor();
    input - turns * modulus
}

/// PIDF Controller with state
#[derive(Debug, Clone)]
pub struct PidfController {
    config: PidfConfig,
    integral: f64,
    prev_measurement: Option<f64>,
    setpoint: f64,
    position_error: f64,
}

impl PidfController {
    /// Create a new controller with the given configuration
    pub fn new(config: PidfConfig) -> Self {
        Self {
            config,
            integral: 0.0,
            prev_measurement: None,
            setpoint: 0.0,
            position_error: 0.0,
        }
    }

    /// Set the target setpoint
    pub fn set_setpoint(&mut self, setpoint: f64) {
        self.setpoint = setpoint;
    }

    /// Difference between `to` and `from`, wrapped when input is continuous
    fn difference(&self, to: f64, from: f64) -> f64 {
        let raw = to - from;
        match self.config.continuous_input {
            Some([min, max]) => {
                let half = (max - min) / 2.0;
                input_modulus(raw, -half, half)
            }
            None => raw,
        }
    }

    /// Update the controller with a new measurement and return the control output
    ///
    /// Uses derivative-on-measurement to avoid derivative kick on setpoint changes.
    pub fn update(&mut self, measurement: f64, dt: f64) -> f64 {
        let error = self.difference(self.setpoint, measurement);
        self.position_error = error;

        let p_term = self.config.kp * error;

        let in_i_zone = self.config.i_zone
            .map(|zone| error.abs() < zone)
            .unwrap_or(true);

        if in_i_zone && dt > 0.0 {
            self.integral += error * dt;
            self.integral = self.integral.clamp(-self.config.i_max, self.config.i_max);
        } else if !in_i_zone {
            self.integral = 0.0;
        }
        let i_term = self.config.ki * self.integral;

        // Negative because the derivative is taken on measurement, not error
        let d_term = match self.prev_measurement {
            Some(prev) if dt > 0.0 => -self.config.kd * self.difference(measurement, prev) / dt,
            _ => 0.0,
        };
        self.prev_measurement = Some(measurement);

        let f_term = self.config.kf * self.setpoint;

        let output = p_term + i_term + d_term + f_term;
        output.clamp(self.config.output_min, self.config.output_max)
    }

    /// Error seen by the most recent update
    pub fn position_error(&self) -> f64 {
        self.position_error
    }

    /// Get the current integral accumulator value
    pub fn integral(&self) -> f64 {
        self.integral
    }
}

impl FeedbackController for PidfController {
    fn calculate(&mut self, measurement: f64, setpoint: f64) -> f64 {
        self.set_setpoint(setpoint);
        self.update(measurement, self.config.period)
    }

    fn enable_continuous_input(&mut self, min: f64, max: f64) {
        self.config.continuous_input = Some([min, max]);
    }

    fn is_continuous_input_enabled(&self) -> bool {
        self.config.continuous_input.is_some()
    }

    fn at_setpoint(&self) -> bool {
        self.position_error.abs() <= self.config.tolerance
    }

    fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_measurement = None;
        self.position_error = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_p_only_proportional_output() {
        let mut ctrl = PidfController::new(PidfConfig::p(2.0));
        ctrl.set_setpoint(10.0);

        // measurement=4 gives error=6
        let output = ctrl.update(4.0, 0.01);
        assert_abs_diff_eq!(output, 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_calculate_uses_configured_period() {
        let mut a = PidfController::new(PidfConfig::pi(1.0, 2.0).with_period(0.05));
        let mut b = a.clone();

        let via_calculate = a.calculate(1.0, 3.0);
        b.set_setpoint(3.0);
        let via_update = b.update(1.0, 0.05);

        assert_abs_diff_eq!(via_calculate, via_update, epsilon = 1e-12);
        assert_abs_diff_eq!(a.integral(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_pi_eliminates_steady_state_error() {
        let mut ctrl = PidfController::new(PidfConfig::pi(1.0, 5.0));
        ctrl.set_setpoint(10.0);

        // Integrating plant
        let mut measurement = 0.0;
        let dt = 0.01;
        for _ in 0..500 {
            let output = ctrl.update(measurement, dt);
            measurement += output * dt;
        }

        assert!((measurement - 10.0).abs() < 1.0, "Expected ~10.0, got {}", measurement);
    }

    #[test]
    fn test_anti_windup() {
        let mut ctrl = PidfController::new(PidfConfig::pi(1.0, 10.0).with_i_max(5.0));
        ctrl.set_setpoint(100.0);

        for _ in 0..100 {
            ctrl.update(0.0, 0.1);
        }

        assert!(ctrl.integral().abs() <= 5.0);
    }

    #[test]
    fn test_output_saturation() {
        let mut ctrl = PidfController::new(PidfConfig::p(100.0).with_limits(-1.0, 1.0));

        assert_abs_diff_eq!(ctrl.calculate(0.0, 10.0), 1.0);
        assert_abs_diff_eq!(ctrl.calculate(0.0, -10.0), -1.0);
    }

    #[test]
    fn test_derivative_on_measurement_no_kick() {
        let mut ctrl = PidfController::new(PidfConfig::pid(0.0, 0.0, 1.0));

        // No previous measurement yet
        assert_abs_diff_eq!(ctrl.calculate(5.0, 0.0), 0.0);

        // Setpoint jump with a steady measurement
        assert_abs_diff_eq!(ctrl.calculate(5.0, 100.0), 0.0);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut ctrl = PidfController::new(PidfConfig::pi(1.0, 1.0));
        for _ in 0..10 {
            ctrl.calculate(0.0, 10.0);
        }
        assert!(ctrl.integral() > 0.0);

        FeedbackController::reset(&mut ctrl);
        assert_abs_diff_eq!(ctrl.integral(), 0.0);
        assert_abs_diff_eq!(ctrl.position_error(), 0.0);
    }

    #[test]
    fn test_i_zone() {
        let mut ctrl = PidfController::new(PidfConfig::pi(0.0, 1.0).with_i_zone(5.0));
        ctrl.set_setpoint(10.0);

        // Error 10 is outside the zone
        ctrl.update(0.0, 0.1);
        assert_abs_diff_eq!(ctrl.integral(), 0.0);

        // Error 3 is inside
        ctrl.update(7.0, 0.1);
        assert!(ctrl.integral() > 0.0);
    }

    #[test]
    fn test_continuous_error_takes_short_way() {
        let mut ctrl = PidfController::new(PidfConfig::p(1.0));
        ctrl.enable_continuous_input(-PI, PI);
        assert!(ctrl.is_continuous_input_enabled());

        let output = ctrl.calculate(179f64.to_radians(), (-179f64).to_radians());
        assert_abs_diff_eq!(ctrl.position_error(), 2f64.to_radians(), epsilon = 1e-9);
        assert_abs_diff_eq!(output, 2f64.to_radians(), epsilon = 1e-9);

        let output = ctrl.calculate((-179f64).to_radians(), 179f64.to_radians());
        assert_abs_diff_eq!(output, -2f64.to_radians(), epsilon = 1e-9);
    }

    #[test]
    fn test_linear_error_without_continuous_input() {
        let mut ctrl = PidfController::new(PidfConfig::p(1.0));
        ctrl.calculate(179f64.to_radians(), (-179f64).to_radians());
        assert_abs_diff_eq!(ctrl.position_error(), (-358f64).to_radians(), epsilon = 1e-9);
    }

    #[test]
    fn test_continuous_derivative_across_seam() {
        let config = PidfConfig::pid(0.0, 0.0, 1.0)
            .with_continuous_input(-PI, PI)
            .with_period(0.1);
        let mut ctrl = PidfController::new(config);

        ctrl.calculate(179f64.to_radians(), 0.0);
        // Measurement moved +2 degrees across the seam
        let output = ctrl.calculate((-179f64).to_radians(), 0.0);
        assert_abs_diff_eq!(output, -2f64.to_radians() / 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_at_setpoint_tolerance() {
        let mut ctrl = PidfController::new(PidfConfig::p(1.0).with_tolerance(0.1));
        ctrl.calculate(0.95, 1.0);
        assert!(ctrl.at_setpoint());
        ctrl.calculate(0.5, 1.0);
        assert!(!ctrl.at_setpoint());
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        assert!(PidfConfig::p(1.0).validate().is_ok());
        assert!(PidfConfig::p(1.0).with_period(0.0).validate().is_err());
        assert!(PidfConfig::p(1.0).with_limits(1.0, -1.0).validate().is_err());
        assert!(PidfConfig::p(f64::NAN).validate().is_err());
        assert!(PidfConfig::p(1.0).with_continuous_input(1.0, 1.0).validate().is_err());
    }
}
