//! Damped fixed-point solvers for the equilibrium temperature of the two
//! idealised sensors in the Liljegren WBGT model: a black globe and a wetted
//! wick, each balancing radiative and convective (and for the wick,
//! evaporative) exchange with the surroundings.

use crate::core::properties::{
    air_viscosity, atmospheric_emissivity, dew_point, diffusivity, h_cylinder_in_air,
    h_sphere_in_air, heat_of_vaporisation, saturation_vapour_pressure, Phase,
};
use crate::core::units::{
    CP_AIR, KELVIN_OFFSET, M_AIR, M_H2O, PRANDTL, R_AIR, STEFAN_BOLTZMANN,
};
use std::f64::consts::PI;
use thiserror::Error;
use tracing::debug;

/// Iteration stops once successive estimates agree within this threshold, K.
const CONVERGENCE_THRESHOLD: f64 = 0.02;
/// Hard cap on iterations; bounds worst-case latency and declares
/// non-convergence. (Raised from the original 50 to reduce missingness.)
const MAX_ITERATIONS: usize = 100;
/// Weight given to the carried estimate in the under-relaxation blend that
/// damps oscillation of the nonlinear iteration.
const DAMPING: f64 = 0.9;

/// Globe thermometer: a 2-inch matte black sphere.
const GLOBE_DIAMETER: f64 = 0.0508;
const GLOBE_EMISSIVITY: f64 = 0.95;
const GLOBE_ALBEDO: f64 = 0.05;

/// Wetted wick of the wet-bulb thermometer, modelled as a cylinder in cross
/// flow.
const WICK_DIAMETER: f64 = 0.007;
const WICK_LENGTH: f64 = 0.0254;
const WICK_EMISSIVITY: f64 = 0.95;
const WICK_ALBEDO: f64 = 0.4;

const SURFACE_EMISSIVITY: f64 = 0.999;
const SURFACE_ALBEDO: f64 = 0.45;

/// Mass-transfer analogy uses (Pr/Sc)^a with the Bedingfield and Drew
/// exponent.
const EVAPORATION_EXPONENT: f64 = 0.56;
const MASS_TRANSFER_RATIO: f64 = CP_AIR * M_AIR / M_H2O;

/// An energy-balance iteration failed to settle within the iteration cap.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[error("energy balance failed to converge within {iterations} iterations (last estimate {last_estimate} K)")]
pub struct NonConvergenceError {
    pub iterations: usize,
    pub last_estimate: f64,
}

/// Iteration state owned by a single solver invocation. `previous` is the
/// damped estimate the balance equation is evaluated at; `estimate` is the
/// most recent undamped solution of the balance, and is the value reported on
/// convergence.
#[derive(Clone, Copy, Debug)]
struct SolverState {
    estimate: f64,
    previous: f64,
    iterations: usize,
    converged: bool,
}

impl SolverState {
    fn new(first_guess: f64) -> Self {
        Self {
            estimate: first_guess,
            previous: first_guess,
            iterations: 0,
            converged: false,
        }
    }

    /// Record a new undamped estimate: test convergence against the carried
    /// value, then blend the carried value 90/10 towards the new one.
    fn advance(&mut self, new_estimate: f64) {
        self.iterations += 1;
        self.converged = (new_estimate - self.previous).abs() < CONVERGENCE_THRESHOLD;
        self.estimate = new_estimate;
        self.previous = DAMPING * self.previous + (1. - DAMPING) * new_estimate;
    }

    fn finished(&self) -> bool {
        self.converged || self.iterations >= MAX_ITERATIONS
    }

    fn into_result(self) -> Result<f64, NonConvergenceError> {
        if self.converged {
            debug!(iterations = self.iterations, "energy balance converged");
            Ok(self.estimate)
        } else {
            Err(NonConvergenceError {
                iterations: self.iterations,
                last_estimate: self.estimate,
            })
        }
    }
}

/// Equilibrium globe temperature in deg C, solved from the radiative and
/// convective balance of the globe thermometer (Liljegren 2008).
///
/// Arguments:
/// * `air_temp` - dry-bulb air temperature, K
/// * `rh` - relative humidity as a proportion (0 to 1)
/// * `pressure` - barometric pressure, hPa
/// * `speed` - wind speed, m/s
/// * `solar` - solar irradiance, W/m2
/// * `fdir` - fraction of irradiance due to direct beam (0 to 0.9)
/// * `cza` - cosine of the solar zenith angle (0 to 1)
pub fn globe_temperature(
    air_temp: f64,
    rh: f64,
    pressure: f64,
    speed: f64,
    solar: f64,
    fdir: f64,
    cza: f64,
) -> Result<f64, NonConvergenceError> {
    // The balance equation has cza in a denominator, so cza = 0 would produce
    // a non-finite result. That only happens at night, when fdir is also 0 and
    // the direct-beam term vanishes regardless of cza, so flooring cza at 0.01
    // avoids the singularity without changing the physics.
    let cza = cza.max(0.01);

    let surface_temp = air_temp;
    let mut state = SolverState::new(air_temp); // first guess is the air temperature

    while !state.finished() {
        // evaluate properties at the average of the globe and air temperatures
        let ref_temp = 0.5 * (state.previous + air_temp);
        let h = h_sphere_in_air(GLOBE_DIAMETER, ref_temp, pressure, speed);

        let new_estimate = (0.5
            * (atmospheric_emissivity(air_temp, rh, pressure) * air_temp.powi(4)
                + SURFACE_EMISSIVITY * surface_temp.powi(4))
            - h / (STEFAN_BOLTZMANN * GLOBE_EMISSIVITY) * (state.previous - air_temp)
            + solar / (2. * STEFAN_BOLTZMANN * GLOBE_EMISSIVITY)
                * (1. - GLOBE_ALBEDO)
                * (fdir * (1. / (2. * cza) - 1.) + 1. + SURFACE_ALBEDO))
            .powf(0.25);

        state.advance(new_estimate);
    }

    state.into_result().map(|temp_k| temp_k - KELVIN_OFFSET)
}

/// Equilibrium natural wet-bulb temperature in deg C: the wick is exposed to
/// the radiation field, so the evaporative balance carries the net-radiation
/// term.
pub fn natural_wet_bulb_temperature(
    air_temp: f64,
    rh: f64,
    pressure: f64,
    speed: f64,
    solar: f64,
    fdir: f64,
    cza: f64,
) -> Result<f64, NonConvergenceError> {
    wet_bulb_temperature(air_temp, rh, pressure, speed, solar, fdir, cza, true)
}

/// Equilibrium psychrometric wet-bulb temperature in deg C: the wick is
/// shielded from radiation, so the balance is purely evaporative/convective.
pub fn psychrometric_wet_bulb_temperature(
    air_temp: f64,
    rh: f64,
    pressure: f64,
    speed: f64,
    solar: f64,
    fdir: f64,
    cza: f64,
) -> Result<f64, NonConvergenceError> {
    wet_bulb_temperature(air_temp, rh, pressure, speed, solar, fdir, cza, false)
}

/// Shared wet-bulb balance; the natural and psychrometric variants differ
/// only in whether the net-radiation term is coupled in.
fn wet_bulb_temperature(
    air_temp: f64,
    rh: f64,
    pressure: f64,
    speed: f64,
    solar: f64,
    fdir: f64,
    cza: f64,
    radiative_coupling: bool,
) -> Result<f64, NonConvergenceError> {
    let surface_temp = air_temp;
    let zenith_angle = cza.acos(); // radians
    let air_vapour_pressure = rh * saturation_vapour_pressure(air_temp, Phase::Water, pressure);

    // first guess is the dew-point temperature
    let mut state = SolverState::new(dew_point(air_vapour_pressure, Phase::Water, pressure));

    while !state.finished() {
        let ref_temp = 0.5 * (state.previous + air_temp);

        let h = h_cylinder_in_air(WICK_DIAMETER, WICK_LENGTH, ref_temp, pressure, speed);

        // net radiative gain of the wick: longwave exchange with sky and
        // surface, plus absorbed direct, diffuse and ground-reflected
        // shortwave
        let net_radiation = STEFAN_BOLTZMANN
            * WICK_EMISSIVITY
            * (0.5
                * (atmospheric_emissivity(air_temp, rh, pressure) * air_temp.powi(4)
                    + SURFACE_EMISSIVITY * surface_temp.powi(4))
                - state.previous.powi(4))
            + (1. - WICK_ALBEDO)
                * solar
                * ((1. - fdir) * (1. + 0.25 * WICK_DIAMETER / WICK_LENGTH)
                    + fdir * (zenith_angle.tan() / PI + 0.25 * WICK_DIAMETER / WICK_LENGTH)
                    + SURFACE_ALBEDO);

        let wick_vapour_pressure =
            saturation_vapour_pressure(state.previous, Phase::Water, pressure);
        let density = pressure * 100. / (R_AIR * ref_temp);
        let schmidt = air_viscosity(ref_temp) / (density * diffusivity(ref_temp, pressure));

        let radiative_term = if radiative_coupling {
            net_radiation / h
        } else {
            0.
        };

        let new_estimate = air_temp
            - heat_of_vaporisation(ref_temp) / MASS_TRANSFER_RATIO
                * (wick_vapour_pressure - air_vapour_pressure)
                / (pressure - wick_vapour_pressure)
                * (PRANDTL / schmidt).powf(EVAPORATION_EXPONENT)
            + radiative_term;

        state.advance(new_estimate);
    }

    state.into_result().map(|temp_k| temp_k - KELVIN_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::*;

    #[rstest]
    fn solver_state_should_blend_estimates_90_10() {
        let mut state = SolverState::new(300.);
        state.advance(310.);
        assert_relative_eq!(state.previous, 301.);
        assert_relative_eq!(state.estimate, 310.);
        assert_eq!(state.iterations, 1);
        assert!(!state.converged);
    }

    #[rstest]
    fn solver_state_should_converge_on_small_changes() {
        let mut state = SolverState::new(300.);
        state.advance(300.01);
        assert!(state.converged);
        assert_eq!(state.into_result().unwrap(), 300.01);
    }

    #[rstest]
    fn solver_state_should_stop_at_the_iteration_cap() {
        let mut state = SolverState::new(300.);
        // oscillate hopelessly
        let mut flip = false;
        while !state.finished() {
            state.advance(if flip { 250. } else { 350. });
            flip = !flip;
        }
        assert_eq!(state.iterations, MAX_ITERATIONS);
        assert!(state.into_result().is_err());
    }

    #[rstest]
    fn sunlit_globe_should_run_warmer_than_the_air() {
        // docstring example from the original: Tglobe(290, 0.75, 1014, 3, 700, 0.32, 0.96)
        let globe = globe_temperature(290., 0.75, 1014., 3., 700., 0.32, 0.96).unwrap();
        assert!(globe > 290. - KELVIN_OFFSET);
        assert!(globe < 60.);
    }

    #[rstest]
    fn globe_should_converge_in_a_perfectly_dry_atmosphere() {
        assert!(globe_temperature(310., 0., 950., 1., 800., 0.7, 0.8).is_ok());
    }

    #[rstest]
    fn globe_should_stay_finite_with_zero_zenith_cosine_and_no_direct_beam() {
        let globe = globe_temperature(300., 0.5, 1013.25, 2., 100., 0., 0.).unwrap();
        assert!(globe.is_finite());
    }

    #[rstest]
    fn nocturnal_globe_should_track_the_air_temperature() {
        let air_temp = 293.15;
        let globe = globe_temperature(air_temp, 0.6, 1013.25, 2., 0., 0., 0.).unwrap();
        assert_relative_eq!(globe, air_temp - KELVIN_OFFSET, epsilon = 2.);
    }

    #[rstest]
    fn wet_bulb_should_not_exceed_air_temperature_when_shielded() {
        let air_temp = 303.15;
        let psychrometric =
            psychrometric_wet_bulb_temperature(air_temp, 0.6, 1013.25, 3., 700., 0.5, 0.8)
                .unwrap();
        assert!(psychrometric < air_temp - KELVIN_OFFSET);
    }

    #[rstest]
    fn saturated_wet_bulb_should_equal_air_temperature() {
        let air_temp = 293.15;
        let psychrometric =
            psychrometric_wet_bulb_temperature(air_temp, 1., 1013.25, 3., 0., 0., 0.).unwrap();
        assert_relative_eq!(psychrometric, air_temp - KELVIN_OFFSET, epsilon = 0.1);
    }

    #[rstest]
    fn sunlit_natural_wet_bulb_should_exceed_the_psychrometric_value() {
        let args = (303.15, 0.5, 1013.25, 2., 800., 0.6, 0.9);
        let natural =
            natural_wet_bulb_temperature(args.0, args.1, args.2, args.3, args.4, args.5, args.6)
                .unwrap();
        let psychrometric = psychrometric_wet_bulb_temperature(
            args.0, args.1, args.2, args.3, args.4, args.5, args.6,
        )
        .unwrap();
        assert!(natural > psychrometric);
    }

    #[rstest]
    fn solvers_should_converge_across_the_realistic_envelope() {
        // rh starts just above zero: a perfectly dry atmosphere has no defined
        // dew point to seed the wick solvers with
        for air_temp in [250., 270., 290., 310., 320.] {
            for rh in [0.05, 0.3, 0.7, 1.] {
                for pressure in [900., 1013.25, 1100.] {
                    for speed in [0.5, 3., 20.] {
                        for (solar, fdir, cza) in [(0., 0., 0.), (500., 0.5, 0.5), (1000., 0.8, 0.9)]
                        {
                            let globe = globe_temperature(
                                air_temp, rh, pressure, speed, solar, fdir, cza,
                            );
                            assert!(
                                globe.is_ok(),
                                "globe solver failed at Tair={air_temp} rh={rh} P={pressure} u={speed} S={solar}"
                            );
                            let natural = natural_wet_bulb_temperature(
                                air_temp, rh, pressure, speed, solar, fdir, cza,
                            );
                            assert!(
                                natural.is_ok(),
                                "wet-bulb solver failed at Tair={air_temp} rh={rh} P={pressure} u={speed} S={solar}"
                            );
                        }
                    }
                }
            }
        }
    }
}
