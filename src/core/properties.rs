//! Stateless physical-property formulas consumed by the energy-balance solvers.
//! All temperatures are in Kelvin and pressures in hPa unless a function says
//! otherwise.

use crate::core::units::{CP_AIR, KELVIN_OFFSET, MIN_WIND_SPEED, M_AIR, M_H2O, PRANDTL, R_AIR};
use serde::{Deserialize, Serialize};

/// Condensed phase the vapour is in equilibrium with.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub enum Phase {
    /// Over liquid water (dew)
    Water,
    /// Over ice (frost)
    Ice,
}

/// Saturation vapour pressure in hPa over liquid water or ice, from the Buck
/// equations with the moist-air enhancement factor applied.
///
/// Arguments:
/// * `temp_k` - air temperature, K
/// * `phase` - over liquid water or over ice
/// * `pressure` - barometric pressure, hPa
pub fn saturation_vapour_pressure(temp_k: f64, phase: Phase, pressure: f64) -> f64 {
    match phase {
        Phase::Water => {
            let y = (temp_k - KELVIN_OFFSET) / (temp_k - 32.18);
            (1.0007 + 3.46e-6 * pressure) * 6.1121 * (17.502 * y).exp()
        }
        Phase::Ice => {
            let y = (temp_k - KELVIN_OFFSET) / (temp_k - 0.6);
            (1.0003 + 4.18e-6 * pressure) * 6.1115 * (22.452 * y).exp()
        }
    }
}

/// Dew-point (or frost-point) temperature in K for a given vapour pressure.
/// Inverse of [`saturation_vapour_pressure`], including the same enhancement
/// factor.
///
/// Arguments:
/// * `vapour_pressure` - vapour pressure, hPa
/// * `phase` - dew point (over water) or frost point (over ice)
/// * `pressure` - barometric pressure, hPa
pub fn dew_point(vapour_pressure: f64, phase: Phase, pressure: f64) -> f64 {
    match phase {
        Phase::Water => {
            let enhancement_factor = 1.0007 + 3.46e-6 * pressure;
            let z = (vapour_pressure / (6.1121 * enhancement_factor)).ln();
            KELVIN_OFFSET + 240.97 * z / (17.502 - z)
        }
        Phase::Ice => {
            let enhancement_factor = 1.0003 + 4.18e-6 * pressure;
            let z = (vapour_pressure / (6.1115 * enhancement_factor)).ln();
            KELVIN_OFFSET + 272.55 * z / (22.452 - z)
        }
    }
}

/// Dew-point temperature in deg C from ambient temperature and relative
/// humidity, following eqn 8 in Lawrence (2005). At saturation the dew point
/// equals the temperature; below it the dew point is lower.
///
/// Arguments:
/// * `temp_c` - ambient temperature, deg C
/// * `relative_humidity` - relative humidity, %
pub fn dew_point_from_relative_humidity(temp_c: f64, relative_humidity: f64) -> f64 {
    const A1: f64 = 17.625;
    const B1: f64 = 243.04; // deg C

    let gamma = (relative_humidity / 100.).ln() + (A1 * temp_c) / (B1 + temp_c);

    B1 * gamma / (A1 - gamma)
}

/// Relative humidity in % from temperature, specific humidity and pressure.
/// Values above 105% are treated as unphysical and reported as None; a small
/// excess up to 105% is capped at 100%.
///
/// Arguments:
/// * `temp_c` - ambient temperature, deg C
/// * `specific_humidity` - specific humidity, kg/kg
/// * `pressure_pa` - barometric pressure, Pa
pub fn relative_humidity(temp_c: f64, specific_humidity: f64, pressure_pa: f64) -> Option<f64> {
    const A1: f64 = 610.94; // Pa
    const A2: f64 = 17.625;
    const A3: f64 = 243.04; // deg C

    let saturation_pressure = A1 * ((A2 * temp_c) / (A3 + temp_c)).exp();

    let rh = 100.
        * ((-specific_humidity / (specific_humidity - 1.))
            / ((0.622 * saturation_pressure) / (pressure_pa - saturation_pressure)));

    match rh {
        rh if !(0. ..=105.).contains(&rh) => None,
        rh if rh > 100. => Some(100.),
        rh => Some(rh),
    }
}

/// Atmospheric emissivity as a function of temperature, humidity and pressure,
/// needed by the radiative terms of the globe and wet-bulb balances.
///
/// Arguments:
/// * `temp_k` - air temperature, K
/// * `rh` - relative humidity as a proportion (0 to 1)
/// * `pressure` - barometric pressure, hPa
pub fn atmospheric_emissivity(temp_k: f64, rh: f64, pressure: f64) -> f64 {
    let vapour_pressure = rh * saturation_vapour_pressure(temp_k, Phase::Water, pressure);
    0.575 * vapour_pressure.powf(0.143)
}

/// Dynamic viscosity of air in kg/(m.s), from a kinetic-theory fit.
pub fn air_viscosity(temp_k: f64) -> f64 {
    const SIGMA: f64 = 3.617;
    const EPS_KAPPA: f64 = 97.0;

    let tr = temp_k / EPS_KAPPA;
    let omega = (tr - 2.9) / 0.4 * (-0.034) + 1.048;
    2.6693e-6 * (M_AIR * temp_k).sqrt() / (SIGMA * SIGMA * omega)
}

/// Thermal conductivity of air in W/(m.K).
pub fn thermal_conductivity(temp_k: f64) -> f64 {
    (CP_AIR + 1.25 * R_AIR) * air_viscosity(temp_k)
}

/// Diffusivity of water vapour in air, m2/s.
///
/// Arguments:
/// * `temp_k` - air temperature, K
/// * `pressure` - barometric pressure, hPa
pub fn diffusivity(temp_k: f64, pressure: f64) -> f64 {
    const PCRIT_AIR: f64 = 36.4;
    const PCRIT_H2O: f64 = 218.0;
    const TCRIT_AIR: f64 = 132.0;
    const TCRIT_H2O: f64 = 647.3;
    const A: f64 = 3.640e-4;
    const B: f64 = 2.334;

    let pcrit13 = (PCRIT_AIR * PCRIT_H2O).powf(1. / 3.);
    let tcrit512 = (TCRIT_AIR * TCRIT_H2O).powf(5. / 12.);
    let tcrit12 = (TCRIT_AIR * TCRIT_H2O).sqrt();
    let mmix = (1. / M_AIR + 1. / M_H2O).sqrt();
    let pressure_atm = pressure / 1013.25;

    A * (temp_k / tcrit12).powf(B) * pcrit13 * tcrit512 * mmix / pressure_atm * 1e-4
}

/// Heat of vaporisation of water in J/kg, using the corresponding-states form
/// of Meyra et al. (2004).
pub fn heat_of_vaporisation(temp_k: f64) -> f64 {
    const ZC: f64 = 0.292; // universal critical ratio
    const TC: f64 = 647.3; // critical temperature of H2O, K
    const TT: f64 = 273.16; // triple temperature of H2O, K
    const DH_TP: f64 = 2_500_900.; // enthalpy of vaporisation at the triple point, J/kg

    DH_TP
        * ((TC - temp_k) / (TC - TT)).powf((ZC * ZC) * ((temp_k - TT) / (TC - TT)) + ZC)
}

/// Convective heat-transfer coefficient in W/(m2.K) for flow around a sphere,
/// Nu = 2 + 0.6 Re^1/2 Pr^1/3.
///
/// Arguments:
/// * `diameter` - sphere diameter, m
/// * `temp_k` - air temperature, K
/// * `pressure` - barometric pressure, hPa
/// * `speed` - wind speed, m/s (floored at [`MIN_WIND_SPEED`])
pub fn h_sphere_in_air(diameter: f64, temp_k: f64, pressure: f64, speed: f64) -> f64 {
    let density = pressure * 100. / (R_AIR * temp_k);
    let reynolds = speed.max(MIN_WIND_SPEED) * density * diameter / air_viscosity(temp_k);
    let nusselt = 2.0 + 0.6 * reynolds.sqrt() * PRANDTL.powf(0.3333);

    nusselt * thermal_conductivity(temp_k) / diameter
}

/// Convective heat-transfer coefficient in W/(m2.K) for a long cylinder in
/// cross flow, with the Bedingfield and Drew exponents.
///
/// Arguments:
/// * `diameter` - cylinder diameter, m
/// * `_length` - cylinder length, m (the correlation is per unit area so the
///               length drops out; kept so the signature documents the sensor)
/// * `temp_k` - air temperature, K
/// * `pressure` - barometric pressure, hPa
/// * `speed` - wind speed, m/s (floored at [`MIN_WIND_SPEED`])
pub fn h_cylinder_in_air(
    diameter: f64,
    _length: f64,
    temp_k: f64,
    pressure: f64,
    speed: f64,
) -> f64 {
    const A: f64 = 0.56;
    const B: f64 = 0.281;
    const C: f64 = 0.4;

    let density = pressure * 100. / (R_AIR * temp_k);
    let reynolds = speed.max(MIN_WIND_SPEED) * density * diameter / air_viscosity(temp_k);
    let nusselt = B * reynolds.powf(1. - C) * PRANDTL.powf(1. - A);

    nusselt * thermal_conductivity(temp_k) / diameter
}
