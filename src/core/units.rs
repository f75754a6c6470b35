use thiserror::Error;

pub const STEFAN_BOLTZMANN: f64 = 5.6696e-8;
pub const KELVIN_OFFSET: f64 = 273.15;

/// Universal gas constant, J/(kmol.K)
pub const R_GAS: f64 = 8314.34;
/// Molecular weight of dry air, kg/kmol
pub const M_AIR: f64 = 28.97;
/// Molecular weight of water vapour, kg/kmol
pub const M_H2O: f64 = 18.015;
/// Specific gas constant of dry air, J/(kg.K)
pub const R_AIR: f64 = R_GAS / M_AIR;
/// Specific heat of dry air at constant pressure, J/(kg.K)
pub const CP_AIR: f64 = 1003.5;
/// Prandtl number of air
pub const PRANDTL: f64 = CP_AIR / (CP_AIR + 1.25 * R_AIR);

/// Wind speeds below this floor make the convective correlations degenerate, so
/// every consumer clamps to it before forming a Reynolds number. (The original
/// Argonne code used 0.13 m/s.)
pub const MIN_WIND_SPEED: f64 = 0.5;

/// Legacy missing-value code used alongside NaN in observation records.
pub const MISSING_VALUE: f64 = -999.;

pub fn celsius_to_kelvin(temp_c: f64) -> Result<f64, BelowAbsoluteZeroError> {
    if temp_c < -KELVIN_OFFSET {
        Err(BelowAbsoluteZeroError::from_c(temp_c))
    } else {
        Ok(temp_c + KELVIN_OFFSET)
    }
}

pub fn kelvin_to_celsius(temp_k: f64) -> Result<f64, BelowAbsoluteZeroError> {
    if temp_k < 0.0 {
        Err(BelowAbsoluteZeroError::from_k(temp_k))
    } else {
        Ok(temp_k - KELVIN_OFFSET)
    }
}

#[derive(Debug, Error)]
#[error("A temperature of {k}ºK/{}ºC was encountered, which is less than absolute zero", k - KELVIN_OFFSET)]
pub struct BelowAbsoluteZeroError {
    k: f64,
}

impl BelowAbsoluteZeroError {
    fn from_k(k: f64) -> Self {
        Self { k }
    }

    fn from_c(c: f64) -> Self {
        Self { k: c + KELVIN_OFFSET }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_do_correct_temperature_conversions() {
        assert_eq!(
            celsius_to_kelvin(20.0).unwrap(),
            293.15,
            "incorrect conversion of Celsius to Kelvin"
        );
        assert_eq!(
            kelvin_to_celsius(5.0).unwrap(),
            -268.15,
            "incorrect conversion of Kelvin to Celsius"
        );
        for i in -40..60 {
            assert_eq!(
                kelvin_to_celsius(celsius_to_kelvin(i as f64).unwrap()).unwrap(),
                i as f64,
                "round trip temperature conversion (C to K to C) failed to return orig value"
            );
        }
    }

    #[rstest]
    fn should_reject_temperatures_below_absolute_zero() {
        assert!(celsius_to_kelvin(-274.).is_err());
        assert!(kelvin_to_celsius(-1.).is_err());
    }

    #[rstest]
    fn should_have_physically_plausible_air_constants() {
        assert_relative_eq!(R_AIR, 286.99, max_relative = 1e-3);
        assert_relative_eq!(PRANDTL, 0.7367, max_relative = 1e-3);
    }
}
