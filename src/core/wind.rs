//! Stability-class estimation and power-law extrapolation of wind speed to
//! the 2 m reference height used by the energy-balance solvers.

use crate::core::units::MIN_WIND_SPEED;

/// Height the solvers expect wind speeds at, m.
pub const REFERENCE_HEIGHT: f64 = 2.0;

/// Stability class by (wind-speed bin, forcing bin). Columns 1-4 are the
/// daytime irradiance bins, columns 6-7 the nighttime temperature-gradient
/// bins; columns 5 and 8 and the last row are padding that the bin logic
/// never selects.
const STABILITY_LOOKUP: [[usize; 8]; 6] = [
    [1, 1, 2, 4, 0, 5, 6, 0],
    [1, 2, 3, 4, 0, 4, 5, 0],
    [2, 2, 3, 4, 0, 4, 4, 0],
    [3, 3, 4, 4, 0, 0, 0, 0],
    [3, 4, 4, 4, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

/// Power-law exponents indexed by stability class - 1.
const URBAN_EXPONENTS: [f64; 6] = [0.15, 0.15, 0.20, 0.25, 0.30, 0.30];
const RURAL_EXPONENTS: [f64; 6] = [0.07, 0.07, 0.10, 0.15, 0.35, 0.55];

/// Atmospheric stability class (1-6) from solar radiation / delta-T
/// screening, used to pick the wind-profile exponent.
///
/// Arguments:
/// * `daytime` - whether the sun is up
/// * `speed` - wind speed, m/s
/// * `solar` - irradiance, W/m2 (used by day)
/// * `delta_t` - vertical temperature difference between the wind-speed
///               heights, upper minus lower, deg C (used by night)
pub fn stability_class(daytime: bool, speed: f64, solar: f64, delta_t: f64) -> usize {
    let (speed_bin, forcing_bin) = if daytime {
        let forcing_bin = if solar >= 925.0 {
            1
        } else if solar >= 675.0 {
            2
        } else if solar >= 175.0 {
            3
        } else {
            4
        };
        let speed_bin = if speed >= 6.0 {
            5
        } else if speed >= 5.0 {
            4
        } else if speed >= 3.0 {
            3
        } else if speed >= 2.0 {
            2
        } else {
            1
        };
        (speed_bin, forcing_bin)
    } else {
        let forcing_bin = if delta_t >= 0.0 { 7 } else { 6 };
        let speed_bin = if speed >= 2.5 {
            3
        } else if speed >= 2.0 {
            2
        } else {
            1
        };
        (speed_bin, forcing_bin)
    };

    STABILITY_LOOKUP[speed_bin - 1][forcing_bin - 1]
}

/// Wind speed extrapolated to the 2 m reference height with a power-law
/// profile, floored at [`MIN_WIND_SPEED`].
///
/// Arguments:
/// * `speed` - wind speed, m/s, at `measurement_height`
/// * `measurement_height` - height of the wind-speed measurement, m
///                          (typically 10 m)
/// * `stability_class` - stability class (1-6) from [`stability_class`]
/// * `urban` - whether the site is in an urban area
pub fn estimate_2m_wind_speed(
    speed: f64,
    measurement_height: f64,
    stability_class: usize,
    urban: bool,
) -> f64 {
    let exponent = if urban {
        URBAN_EXPONENTS[stability_class - 1]
    } else {
        RURAL_EXPONENTS[stability_class - 1]
    };

    (speed * (REFERENCE_HEIGHT / measurement_height).powf(exponent)).max(MIN_WIND_SPEED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_classify_a_sunny_breezy_day_as_slightly_unstable() {
        assert_eq!(stability_class(true, 3., 700., -0.052), 2);
    }

    #[rstest]
    fn should_classify_a_calm_clear_day_as_very_unstable() {
        assert_eq!(stability_class(true, 1., 950., 0.), 1);
    }

    #[rstest]
    fn should_classify_nights_by_the_temperature_gradient_sign() {
        // inversion (warming with height) is more stable than lapse
        assert!(stability_class(false, 1., 0., 0.5) > stability_class(false, 1., 0., -0.5));
    }

    #[rstest]
    fn every_reachable_bin_combination_should_give_a_valid_class() {
        // padding cells hold 0, which would index out of bounds in the
        // exponent tables; the bin logic must never reach them
        for speed in [0., 1., 1.9, 2., 2.4, 2.5, 2.9, 3., 4.9, 5., 5.9, 6., 10., 30.] {
            for solar in [0., 100., 174., 175., 500., 674., 675., 900., 924., 925., 1100.] {
                let class = stability_class(true, speed, solar, 0.);
                assert!((1..=6).contains(&class), "daytime class {class} out of range");
            }
            for delta_t in [-2., -0.01, 0., 0.01, 2.] {
                let class = stability_class(false, speed, 0., delta_t);
                assert!(
                    (1..=6).contains(&class),
                    "nighttime class {class} out of range"
                );
            }
        }
    }

    #[rstest]
    fn should_slow_the_wind_towards_the_surface() {
        // 2 m/s measured at 10 m in an urban area, class 2
        assert_relative_eq!(
            estimate_2m_wind_speed(2., 10., 2, true),
            1.5710,
            max_relative = 1e-4
        );
        // rural profile is flatter in near-neutral conditions
        assert!(estimate_2m_wind_speed(2., 10., 2, false) > estimate_2m_wind_speed(2., 10., 2, true));
    }

    #[rstest]
    fn should_floor_the_estimated_speed() {
        assert_eq!(estimate_2m_wind_speed(0.1, 10., 6, false), MIN_WIND_SPEED);
    }

    #[rstest]
    fn should_amplify_when_measured_below_the_reference_height() {
        assert!(estimate_2m_wind_speed(2., 1., 3, true) > 2.);
    }
}
