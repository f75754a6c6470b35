//! Closed-form heat indices that need no iteration: humidex, net effective
//! temperature, mean radiant temperature and the UTCI regression.

use std::f64::consts::PI;

/// Humidex in deg C from ambient and dew-point temperatures, eqn 3 of
/// Smoyer-Tomic and Rainham (2001). Use
/// [`crate::core::properties::dew_point_from_relative_humidity`] first when
/// only temperature and relative humidity are known.
///
/// Arguments:
/// * `temp_c` - ambient temperature, deg C
/// * `dew_point_c` - dew-point temperature, deg C
pub fn humidex(temp_c: f64, dew_point_c: f64) -> f64 {
    temp_c
        + (5. / 9.)
            * (6.1094 * ((17.625 * dew_point_c) / (243.04 + dew_point_c)).exp() - 10.)
}

/// Net effective temperature in deg C from temperature, relative humidity and
/// wind speed, section 3 of Li and Chan (2000).
///
/// Arguments:
/// * `temp_c` - ambient temperature, deg C
/// * `relative_humidity` - relative humidity, %
/// * `wind_speed` - wind speed, m/s
pub fn net_effective_temperature(temp_c: f64, relative_humidity: f64, wind_speed: f64) -> f64 {
    37. - ((37. - temp_c)
        / (0.68 - 0.0014 * relative_humidity + 1. / (1.76 + 1.4 * wind_speed.powf(0.75))))
        - 0.29 * temp_c * (1. - 0.01 * relative_humidity)
}

/// Mean radiant temperature in K from the ERA5-style radiation components,
/// following Di Napoli (2020).
///
/// Arguments:
/// * `solar_down` - surface solar radiation downwards (direct + diffuse), W/m2
/// * `net_solar` - surface net solar radiation, W/m2
/// * `direct_solar` - total sky direct solar radiation at the surface, W/m2
/// * `thermal_down` - surface thermal radiation downwards, W/m2
/// * `net_thermal` - surface net thermal radiation, W/m2
/// * `cza` - cosine of the solar zenith angle
pub fn mean_radiant_temperature(
    solar_down: f64,
    net_solar: f64,
    direct_solar: f64,
    thermal_down: f64,
    net_thermal: f64,
    cza: f64,
) -> f64 {
    const SIGMA: f64 = 5.67e-8;
    // emissivity of the clothed human body, angle factor, and absorption
    // coefficient of the body for solar radiation (standard values)
    const EPSILON: f64 = 0.97;
    const FA: f64 = 0.50;
    const ALPHA_IR: f64 = 0.70;

    let diffuse_solar = solar_down - direct_solar;
    let reflected_solar = solar_down - net_solar;
    let upwelling_thermal = thermal_down - net_thermal;

    // projected factor area of the body
    let gamma = cza.asin().to_degrees();
    let fp = 0.308 * ((PI / 180.) * gamma * 0.998 - gamma * gamma / 50000.).cos();

    let direct_normal = if cza > 0.01 {
        direct_solar / cza
    } else {
        direct_solar
    };

    ((1. / SIGMA)
        * (FA * thermal_down
            + FA * upwelling_thermal
            + (ALPHA_IR / EPSILON) * (FA * diffuse_solar + FA * reflected_solar + fp * direct_normal)))
        .powf(0.25)
}

/// Universal Thermal Climate Index in deg C, from the 6th-order polynomial
/// regression of Brode et al. (2011). Returns None outside the ranges the
/// regression is valid for.
///
/// Arguments:
/// * `temp_c` - ambient temperature, deg C (-50 to 50)
/// * `vapour_pressure` - vapour pressure, kPa (< 5)
/// * `saturation_pressure` - saturation vapour pressure, kPa
/// * `wind_speed` - 10 m wind speed, m/s
/// * `d_tmrt` - mean radiant temperature minus ambient temperature, deg C
///              (-30 to 70)
pub fn utci(
    temp_c: f64,
    vapour_pressure: f64,
    saturation_pressure: f64,
    wind_speed: f64,
    d_tmrt: f64,
) -> Option<f64> {
    if !(-50. ..=50.).contains(&temp_c) || vapour_pressure > 5. {
        return None;
    }
    if !(-30. ..=70.).contains(&d_tmrt) || wind_speed > 30.3 {
        return None;
    }

    // the regression is only fitted for RH >= 5%; below that, use the vapour
    // pressure the air would have at RH = 5% (Brode et al. 2011)
    let rh = vapour_pressure / saturation_pressure * 100.;
    let e = if rh < 5. {
        saturation_pressure * 0.05
    } else {
        vapour_pressure
    };

    let ta = temp_c;
    let ws = wind_speed;
    let d = d_tmrt;

    Some(
        ta + 6.07562052e-1
            + -2.27712343e-2 * ta
            + 8.06470249e-4 * ta * ta
            + -1.54271372e-4 * ta * ta * ta
            + -3.24651735e-6 * ta * ta * ta * ta
            + 7.32602852e-8 * ta * ta * ta * ta * ta
            + 1.35959073e-9 * ta * ta * ta * ta * ta * ta
            + -2.25836520e0 * ws
            + 8.80326035e-2 * ta * ws
            + 2.16844454e-3 * ta * ta * ws
            + -1.53347087e-5 * ta * ta * ta * ws
            + -5.72983704e-7 * ta * ta * ta * ta * ws
            + -2.55090145e-9 * ta * ta * ta * ta * ta * ws
            + -7.51269505e-1 * ws * ws
            + -4.08350271e-3 * ta * ws * ws
            + -5.21670675e-5 * ta * ta * ws * ws
            + 1.94544667e-6 * ta * ta * ta * ws * ws
            + 1.14099531e-8 * ta * ta * ta * ta * ws * ws
            + 1.58137256e-1 * ws * ws * ws
            + -6.57263143e-5 * ta * ws * ws * ws
            + 2.22697524e-7 * ta * ta * ws * ws * ws
            + -4.16117031e-8 * ta * ta * ta * ws * ws * ws
            + -1.27762753e-2 * ws * ws * ws * ws
            + 9.66891875e-6 * ta * ws * ws * ws * ws
            + 2.52785852e-9 * ta * ta * ws * ws * ws * ws
            + 4.56306672e-4 * ws * ws * ws * ws * ws
            + -1.74202546e-7 * ta * ws * ws * ws * ws * ws
            + -5.91491269e-6 * ws * ws * ws * ws * ws * ws
            + 3.98374029e-1 * d
            + 1.83945314e-4 * ta * d
            + -1.73754510e-4 * ta * ta * d
            + -7.60781159e-7 * ta * ta * ta * d
            + 3.77830287e-8 * ta * ta * ta * ta * d
            + 5.43079673e-10 * ta * ta * ta * ta * ta * d
            + -2.00518269e-2 * ws * d
            + 8.92859837e-4 * ta * ws * d
            + 3.45433048e-6 * ta * ta * ws * d
            + -3.77925774e-7 * ta * ta * ta * ws * d
            + -1.69699377e-9 * ta * ta * ta * ta * ws * d
            + 1.69992415e-4 * ws * ws * d
            + -4.99204314e-5 * ta * ws * ws * d
            + 2.47417178e-7 * ta * ta * ws * ws * d
            + 1.07596466e-8 * ta * ta * ta * ws * ws * d
            + 8.49242932e-5 * ws * ws * ws * d
            + 1.35191328e-6 * ta * ws * ws * ws * d
            + -6.21531254e-9 * ta * ta * ws * ws * ws * d
            + -4.99410301e-6 * ws * ws * ws * ws * d
            + -1.89489258e-8 * ta * ws * ws * ws * ws * d
            + 8.15300114e-8 * ws * ws * ws * ws * ws * d
            + 7.55043090e-4 * d * d
            + -5.65095215e-5 * ta * d * d
            + -4.52166564e-7 * ta * ta * d * d
            + 2.46688878e-8 * ta * ta * ta * d * d
            + 2.42674348e-10 * ta * ta * ta * ta * d * d
            + 1.54547250e-4 * ws * d * d
            + 5.24110970e-6 * ta * ws * d * d
            + -8.75874982e-8 * ta * ta * ws * d * d
            + -1.50743064e-9 * ta * ta * ta * ws * d * d
            + -1.56236307e-5 * ws * ws * d * d
            + -1.33895614e-7 * ta * ws * ws * d * d
            + 2.49709824e-9 * ta * ta * ws * ws * d * d
            + 6.51711721e-7 * ws * ws * ws * d * d
            + 1.94960053e-9 * ta * ws * ws * ws * d * d
            + -1.00361113e-8 * ws * ws * ws * ws * d * d
            + -1.21206673e-5 * d * d * d
            + -2.18203660e-7 * ta * d * d * d
            + 7.51269482e-9 * ta * ta * d * d * d
            + 9.79063848e-11 * ta * ta * ta * d * d * d
            + 1.25006734e-6 * ws * d * d * d
            + -1.81584736e-9 * ta * ws * d * d * d
            + -3.52197671e-10 * ta * ta * ws * d * d * d
            + -3.36514630e-8 * ws * ws * d * d * d
            + 1.35908359e-10 * ta * ws * ws * d * d * d
            + 4.17032620e-10 * ws * ws * ws * d * d * d
            + -1.30369025e-9 * d * d * d * d
            + 4.13908461e-10 * ta * d * d * d * d
            + 9.22652254e-12 * ta * ta * d * d * d * d
            + -5.08220384e-9 * ws * d * d * d * d
            + -2.24730961e-11 * ta * ws * d * d * d * d
            + 1.17139133e-10 * ws * ws * d * d * d * d
            + 6.62154879e-10 * d * d * d * d * d
            + 4.03863260e-13 * ta * d * d * d * d * d
            + 1.95087203e-12 * ws * d * d * d * d * d
            + -4.73602469e-12 * d * d * d * d * d * d
            + 5.12733497e0 * e
            + -3.12788561e-1 * ta * e
            + -1.96701861e-2 * ta * ta * e
            + 9.99690870e-4 * ta * ta * ta * e
            + 9.51738512e-6 * ta * ta * ta * ta * e
            + -4.66426341e-7 * ta * ta * ta * ta * ta * e
            + 5.48050612e-1 * ws * e
            + -3.30552823e-3 * ta * ws * e
            + -1.64119440e-3 * ta * ta * ws * e
            + -5.16670694e-6 * ta * ta * ta * ws * e
            + 9.52692432e-7 * ta * ta * ta * ta * ws * e
            + -4.29223622e-2 * ws * ws * e
            + 5.00845667e-3 * ta * ws * ws * e
            + 1.00601257e-6 * ta * ta * ws * ws * e
            + -1.81748644e-6 * ta * ta * ta * ws * ws * e
            + -1.25813502e-3 * ws * ws * ws * e
            + -1.79330391e-4 * ta * ws * ws * ws * e
            + 2.34994441e-6 * ta * ta * ws * ws * ws * e
            + 1.29735808e-4 * ws * ws * ws * ws * e
            + 1.29064870e-6 * ta * ws * ws * ws * ws * e
            + -2.28558686e-6 * ws * ws * ws * ws * ws * e
            + -3.69476348e-2 * d * e
            + 1.62325322e-3 * ta * d * e
            + -3.14279680e-5 * ta * ta * d * e
            + 2.59835559e-6 * ta * ta * ta * d * e
            + -4.77136523e-8 * ta * ta * ta * ta * d * e
            + 8.64203390e-3 * ws * d * e
            + -6.87405181e-4 * ta * ws * d * e
            + -9.13863872e-6 * ta * ta * ws * d * e
            + 5.15916806e-7 * ta * ta * ta * ws * d * e
            + -3.59217476e-5 * ws * ws * d * e
            + 3.28696511e-5 * ta * ws * ws * d * e
            + -7.10542454e-7 * ta * ta * ws * ws * d * e
            + -1.24382300e-5 * ws * ws * ws * d * e
            + -7.38584400e-9 * ta * ws * ws * ws * d * e
            + 2.20609296e-7 * ws * ws * ws * ws * d * e
            + -7.32469180e-4 * d * d * e
            + -1.87381964e-5 * ta * d * d * e
            + 4.80925239e-6 * ta * ta * d * d * e
            + -8.75492040e-8 * ta * ta * ta * d * d * e
            + 2.77862930e-5 * ws * d * d * e
            + -5.06004592e-6 * ta * ws * d * d * e
            + 1.14325367e-7 * ta * ta * ws * d * d * e
            + 2.53016723e-6 * ws * ws * d * d * e
            + -1.72857035e-8 * ta * ws * ws * d * d * e
            + -3.95079398e-8 * ws * ws * ws * d * d * e
            + -3.59413173e-7 * d * d * d * e
            + 7.04388046e-7 * ta * d * d * d * e
            + -1.89309167e-8 * ta * ta * d * d * d * e
            + -4.79768731e-7 * ws * d * d * d * e
            + 7.96079978e-9 * ta * ws * d * d * d * e
            + 1.62897058e-9 * ws * ws * d * d * d * e
            + 3.94367674e-8 * d * d * d * d * e
            + -1.18566247e-9 * ta * d * d * d * d * e
            + 3.34678041e-10 * ws * d * d * d * d * e
            + -1.15606447e-10 * d * d * d * d * d * e
            + -2.80626406e0 * e * e
            + 5.48712484e-1 * ta * e * e
            + -3.99428410e-3 * ta * ta * e * e
            + -9.54009191e-4 * ta * ta * ta * e * e
            + 1.93090978e-5 * ta * ta * ta * ta * e * e
            + -3.08806365e-1 * ws * e * e
            + 1.16952364e-2 * ta * ws * e * e
            + 4.95271903e-4 * ta * ta * ws * e * e
            + -1.90710882e-5 * ta * ta * ta * ws * e * e
            + 2.10787756e-3 * ws * ws * e * e
            + -6.98445738e-4 * ta * ws * ws * e * e
            + 2.30109073e-5 * ta * ta * ws * ws * e * e
            + 4.17856590e-4 * ws * ws * ws * e * e
            + -1.27043871e-5 * ta * ws * ws * ws * e * e
            + -3.04620472e-6 * ws * ws * ws * ws * e * e
            + 5.14507424e-2 * d * e * e
            + -4.32510997e-3 * ta * d * e * e
            + 8.99281156e-5 * ta * ta * d * e * e
            + -7.14663943e-7 * ta * ta * ta * d * e * e
            + -2.66016305e-4 * ws * d * e * e
            + 2.63789586e-4 * ta * ws * d * e * e
            + -7.01199003e-6 * ta * ta * ws * d * e * e
            + -1.06823306e-4 * ws * ws * d * e * e
            + 3.61341136e-6 * ta * ws * ws * d * e * e
            + 2.29748967e-7 * ws * ws * ws * d * e * e
            + 3.04788893e-4 * d * d * e * e
            + -6.42070836e-5 * ta * d * d * e * e
            + 1.16257971e-6 * ta * ta * d * d * e * e
            + 7.68023384e-6 * ws * d * d * e * e
            + -5.47446896e-7 * ta * ws * d * d * e * e
            + -3.59937910e-8 * ws * ws * d * d * e * e
            + -4.36497725e-6 * d * d * d * e * e
            + 1.68737969e-7 * ta * d * d * d * e * e
            + 2.67489271e-8 * ws * d * d * d * e * e
            + 3.23926897e-9 * d * d * d * d * e * e
            + -3.53874123e-2 * e * e * e
            + -2.21201190e-1 * ta * e * e * e
            + 1.55126038e-2 * ta * ta * e * e * e
            + -2.63917279e-4 * ta * ta * ta * e * e * e
            + 4.53433455e-2 * ws * e * e * e
            + -4.32943862e-3 * ta * ws * e * e * e
            + 1.45389826e-4 * ta * ta * ws * e * e * e
            + 2.17508610e-4 * ws * ws * e * e * e
            + -6.66724702e-5 * ta * ws * ws * e * e * e
            + 3.33217140e-5 * ws * ws * ws * e * e * e
            + -2.26921615e-3 * d * e * e * e
            + 3.80261982e-4 * ta * d * e * e * e
            + -5.45314314e-9 * ta * ta * d * e * e * e
            + -7.96355448e-4 * ws * d * e * e * e
            + 2.53458034e-5 * ta * ws * d * e * e * e
            + -6.31223658e-6 * ws * ws * d * e * e * e
            + 3.02122035e-4 * d * d * e * e * e
            + -4.77403547e-6 * ta * d * d * e * e * e
            + 1.73825715e-6 * ws * d * d * e * e * e
            + -4.09087898e-7 * d * d * d * e * e * e
            + 6.14155345e-1 * e * e * e * e
            + -6.16755931e-2 * ta * e * e * e * e
            + 1.33374846e-3 * ta * ta * e * e * e * e
            + 3.55375387e-3 * ws * e * e * e * e
            + -5.13027851e-4 * ta * ws * e * e * e * e
            + 1.02449757e-4 * ws * ws * e * e * e * e
            + -1.48526421e-3 * d * e * e * e * e
            + -4.11469183e-5 * ta * d * e * e * e * e
            + -6.80434415e-6 * ws * d * e * e * e * e
            + -9.77675906e-6 * d * d * e * e * e * e
            + 8.82773108e-2 * e * e * e * e * e
            + -3.01859306e-3 * ta * e * e * e * e * e
            + 1.04452989e-3 * ws * e * e * e * e * e
            + 2.47090539e-4 * d * e * e * e * e * e
            + 1.48348065e-3 * e * e * e * e * e * e,
    )
}
