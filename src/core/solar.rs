//! Solar geometry: apparent sun position from the Astronomical Almanac 1990
//! series (valid for the years 1950-2049), zenith-angle cosines, and the
//! direct-beam/irradiance consistency adjustment used by the WBGT calculation.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use thiserror::Error;

/// Earth mean atmospheric temperature at sea level, deg C (used by the
/// refraction correction).
const MEAN_SEA_LEVEL_TEMP: f64 = 15.;
/// Earth mean atmospheric pressure at sea level, hPa.
const MEAN_SEA_LEVEL_PRESSURE: f64 = 1013.25;

/// Altitude at which the two refraction regimes of the A.A. 1990 agree at
/// standard temperature and pressure. Using this instead of the tabulated 15
/// degrees keeps refraction continuous over the whole altitude range (maximum
/// residual 3.6 arc seconds at 15 degrees).
const REFRACTION_CROSSOVER_ALTITUDE: f64 = 19.225;

/// Sentinel standing in for an overflowing tangent within 1e-5 degrees of the
/// zenith or nadir. 1.57079615 radians is 89.99999 degrees.
const TAN_ALT_OVERFLOW: f64 = 6.0e6;

/// Solar constant, W/m2.
const SOLAR_CONSTANT: f64 = 1367.0;
/// Zenith cosines below this value put the sun at least partly below the
/// horizon, so the top-of-atmosphere irradiance is zeroed.
const CZA_MIN: f64 = 0.00873;
/// Realism ceiling on measured irradiance normalised by top-of-atmosphere
/// irradiance, absorbing solar-sensor calibration error.
const NORMSOLAR_MAX: f64 = 0.85;

/// Ratio of the mean solar day to the mean sidereal day (1990 value; the
/// change is under 0.001 s per century).
const SIDEREAL_RATE: f64 = 1.00273790934;

/// Cumulative days before the first of each month in a non-leap year.
const DAYS_BEFORE_MONTH: [u32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Date of an observation, in UTC. The three encodings match the forms in
/// which meteorological archives report time; exactly one is used per call.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub enum DateSpec {
    /// Gregorian calendar date; `day` carries the time of day as a fraction,
    /// e.g. 4.5 is noon UTC on the 4th.
    CalendarDate { year: i32, month: u32, day: f64 },
    /// Year plus fractional day of year (Jan 1 = 1).
    DayOfYear { year: i32, yday: f64 },
    /// Days since 1900 January 0 at 00:00:00 UT; 18262.0 (1950/01/00) through
    /// 54788.0 (2049/12/32) covers the supported window.
    DaysSince1900(f64),
}

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum SolarPositionError {
    #[error("latitude {0} is outside the range -90 to 90 degrees")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside the range -180 to 180 degrees")]
    LongitudeOutOfRange(f64),
    #[error("date is outside the 1950-2049 window supported by the Astronomical Almanac series")]
    DateOutOfRange,
}

/// Apparent position of the sun for a site and instant.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct SolarPosition {
    /// Apparent solar right ascension, hours (0 to 24)
    pub right_ascension: f64,
    /// Apparent solar declination, degrees (-90 to 90)
    pub declination: f64,
    /// Solar altitude, degrees, with the refraction correction applied
    pub altitude: f64,
    /// Refraction correction that was added to the altitude, degrees (>= 0)
    pub refraction: f64,
    /// Solar azimuth, degrees (0 to 360, east is 90)
    pub azimuth: f64,
    /// Distance of the sun from the earth, astronomical units
    pub distance: f64,
}

/// Surface irradiance made consistent with the solar geometry for the
/// observation instant.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct SolarAdjustment {
    /// Adjusted surface solar irradiance, W/m2
    pub solar: f64,
    /// Cosine of the solar zenith angle (0 to 1)
    pub cza: f64,
    /// Fraction of the irradiance arriving as direct beam (0 to 0.9)
    pub fdir: f64,
}

/// Sequential day number of a Gregorian calendar date within its year
/// (Jan 1 = 1, Dec 31 = 365 or 366).
pub fn day_of_year(year: i32, month: u32, day: u32) -> u32 {
    let mut dnum = DAYS_BEFORE_MONTH[(month - 1) as usize] + day;
    if is_leap_year(year) && month > 2 {
        dnum += 1;
    }
    dnum
}

/// Leap years are divisible by 4, except centurial years not divisible by 400
/// (2000 was a leap year, 1900 was not).
fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days since the J2000 epoch (with day fraction), Julian centuries since
/// J2000 at 0h UT of the date, and UT hours since midnight.
fn days_since_j2000(date: DateSpec) -> Result<(f64, f64, f64), SolarPositionError> {
    match date {
        DateSpec::CalendarDate { year, month, day } => {
            if !(1950..=2049).contains(&year) {
                return Err(SolarPositionError::DateOutOfRange);
            }
            if !(1..=12).contains(&month) || !(0.0..=33.0).contains(&day) {
                return Err(SolarPositionError::DateOutOfRange);
            }
            let daynumber = day_of_year(year, month, day.floor() as u32);
            Ok(j2000_from_year_and_daynumber(year, daynumber as f64, day))
        }
        DateSpec::DayOfYear { year, yday } => {
            if !(1950..=2049).contains(&year) {
                return Err(SolarPositionError::DateOutOfRange);
            }
            if !(0.0..=368.0).contains(&yday) {
                return Err(SolarPositionError::DateOutOfRange);
            }
            Ok(j2000_from_year_and_daynumber(year, yday.floor(), yday))
        }
        DateSpec::DaysSince1900(days_1900) => {
            // A.A. 1990, K2-K4: acceptable range covers 1950 through 2049.
            if !(18262.0..=54788.0).contains(&days_1900) {
                return Err(SolarPositionError::DateOutOfRange);
            }
            // days_1900 is 36524 for 2000/01/00; J2000 is 2000/01/01.5
            let ut_hours = (days_1900 - days_1900.floor()) * 24.;
            let cent_j2000 = (days_1900.floor() - 36525.5) / 36525.0;
            Ok((days_1900 - 36525.5, cent_j2000, ut_hours))
        }
    }
}

fn j2000_from_year_and_daynumber(year: i32, daynumber: f64, day_fraction: f64) -> (f64, f64, f64) {
    let delta_years = (year - 2000) as f64;
    // whole days from 2000/01/00 (1900s are negative)
    let mut delta_days = (delta_years * 365. + delta_years / 4. + daynumber).floor();
    if year > 2000 {
        delta_days += 1.; // J2000 is 2000/01/01.5
    }
    let days_at_midnight = delta_days - 1.5;
    let cent_j2000 = days_at_midnight / 36525.0;
    let ut = day_fraction - day_fraction.floor();

    (days_at_midnight + ut, cent_j2000, ut * 24.)
}

/// Apparent solar position from the Astronomical Almanac of 1990, accurate to
/// 0.1 arc minutes for refraction at altitudes of at least 15 degrees.
///
/// Arguments:
/// * `date` - observation date/time, UTC
/// * `latitude` - degrees north latitude (-90 to 90)
/// * `longitude` - degrees east longitude (-180 to 180)
pub fn solar_position(
    date: DateSpec,
    latitude: f64,
    longitude: f64,
) -> Result<SolarPosition, SolarPositionError> {
    if !(-90. ..=90.).contains(&latitude) {
        return Err(SolarPositionError::LatitudeOutOfRange(latitude));
    }
    if !(-180. ..=180.).contains(&longitude) {
        return Err(SolarPositionError::LongitudeOutOfRange(longitude));
    }

    let (days_j2000, cent_j2000, ut_hours) = days_since_j2000(date)?;

    // A.A. 1990, C24: mean anomaly and mean longitude, reduced mod 360 and
    // converted to radians
    let mean_anomaly = (357.528 + 0.9856003 * days_j2000).rem_euclid(360.).to_radians();
    let mean_longitude = (280.460 + 0.9856474 * days_j2000).rem_euclid(360.).to_radians();

    let mean_obliquity = (23.439 - 4.0e-7 * days_j2000).to_radians();
    let ecliptic_long = (1.915 * mean_anomaly.sin() + 0.020 * (2.0 * mean_anomaly).sin())
        .to_radians()
        + mean_longitude;

    let distance =
        1.00014 - 0.01671 * mean_anomaly.cos() - 0.00014 * (2.0 * mean_anomaly).cos();

    // tangent of the ecliptic longitude separated into sine and cosine parts
    // so the arctangent lands in the right quadrant; then reduce from radians
    // to the range 0 -> 24 hours
    let right_ascension = (mean_obliquity.cos() * ecliptic_long.sin())
        .atan2(ecliptic_long.cos())
        .rem_euclid(TAU)
        / TAU
        * 24.;

    let declination = (mean_obliquity.sin() * ecliptic_long.sin()).asin();

    // Greenwich mean sidereal time at 0h UT, seconds; Horner's method on the
    // A.A. 1990 (B6-B7) cubic
    let gmst0h =
        24110.54841 + cent_j2000 * (8640184.812866 + cent_j2000 * (0.093104 - cent_j2000 * 6.2e-6));

    let gmst0h = (gmst0h / 3600. / 24.).fract() * 24.;

    let lmst = (gmst0h + ut_hours * SIDEREAL_RATE + longitude / 15.0).rem_euclid(24.);

    // local mean hour angle, re-centred to -12 -> 12 hours
    let mut local_hour_angle = lmst - right_ascension;
    if local_hour_angle < -12.0 {
        local_hour_angle += 24.0;
    } else if local_hour_angle > 12.0 {
        local_hour_angle -= 24.0;
    }

    // altitude, azimuth and refraction, A.A. 1990, B61-B62
    let latitude_rad = latitude.to_radians();
    let local_hour_angle_rad = local_hour_angle / 24.0 * TAU;

    let (sin_apdec, cos_apdec) = declination.sin_cos();
    let (sin_lat, cos_lat) = latitude_rad.sin_cos();
    let cos_lha = local_hour_angle_rad.cos();

    let altitude_rad = (sin_apdec * sin_lat + cos_apdec * cos_lha * cos_lat).asin();
    let cos_alt = altitude_rad.cos();

    // avoid tangent overflow at altitudes of +-90 degrees
    let tan_alt = if altitude_rad.abs() < 1.57079615 {
        altitude_rad.tan()
    } else {
        TAN_ALT_OVERFLOW
    };

    let cos_az = (sin_apdec * cos_lat - cos_apdec * cos_lha * sin_lat) / cos_alt;
    let sin_az = -(cos_apdec * local_hour_angle_rad.sin() / cos_alt);
    let mut azimuth = cos_az.acos();
    if sin_az.atan2(cos_az) < 0.0 {
        azimuth = TAU - azimuth;
    }

    let declination = declination.to_degrees();
    let altitude = altitude_rad.to_degrees();
    let azimuth = azimuth.to_degrees();

    // Refraction calculated for altitudes of -1 degree or more allows for a
    // pressure of 1040 mb and temperature of -22 C; lower pressure and higher
    // temperature combinations yield less than 1 degree refraction.
    let refraction = if altitude < -1.0 || tan_alt == TAN_ALT_OVERFLOW {
        0.0
    } else if altitude < REFRACTION_CROSSOVER_ALTITUDE {
        (0.1594 + altitude * (0.0196 + 0.00002 * altitude)) * MEAN_SEA_LEVEL_PRESSURE
            / ((1.0 + altitude * (0.505 + 0.0845 * altitude))
                * (273.0 + MEAN_SEA_LEVEL_TEMP))
    } else {
        0.00452 * (MEAN_SEA_LEVEL_PRESSURE / (273.0 + MEAN_SEA_LEVEL_TEMP)) / tan_alt
    };

    Ok(SolarPosition {
        right_ascension,
        declination,
        altitude: altitude + refraction,
        refraction,
        azimuth,
        distance,
    })
}

/// Solar declination angle in degrees and the time-correction offset, from a
/// harmonic regression in the fractional-year angle.
///
/// Arguments:
/// * `yday` - day of year (Jan 1 = 1)
/// * `hour` - hour of day, 0-24 UTC
pub fn declination_time_correction(yday: f64, hour: f64) -> (f64, f64) {
    let mut g = (360. / 365.25) * (yday + hour / 24.);
    if g > 360. {
        g -= 360.;
    }
    let g = g.to_radians();

    let declination = 0.396372 - 22.91327 * g.cos() + 4.025430 * g.sin()
        - 0.387205 * (2. * g).cos()
        + 0.051967 * (2. * g).sin()
        - 0.154527 * (3. * g).cos()
        + 0.084798 * (3. * g).sin();

    let time_correction = 0.004297 + 0.107029 * g.cos()
        - 1.837877 * g.sin()
        - 0.837378 * (2. * g).cos()
        - 2.340475 * (2. * g).sin();

    (declination, time_correction)
}

/// Cosine of the solar zenith angle, clamped at 0 when the sun is below the
/// horizon. [`cosine_zenith_angle_hourly`] is more accurate for hourly data.
///
/// Arguments:
/// * `latitude` - degrees north latitude (-90 to 90)
/// * `longitude` - degrees east longitude (-180 to 180)
/// * `year`, `month`, `day` - Gregorian calendar date
/// * `hour` - hour of day, UTC (may carry a fraction)
pub fn cosine_zenith_angle(
    latitude: f64,
    longitude: f64,
    year: i32,
    month: u32,
    day: u32,
    hour: f64,
) -> f64 {
    let mut yday = day_of_year(year, month, day) as f64;
    let mut hour = hour;
    // quadrature nodes can fall just outside the day
    if hour < 0. {
        hour += 24.;
        yday -= 1.;
    } else if hour >= 24. {
        hour -= 24.;
        yday += 1.;
    }

    let (declination, time_correction) = declination_time_correction(yday, hour);

    let declination_rad = declination.to_radians();
    let latitude_rad = latitude.to_radians();

    let solar_hour_angle_rad =
        ((hour - 12.) * 15. + longitude + time_correction).to_radians();

    let cza = declination_rad.sin() * latitude_rad.sin()
        + declination_rad.cos() * latitude_rad.cos() * solar_hour_angle_rad.cos();

    cza.max(0.)
}

/// Cosine of the solar zenith angle averaged over the enclosing hour with
/// 3-point Gauss-Legendre quadrature. The instantaneous value
/// under-represents irradiance near sunrise and sunset; see Hogan and
/// Hirahara (2016). Only meaningful for hourly timesteps.
pub fn cosine_zenith_angle_hourly(
    latitude: f64,
    longitude: f64,
    year: i32,
    month: u32,
    day: u32,
    hour: f64,
) -> f64 {
    let half_width = 0.5;
    let nodes = [-(3.0f64 / 5.).sqrt(), 0., (3.0f64 / 5.).sqrt()];
    let weights = [5. / 9., 8. / 9., 5. / 9.];

    nodes
        .iter()
        .zip_eq(weights)
        .map(|(node, weight)| {
            weight
                * cosine_zenith_angle(
                    latitude,
                    longitude,
                    year,
                    month,
                    day,
                    hour + half_width * node,
                )
        })
        .sum::<f64>()
        / 2.
}

/// Solar hour angle in degrees, re-centred to the range -180 to 180.
///
/// Arguments:
/// * `year`, `month`, `day` - Gregorian calendar date
/// * `hour` - hour of day, 0-23 UTC
/// * `longitude` - degrees east longitude (-180 to 180)
pub fn solar_hour_angle(year: i32, month: u32, day: u32, hour: f64, longitude: f64) -> f64 {
    let yday = (day_of_year(year, month, day) - 1) as f64;
    let g = (TAU / 365.25) * (yday + hour / 24.);

    let time_correction = 0.004297 + 0.107029 * g.cos()
        - 1.837877 * g.sin()
        - 0.837378 * (2. * g).cos()
        - 2.340475 * (2. * g).sin();

    let sha = (hour - 12.) * 15. + longitude + time_correction;

    if sha > 180. {
        sha - 360.
    } else if sha < -180. {
        sha + 360.
    } else {
        sha
    }
}

/// Fraction of the surface solar irradiance due to the direct beam, from an
/// exponential regression in the irradiance normalised by its top-of-atmosphere
/// value (Liljegren 2008, eqns 13-14).
///
/// Arguments:
/// * `date` - observation date/time, UTC
/// * `latitude` - degrees north latitude (-90 to 90)
/// * `longitude` - degrees east longitude (-180 to 180)
/// * `solar` - total surface solar irradiance, W/m2
/// * `cza` - cosine of the solar zenith angle (0 to 1)
pub fn direct_beam_fraction(
    date: DateSpec,
    latitude: f64,
    longitude: f64,
    solar: f64,
    cza: f64,
) -> Result<f64, SolarPositionError> {
    let adjustment = solar_adjustment(date, latitude, longitude, solar, Some(cza), None)?;
    Ok(adjustment.fdir)
}

/// Adjusted surface solar irradiance, zenith-angle cosine and direct-beam
/// fraction for an observation. Supplied `cza`/`fdir` values are treated as
/// known and passed through (fdir clamped to 0-0.9); missing ones are derived
/// from the solar position. [`cosine_zenith_angle_hourly`] gives a
/// more-accurate cza for hourly data and should be supplied when available.
///
/// Arguments:
/// * `date` - observation date/time, UTC
/// * `latitude` - degrees north latitude (-90 to 90)
/// * `longitude` - degrees east longitude (-180 to 180)
/// * `solar` - measured total surface solar irradiance, W/m2
/// * `cza` - cosine of the solar zenith angle, if known
/// * `fdir` - fraction of irradiance due to direct beam, if known
pub fn solar_adjustment(
    date: DateSpec,
    latitude: f64,
    longitude: f64,
    solar: f64,
    cza: Option<f64>,
    fdir: Option<f64>,
) -> Result<SolarAdjustment, SolarPositionError> {
    let position = solar_position(date, latitude, longitude)?;

    let mut cza = cza
        .unwrap_or_else(|| (90. - position.altitude).to_radians().cos())
        .max(0.);

    // "Smax" in Liljegren eqn 14: the irradiance the site would receive with
    // the atmosphere removed
    let mut toasolar = SOLAR_CONSTANT * cza / (position.distance * position.distance);

    // if the sun is not fully above the horizon, set the top-of-atmosphere
    // irradiance to zero
    if cza < CZA_MIN {
        toasolar = 0.;
    }

    if toasolar > 0. {
        // account for any solar sensor calibration errors and make the
        // irradiance consistent with the normalised value ("S*", eqn 13)
        let normsolar = (solar / toasolar).min(NORMSOLAR_MAX);

        let fdir = if normsolar > 0. {
            fdir.unwrap_or_else(|| (3. - 1.34 * normsolar - 1.65 / normsolar).exp())
                .clamp(0., 0.9)
        } else {
            cza = 0.;
            0.
        };

        Ok(SolarAdjustment {
            solar: normsolar * toasolar,
            cza,
            fdir,
        })
    } else {
        Ok(SolarAdjustment {
            solar,
            cza: 0.,
            fdir: 0.,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(2020, 1, 1, 1)]
    #[case(2020, 3, 1, 61)] // leap year
    #[case(2019, 3, 1, 60)]
    #[case(2020, 7, 4, 186)]
    #[case(2020, 12, 31, 366)]
    #[case(2019, 12, 31, 365)]
    fn should_calc_day_of_year(
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(day_of_year(year, month, day), expected);
    }

    #[rstest]
    fn should_apply_centurial_leap_year_rule() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[fixture]
    fn midsummer_boston() -> SolarPosition {
        // noon UTC (morning local time) on 4 July 2020 in Boston
        solar_position(
            DateSpec::CalendarDate {
                year: 2020,
                month: 7,
                day: 4.5,
            },
            42.36,
            -71.06,
        )
        .unwrap()
    }

    #[rstest]
    fn should_return_position_fields_in_documented_ranges(midsummer_boston: SolarPosition) {
        assert!((0. ..24.).contains(&midsummer_boston.right_ascension));
        assert!((-90. ..=90.).contains(&midsummer_boston.declination));
        assert!((-90. ..=90.5).contains(&midsummer_boston.altitude));
        assert!((0. ..360.).contains(&midsummer_boston.azimuth));
        assert!(midsummer_boston.refraction >= 0.);
        // earth-sun distance stays within ~1.7% of 1 AU
        assert!((0.98..1.02).contains(&midsummer_boston.distance));
    }

    #[rstest]
    fn should_place_the_midsummer_sun_sensibly(midsummer_boston: SolarPosition) {
        // early July declination is near the June solstice maximum
        assert!((20.0..23.5).contains(&midsummer_boston.declination));
        // sun is up and to the east at 8am local time
        assert!(midsummer_boston.altitude > 20.);
        assert!((45.0..135.0).contains(&midsummer_boston.azimuth));
        // aphelion is in early July
        assert!(midsummer_boston.distance > 1.01);
    }

    #[rstest]
    fn date_encodings_should_agree() {
        let by_calendar = midsummer_boston();
        let by_yday = solar_position(
            DateSpec::DayOfYear {
                year: 2020,
                yday: 186.5,
            },
            42.36,
            -71.06,
        )
        .unwrap();
        // 2020/7/4 12:00 UT is 44016.5 days after 1900 January 0
        let by_days_1900 =
            solar_position(DateSpec::DaysSince1900(44016.5), 42.36, -71.06).unwrap();

        for other in [by_yday, by_days_1900] {
            assert_relative_eq!(by_calendar.altitude, other.altitude, max_relative = 1e-9);
            assert_relative_eq!(by_calendar.azimuth, other.azimuth, max_relative = 1e-9);
            assert_relative_eq!(by_calendar.distance, other.distance, max_relative = 1e-9);
        }
    }

    #[rstest]
    #[case(100., 0.)]
    #[case(-91., 0.)]
    fn should_reject_out_of_range_latitude(#[case] latitude: f64, #[case] longitude: f64) {
        assert_eq!(
            solar_position(
                DateSpec::CalendarDate {
                    year: 2020,
                    month: 7,
                    day: 4.5
                },
                latitude,
                longitude,
            ),
            Err(SolarPositionError::LatitudeOutOfRange(latitude))
        );
    }

    #[rstest]
    fn should_reject_out_of_range_longitude() {
        assert_eq!(
            solar_position(
                DateSpec::CalendarDate {
                    year: 2020,
                    month: 7,
                    day: 4.5
                },
                42.,
                181.,
            ),
            Err(SolarPositionError::LongitudeOutOfRange(181.))
        );
    }

    #[rstest]
    #[case(DateSpec::CalendarDate { year: 1949, month: 12, day: 31. })]
    #[case(DateSpec::CalendarDate { year: 2050, month: 1, day: 1. })]
    #[case(DateSpec::CalendarDate { year: 2020, month: 13, day: 1. })]
    #[case(DateSpec::DayOfYear { year: 2020, yday: 400. })]
    #[case(DateSpec::DaysSince1900(18261.))]
    #[case(DateSpec::DaysSince1900(54789.))]
    fn should_reject_out_of_range_dates(#[case] date: DateSpec) {
        assert_eq!(
            solar_position(date, 42., -71.),
            Err(SolarPositionError::DateOutOfRange)
        );
    }

    #[rstest]
    fn zenith_cosine_should_be_high_at_equatorial_equinox_noon() {
        assert!(cosine_zenith_angle(0., 0., 2020, 3, 20, 12.) > 0.95);
    }

    #[rstest]
    fn zenith_cosine_should_clamp_to_zero_at_night() {
        assert_eq!(cosine_zenith_angle(0., 0., 2020, 3, 20, 0.), 0.);
        assert_eq!(cosine_zenith_angle(45., 0., 2020, 12, 21, 22.), 0.);
    }

    #[rstest]
    fn zenith_cosine_should_never_be_negative() {
        for hour in 0..24 {
            for lat in [-60., -30., 0., 30., 60.] {
                assert!(cosine_zenith_angle(lat, 10., 2020, 6, 21, hour as f64) >= 0.);
                assert!(cosine_zenith_angle_hourly(lat, 10., 2020, 6, 21, hour as f64) >= 0.);
            }
        }
    }

    #[rstest]
    fn hourly_integral_should_track_instantaneous_value_at_midday() {
        let instantaneous = cosine_zenith_angle(30., -100., 2020, 7, 4, 18.);
        let integrated = cosine_zenith_angle_hourly(30., -100., 2020, 7, 4, 18.);
        assert_relative_eq!(instantaneous, integrated, max_relative = 0.02);
    }

    #[rstest]
    fn hourly_integral_should_exceed_instantaneous_value_at_sunrise() {
        // sunrise at this site and date is close to 11.8 UTC; the hour-average
        // sees sunlight the on-the-hour snapshot misses
        let instantaneous = cosine_zenith_angle(30., -100., 2020, 7, 4, 11.75);
        let integrated = cosine_zenith_angle_hourly(30., -100., 2020, 7, 4, 11.75);
        assert!(integrated > instantaneous);
    }

    #[rstest]
    fn solar_hour_angle_should_stay_in_range() {
        for hour in 0..24 {
            let sha = solar_hour_angle(2020, 7, 4, hour as f64, -100.);
            assert!((-180. ..=180.).contains(&sha));
        }
        // solar noon at ~100 degrees west is around 19h UTC
        assert!(solar_hour_angle(2020, 7, 4, 19., -100.).abs() < 10.);
    }

    #[rstest]
    fn direct_beam_fraction_should_stay_in_range() {
        let date = DateSpec::CalendarDate {
            year: 2020,
            month: 7,
            day: 4.75,
        };
        for solar in [0., 100., 400., 800., 1200.] {
            for cza in [0., 0.005, 0.2, 0.5, 1.] {
                let fdir = direct_beam_fraction(date, 30., -100., solar, cza).unwrap();
                assert!((0. ..=0.9).contains(&fdir), "fdir {fdir} out of range");
            }
        }
    }

    #[rstest]
    fn adjustment_should_zero_fdir_and_cza_below_the_horizon_cutoff() {
        let date = DateSpec::CalendarDate {
            year: 2020,
            month: 7,
            day: 4.75,
        };
        let adjustment = solar_adjustment(date, 30., -100., 500., Some(0.005), None).unwrap();
        assert_eq!(adjustment.fdir, 0.);
        assert_eq!(adjustment.cza, 0.);
        // measured irradiance passes through unadjusted
        assert_eq!(adjustment.solar, 500.);
    }

    #[rstest]
    fn adjustment_should_zero_fdir_when_no_irradiance_is_measured() {
        let date = DateSpec::CalendarDate {
            year: 2020,
            month: 7,
            day: 4.75,
        };
        let adjustment = solar_adjustment(date, 30., -100., 0., Some(0.5), None).unwrap();
        assert_eq!(adjustment.fdir, 0.);
        assert_eq!(adjustment.cza, 0.);
    }

    #[rstest]
    fn adjustment_should_cap_implausibly_high_irradiance() {
        let date = DateSpec::CalendarDate {
            year: 2020,
            month: 7,
            day: 4.75,
        };
        let adjustment = solar_adjustment(date, 30., -100., 2000., Some(0.9), None).unwrap();
        // adjusted irradiance is capped at 85% of top-of-atmosphere
        assert!(adjustment.solar < 2000.);
        assert!(adjustment.solar <= NORMSOLAR_MAX * SOLAR_CONSTANT * 0.9 / (0.98 * 0.98));
    }

    #[rstest]
    fn adjustment_should_pass_known_values_through() {
        let date = DateSpec::CalendarDate {
            year: 2020,
            month: 7,
            day: 4.75,
        };
        let adjustment = solar_adjustment(date, 30., -100., 600., Some(0.5), Some(0.5)).unwrap();
        assert_eq!(adjustment.cza, 0.5);
        assert_eq!(adjustment.fdir, 0.5);
    }
}
