//! Outdoor wet-bulb globe temperature from standard meteorological
//! measurements, after Liljegren et al. (2008),
//! <https://doi.org/10.1080/15459620802310770>.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::energy_balance::{globe_temperature, natural_wet_bulb_temperature};
use crate::core::solar::{solar_adjustment, DateSpec};
use crate::core::units::{celsius_to_kelvin, MIN_WIND_SPEED, MISSING_VALUE};
use crate::core::wind::{estimate_2m_wind_speed, stability_class, REFERENCE_HEIGHT};

/// Weights of the air, globe and natural wet-bulb temperatures in the WBGT
/// sum.
pub const AIR_TEMP_WEIGHT: f64 = 0.1;
pub const GLOBE_TEMP_WEIGHT: f64 = 0.2;
pub const NATURAL_WET_BULB_WEIGHT: f64 = 0.7;

/// One meteorological observation, as read from a station record or a
/// reanalysis grid point.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Observation {
    /// Date and time of the observation, UTC
    pub date: DateSpec,
    /// Degrees north latitude (-90 to 90)
    pub latitude: f64,
    /// Degrees east longitude (-180 to 180)
    pub longitude: f64,
    /// Total surface solar irradiance, W/m2
    pub solar: f64,
    /// Cosine of the solar zenith angle, if reported; derived from the solar
    /// position otherwise
    pub cza: Option<f64>,
    /// Fraction of the irradiance arriving as direct beam, if reported
    pub fdir: Option<f64>,
    /// Barometric pressure, hPa
    pub pressure: f64,
    /// Dry-bulb air temperature, deg C
    pub air_temp: f64,
    /// Relative humidity, %
    pub relative_humidity: f64,
    /// Wind speed, m/s, at `wind_speed_height`
    pub wind_speed: f64,
    /// Height of the wind-speed measurement, m (typically 10 m)
    pub wind_speed_height: f64,
    /// Vertical temperature difference across the wind-speed heights, upper
    /// minus lower, deg C
    pub vertical_temp_gradient: f64,
    /// Whether the site is in an urban area
    pub urban: bool,
}

impl Observation {
    /// Whether any field carries a missing-data marker (NaN or the -999
    /// sentinel common in meteorological archives).
    fn has_missing_data(&self) -> bool {
        fn missing(value: f64) -> bool {
            value.is_nan() || value == MISSING_VALUE
        }

        let date_missing = match self.date {
            DateSpec::CalendarDate { day, .. } => missing(day),
            DateSpec::DayOfYear { yday, .. } => missing(yday),
            DateSpec::DaysSince1900(days) => missing(days),
        };

        date_missing
            || [
                self.latitude,
                self.longitude,
                self.solar,
                self.cza.unwrap_or(0.),
                self.fdir.unwrap_or(0.),
                self.pressure,
                self.air_temp,
                self.relative_humidity,
                self.wind_speed,
                self.wind_speed_height,
                self.vertical_temp_gradient,
            ]
            .into_iter()
            .any(missing)
    }
}

/// Component temperatures behind a WBGT value, all in deg C. A component is
/// NaN when its energy-balance solver failed to converge.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct WbgtResult {
    /// Dry-bulb air temperature
    pub air_temp: f64,
    /// Globe temperature
    pub globe_temp: f64,
    /// Natural wet-bulb temperature
    pub natural_wet_bulb_temp: f64,
    /// Wet-bulb globe temperature
    pub wbgt: f64,
}

/// Outdoor wet-bulb globe temperature for one observation:
///
/// WBGT = 0.1 Tair + 0.2 Tglobe + 0.7 Tnwb
///
/// The globe and natural wet-bulb temperatures are predicted from the
/// meteorology by iterative energy balances; the irradiance is first made
/// consistent with the solar geometry and the wind speed is brought to the
/// 2 m reference height.
///
/// Returns Ok(None) when the observation carries missing data, and an error
/// when the site or date is out of range. A component temperature is NaN when
/// its solver failed to converge, and so then is the WBGT.
pub fn wbgt(observation: &Observation) -> Result<Option<WbgtResult>> {
    if observation.has_missing_data() {
        return Ok(None);
    }

    let adjusted = solar_adjustment(
        observation.date,
        observation.latitude,
        observation.longitude,
        observation.solar,
        observation.cza,
        observation.fdir,
    )?;

    let speed = if is_close!(observation.wind_speed_height, REFERENCE_HEIGHT) {
        observation.wind_speed.max(MIN_WIND_SPEED)
    } else {
        let daytime = adjusted.cza > 0.;
        let class = stability_class(
            daytime,
            observation.wind_speed,
            adjusted.solar,
            observation.vertical_temp_gradient,
        );
        estimate_2m_wind_speed(
            observation.wind_speed,
            observation.wind_speed_height,
            class,
            observation.urban,
        )
    };

    let air_temp_k = celsius_to_kelvin(observation.air_temp)?;
    let rh = 0.01 * observation.relative_humidity;

    let globe_temp = globe_temperature(
        air_temp_k,
        rh,
        observation.pressure,
        speed,
        adjusted.solar,
        adjusted.fdir,
        adjusted.cza,
    )
    .unwrap_or_else(|e| {
        warn!("globe temperature did not converge: {e}");
        f64::NAN
    });

    let natural_wet_bulb_temp = natural_wet_bulb_temperature(
        air_temp_k,
        rh,
        observation.pressure,
        speed,
        adjusted.solar,
        adjusted.fdir,
        adjusted.cza,
    )
    .unwrap_or_else(|e| {
        warn!("natural wet-bulb temperature did not converge: {e}");
        f64::NAN
    });

    Ok(Some(WbgtResult {
        air_temp: observation.air_temp,
        globe_temp,
        natural_wet_bulb_temp,
        wbgt: AIR_TEMP_WEIGHT * observation.air_temp
            + GLOBE_TEMP_WEIGHT * globe_temp
            + NATURAL_WET_BULB_WEIGHT * natural_wet_bulb_temp,
    }))
}
