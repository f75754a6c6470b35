#![allow(clippy::too_many_arguments)]

//! Outdoor heat-stress indices from standard meteorological measurements.
//!
//! The centrepiece is the wet-bulb globe temperature of Liljegren et al.
//! (2008), which predicts the globe and natural wet-bulb temperatures with
//! iterative energy balances fed by a solar-geometry engine. Supporting
//! indices (humidex, net effective temperature, UTCI) and the underlying
//! moist-air property functions are exported alongside.

pub mod core;

#[macro_use]
extern crate is_close;

pub use crate::core::energy_balance::{
    globe_temperature, natural_wet_bulb_temperature, psychrometric_wet_bulb_temperature,
    NonConvergenceError,
};
pub use crate::core::indices::{humidex, mean_radiant_temperature, net_effective_temperature, utci};
pub use crate::core::properties::{
    dew_point, dew_point_from_relative_humidity, relative_humidity, saturation_vapour_pressure,
    Phase,
};
pub use crate::core::solar::{
    cosine_zenith_angle, cosine_zenith_angle_hourly, direct_beam_fraction, solar_adjustment,
    solar_hour_angle, solar_position, DateSpec, SolarAdjustment, SolarPosition, SolarPositionError,
};
pub use crate::core::wbgt::{wbgt, Observation, WbgtResult};
pub use crate::core::wind::{estimate_2m_wind_speed, stability_class};
