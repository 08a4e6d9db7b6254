//! Season analytics.
//!
//! This module folds the per-gameweek season table into season aggregates,
//! derives head-to-head, streak, chip, loyalty, position, counterfactual and
//! similarity tables, forecasts upcoming points and picks the season awards.
//! [`analyzer::analyze`] runs the whole pipeline and writes the results.

pub mod aggregate;
pub mod analyzer;
pub mod awards;
pub mod captains;
pub mod chips;
pub mod correlation;
pub mod forecast;
pub mod h2h;
pub mod loyalty;
pub mod positions;
pub mod streaks;
pub mod transfers;
pub mod types;
pub mod utility;
pub mod what_if;
