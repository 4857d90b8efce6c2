//! Soundwave library - longitudinal sound wave simulation and rendering

pub mod cli;
pub mod controls;
pub mod error;
pub mod field;
pub mod params;
pub mod readout;
pub mod rendering;
pub mod scene;
pub mod simulation;
pub mod wave;
