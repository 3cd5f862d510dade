//! Overlay pipeline driver core for the video output unit.
//!
//! The VPU scans out up to two overlay planes, blends them and feeds the
//! result through a fixed RGB to YUV conversion stage. We handle the
//! following features:
//!
//! - OSD1/OSD2 RGB565/RGB888/xRGB8888 scanout
//! - RGB conversion to x/cb/cr on both overlay paths
//! - Commit on vsync with per-register-group dirty tracking
//! - Fast update path for the cursor overlay (OSD2)
//!
//! What is missing:
//!
//! - YUV 4:2:2 scanout
//! - Colorkey alpha matching
//! - Big endian scanout
//! - X/Y reverse scanout
//! - OSD scaling to support TV overscan
//!
//! All register traffic goes through the [`regio::RegisterFile`] trait, so
//! the same commit engine drives mapped hardware and the RAM-backed register
//! file used by the test suite.

#![no_std]

pub mod hw;
pub mod matrix;
pub mod pipeline;
pub mod plane;
pub mod regio;
pub mod validate;
pub mod vsync;

pub use pipeline::{FifoConfig, Pipeline, PipelineConfig};
pub use plane::{Dirty, PlaneId, PlaneKind};
pub use regio::{MemRegs, MmioRegs, Reg, RegisterFile};
pub use validate::{validate, ApprovedUpdate};
