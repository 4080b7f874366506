//! package-model-mcp: parametric 3D geometry for leadless IC packages
//!
//! This library turns a small set of physical dimensions describing a QFN or
//! WSON package into a list of axis-aligned boxes (one body, N pads and an
//! optional exposed pad), names the part after the IPC-7351 convention, and
//! renders the boxes as a FreeCAD Python console script.
//!
//! # Architecture
//!
//! - **Geometry**: boxes with a centre position and a size, in millimetres, Z up
//! - **Packages**: one configuration type per family, each producing solids
//! - **Export**: FreeCAD script generation from any list of solids
//! - **MCP**: stdio server exposing the engine as tools
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Error types
//! - [`export`] - FreeCAD script export
//! - [`geometry`] - Solids and vectors
//! - [`mcp`] - MCP protocol implementation
//! - [`naming`] - Canonical part names
//! - [`packages`] - QFN and WSON package models

pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod mcp;
pub mod naming;
pub mod packages;
