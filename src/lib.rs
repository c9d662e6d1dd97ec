//! # PFI Rust Backend
//!
//! Backend service for the Paddy Field Insights (PFI) dashboard.
//!
//! This crate drives a single-page dashboard for paddy-field mapping and NDVI
//! analysis over Sentinel-2 imagery. All heavy computation (cloud masking,
//! NDVI, classification, spatial reduction) runs on a remote geospatial
//! compute service; this backend constructs the aggregation pipelines,
//! resolves the fixed catalog of map layers, post-processes the returned
//! time-series table and serves everything to the frontend over a REST API
//! via Axum.
//!
//! ## Features
//!
//! - **Asset Catalog**: Fixed set of classification/threshold layers with
//!   display parameters and legends, resolved once per process
//! - **Time Series**: Server-side mean-NDVI-per-date aggregation over the
//!   study region for an arbitrary date range
//! - **Statistics**: Descriptive statistics (mean/median/min/max) over a
//!   computed series
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Data Transfer Objects (DTOs) and identifier newtypes
//! - [`models`]: Core domain types (region, date range, series)
//! - [`remote`]: Narrow client interface to the remote compute service,
//!   with swappable backends behind cargo features
//! - [`catalog`]: The fixed layer catalog and resolved asset registry
//! - [`services`]: High-level business logic (series computation, statistics)
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod catalog;
pub mod models;
pub mod remote;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
