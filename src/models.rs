//
// models.rs
// dicom-suite
//
// Serializable data structures shared by the inspection and pixel reports.
//
// Thales Matheus Mendonça Santos - March 2026

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lightweight fields shown in command output and scan indexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicMetadata {
    pub patient_name: Option<String>,
    pub patient_id: Option<String>,
    pub study_date: Option<String>,
    pub modality: Option<String>,
    pub sop_class_uid: Option<String>,
    pub has_pixel_data: bool,
    pub transfer_syntax: Option<String>,
    pub rows: Option<u32>,
    pub columns: Option<u32>,
}

/// Expanded, categorized metadata used by the tags report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedMetadata {
    pub patient: BTreeMap<String, String>,
    pub study: BTreeMap<String, String>,
    pub image: BTreeMap<String, String>,
    pub misc: BTreeMap<String, String>,
}

/// High-level validation report for required attributes and pixel presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub valid: bool,
    pub missing_tags: Vec<String>,
    pub has_pixel_data: bool,
}

/// Aggregate statistics over rescaled pixel values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixelStatistics {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub median: f32,
    pub std_dev: f32,
    pub total_pixels: usize,
    pub shape: Vec<usize>,
}

/// Histogram buckets alongside the observed range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixelHistogram {
    pub bins: Vec<u64>,
    pub min: f32,
    pub max: f32,
}
