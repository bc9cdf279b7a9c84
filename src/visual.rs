//! Geometry for the decorative graphics: DNA helix, chromosome icons and
//! the heartbeat pulse. Rendering lives in the UI; this is just the math.

use std::f64::consts::PI;

use crate::health::{CURRENT_HEART_RATE, FLAGGED_CHROMOSOMES};

pub const DEFAULT_HELIX_RUNGS: usize = 50;

/// Human chromosome pairs drawn in the panels
pub const CHROMOSOME_COUNT: u8 = 23;

/// One rung of the helix: two strand points at the same height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelixRung {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
    /// Animation stagger, seconds
    pub delay: f64,
}

/// Rungs for a helix drawn in a `size` x `size` box.
///
/// Rung `i` sits at angle `i/n * 4pi` (two full turns), radius `size/8`.
pub fn helix_rungs(size: f64, rungs: usize) -> Vec<HelixRung> {
    let radius = size / 8.0;
    let n = rungs.max(1) as f64;

    (0..rungs)
        .map(|i| {
            let frac = i as f64 / n;
            let t = frac * PI * 4.0;
            HelixRung {
                x1: size / 2.0 + radius * t.cos(),
                x2: size / 2.0 - radius * t.cos(),
                y: frac * size,
                delay: i as f64 * 0.02,
            }
        })
        .collect()
}

/// Seconds per beat. Non-positive (or non-finite) bpm falls back to 72.
pub fn beat_period_secs(bpm: f64) -> f64 {
    let bpm = if bpm.is_finite() && bpm > 0.0 {
        bpm
    } else {
        CURRENT_HEART_RATE as f64
    };
    60.0 / bpm
}

/// SVG path of the heart glyph (24x24 viewBox)
pub const HEART_PATH: &str = "M12 21.35l-1.45-1.32C5.4 15.36 2 12.28 2 8.5 2 5.42 4.42 3 7.5 3c1.74 0 3.41.81 4.5 2.09C13.09 3.81 14.76 3 16.5 3 19.58 3 22 5.42 22 8.5c0 3.78-3.4 6.86-8.55 11.54L12 21.35z";

/// Colors for one chromosome icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromosomeStyle {
    /// Gradient ends
    pub edge: &'static str,
    /// Gradient middle
    pub middle: &'static str,
    pub centromere: &'static str,
    pub label: &'static str,
    pub opacity: &'static str,
}

impl ChromosomeStyle {
    pub fn for_state(active: bool) -> Self {
        if active {
            Self {
                edge: "#00d68f",
                middle: "#0077cc",
                centromere: "#00d68f",
                label: "#00d68f",
                opacity: "1",
            }
        } else {
            Self {
                edge: "#1a9bff",
                middle: "#4db1ff",
                centromere: "#0077cc",
                label: "#4db1ff",
                opacity: "0.6",
            }
        }
    }
}

/// `CHR 7`
pub fn chromosome_label(number: u8) -> String {
    format!("CHR {}", number)
}

/// One chromosome in a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromosomeCell {
    pub number: u8,
    pub active: bool,
}

/// Landing grid: every fifth chromosome flagged, starting with the first
pub fn landing_chromosomes() -> Vec<ChromosomeCell> {
    (0..CHROMOSOME_COUNT)
        .map(|i| ChromosomeCell {
            number: i + 1,
            active: i % 5 == 0,
        })
        .collect()
}

/// Dashboard panel with the flagged chromosomes highlighted
pub fn dashboard_chromosomes() -> Vec<ChromosomeCell> {
    (1..=CHROMOSOME_COUNT)
        .map(|number| ChromosomeCell {
            number,
            active: FLAGGED_CHROMOSOMES.contains(&number),
        })
        .collect()
}
