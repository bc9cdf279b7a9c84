//! Chart Components
//!
//! Small SVG charts: line series, weekly activity bars, the risk
//! distribution donut and the per-risk score bars.

use leptos::*;

use aura::analysis::RiskBar;
use aura::health::{risk_slice_angles, WEEKLY_ACTIVITY};

const VIEW_WIDTH: f64 = 300.0;
const VIEW_HEIGHT: f64 = 100.0;

/// Polyline points for `values` scaled into the chart box, with a
/// little headroom above and below
fn line_points(values: &[f64], width: f64, height: f64) -> String {
    if values.is_empty() {
        return String::new();
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };
    let step = if values.len() > 1 {
        width / (values.len() - 1) as f64
    } else {
        0.0
    };

    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = i as f64 * step;
            let y = height - 5.0 - (v - min) / span * (height - 10.0);
            format!("{:.1},{:.1}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// SVG path for a donut slice from `start` sweeping `sweep` degrees
fn arc_path(cx: f64, cy: f64, r: f64, start: f64, sweep: f64) -> String {
    let point = |deg: f64| {
        let rad = (deg - 90.0).to_radians();
        (cx + r * rad.cos(), cy + r * rad.sin())
    };
    // A full circle cannot be drawn as one arc
    let sweep = sweep.min(359.99);
    let (x1, y1) = point(start);
    let (x2, y2) = point(start + sweep);
    let large = if sweep > 180.0 { 1 } else { 0 };

    format!(
        "M {:.2} {:.2} A {r} {r} 0 {large} 1 {:.2} {:.2}",
        x1, y1, x2, y2
    )
}

/// Line chart of a daily series
#[component]
pub fn LineChart(
    values: Vec<f64>,
    #[prop(default = "#0077cc")]
    color: &'static str,
) -> impl IntoView {
    let points = line_points(&values, VIEW_WIDTH, VIEW_HEIGHT);

    view! {
        <svg viewBox=format!("0 0 {} {}", VIEW_WIDTH, VIEW_HEIGHT) preserveAspectRatio="none" class="w-full h-48">
            <polyline
                points=points
                fill="none"
                stroke=color
                stroke-width="2"
                stroke-linejoin="round"
                vector-effect="non-scaling-stroke"
            />
        </svg>
    }
}

/// Steps per weekday as bars
#[component]
pub fn ActivityChart() -> impl IntoView {
    let max = WEEKLY_ACTIVITY.iter().map(|d| d.steps).max().unwrap_or(1) as f64;
    let slot = VIEW_WIDTH / WEEKLY_ACTIVITY.len() as f64;

    view! {
        <svg viewBox=format!("0 0 {} {}", VIEW_WIDTH, VIEW_HEIGHT + 14.0) class="w-full h-56">
            {WEEKLY_ACTIVITY
                .iter()
                .enumerate()
                .map(|(i, day)| {
                    let h = day.steps as f64 / max * VIEW_HEIGHT;
                    let x = i as f64 * slot + slot * 0.2;
                    view! {
                        <g>
                            <rect x=x y={VIEW_HEIGHT - h} width={slot * 0.6} height=h rx="3" fill="#0077cc" />
                            <text
                                x={x + slot * 0.3} y={VIEW_HEIGHT + 11.0}
                                text-anchor="middle" font-size="8" fill="#8899aa"
                            >
                                {day.day}
                            </text>
                        </g>
                    }
                })
                .collect_view()}
        </svg>
    }
}

/// Risk distribution donut with legend
#[component]
pub fn DonutChart() -> impl IntoView {
    let mut start = 0.0;
    let slices = risk_slice_angles()
        .into_iter()
        .map(|(slice, sweep)| {
            let path = arc_path(60.0, 60.0, 45.0, start, sweep);
            start += sweep;
            view! {
                <path d=path fill="none" stroke=slice.color stroke-width="18" />
            }
        })
        .collect_view();

    view! {
        <div class="flex items-center space-x-6">
            <svg viewBox="0 0 120 120" class="w-40 h-40">{slices}</svg>
            <div class="space-y-2">
                {risk_slice_angles()
                    .into_iter()
                    .map(|(slice, _)| view! {
                        <div class="flex items-center space-x-2 text-sm">
                            <span class="w-3 h-3 rounded-full" style=format!("background-color: {}", slice.color) />
                            <span class="text-gray-300">{slice.name}</span>
                            <span class="text-gray-500">{format!("{}%", slice.value)}</span>
                        </div>
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

/// Horizontal bars, one per identified risk, 0-100 scale
#[component]
pub fn RiskBarChart(bars: Vec<RiskBar>) -> impl IntoView {
    view! {
        <div class="space-y-3">
            {bars
                .into_iter()
                .map(|bar| view! {
                    <div>
                        <div class="flex justify-between text-sm mb-1">
                            <span class="text-gray-300">{bar.name}</span>
                            <span class="text-gray-400">{format!("{:.0}", bar.score)}</span>
                        </div>
                        <div class="h-2 bg-[#1a2744] rounded-full">
                            <div
                                class="h-2 rounded-full"
                                style=format!("width: {:.1}%; background-color: {}", bar.score.clamp(0.0, 100.0), bar.color)
                            />
                        </div>
                    </div>
                })
                .collect_view()}
        </div>
    }
}
