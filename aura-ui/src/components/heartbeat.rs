//! Pulsing heart glyph; one pulse per beat.

use leptos::*;

use aura::health::CURRENT_HEART_RATE;
use aura::visual::{beat_period_secs, HEART_PATH};

#[component]
pub fn HeartBeat(
    #[prop(default = CURRENT_HEART_RATE as f64)]
    bpm: f64,
    #[prop(default = 48)]
    size: u32,
) -> impl IntoView {
    let style = format!("animation-duration: {:.3}s", beat_period_secs(bpm));

    view! {
        <div class="flex items-center space-x-3">
            <svg width=size height=size viewBox="0 0 24 24" class="heartbeat" style=style>
                <path d=HEART_PATH fill="#ff3d3d" />
            </svg>
            <div>
                <div class="text-2xl font-bold">{format!("{:.0}", bpm)}</div>
                <div class="text-xs text-gray-400 tracking-wider">"BPM"</div>
            </div>
        </div>
    }
}
