//! Animated DNA helix for the landing and upload views.

use leptos::*;

use aura::visual::{helix_rungs, DEFAULT_HELIX_RUNGS};

#[component]
pub fn DnaHelix(
    #[prop(default = 200.0)]
    size: f64,
    #[prop(default = DEFAULT_HELIX_RUNGS)]
    rungs: usize,
) -> impl IntoView {
    let view_box = format!("0 0 {size} {size}");

    view! {
        <svg width=size height=size viewBox=view_box class="mx-auto">
            {helix_rungs(size, rungs)
                .into_iter()
                .map(|rung| {
                    let style = format!("animation-delay: {:.2}s", rung.delay);
                    view! {
                        <g class="helix-rung" style=style>
                            <line
                                x1=rung.x1 y1=rung.y x2=rung.x2 y2=rung.y
                                stroke="#1a9bff" stroke-width="1" stroke-opacity="0.5"
                            />
                            <circle cx=rung.x1 cy=rung.y r="3" fill="#0077cc" />
                            <circle cx=rung.x2 cy=rung.y r="3" fill="#00d68f" />
                        </g>
                    }
                })
                .collect_view()}
        </svg>
    }
}
