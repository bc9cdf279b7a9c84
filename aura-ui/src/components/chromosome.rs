//! Chromosome icons

use leptos::*;

use aura::visual::{chromosome_label, ChromosomeCell, ChromosomeStyle};

/// One chromosome: two chromatids pinched at the centromere
#[component]
pub fn Chromosome(
    number: u8,
    #[prop(default = false)]
    active: bool,
    #[prop(default = 40)]
    width: u32,
) -> impl IntoView {
    let style = ChromosomeStyle::for_state(active);
    let gradient_id = format!("chr-gradient-{}", number);
    let fill = format!("url(#{})", gradient_id);
    let height = width * 2;

    view! {
        <div class="flex flex-col items-center" style=format!("opacity: {}", style.opacity)>
            <svg width=width height=height viewBox="0 0 40 80">
                <defs>
                    <linearGradient id=gradient_id x1="0" y1="0" x2="0" y2="1">
                        <stop offset="0%" stop-color=style.edge />
                        <stop offset="50%" stop-color=style.middle />
                        <stop offset="100%" stop-color=style.edge />
                    </linearGradient>
                </defs>
                <rect x="6" y="2" width="12" height="34" rx="6" fill=fill.clone() />
                <rect x="22" y="2" width="12" height="34" rx="6" fill=fill.clone() />
                <rect x="6" y="44" width="12" height="34" rx="6" fill=fill.clone() />
                <rect x="22" y="44" width="12" height="34" rx="6" fill=fill />
                <ellipse cx="20" cy="40" rx="9" ry="5" fill=style.centromere />
            </svg>
            <span class="text-[10px] mt-1 tracking-wider" style=format!("color: {}", style.label)>
                {chromosome_label(number)}
            </span>
        </div>
    }
}

#[component]
pub fn ChromosomeGrid(
    cells: Vec<ChromosomeCell>,
    #[prop(default = 28)]
    width: u32,
) -> impl IntoView {
    view! {
        <div class="grid grid-cols-6 md:grid-cols-12 gap-3">
            {cells
                .into_iter()
                .map(|cell| view! { <Chromosome number=cell.number active=cell.active width=width /> })
                .collect_view()}
        </div>
    }
}
