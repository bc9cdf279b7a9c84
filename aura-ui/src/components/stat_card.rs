//! Stat Card Component
//!
//! Dashboard summary card with a trend badge.

use leptos::*;

use aura::health::StatCard;

#[component]
pub fn StatCardView(card: StatCard) -> impl IntoView {
    let (arrow, trend_class) = if card.trend_up {
        ("▲", "text-[#00d68f]")
    } else {
        ("▼", "text-[#ff3d3d]")
    };

    view! {
        <div
            class="bg-[#0f1629] rounded-xl p-5 border border-[#1a2744]"
            style=format!("border-top: 3px solid {}", card.color)
        >
            <p class="text-sm text-gray-400">{card.label}</p>
            <div class="flex items-end justify-between mt-2">
                <span class="text-2xl font-bold">{card.value}</span>
                <span class=format!("text-sm font-medium {}", trend_class)>
                    {format!("{} {}", arrow, card.trend)}
                </span>
            </div>
        </div>
    }
}
