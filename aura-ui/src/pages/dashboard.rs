//! Dashboard Page
//!
//! Greeting, health snapshot, activity and risk charts.

use leptos::*;
use leptos_router::*;

use aura::health::{DASHBOARD_STATS, FLAGGED_CHROMOSOMES};
use aura::routing::Route as Page;
use aura::visual::dashboard_chromosomes;

use crate::api;
use crate::components::{ActivityChart, ChromosomeGrid, DonutChart, HeartBeat, StatCardView};
use crate::state::use_app_state;

#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_app_state();
    let name = move || {
        state
            .session
            .with(|s| s.user().map(|u| u.display_name().to_string()))
            .unwrap_or_else(|| "User".to_string())
    };
    let has_result = api::load_result().is_some();

    view! {
        <div class="container mx-auto px-4 py-8 space-y-8">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">{move || format!("Hello, {}", name())}</h1>
                    <p class="text-gray-400 mt-1">"Your genomic health at a glance"</p>
                </div>
                <HeartBeat />
            </div>

            <section class="grid grid-cols-2 md:grid-cols-4 gap-4">
                {DASHBOARD_STATS
                    .iter()
                    .map(|card| view! { <StatCardView card=*card /> })
                    .collect_view()}
            </section>

            <div class="grid md:grid-cols-2 gap-8">
                <section class="bg-[#0f1629] rounded-xl p-6 border border-[#1a2744]">
                    <h2 class="text-xl font-semibold mb-4">"Weekly Activity"</h2>
                    <ActivityChart />
                </section>

                <section class="bg-[#0f1629] rounded-xl p-6 border border-[#1a2744]">
                    <h2 class="text-xl font-semibold mb-4">"Risk Distribution"</h2>
                    <DonutChart />
                </section>
            </div>

            <section class="bg-[#0f1629] rounded-xl p-6 border border-[#1a2744]">
                <div class="flex items-center justify-between mb-4">
                    <h2 class="text-xl font-semibold">"Chromosome Analysis"</h2>
                    <span class="text-sm text-gray-400">
                        {format!("{} regions flagged", FLAGGED_CHROMOSOMES.len())}
                    </span>
                </div>
                <ChromosomeGrid cells=dashboard_chromosomes() />
            </section>

            <section class="grid md:grid-cols-2 gap-4">
                <A href=Page::Upload.path() class="bg-[#0077cc] hover:bg-[#1a9bff] rounded-xl p-6 font-medium">
                    "🧬 Upload genomic data"
                </A>
                {has_result.then(|| view! {
                    <A href=Page::Results.path() class="bg-[#0f1629] hover:border-[#0077cc] border border-[#1a2744] rounded-xl p-6 font-medium">
                        "📊 View latest results"
                    </A>
                })}
            </section>
        </div>
    }
}
