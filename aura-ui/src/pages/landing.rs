//! Landing Page
//!
//! Public entry point: what AURA does and how to get started.

use leptos::*;
use leptos_router::*;

use aura::routing::Route as Page;
use aura::upload::SUPPORTED_FORMATS;
use aura::visual::landing_chromosomes;

use crate::components::{ChromosomeGrid, DnaHelix};
use crate::state::use_app_state;

#[component]
pub fn Landing() -> impl IntoView {
    let state = use_app_state();
    let signed_in = move || state.session.with(|s| s.is_authenticated());

    view! {
        <div class="container mx-auto px-4 py-12 space-y-16">
            <section class="grid md:grid-cols-2 gap-12 items-center">
                <div class="space-y-6">
                    <h1 class="text-5xl font-bold leading-tight">
                        "Your genome, "
                        <span class="text-[#1a9bff]">"decoded"</span>
                    </h1>
                    <p class="text-lg text-gray-400">
                        "AURA analyzes your genomic data for disease risks and turns them into a personalized prevention plan."
                    </p>
                    <div class="flex space-x-4">
                        {move || {
                            if signed_in() {
                                view! {
                                    <A href=Page::Dashboard.path() class="px-6 py-3 bg-[#0077cc] hover:bg-[#1a9bff] rounded-lg font-medium">
                                        "Go to Dashboard"
                                    </A>
                                }.into_view()
                            } else {
                                view! {
                                    <A href=Page::Register.path() class="px-6 py-3 bg-[#0077cc] hover:bg-[#1a9bff] rounded-lg font-medium">
                                        "Get Started"
                                    </A>
                                    <A href=Page::Login.path() class="px-6 py-3 border border-[#1a2744] hover:border-[#0077cc] rounded-lg font-medium">
                                        "Sign In"
                                    </A>
                                }.into_view()
                            }
                        }}
                    </div>
                </div>
                <DnaHelix size=320.0 />
            </section>

            <section class="grid md:grid-cols-3 gap-6">
                <Feature icon="🧬" title="Genomic Analysis" text="Upload VCF, CSV, FASTA, PLINK or PDF lab reports." />
                <Feature icon="📊" title="Risk Insights" text="See each identified risk with its probability and severity." />
                <Feature icon="🛡️" title="Prevention Plans" text="Lifestyle and monitoring guidance for every risk." />
            </section>

            <section class="bg-[#0f1629] rounded-xl p-8 border border-[#1a2744]">
                <h2 class="text-xl font-semibold mb-6">"Chromosome Overview"</h2>
                <ChromosomeGrid cells=landing_chromosomes() />
            </section>

            <section>
                <h2 class="text-xl font-semibold mb-4">"Supported Formats"</h2>
                <div class="flex flex-wrap gap-3">
                    {SUPPORTED_FORMATS
                        .iter()
                        .map(|(name, description)| view! {
                            <span class="px-3 py-1 rounded-full bg-[#1a2744] text-sm" title=*description>
                                {*name}
                            </span>
                        })
                        .collect_view()}
                </div>
            </section>
        </div>
    }
}

#[component]
fn Feature(icon: &'static str, title: &'static str, text: &'static str) -> impl IntoView {
    view! {
        <div class="bg-[#0f1629] rounded-xl p-6 border border-[#1a2744]">
            <div class="text-3xl mb-3">{icon}</div>
            <h3 class="font-semibold mb-2">{title}</h3>
            <p class="text-sm text-gray-400">{text}</p>
        </div>
    }
}
