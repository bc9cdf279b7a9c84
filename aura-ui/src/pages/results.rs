//! Results Page
//!
//! Renders the stored analysis. Without one the view redirects to upload
//! and renders nothing itself. Selecting a risk fetches its prevention
//! plan; only the plan for the latest selection is ever shown.

use leptos::*;
use leptos_router::*;

use aura::analysis::{
    open_results, AnalysisResult, PlanSelector, PlanState, ResultsEntry, Risk, RiskView,
};
use aura::routing::Route as Page;

use crate::api;
use crate::components::{InlineLoading, RiskBarChart};

#[component]
pub fn Results() -> impl IntoView {
    match open_results(api::load_result().as_deref()) {
        ResultsEntry::Render(result) => view! { <ResultsView result=result /> }.into_view(),
        ResultsEntry::Redirect(route) => view! { <Redirect path=route.path() /> }.into_view(),
    }
}

#[component]
fn ResultsView(result: AnalysisResult) -> impl IntoView {
    let selector = create_rw_signal(PlanSelector::new());

    let select = move |risk: Risk| {
        let mut request = None;
        selector.update(|s| request = Some(s.select(&risk)));
        let Some(request) = request else {
            return;
        };

        spawn_local(async move {
            let outcome = api::prevention_plan(&request.body).await;
            selector.update(|s| {
                if !s.resolve(request.generation, outcome) {
                    web_sys::console::log_1(&"Dropped prevention plan for an earlier selection".into());
                }
            });
        });
    };

    let info = result.file_info();
    let bars = result.risk_bars();
    let risks = result.identified_risks.clone();

    view! {
        <div class="container mx-auto px-4 py-8 space-y-8">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Analysis Results"</h1>
                    <p class="text-gray-400 mt-1">"Identified risks and prevention guidance"</p>
                </div>
                <A href=Page::Upload.path() class="px-4 py-2 bg-[#0077cc] hover:bg-[#1a9bff] rounded-lg font-medium">
                    "New Analysis"
                </A>
            </div>

            <section class="bg-[#0f1629] rounded-xl p-6 border border-[#1a2744] grid grid-cols-2 md:grid-cols-4 gap-4 text-sm">
                <InfoItem label="File" value=info.file_name />
                <InfoItem label="Format" value=info.format />
                <InfoItem label="Processed" value=info.processed_at />
                <InfoItem label="Status" value=info.status.to_string() />
            </section>

            <div class="grid md:grid-cols-2 gap-8">
                <section class="bg-[#0f1629] rounded-xl p-6 border border-[#1a2744]">
                    <h2 class="text-xl font-semibold mb-4">"Risk Scores"</h2>
                    <RiskBarChart bars=bars />
                </section>

                <section class="bg-[#0f1629] rounded-xl p-6 border border-[#1a2744] space-y-3">
                    <h2 class="text-xl font-semibold mb-1">"Identified Risks"</h2>
                    {risks
                        .into_iter()
                        .map(|risk| {
                            let entry = RiskView::from_risk(&risk);
                            let name = risk.risk_name.clone();
                            let selected = move || {
                                selector.with(|s| s.selected().map(|r| r.risk_name == name).unwrap_or(false))
                            };
                            view! {
                                <button
                                    on:click=move |_| select(risk.clone())
                                    class=move || format!(
                                        "w-full text-left rounded-lg p-4 border transition-colors {}",
                                        if selected() { "border-[#0077cc]" } else { "border-[#1a2744]" }
                                    )
                                >
                                    <div class="flex items-center justify-between">
                                        <span class="font-medium">{entry.name.clone()}</span>
                                        <span class="text-sm font-semibold" style=format!("color: {}", entry.color())>
                                            {format!("{} · {}", entry.severity.label(), entry.percent)}
                                        </span>
                                    </div>
                                    <div class="h-1.5 bg-[#1a2744] rounded-full mt-2">
                                        <div
                                            class="h-1.5 rounded-full"
                                            style=format!("width: {:.1}%; background-color: {}", entry.bar_width, entry.color())
                                        />
                                    </div>
                                    <p class="text-sm text-gray-400 mt-2">{entry.reason.clone()}</p>
                                </button>
                            }
                        })
                        .collect_view()}
                </section>
            </div>

            <PlanPanel selector=selector />
        </div>
    }
}

#[component]
fn InfoItem(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div>
            <p class="text-gray-500">{label}</p>
            <p class="font-medium break-all">{value}</p>
        </div>
    }
}

/// Prevention plan for the selected risk. A failed fetch leaves it empty.
#[component]
fn PlanPanel(selector: RwSignal<PlanSelector>) -> impl IntoView {
    let title = move || {
        selector.with(|s| {
            s.selected()
                .map(|r| format!("Prevention Plan: {}", r.risk_name))
                .unwrap_or_else(|| "Prevention Plan".to_string())
        })
    };

    view! {
        <section class="bg-[#0f1629] rounded-xl p-6 border border-[#1a2744]">
            <h2 class="text-xl font-semibold mb-4">{title}</h2>
            {move || match selector.with(|s| s.state().clone()) {
                PlanState::Idle => view! {
                    <p class="text-gray-400 text-sm">"Select a risk to see its prevention plan."</p>
                }.into_view(),
                PlanState::Loading => view! {
                    <div class="flex items-center space-x-2 text-gray-400 text-sm">
                        <InlineLoading />
                        <span>"Generating plan..."</span>
                    </div>
                }.into_view(),
                PlanState::Empty => view! {}.into_view(),
                PlanState::Ready(plan) => {
                    let meds = plan.displayed_meds().to_vec();
                    let lifestyle = plan.lifestyle_plan;
                    let monitoring = plan.medication_and_monitoring.monitoring_schedule;
                    view! {
                        <div class="grid md:grid-cols-2 gap-6 text-sm">
                            <div class="space-y-3">
                                <h3 class="font-semibold text-[#00d68f]">"Lifestyle"</h3>
                                <PlanItem label="Exercise" text=lifestyle.exercise />
                                <PlanItem label="Sleep" text=lifestyle.sleep />
                                <PlanItem label="Stress management" text=lifestyle.stress_management />
                            </div>
                            <div class="space-y-3">
                                <h3 class="font-semibold text-[#1a9bff]">"Medication & Monitoring"</h3>
                                <PlanItem label="Monitoring" text=monitoring />
                                <div>
                                    <p class="text-gray-500">"Recommended"</p>
                                    <ul class="list-disc list-inside">
                                        {meds.into_iter().map(|m| view! { <li>{m}</li> }).collect_view()}
                                    </ul>
                                </div>
                            </div>
                        </div>
                    }.into_view()
                }
            }}
        </section>
    }
}

#[component]
fn PlanItem(label: &'static str, text: String) -> impl IntoView {
    view! {
        <div>
            <p class="text-gray-500">{label}</p>
            <p>{text}</p>
        </div>
    }
}
