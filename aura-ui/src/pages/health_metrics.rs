//! Health Metrics Page
//!
//! Headline cards and a 30-day chart per metric. The series is synthetic
//! and regenerated on every visit.

use leptos::*;

use aura::health::{format_thousands, monthly_series, DailyMetrics, MetricKind, SERIES_DAYS};

use crate::components::{HeartBeat, LineChart};

fn average(kind: MetricKind, days: &[DailyMetrics]) -> f64 {
    if days.is_empty() {
        return 0.0;
    }
    kind.series(days).iter().sum::<f64>() / days.len() as f64
}

fn format_average(kind: MetricKind, value: f64) -> String {
    match kind {
        MetricKind::HeartRate => format!("{:.0} bpm", value),
        MetricKind::Steps => format_thousands(value.round() as u64),
        MetricKind::Sleep => format!("{:.1} h", value),
        MetricKind::Calories => format!("{} kcal", format_thousands(value.round() as u64)),
    }
}

#[component]
pub fn HealthMetrics() -> impl IntoView {
    let days = store_value(monthly_series(js_sys::Date::now() as u64));
    let (selected, set_selected) = create_signal(MetricKind::HeartRate);
    let latest_bpm = days.with_value(|d| d.last().map(|day| day.heart_rate as f64));

    view! {
        <div class="container mx-auto px-4 py-8 space-y-8">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Health Metrics"</h1>
                    <p class="text-gray-400 mt-1">{format!("Last {} days", SERIES_DAYS)}</p>
                </div>
                {latest_bpm.map(|bpm| view! { <HeartBeat bpm=bpm /> })}
            </div>

            <section class="grid grid-cols-2 md:grid-cols-4 gap-4">
                {MetricKind::ALL
                    .into_iter()
                    .map(|kind| view! {
                        <button
                            on:click=move |_| set_selected.set(kind)
                            class="text-left bg-[#0f1629] rounded-xl p-5 border transition-colors"
                            style=move || {
                                let edge = if selected.get() == kind { kind.color() } else { "#1a2744" };
                                format!("border-color: {}", edge)
                            }
                        >
                            <p class="text-sm text-gray-400">{kind.label()}</p>
                            <p class="text-2xl font-bold mt-2" style=format!("color: {}", kind.color())>
                                {kind.headline()}
                            </p>
                        </button>
                    })
                    .collect_view()}
            </section>

            <section class="bg-[#0f1629] rounded-xl p-6 border border-[#1a2744]">
                {move || {
                    let kind = selected.get();
                    let (values, avg) = days.with_value(|d| (kind.series(d), average(kind, d)));
                    view! {
                        <div class="flex items-center justify-between mb-4">
                            <h2 class="text-xl font-semibold">{kind.label()}</h2>
                            <span class="text-sm text-gray-400">
                                {format!("30-day average: {}", format_average(kind, avg))}
                            </span>
                        </div>
                        <LineChart values=values color=kind.color() />
                    }
                }}
            </section>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_and_format() {
        let days = monthly_series(11);
        let avg = average(MetricKind::Sleep, &days);
        assert!((6.0..9.0).contains(&avg));
        assert_eq!(average(MetricKind::Steps, &[]), 0.0);

        assert_eq!(format_average(MetricKind::Steps, 8450.4), "8,450");
        assert_eq!(format_average(MetricKind::Calories, 2100.0), "2,100 kcal");
        assert_eq!(format_average(MetricKind::Sleep, 7.46), "7.5 h");
    }
}
