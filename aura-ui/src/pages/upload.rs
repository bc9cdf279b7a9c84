//! Upload Page
//!
//! Drives [`UploadPipeline`] with browser timers: an interval advances the
//! cosmetic progress while the request is in flight, then the analyzing and
//! redirect delays run before moving on to the results view.

use gloo_timers::callback::Interval;
use gloo_timers::future::TimeoutFuture;
use leptos::*;
use leptos_router::*;
use wasm_bindgen::JsCast;

use aura::analysis::UPLOAD_FALLBACK_ERROR;
use aura::upload::{
    UploadFile, UploadPhase, UploadPipeline, ACCEPTED_EXTENSIONS, ADVISORY_MAX_BYTES,
    SUPPORTED_FORMATS,
};

use crate::api;
use crate::components::DnaHelix;

fn millis(d: std::time::Duration) -> u32 {
    d.as_millis().min(u32::MAX as u128) as u32
}

#[component]
pub fn Upload() -> impl IntoView {
    let navigate = use_navigate();

    let pipeline = create_rw_signal(UploadPipeline::default());
    let picked = store_value(None::<web_sys::File>);
    let ticker = store_value(None::<Interval>);

    on_cleanup(move || ticker.set_value(None));

    let choose = move |file: web_sys::File| {
        let upload = UploadFile::metadata(file.name(), file.size() as u64);
        let mut accepted = false;
        pipeline.update(|p| match p.select_file(upload) {
            Ok(()) => accepted = true,
            Err(e) => web_sys::console::warn_1(&format!("File not selected: {}", e).into()),
        });
        if accepted {
            picked.set_value(Some(file));
        }
    };

    let on_change = move |ev: ev::Event| {
        let file = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        if let Some(file) = file {
            choose(file);
        }
    };

    let on_drop = move |ev: ev::DragEvent| {
        ev.prevent_default();
        let file = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0));
        if let Some(file) = file {
            choose(file);
        }
    };

    let on_clear = move |_| {
        pipeline.update(|p| {
            if p.clear().is_ok() {
                picked.set_value(None);
            }
        });
    };

    let on_upload = move |_| {
        let mut started = None;
        pipeline.update(|p| started = Some(p.begin_upload()));
        if !matches!(started, Some(Ok(_))) {
            return;
        }
        let Some(file) = picked.get_value() else {
            return;
        };

        let timing = pipeline.with_untracked(|p| p.timing().clone());
        ticker.set_value(Some(Interval::new(millis(timing.tick_interval), move || {
            pipeline.update(|p| {
                p.tick();
            });
        })));

        let navigate = navigate.clone();
        spawn_local(async move {
            let outcome = api::predict_risk(&file, UPLOAD_FALLBACK_ERROR).await;
            ticker.set_value(None);

            let result = match outcome {
                Ok(result) => result,
                Err(message) => {
                    pipeline.update(|p| {
                        let _ = p.upload_failed(Some(message));
                    });
                    return;
                }
            };

            pipeline.update(|p| {
                let _ = p.upload_succeeded(result);
            });
            TimeoutFuture::new(millis(timing.analyzing_delay)).await;

            let mut analyzed = None;
            pipeline.update(|p| analyzed = p.analysis_elapsed().ok());
            let Some(result) = analyzed else {
                return;
            };
            if let Err(e) = api::save_result(&result) {
                web_sys::console::error_1(&format!("Could not store analysis: {}", e).into());
                pipeline.update(|p| {
                    let _ = p.store_failed();
                });
                return;
            }

            TimeoutFuture::new(millis(timing.redirect_delay)).await;
            let mut redirect = None;
            pipeline.update(|p| redirect = p.take_redirect());
            if let Some(route) = redirect {
                navigate(route.path(), Default::default());
            }
        });
    };

    let phase = move || pipeline.with(|p| p.phase());
    let busy = move || phase().is_busy();

    view! {
        <div class="container mx-auto px-4 py-8 max-w-3xl space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Upload Genomic Data"</h1>
                <p class="text-gray-400 mt-1">"We'll analyze your file for disease risks"</p>
            </div>

            <label
                class="block border-2 border-dashed border-[#1a2744] hover:border-[#0077cc] rounded-xl p-10 text-center cursor-pointer transition-colors"
                on:dragover=|ev: ev::DragEvent| ev.prevent_default()
                on:drop=on_drop
            >
                <input
                    type="file"
                    accept=ACCEPTED_EXTENSIONS
                    class="hidden"
                    disabled=busy
                    on:change=on_change
                />
                <div class="text-4xl mb-3">"📁"</div>
                <p class="font-medium">"Drop your file here or click to browse"</p>
                <p class="text-sm text-gray-500 mt-1">
                    {format!("Maximum file size: {} MB", ADVISORY_MAX_BYTES / (1024 * 1024))}
                </p>
            </label>

            {move || pipeline.with(|p| p.file().cloned()).map(|file| view! {
                <div class="flex items-center justify-between bg-[#0f1629] rounded-lg px-4 py-3 border border-[#1a2744]">
                    <div>
                        <p class="font-medium">{file.name.clone()}</p>
                        <p class="text-sm text-gray-400">{file.size_mb_label()}</p>
                    </div>
                    <button
                        on:click=on_clear
                        disabled=busy
                        class="text-sm text-gray-400 hover:text-white disabled:opacity-50"
                    >
                        "Remove"
                    </button>
                </div>
            })}

            {move || pipeline.with(|p| p.error().map(str::to_string)).map(|message| view! {
                <div class="bg-[#ff3d3d]/10 border border-[#ff3d3d] text-[#ff3d3d] rounded-lg px-4 py-3 text-sm">
                    {message}
                </div>
            })}

            <Show when=move || phase().is_busy() || phase() == UploadPhase::Done>
                <div class="bg-[#0f1629] rounded-xl p-6 border border-[#1a2744] space-y-4">
                    <Show when=move || phase() == UploadPhase::Analyzing>
                        <DnaHelix size=120.0 rungs=20 />
                    </Show>
                    <div class="flex justify-between text-sm">
                        <span>{move || phase().label()}</span>
                        <span>{move || format!("{}%", pipeline.with(|p| p.progress()))}</span>
                    </div>
                    <div class="h-2 bg-[#1a2744] rounded-full">
                        <div
                            class="h-2 bg-[#0077cc] rounded-full transition-all"
                            style=move || format!("width: {}%", pipeline.with(|p| p.progress()))
                        />
                    </div>
                </div>
            </Show>

            <button
                on:click=on_upload
                disabled=busy
                class="w-full py-3 bg-[#0077cc] hover:bg-[#1a9bff] disabled:opacity-50 rounded-lg font-medium"
            >
                {move || if busy() { phase().label() } else { "Upload & Analyze" }}
            </button>

            <section>
                <h2 class="text-lg font-semibold mb-3">"Supported Formats"</h2>
                <div class="grid md:grid-cols-2 gap-3">
                    {SUPPORTED_FORMATS
                        .iter()
                        .map(|(name, description)| view! {
                            <div class="bg-[#0f1629] rounded-lg px-4 py-3 border border-[#1a2744]">
                                <span class="font-medium">{*name}</span>
                                <span class="text-sm text-gray-400 ml-2">{*description}</span>
                            </div>
                        })
                        .collect_view()}
                </div>
            </section>
        </div>
    }
}
