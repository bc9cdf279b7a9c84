//! AURA Web Client
//!
//! Genomic risk assessment in the browser, built with Leptos (WASM).
//!
//! # Features
//!
//! - Sign in / registration with client-side password checks
//! - Genomic file upload with progress and analysis handoff
//! - Risk results with per-risk prevention plans
//! - Dashboard and health-metric views
//!
//! # Architecture
//!
//! Client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! Decisions (route guard, upload phases, severity tiers) come from the
//! `aura` core crate; this crate renders them and talks to the analysis and
//! auth APIs over HTTP.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Readable panics in the browser console
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
