//! UI Components
//!
//! Reusable Leptos components shared by the pages.

pub mod chart;
pub mod chromosome;
pub mod dna_helix;
pub mod heartbeat;
pub mod loading;
pub mod nav;
pub mod stat_card;
pub mod toast;

pub use chart::{ActivityChart, DonutChart, LineChart, RiskBarChart};
pub use chromosome::ChromosomeGrid;
pub use dna_helix::DnaHelix;
pub use heartbeat::HeartBeat;
pub use loading::{InlineLoading, Loading};
pub use nav::Nav;
pub use stat_card::StatCardView;
pub use toast::Toast;
