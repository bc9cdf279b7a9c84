//! AURA CLI
//!
//! Command-line client for the AURA services:
//! - Sign in, register, edit the profile
//! - Upload genomic data and view the risk analysis
//! - Fetch prevention plans
//! - Inspect routes and health metrics

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use aura::analysis::{open_results, PlanController, PlanState, PreventionPlan, ResultsEntry};
use aura::client::HttpClient;
use aura::config::{generate_default_config, Config};
use aura::health::{self, MetricKind, DASHBOARD_STATS};
use aura::persist::{FileStore, ResultStore};
use aura::routing::{guard, navigate, AuthStatus, GuardDecision, Route};
use aura::session::{ProfileFields, SessionManager, PROFILE_UPDATE_SUCCESS};
use aura::upload::{run_upload, Navigator, UploadFile, UploadPhase, UploadPipeline, SUPPORTED_FORMATS};
use aura::validation::{LoginForm, RegistrationForm};
use aura::AnalysisResult;

#[derive(Parser)]
#[command(name = "aura")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Genomic risk assessment from the command line")]
#[command(long_about = "AURA analyzes your genomic data for disease risks and builds personalized prevention plans.\nUpload a VCF, CSV, FASTA, PED, BED or PDF file to get started.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "AURA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "AURA_PASSWORD", hide_env_values = true)]
        password: String,
        /// Password confirmation (default: same as --password)
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Sign out and forget the saved login
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show or edit the profile
    Profile {
        /// Fields to change, e.g. --set bloodgroup=O+ --set height=172
        #[arg(short, long)]
        set: Vec<String>,
    },

    /// Upload a genomic data file for analysis
    Upload {
        /// VCF, CSV, FASTA, PED, BED or PDF file
        file: PathBuf,
    },

    /// Show the latest analysis
    Results,

    /// Get the prevention plan for one identified risk
    Plan {
        /// Risk name as shown by `aura results`
        risk: String,
    },

    /// Show where a path leads for the current session
    Route {
        path: String,
    },

    /// Show dashboard and 30-day health metrics
    Metrics {
        /// Seed for the 30-day series (default: today's date)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Prints navigation instead of switching views
struct CliNavigator;

impl Navigator for CliNavigator {
    fn navigate(&self, route: Route) {
        eprintln!("-> {}", route);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    aura::logging::init(&config.logging);

    if let Commands::Config { output } = &cli.command {
        return write_config(output.as_deref());
    }

    let client = Arc::new(HttpClient::new(&config.api)?);
    let data_path = config.storage.data_path();
    let store = Arc::new(
        FileStore::new(&data_path)
            .with_context(|| format!("Cannot open data directory {:?}", data_path))?,
    );

    let mut session = SessionManager::new(client.clone(), store.clone());
    session.restore().await;
    let json = cli.format == "json";

    match cli.command {
        Commands::Login { email, password } => {
            require_access(Route::Login, &session)?;
            let form = LoginForm { email, password };
            let user = session.login(&form).await?;
            println!("Signed in as {}", user.display_name());
        }

        Commands::Register {
            username,
            email,
            password,
            confirm,
        } => {
            require_access(Route::Register, &session)?;
            let form = RegistrationForm {
                username,
                email,
                confirm_password: confirm.unwrap_or_else(|| password.clone()),
                password,
            };
            let strength = form.strength();
            let user = session.register(&form).await?;
            println!(
                "Welcome, {}! (password strength {}/5)",
                user.display_name(),
                strength.score()
            );
        }

        Commands::Logout => {
            session.logout()?;
            println!("Signed out");
        }

        Commands::Whoami => {
            require_access(Route::Dashboard, &session)?;
            let user = session.user().context("Not signed in")?;
            if json {
                println!("{}", serde_json::to_string_pretty(user)?);
            } else {
                println!("Hello, {}", user.display_name());
                println!("  Email: {}", user.email);
                print_profile(&user.profile);
            }
        }

        Commands::Profile { set } => {
            require_access(Route::Profile, &session)?;
            let mut fields = session.user().context("Not signed in")?.profile.clone();

            if set.is_empty() {
                print_profile(&fields);
                return Ok(());
            }

            for assignment in &set {
                let (key, value) = assignment
                    .split_once('=')
                    .with_context(|| format!("Expected key=value, got {:?}", assignment))?;
                fields.set(key.trim(), value)?;
            }

            let user = session.update_profile(&fields).await?;
            println!("{}", PROFILE_UPDATE_SUCCESS);
            print_profile(&user.profile);
        }

        Commands::Upload { file } => {
            require_access(Route::Upload, &session)?;
            let upload = read_upload(&file)?;

            if !upload.has_accepted_extension() {
                let formats: Vec<&str> = SUPPORTED_FORMATS.iter().map(|(name, _)| *name).collect();
                eprintln!(
                    "Note: {} is not a recognized format ({})",
                    upload.name,
                    formats.join(", ")
                );
            }
            eprintln!("{} ({})", upload.name, upload.size_mb_label());

            let mut pipeline = UploadPipeline::new(config.upload.timing());
            pipeline.select_file(upload)?;

            let result = run_upload(
                &mut pipeline,
                client.as_ref(),
                store.as_ref(),
                &CliNavigator,
                print_progress,
            )
            .await;
            eprintln!();

            let result = result?;
            print_results(&result, json)?;
        }

        Commands::Results => {
            require_access(Route::Results, &session)?;
            let result = stored_result(store.as_ref())?;
            print_results(&result, json)?;
        }

        Commands::Plan { risk } => {
            require_access(Route::Results, &session)?;
            let result = stored_result(store.as_ref())?;
            let risk = result
                .find_risk(&risk)
                .with_context(|| format!("No risk named {:?} in the latest analysis", risk))?;

            let mut controller = PlanController::new(client.clone());
            controller.select(risk);

            match controller.settle().await {
                PlanState::Ready(plan) => print_plan(&risk.risk_name, &plan, json)?,
                _ => println!("No prevention plan available for {}", risk.risk_name),
            }
        }

        Commands::Route { path } => {
            let nav = navigate(&path, session.state().status());
            if json {
                let hops: Vec<&str> = nav.redirects.iter().map(|r| r.path()).collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "requested": path,
                        "route": nav.route.path(),
                        "loading": nav.loading,
                        "redirects": hops,
                    })
                );
            } else {
                for hop in &nav.redirects {
                    println!("redirect -> {}", hop);
                }
                println!("{} ({})", nav.route, nav.route.title());
            }
        }

        Commands::Metrics { seed } => {
            require_access(Route::HealthMetrics, &session)?;
            let seed = seed.unwrap_or_else(today_seed);
            print_metrics(seed, json)?;
        }

        Commands::Config { output } => write_config(output.as_deref())?,
    }

    Ok(())
}

/// Refuse commands whose view the session may not open
fn require_access(route: Route, session: &SessionManager) -> Result<()> {
    match access_denial(route, session.state().status()) {
        None => Ok(()),
        Some(message) => bail!(message),
    }
}

/// Why a command for `route` may not run, if it may not
fn access_denial(route: Route, status: AuthStatus) -> Option<String> {
    match guard(route, status) {
        GuardDecision::Render => None,
        GuardDecision::Redirect(Route::Login) => {
            Some("Sign in first: aura login --email <EMAIL>".to_string())
        }
        GuardDecision::Redirect(Route::Dashboard) => {
            Some("Already signed in. Run `aura logout` first.".to_string())
        }
        other => Some(format!("{} is not available ({:?})", route, other)),
    }
}

fn write_config(output: Option<&Path>) -> Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }
    Ok(())
}

fn read_upload(path: &Path) -> Result<UploadFile> {
    let bytes = std::fs::read(path).with_context(|| format!("Cannot read {:?}", path))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());
    Ok(UploadFile::new(name, bytes))
}

fn stored_result(store: &dyn ResultStore) -> Result<AnalysisResult> {
    match open_results(store.load_result()?.as_deref()) {
        ResultsEntry::Render(result) => Ok(result),
        ResultsEntry::Redirect(_) => bail!("No analysis yet. Upload a file first: aura upload <FILE>"),
    }
}

fn print_progress(pipeline: &UploadPipeline) {
    let filled = pipeline.progress() as usize / 5;
    let label = match pipeline.phase() {
        UploadPhase::Failed => pipeline.error().unwrap_or_default(),
        phase => phase.label(),
    };
    eprint!(
        "\r[{:<20}] {:>3}% {:<30}",
        "#".repeat(filled),
        pipeline.progress(),
        label
    );
    let _ = std::io::stderr().flush();
}

fn print_profile(profile: &ProfileFields) {
    println!("{:<12} {}", "Field", "Value");
    println!("{}", "-".repeat(30));
    for key in ProfileFields::KEYS {
        let value = profile.get(key);
        println!("{:<12} {}", key, if value.is_empty() { "-" } else { value.as_str() });
    }
}

fn print_results(result: &AnalysisResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    let info = result.file_info();
    println!("File:      {}", info.file_name);
    println!("Format:    {}", info.format);
    println!("Processed: {}", info.processed_at);
    println!("Status:    {}", info.status);
    println!();

    let views = result.risk_views();
    if views.is_empty() {
        println!("No risks identified.");
        return Ok(());
    }

    println!("{:<30} {:>6}  {:<14} {}", "Risk", "Score", "Tier", "Reason");
    println!("{}", "-".repeat(80));
    for view in views {
        println!(
            "{:<30} {:>6}  {:<14} {}",
            view.name,
            view.percent,
            view.severity.to_string(),
            view.reason
        );
    }
    Ok(())
}

fn print_plan(risk: &str, plan: &PreventionPlan, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(plan)?);
        return Ok(());
    }

    let lifestyle = &plan.lifestyle_plan;
    println!("Prevention plan: {}", risk);
    println!();
    println!("Lifestyle");
    println!("  Exercise: {}", lifestyle.exercise);
    println!("  Sleep:    {}", lifestyle.sleep);
    println!("  Stress:   {}", lifestyle.stress_management);
    println!();
    println!("Medication & monitoring");
    println!("  Schedule: {}", plan.medication_and_monitoring.monitoring_schedule);
    for med in plan.displayed_meds() {
        println!("  - {}", med);
    }
    Ok(())
}

fn print_metrics(seed: u64, json: bool) -> Result<()> {
    let days = health::monthly_series(seed);

    if json {
        let series: Vec<_> = days
            .iter()
            .map(|d| {
                serde_json::json!({
                    "day": d.day,
                    "steps": d.steps,
                    "heart_rate": d.heart_rate,
                    "sleep": d.sleep,
                    "calories": d.calories,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    for stat in DASHBOARD_STATS {
        println!("{:<14} {:>8}  {}", stat.label, stat.value, stat.trend);
    }
    println!();

    for kind in MetricKind::ALL {
        let values = kind.series(&days);
        let avg = values.iter().sum::<f64>() / values.len().max(1) as f64;
        println!("{:<16} {:>8}  (30-day avg {:.1})", kind.label(), kind.headline(), avg);
    }
    println!();

    println!("{:<5} {:>7} {:>5} {:>6} {:>9}", "Day", "Steps", "HR", "Sleep", "Calories");
    println!("{}", "-".repeat(36));
    for d in &days {
        println!(
            "{:<5} {:>7} {:>5} {:>6.1} {:>9}",
            d.day,
            health::format_thousands(d.steps as u64),
            d.heart_rate,
            d.sleep,
            health::format_thousands(d.calories as u64)
        );
    }
    Ok(())
}

fn today_seed() -> u64 {
    chrono::Utc::now().date_naive().num_days_from_ce() as u64
}
