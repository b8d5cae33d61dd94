mod analyze;
mod config;
mod markup;
mod model;
mod report;
mod utils;

use crate::analyze::analyzer::Analyzer;
use crate::analyze::{MilestonesAnalyzed, TimeTracker, WorkLogStore};
use crate::config::Config;
use crate::markup::{IssueLinkProvider, LinkProviders, UrlTemplateProvider};
use crate::report::markdown::MarkdownReport;
use crate::utils::MultiProgressNew;
use anyhow::Context;
use clap::Parser;
use futures::future;
use indicatif::{MultiProgress, ProgressBar};
use itertools::Itertools;
use model::{Issue, Milestone, Project, User};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug, Clone)]
#[command(name = "timetracking", version, about = "Time tracking metrics for milestones")]
pub struct Args {
    #[arg(long = "users", default_value = "users.json")]
    users_path: String,
    #[arg(long = "projects", default_value = "projects.json")]
    projects_path: String,
    #[arg(long = "milestones", default_value = "milestones.json")]
    milestones_path: String,
    #[arg(long = "issues", default_value = "issues.json")]
    issues_path: String,

    /// Configuration file (defaults to `.timetracking.toml` when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the reports are written to
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Hours a computed velocity stays cached, 0 disables caching
    #[arg(long)]
    pub cache_ttl_hours: Option<u64>,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn log_level(&self, config: &Config) -> Level {
        if self.quiet {
            Level::ERROR
        } else if config.general.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?.unwrap_or_default(),
    };
    config.merge_with_args(&args);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level(&config))
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set up logging");
    }

    run(&args, &config).await
}

async fn run(args: &Args, config: &Config) -> anyhow::Result<()> {
    let (users, projects, milestones, issues) = parse_configs(args).await?;
    let store = WorkLogStore::new(users, projects, milestones, issues);
    let links = Arc::new(link_providers(config, &store));
    let tracker = Arc::new(TimeTracker::new(store, config.cache.velocity_ttl()));

    let analyzed = analyze_milestones(&tracker, &links).await?;

    let output_dir = Path::new(&config.general.output_dir);
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let store = tracker.source();
    for project_id in analyzed.iter().map(|a| &a.milestone.project).unique() {
        let Some(project) = store.projects.iter().find(|p| &p.id == project_id) else {
            continue;
        };
        let path = analyzed
            .report_create(project, output_dir)
            .with_context(|| format!("Failed to write report for `{}`", project.id))?;
        info!("Report for `{}` written to {}", project.name, path.display());
    }

    Ok(())
}

async fn parse_configs(
    args: &Args,
) -> anyhow::Result<(Vec<User>, Vec<Project>, Vec<Milestone>, Vec<Issue>)> {
    async fn parse_config<T, F>(path: &str, pb: &ProgressBar, parser: F) -> anyhow::Result<Vec<T>>
    where
        F: FnOnce(&str) -> model::Result<Vec<T>>,
    {
        pb.set_message(format!("Read file `{}` ...", path));
        let vec = parser(path).with_context(|| format!("Failed to parse `{path}`"))?;
        pb.finish_with_message(format!(
            "✅ Completed parsing file `{}` (find {} elements)",
            path,
            vec.len()
        ));
        Ok(vec)
    }

    let multi_progress = MultiProgress::default();
    let users_pb = multi_progress.add_message("Waiting users");
    let projects_pb = multi_progress.add_message("Waiting projects");
    let milestones_pb = multi_progress.add_message("Waiting milestones");
    let issues_pb = multi_progress.add_message("Waiting issues");

    let (users, projects, milestones, issues) = futures::join!(
        parse_config(&args.users_path, &users_pb, User::from_config),
        parse_config(&args.projects_path, &projects_pb, Project::from_config),
        parse_config(&args.milestones_path, &milestones_pb, Milestone::from_config),
        parse_config(&args.issues_path, &issues_pb, Issue::from_config),
    );
    Ok((users?, projects?, milestones?, issues?))
}

fn link_providers(config: &Config, store: &WorkLogStore) -> LinkProviders {
    let mut links = LinkProviders::new(store.projects.iter().map(|p| p.id.clone()));
    for (module, template) in &config.links.templates {
        if module.eq_ignore_ascii_case("issue") {
            links.register(
                module,
                IssueLinkProvider::new(template, store.issues.keys().copied()),
            );
        } else {
            links.register(module, UrlTemplateProvider::new(template));
        }
    }
    if links.is_empty() {
        warn!("No link templates configured, wiki links are left as text");
    }
    links
}

async fn analyze_milestones(
    tracker: &Arc<TimeTracker<WorkLogStore>>,
    links: &Arc<LinkProviders>,
) -> anyhow::Result<MilestonesAnalyzed> {
    let store = tracker.source();
    let names = store
        .milestones
        .iter()
        .filter(|m| store.project_config(&m.project).time_tracking_enabled())
        .map(|m| m.name.clone())
        .collect::<Vec<_>>();

    let multi_progress = MultiProgress::default();
    let pb = multi_progress.add_counter(names.len(), "Analyzing milestones");

    let tasks = names.into_iter().map(|name| {
        let tracker = Arc::clone(tracker);
        let links = Arc::clone(links);
        let pb = pb.clone();
        tokio::task::spawn_blocking(move || {
            let analyzed = tracker.analyze_milestone(&name, &links);
            pb.inc(1);
            analyzed
        })
    });
    let analyzed = future::join_all(tasks)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .context("Milestone analysis panicked")?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    pb.finish_with_message(format!("✅ Analyzed {} milestones", analyzed.len()));

    Ok(analyzed)
}
