use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use nsv::cli::orchestration::{self, PatchOptions, TagOptions};
use nsv::cli::{
    Cli, Commands, FormatCommand, NextCommand, PatchCommand, ResolveArgs, TagCommand,
};
use nsv::domain::TagTemplate;
use nsv::git::{Git2Repository, Repository};
use nsv::ui;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let color = ui::use_color(cli.no_color);
    if let Err(e) = run(cli, color) {
        ui::display_error(&format!("{:#}", e), color);
        std::process::exit(1);
    }
}

/// Log to stderr, leaving stdout for the computed tags
fn init_tracing(cli: &Cli) {
    if cli.no_log {
        return;
    }

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, color: bool) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;

    match cli.command {
        Commands::Next(cmd) => run_next(&cmd, &cwd, color),
        Commands::Tag(cmd) => run_tag(&cmd, &cwd, color),
        Commands::Patch(cmd) => run_patch(&cmd, &cwd, color),
        Commands::Format(cmd) => run_format(&cmd),
    }
}

fn run_next(cmd: &NextCommand, cwd: &Path, color: bool) -> Result<()> {
    let template = cmd.resolve.template()?;
    orchestration::check_paths_exist(cwd, &cmd.resolve.paths)?;

    let repo = Git2Repository::open(cwd).context("Failed to open git repository")?;
    let resolution = resolve(&repo, cwd, &cmd.resolve, &template, color)?;

    report(&cmd.resolve, &resolution, color)?;
    if !cmd.resolve.json {
        ui::print_tags(&resolution.tags());
    }
    Ok(())
}

fn run_tag(cmd: &TagCommand, cwd: &Path, color: bool) -> Result<()> {
    let template = cmd.resolve.template()?;
    let message = cmd.message_template()?;
    orchestration::check_paths_exist(cwd, &cmd.resolve.paths)?;

    let repo = Git2Repository::open(cwd).context("Failed to open git repository")?;
    let resolution = resolve(&repo, cwd, &cmd.resolve, &template, color)?;

    report(&cmd.resolve, &resolution, color)?;

    let tags = orchestration::tag_all(
        &repo,
        &resolution.results,
        &TagOptions {
            message: &message,
            hook: cmd.hook.as_deref(),
            dry_run: cmd.dry_run,
        },
    )?;

    if !cmd.resolve.json {
        ui::print_tags(&tags);
    }
    Ok(())
}

fn run_patch(cmd: &PatchCommand, cwd: &Path, color: bool) -> Result<()> {
    let template = cmd.resolve.template()?;
    let message = cmd.commit_template()?;
    orchestration::check_paths_exist(cwd, &cmd.resolve.paths)?;

    let repo = Git2Repository::open(cwd).context("Failed to open git repository")?;
    let resolution = resolve(&repo, cwd, &cmd.resolve, &template, color)?;

    report(&cmd.resolve, &resolution, color)?;

    if cmd.dry_run {
        tracing::warn!("no changes will be committed in dry run mode");
    }

    let tags = orchestration::patch_all(
        &repo,
        &resolution.results,
        &PatchOptions {
            message: &message,
            hook: &cmd.hook,
            dry_run: cmd.dry_run,
            skip_pipeline_tag: nsv::ci::skip_pipeline_tag(),
        },
    )?;

    if !cmd.resolve.json {
        ui::print_tags(&tags);
    }
    Ok(())
}

fn run_format(cmd: &FormatCommand) -> Result<()> {
    let template = TagTemplate::parse(&cmd.format)?;
    println!("{}", orchestration::format_tag(&cmd.tag, &template)?);
    Ok(())
}

fn resolve<R: Repository>(
    repo: &R,
    cwd: &Path,
    args: &ResolveArgs,
    template: &TagTemplate,
    color: bool,
) -> Result<orchestration::Resolution> {
    let resolution =
        orchestration::resolve_all(repo, cwd, &args.paths, template, &args.strategy())?;

    for warning in &resolution.warnings {
        if warning.is_informational() {
            tracing::info!("{}", warning);
        } else {
            ui::display_boundary_warning(warning, color);
        }
    }

    Ok(resolution)
}

fn report(args: &ResolveArgs, resolution: &orchestration::Resolution, color: bool) -> Result<()> {
    if args.show {
        ui::print_summary(&resolution.results, &args.summary(color));
    }
    if args.json {
        ui::print_json(&resolution.results)?;
    }
    Ok(())
}
