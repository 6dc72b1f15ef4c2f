use anyhow::{Context as _, Result};
use clap::Parser;
use std::path::PathBuf;

use entrygen::{
    cli::{Args, Command},
    init, report, Config, ContextEnv, EntriesPlugin, HookOutcome,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut ctx = ContextEnv::new()?;

    if let Some(Command::Init { force }) = args.command {
        let path = args
            .config
            .as_deref()
            .map(|p| ctx.absolutize(p))
            .unwrap_or_else(|| ctx.default_config_path());
        init::run(&path, force)?;
        return Ok(());
    }

    let config_path = ctx.locate_config(args.config.as_deref())?;
    let cfg = Config::load_from_path(&config_path)?;

    let host_root = args.root.as_deref().map(|p| ctx.absolutize(p));
    let mut options = cfg.into_options(&ctx, host_root.as_deref())?;
    if let Some(p) = args.svelte_config.as_deref() {
        options.svelte_config_path = Some(ctx.absolutize(p));
    }
    options.dry_run = args.dry_run;

    let mut plugin = EntriesPlugin::new(options);
    let outcome = plugin.configure(host_root.as_deref()).await?;

    if args.dry_run {
        if let HookOutcome::Patched { patched, .. } = &outcome {
            print!("{}", patched.text);
        }
    }

    let report_text = report::build_report(&outcome, args.report);
    if !report_text.is_empty() {
        write_report(args.report_out, &report_text)?;
    }

    Ok(())
}

fn write_report(out: Option<PathBuf>, text: &str) -> Result<()> {
    match out {
        Some(p) => std::fs::write(&p, text)
            .with_context(|| format!("failed to write report to {}", p.display())),
        None => {
            eprint!("{text}");
            Ok(())
        }
    }
}
