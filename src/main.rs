use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::Path;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use notify_debouncer_full::{
    new_debouncer,
    notify::{RecursiveMode, Watcher},
    DebounceEventResult,
};

mod check;
mod cli;
mod config;
mod ctx;
mod out;
mod render;
mod utils;

use cli::Profile;
use out::Out;

/// Load the site descriptor at `path`, or the built-in tutorial site if no path is given.
fn load_source(path: Option<&Path>) -> anyhow::Result<config::SiteSource> {
    match path {
        Some(path) => {
            let source = config::SiteSource::load(path)
                .with_context(|| format!("Loading site descriptor {:?}", path))?;
            log::info!("Loaded site descriptor {:?}", path);
            Ok(source)
        }
        None => {
            log::debug!("No site descriptor given, using the built-in tutorial site");
            Ok(config::SiteSource::tutorial())
        }
    }
}

/// Resolve the site configuration for `profile`, from the descriptor at `path` or the built-in
/// tutorial site.
fn load_site_config(path: Option<&Path>, profile: Profile) -> anyhow::Result<config::SiteConfig> {
    let site_config = match path {
        Some(_) => load_source(path)?.resolve(profile),
        None => config::SiteConfig::tutorial(profile),
    };
    log::debug!(
        "Resolved {} profile: base path {:?}, ignore dead links {}, clean URLs {}",
        profile.name(),
        site_config.base_path(),
        site_config.ignore_dead_links(),
        site_config.clean_urls()
    );
    Ok(site_config)
}

fn report(profile: Profile, problems: &[check::Problem], level: log::Level) {
    for problem in problems {
        log::log!(level, "[{}] {}", profile.name(), problem);
    }
}

fn emit(args: &cli::EmitCommand, renderer: &render::Renderer) -> anyhow::Result<()> {
    let site_config = load_site_config(args.path.as_deref(), args.profile)?;

    // The site generator has the final say on what it accepts.
    if let Err(check::Failed(problems)) = site_config.check() {
        report(args.profile, &problems, log::Level::Warn);
    }

    let rendered = renderer.render(&site_config, args.profile, args.format)?;
    match &args.out {
        Some(dir) => {
            let out = Out::at(dir)?;
            let path = out.update_file(
                &mut rendered.as_bytes(),
                format!("config.{}", args.format.extension()),
            )?;
            log::info!(
                "Wrote {} configuration for the {} profile to {:?}",
                args.format.extension(),
                args.profile.name(),
                path
            );
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn watch(args: &cli::EmitCommand, renderer: &render::Renderer) -> anyhow::Result<()> {
    let path = args
        .path
        .as_deref()
        .ok_or(anyhow!("Watching requires a site descriptor path"))?;
    let descriptor = config::SiteSource::locate(path)?.canonicalize()?;
    let watch_dir = descriptor
        .parent()
        .ok_or(anyhow!("site descriptor has no parent directory"))?
        .to_owned();

    // Start out as changed, so the first emit happens right away.
    let cvar_pair = Arc::new((Mutex::new(true), Condvar::new()));
    let cvar_pair2 = cvar_pair.clone();
    let watched = descriptor.clone();
    let mut debouncer = new_debouncer(
        Duration::from_millis(250),
        None,
        move |ev: DebounceEventResult| {
            let Ok(evs) = ev else {
                return;
            };
            if evs
                .iter()
                .flat_map(|e| e.event.paths.iter())
                .any(|path| path == &watched)
            {
                let (lock, cvar) = &*cvar_pair2;
                if let Ok(mut changed) = lock.lock() {
                    *changed = true;
                    cvar.notify_one();
                }
            }
        },
    )?;

    debouncer
        .watcher()
        .watch(&watch_dir, RecursiveMode::NonRecursive)?;
    debouncer
        .cache()
        .add_root(&watch_dir, RecursiveMode::NonRecursive);

    loop {
        let (lock, cvar) = &*cvar_pair;
        let mut changed = lock.lock().map_err(|_| anyhow!("watch state lock poisoned"))?;
        while !*changed {
            log::info!("Waiting for changes to {:?}…", descriptor);
            changed = cvar
                .wait(changed)
                .map_err(|_| anyhow!("watch state lock poisoned"))?;
        }
        *changed = false;
        drop(changed);

        if let Err(err) = emit(args, renderer) {
            log::error!("{:?}", err);
        }
    }
}

fn check(args: &cli::CheckCommand) -> anyhow::Result<()> {
    let source = load_source(args.path.as_deref())?;
    let profiles: &[Profile] = if args.all_profiles {
        &Profile::ALL
    } else {
        std::slice::from_ref(&args.profile)
    };

    let mut problem_count = 0;
    for &profile in profiles {
        match source.resolve(profile).check() {
            Ok(()) => log::info!("[{}] No problems found", profile.name()),
            Err(check::Failed(problems)) => {
                report(profile, &problems, log::Level::Error);
                problem_count += problems.len();
            }
        }
    }

    if problem_count > 0 {
        anyhow::bail!("Site configuration has {problem_count} problem(s)");
    }
    Ok(())
}

fn links(args: &cli::LinksCommand) -> anyhow::Result<()> {
    let site_config = load_site_config(args.path.as_deref(), args.profile)?;
    let ctx = ctx::Ctx::from_site_config(&site_config);
    log::debug!("Resolving links against base path {:?}", ctx.base_path());

    for (field, item) in site_config.theme().items() {
        println!(
            "{field}\t{}\t{}\t{}",
            item.label,
            item.target_link,
            ctx.href(&item.target_link)
        );
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    {
        use simplelog as s;
        let level = if args.verbose {
            s::LevelFilter::Debug
        } else {
            s::LevelFilter::Info
        };
        // stdout carries emitted configurations
        s::TermLogger::init(
            level,
            s::Config::default(),
            s::TerminalMode::Stderr,
            s::ColorChoice::Auto,
        )?;
    }

    match &args.command {
        cli::Commands::Emit(emit_args) => {
            let renderer = render::Renderer::build()?;
            if emit_args.watch {
                watch(emit_args, &renderer)
            } else {
                emit(emit_args, &renderer)
            }
        }
        cli::Commands::Check(check_args) => check(check_args),
        cli::Commands::Links(links_args) => links(links_args),
    }
}
