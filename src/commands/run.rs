//! The `run` subcommand: validate the branch choice, then hand off to
//! `ansible-pull`.

use std::process::Command;

use anyhow::{Context, Result, bail};

use vmpull::resolver::{self, Acknowledgment, Resolution, ResolverState, UNSTABLE_BRANCH, Warning};
use vmpull::settings::{self, Settings};
use vmpull::styling;
use vmpull::{net, release, remote, roles};

use crate::cli::RunArgs;

pub fn handle_run(args: &RunArgs) -> Result<()> {
    let path = settings::settings_path()?;
    let mut settings = Settings::load_from(&path);

    if let Some(url) = &args.url {
        settings.git_url = url.clone();
    }
    if let Some(branch) = &args.branch {
        settings.git_branch = branch.clone();
    }
    for tag in &args.roles {
        roles::validate_tag(tag, settings.allow_experimental)?;
        settings.roles_this_run.insert(tag.clone());
    }

    if !net::is_online() {
        styling::eprintln!("{}", styling::error_message("No Internet connection"));
        styling::eprintln!(
            "This tool requires Internet access. Check your settings, make sure you are \
             not behind a captive portal, and try again."
        );
        bail!("unable to reach the Internet");
    }

    // The default branch is the branch for the running release, when one
    // exists; otherwise development happens on the unstable branch.
    let system_release = release::detect_system_release();
    if settings.git_branch.is_empty() {
        settings.git_branch =
            if !system_release.is_empty() && remote::branch_exists(&settings.git_url, system_release)
            {
                system_release.to_string()
            } else {
                UNSTABLE_BRANCH.to_string()
            };
        log::info!("No branch configured; defaulting to {}", settings.git_branch);
    }
    if system_release.is_empty() {
        styling::eprintln!(
            "{}",
            styling::hint_message(format!(
                "Could not detect the distro release codename; using branch '{}'. \
                 Pass --branch to choose one explicitly.",
                settings.git_branch
            ))
        );
    }

    let url = settings.git_url.clone();
    let mut resolution =
        resolver::resolve(&settings, system_release, |name| remote::branch_exists(&url, name));

    if let Some(warning) = &resolution.warning {
        render_warning(warning);
    }

    if resolution.state() == ResolverState::AwaitingDecision {
        let ack = if args.yes {
            Acknowledgment::Proceed
        } else {
            prompt_acknowledgment(&resolution)?
        };
        resolution.acknowledge(ack, &mut settings);
        if ack == Acknowledgment::ProceedAndSuppress {
            settings.save_to(&path)?;
        }
        if !resolution.proceed() {
            bail!("aborted at the unstable-release warning");
        }
    }

    if !remote::branch_exists(&settings.git_url, &settings.git_branch) {
        styling::eprintln!("{}", styling::error_message("Invalid release"));
        styling::eprintln!(
            "The chosen release does not exist at the project URL. Check the settings \
             below and try again."
        );
        styling::eprintln!(
            "{}",
            styling::hint_message(format!(
                "release: {}  url: {}",
                settings.git_branch, settings.git_url
            ))
        );
        styling::eprintln!(
            "{}",
            styling::hint_message(format!(
                "If you are on a current Linux Mint release, open an issue at {} asking \
                 for it to be supported",
                settings.git_url
            ))
        );
        bail!(
            "release {} does not exist at {}",
            settings.git_branch,
            settings.git_url
        );
    }

    settings.save_to(&path)?;

    run_ansible_pull(&settings, args.dry_run)
}

fn render_warning(warning: &Warning) {
    styling::eprintln!("{}", styling::warning_message(warning.title()));
    styling::eprintln!("{}", warning.message);
    let recommendation = &warning.recommendation;
    styling::eprintln!(
        "{}",
        styling::hint_message(format!(
            "Consider changing your settings to: release '{}' at {}",
            recommendation.release, recommendation.url
        ))
    );
}

fn prompt_acknowledgment(resolution: &Resolution) -> Result<Acknowledgment> {
    if !prompt_yes_no("Continue with this branch anyway?")? {
        return Ok(Acknowledgment::Abort);
    }
    let suppressible = resolution
        .warning
        .as_ref()
        .is_some_and(|warning| warning.suppress_flag.is_some());
    if suppressible && prompt_yes_no("Skip this warning in the future?")? {
        return Ok(Acknowledgment::ProceedAndSuppress);
    }
    Ok(Acknowledgment::Proceed)
}

fn prompt_yes_no(question: &str) -> Result<bool> {
    styling::eprint!("{question} [y/N] ");
    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("Failed to read from stdin")?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn run_ansible_pull(settings: &Settings, dry_run: bool) -> Result<()> {
    let tags = settings
        .roles_this_run
        .iter()
        .cloned()
        .collect::<Vec<_>>()
        .join(",");

    let checkout = tempfile::tempdir().context("Failed to create a checkout directory")?;
    let checkout_path = checkout.path().to_string_lossy().into_owned();

    // pkexec does not search PATH for the program it runs; env does, which
    // keeps this working wherever ansible-pull is installed.
    let argv: Vec<String> = vec![
        "pkexec".into(),
        "env".into(),
        "ansible-pull".into(),
        "--url".into(),
        settings.git_url.clone(),
        "--checkout".into(),
        settings.git_branch.clone(),
        "--directory".into(),
        checkout_path,
        "--inventory".into(),
        "hosts".into(),
        "--tags".into(),
        tags.clone(),
    ];

    if dry_run {
        let rendered = argv
            .iter()
            .map(|arg| shell_escape::escape(arg.as_str().into()))
            .collect::<Vec<_>>()
            .join(" ");
        styling::println!("{rendered}");
        return Ok(());
    }

    for binary in ["pkexec", "ansible-pull"] {
        which::which(binary).with_context(|| format!("{binary} is not installed"))?;
    }

    log::info!("Running ansible-pull with tags: {tags}");
    let status = Command::new(&argv[0])
        .args(&argv[1..])
        .status()
        .context("Failed to launch ansible-pull")?;

    if !status.success() {
        bail!("ansible-pull exited with {status}");
    }
    styling::println!("{}", styling::success_message("VM configuration complete"));
    Ok(())
}
