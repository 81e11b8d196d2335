//! HMS Access CLI - Main entry point for CLI binary
//!
//! This binary provides the `hms-access` tool for inspecting role permissions.

use anyhow::Context;
use hms_access_lib::engine::{
    cli::formatter::{pad, permission_cell, CliFormatter},
    cli::{ActorArgs, Cli, Commands, OutputFormat},
    config::Config,
    guards::{filter_navigation, Guard},
    rbac::{AccessPolicy, Catalog, Resource, Role, RoleView},
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_cli(cli) {
        CliFormatter::error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let project_dir = cli.get_project_dir();
    let config = Config::load_or_default(&project_dir)
        .with_context(|| format!("loading config from {}", project_dir.display()))?;
    init_tracing(&config);

    let json_output = cli.format == OutputFormat::Json;

    match cli.command {
        Commands::Check { resource, action, actor } => {
            cmd_check(&resource, &action, &actor, json_output)?;
        }
        Commands::Access { resource, actor } => {
            cmd_access(&resource, &actor, json_output)?;
        }
        Commands::Whoami { actor } => {
            cmd_whoami(&actor, json_output)?;
        }
        Commands::Nav { actor } => {
            cmd_nav(&config, &actor, json_output)?;
        }
        Commands::Matrix => {
            cmd_matrix(json_output)?;
        }
    }

    Ok(())
}

fn resolve_view(actor: &ActorArgs) -> anyhow::Result<RoleView> {
    let role = actor.active_role().context("resolving actor")?;
    Ok(RoleView::new(role))
}

fn cmd_check(resource: &str, action: &str, actor: &ActorArgs, json: bool) -> anyhow::Result<()> {
    let view = resolve_view(actor)?;
    let allowed = Guard::permission_str(resource, Some(action)).allows(&view);

    if json {
        println!("{}", serde_json::json!({
            "role": view.active_role(),
            "resource": resource,
            "action": action,
            "allowed": allowed,
        }));
    } else if allowed {
        CliFormatter::allowed(&format!("{} may {} {}", view.active_role(), action, resource));
    } else {
        CliFormatter::denied(&format!("{} may not {} {}", view.active_role(), action, resource));
    }

    Ok(())
}

fn cmd_access(resource: &str, actor: &ActorArgs, json: bool) -> anyhow::Result<()> {
    let view = resolve_view(actor)?;
    let accessible = view.can_access_str(resource);

    if json {
        println!("{}", serde_json::json!({
            "role": view.active_role(),
            "resource": resource,
            "accessible": accessible,
        }));
    } else if accessible {
        CliFormatter::allowed(&format!("{} can access {}", view.active_role(), resource));
    } else {
        CliFormatter::denied(&format!("{} cannot access {}", view.active_role(), resource));
    }

    Ok(())
}

fn cmd_whoami(actor: &ActorArgs, json: bool) -> anyhow::Result<()> {
    let profile = actor.actor().context("resolving actor")?;
    let role = hms_access_lib::active_role(&profile);

    if json {
        println!("{}", serde_json::json!({
            "role": role,
            "declared_role": profile.as_ref().and_then(|a| a.role.clone()),
            "signed_in": profile.is_some(),
        }));
    } else {
        CliFormatter::header("Active role");
        CliFormatter::kv("Role", role.as_str());
        if let Some(profile) = &profile {
            if let Some(email) = &profile.email {
                CliFormatter::kv("Email", email);
            }
            CliFormatter::kv("Declared", profile.role.as_deref().unwrap_or("(none)"));
        } else {
            CliFormatter::kv("Declared", "(signed out)");
        }
    }

    Ok(())
}

fn cmd_nav(config: &Config, actor: &ActorArgs, json: bool) -> anyhow::Result<()> {
    let view = resolve_view(actor)?;
    let visible = filter_navigation(&view, &config.navigation);

    if json {
        println!("{}", serde_json::json!({
            "role": view.active_role(),
            "navigation": visible,
        }));
    } else {
        CliFormatter::header(&format!("Navigation for {}", view.active_role()));
        for item in visible {
            CliFormatter::item(&format!("{} ({})", item.label, item.route));
        }
    }

    Ok(())
}

fn cmd_matrix(json: bool) -> anyhow::Result<()> {
    if json {
        let rows: Vec<_> = Catalog::entries()
            .map(|(role, resource, permissions)| serde_json::json!({
                "role": role,
                "resource": resource,
                "actions": permissions,
            }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let width = Resource::ALL.iter().map(|r| r.as_str().len()).max().unwrap_or(0);
    let mut columns = vec![pad("resource", width)];
    columns.extend(Role::ALL.iter().map(|r| pad(r.as_str(), 12)));

    CliFormatter::header("Permission matrix");
    CliFormatter::table_header(&columns);
    for resource in Resource::ALL {
        let mut row = vec![pad(resource.as_str(), width)];
        row.extend(Role::ALL.iter().map(|role| pad(&permission_cell(Catalog::permissions_for(*role, resource)), 12)));
        CliFormatter::table_row(&row);
    }

    Ok(())
}
