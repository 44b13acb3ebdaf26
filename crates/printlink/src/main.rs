mod app;
mod cli;
mod commands;
mod host;

use clap::Parser;
use cli::{Cli, Commands, InstanceAction, PluginAction};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let app = app::App::open()?;

    match cli.command {
        Commands::Init => commands::init::run(&app),
        Commands::Status => commands::status::run(&app),
        Commands::Version => commands::version::run(),
        Commands::Instances { action } => match action {
            Some(InstanceAction::List) | None => commands::instances::run_list(&app),
            Some(InstanceAction::Add {
                name,
                url,
                key,
                default,
            }) => commands::instances::run_add(&app, &name, &url, &key, default),
            Some(InstanceAction::Edit {
                target,
                name,
                url,
                key,
                default,
            }) => commands::instances::run_edit(
                &app,
                &target,
                commands::instances::FieldEdits {
                    name,
                    url,
                    key,
                    default,
                },
            ),
            Some(InstanceAction::Remove { target }) => {
                commands::instances::run_remove(&app, &target)
            }
            Some(InstanceAction::Default { target }) => {
                commands::instances::run_default(&app, &target)
            }
        },
        Commands::Send { file, to, auto } => commands::send::run(&app, &file, to.as_deref(), auto),
        Commands::Plugins { action } => match action {
            Some(PluginAction::List) | None => commands::plugins::run_list(&app),
            Some(PluginAction::Enable { name }) => commands::plugins::run_enable(&app, &name),
            Some(PluginAction::Disable { name }) => commands::plugins::run_disable(&app, &name),
        },
    }
}
