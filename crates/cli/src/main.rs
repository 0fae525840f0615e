use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_kernel::settings::Settings;

/// Shelf books and sellers service
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    /// Override `database.url` from the configuration
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply migrations and run the HTTP server
    Serve {
        /// Override `server.port` from the configuration
        #[arg(long)]
        port: Option<u16>,
    },
    /// Apply pending migrations and exit
    Migrate,
    /// List registered modules and the migrations they contribute
    Modules,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load Shelf settings")?;
    if let Some(url) = cli.database_url {
        settings.database.url = url;
    }
    shelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            shelf_app::serve(settings).await
        }
        Command::Migrate => {
            let applied = shelf_app::migrate(&settings).await?;
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::Modules => {
            let registry = shelf_app::registry();
            let migrations = registry.collect_migrations();
            for module in registry.modules() {
                println!("{}", module.name());
                for (_, migration) in migrations.iter().filter(|(name, _)| name == module.name()) {
                    println!("  {}", migration.id);
                }
            }
            Ok(())
        }
    }
}
