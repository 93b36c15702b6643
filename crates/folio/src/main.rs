use clap::{Parser, Subcommand};
use folio_config::Config;
use folio_core::EffectSelection;

mod backdrop;
mod serve;

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Portfolio backdrop effects and contact-form mail relay")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the contact-form mail relay.
    Serve {
        /// Interface to listen on (overrides config and FOLIO_HOST).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config and PORT).
        #[arg(long)]
        port: Option<u16>,

        /// Keep notifications in memory instead of sending them.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Play the backdrop effects in the terminal.
    Backdrop {
        /// particles, aurora, nebula or all.
        #[arg(long, value_parser = parse_effect)]
        effect: Option<EffectSelection>,
    },
    /// Show the effective configuration.
    Config {
        /// Write a default config file if none exists.
        #[arg(long, default_value_t = false)]
        init: bool,
    },
}

fn parse_effect(name: &str) -> Result<EffectSelection, String> {
    EffectSelection::from_name(name)
        .ok_or_else(|| format!("unknown effect {name:?}, expected particles, aurora, nebula or all"))
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command {
        Command::Serve {
            host,
            port,
            dry_run,
        } => {
            if let Some(host) = host {
                config.relay.host = host;
            }
            match port {
                Some(port) => config.relay.port = port,
                None => config.relay.apply_port_env(|key| std::env::var(key).ok())?,
            }
            serve::run(&config.relay, dry_run)
        }
        Command::Backdrop { effect } => {
            if let Some(effect) = effect {
                config.background.effect = effect;
            }
            let terminal = ratatui::init();
            let result = backdrop::App::new(&config.background).run(terminal);
            ratatui::restore();
            result
        }
        Command::Config { init } => show_config(&config, init),
    }
}

fn show_config(config: &Config, init: bool) -> color_eyre::Result<()> {
    match folio_config::config_path() {
        Some(path) if path.exists() => println!("config file: {}", path.display()),
        Some(_) if init => {
            let path = Config::default().save()?;
            println!("wrote defaults to {}", path.display());
        }
        Some(path) => println!("config file: {} (not created)", path.display()),
        None => println!("config file: unavailable on this platform"),
    }
    println!("{:#?}", config.relay);
    println!("{:#?}", config.background);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["folio", "serve", "--port", "8080", "--dry-run"]).unwrap();
        match cli.command {
            Command::Serve {
                host,
                port,
                dry_run,
            } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(8080));
                assert!(dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_effect() {
        let cli = Cli::try_parse_from(["folio", "backdrop", "--effect", "Aurora"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Backdrop {
                effect: Some(EffectSelection::Aurora)
            }
        ));
        assert!(Cli::try_parse_from(["folio", "backdrop", "--effect", "plasma"]).is_err());
    }
}
