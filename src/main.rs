use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crosscast::auth::{Platform, Token};
use crosscast::providers::{ProviderAdapter, ProviderConfig, SoundCloud, YouTube};
use crosscast::{load_config, Credential, CrosscastError};

#[derive(Parser)]
#[command(
    name = "crosscast",
    version,
    about = "Upload media to YouTube and SoundCloud"
)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sign-in URL for a platform and open it in the browser
    Signin {
        platform: Platform,

        /// Only print the URL, don't open a browser
        #[arg(long)]
        no_browser: bool,
    },

    /// Exchange an authorization code for an access token
    Auth {
        platform: Platform,

        /// Code returned to the redirect URI after the user granted access
        code: String,
    },

    /// Refresh an expired access token
    Refresh {
        platform: Platform,

        /// Refresh token from a previous authentication
        refresh_token: String,
    },

    /// Upload a media file
    Upload {
        platform: Platform,

        /// Path to the media file
        file: PathBuf,

        /// Title for the uploaded video or track
        #[arg(long)]
        title: String,

        /// Refresh token from a previous authentication
        #[arg(long)]
        refresh_token: String,
    },

    /// List your SoundCloud tracks
    Tracks {
        /// Refresh token from a previous authentication
        #[arg(long)]
        refresh_token: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("CROSSCAST_LOG_LEVEL")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CrosscastError> {
    let settings = |platform: Platform| -> Result<ProviderConfig, CrosscastError> {
        let config = load_config(cli.config.as_deref())?;
        config.provider(platform).cloned().ok_or_else(|| {
            CrosscastError::Config {
                path: crosscast::config::config_path(cli.config.as_deref()),
                detail: format!("no '{platform}' section configured"),
            }
        })
    };

    match cli.command {
        Commands::Signin {
            platform,
            no_browser,
        } => {
            let url = match platform {
                Platform::YouTube => YouTube::new(settings(platform)?).sign_in_url()?,
                Platform::SoundCloud => SoundCloud::new(settings(platform)?).sign_in_url()?,
            };
            println!("{url}");
            if !no_browser && webbrowser::open(&url).is_err() {
                tracing::warn!("could not open a browser, visit the URL manually");
            }
            Ok(())
        }

        Commands::Auth { platform, code } => {
            let credential = match platform {
                Platform::YouTube => YouTube::new(settings(platform)?).authenticate(&code).await?,
                Platform::SoundCloud => {
                    SoundCloud::new(settings(platform)?).authenticate(&code).await?
                }
            };
            print_token(&credential).await;
            Ok(())
        }

        Commands::Refresh {
            platform,
            refresh_token,
        } => {
            let credential = match platform {
                Platform::YouTube => {
                    YouTube::new(settings(platform)?)
                        .refresh_token(&refresh_token)
                        .await?
                }
                Platform::SoundCloud => {
                    SoundCloud::new(settings(platform)?)
                        .refresh_token(&refresh_token)
                        .await?
                }
            };
            print_token(&credential).await;
            Ok(())
        }

        Commands::Upload {
            platform,
            file,
            title,
            refresh_token,
        } => {
            let receipt = match platform {
                Platform::YouTube => {
                    let adapter = YouTube::new(settings(platform)?);
                    let credential = adapter.refresh_token(&refresh_token).await?;
                    adapter.upload(&credential, &file, &title).await?
                }
                Platform::SoundCloud => {
                    let adapter = SoundCloud::new(settings(platform)?);
                    let credential = adapter.refresh_token(&refresh_token).await?;
                    adapter.upload(&credential, &file, &title).await?
                }
            };
            println!("{receipt:#}");
            Ok(())
        }

        Commands::Tracks { refresh_token } => {
            let adapter = SoundCloud::new(settings(Platform::SoundCloud)?);
            let credential = adapter.refresh_token(&refresh_token).await?;
            let tracks = adapter.list_tracks(&credential).await?;
            if tracks.is_empty() {
                println!("No tracks found");
            }
            for track in tracks {
                match track.id {
                    Some(id) => println!("{id}\t{}", track.title),
                    None => println!("-\t{}", track.title),
                }
            }
            Ok(())
        }
    }
}

async fn print_token(credential: &Credential) {
    let Token {
        access_token,
        expires_at,
        scope,
        refresh_token,
        ..
    } = credential.token().await;
    println!("Access token:  {access_token}");
    if !refresh_token.is_empty() {
        println!("Refresh token: {refresh_token}");
    }
    if !scope.is_empty() {
        println!("Scope:         {scope}");
    }
    println!("Expires:       {expires_at}");
}
