use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use webchat::config::DEFAULT_HOST;
use webchat::{ChatSession, ClientConfig, ClientError, MessageList, SubmitOutcome, TerminalView, Variant};

#[derive(Parser, Debug)]
#[command(name = "webchat", about = "WebSocket chat client")]
struct Cli {
    /// Origin host; the client dials `ws://{host}/ws/`.
    #[arg(long, env = "WEBCHAT_HOST", default_value = DEFAULT_HOST, global = true)]
    host: String,

    /// Use `wss://` for the same-origin endpoint.
    #[arg(long, env = "WEBCHAT_SECURE", global = true)]
    secure: bool,

    /// Explicit endpoint URL, overrides --host.
    #[arg(long, env = "WEBCHAT_URL", global = true)]
    url: Option<String>,

    /// bubble, bubble-renamed, bubble-local or flat.
    #[arg(long, env = "WEBCHAT_VARIANT", default_value = "flat", global = true)]
    variant: Variant,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect and chat: stdin lines are submitted, messages print to stdout.
    Connect,
    /// Render frames from stdin (one per line) to `#chat-history` HTML.
    Render,
    /// Print the resolved configuration as JSON.
    Config,
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("webchat=info")))
        .with_writer(std::io::stderr)
        .init();

    if rustls::crypto::ring::default_provider().install_default().is_err() {
        debug!("tls: crypto provider already installed");
    }

    let cli = Cli::parse();
    let config = ClientConfig::new(cli.variant, &cli.host, cli.secure, cli.url);

    match cli.command {
        Command::Connect => run_connect(config).await,
        Command::Render => run_render(&config).await,
        Command::Config => print_config(&config),
    }
}

async fn run_connect(config: ClientConfig) -> Result<(), ClientError> {
    let url = config.url()?;
    let view = TerminalView::new(std::io::stdout());
    let mut session = ChatSession::new(config.render.clone(), view);
    session.on_close(|reason| eprintln!("connection closed: {reason:?}"));
    session.open(&url).await?;
    info!(session_id = %session.id(), variant = %config.variant, %url, "webchat: ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            alive = session.process_next() => {
                if !alive {
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    session.close().await;
                    break;
                };
                let outcome = session.submit_text(line);
                if outcome != SubmitOutcome::Sent {
                    debug!(?outcome, "webchat: input not sent");
                }
            }
        }
    }

    Ok(())
}

async fn run_render(config: &ClientConfig) -> Result<(), ClientError> {
    let mut session = ChatSession::new(config.render.clone(), MessageList::new(config.render.layout));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        session.receive(&line);
    }
    println!("{}", session.view().to_html());
    Ok(())
}

fn print_config(config: &ClientConfig) -> Result<(), ClientError> {
    let value = serde_json::json!({
        "url": config.url()?,
        "config": config,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
