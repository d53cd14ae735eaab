use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod feed;
mod models;
mod services;
mod utils;

use api::sinpe::SinpeClient;
use commands::Reply;
use config::AppConfig;
use feed::{FeedHandle, MovementFeed};
use services::contacts_service::ContactBook;
use utils::TokenCipher;

/// Everything a command needs, shared for the lifetime of the session
pub struct AppContext {
    pub client: Arc<SinpeClient>,
    pub feed: FeedHandle<Arc<SinpeClient>>,
    pub contacts: ContactBook,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Logs go to stderr so they do not interleave with command output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sinpe_movil=info,reqwest=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [command, token] = args.as_slice() {
        if command == "encrypt-token" {
            encrypt_token(token);
            return;
        }
    }

    info!("Starting SINPE móvil client...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    utils::ratelimit::set_requests_per_second(config.requests_per_second);

    let client = Arc::new(SinpeClient::new(config.api_url.clone(), config.api_token.clone()));
    info!("Using banking API at {}", config.api_url);

    let mut movement_feed = MovementFeed::new(Arc::clone(&client));
    if let Some(timeout) = config.feed_timeout {
        movement_feed = movement_feed.with_timeout(timeout);
    }

    let contacts = match &config.contacts_file {
        Some(path) => match ContactBook::load(path).await {
            Ok(book) => {
                info!("Loaded {} contacts", book.len());
                book
            }
            Err(e) => {
                warn!("Contacts unavailable: {}", e);
                ContactBook::default()
            }
        },
        None => ContactBook::default(),
    };

    let ctx = AppContext {
        client,
        feed: FeedHandle::new(movement_feed),
        contacts,
    };

    // Home screen: balance first, then the newest movements
    for startup in ["balance", "refresh"] {
        if let Reply::Text(text) = commands::handle_line(&ctx, startup).await {
            println!("{}\n", text);
        }
    }
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };

        match commands::handle_line(&ctx, &line).await {
            Reply::Text(text) => println!("{}\n", text),
            Reply::Quit => break,
            Reply::Nothing => {}
        }
    }

    info!("Bye");
}

/// Print the sealed form of `token` for `SINPE_API_TOKEN_ENC`
fn encrypt_token(token: &str) {
    let Ok(key) = std::env::var("ENCRYPTION_KEY") else {
        error!("ENCRYPTION_KEY not set");
        return;
    };

    match TokenCipher::from_hex(&key).and_then(|cipher| cipher.seal(token)) {
        Ok(sealed) => println!("SINPE_API_TOKEN_ENC={}", sealed),
        Err(e) => error!("Failed to encrypt token: {}", e),
    }
}
