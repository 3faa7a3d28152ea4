//! Startup and interactive loop for the terminal client.
//!
//! Lines starting with `/` are commands; anything else is sent to the
//! displayed conversation (or starts a new one).

use std::io::Write;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::backend::HttpConversationBackend;
use crate::config::{find_model, ClientConfig, AVAILABLE_MODELS};
use crate::currency::{ConversionRequest, CurrencyClient, CURRENCIES};
use crate::navigation::{HistoryNavigator, NavigationBinder, Route};
use crate::session::display::{
    header_title, message_count_label, message_line, SidebarEntry,
};
use crate::session::{
    ConversationId, ConversationStore, SendOutcome, SessionController, SessionError,
};

/// A parsed input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Send text to the displayed conversation.
    Send(String),
    /// List known conversations.
    List,
    /// Display a conversation.
    Open(ConversationId),
    /// Switch to a blank conversation.
    New,
    /// Delete a conversation.
    Delete(ConversationId),
    /// Pick the model for the next new conversation.
    Model(String),
    /// List available models.
    Models,
    /// List available currencies.
    Currencies,
    /// Convert an amount between currencies.
    Convert {
        /// Amount as typed.
        amount: String,
        /// Source currency code.
        from: String,
        /// Target currency code.
        to: String,
    },
    /// Reload the conversation list.
    Refresh,
    /// Clear the error slot.
    Dismiss,
    /// Show the commands.
    Help,
    /// Leave.
    Quit,
    /// Unknown or malformed command.
    Invalid(String),
}

impl FromStr for Command {
    type Err = std::convert::Infallible;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Ok(Self::Send(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        let command = match (name, args.as_slice()) {
            ("list" | "ls", []) => Self::List,
            ("open", [id]) => Self::Open(ConversationId::from(*id)),
            ("new", []) => Self::New,
            ("delete" | "rm", [id]) => Self::Delete(ConversationId::from(*id)),
            ("model", [id]) => Self::Model((*id).to_string()),
            ("models", []) => Self::Models,
            ("currencies", []) => Self::Currencies,
            ("convert", [amount, from, to]) => Self::Convert {
                amount: (*amount).to_string(),
                from: (*from).to_string(),
                to: (*to).to_string(),
            },
            ("refresh", []) => Self::Refresh,
            ("dismiss", []) => Self::Dismiss,
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit" | "q", []) => Self::Quit,
            _ => Self::Invalid(trimmed.to_string()),
        };
        Ok(command)
    }
}

const HELP: &str = "\
Commands:
  <text>                      send a message (Enter sends)
  /list                       list conversations
  /open <id>                  display a conversation
  /new                        start a blank conversation
  /delete <id>                delete a conversation
  /model <id>                 model for the next new conversation
  /models                     list models
  /convert <amount> <from> <to>
  /currencies                 list currencies
  /refresh                    reload conversations
  /dismiss                    clear the error message
  /quit";

/// Write a block of text to stdout, ignoring broken pipes.
fn emit(text: &str) {
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "{text}");
    let _ = out.flush();
}

/// Interactive session state.
struct ChatApp {
    controller: SessionController,
    currency: CurrencyClient,
    default_model: String,
    model: Option<String>,
}

impl ChatApp {
    fn new(config: &ClientConfig, initial: Route) -> Result<Self, String> {
        let backend = HttpConversationBackend::new(config)
            .map_err(|e| format!("Failed to create conversation client: {e}"))?;
        let currency = CurrencyClient::new(config)
            .map_err(|e| format!("Failed to create currency client: {e}"))?;

        let store = Arc::new(ConversationStore::new());
        let navigator = Arc::new(HistoryNavigator::new(initial));
        let binder = NavigationBinder::new(Arc::clone(&store), navigator);
        let controller = SessionController::new(
            Arc::new(backend),
            store,
            binder,
            config.default_model.clone(),
        );

        Ok(Self {
            controller,
            currency,
            default_model: config.default_model.clone(),
            model: None,
        })
    }

    /// Handle one line; returns `false` when the user quits.
    async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Send(text) => self.send(text).await,
            Command::List => self.list(),
            Command::Open(id) => match self.controller.open_conversation(&id) {
                Some(_) => self.show_displayed(),
                None => emit(&format!("Unknown conversation {id}")),
            },
            Command::New => {
                self.controller.new_conversation();
                self.show_displayed();
            }
            Command::Delete(id) => match self.controller.delete_conversation(&id).await {
                Ok(()) => emit(&format!("Deleted {id}")),
                Err(err) => emit(&format!("Error: {err}")),
            },
            Command::Model(id) => self.select_model(&id),
            Command::Models => {
                for model in AVAILABLE_MODELS {
                    emit(&format!("  {:<22} {}", model.id, model.label));
                }
            }
            Command::Currencies => {
                for currency in CURRENCIES {
                    emit(&format!("  {}", currency.label()));
                }
            }
            Command::Convert { amount, from, to } => self.convert(&amount, &from, &to).await,
            Command::Refresh => match self.controller.refresh().await {
                Ok(count) => emit(&format!("Loaded {count} new conversations")),
                Err(err) => emit(&format!("Error: {err}")),
            },
            Command::Dismiss => self.controller.dismiss_error(),
            Command::Help => emit(HELP),
            Command::Quit => return false,
            Command::Invalid(line) => emit(&format!("Unknown command: {line} (try /help)")),
        }
        true
    }

    async fn send(&self, text: String) {
        if self.controller.is_busy() {
            emit("Sending...");
            return;
        }

        self.controller.set_input(text);
        match self.controller.submit(self.model.as_deref()).await {
            Ok(SendOutcome::Created(_)) => self.show_displayed(),
            Ok(SendOutcome::Updated(conversation)) => {
                let now = Utc::now();
                if let Some(reply) = conversation.last_message() {
                    emit(&message_line(reply, now));
                }
            }
            Ok(SendOutcome::Skipped) => {}
            Ok(SendOutcome::Discarded(err)) => tracing::warn!("Reply discarded: {err}"),
            Err(SessionError::RequestFailed(_)) => {
                if let Some(message) = self.controller.error() {
                    emit(&format!("Error: {message}"));
                }
            }
            Err(err) => emit(&format!("Error: {err}")),
        }
    }

    fn list(&self) {
        let conversations = self.controller.store().list();
        if conversations.is_empty() {
            emit("No conversations yet");
            return;
        }

        let now = Utc::now();
        let active = self.controller.binder().active_id();
        for conversation in conversations.iter().rev() {
            let entry = SidebarEntry::new(conversation, now);
            let marker = if active.as_ref() == Some(&entry.id) { '*' } else { ' ' };
            emit(&format!("{marker} {}  {}  ({})", entry.id, entry.title, entry.started));
        }
    }

    fn select_model(&mut self, id: &str) {
        if self.controller.displayed().is_some() {
            emit("The model is fixed once a conversation exists; use /new first");
            return;
        }
        match find_model(id) {
            Some(model) => {
                self.model = Some(model.id.to_string());
                emit(&format!("Model: {}", model.label));
            }
            None => emit(&format!("Unknown model {id} (try /models)")),
        }
    }

    async fn convert(&self, amount: &str, from: &str, to: &str) {
        let request = match ConversionRequest::parse(amount, from, to) {
            Ok(request) => request,
            Err(err) => {
                emit(&format!("Error: {err}"));
                return;
            }
        };
        match self.currency.convert(&request).await {
            Ok(converted) => emit(&format!("{converted} {}", request.target_currency)),
            Err(err) => emit(&format!("Error: {err}")),
        }
    }

    fn show_displayed(&self) {
        let displayed = self.controller.displayed();
        let Some(conversation) = displayed.as_deref() else {
            let model = self.model.as_deref().unwrap_or(&self.default_model);
            emit(&format!("== {} ({model})", header_title(None)));
            return;
        };

        emit(&format!(
            "== {} [{}] {}",
            header_title(Some(conversation)),
            conversation.id,
            message_count_label(conversation)
        ));
        let now = Utc::now();
        for message in &conversation.messages {
            emit(&message_line(message, now));
        }
    }
}

/// Initialize tracing with `RUST_LOG` support, logging to stderr.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Read lines from stdin until EOF or `/quit`.
async fn run_loop(mut app: ChatApp) -> std::io::Result<()> {
    if let Err(err) = app.controller.refresh().await {
        tracing::warn!("Starting without conversation list: {err}");
    }
    app.show_displayed();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Ok(command) = line.parse::<Command>();
        if !app.handle(command).await {
            break;
        }
    }
    Ok(())
}

/// Run the terminal client.
///
/// The first argument, if any, is the initial route (e.g. `/conversation/<id>`).
///
/// # Returns
/// `ExitCode::SUCCESS` on a clean exit, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    init_tracing();

    tracing::info!("Starting chatbridge v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {e}");
        return ExitCode::from(1);
    }
    tracing::info!("Conversation endpoint: {}", config.api_base_url);

    let initial = match std::env::args().nth(1).map(|arg| arg.parse::<Route>()) {
        None => Route::Home,
        Some(Ok(route)) => route,
        Some(Err(e)) => {
            tracing::error!("{e}");
            return ExitCode::from(1);
        }
    };

    let app = match ChatApp::new(&config, initial) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(run_loop(app)) {
        tracing::error!("Input error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}
