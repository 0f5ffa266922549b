// CarePlus CLI — drive the care portal engine from a terminal.
// `careplus chat` opens a widget session as a REPL, `careplus register`
// submits a registration draft against a demo auth service, `specialties`
// prints the catalog the form offers, `completions` emits shell completions.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::{info, warn};
use parking_lot::Mutex;
use tokio::io::AsyncBufReadExt;

use careplus_core::{
    Authenticator, ChatConfig, ChatEvent, ChatSession, EngineResult, ListenOptions, Navigator,
    RegistrationFlow, ReplyStrategy, Role, Sender, SpeechCapture, SubmitOutcome, UserData,
    SPECIALTIES,
};

#[derive(Parser, Debug)]
#[command(name = "careplus", version)]
#[command(about = "CarePlus care portal engine, from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a chat session and talk to the bot interactively.
    Chat {
        /// Reply strategy. Defaults to the floating assistant's script.
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Override the reply delay in milliseconds.
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,

        /// Load the session config from a JSON file first; flags win over it.
        #[arg(long, env = "CAREPLUS_CHAT_CONFIG", value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Submit a registration draft and print the outcome.
    Register(RegisterArgs),

    /// List the doctor specialties the registration form offers.
    Specialties,

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    /// Whole-input lookup against the assistant script.
    Exact,
    /// Substring keyword rules, as the dashboard helpdesk uses.
    Keyword,
}

impl From<StrategyArg> for ReplyStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Exact => ReplyStrategy::ExactMatch,
            StrategyArg::Keyword => ReplyStrategy::KeywordHeuristic,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RoleArg {
    Patient,
    Doctor,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Patient => Role::Patient,
            RoleArg::Doctor => Role::Doctor,
        }
    }
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long, value_enum)]
    role: RoleArg,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    /// Defaults to --password when omitted.
    #[arg(long)]
    confirm_password: Option<String>,
    #[arg(long, default_value = "")]
    phone: String,
    /// Patient drafts only.
    #[arg(long, default_value = "")]
    date_of_birth: String,
    /// Patient drafts only.
    #[arg(long, default_value = "")]
    gender: String,
    /// Patient drafts only.
    #[arg(long, default_value = "")]
    address: String,
    /// Required for doctors.
    #[arg(long, default_value = "")]
    license_number: String,
    /// Required for doctors; see `careplus specialties`.
    #[arg(long, default_value = "")]
    specialty: String,
    #[arg(long, default_value = "")]
    experience: String,
    #[arg(long, default_value = "")]
    clinic: String,
    /// Make the demo auth service decline, to exercise the failure path.
    #[arg(long)]
    decline: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match Cli::parse().command {
        Command::Chat { strategy, delay_ms, config } => {
            let mut config = load_chat_config(config.as_deref());
            if let Some(strategy) = strategy {
                config.strategy = strategy.into();
            }
            if let Some(delay_ms) = delay_ms {
                config.reply_delay_ms = delay_ms;
            }
            run_chat(config).await
        }
        Command::Register(args) => run_register(args).await,
        Command::Specialties => {
            for specialty in SPECIALTIES {
                println!("{specialty}");
            }
            ExitCode::SUCCESS
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::SUCCESS
        }
    }
}

fn load_chat_config(path: Option<&std::path::Path>) -> ChatConfig {
    let Some(path) = path else {
        return ChatConfig::default();
    };
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("[cli] Cannot read {}: {} (using defaults)", path.display(), e);
            return ChatConfig::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(config) => config,
        Err(e) => {
            warn!("[cli] Bad chat config {}: {} (using defaults)", path.display(), e);
            ChatConfig::default()
        }
    }
}

// ── Chat REPL ──────────────────────────────────────────────────────────────

/// Dictation stand-in for the terminal: `/voice <text>` types what the
/// microphone would have heard.
#[derive(Default)]
struct TypedMicrophone {
    listening: AtomicBool,
    buffer: Mutex<String>,
}

impl TypedMicrophone {
    fn hear(&self, text: &str) {
        self.buffer.lock().push_str(text);
    }
}

impl SpeechCapture for TypedMicrophone {
    fn is_supported(&self) -> bool {
        true
    }

    fn start(&self, _options: ListenOptions) -> EngineResult<()> {
        self.listening.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> EngineResult<()> {
        self.listening.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn transcript(&self) -> String {
        self.buffer.lock().clone()
    }

    fn reset(&self) {
        self.buffer.lock().clear();
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }
}

async fn run_chat(config: ChatConfig) -> ExitCode {
    println!(
        "CarePlus chat ({:?}, {} ms reply delay). Plain text sends a message;",
        config.strategy, config.reply_delay_ms
    );
    println!("/attach <file>, /voice <text>, /transcript, /quit.");

    let microphone = Arc::new(TypedMicrophone::default());
    let session = ChatSession::with_speech(config, microphone.clone());
    info!("[cli] {} ready", session.id());

    // Bot replies land asynchronously; print them as they arrive.
    let mut events = session.subscribe();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                ChatEvent::MessageAppended { message, .. } if message.sender == Sender::Bot => {
                    println!("[{}] bot: {}", chrono::Local::now().format("%H:%M:%S"), message.text);
                }
                ChatEvent::Closed { .. } => break,
                _ => {}
            }
        }
    });

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) | Err(_) => break,
        };
        let line = line.trim();

        if line == "/quit" {
            break;
        }
        if line == "/transcript" {
            for message in session.transcript() {
                let who = match message.sender {
                    Sender::User => "you",
                    Sender::Bot => "bot",
                };
                println!("{who}: {}", message.text);
            }
            continue;
        }
        if let Some(file) = line.strip_prefix("/attach ") {
            if let Err(e) = session.attach_file(file.trim()) {
                eprintln!("{e}");
            }
            continue;
        }
        if let Some(text) = line.strip_prefix("/voice ") {
            let spoken = text.trim();
            match session.start_voice() {
                Ok(()) => {
                    microphone.hear(spoken);
                    match session.stop_voice() {
                        Ok(true) => {}
                        Ok(false) => println!("(heard nothing)"),
                        Err(e) => eprintln!("{e}"),
                    }
                }
                Err(e) => eprintln!("{e}"),
            }
            continue;
        }
        if line.starts_with('/') {
            eprintln!("Unknown command: {line}");
            continue;
        }
        if let Err(e) = session.send(line) {
            eprintln!("{e}");
        }
    }

    session.close();
    let _ = printer.await;
    ExitCode::SUCCESS
}

// ── Registration ───────────────────────────────────────────────────────────

/// Demo stand-in for the auth service: accepts (or declines on request)
/// without talking to anything.
struct DemoAuthService {
    decline: bool,
}

#[async_trait]
impl Authenticator for DemoAuthService {
    async fn register(&self, user: UserData) -> EngineResult<bool> {
        info!("[cli] register called for {} ({})", user.email, user.role.as_str());
        Ok(!self.decline)
    }
}

struct PrintRouter;

impl Navigator for PrintRouter {
    fn navigate(&self, path: &str) {
        println!("Navigating to {path}");
    }
}

async fn run_register(args: RegisterArgs) -> ExitCode {
    let role: Role = args.role.into();
    let flow = RegistrationFlow::new(
        Arc::new(DemoAuthService { decline: args.decline }),
        Arc::new(PrintRouter),
    );

    let confirm = args.confirm_password.clone().unwrap_or_else(|| args.password.clone());
    match role {
        Role::Patient => flow.update_patient(|d| {
            d.first_name = args.first_name.clone();
            d.last_name = args.last_name.clone();
            d.email = args.email.clone();
            d.phone = args.phone.clone();
            d.date_of_birth = args.date_of_birth.clone();
            d.gender = args.gender.clone();
            d.address = args.address.clone();
            d.password = args.password.clone();
            d.confirm_password = confirm.clone();
        }),
        Role::Doctor => flow.update_doctor(|d| {
            d.first_name = args.first_name.clone();
            d.last_name = args.last_name.clone();
            d.email = args.email.clone();
            d.phone = args.phone.clone();
            d.license_number = args.license_number.clone();
            d.specialty = args.specialty.clone();
            d.experience = args.experience.clone();
            d.clinic = args.clinic.clone();
            d.password = args.password.clone();
            d.confirm_password = confirm.clone();
        }),
    }

    match flow.submit(role).await {
        SubmitOutcome::Registered { destination } => {
            println!("Registered. Dashboard: {destination}");
            ExitCode::SUCCESS
        }
        SubmitOutcome::Rejected { message } => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
        SubmitOutcome::InProgress => {
            eprintln!("A submission is already in flight");
            ExitCode::FAILURE
        }
    }
}
