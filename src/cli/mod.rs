pub mod config;
pub mod render;

use std::{
    env,
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    error::{ContextKind, ErrorKind},
};
use log::{debug, info};

use crate::{
    config::{Config, DEFAULT_LANGUAGE},
    error::{AppError, ConfigError, Result, SessionError},
    session::{DEFAULT_COOKIES_FILE, SessionStore},
    twitter::{SearchProduct, TwitterApi, XClient},
    utils::{self, prompt},
};

pub const SEARCH_COUNT: usize = 20;
pub const LOGIN_HINT: &str = "No cookies found. Run: twitter-run login";

const EXAMPLES: &str = "\
Examples:
  twitter-run login              Log in and save cookies
  twitter-run search <query>     Search latest tweets
  twitter-run trend              Show trending topics
  twitter-run user <username>    Show a profile and recent tweets
  twitter-run tweet <text>       Post a tweet
  twitter-run timeline           Show your home timeline";

#[derive(Parser, Debug)]
#[command(name = "twitter-run", version, about, long_about = None, author, after_help = EXAMPLES)]
pub struct Args {
    /// Where the login session is stored
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_COOKIES_FILE)]
    cookies: PathBuf,

    /// Config file [default: ~/.config/twitter_run/config.toml]
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in with the configured account and save the session cookies.
    Login,

    /// Search tweets.
    Search {
        /// Search tab to read results from
        #[arg(long, value_enum, default_value_t = SearchProduct::Latest)]
        product: SearchProduct,

        /// Search query; prompted for when omitted
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// Show trending topics.
    Trend,

    /// Show a user's profile and recent tweets.
    User {
        /// Screen name, with or without '@'; prompted for when omitted
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        screen_name: Vec<String>,
    },

    /// Post a tweet.
    Tweet {
        /// Tweet body; prompted for when omitted
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        body: Vec<String>,
    },

    /// Show your home timeline.
    Timeline,

    /// Manage config
    Config {
        /// init the config file
        #[arg(long)]
        init: bool,

        /// Open the config in an editor
        #[arg(long, short)]
        edit: bool,

        /// Show the config file.
        #[arg(long)]
        show: bool,

        /// Validate config
        #[arg(long)]
        validate: bool,
    },
}

impl Commands {
    pub fn requires_session(&self) -> bool {
        !matches!(self, Commands::Login | Commands::Config { .. })
    }
}

/// How a dispatched command ended, short of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    NeedsLogin,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Done => ExitCode::SUCCESS,
            Outcome::NeedsLogin => ExitCode::from(1),
        }
    }
}

/// Per-invocation settings handed to [`dispatch`].
#[derive(Debug, Clone)]
pub struct Context {
    pub session: SessionStore,
    pub config_path: PathBuf,
    pub config: Option<Config>,
}

impl Context {
    pub fn language(&self) -> &str {
        self.config
            .as_ref()
            .map_or(DEFAULT_LANGUAGE, |config| config.language.as_str())
    }
}

pub async fn run() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => return parse_failure(err),
    };

    init_logging(args.verbose);

    let Some(command) = args.command else {
        print_usage();
        return ExitCode::SUCCESS;
    };

    match execute(command, args.cookies, args.config).await {
        Ok(outcome) => outcome.into(),
        Err(err) => {
            debug!("{err:?}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(
    command: Commands,
    cookies: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<Outcome> {
    let config_path = match config_path {
        Some(path) => path,
        None => utils::get_config_file()?,
    };
    // `config --edit` has to work on a file that does not parse yet.
    let config = match (&command, Config::load_optional(&config_path)) {
        (Commands::Config { .. }, Err(_)) => None,
        (_, loaded) => loaded?,
    };
    let ctx = Context {
        session: SessionStore::new(cookies),
        config_path,
        config,
    };

    let mut client = XClient::new(ctx.language())?;
    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();

    dispatch(command, &ctx, &mut client, &mut input, &mut out).await
}

/// Runs one command against `client`. Session-requiring commands stop with
/// [`Outcome::NeedsLogin`] before touching the client when no cookies are saved.
pub async fn dispatch<C, R, W>(
    command: Commands,
    ctx: &Context,
    client: &mut C,
    input: &mut R,
    out: &mut W,
) -> Result<Outcome>
where
    C: TwitterApi,
    R: BufRead,
    W: Write,
{
    if command.requires_session() && !restore_session(&ctx.session, client, out)? {
        return Ok(Outcome::NeedsLogin);
    }

    match command {
        Commands::Login => login(ctx, client, out).await?,
        Commands::Search { product, query } => {
            let query = argument_or_prompt(joined(&query), input, out, "Search: ")?;
            let tweets = client.search_tweet(&query, product, SEARCH_COUNT).await?;
            render::search_results(out, &tweets)?;
        }
        Commands::Trend => {
            let trends = client.get_trends("trending").await?;
            render::trends(out, &trends)?;
        }
        Commands::User { screen_name } => {
            let name = match screen_name.first() {
                Some(name) => name.clone(),
                None => prompt(input, out, "Username: ")?,
            };
            let name = non_empty(name.trim_start_matches('@'), "Username")?;
            let user = client.get_user_by_screen_name(name).await?;
            let tweets = client.get_user_tweets(&user).await?;
            render::user_profile(out, &user, &tweets)?;
        }
        Commands::Tweet { body } => {
            let text = argument_or_prompt(joined(&body), input, out, "Tweet: ")?;
            let tweet = client.create_tweet(&text).await?;
            render::posted(out, &tweet)?;
        }
        Commands::Timeline => {
            let tweets = client.get_timeline().await?;
            render::timeline(out, &tweets)?;
        }
        Commands::Config {
            init,
            edit,
            show,
            validate,
        } => {
            if edit {
                config::edit(&ctx.config_path)?;
            } else if show {
                config::show(&ctx.config_path)?;
            } else if init {
                config::init(&ctx.config_path)?;
            } else if validate {
                config::validate(&ctx.config_path)?;
            } else {
                Args::parse_from(["", "config", "--help"]);
            }
        }
    }

    Ok(Outcome::Done)
}

async fn login<C: TwitterApi, W: Write>(ctx: &Context, client: &mut C, out: &mut W) -> Result<()> {
    let config = ctx.config.as_ref().ok_or_else(|| ConfigError::NotFound {
        path: ctx.config_path.clone(),
    })?;
    config.validate()?;

    info!("logging in as {}", config.username);
    client.login(config).await?;
    ctx.session.save(&client.save_cookies())?;
    info!("session saved to {}", ctx.session.path().display());

    writeln!(out, "Login successful! Cookies saved.")?;
    Ok(())
}

/// Loads saved cookies into `client`. `Ok(false)` means there is no session.
fn restore_session<C: TwitterApi, W: Write>(
    session: &SessionStore,
    client: &mut C,
    out: &mut W,
) -> Result<bool> {
    match session.load() {
        Ok(bundle) => {
            client.load_cookies(&bundle);
            Ok(true)
        }
        Err(SessionError::Missing { .. }) => {
            writeln!(out, "{LOGIN_HINT}")?;
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

/// Space-joined positional words, or `None` when there are none.
pub fn joined(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn argument_or_prompt<R: BufRead, W: Write>(
    argument: Option<String>,
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<String> {
    let value = match argument {
        Some(value) => value,
        None => prompt(input, out, label)?,
    };

    non_empty(&value, label.trim_end_matches([':', ' ']))?;
    Ok(value)
}

/// Rejects blank input for `what`.
fn non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(AppError::empty_input(what));
    }
    Ok(value)
}

fn parse_failure(err: clap::Error) -> ExitCode {
    if err.kind() == ErrorKind::InvalidSubcommand {
        let command = err
            .get(ContextKind::InvalidSubcommand)
            .map(ToString::to_string)
            .unwrap_or_default();
        println!("Unknown command: {command}");
        print_usage();
        return ExitCode::SUCCESS;
    }

    let _ = err.print();
    ExitCode::from(err.exit_code().clamp(0, 255) as u8)
}

fn print_usage() {
    let _ = Args::command().print_help();
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filters = env::var("RUST_LOG").unwrap_or_else(|_| format!("warn,twitter_run={level}"));

    let _ = pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .try_init();
}
