use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

/// Base URL of the 42 intra API used when `FT_PROVIDER_BASE_URL` is not set.
/// Override in tests to point at a mock server.
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.intra.42.fr";

/// Path suffix the registered callback URL is expected to end with.
const CALLBACK_PATH: &str = "/auth/42/callback";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// OAuth client ID issued by the 42 intra application dashboard.
    #[arg(long, env)]
    ft_client_id: Option<String>,

    /// OAuth client secret issued by the 42 intra application dashboard.
    #[arg(long, env)]
    ft_client_secret: Option<String>,

    /// Externally visible base URL of this application. Defaults to
    /// http://localhost:<port> when unset.
    #[arg(long, env)]
    base_url: Option<String>,

    /// Exact callback URL registered with the provider. Overrides the URL
    /// derived from the base URL; passed through verbatim (no trimming) so a
    /// stray character shows up in the preflight warnings instead of being
    /// silently changed.
    #[arg(long, env)]
    ft_callback_url: Option<String>,

    /// Base URL of the 42 intra API.
    #[arg(long, env, default_value = DEFAULT_PROVIDER_BASE_URL)]
    ft_provider_base_url: String,

    /// Secret used to sign the session cookie.
    #[arg(long, env, default_value = "dev_secret")]
    session_secret: String,

    /// Session expiry in seconds (default: 6 hours)
    #[arg(long, env, default_value_t = 21600)]
    pub session_expiry_seconds: u64,

    /// Path of the JSON file holding recorded guesses.
    #[arg(long, env, default_value = "data/results.json")]
    data_file: PathBuf,

    /// The word players are trying to guess. Compared case- and
    /// whitespace-insensitively.
    #[arg(long, env, default_value = "babelfish")]
    target_word: String,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 3000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn client_id(&self) -> Option<String> {
        self.ft_client_id.clone()
    }

    pub fn client_secret(&self) -> Option<String> {
        self.ft_client_secret.clone()
    }

    /// Returns the externally visible base URL, derived from the listening
    /// port when not configured explicitly.
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    /// Returns the callback URL used in both the authorize request and the
    /// token exchange. Must be byte-identical to the URL registered with the
    /// provider.
    pub fn callback_url(&self) -> String {
        self.ft_callback_url
            .clone()
            .unwrap_or_else(|| format!("{}{}", self.base_url(), CALLBACK_PATH))
    }

    pub fn provider_base_url(&self) -> &str {
        &self.ft_provider_base_url
    }

    pub fn session_secret(&self) -> &str {
        &self.session_secret
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn target_word(&self) -> &str {
        &self.target_word
    }

    pub fn set_client_credentials(mut self, client_id: &str, client_secret: &str) -> Self {
        self.ft_client_id = Some(client_id.to_string());
        self.ft_client_secret = Some(client_secret.to_string());
        self
    }

    pub fn set_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn set_callback_url(mut self, callback_url: String) -> Self {
        self.ft_callback_url = Some(callback_url);
        self
    }

    pub fn set_provider_base_url(mut self, provider_base_url: String) -> Self {
        self.ft_provider_base_url = provider_base_url;
        self
    }

    pub fn set_data_file(mut self, data_file: PathBuf) -> Self {
        self.data_file = data_file;
        self
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }

    /// Startup consistency checks for the OAuth configuration. Every finding
    /// is a warning to log, never a fatal error: the registered callback URL
    /// is a deployment invariant this process cannot verify against the
    /// provider, only sanity-check.
    pub fn preflight_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.ft_client_id.is_none() || self.ft_client_secret.is_none() {
            warnings.push(
                "Missing 42 OAuth credentials. Set FT_CLIENT_ID and FT_CLIENT_SECRET".to_string(),
            );
        }

        let callback = self.callback_url();
        if callback.contains(char::is_whitespace) {
            warnings.push(format!(
                "Callback URL contains whitespace: {callback:?} (check FT_CALLBACK_URL for stray spaces)"
            ));
        }
        if callback.contains("oauth/authorize") {
            warnings.push(format!(
                "Callback URL points at the provider's authorize endpoint ({callback}). \
                 It must point at this application, e.g. {}{CALLBACK_PATH}",
                self.base_url()
            ));
        }

        match (Url::parse(&self.base_url()), Url::parse(&callback)) {
            (Ok(base), Ok(cb)) => {
                if base.host_str() != cb.host_str() {
                    warnings.push(format!(
                        "Host differs between BASE_URL ({}) and FT_CALLBACK_URL ({})",
                        base.host_str().unwrap_or("<none>"),
                        cb.host_str().unwrap_or("<none>"),
                    ));
                }
                if base.scheme() != cb.scheme() {
                    warnings.push(format!(
                        "Scheme differs between BASE_URL ({}) and FT_CALLBACK_URL ({})",
                        base.scheme(),
                        cb.scheme(),
                    ));
                }
                if !cb.path().ends_with(CALLBACK_PATH) {
                    warnings.push(format!(
                        "Callback URL path does not end with {CALLBACK_PATH}: {}",
                        cb.path()
                    ));
                }
            }
            _ => warnings.push(format!(
                "Unable to parse BASE_URL ({}) or FT_CALLBACK_URL ({})",
                self.base_url(),
                callback
            )),
        }

        warnings
    }
}
