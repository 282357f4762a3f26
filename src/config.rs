use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://api.mock-axiom.trade";
const DEFAULT_WS_URL: &str = "wss://ws.mock-axiom.trade";
/// Upper bound for `PULSE_INSERT_MAX_SECS`: one day.
pub const MAX_INSERT_SECS: u64 = 86_400;

/// Output format of the rendered board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Runtime configuration resolved from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub seed_per_column: usize,
    pub tick_interval: Duration,
    pub highlight_interval: Duration,
    pub highlight_count: usize,
    pub age_interval: Duration,
    pub insert_min_secs: u64,
    pub insert_max_secs: u64,
    pub rng_seed: Option<u64>,
    pub live: bool,
    pub run_for: Option<Duration>,
    pub render_rows: usize,
    pub output: OutputFormat,
    /// Declared for parity with a real feed; nothing dials these.
    pub api_url: String,
    pub ws_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_per_column: 20,
            tick_interval: Duration::from_millis(2000),
            highlight_interval: Duration::from_millis(2000),
            highlight_count: 5,
            age_interval: Duration::from_millis(1000),
            insert_min_secs: 5,
            insert_max_secs: 20,
            rng_seed: None,
            live: true,
            run_for: None,
            render_rows: 6,
            output: OutputFormat::Text,
            api_url: DEFAULT_API_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();

        let defaults = Config::default();

        let seed_per_column = parse_var("PULSE_SEED_PER_COLUMN", defaults.seed_per_column)?;
        let tick_interval = Duration::from_millis(
            parse_var("PULSE_TICK_INTERVAL_MS", defaults.tick_interval.as_millis() as u64)?
        );
        let highlight_interval = Duration::from_millis(
            parse_var(
                "PULSE_HIGHLIGHT_INTERVAL_MS",
                defaults.highlight_interval.as_millis() as u64
            )?
        );
        let highlight_count = parse_var("PULSE_HIGHLIGHT_COUNT", defaults.highlight_count)?;
        let age_interval = Duration::from_millis(
            parse_var("PULSE_AGE_INTERVAL_MS", defaults.age_interval.as_millis() as u64)?
        );
        let insert_min_secs = parse_var("PULSE_INSERT_MIN_SECS", defaults.insert_min_secs)?;
        let insert_max_secs = parse_var("PULSE_INSERT_MAX_SECS", defaults.insert_max_secs)?;

        let rng_seed = match env::var("PULSE_RNG_SEED") {
            Ok(v) => Some(v.trim().parse::<u64>()?),
            Err(_) => None,
        };

        let live = match env::var("PULSE_LIVE") {
            Ok(v) => Self::parse_bool(&v)?,
            Err(_) => defaults.live,
        };

        let run_for = match env::var("PULSE_RUN_SECS") {
            Ok(v) => Some(Duration::from_secs(v.trim().parse::<u64>()?)),
            Err(_) => None,
        };

        let render_rows = parse_var("PULSE_RENDER_ROWS", defaults.render_rows)?;

        let output = match env::var("PULSE_OUTPUT") {
            Ok(v) =>
                match v.to_lowercase().as_str() {
                    "text" => OutputFormat::Text,
                    "json" => OutputFormat::Json,
                    _ => {
                        return Err("PULSE_OUTPUT must be 'text' or 'json'".into());
                    }
                }
            Err(_) => defaults.output,
        };

        let api_url = env::var("API_URL").unwrap_or(defaults.api_url);
        let ws_url = env::var("WS_URL").unwrap_or(defaults.ws_url);

        let config = Config {
            seed_per_column,
            tick_interval,
            highlight_interval,
            highlight_count,
            age_interval,
            insert_min_secs,
            insert_max_secs,
            rng_seed,
            live,
            run_for,
            render_rows,
            output,
            api_url,
            ws_url,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.seed_per_column == 0 {
            return Err("PULSE_SEED_PER_COLUMN must be at least 1".into());
        }
        if
            self.tick_interval.is_zero() ||
            self.highlight_interval.is_zero() ||
            self.age_interval.is_zero()
        {
            return Err("Tick intervals must be greater than zero".into());
        }
        if self.highlight_count == 0 {
            return Err("PULSE_HIGHLIGHT_COUNT must be at least 1".into());
        }
        if self.insert_max_secs > MAX_INSERT_SECS {
            return Err(
                format!("PULSE_INSERT_MAX_SECS must be at most {}", MAX_INSERT_SECS).into()
            );
        }
        if self.insert_min_secs == 0 || self.insert_min_secs > self.insert_max_secs {
            return Err(
                "PULSE_INSERT_MIN_SECS must be >= 1 and <= PULSE_INSERT_MAX_SECS".into()
            );
        }
        Ok(())
    }

    fn parse_bool(value: &str) -> Result<bool, Box<dyn std::error::Error>> {
        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(format!("Invalid boolean value: {}", other).into()),
        }
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
    where T: FromStr, <T as FromStr>::Err: std::error::Error + 'static
{
    match env::var(key) {
        Ok(v) => Ok(v.trim().parse::<T>()?),
        Err(_) => Ok(default),
    }
}
