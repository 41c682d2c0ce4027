use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "portfolio-api")]
#[command(about = "Portfolio content API with response caching and rate limiting")]
pub struct Args {
    // Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8001)]
    pub port: u16,

    // Cache TTL in seconds
    #[arg(
        short,
        long,
        env = "CACHE_TTL_SECONDS",
        default_value_t = 1800,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub cache_ttl: u64,

    // General API limit, requests per window per client
    #[arg(
        long,
        env = "RATE_LIMIT_PER_MINUTE",
        default_value_t = 100,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub rate_limit: u32,

    // Contact form limit, requests per window per client
    #[arg(
        long,
        env = "CONTACT_RATE_LIMIT_PER_MINUTE",
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub contact_rate_limit: u32,

    // Rate limit window in seconds
    #[arg(
        long,
        env = "RATE_LIMIT_WINDOW_SECONDS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub rate_window: u64,

    // Reported by the detailed health check
    #[arg(long, env = "ENVIRONMENT", default_value = "development")]
    pub environment: String,

    // Portfolio JSON loaded at startup when the store is empty
    #[arg(long, env = "SEED_FILE")]
    pub seed_file: Option<PathBuf>,
}

impl Args {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Args {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8001,
            cache_ttl: 1800,
            rate_limit: 100,
            contact_rate_limit: 5,
            rate_window: 60,
            environment: "development".into(),
            seed_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_parsed_defaults() {
        let parsed = Args::try_parse_from(["portfolio-api"]).unwrap();
        let defaults = Args::default();
        assert_eq!(parsed.cache_ttl, defaults.cache_ttl);
        assert_eq!(parsed.rate_limit, defaults.rate_limit);
        assert_eq!(parsed.contact_rate_limit, defaults.contact_rate_limit);
        assert_eq!(parsed.rate_window, defaults.rate_window);
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(Args::try_parse_from(["portfolio-api", "--rate-limit", "0"]).is_err());
        assert!(Args::try_parse_from(["portfolio-api", "--cache-ttl", "0"]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "portfolio-api",
            "--contact-rate-limit",
            "2",
            "--rate-window",
            "30",
        ])
        .unwrap();
        assert_eq!(args.contact_rate_limit, 2);
        assert_eq!(args.rate_window(), Duration::from_secs(30));
    }
}
