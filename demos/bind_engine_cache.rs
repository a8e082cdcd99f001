//! Memoizes database "engines" by bind key with a bounded LRU and a miss
//! loader, the way a data-access layer keeps one engine per connection string.
//!
//! Run with `RUST_LOG=boundcache=trace cargo run --example bind_engine_cache`
//! to see loader and eviction events.

use std::error::Error;
use std::fmt;

use boundcache::builder::CacheBuilder;
use boundcache::{CacheError, Lru, MissError};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Engine {
    dialect: String,
    location: String,
}

#[derive(Debug)]
struct InvalidBind(String);

impl fmt::Display for InvalidBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid bind key {:?}: expected <dialect>://<location>", self.0)
    }
}

impl Error for InvalidBind {}

fn connect(bind: &String) -> Result<Engine, MissError> {
    let (dialect, location) = bind
        .split_once("://")
        .filter(|(d, l)| !d.is_empty() && !l.is_empty())
        .ok_or_else(|| InvalidBind(bind.clone()))?;
    info!(dialect, location, "creating engine");
    Ok(Engine {
        dialect: dialect.to_string(),
        location: location.to_string(),
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let engines: Lru<String, Engine> = CacheBuilder::new(2).on_miss(connect).build_lru()?;

    let primary = "postgresql://db-primary/app".to_string();
    let replica = "postgresql://db-replica/app".to_string();
    let reports = "sqlite:///var/lib/reports.db".to_string();

    for bind in [&primary, &replica, &primary, &reports, &primary] {
        let engine = engines.get(bind)?;
        info!(dialect = %engine.dialect, location = %engine.location, "using engine");
    }

    // The replica was least recently used when the reports engine arrived.
    info!(cached = ?engines.keys(), "cached binds");
    assert!(!engines.contains(&replica));

    match engines.get(&"not-a-url".to_string()) {
        Err(CacheError::OnMiss(err)) => info!(%err, "rejected bind"),
        other => info!(?other, "unexpected result"),
    }

    let stats = engines.stats();
    info!(
        hits = stats.hit_count,
        misses = stats.miss_count,
        ratio = stats.hit_ratio().unwrap_or_default(),
        "engine cache stats"
    );
    Ok(())
}
