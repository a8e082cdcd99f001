//! Shares one client per configuration through an `InstanceRegistry`, then
//! releases clients that no caller holds any more.

use std::sync::Arc;
use std::thread;

use boundcache::registry::InstanceRegistry;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ClientConfig {
    endpoint: &'static str,
    timeout_ms: u64,
}

#[derive(Debug)]
struct Client {
    config: ClientConfig,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let registry = Arc::new(InstanceRegistry::new(|config: &ClientConfig| {
        info!(endpoint = config.endpoint, "opening client");
        Client {
            config: config.clone(),
        }
    }));

    let search = ClientConfig {
        endpoint: "https://search.internal",
        timeout_ms: 500,
    };
    let billing = ClientConfig {
        endpoint: "https://billing.internal",
        timeout_ms: 2_000,
    };

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let config = if i % 2 == 0 { search.clone() } else { billing.clone() };
            thread::spawn(move || registry.get_or_create(config))
        })
        .collect();
    let clients: Vec<Arc<Client>> = workers
        .into_iter()
        .filter_map(|worker| worker.join().ok())
        .collect();

    info!(registered = registry.len(), handed_out = clients.len(), "clients shared");

    let keep = clients
        .iter()
        .find(|client| client.config == search)
        .map(Arc::clone);
    drop(clients);

    let purged = registry.purge_unshared();
    info!(purged, remaining = registry.len(), "purged idle clients");
    assert!(registry.contains(&search));
    assert!(!registry.contains(&billing));

    drop(keep);
    registry.release(&search);
    info!(remaining = registry.len(), "released search client");
}
