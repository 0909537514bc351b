use dag_maker::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

struct Settings {
    database_url: String,
    cache_size: usize,
}

struct Database {
    url: String,
    queries: AtomicU64,
}

impl Database {
    async fn connect(url: &str) -> Self {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Self {
            url: url.to_string(),
            queries: AtomicU64::new(0),
        }
    }

    fn query(&self, sql: &str) -> u64 {
        tracing::debug!("query: {}", sql);
        self.queries.fetch_add(1, Ordering::Relaxed) + 1
    }
}

struct Cache {
    capacity: usize,
}

struct UserService {
    database: Arc<Database>,
    cache: Arc<Cache>,
}

struct Api {
    users: Arc<UserService>,
    settings: Arc<Settings>,
}

fn service_graph(config: ConfigService) -> SharedFactory {
    let settings = FnVertex::builder("Settings")
        .on_create(move |_| {
            let config = config.clone();
            async move {
                Ok::<_, BoxError>(Settings {
                    database_url: config
                        .get("DATABASE_URL")
                        .unwrap_or_else(|| "postgres://localhost/demo".to_string()),
                    cache_size: config.get_parsed("CACHE_SIZE")?.unwrap_or(1024),
                })
            }
        })
        .build();

    let database = FnVertex::builder("Database")
        .depends_on("settings", settings.clone())
        .on_create(|options| async move {
            let settings = options.get::<Settings>("settings")?;
            Ok::<_, BoxError>(Database::connect(&settings.database_url).await)
        })
        .on_destroy(|database: Arc<Database>| async move {
            tracing::info!(
                "closing {} after {} queries",
                database.url,
                database.queries.load(Ordering::Relaxed)
            );
            Ok(())
        })
        .build();

    let cache = FnVertex::builder("Cache")
        .depends_on("settings", settings.clone())
        .on_create(|options| async move {
            let settings = options.get::<Settings>("settings")?;
            Ok::<_, BoxError>(Cache {
                capacity: settings.cache_size,
            })
        })
        .build();

    let users = FnVertex::builder("UserService")
        .depends_on("db", database)
        .depends_on("cache", cache)
        .on_create(|options| async move {
            Ok::<_, BoxError>(UserService {
                database: options.get::<Database>("db")?,
                cache: options.get::<Cache>("cache")?,
            })
        })
        .build();

    FnVertex::builder("Api")
        .depends_on("users", users)
        .depends_on("settings", settings)
        .on_create(|options| async move {
            Ok::<_, BoxError>(Api {
                users: options.get::<UserService>("users")?,
                settings: options.get::<Settings>("settings")?,
            })
        })
        .on_destroy(|_: Arc<Api>| async move {
            tracing::info!("api stopped accepting requests");
            Ok(())
        })
        .build()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ConfigService::new();
    let lifecycle = LifecycleConfig::from_service(&config)?;

    // Only the top of the graph is registered, the rest is discovered
    let app = Application::builder()
        .vertex(service_graph(config))
        .config(&lifecycle)
        .build()
        .await?;

    let plan = app.plan()?;
    tracing::info!("plan: {}", serde_json::to_string(&plan)?);

    let api = app.resolve::<Api>("Api").await?;
    let count = api.users.database.query("SELECT 1");
    tracing::info!(
        "api up: {} queries, cache capacity {}, database {}",
        count,
        api.users.cache.capacity,
        api.settings.database_url
    );
    drop(api);

    tracing::info!("press Ctrl+C to stop");
    shutdown_signal().await;
    app.shutdown().await?;

    Ok(())
}
