mod api;
mod config;
mod persist;
mod record;
mod school;
mod store;
mod writer;

use anyhow::Context;
use persist::{LocalFileBackend, StorageBackend, WebhookBackend};
use school::{DanglingRef, SchoolData};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn load_school(cfg: &config::Config) -> Result<SchoolData, school::SchoolError> {
    let loaded = SchoolData::load(&cfg.data_dir);
    match &loaded {
        Ok(school) => {
            let doc = school.document();
            tracing::info!(
                teacher = %school.teacher().id,
                subjects = doc.subjects.len(),
                classes = doc.classes.len(),
                students = doc.students.len(),
                "reference data loaded"
            );
            for d in school.dangling_references() {
                match d {
                    DanglingRef::ClassSubject {
                        class_id,
                        subject_id,
                    } => tracing::warn!(%class_id, %subject_id, "class points at unknown subject"),
                    DanglingRef::StudentClass {
                        student_id,
                        class_id,
                    } => tracing::warn!(%student_id, %class_id, "student points at unknown class"),
                }
            }
        }
        // Keep serving; /api/bootstrap reports the failure.
        Err(e) => tracing::error!(error = %e, "reference data could not be loaded"),
    }
    loaded
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::Config::from_env().context("invalid configuration")?;
    init_tracing(cfg.log_json);

    let school = load_school(&cfg);

    let store =
        store::LocalStore::open(&cfg.data_dir).context("failed to open local record store")?;
    tracing::info!(path = %store.path().display(), "local record store ready");
    let writer = writer::RecordWriter::spawn(store).context("failed to start record writer")?;

    let backend = match &cfg.webhook {
        Some(address) => {
            let hook = WebhookBackend::new(address.clone(), cfg.webhook_timeout)
                .context("failed to build webhook client")?;
            tracing::info!(
                address = hook.address(),
                timeout_ms = cfg.webhook_timeout.as_millis() as u64,
                "records go to webhook"
            );
            StorageBackend::Webhook(hook)
        }
        None => {
            tracing::warn!(
                "{} not set; records go to the local file",
                config::WEBHOOK_ENV
            );
            StorageBackend::LocalFile(LocalFileBackend::new(writer.clone()))
        }
    };

    let state = api::AppState {
        school: Arc::new(school),
        backend: Arc::new(backend),
        writer,
        public_dir: cfg.public_dir.clone(),
    };
    let app = api::build_router(state);

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("server running on http://localhost:{}", cfg.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}
