#![cfg_attr(
    all(target_os = "windows", not(debug_assertions)),
    windows_subsystem = "windows"
)]

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(target_os = "windows")]
mod windows_app;

struct Args {
    config: Option<String>,
}

fn parse_args() -> Args {
    let mut config = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(value) = args.next() {
                config = Some(value);
            }
        }
    }

    Args { config }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "olfactory_pyramid_editor=info,tower_http=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(target_os = "windows")]
fn main() -> anyhow::Result<()> {
    windows_app::run()
}

#[cfg(not(target_os = "windows"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use olfactory_pyramid_editor::config_store::ConfigStore;
    use olfactory_pyramid_editor::path_utils::{get_base_dir, resolve_config_path};
    use olfactory_pyramid_editor::server::{AppServer, AppState};
    use std::sync::Arc;

    init_tracing();

    let args = parse_args();
    let base_dir = get_base_dir();
    let config_path = resolve_config_path(args.config, &base_dir);
    let config = ConfigStore::load(config_path.clone())
        .with_context(|| format!("erro de configuração: {}", config_path.display()))?;
    let preferred_port = config.server_port();

    let state = Arc::new(AppState::new(config));
    let server = AppServer::start(state, preferred_port)
        .context("erro ao iniciar o servidor local do editor")?;

    tracing::info!(
        "abra http://127.0.0.1:{}/ no navegador; Ctrl+C encerra",
        server.port()
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("falha ao criar runtime de espera")?;
    runtime
        .block_on(tokio::signal::ctrl_c())
        .context("falha ao aguardar o sinal de encerramento")?;

    Ok(())
}
