//! Bookshelf service library
//!
//! Wires the books module into the kernel registry and runs the HTTP server.

pub mod modules;

use anyhow::Context;
use bookshelf_kernel::{InitCtx, ModuleRegistry, Settings};

/// Re-export commonly used types
pub use modules::*;

/// Registry with every service module registered.
pub fn build_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}

/// Run the service until a shutdown signal arrives.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry();
    let ctx = InitCtx {
        settings: &settings,
    };

    registry
        .init_all(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_all(&ctx)
        .await
        .context("module start failed")?;

    let served = bookshelf_http::start_server(&registry, &settings).await;

    registry
        .stop_all()
        .await
        .context("module shutdown failed")?;

    served
}
