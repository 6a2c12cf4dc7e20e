//! Shopfront - headless storefront client
//!
//! Catalog browsing, basket management and a two-step checkout against a
//! remote order API. The core is an event-driven state model; front ends
//! attach through the [`ui::Ui`] render contracts and emit user intents as
//! bus events.
//!
//! # Module structure
//!
//! ```text
//! shopfront/src/
//! ├── bus.rs      # synchronous publish/subscribe
//! ├── state.rs    # catalog / basket / draft / validation state model
//! ├── app.rs      # orchestration wiring and network flows
//! ├── ui.rs       # view render contracts
//! ├── config.rs   # environment configuration
//! └── repl.rs     # console front end
//! ```

pub mod app;
pub mod bus;
pub mod config;
pub mod repl;
pub mod state;
pub mod ui;

// Re-export the crates the application is built from
pub use shared;
pub use shop_client;

// Re-export public types
pub use app::{App, AppError};
pub use bus::{EventBus, EventFilter};
pub use config::Config;
pub use state::{AppState, CheckoutStage};
pub use ui::{ConsoleUi, RecordingUi, Ui};
