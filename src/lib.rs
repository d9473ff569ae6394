//! Catalog admin console
//!
//! An operator console for a remote product catalog API: sign in, list the
//! catalog, and create, edit or delete products through a single product
//! dialog. The dialog and the notification surface are supplied by the caller
//! through the [`ui::Modal`] and [`ui::Notifier`] traits.
//!
//! # Example
//!
//! ```no_run
//! use catalog_admin::prelude::*;
//!
//! # async fn run() -> catalog_admin::error::Result<()> {
//! let config = ConsoleConfig::from_env()?;
//! let mut console = AdminConsole::new(
//!     &config,
//!     &ClientOptions::default(),
//!     TerminalModal,
//!     TerminalNotifier,
//! )?;
//!
//! if !console.restore_session().await? {
//!     *console.login_form_mut() = Credentials::new("admin@example.com", "secret");
//!     console.submit_login().await?;
//! }
//!
//! for product in console.products() {
//!     println!("{} {}", product.title, product.price);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod console;
pub mod error;
pub mod fetch;
pub mod products;
pub mod ui;

pub use catalog_admin_auth as auth;

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{Credentials, Session};
    pub use crate::config::{ClientOptions, ConsoleConfig};
    pub use crate::console::{AdminConsole, DialogState, DraftEdit, DraftSeed, Mode};
    pub use crate::error::Error;
    pub use crate::products::Product;
    pub use crate::ui::{Modal, NoticeKind, Notifier, TerminalModal, TerminalNotifier};
}
