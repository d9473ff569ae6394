//! The admin console: session, product list and the product dialog

mod draft;

use catalog_admin_auth::{Auth, CookieStore, Credentials, FileCookieStore, Session};
use log::{debug, info, warn};

use crate::config::{ClientOptions, ConsoleConfig};
use crate::error::{Error, Result};
use crate::products::{Pagination, Product, ProductsClient};
use crate::ui::{Modal, NoticeKind, Notifier};

pub use draft::*;

/// What the product dialog was opened for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit,
    Delete,
}

/// The product a delete confirmation refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
    pub id: String,
    pub title: String,
}

/// State of the product dialog.
///
/// The draft lives beside this state on the console and outlives a close.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Creating,
    Editing,
    ConfirmingDelete(ProductRef),
}

impl DialogState {
    pub fn mode(&self) -> Option<Mode> {
        match self {
            DialogState::Closed => None,
            DialogState::Creating => Some(Mode::Create),
            DialogState::Editing => Some(Mode::Edit),
            DialogState::ConfirmingDelete(_) => Some(Mode::Delete),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, DialogState::Closed)
    }

    fn accepts_edits(&self) -> bool {
        matches!(self, DialogState::Creating | DialogState::Editing)
    }
}

/// Single-operator admin console.
///
/// Remote failures and rejected drafts are reported through the [`Notifier`]
/// and then returned. Calls that the current dialog state does not allow are
/// only returned.
pub struct AdminConsole<M: Modal, N: Notifier> {
    auth: Auth,
    products_api: ProductsClient,
    cookies: Box<dyn CookieStore>,
    modal: M,
    notifier: N,
    session: Option<Session>,
    login_form: Credentials,
    products: Vec<Product>,
    pagination: Option<Pagination>,
    dialog: DialogState,
    draft: Draft,
}

impl<M: Modal, N: Notifier> AdminConsole<M, N> {
    /// Create a console talking to the API in `config`, keeping the session
    /// cookie in `config.cookie_path`
    pub fn new(config: &ConsoleConfig, options: &ClientOptions, modal: M, notifier: N) -> Result<Self> {
        let http_client = options.build_client()?;

        Ok(Self {
            auth: Auth::new(&config.api_base, http_client.clone()),
            products_api: ProductsClient::new(config, http_client),
            cookies: Box::new(FileCookieStore::new(config.cookie_path.clone())),
            modal,
            notifier,
            session: None,
            login_form: Credentials::default(),
            products: Vec::new(),
            pagination: None,
            dialog: DialogState::Closed,
            draft: Draft::default(),
        })
    }

    /// Replace the cookie store
    pub fn with_cookie_store(mut self, cookies: Box<dyn CookieStore>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The last product list the server returned
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn dialog(&self) -> &DialogState {
        &self.dialog
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn modal(&self) -> &M {
        &self.modal
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn login_form(&self) -> &Credentials {
        &self.login_form
    }

    /// Login form fields, bound to the username/password inputs
    pub fn login_form_mut(&mut self) -> &mut Credentials {
        &mut self.login_form
    }

    fn report(&self, err: &Error) {
        warn!("{}", err);
        self.notifier.fire(&err.user_message(), NoticeKind::Error);
    }

    fn fail<T>(&self, err: Error) -> Result<T> {
        self.report(&err);
        Err(err)
    }

    fn current_session(&self) -> Result<Session> {
        self.session
            .clone()
            .ok_or_else(|| Error::console("not signed in"))
    }

    // --- Session ---

    /// Signs in with the login form's values; the form is emptied either way.
    ///
    /// On success the session cookie is written and the product list refreshed.
    pub async fn submit_login(&mut self) -> Result<()> {
        let credentials = std::mem::take(&mut self.login_form);

        match self.auth.sign_in(&credentials).await {
            Ok(session) => {
                if let Err(e) = self.cookies.save(&session).await {
                    warn!("Could not store session cookie: {}", e);
                }
                self.session = Some(session);
                self.notifier.fire("Signed in", NoticeKind::Success);
                // a failed refresh is already reported
                let _ = self.refresh_products().await;
                Ok(())
            }
            Err(e) => {
                self.session = None;
                self.fail(e.into())
            }
        }
    }

    /// Picks up the session cookie left by an earlier run and verifies it.
    ///
    /// Returns `Ok(false)` when there is no live cookie. A rejected cookie is
    /// reported and left in place, and any current session is dropped.
    pub async fn restore_session(&mut self) -> Result<bool> {
        let session = match self.cookies.load().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                debug!("No session cookie to restore");
                return Ok(false);
            }
            Err(e) => return self.fail(e.into()),
        };

        match self.auth.check(&session).await {
            Ok(()) => {
                info!("Session restored");
                self.session = Some(session);
                self.notifier.fire("Session restored", NoticeKind::Success);
                let _ = self.refresh_products().await;
                Ok(true)
            }
            Err(e) => {
                self.session = None;
                self.fail(e.into())
            }
        }
    }

    /// Ends the session on the server, then forgets it locally whatever the
    /// server answered
    pub async fn sign_out(&mut self) -> Result<()> {
        let session = match self.session.take() {
            Some(session) => session,
            None => return self.fail(Error::console("not signed in")),
        };

        let remote = self.auth.sign_out(&session).await;
        let cleared = self.cookies.clear().await;

        if let Err(e) = remote {
            return self.fail(e.into());
        }
        if let Err(e) = cleared {
            return self.fail(e.into());
        }

        self.notifier.fire("Signed out", NoticeKind::Success);
        Ok(())
    }

    // --- Product list ---

    /// Replaces the product list with the server's current one.
    /// On failure the previous list stays.
    pub async fn refresh_products(&mut self) -> Result<()> {
        self.refresh_products_page(None).await
    }

    /// Like [`refresh_products`](Self::refresh_products) for one page
    pub async fn refresh_products_page(&mut self, page: Option<u32>) -> Result<()> {
        let session = match self.current_session() {
            Ok(session) => session,
            Err(e) => return self.fail(e),
        };

        match self.products_api.list(&session, page).await {
            Ok(list) => {
                self.products = list.products;
                self.pagination = list.pagination;
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Looks `id` up starting from the server's first page, walking forward
    /// while the server reports a next page.
    ///
    /// A failed listing is returned, so a missing product and an unreachable
    /// catalog are not confused.
    pub async fn find_product(&mut self, id: &str) -> Result<Option<Product>> {
        let mut page = None;
        loop {
            self.refresh_products_page(page).await?;
            if let Some(product) = self.products.iter().find(|p| p.id == id) {
                return Ok(Some(product.clone()));
            }

            let next = self
                .pagination
                .as_ref()
                .filter(|p| p.has_next)
                .map(|p| p.current_page + 1);
            match (page, next) {
                (Some(current), Some(next)) if next <= current => return Ok(None),
                (_, Some(next)) => page = Some(next),
                (_, None) => return Ok(None),
            }
        }
    }

    // --- Product dialog ---

    /// Opens the dialog for `mode`, merging `seed` over the current draft
    pub fn open_modal(&mut self, mode: Mode, seed: DraftSeed) {
        self.draft.merge(seed);
        self.dialog = match mode {
            Mode::Create => DialogState::Creating,
            Mode::Edit => DialogState::Editing,
            Mode::Delete => DialogState::ConfirmingDelete(ProductRef {
                id: self.draft.id.clone(),
                title: self.draft.title.clone(),
            }),
        };
        debug!("Dialog opened: {:?}", self.dialog);
        self.modal.show();
    }

    fn editable_draft(&mut self) -> Result<&mut Draft> {
        if self.dialog.accepts_edits() {
            Ok(&mut self.draft)
        } else {
            Err(Error::console(format!(
                "the draft cannot be edited while the dialog is {:?}",
                self.dialog
            )))
        }
    }

    pub fn edit_field(&mut self, edit: DraftEdit) -> Result<()> {
        self.editable_draft()?.apply(edit);
        Ok(())
    }

    pub fn edit_image_url(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        self.editable_draft()?.set_image_url(index, value.into())
    }

    pub fn add_image_slot(&mut self) -> Result<()> {
        self.editable_draft()?.add_image_slot();
        Ok(())
    }

    /// Removes the last image slot
    pub fn remove_image_slot(&mut self) -> Result<()> {
        self.editable_draft()?.remove_image_slot();
        Ok(())
    }

    /// Submits the dialog: upserts the draft, or deletes the product under
    /// confirmation. The dialog closes only when the server accepts.
    pub async fn confirm(&mut self) -> Result<()> {
        if !self.dialog.is_open() {
            return Err(Error::console("no dialog is open"));
        }
        let session = match self.current_session() {
            Ok(session) => session,
            Err(e) => return self.fail(e),
        };

        let outcome = match self.dialog.clone() {
            DialogState::Closed => return Err(Error::console("no dialog is open")),
            DialogState::Creating => match self.draft.to_payload() {
                Ok(payload) => self
                    .products_api
                    .create(&session, &payload)
                    .await
                    .map(|ack| ack.message_or("Product created")),
                Err(e) => Err(e),
            },
            DialogState::Editing => match self.draft.to_payload() {
                Ok(payload) => self
                    .products_api
                    .update(&session, &self.draft.id, &payload)
                    .await
                    .map(|ack| ack.message_or("Product updated")),
                Err(e) => Err(e),
            },
            DialogState::ConfirmingDelete(target) => self
                .products_api
                .delete(&session, &target.id)
                .await
                .map(|ack| ack.message_or("Product deleted")),
        };

        match outcome {
            Ok(message) => {
                self.notifier.fire(&message, NoticeKind::Success);
                let _ = self.refresh_products().await;
                self.close_modal();
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Dismisses the dialog, keeping the draft
    pub fn cancel(&mut self) {
        self.close_modal();
    }

    fn close_modal(&mut self) {
        self.dialog = DialogState::Closed;
        self.modal.hide();
    }
}
