//! Sign-in gate in front of the checkout route

use std::sync::Arc;

use tracing::info;

use crate::catalog::find_style;
use crate::models::StyleOption;
use crate::traits::SessionProvider;

/// OAuth provider used for store sign-in
pub const SIGN_IN_PROVIDER: &str = "github";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// No session yet; the sign-in flow was started
    SignInStarted { provider: &'static str },
    /// Signed in; the user should be sent to this route
    Checkout { route: String },
    /// Free styles have no purchase button
    NotForSale,
    UnknownStyle,
}

pub struct PurchaseGate {
    catalog: Vec<StyleOption>,
    sessions: Arc<dyn SessionProvider>,
}

impl PurchaseGate {
    pub fn new(catalog: Vec<StyleOption>, sessions: Arc<dyn SessionProvider>) -> Self {
        Self { catalog, sessions }
    }

    pub fn catalog(&self) -> &[StyleOption] {
        &self.catalog
    }

    pub fn request_purchase(&self, style_id: &str) -> PurchaseOutcome {
        let Some(option) = find_style(&self.catalog, style_id) else {
            return PurchaseOutcome::UnknownStyle;
        };
        if !option.is_purchasable() {
            return PurchaseOutcome::NotForSale;
        }

        match self.sessions.current_session() {
            None => {
                info!("Purchase of {} needs sign-in", option.id());
                self.sessions.begin_sign_in(SIGN_IN_PROVIDER);
                PurchaseOutcome::SignInStarted {
                    provider: SIGN_IN_PROVIDER,
                }
            }
            Some(session) => {
                info!("{} is buying style {}", session.user, option.id());
                PurchaseOutcome::Checkout {
                    route: format!("/checkout?styleId={}", urlencoding::encode(option.id())),
                }
            }
        }
    }
}
