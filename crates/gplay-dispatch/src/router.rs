//! Action routing.
//!
//! The router is the single boundary where service failures of any kind,
//! panics included, turn into an [`Outcome`]. Nothing escapes `dispatch`.

use crate::handlers::{
    ActionHandler, AppHandler, DeveloperHandler, ReviewsHandler, SearchHandler, Selection,
};
use crate::outcome::Outcome;
use crate::params::{ParamDefaults, ParamError, Request, ACTION_PARAM};
use crate::service::PlayStoreService;
use futures::FutureExt;
use gplay_core::{Action, CoreError};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Maps action names to handlers and calls the external service.
///
/// Holds no mutable state, so one router can serve any number of
/// concurrent dispatches.
pub struct ActionRouter {
    service: Arc<dyn PlayStoreService>,
    app: AppHandler,
    search: SearchHandler,
    reviews: ReviewsHandler,
    developer: DeveloperHandler,
}

impl ActionRouter {
    /// Create a router with the built-in parameter defaults.
    #[must_use]
    pub fn new(service: Arc<dyn PlayStoreService>) -> Self {
        Self::with_defaults(service, &ParamDefaults::default())
    }

    /// Create a router with explicit parameter defaults.
    #[must_use]
    pub fn with_defaults(service: Arc<dyn PlayStoreService>, defaults: &ParamDefaults) -> Self {
        Self {
            service,
            app: AppHandler {
                locale: defaults.locale.clone(),
                assets: defaults.app_assets.clone(),
            },
            search: SearchHandler {
                locale: defaults.locale.clone(),
                count: defaults.search_count.clone(),
            },
            reviews: ReviewsHandler {
                locale: defaults.locale.clone(),
                count: defaults.reviews_count.clone(),
                sort: defaults.reviews_sort.clone(),
            },
            developer: DeveloperHandler {
                locale: defaults.locale.clone(),
                count: defaults.developer_count.clone(),
            },
        }
    }

    /// Dispatch a named action. Names match case-insensitively.
    pub async fn dispatch(&self, action: &str, request: &Request) -> Outcome {
        match action.parse::<Action>() {
            Ok(action) => self.dispatch_action(action, request).await,
            Err(err @ CoreError::UnsupportedAction { .. }) => {
                debug!(action, "rejecting unsupported action");
                Outcome::invalid_input(err.to_string())
            }
        }
    }

    /// Dispatch a request whose action is named by its `action` parameter.
    pub async fn dispatch_request(&self, request: &Request) -> Outcome {
        match request.get(ACTION_PARAM).filter(|name| !name.is_empty()) {
            Some(action) => self.dispatch(action, &request.without(ACTION_PARAM)).await,
            None => ParamError::Missing { name: ACTION_PARAM }.into(),
        }
    }

    /// Dispatch an already-resolved action.
    pub async fn dispatch_action(&self, action: Action, request: &Request) -> Outcome {
        match action {
            Action::App => self.run(&self.app, request).await,
            Action::Search => self.run(&self.search, request).await,
            Action::Reviews => self.run(&self.reviews, request).await,
            Action::Developer => self.run(&self.developer, request).await,
        }
    }

    async fn run<H: ActionHandler>(&self, handler: &H, request: &Request) -> Outcome {
        let action = handler.action();

        let params = match handler.validate(request) {
            Ok(params) => params,
            Err(err) => {
                debug!(%action, error = %err, "request failed validation");
                return err.into();
            }
        };

        let call = params.call_kind();
        let started = Instant::now();
        let result = AssertUnwindSafe(handler.invoke(self.service.as_ref(), &params))
            .catch_unwind()
            .await;

        let outcome = match result {
            Ok(Ok(payload)) => Outcome::success(payload),
            Ok(Err(err)) => {
                warn!(%action, ?call, error = %err, "service call failed");
                err.into()
            }
            Err(panic) => {
                warn!(%action, ?call, "service call panicked");
                Outcome::from_panic(panic.as_ref())
            }
        };

        info!(
            %action,
            ?call,
            success = outcome.is_success(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "dispatch complete"
        );

        outcome
    }
}
