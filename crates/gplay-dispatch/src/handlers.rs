//! Per-action handlers.
//!
//! Each handler validates its required identifier, normalizes its optional
//! parameters, and picks exactly one service call: the selective call when
//! fields were requested, the full analysis otherwise.

use crate::params::{LocaleParams, OptionalParam, ParamError, Request, FIELDS_PARAM};
use crate::service::{Locale, PlayStoreService, ServiceResult};
use async_trait::async_trait;
use gplay_core::{Action, FieldList};
use serde_json::Value;

/// Which service operation a dispatch issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Full-analysis call
    Analyze,
    /// Selective call
    GetFields,
}

impl CallKind {
    /// Non-empty fields select the selective call; nothing else does.
    #[must_use]
    pub fn for_fields(fields: &FieldList) -> Self {
        if fields.is_empty() {
            Self::Analyze
        } else {
            Self::GetFields
        }
    }
}

/// Normalized parameters that carry a field selection.
pub trait Selection {
    /// Requested fields (possibly empty).
    fn fields(&self) -> &FieldList;

    /// Operation these parameters route to.
    fn call_kind(&self) -> CallKind {
        CallKind::for_fields(self.fields())
    }
}

/// Common capability of the four action handlers.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Typed parameters produced by validation.
    type Params: Selection + Send + Sync;

    /// Action this handler serves.
    fn action(&self) -> Action;

    /// Check required parameters and normalize the rest.
    fn validate(&self, request: &Request) -> Result<Self::Params, ParamError>;

    /// Issue the one service call the parameters select.
    async fn invoke(
        &self,
        service: &dyn PlayStoreService,
        params: &Self::Params,
    ) -> ServiceResult<Value>;
}

/// Parameters for `app`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppParams {
    /// Package name
    pub app_id: String,
    /// Requested fields
    pub fields: FieldList,
    /// Language and country
    pub locale: Locale,
    /// Asset size filter
    pub assets: Option<String>,
}

/// Parameters for `search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search terms
    pub query: String,
    /// Requested fields
    pub fields: FieldList,
    /// Maximum number of results
    pub count: u32,
    /// Language and country
    pub locale: Locale,
}

/// Parameters for `reviews`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewsParams {
    /// Package name
    pub app_id: String,
    /// Requested fields
    pub fields: FieldList,
    /// Maximum number of reviews
    pub count: u32,
    /// Language and country
    pub locale: Locale,
    /// Sort order
    pub sort: String,
}

/// Parameters for `developer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeveloperParams {
    /// Developer identifier
    pub developer_id: String,
    /// Requested fields
    pub fields: FieldList,
    /// Maximum number of apps
    pub count: u32,
    /// Language and country
    pub locale: Locale,
}

macro_rules! impl_selection {
    ($($params:ty),+) => {
        $(impl Selection for $params {
            fn fields(&self) -> &FieldList {
                &self.fields
            }
        })+
    };
}

impl_selection!(AppParams, SearchParams, ReviewsParams, DeveloperParams);

fn fields(request: &Request) -> FieldList {
    FieldList::parse(request.get(FIELDS_PARAM))
}

/// Handler for `app`.
#[derive(Debug, Clone)]
pub struct AppHandler {
    /// Locale declarations
    pub locale: LocaleParams,
    /// `assets` declaration
    pub assets: OptionalParam<Option<String>>,
}

#[async_trait]
impl ActionHandler for AppHandler {
    type Params = AppParams;

    fn action(&self) -> Action {
        Action::App
    }

    fn validate(&self, request: &Request) -> Result<AppParams, ParamError> {
        let app_id = request.required(self.action().required_param())?;
        Ok(AppParams {
            app_id: app_id.to_string(),
            fields: fields(request),
            locale: self.locale.resolve(request),
            assets: request.optional(&self.assets),
        })
    }

    async fn invoke(
        &self,
        service: &dyn PlayStoreService,
        params: &AppParams,
    ) -> ServiceResult<Value> {
        let assets = params.assets.as_deref();
        match params.call_kind() {
            CallKind::GetFields => {
                service
                    .app_get_fields(&params.app_id, params.fields.as_slice(), &params.locale, assets)
                    .await
            }
            CallKind::Analyze => {
                service
                    .app_analyze(&params.app_id, &params.locale, assets)
                    .await
            }
        }
    }
}

/// Handler for `search`.
#[derive(Debug, Clone)]
pub struct SearchHandler {
    /// Locale declarations
    pub locale: LocaleParams,
    /// `count` declaration
    pub count: OptionalParam<u32>,
}

#[async_trait]
impl ActionHandler for SearchHandler {
    type Params = SearchParams;

    fn action(&self) -> Action {
        Action::Search
    }

    fn validate(&self, request: &Request) -> Result<SearchParams, ParamError> {
        let query = request.required(self.action().required_param())?;
        Ok(SearchParams {
            query: query.to_string(),
            fields: fields(request),
            count: request.optional(&self.count),
            locale: self.locale.resolve(request),
        })
    }

    async fn invoke(
        &self,
        service: &dyn PlayStoreService,
        params: &SearchParams,
    ) -> ServiceResult<Value> {
        match params.call_kind() {
            CallKind::GetFields => {
                service
                    .search_get_fields(
                        &params.query,
                        params.fields.as_slice(),
                        params.count,
                        &params.locale,
                    )
                    .await
            }
            CallKind::Analyze => {
                service
                    .search_analyze(&params.query, params.count, &params.locale)
                    .await
            }
        }
    }
}

/// Handler for `reviews`.
#[derive(Debug, Clone)]
pub struct ReviewsHandler {
    /// Locale declarations
    pub locale: LocaleParams,
    /// `count` declaration
    pub count: OptionalParam<u32>,
    /// `sort` declaration
    pub sort: OptionalParam<String>,
}

#[async_trait]
impl ActionHandler for ReviewsHandler {
    type Params = ReviewsParams;

    fn action(&self) -> Action {
        Action::Reviews
    }

    fn validate(&self, request: &Request) -> Result<ReviewsParams, ParamError> {
        let app_id = request.required(self.action().required_param())?;
        Ok(ReviewsParams {
            app_id: app_id.to_string(),
            fields: fields(request),
            count: request.optional(&self.count),
            locale: self.locale.resolve(request),
            sort: request.optional(&self.sort),
        })
    }

    async fn invoke(
        &self,
        service: &dyn PlayStoreService,
        params: &ReviewsParams,
    ) -> ServiceResult<Value> {
        match params.call_kind() {
            CallKind::GetFields => {
                service
                    .reviews_get_fields(
                        &params.app_id,
                        params.fields.as_slice(),
                        params.count,
                        &params.locale,
                        &params.sort,
                    )
                    .await
            }
            CallKind::Analyze => {
                service
                    .reviews_analyze(&params.app_id, params.count, &params.locale, &params.sort)
                    .await
            }
        }
    }
}

/// Handler for `developer`.
#[derive(Debug, Clone)]
pub struct DeveloperHandler {
    /// Locale declarations
    pub locale: LocaleParams,
    /// `count` declaration
    pub count: OptionalParam<u32>,
}

#[async_trait]
impl ActionHandler for DeveloperHandler {
    type Params = DeveloperParams;

    fn action(&self) -> Action {
        Action::Developer
    }

    fn validate(&self, request: &Request) -> Result<DeveloperParams, ParamError> {
        let developer_id = request.required(self.action().required_param())?;
        Ok(DeveloperParams {
            developer_id: developer_id.to_string(),
            fields: fields(request),
            count: request.optional(&self.count),
            locale: self.locale.resolve(request),
        })
    }

    async fn invoke(
        &self,
        service: &dyn PlayStoreService,
        params: &DeveloperParams,
    ) -> ServiceResult<Value> {
        match params.call_kind() {
            CallKind::GetFields => {
                service
                    .developer_get_fields(
                        &params.developer_id,
                        params.fields.as_slice(),
                        params.count,
                        &params.locale,
                    )
                    .await
            }
            CallKind::Analyze => {
                service
                    .developer_analyze(&params.developer_id, params.count, &params.locale)
                    .await
            }
        }
    }
}
