//! CAS client configuration.
//!
//! Built with [`CasConfig::builder`]; only the service prefix (this
//! application's externally visible base URL) and the CAS server base URL
//! are mandatory. Everything else carries the conventional CAS defaults.

use crate::context::RequestContext;
use axum::http::StatusCode;
use regex::Regex;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Boxed future returned by user-supplied async hooks.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Async callback invoked around the authentication gate.
pub type Hook = Arc<dyn Fn(Arc<RequestContext>) -> BoxFuture<()> + Send + Sync>;

/// Computes a login URL for a request, replacing the default CAS login
/// redirect target.
pub type LoginPathFn = Arc<dyn Fn(&RequestContext) -> String + Send + Sync>;

/// Resolves a custom post-validation redirect target; `None` falls back to
/// the recorded last URL.
pub type RedirectFn = Arc<dyn Fn(&RequestContext) -> Option<String> + Send + Sync>;

/// Decides whether a request runs under a restlet integration identity.
pub type RestletTrigger = Arc<dyn Fn(&RequestContext) -> bool + Send + Sync>;

/// Cache-filter predicate over `(target_service, request)`.
pub type FilterPredicate = Arc<dyn Fn(&str, &RequestContext) -> bool + Send + Sync>;

/// The CAS login path: a fixed path on the CAS server, or a function
/// computing the full redirect target per request.
#[derive(Clone)]
pub enum LoginPath {
    Fixed(String),
    Dynamic(LoginPathFn),
}

impl fmt::Debug for LoginPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginPath::Fixed(path) => f.debug_tuple("Fixed").field(path).finish(),
            LoginPath::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// A single proxy-ticket cache bypass rule.
///
/// A target service matching any configured filter is never served from
/// the cache and never written back to it; the call always round-trips to
/// the CAS server.
#[derive(Clone)]
pub enum CacheFilter {
    /// Exact target-service match.
    Exact(String),
    /// Regular-expression match on the target service.
    Pattern(Regex),
    /// Arbitrary predicate over the target service and the request.
    Predicate(FilterPredicate),
}

impl CacheFilter {
    /// Does this filter match the given target service for this request?
    #[must_use]
    pub fn matches(&self, target_service: &str, ctx: &RequestContext) -> bool {
        match self {
            CacheFilter::Exact(service) => service == target_service,
            CacheFilter::Pattern(pattern) => pattern.is_match(target_service),
            CacheFilter::Predicate(predicate) => predicate(target_service, ctx),
        }
    }
}

impl fmt::Debug for CacheFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheFilter::Exact(service) => f.debug_tuple("Exact").field(service).finish(),
            CacheFilter::Pattern(pattern) => {
                f.debug_tuple("Pattern").field(&pattern.as_str()).finish()
            }
            CacheFilter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Proxy-ticket cache settings.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Master switch; disabled means every call round-trips to the server.
    pub enable: bool,
    /// How long a cached proxy ticket may be served.
    pub ttl: Duration,
    /// Bypass rules evaluated per call.
    pub filters: Vec<CacheFilter>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable: true,
            ttl: Duration::from_secs(300),
            filters: Vec::new(),
        }
    }
}

/// Credentials posted to the restlet ticket endpoint.
#[derive(Debug, Clone)]
pub struct RestletParams {
    pub username: String,
    pub password: String,
    /// Posted as the `type` form field.
    pub ticket_type: String,
    pub from: String,
}

/// A restlet integration: a named service identity selected by a trigger.
#[derive(Clone)]
pub struct RestletIntegration {
    pub name: String,
    pub trigger: RestletTrigger,
    pub params: RestletParams,
}

impl RestletIntegration {
    pub fn new(
        name: impl Into<String>,
        trigger: impl Fn(&RequestContext) -> bool + Send + Sync + 'static,
        params: RestletParams,
    ) -> Self {
        Self {
            name: name.into(),
            trigger: Arc::new(trigger),
            params,
        }
    }
}

impl fmt::Debug for RestletIntegration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestletIntegration")
            .field("name", &self.name)
            .field("username", &self.params.username)
            .finish_non_exhaustive()
    }
}

/// AJAX detection: requests carrying `header` are answered with `status`
/// instead of a login redirect.
#[derive(Debug, Clone)]
pub struct AjaxConfig {
    pub header: String,
    pub status: StatusCode,
}

/// User-supplied hooks run by the authentication gate.
///
/// `before` runs at gate entry; `after` runs exactly once on every path,
/// immediately before the final action (pass-through, redirect or AJAX
/// response).
#[derive(Clone, Default)]
pub struct Hooks {
    pub before: Option<Hook>,
    pub after: Option<Hook>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// Path layout, client-side mounts and CAS server endpoints together.
#[derive(Debug, Clone)]
pub struct Paths {
    /// CAS login page (server side), or a per-request function.
    pub login: LoginPath,
    /// CAS service-validation endpoint (server side).
    pub service_validate: String,
    /// Ticket-validation mount on this application; also receives single
    /// logout notifications via POST.
    pub validate: String,
    /// CAS proxy-ticket endpoint (server side).
    pub proxy: String,
    /// Proxy-callback mount on this application. Configuring it enables
    /// proxy mode.
    pub proxy_callback: Option<String>,
    /// CAS logout page (server side).
    pub logout: String,
    /// CAS restlet ticket endpoint (server side), required for restlet
    /// integrations.
    pub restlet_integration: Option<String>,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            login: LoginPath::Fixed("/cas/login".to_string()),
            service_validate: "/cas/serviceValidate".to_string(),
            validate: "/cas/validate".to_string(),
            proxy: "/cas/proxy".to_string(),
            proxy_callback: None,
            logout: "/cas/logout".to_string(),
            restlet_integration: None,
        }
    }
}

/// CAS client configuration.
#[derive(Clone)]
pub struct CasConfig {
    /// Externally visible base URL of this application.
    pub service_prefix: String,
    /// Base URL of the CAS server.
    pub server_path: String,
    pub paths: Paths,
    pub cache: CacheConfig,
    /// Restlet integrations; triggers are evaluated in order and the first
    /// match wins.
    pub restlet_integrations: Vec<RestletIntegration>,
    /// Reuse granting tickets across restlet-triggered requests.
    pub restlet_cache_enabled: bool,
    pub from_ajax: Option<AjaxConfig>,
    pub redirect: Option<RedirectFn>,
    pub hooks: Hooks,
    /// Session cookie name.
    pub session_cookie: String,
    /// How long a delivered proxy-granting ticket waits to be claimed
    /// during validation.
    pub correlation_ttl: Duration,
}

impl CasConfig {
    /// Start building a configuration from the two mandatory URLs.
    pub fn builder(
        service_prefix: impl Into<String>,
        server_path: impl Into<String>,
    ) -> CasConfigBuilder {
        CasConfigBuilder {
            config: CasConfig {
                service_prefix: service_prefix.into(),
                server_path: server_path.into(),
                paths: Paths::default(),
                cache: CacheConfig::default(),
                restlet_integrations: Vec::new(),
                restlet_cache_enabled: true,
                from_ajax: None,
                redirect: None,
                hooks: Hooks::default(),
                session_cookie: "SESSIONID".to_string(),
                correlation_ttl: Duration::from_secs(300),
            },
        }
    }

    /// Proxy mode is enabled by configuring a proxy-callback mount.
    #[must_use]
    pub fn proxy_mode(&self) -> bool {
        self.paths.proxy_callback.is_some()
    }

    /// The `service` URL registered with the CAS server: the validation
    /// mount on this application.
    #[must_use]
    pub fn service_url(&self) -> String {
        format!("{}{}", self.service_prefix, self.paths.validate)
    }

    /// Absolute proxy-callback URL advertised to the CAS server.
    #[must_use]
    pub fn proxy_callback_url(&self) -> Option<String> {
        self.paths
            .proxy_callback
            .as_ref()
            .map(|path| format!("{}{}", self.service_prefix, path))
    }

    /// An absolute URL on the CAS server.
    #[must_use]
    pub fn server_url(&self, path: &str) -> String {
        format!("{}{}", self.server_path, path)
    }

    /// The login redirect target for a request, with a per-request nonce
    /// appended.
    #[must_use]
    pub fn login_url(&self, ctx: &RequestContext) -> String {
        let base = match &self.paths.login {
            LoginPath::Fixed(path) => format!(
                "{}{}?service={}",
                self.server_path,
                path,
                urlencoding::encode(&self.service_url())
            ),
            LoginPath::Dynamic(compute) => compute(ctx),
        };
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{base}{separator}sn={}", Uuid::new_v4())
    }

    /// The first restlet integration whose trigger matches this request.
    #[must_use]
    pub fn matched_restlet(&self, ctx: &RequestContext) -> Option<&RestletIntegration> {
        self.restlet_integrations
            .iter()
            .find(|integration| (integration.trigger)(ctx))
    }
}

impl fmt::Debug for CasConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CasConfig")
            .field("service_prefix", &self.service_prefix)
            .field("server_path", &self.server_path)
            .field("paths", &self.paths)
            .field("cache", &self.cache)
            .field("restlet_integrations", &self.restlet_integrations)
            .field("restlet_cache_enabled", &self.restlet_cache_enabled)
            .field("from_ajax", &self.from_ajax)
            .field("redirect", &self.redirect.is_some())
            .field("hooks", &self.hooks)
            .field("session_cookie", &self.session_cookie)
            .field("correlation_ttl", &self.correlation_ttl)
            .finish()
    }
}

/// Builder for [`CasConfig`].
#[derive(Debug)]
pub struct CasConfigBuilder {
    config: CasConfig,
}

impl CasConfigBuilder {
    /// Fixed CAS login page path.
    #[must_use]
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.config.paths.login = LoginPath::Fixed(path.into());
        self
    }

    /// Compute the login redirect target per request.
    #[must_use]
    pub fn login_path_fn(
        mut self,
        compute: impl Fn(&RequestContext) -> String + Send + Sync + 'static,
    ) -> Self {
        self.config.paths.login = LoginPath::Dynamic(Arc::new(compute));
        self
    }

    #[must_use]
    pub fn validate_path(mut self, path: impl Into<String>) -> Self {
        self.config.paths.validate = path.into();
        self
    }

    #[must_use]
    pub fn service_validate_path(mut self, path: impl Into<String>) -> Self {
        self.config.paths.service_validate = path.into();
        self
    }

    #[must_use]
    pub fn proxy_path(mut self, path: impl Into<String>) -> Self {
        self.config.paths.proxy = path.into();
        self
    }

    /// Enable proxy mode by mounting a proxy callback at `path`.
    #[must_use]
    pub fn proxy_callback(mut self, path: impl Into<String>) -> Self {
        self.config.paths.proxy_callback = Some(path.into());
        self
    }

    #[must_use]
    pub fn logout_path(mut self, path: impl Into<String>) -> Self {
        self.config.paths.logout = path.into();
        self
    }

    /// CAS restlet ticket endpoint, e.g. `/cas/v1/tickets`.
    #[must_use]
    pub fn restlet_integration_path(mut self, path: impl Into<String>) -> Self {
        self.config.paths.restlet_integration = Some(path.into());
        self
    }

    #[must_use]
    pub fn cache_enabled(mut self, enable: bool) -> Self {
        self.config.cache.enable = enable;
        self
    }

    #[must_use]
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache.ttl = ttl;
        self
    }

    /// Add a proxy-ticket cache bypass rule.
    #[must_use]
    pub fn cache_filter(mut self, filter: CacheFilter) -> Self {
        self.config.cache.filters.push(filter);
        self
    }

    /// Register a restlet integration; order matters, first match wins.
    #[must_use]
    pub fn restlet_integration(mut self, integration: RestletIntegration) -> Self {
        self.config.restlet_integrations.push(integration);
        self
    }

    /// Reuse granting tickets across restlet-triggered requests
    /// (default true).
    #[must_use]
    pub fn restlet_cache(mut self, enable: bool) -> Self {
        self.config.restlet_cache_enabled = enable;
        self
    }

    /// Answer AJAX requests carrying `header` with `status` instead of a
    /// login redirect.
    #[must_use]
    pub fn from_ajax(mut self, header: impl Into<String>, status: StatusCode) -> Self {
        self.config.from_ajax = Some(AjaxConfig {
            header: header.into(),
            status,
        });
        self
    }

    /// Custom post-validation redirect target.
    #[must_use]
    pub fn redirect(
        mut self,
        resolve: impl Fn(&RequestContext) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.config.redirect = Some(Arc::new(resolve));
        self
    }

    #[must_use]
    pub fn before_hook(
        mut self,
        hook: impl Fn(Arc<RequestContext>) -> BoxFuture<()> + Send + Sync + 'static,
    ) -> Self {
        self.config.hooks.before = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn after_hook(
        mut self,
        hook: impl Fn(Arc<RequestContext>) -> BoxFuture<()> + Send + Sync + 'static,
    ) -> Self {
        self.config.hooks.after = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn session_cookie(mut self, name: impl Into<String>) -> Self {
        self.config.session_cookie = name.into();
        self
    }

    #[must_use]
    pub fn correlation_ttl(mut self, ttl: Duration) -> Self {
        self.config.correlation_ttl = ttl;
        self
    }

    #[must_use]
    pub fn build(self) -> CasConfig {
        self.config
    }
}
