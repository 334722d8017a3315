use std::fmt;

use reqwest::{Method, Request};
use serde::de::DeserializeOwned;
use serde_json::Value;
use typed_builder::TypedBuilder;
use url::Url;

use crate::client::states::*;
use crate::credentials::AUTH_PARAM;
use crate::envelope::{checked_response, Extract};
use crate::error::DispatchError;
use crate::pagination::Paginated;
use crate::params::Parameters;
use crate::requests::describe_call;
use crate::resources::Site;
use crate::{ApiKey, DispatchResult};

/// Path of the API below the server root.
pub const API_PATH: &str = "/api/1.0/";

/// Builds the API base URL for a server host name, e.g. `https://example.l2l.com/api/1.0/`.
pub fn api_base_url(server: &str) -> DispatchResult<Url> {
    Ok(Url::parse(&format!("https://{}", server))?.join(API_PATH)?)
}

/// The internal builder for constructing a `DispatchClient`
#[derive(TypedBuilder)]
#[builder(build_method(into = DispatchResult<DispatchClient<Unscoped>>))]
pub struct ClientOptions {
    /// Base URL of the API, including the version path
    ///
    /// Example: `https://example.l2l.com/api/1.0/`
    base_url: Url,
    /// API key sent with every request
    api_key: ApiKey,
    /// Allow unsafe SSL certificates
    #[builder(default = false)]
    allow_insecure: bool,
    /// Timeout for each request
    #[builder(default = std::time::Duration::from_secs(60))]
    timeout: std::time::Duration,
    /// User agent sent with each request
    #[builder(default = concat!("l2l-dispatch-rs/", env!("CARGO_PKG_VERSION")).to_string(), setter(into))]
    user_agent: String,
}

/// Contains the states the client can be in
pub mod states {
    /// The state of the client
    ///
    /// Unscoped: no site has been validated yet
    #[derive(Debug, Clone, Copy)]
    pub struct Unscoped;
    /// The state of the client
    ///
    /// SiteScoped: a test site has been validated and is sent with every request
    #[derive(Debug, Clone, Copy)]
    pub struct SiteScoped;

    /// Marker trait for client states
    pub trait Scope: Send + Sync + 'static {}

    impl Scope for Unscoped {}
    impl Scope for SiteScoped {}
}

/// The web client for the Dispatch API
#[derive(Clone)]
pub struct DispatchClient<State = Unscoped> {
    /// Base URL of the API
    base_url: Url,
    /// Parameters sent with every request (`auth`, and `site` once scoped)
    base_params: Parameters,
    /// The validated site, if any
    site: Option<i64>,
    /// The client
    http: reqwest::Client,

    state: std::marker::PhantomData<State>,
}

impl<State> fmt::Debug for DispatchClient<State> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchClient")
            .field("base_url", &self.base_url.as_str())
            .field("base_params", &self.base_params.redacted(AUTH_PARAM))
            .field("site", &self.site)
            .finish_non_exhaustive()
    }
}

impl From<ClientOptions> for DispatchResult<DispatchClient<Unscoped>> {
    fn from(options: ClientOptions) -> Self {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(options.allow_insecure)
            .timeout(options.timeout)
            .user_agent(options.user_agent)
            .build()?;

        Ok(DispatchClient {
            base_params: Parameters::new().param(AUTH_PARAM, options.api_key.expose()),
            base_url: options.base_url,
            site: None,
            http,
            state: std::marker::PhantomData::<Unscoped>,
        })
    }
}

impl DispatchClient {
    /// Creates a builder for the client
    pub fn builder() -> ClientOptionsBuilder {
        ClientOptions::builder()
    }

    /// Checks that `site` is an active test site and returns a client that sends it with
    /// every following request, together with the site record.
    pub async fn validate_site(
        self,
        site: i64,
    ) -> DispatchResult<(DispatchClient<SiteScoped>, Site)> {
        let sites: Vec<Site> = self
            .get_data(
                "sites/",
                &Parameters::new()
                    .param("test_site", true)
                    .param("site", site)
                    .param("active", true),
            )
            .await?;

        let site_data = match <[Site; 1]>::try_from(sites) {
            Ok([site_data]) => site_data,
            Err(sites) => {
                tracing::warn!(site, matches = sites.len(), "site validation failed");
                return Err(DispatchError::not_found(format!(
                    "a single active test site with id {}",
                    site
                )));
            }
        };

        Ok((
            DispatchClient {
                base_params: self.base_params.merged(&Parameters::new().param("site", site)),
                base_url: self.base_url,
                site: Some(site),
                http: self.http,
                state: std::marker::PhantomData::<SiteScoped>,
            },
            site_data,
        ))
    }
}

impl DispatchClient<SiteScoped> {
    /// Returns the validated site id.
    pub fn site(&self) -> i64 {
        self.site.unwrap_or_default()
    }
}

impl<State: Scope> DispatchClient<State> {
    /// Returns the base URL of the API.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the parameters sent with every request.
    pub fn base_params(&self) -> &Parameters {
        &self.base_params
    }

    /// Resolves a resource path like `machines/set_cycle_count/` against the base URL.
    pub fn endpoint(&self, path: &str) -> DispatchResult<Url> {
        self.endpoint_segments(path.split('/'))
    }

    /// Resolves a resource path given as segments. Each segment is percent-encoded, so
    /// user supplied values such as user names may be passed as-is.
    pub fn endpoint_segments<'a, I>(&self, segments: I) -> DispatchResult<Url>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| DispatchError::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            path.pop_if_empty();
            path.extend(segments.into_iter().filter(|s| !s.is_empty()));
            path.push("");
        }
        Ok(url)
    }

    /// Builds a request without sending it.
    ///
    /// The per-call `overrides` are merged over the base parameters; GET requests carry
    /// them as query arguments, everything else as a form body.
    pub fn prepare_request(
        &self,
        method: Method,
        url: Url,
        overrides: &Parameters,
    ) -> DispatchResult<Request> {
        self.build_request(method, url, &self.base_params.merged(overrides))
    }

    fn build_request(
        &self,
        method: Method,
        url: Url,
        params: &Parameters,
    ) -> DispatchResult<Request> {
        let builder = self.http.request(method.clone(), url);
        let builder = if method == Method::GET {
            builder.query(params)
        } else {
            builder.form(params)
        };
        Ok(builder.build()?)
    }

    /// Renders the call that [`request`](Self::request) would make, with the API key masked.
    pub fn describe_request(
        &self,
        method: &Method,
        url: &Url,
        overrides: &Parameters,
    ) -> String {
        describe_call(
            method,
            url,
            &self.base_params.merged(overrides).redacted(AUTH_PARAM),
        )
    }

    /// Sends a prepared request and checks the response envelope.
    pub async fn execute(&self, request: Request, extract: Extract) -> DispatchResult<Value> {
        tracing::debug!(method = %request.method(), path = request.url().path(), "calling api");
        let response = self.http.execute(request).await?;
        checked_response(response, extract).await
    }

    /// Performs a request against `url`.
    pub async fn request(
        &self,
        method: Method,
        url: Url,
        overrides: &Parameters,
        extract: Extract,
    ) -> DispatchResult<Value> {
        let params = self.base_params.merged(overrides);
        if tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!("{}", describe_call(&method, &url, &params.redacted(AUTH_PARAM)));
        }
        let request = self.build_request(method, url, &params)?;
        self.execute(request, extract).await
    }

    /// Performs a GET request for reading data.
    pub async fn get(
        &self,
        path: &str,
        overrides: &Parameters,
        extract: Extract,
    ) -> DispatchResult<Value> {
        self.request(Method::GET, self.endpoint(path)?, overrides, extract)
            .await
    }

    /// Performs a POST request for writes and actions.
    pub async fn post(
        &self,
        path: &str,
        overrides: &Parameters,
        extract: Extract,
    ) -> DispatchResult<Value> {
        self.request(Method::POST, self.endpoint(path)?, overrides, extract)
            .await
    }

    /// Performs a GET request and deserializes the `data` field to the type `T`.
    pub async fn get_data<T>(&self, path: &str, overrides: &Parameters) -> DispatchResult<T>
    where
        T: DeserializeOwned,
    {
        let data = self.get(path, overrides, Extract::Data).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Performs a POST request and deserializes the `data` field to the type `T`.
    pub async fn post_data<T>(&self, path: &str, overrides: &Parameters) -> DispatchResult<T>
    where
        T: DeserializeOwned,
    {
        let data = self.post(path, overrides, Extract::Data).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Pages through a list resource, `limit` items at a time.
    pub fn paginate<T>(
        &self,
        path: &str,
        overrides: Parameters,
        limit: u32,
    ) -> Paginated<'_, T, State>
    where
        T: DeserializeOwned,
    {
        Paginated::new(self, path, overrides, limit)
    }
}
