//! Request and response interceptors.
//!
//! The [`RequestInterceptor`] resolves each request's credential scope and
//! attaches that scope's token. The resolved scope travels with the
//! [`PreparedRequest`], so the [`ResponseInterceptor`] recovers from a `401`
//! using the scope the request was actually sent with rather than
//! re-deriving it from the path.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::auth::{CredentialScope, CredentialStore, ScopeResolver, Token};
use crate::clients::errors::{ApiError, InvalidRequestError};
use crate::clients::http_request::ApiRequest;
use crate::clients::http_response::{Envelope, TransportFailure};
use crate::config::{AppPath, RealmPaths};
use crate::navigation::Navigator;
use crate::notify::{
    Notifier, NETWORK_ERROR_MESSAGE, REQUEST_FAILED_MESSAGE, SESSION_EXPIRED_MESSAGE,
};

/// A request after scope resolution, ready to dispatch.
#[derive(Clone, Debug)]
pub struct PreparedRequest {
    /// Identifier unique within one interceptor.
    pub id: u64,
    /// The scope resolved for this request.
    pub scope: CredentialScope,
    /// The token to send as a bearer credential, if the scope has one.
    pub credential: Option<Token>,
    /// The original request.
    pub request: ApiRequest,
}

impl PreparedRequest {
    /// Returns the `Authorization` header value, if a credential is attached.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.credential.as_ref().map(Token::bearer)
    }
}

/// Attaches the correct scope's credential to outgoing requests.
#[derive(Debug)]
pub struct RequestInterceptor {
    resolver: ScopeResolver,
    store: Arc<CredentialStore>,
    next_id: AtomicU64,
}

impl RequestInterceptor {
    /// Creates an interceptor reading tokens from `store`.
    #[must_use]
    pub const fn new(resolver: ScopeResolver, store: Arc<CredentialStore>) -> Self {
        Self {
            resolver,
            store,
            next_id: AtomicU64::new(1),
        }
    }

    /// Resolves the scope and credential for `request`.
    ///
    /// A scope without a token yields a request with no credential; the
    /// server is expected to reject it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] if the request fails validation.
    pub fn prepare(&self, request: ApiRequest) -> Result<PreparedRequest, InvalidRequestError> {
        request.verify()?;

        let scope = self.resolver.resolve(&request.descriptor());
        let credential = self.store.get(scope);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(
            request_id = id,
            path = %request.path,
            scope = %scope,
            authenticated = credential.is_some(),
            "resolved request scope"
        );

        Ok(PreparedRequest {
            id,
            scope,
            credential,
            request,
        })
    }
}

/// Unwraps envelopes and recovers from authentication failures.
#[derive(Debug)]
pub struct ResponseInterceptor {
    store: Arc<CredentialStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    paths: RealmPaths,
}

impl ResponseInterceptor {
    /// Creates an interceptor.
    #[must_use]
    pub fn new(
        store: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        paths: RealmPaths,
    ) -> Self {
        Self {
            store,
            navigator,
            notifier,
            paths,
        }
    }

    /// Handles a successful HTTP response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Application`] if the envelope code is not `200`.
    pub fn on_success(
        &self,
        prepared: &PreparedRequest,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        let envelope = Envelope::from_body(body);
        if envelope.is_success() {
            return Ok(envelope.data);
        }

        let message = envelope
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| REQUEST_FAILED_MESSAGE.to_string());

        tracing::debug!(
            request_id = prepared.id,
            code = ?envelope.code,
            message = %message,
            "application error"
        );
        self.notifier.error(&message);

        Err(ApiError::Application {
            code: envelope.code,
            message,
        })
    }

    /// Handles a request that did not produce a successful HTTP response.
    ///
    /// Always returns an error; the caller's own handling still runs.
    #[must_use]
    pub fn on_failure(&self, prepared: &PreparedRequest, failure: TransportFailure) -> ApiError {
        if failure.status == Some(401) {
            return self.recover_unauthorized(prepared);
        }

        let message = failure
            .body_message()
            .map(str::to_string)
            .or_else(|| Some(failure.message.clone()).filter(|m| !m.is_empty()))
            .unwrap_or_else(|| NETWORK_ERROR_MESSAGE.to_string());

        tracing::warn!(
            request_id = prepared.id,
            path = %prepared.request.path,
            status = ?failure.status,
            "request failed: {message}"
        );
        self.notifier.error(&message);

        ApiError::Transport {
            status: failure.status,
            message,
        }
    }

    fn recover_unauthorized(&self, prepared: &PreparedRequest) -> ApiError {
        let scope = prepared.scope;

        if let Err(e) = self.store.clear(scope) {
            tracing::warn!(scope = %scope, error = %e, "failed to clear expired credentials");
        }
        self.notifier.error(SESSION_EXPIRED_MESSAGE);

        let current = self.navigator.current_path();
        let in_shop_realm = self.paths.in_shop_realm(&current);
        let target = match scope {
            CredentialScope::User if !in_shop_realm => Some(self.paths.user_login.clone()),
            CredentialScope::Shop if in_shop_realm => Some(self.paths.shop_login.clone()),
            _ => None,
        };

        tracing::warn!(
            request_id = prepared.id,
            scope = %scope,
            current = %current,
            redirect = ?target.as_ref().map(AppPath::as_str),
            "session expired"
        );

        if let Some(target) = &target {
            self.navigator.navigate_to(target.as_str());
        }

        ApiError::SessionExpired {
            scope,
            redirected_to: target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionFields;
    use crate::clients::http_request::HttpMethod;
    use crate::navigation::History;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn error(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    struct Fixture {
        store: Arc<CredentialStore>,
        history: Arc<History>,
        notifier: Arc<RecordingNotifier>,
        requests: RequestInterceptor,
        responses: ResponseInterceptor,
    }

    fn fixture(current_path: &str) -> Fixture {
        let store = Arc::new(CredentialStore::in_memory());
        store
            .set(
                CredentialScope::User,
                Token::new("user-token").unwrap(),
                SessionFields::new().username("alice").role("user"),
            )
            .unwrap();
        store
            .set(
                CredentialScope::Shop,
                Token::new("shop-token").unwrap(),
                SessionFields::new().profile(json!({"id": 3})),
            )
            .unwrap();

        let history = Arc::new(History::new(current_path));
        let notifier = Arc::new(RecordingNotifier::default());
        let requests = RequestInterceptor::new(ScopeResolver::default(), Arc::clone(&store));
        let responses = ResponseInterceptor::new(
            Arc::clone(&store),
            history.clone(),
            notifier.clone(),
            RealmPaths::default(),
        );

        Fixture {
            store,
            history,
            notifier,
            requests,
            responses,
        }
    }

    fn get(path: &str) -> ApiRequest {
        ApiRequest::builder(HttpMethod::Get, path).build().unwrap()
    }

    #[test]
    fn test_prepare_attaches_scope_token() {
        let f = fixture("/");

        let user = f.requests.prepare(get("/orders/my")).unwrap();
        assert_eq!(user.scope, CredentialScope::User);
        assert_eq!(user.authorization().as_deref(), Some("Bearer user-token"));

        let shop = f.requests.prepare(get("/shop/my")).unwrap();
        assert_eq!(shop.scope, CredentialScope::Shop);
        assert_eq!(shop.authorization().as_deref(), Some("Bearer shop-token"));
    }

    #[test]
    fn test_prepare_without_token_sends_no_credential() {
        let f = fixture("/");
        f.store.clear(CredentialScope::Shop).unwrap();

        let prepared = f
            .requests
            .prepare(
                ApiRequest::builder(HttpMethod::Get, "/orders/shop")
                    .shop_scoped()
                    .build()
                    .unwrap(),
            )
            .unwrap();
        assert_eq!(prepared.scope, CredentialScope::Shop);
        assert!(prepared.authorization().is_none());
    }

    #[test]
    fn test_prepare_assigns_increasing_ids() {
        let f = fixture("/");
        let first = f.requests.prepare(get("/a")).unwrap();
        let second = f.requests.prepare(get("/b")).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_success_envelope_unwraps_data() {
        let f = fixture("/");
        let prepared = f.requests.prepare(get("/orders/1")).unwrap();

        let data = f
            .responses
            .on_success(&prepared, json!({"code": 200, "data": {"id": 1}}))
            .unwrap();
        assert_eq!(data, json!({"id": 1}));
        assert!(f.notifier.messages.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failure_envelope_surfaces_message() {
        let f = fixture("/");
        let prepared = f.requests.prepare(get("/orders/1")).unwrap();

        let err = f
            .responses
            .on_success(&prepared, json!({"code": 500, "message": "boom"}))
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Application { code: Some(500), ref message } if message == "boom"
        ));
        assert_eq!(*f.notifier.messages.lock().unwrap(), vec!["boom".to_string()]);
    }

    #[test]
    fn test_user_401_outside_shop_realm_clears_user_and_redirects() {
        let f = fixture("/member-center");
        let prepared = f.requests.prepare(get("/user/profile")).unwrap();

        let err = f
            .responses
            .on_failure(&prepared, TransportFailure::from_status(401, None));

        assert!(matches!(
            err,
            ApiError::SessionExpired {
                scope: CredentialScope::User,
                redirected_to: Some(ref p),
            } if p.as_str() == "/login"
        ));
        assert!(f.store.get(CredentialScope::User).is_none());
        assert!(f.store.username().is_none());
        assert!(f.store.get(CredentialScope::Shop).is_some());
        assert_eq!(f.history.current_path(), "/login");
        assert_eq!(
            *f.notifier.messages.lock().unwrap(),
            vec![SESSION_EXPIRED_MESSAGE.to_string()]
        );
    }

    #[test]
    fn test_shop_401_outside_shop_realm_clears_shop_without_redirect() {
        let f = fixture("/my-orders");
        let prepared = f.requests.prepare(get("/shop/my")).unwrap();

        let err = f
            .responses
            .on_failure(&prepared, TransportFailure::from_status(401, None));

        assert!(matches!(
            err,
            ApiError::SessionExpired { scope: CredentialScope::Shop, redirected_to: None }
        ));
        assert!(f.store.get(CredentialScope::Shop).is_none());
        assert!(f.store.get(CredentialScope::User).is_some());
        assert_eq!(f.history.entries(), vec!["/my-orders".to_string()]);
    }

    #[test]
    fn test_shop_401_inside_shop_realm_redirects_to_shop_login() {
        let f = fixture("/shop/orders");
        let prepared = f
            .requests
            .prepare(
                ApiRequest::builder(HttpMethod::Get, "/orders/shop")
                    .shop_scoped()
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let err = f
            .responses
            .on_failure(&prepared, TransportFailure::from_status(401, None));

        assert!(matches!(
            err,
            ApiError::SessionExpired {
                scope: CredentialScope::Shop,
                redirected_to: Some(ref p),
            } if p.as_str() == "/shop/login"
        ));
        assert_eq!(f.history.current_path(), "/shop/login");
    }

    #[test]
    fn test_user_401_inside_shop_realm_does_not_redirect() {
        let f = fixture("/shop/dashboard");
        let prepared = f.requests.prepare(get("/orders/my")).unwrap();

        let err = f
            .responses
            .on_failure(&prepared, TransportFailure::from_status(401, None));

        assert!(matches!(
            err,
            ApiError::SessionExpired { scope: CredentialScope::User, redirected_to: None }
        ));
        assert!(f.store.get(CredentialScope::User).is_none());
        assert_eq!(f.history.current_path(), "/shop/dashboard");
    }

    #[test]
    fn test_transport_failure_prefers_body_message() {
        let f = fixture("/");
        let prepared = f.requests.prepare(get("/orders/my")).unwrap();

        let err = f.responses.on_failure(
            &prepared,
            TransportFailure::from_status(403, Some(json!({"message": "Forbidden shop"}))),
        );

        assert!(matches!(
            err,
            ApiError::Transport { status: Some(403), ref message } if message == "Forbidden shop"
        ));
        assert!(f.store.get(CredentialScope::User).is_some());
        assert_eq!(f.history.entries().len(), 1);
    }

    #[test]
    fn test_transport_failure_falls_back_to_transport_then_generic_message() {
        let f = fixture("/");
        let prepared = f.requests.prepare(get("/orders/my")).unwrap();

        let err = f
            .responses
            .on_failure(&prepared, TransportFailure::from_status(500, None));
        assert_eq!(err.to_string(), "Request failed with status code 500");

        let err = f.responses.on_failure(
            &prepared,
            TransportFailure {
                status: None,
                body: None,
                message: String::new(),
            },
        );
        assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
    }
}
