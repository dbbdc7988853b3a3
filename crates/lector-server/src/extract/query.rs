use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::{Query as ExtraQuery, QueryRejection};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use super::{TRACING_TARGET, sanitize_error_message};
use crate::handler::{Error, ErrorKind};

/// Query string extractor that rejects with the failure envelope.
///
/// Repeated keys deserialize into sequences, so
/// `?languages=deu&languages=fra` fills a `Vec<String>`.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    /// Creates a new [`Query`] wrapper around the provided query parameters.
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Consumes the wrapper and returns the inner query parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match ExtraQuery::<T>::from_request_parts(parts, state).await {
            Ok(ExtraQuery(query)) => Ok(Query(query)),
            Err(rejection) => Err(enhance_query_error(rejection)),
        }
    }
}

impl<T, S> OptionalFromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match ExtraQuery::<T>::from_request_parts(parts, state).await {
            Ok(ExtraQuery(query)) => Ok(Some(Query(query))),
            Err(_) => Ok(None),
        }
    }
}

fn enhance_query_error(rejection: QueryRejection) -> Error<'static> {
    let details = sanitize_error_message(&format!("{rejection:?}"));

    tracing::debug!(
        target: TRACING_TARGET,
        error = %details,
        "query extraction failed"
    );

    ErrorKind::BadRequest
        .with_message("Invalid query parameters")
        .with_context(details)
}
