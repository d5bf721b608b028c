use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that is run through [`Validate`] before the handler sees it.
///
/// Deserialization failures keep the status chosen by axum's `Json`
/// (400, 415 or 422); rule failures answer 400 with per-field details.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct Filters {
///     #[validate(custom(function = "validate_price_range"))]
///     radio: Vec<f64>,
/// }
///
/// async fn filter(ValidatedJson(body): ValidatedJson<Filters>) -> Response { /* ... */ }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
