// --- File: crates/togethernow_social/src/reviews.rs ---
use serde::{Deserialize, Serialize};
use serde_json::Value;
use togethernow_common::{
    models::{collections, int_like, now_timestamp, Review},
    not_found, permission_denied, validation_error, AuthUser, TogetherError,
};
use togethernow_store::{to_fields, CollectionRef, DocumentStore, Filter, Query};
use tracing::info;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Body of `POST /reviews`.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ReviewRequest {
    #[serde(default)]
    pub target_uid: Option<String>,
    /// An integer or a numeric string.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub rating: Option<Value>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Reviews of one user with their average.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ReviewSummary {
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
    pub reviews: Vec<Value>,
    pub average_rating: f64,
    pub total_reviews: usize,
}

fn reviews() -> Result<CollectionRef, TogetherError> {
    Ok(CollectionRef::root(collections::REVIEWS)?)
}

/// Rating as given by the client. `0`, `""` and `false` count as missing.
fn rating_of(value: Option<&Value>) -> Result<Option<i64>, TogetherError> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(value) => match int_like(value) {
            Some(0) => Ok(None),
            Some(rating) => Ok(Some(rating)),
            None => Err(validation_error("Rating must be an integer")),
        },
    }
}

/// Average rounded to one decimal (ties to even), `0` without ratings.
pub fn average_rating(ratings: &[i64]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let mean = ratings.iter().sum::<i64>() as f64 / ratings.len() as f64;
    (mean * 10.0).round_ties_even() / 10.0
}

/// Stores a review written by the caller and returns its id.
pub async fn add_review(
    store: &dyn DocumentStore,
    user: &AuthUser,
    request: &ReviewRequest,
) -> Result<String, TogetherError> {
    let target = request.target_uid.as_deref().filter(|t| !t.is_empty());
    let comment = request.comment.as_deref().filter(|c| !c.is_empty());
    let rating = rating_of(request.rating.as_ref())?;
    let (Some(target), Some(comment), Some(rating)) = (target, comment, rating) else {
        return Err(validation_error("Missing fields"));
    };

    let review = Review {
        reviewer_uid: user.uid.clone(),
        reviewer_name: user.display_name("Anonymous"),
        target_uid: target.to_string(),
        rating,
        comment: comment.to_string(),
        created_at: Some(now_timestamp()),
    };
    let id = store.add(&reviews()?, to_fields(&review)?).await?;
    info!("User {} reviewed {} ({})", user.uid, target, rating);
    Ok(id)
}

/// Deletes a review written by the caller.
pub async fn delete_review(
    store: &dyn DocumentStore,
    user: &AuthUser,
    review_id: &str,
) -> Result<(), TogetherError> {
    let doc = reviews()?.doc(review_id)?;
    let review = store
        .get(&doc)
        .await?
        .ok_or_else(|| not_found("Not found"))?;
    if review.get_str("reviewer_uid") != Some(user.uid.as_str()) {
        return Err(permission_denied());
    }
    store.delete(&doc).await?;
    info!("User {} deleted review {}", user.uid, review_id);
    Ok(())
}

/// All reviews about `target_uid`, each with its `id`.
pub async fn reviews_for(
    store: &dyn DocumentStore,
    target_uid: &str,
) -> Result<ReviewSummary, TogetherError> {
    let query = Query::new(reviews()?).filter(Filter::equal("target_uid", target_uid));
    let docs = store.query(&query).await?;

    let ratings: Vec<i64> = docs
        .iter()
        .map(|d| d.get("rating").and_then(int_like).unwrap_or_default())
        .collect();
    Ok(ReviewSummary {
        average_rating: average_rating(&ratings),
        total_reviews: docs.len(),
        reviews: docs.into_iter().map(|d| d.into_json_with_id()).collect(),
    })
}
