use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use news_core::NewsArticle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/news", get(list_news))
        .route("/tickers", get(tickers_for_news).post(extract_tickers))
        .route("/recommend_recipe", get(recommend_recipe))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// GET / — service greeting and status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub news_loaded: usize,
    pub collection: String,
    /// Points in the vector collection, absent when Qdrant is unreachable
    pub companies_indexed: Option<u64>,
    pub started_at: String,
}

/// POST /tickers request body. Both fields default to empty; a request
/// that is blank on both sides is rejected.
#[derive(Debug, Deserialize)]
pub struct TickersRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
}

/// POST /tickers response, echoing the input next to the extraction
#[derive(Debug, Serialize)]
pub struct TickersResponse {
    pub title: String,
    pub summary: String,
    pub tickers: Vec<String>,
}

/// GET /news response
#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub articles: Vec<NewsArticle>,
    pub count: usize,
}

/// One entry of the GET /tickers batch response
#[derive(Debug, Serialize)]
pub struct NewsTickers {
    pub title: String,
    pub tickers: Vec<String>,
}

/// GET /tickers response
#[derive(Debug, Serialize)]
pub struct BatchTickersResponse {
    pub results: Vec<NewsTickers>,
    pub count: usize,
}

/// GET /recommend_recipe query parameters
#[derive(Debug, Deserialize)]
pub struct RecipeParams {
    pub ingredients: Option<String>,
    pub image: Option<u32>,
}

/// GET /recommend_recipe response
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub ingredients: String,
    pub recipe: String,
}

async fn root(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let companies_indexed = state.vector_store.point_count().await.ok().flatten();

    Json(StatusResponse {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
        news_loaded: state.news.len(),
        collection: state.config.collection_name.clone(),
        companies_indexed,
        started_at: state.started_at.to_rfc3339(),
    })
}

async fn list_news(State(state): State<Arc<AppState>>) -> Json<NewsResponse> {
    Json(NewsResponse {
        articles: state.news.clone(),
        count: state.news.len(),
    })
}

/// Extract tickers from a single article supplied in the request body
async fn extract_tickers(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TickersRequest>,
) -> Result<Json<TickersResponse>, ApiError> {
    let article = NewsArticle::new(req.title, req.summary);

    if article.is_blank() {
        return Err(ApiError::BadRequest(
            "Provide a title or a summary".to_string(),
        ));
    }

    let outcome = state
        .extractor
        .extract(&article)
        .await
        .map_err(ApiError::upstream)?;

    tracing::info!(
        "POST /tickers: {} tickers ({} context docs, cached={})",
        outcome.tickers.len(),
        outcome.matches_considered,
        outcome.from_cache
    );

    Ok(Json(TickersResponse {
        title: article.title,
        summary: article.summary,
        tickers: outcome.tickers,
    }))
}

/// Extract tickers for every news article preloaded at startup.
/// A failing article is logged and reported with an empty list so one bad
/// extraction doesn't abort the batch.
async fn tickers_for_news(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BatchTickersResponse>, ApiError> {
    let mut results = Vec::with_capacity(state.news.len());

    for article in &state.news {
        let tickers = match state.extractor.extract(article).await {
            Ok(outcome) => outcome.tickers,
            Err(e) => {
                tracing::error!("Extraction failed for '{}': {}", article.title, e);
                Vec::new()
            }
        };

        results.push(NewsTickers {
            title: article.title.clone(),
            tickers,
        });
    }

    let count = results.len();
    Ok(Json(BatchTickersResponse { results, count }))
}

/// Generate a recipe from typed ingredients and/or a food photo index
async fn recommend_recipe(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecipeParams>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let has_ingredients = params
        .ingredients
        .as_deref()
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false);

    if !has_ingredients && params.image.is_none() {
        return Err(ApiError::BadRequest(
            "Provide ingredients or a food photo index".to_string(),
        ));
    }

    let recommendation = state
        .recommender
        .recommend(params.ingredients.as_deref(), params.image)
        .await
        .map_err(ApiError::upstream)?;

    Ok(Json(RecipeResponse {
        ingredients: recommendation.ingredients,
        recipe: recommendation.recipe,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickers_request_defaults() {
        let req: TickersRequest = serde_json::from_str("{}").unwrap();
        assert!(req.title.is_empty());
        assert!(req.summary.is_empty());

        let req: TickersRequest =
            serde_json::from_str(r#"{"title": "Blockbuster Earnings"}"#).unwrap();
        assert_eq!(req.title, "Blockbuster Earnings");
        assert!(req.summary.is_empty());
    }

    #[test]
    fn test_tickers_response_shape() {
        let response = TickersResponse {
            title: "Apple Reports Record Earnings Amid Strong iPhone Sales".to_string(),
            summary: "Apple Inc. announced record quarterly earnings.".to_string(),
            tickers: vec!["AAPL".to_string()],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["tickers"][0], "AAPL");
        assert!(json["title"].as_str().unwrap().starts_with("Apple"));
    }

    #[test]
    fn test_recipe_params_deserialization() {
        let params: RecipeParams =
            serde_json::from_str(r#"{"ingredients": "eggs, flour"}"#).unwrap();
        assert_eq!(params.ingredients.as_deref(), Some("eggs, flour"));
        assert!(params.image.is_none());

        let params: RecipeParams = serde_json::from_str(r#"{"image": 2}"#).unwrap();
        assert_eq!(params.image, Some(2));
    }
}
