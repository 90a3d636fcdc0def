use actix_cors::Cors;
use actix_web::{error, web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult};
use knnrec_core::{
    classify, classify_with_neighbors, find_k_neighbors, recommend_with_neighbors, Error,
    RatingVector,
};
use knnrec_storage::DatasetManager;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

const ENDPOINTS: &[&str] = &[
    "GET /",
    "GET /health",
    "GET /stats",
    "GET /items",
    "GET /config",
    "POST /config",
    "POST /classify",
    "POST /recommend",
];

const DEFAULT_RECOMMENDATIONS: i64 = 10;

#[derive(Deserialize)]
struct ClassifyRequest {
    ratings: Vec<f64>,
    k: Option<i64>,
}

#[derive(Deserialize)]
struct RecommendRequest {
    ratings: Vec<f64>,
    n: Option<i64>,
    k: Option<i64>,
}

#[derive(Deserialize)]
struct ConfigRequest {
    k: Option<i64>,
}

#[derive(Deserialize)]
struct ItemsQuery {
    limit: Option<usize>,
    offset: Option<usize>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(manager: Arc<DatasetManager>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .configure(|cfg| RestApi::configure(cfg, manager.clone()))
                .default_service(web::route().to(not_found))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Run the server on its own actix system, blocking until it stops.
    ///
    /// Bind failures are returned to the caller.
    pub fn run(manager: Arc<DatasetManager>, port: u16) -> std::io::Result<()> {
        actix_web::rt::System::new().block_on(Self::start(manager, port))
    }

    /// Register shared state, extractor error handlers and routes
    pub fn configure(cfg: &mut web::ServiceConfig, manager: Arc<DatasetManager>) {
        cfg.app_data(web::Data::new(manager))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .route("/", web::get().to(service_info))
            .route("/health", web::get().to(health))
            .route("/stats", web::get().to(stats))
            .route("/items", web::get().to(list_items))
            .route("/config", web::get().to(get_config))
            .route("/config", web::post().to(update_config))
            .route("/classify", web::post().to(classify_user))
            .route("/recommend", web::post().to(recommend_items));
    }
}

fn error_body(message: impl Into<String>) -> serde_json::Value {
    serde_json::json!({ "error": message.into() })
}

fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(error_body(message))
}

fn error_response(err: &Error) -> HttpResponse {
    if err.is_input_error() {
        bad_request(err.to_string())
    } else {
        warn!("Request failed: {}", err);
        HttpResponse::InternalServerError().json(error_body(err.to_string()))
    }
}

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(format!("Invalid JSON body: {}", err));
    error::InternalError::from_response(err, response).into()
}

fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(format!("Invalid query parameters: {}", err));
    error::InternalError::from_response(err, response).into()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

async fn not_found() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::NotFound().json(serde_json::json!({
        "error": "Endpoint not found",
        "endpoints": ENDPOINTS,
    })))
}

async fn service_info() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "name": "knnrec",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "active",
        "description": "User-based collaborative filtering with exact k-nearest neighbors",
        "metric": "cosine",
        "endpoints": ENDPOINTS,
    })))
}

async fn health(manager: web::Data<Arc<DatasetManager>>) -> ActixResult<HttpResponse> {
    let matrix = manager.matrix();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "knnrec",
        "dataset_loaded": true,
        "dataset_shape": {
            "users": matrix.n_users(),
            "items": matrix.n_items(),
        }
    })))
}

async fn stats(manager: web::Data<Arc<DatasetManager>>) -> ActixResult<HttpResponse> {
    let stats = manager.matrix().stats();
    let distribution: serde_json::Map<String, serde_json::Value> = stats
        .distribution
        .iter()
        .map(|star| (format!("{}_stars", star.stars), star.count.into()))
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "total_users": stats.total_users,
        "total_items": stats.total_items,
        "total_ratings": stats.total_ratings,
        "possible_ratings": stats.possible_ratings,
        "density_pct": round2(stats.density_pct),
        "mean_rating": round2(stats.mean_rating),
        "median_rating": round2(stats.median_rating),
        "rating_std_dev": round2(stats.rating_std_dev),
        "distribution": distribution,
    })))
}

async fn list_items(
    manager: web::Data<Arc<DatasetManager>>,
    query: web::Query<ItemsQuery>,
) -> ActixResult<HttpResponse> {
    let labels = manager.matrix().item_labels();
    let total = labels.len();
    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(total);

    let start = offset.min(total);
    let end = start.saturating_add(limit).min(total);
    let page = &labels[start..end];

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "total": total,
        "offset": offset,
        "limit": limit,
        "count": page.len(),
        "items": page,
    })))
}

async fn get_config(manager: web::Data<Arc<DatasetManager>>) -> ActixResult<HttpResponse> {
    let matrix = manager.matrix();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "k": manager.default_k(),
        "dataset": {
            "users": matrix.n_users(),
            "items": matrix.n_items(),
        }
    })))
}

async fn update_config(
    manager: web::Data<Arc<DatasetManager>>,
    req: web::Json<ConfigRequest>,
) -> ActixResult<HttpResponse> {
    let requested = match req.k {
        Some(k) => k,
        None => return Ok(bad_request("Field 'k' is required")),
    };

    let k = usize::try_from(requested).unwrap_or(0);
    match manager.set_default_k(k) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Configuration updated",
            "k": manager.default_k(),
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn classify_user(
    manager: web::Data<Arc<DatasetManager>>,
    req: web::Json<ClassifyRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    let matrix = manager.matrix();
    let candidate = RatingVector::new(req.ratings);

    if let Err(e) = candidate.validate(matrix.n_items()) {
        return Ok(error_response(&e));
    }

    let k = match manager.resolve_k(req.k) {
        Ok(k) => k,
        Err(e) => return Ok(error_response(&e)),
    };

    debug!("classify: k={}, rated={}", k, candidate.rated_count());

    match classify(&candidate, matrix, k) {
        Ok(classification) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "classification": classification,
            "parameters": {
                "k_used": k,
                "rated_items": candidate.rated_count(),
            }
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn recommend_items(
    manager: web::Data<Arc<DatasetManager>>,
    req: web::Json<RecommendRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    let matrix = manager.matrix();
    let candidate = RatingVector::new(req.ratings);

    if let Err(e) = candidate.validate(matrix.n_items()) {
        return Ok(error_response(&e));
    }

    if candidate.unrated_count() == 0 {
        return Ok(bad_request(
            "All items are already rated; there is nothing to recommend",
        ));
    }

    let n = req.n.unwrap_or(DEFAULT_RECOMMENDATIONS);
    if n <= 0 {
        return Ok(bad_request("n must be greater than 0"));
    }
    let n = usize::try_from(n).unwrap_or(usize::MAX);

    let k = match manager.resolve_k(req.k) {
        Ok(k) => k,
        Err(e) => return Ok(error_response(&e)),
    };

    debug!(
        "recommend: k={}, n={}, unrated={}",
        k,
        n,
        candidate.unrated_count()
    );

    // One neighbor search feeds both the segment and the scores
    let result = find_k_neighbors(&candidate, matrix, k).and_then(|neighbors| {
        let classification = classify_with_neighbors(matrix, &neighbors)?;
        let recommendations = recommend_with_neighbors(&candidate, matrix, &neighbors, n)?;
        Ok((classification, recommendations))
    });

    match result {
        Ok((classification, recommendations)) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "classification": classification,
            "total_recommendations": recommendations.len(),
            "recommendations": recommendations,
            "parameters": {
                "k_used": k,
                "n_requested": n,
                "rated_items": candidate.rated_count(),
                "unrated_items": candidate.unrated_count(),
            }
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}
