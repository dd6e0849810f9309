//! JSON resource API under `/api/v1/restaurants`.
//!
//! Every handler issues exactly one statement through [`crate::sql`] and
//! wraps the result in a `{status, data}` envelope. Failures surface as
//! [`AppError`] with an error envelope instead of an empty response.

use axum::{
	extract::{rejection::{JsonRejection, PathRejection}, Path, State},
	http::{StatusCode, Uri},
	routing::get,
	Json, Router,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
	error::AppError,
	pages,
	sql::{self, Db},
	types::{Restaurant, RestaurantForm, Rid},
};

#[derive(Clone)]
pub struct ServerState {
	pub db: Db,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
	pub status: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub num_results: Option<usize>,
	pub data: T,
}

impl<T> Envelope<T> {
	fn success(data: T) -> Self {
		Self { status: "success", num_results: None, data }
	}
}

#[derive(Debug, Serialize)]
pub struct RestaurantData {
	pub restaurant: Restaurant,
}

#[derive(Debug, Serialize)]
pub struct RestaurantsData {
	pub restaurants: Vec<Restaurant>,
}

type ApiResult<T> = Result<T, AppError>;

pub fn app(state: ServerState) -> Router {
	let api = Router::new()
		.route("/", get(list_restaurants).post(create_restaurant))
		.route("/:id", get(get_restaurant).put(update_restaurant).delete(delete_restaurant));

	// axios joins the base url with "/", keep serving that form
	Router::new()
		.route("/api/v1/restaurants/", get(list_restaurants).post(create_restaurant))
		.nest("/api/v1/restaurants", api)
		.merge(pages::router())
		.fallback(unknown_route)
		.with_state(state)
}

async fn unknown_route(uri: Uri) -> AppError {
	AppError::UnknownRoute(uri.path().to_string())
}

async fn create_restaurant(
	State(stt): State<ServerState>,
	form: Result<Json<RestaurantForm>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<RestaurantData>>)> {
	let Json(form) = form?;
	let restaurant = sql::insert_restaurant(&stt.db, &form).await?;
	info!(id = restaurant.id, name = %restaurant.name, "restaurant created");

	Ok((
		StatusCode::CREATED,
		Json(Envelope::success(RestaurantData { restaurant })),
	))
}

async fn list_restaurants(
	State(stt): State<ServerState>,
) -> ApiResult<Json<Envelope<RestaurantsData>>> {
	let restaurants = sql::select_restaurants(&stt.db).await?;
	debug!(count = restaurants.len(), "restaurants listed");

	Ok(Json(Envelope {
		status: "success",
		num_results: Some(restaurants.len()),
		data: RestaurantsData { restaurants },
	}))
}

async fn get_restaurant(
	State(stt): State<ServerState>,
	id: Result<Path<Rid>, PathRejection>,
) -> ApiResult<Json<Envelope<RestaurantData>>> {
	let Path(id) = id?;
	let restaurant = sql::select_restaurant(&stt.db, id).await?
		.ok_or(AppError::NotFound(id))?;
	debug!(id, "restaurant retrieved");

	Ok(Json(Envelope::success(RestaurantData { restaurant })))
}

async fn update_restaurant(
	State(stt): State<ServerState>,
	id: Result<Path<Rid>, PathRejection>,
	form: Result<Json<RestaurantForm>, JsonRejection>,
) -> ApiResult<Json<Envelope<RestaurantData>>> {
	let Path(id) = id?;
	let Json(form) = form?;
	let restaurant = sql::update_restaurant(&stt.db, id, &form).await?
		.ok_or(AppError::NotFound(id))?;
	info!(id, "restaurant updated");

	Ok(Json(Envelope::success(RestaurantData { restaurant })))
}

// 204 whether or not the row existed
async fn delete_restaurant(
	State(stt): State<ServerState>,
	id: Result<Path<Rid>, PathRejection>,
) -> ApiResult<StatusCode> {
	let Path(id) = id?;
	let removed = sql::delete_restaurant(&stt.db, id).await?;
	info!(id, removed, "restaurant deleted");

	Ok(StatusCode::NO_CONTENT)
}
