// server rendered listing, same statements as the json api

use axum::{
	extract::{rejection::{FormRejection, PathRejection}, Path, State},
	response::Redirect,
	routing::{get, post},
	Form, Router,
};
use maud::{html, Markup, DOCTYPE};
use tracing::info;

use crate::{
	error::AppError,
	routes::ServerState,
	sql,
	types::{RestaurantForm, Rid},
};

pub fn router() -> Router<ServerState> {
	Router::new()
		.route("/", get(display_all).post(add_restaurant))
		.route("/delete/:id", post(remove_restaurant))
		.route("/restaurants/:id/update", get(display_update).post(save_restaurant))
}

async fn display_all(State(stt): State<ServerState>) -> Result<Markup, AppError> {
	let restaurants = sql::select_restaurants(&stt.db).await?;

	Ok(html! {
		(DOCTYPE)
		html {
			head { title { "Restaurants" } }
			body {
				h1 { "Restaurant Finder" }
				form method="POST" action="/" {
					input name="name" type="text" placeholder="name" required;
					input name="location" type="text" placeholder="location" required;
					select name="price_range" {
						@for tier in 1..=5usize {
							option value=(tier) { ("$".repeat(tier)) }
						}
					}
					button { "Add" }
				}
				table {
					thead { tr {
						th { "Restaurant" }
						th { "Location" }
						th { "Price Range" }
						th { "Edit" }
						th { "Delete" }
					} }
					tbody {
						@for restaurant in &restaurants {
							tr {
								td { (restaurant.name) }
								td { (restaurant.location) }
								td { (restaurant.price_symbols()) }
								td {
									a href={ "/restaurants/" (restaurant.id) "/update" } { "Update" }
								}
								td {
									form method="POST" action={ "/delete/" (restaurant.id) } {
										button { "Delete" }
									}
								}
							}
						}
					}
				}
			}
		}
	})
}

async fn add_restaurant(
	State(stt): State<ServerState>,
	form: Result<Form<RestaurantForm>, FormRejection>,
) -> Result<Redirect, AppError> {
	let Form(form) = form?;
	let restaurant = sql::insert_restaurant(&stt.db, &form).await?;
	info!(id = restaurant.id, name = %restaurant.name, "restaurant created from page");

	Ok(Redirect::to("/"))
}

async fn display_update(
	State(stt): State<ServerState>,
	id: Result<Path<Rid>, PathRejection>,
) -> Result<Markup, AppError> {
	let Path(id) = id?;
	let restaurant = sql::select_restaurant(&stt.db, id).await?
		.ok_or(AppError::NotFound(id))?;

	Ok(html! {
		(DOCTYPE)
		html {
			head { title { "Update " (restaurant.name) } }
			body {
				h1 { "Update Restaurant" }
				form method="POST" action={ "/restaurants/" (restaurant.id) "/update" } {
					input name="name" type="text" value=(restaurant.name) required;
					input name="location" type="text" value=(restaurant.location) required;
					select name="price_range" {
						@for tier in 1..=5usize {
							option value=(tier) selected[tier as i64 == restaurant.price_range] {
								("$".repeat(tier))
							}
						}
					}
					button { "Submit" }
				}
				a href="/" { "Back" }
			}
		}
	})
}

// full overwrite like the api PUT
async fn save_restaurant(
	State(stt): State<ServerState>,
	id: Result<Path<Rid>, PathRejection>,
	form: Result<Form<RestaurantForm>, FormRejection>,
) -> Result<Redirect, AppError> {
	let Path(id) = id?;
	let Form(form) = form?;
	sql::update_restaurant(&stt.db, id, &form).await?
		.ok_or(AppError::NotFound(id))?;
	info!(id, "restaurant updated from page");

	Ok(Redirect::to("/"))
}

async fn remove_restaurant(
	State(stt): State<ServerState>,
	id: Result<Path<Rid>, PathRejection>,
) -> Result<Redirect, AppError> {
	let Path(id) = id?;
	let removed = sql::delete_restaurant(&stt.db, id).await?;
	info!(id, removed, "restaurant deleted from page");

	Ok(Redirect::to("/"))
}
