use serde::{Deserialize, Serialize};

pub type Rid = i64;

/// One row of the `restaurants` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Restaurant {
	pub id: Rid,
	pub name: String,
	pub location: String,
	pub price_range: i64,
}

// fields stay optional so a missing one reaches the db as NULL
// and the NOT NULL constraint decides
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantForm {
	pub name: Option<String>,
	pub location: Option<String>,
	pub price_range: Option<i64>,
}

impl Restaurant {
	/// Price tier as repeated currency symbols, `$` to `$$$$$`.
	pub fn price_symbols(&self) -> String {
		"$".repeat(self.price_range.clamp(0, 5) as usize)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pasta_house(price_range: i64) -> Restaurant {
		Restaurant {
			id: 1,
			name: "Pasta House".to_string(),
			location: "Main St".to_string(),
			price_range,
		}
	}

	#[test]
	fn price_symbols_repeat_per_tier() {
		assert_eq!(pasta_house(1).price_symbols(), "$");
		assert_eq!(pasta_house(3).price_symbols(), "$$$");
		assert_eq!(pasta_house(5).price_symbols(), "$$$$$");
	}

	#[test]
	fn price_symbols_never_overflow_the_tiers() {
		assert_eq!(pasta_house(-2).price_symbols(), "");
		assert_eq!(pasta_house(40).price_symbols(), "$$$$$");
	}

	#[test]
	fn form_fields_default_to_none() {
		let form: RestaurantForm = serde_json::from_str(r#"{"name":"Pasta House"}"#).unwrap();
		assert_eq!(form.name.as_deref(), Some("Pasta House"));
		assert!(form.location.is_none());
		assert!(form.price_range.is_none());
	}

	#[test]
	fn form_rejects_wrong_types() {
		let form = serde_json::from_str::<RestaurantForm>(r#"{"price_range":"cheap"}"#);
		assert!(form.is_err());
	}
}
