//! Form payloads and validation for catalog editing.
//!
//! Validation returns the full list of problems, not just the first, so the
//! form can show everything that needs fixing in one round trip.

use serde::Deserialize;

use telar_core::slug::slugify;
use telar_core::types::{CategoryId, Price};

/// Maximum length for names.
pub const MAX_NAME_LENGTH: usize = 200;

/// Form body for creating or editing a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hero_image: String,
}

/// A validated category form.
#[derive(Debug, Clone)]
pub struct ValidCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub hero_image: Option<String>,
}

impl CategoryForm {
    /// Validate the form, deriving the slug from the name.
    ///
    /// # Errors
    ///
    /// Returns every validation problem found, in field order.
    pub fn validate(&self) -> Result<ValidCategory, Vec<String>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("El nombre es obligatorio.".to_owned());
        } else if name.len() > MAX_NAME_LENGTH {
            errors.push(format!(
                "El nombre no puede superar {MAX_NAME_LENGTH} caracteres."
            ));
        }

        let slug = slugify(name);
        if !name.is_empty() && slug.is_empty() {
            errors.push("El nombre debe contener letras o números.".to_owned());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidCategory {
            name: name.to_owned(),
            slug,
            description: non_empty(&self.description),
            hero_image: non_empty(&self.hero_image),
        })
    }
}

/// Form body for creating or editing a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price in whole pesos (COP has no minor unit in practice).
    pub price: i64,
    /// Browsers submit an empty string for a blank number field.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub compare_at_price: Option<i64>,
    pub category_id: CategoryId,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// A validated product form.
#[derive(Debug, Clone)]
pub struct ValidProduct {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    pub compare_at_price: Option<Price>,
    pub category_id: CategoryId,
}

impl ProductForm {
    /// Validate the form, deriving the slug from the name.
    ///
    /// # Errors
    ///
    /// Returns every validation problem found, in field order.
    pub fn validate(&self) -> Result<ValidProduct, Vec<String>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("El nombre es obligatorio.".to_owned());
        } else if name.len() > MAX_NAME_LENGTH {
            errors.push(format!(
                "El nombre no puede superar {MAX_NAME_LENGTH} caracteres."
            ));
        }

        let slug = slugify(name);
        if !name.is_empty() && slug.is_empty() {
            errors.push("El nombre debe contener letras o números.".to_owned());
        }

        let description = self.description.trim();
        if description.is_empty() {
            errors.push("La descripción es obligatoria.".to_owned());
        }

        if self.price <= 0 {
            errors.push("El precio debe ser mayor que cero.".to_owned());
        }

        if let Some(compare_at) = self.compare_at_price {
            if compare_at <= 0 {
                errors.push("El precio de comparación debe ser mayor que cero.".to_owned());
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidProduct {
            name: name.to_owned(),
            slug,
            description: description.to_owned(),
            price: Price::from_minor(self.price),
            compare_at_price: self.compare_at_price.map(Price::from_minor),
            category_id: self.category_id,
        })
    }
}

/// Form body for adding a product image by URL or path.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageForm {
    pub file_path: String,
}

impl ImageForm {
    /// Validate the image path.
    ///
    /// # Errors
    ///
    /// Returns the validation problems found.
    pub fn validate(&self) -> Result<String, Vec<String>> {
        let path = self.file_path.trim();
        if path.is_empty() {
            return Err(vec!["La ruta de la imagen es obligatoria.".to_owned()]);
        }
        Ok(path.to_owned())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_form(name: &str, description: &str, price: i64) -> ProductForm {
        ProductForm {
            name: name.to_owned(),
            description: description.to_owned(),
            price,
            compare_at_price: None,
            category_id: CategoryId::random(),
        }
    }

    #[test]
    fn valid_product_passes_and_gets_a_slug() {
        let valid = product_form("Cojín de Lino", "Tejido a mano.", 45_000)
            .validate()
            .expect("valid");
        assert_eq!(valid.slug, "cojin-de-lino");
        assert_eq!(valid.price.as_minor(), 45_000);
    }

    #[test]
    fn all_problems_are_reported_at_once() {
        let errors = product_form("", "", 0).validate().expect_err("invalid");
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn name_length_is_bounded() {
        let long = "a".repeat(MAX_NAME_LENGTH + 1);
        let errors = product_form(&long, "desc", 100).validate().expect_err("invalid");
        assert!(errors.iter().any(|e| e.contains("200")));

        let at_limit = "a".repeat(MAX_NAME_LENGTH);
        assert!(product_form(&at_limit, "desc", 100).validate().is_ok());
    }

    #[test]
    fn zero_compare_at_price_is_rejected() {
        let mut form = product_form("Cojín", "desc", 100);
        form.compare_at_price = Some(0);
        assert!(form.validate().is_err());
    }

    #[test]
    fn category_name_trims_and_slugs() {
        let form = CategoryForm {
            name: "  Mantas y Cojines  ".to_owned(),
            description: String::new(),
            hero_image: "  ".to_owned(),
        };
        let valid = form.validate().expect("valid");
        assert_eq!(valid.name, "Mantas y Cojines");
        assert_eq!(valid.slug, "mantas-y-cojines");
        assert!(valid.description.is_none());
        assert!(valid.hero_image.is_none());
    }

    #[test]
    fn symbol_only_name_is_rejected() {
        let form = CategoryForm {
            name: "!!!".to_owned(),
            description: String::new(),
            hero_image: String::new(),
        };
        assert!(form.validate().is_err());
    }
}
