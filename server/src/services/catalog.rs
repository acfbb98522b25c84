//! Product catalog: categories, admin form parsing, queries and seeding.
//!
//! DESIGN
//! ======
//! The shop sells from two fixed aisles, [`Category::Cement`] and
//! [`Category::Kirana`]. Admin writes go through [`ProductForm`], which holds
//! raw form strings and converts them into typed inserts or partial updates;
//! a blank field on update means "keep the current value".

use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid product: {0}")]
    Validation(String),
    #[error("product not found: {0}")]
    NotFound(i32),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// CATEGORY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Cement,
    Kirana,
}

impl Category {
    pub const ALL: [Self; 2] = [Self::Cement, Self::Kirana];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cement => "cement",
            Self::Kirana => "kirana",
        }
    }

}

impl std::str::FromStr for Category {
    type Err = CatalogError;

    /// Exact, case-sensitive match on the category slug.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == raw)
            .ok_or_else(|| CatalogError::Validation(format!("unknown category {raw:?}")))
    }
}

// =============================================================================
// PRODUCT
// =============================================================================

/// Product row as served to shoppers and the admin UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub stock: i32,
}

fn product_from_row(row: &PgRow) -> Product {
    Product {
        id: row.get("id"),
        name: row.get("name"),
        category: row.get("category"),
        description: row.get("description"),
        price: row.get("price"),
        image_url: row.get("image_url"),
        stock: row.get("stock"),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category: Category,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub stock: i32,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub stock: Option<i32>,
}

/// Raw admin form fields, before validation.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
    pub image_url: Option<String>,
}

fn present(field: Option<String>) -> Option<String> {
    field.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn parse_price(raw: &str) -> Result<f64, CatalogError> {
    raw.parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| CatalogError::Validation(format!("invalid price {raw:?}")))
}

fn parse_stock(raw: &str) -> Result<i32, CatalogError> {
    raw.parse::<i32>()
        .ok()
        .filter(|s| *s >= 0)
        .ok_or_else(|| CatalogError::Validation(format!("invalid stock {raw:?}")))
}

impl ProductForm {
    /// Validate fields for an insert. Price and stock default to zero.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] when the name or category is
    /// missing or a field does not parse.
    pub fn into_new_product(self) -> Result<NewProduct, CatalogError> {
        let name = present(self.name).ok_or_else(|| CatalogError::Validation("name is required".into()))?;
        let category = present(self.category)
            .ok_or_else(|| CatalogError::Validation("category is required".into()))
            .and_then(|c| c.parse::<Category>())?;
        let price = present(self.price).map_or(Ok(0.0), |p| parse_price(&p))?;
        let stock = present(self.stock).map_or(Ok(0), |s| parse_stock(&s))?;

        Ok(NewProduct {
            name,
            category,
            description: present(self.description),
            price,
            image_url: present(self.image_url),
            stock,
        })
    }

    /// Validate fields for a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] when a present field does not parse.
    pub fn into_patch(self) -> Result<ProductPatch, CatalogError> {
        Ok(ProductPatch {
            name: present(self.name),
            category: present(self.category).map(|c| c.parse::<Category>()).transpose()?,
            description: present(self.description),
            price: present(self.price).map(|p| parse_price(&p)).transpose()?,
            image_url: present(self.image_url),
            stock: present(self.stock).map(|s| parse_stock(&s)).transpose()?,
        })
    }
}

// =============================================================================
// QUERIES
// =============================================================================

const PRODUCT_COLUMNS: &str = "id, name, category, description, price, image_url, stock";

/// List products, optionally restricted to one category string.
pub async fn list_products(pool: &PgPool, category: Option<&str>) -> Result<Vec<Product>, CatalogError> {
    let rows = match category {
        Some(category) => {
            sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY id"))
                .bind(category)
                .fetch_all(pool)
                .await?
        }
        None => {
            sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows.iter().map(product_from_row).collect())
}

pub async fn get_product(pool: &PgPool, id: i32) -> Result<Product, CatalogError> {
    let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(CatalogError::NotFound(id))?;
    Ok(product_from_row(&row))
}

/// Insert a product and return its id.
pub async fn create_product(pool: &PgPool, product: &NewProduct) -> Result<i32, CatalogError> {
    let row = sqlx::query(
        r"INSERT INTO products (name, category, description, price, image_url, stock)
          VALUES ($1, $2, $3, $4, $5, $6)
          RETURNING id",
    )
    .bind(&product.name)
    .bind(product.category.as_str())
    .bind(&product.description)
    .bind(product.price)
    .bind(&product.image_url)
    .bind(product.stock)
    .fetch_one(pool)
    .await?;
    Ok(row.get("id"))
}

pub async fn update_product(pool: &PgPool, id: i32, patch: &ProductPatch) -> Result<(), CatalogError> {
    sqlx::query(
        r"UPDATE products SET
              name = COALESCE($2, name),
              category = COALESCE($3, category),
              description = COALESCE($4, description),
              price = COALESCE($5, price),
              image_url = COALESCE($6, image_url),
              stock = COALESCE($7, stock)
          WHERE id = $1
          RETURNING id",
    )
    .bind(id)
    .bind(&patch.name)
    .bind(patch.category.map(Category::as_str))
    .bind(&patch.description)
    .bind(patch.price)
    .bind(&patch.image_url)
    .bind(patch.stock)
    .fetch_optional(pool)
    .await?
    .ok_or(CatalogError::NotFound(id))?;
    Ok(())
}

pub async fn delete_product(pool: &PgPool, id: i32) -> Result<(), CatalogError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(CatalogError::NotFound(id));
    }
    Ok(())
}

pub async fn count_products(pool: &PgPool) -> Result<i64, CatalogError> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM products").fetch_one(pool).await?;
    Ok(row.get("n"))
}

// =============================================================================
// SEEDING
// =============================================================================

struct SampleProduct {
    name: &'static str,
    category: Category,
    description: &'static str,
    price: f64,
    stock: i32,
}

const fn sample(name: &'static str, category: Category, description: &'static str, price: f64, stock: i32) -> SampleProduct {
    SampleProduct { name, category, description, price, stock }
}

const SAMPLE_PRODUCTS: [SampleProduct; 12] = [
    sample("Portland Cement 50kg", Category::Cement, "High-quality Portland cement suitable for construction projects", 450.0, 100),
    sample("Fly Ash Cement 50kg", Category::Cement, "Eco-friendly fly ash cement with better durability", 420.0, 75),
    sample("White Cement 20kg", Category::Cement, "Premium white cement for decorative finishes", 380.0, 50),
    sample("Plaster Cement 40kg", Category::Cement, "Specialized cement for plaster work", 350.0, 60),
    sample("Basmati Rice 1kg", Category::Kirana, "Premium long-grain basmati rice", 80.0, 200),
    sample("Wheat Flour 5kg", Category::Kirana, "Pure wheat flour for daily use", 120.0, 150),
    sample("Cooking Oil 1L", Category::Kirana, "Refined vegetable cooking oil", 160.0, 120),
    sample("Dal (Lentils) 1kg", Category::Kirana, "Mixed dal assortment", 140.0, 100),
    sample("Sugar 1kg", Category::Kirana, "White granulated sugar", 50.0, 180),
    sample("Salt 1kg", Category::Kirana, "Iodized table salt", 25.0, 200),
    sample("Spice Mix 500g", Category::Kirana, "Mixed spices blend", 200.0, 80),
    sample("Tea Leaves 250g", Category::Kirana, "Premium tea leaves", 180.0, 120),
];

fn sample_products() -> impl Iterator<Item = NewProduct> {
    SAMPLE_PRODUCTS.iter().map(|s| NewProduct {
        name: s.name.to_owned(),
        category: s.category,
        description: Some(s.description.to_owned()),
        price: s.price,
        image_url: None,
        stock: s.stock,
    })
}

/// Insert the sample catalog when the products table is empty.
/// Returns how many products were added.
pub async fn seed_sample_products(pool: &PgPool) -> Result<usize, CatalogError> {
    if count_products(pool).await? > 0 {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut added = 0;
    for product in sample_products() {
        sqlx::query(
            r"INSERT INTO products (name, category, description, price, image_url, stock)
              VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&product.name)
        .bind(product.category.as_str())
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(product.stock)
        .execute(&mut *tx)
        .await?;
        added += 1;
    }
    tx.commit().await?;
    Ok(added)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
