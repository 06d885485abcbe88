//! Read-only product catalog with the storefront's filter, search and sort
//! rules.

use std::cmp::Ordering;

use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::{Category, Product, ProductId};

/// Category slug that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    #[default]
    Name,
    Price,
}

/// Browse criteria. `None` fields do not filter.
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    /// Slug or display name; blank or `all` disables it.
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub sort_by: ProductSortBy,
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<Category>,
}

impl Catalog {
    /// Builds a catalog whose categories are derived from the products, in
    /// first-seen order.
    pub fn new(products: Vec<Product>) -> Self {
        let mut categories: Vec<Category> = Vec::new();
        for product in &products {
            if !categories.iter().any(|c| c.name == product.category) {
                categories.push(Category {
                    slug: slugify(&product.category),
                    name: product.category.clone(),
                });
            }
        }
        Self {
            products,
            categories,
        }
    }

    pub fn demo() -> Self {
        let products = DEMO_PRODUCTS
            .iter()
            .map(|(id, name, price, category, image)| Product {
                id: *id,
                name: (*name).to_string(),
                price: *price,
                category: (*category).to_string(),
                image: Some(format!(
                    "https://images.unsplash.com/photo-{image}?auto=format&fit=crop&w=800&q=80"
                )),
            })
            .collect();
        Self::new(products)
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Resolves a category slug or display name, ignoring case.
    pub fn category(&self, key: &str) -> Option<&Category> {
        let key = key.trim();
        self.categories
            .iter()
            .find(|c| c.slug.eq_ignore_ascii_case(key) || c.name.to_lowercase() == key.to_lowercase())
    }

    /// Every product matching `filter`, in sort order. An unknown category
    /// matches nothing.
    pub fn query(&self, filter: &ProductFilter) -> Vec<&Product> {
        let category = filter
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES));
        let category_name = match category {
            Some(key) => match self.category(key) {
                Some(c) => Some(c.name.as_str()),
                None => return Vec::new(),
            },
            None => None,
        };
        let search = filter
            .search
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        let mut matches: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| category_name.is_none_or(|name| p.category == name))
            .filter(|p| {
                search.as_deref().is_none_or(|q| {
                    p.name.to_lowercase().contains(q) || p.category.to_lowercase().contains(q)
                })
            })
            .filter(|p| filter.min_price.is_none_or(|min| p.price >= min))
            .filter(|p| filter.max_price.is_none_or(|max| p.price <= max))
            .collect();

        matches.sort_by(|a, b| {
            let ord = match filter.sort_by {
                ProductSortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                ProductSortBy::Price => a.price.cmp(&b.price),
            };
            let ord = match filter.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            };
            if ord == Ordering::Equal {
                a.id.cmp(&b.id)
            } else {
                ord
            }
        });
        matches
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

const DEMO_PRODUCTS: &[(ProductId, &str, i64, &str, &str)] = &[
    (1, "Ultra HD Liquid Foundation", 8990, "Makeup", "1596704017254-9a89b5d155cc"),
    (2, "Vitamin C Face Serum", 12990, "Skincare", "1620916566398-39f1143ab7be"),
    (3, "Volume Mascara", 6990, "Makeup", "1631730359585-38a4935cbcec"),
    (4, "Moisturizing Shampoo", 5990, "Hair", "1626618012641-319588c8a40d"),
    (5, "Body Lotion", 4990, "Body & Bath", "1556228578-8d89a1dde6a8"),
    (6, "Intense Floral Perfume", 19990, "Fragrances", "1617897903246-719242758050"),
    (7, "Collagen Powder", 8990, "Supplements", "1612531047288-7b0622429779"),
    (8, "Makeup Brush Kit", 14990, "Accessories", "1522336572468-97b06e8ef143"),
    (9, "Sunscreen SPF 50", 7990, "Skincare", "1556227834-09f1de7a7d14"),
    (10, "Long-Lasting Matte Lipstick", 3990, "Makeup", "1586495777744-4413f21062fa"),
    (11, "Repairing Hair Mask", 6990, "Hair", "1535585209827-a15fcdbc4c2d"),
    (12, "Moisturizing Body Oil", 5990, "Body & Bath", "1608248597279-f99d160bfcbc"),
];
