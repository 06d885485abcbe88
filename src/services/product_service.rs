use crate::{
    dto::products::{CategoryList, ProductDto, ProductList},
    error::{AppError, AppResult},
    models::ProductId,
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    state::AppState,
};

pub fn list_products(state: &AppState, query: ProductQuery) -> ApiResponse<ProductList> {
    let (page, limit, offset) = query.pagination().normalize();
    let matches = state.catalog.query(&query.filter());
    let total = matches.len() as i64;
    let items = matches
        .into_iter()
        .skip(offset)
        .take(limit as usize)
        .map(ProductDto::from)
        .collect();
    ApiResponse::success("Products", ProductList { items }, Some(Meta::new(page, limit, total)))
}

pub fn get_product(state: &AppState, id: ProductId) -> AppResult<ApiResponse<ProductDto>> {
    let product = state.catalog.get(id).ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", ProductDto::from(product), None))
}

pub fn list_categories(state: &AppState) -> ApiResponse<CategoryList> {
    let items = state.catalog.categories().to_vec();
    let total = items.len() as i64;
    ApiResponse::success("Categories", CategoryList { items }, Some(Meta::total(total)))
}
