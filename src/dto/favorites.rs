use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::products::ProductDto, models::ProductId};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddFavoriteRequest {
    pub product_id: ProductId,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteProductList {
    pub items: Vec<ProductDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteStatus {
    pub product_id: ProductId,
    pub favorite: bool,
}
