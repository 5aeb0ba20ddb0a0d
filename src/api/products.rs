//! Product endpoints — public catalog reads, admin multipart create/update/delete

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use http::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::db::{self, products::NewProduct};
use crate::error::{AppError, ErrorCode};
use crate::models::{ProductDetail, ProductSummary, StockEntry};
use crate::state::AppState;
use crate::upload;

use super::{ApiResult, internal};

#[derive(Deserialize)]
pub struct ListQuery {
    /// Filter by category name
    pub category: Option<String>,
}

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<ProductSummary>> {
    let products = db::products::list(&state.pool, query.category.as_deref())
        .await
        .map_err(internal)?;
    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ProductDetail> {
    let product = db::products::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::not_found("Producto no encontrado"))?;

    let images = db::products::list_image_filenames(&state.pool, id)
        .await
        .map_err(internal)?
        .into_iter()
        .map(|filename| format!("/images/{filename}"))
        .collect();

    Ok(Json(ProductDetail { product, images }))
}

/// Parse the `stock` multipart field: a JSON array of {store_id, quantity}
pub(crate) fn parse_stock_entries(raw: &str) -> Result<Vec<StockEntry>, AppError> {
    let entries: Vec<StockEntry> = serde_json::from_str(raw)
        .map_err(|_| AppError::validation("Especificación de stock inválida"))?;
    if entries.iter().any(|e| e.quantity < 0) {
        return Err(AppError::validation(
            "Las cantidades de stock no pueden ser negativas",
        ));
    }
    Ok(entries)
}

/// Collected multipart form for product creation
#[derive(Default)]
struct ProductForm {
    name: Option<String>,
    description: Option<String>,
    price: Option<String>,
    sku: Option<String>,
    category_id: Option<String>,
    stock: Option<String>,
    /// (extension, bytes) per uploaded image, already size/type validated
    files: Vec<(String, Vec<u8>)>,
}

async fn read_product_form(mut multipart: Multipart) -> Result<ProductForm, AppError> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" => {
                if form.files.len() >= upload::MAX_IMAGES {
                    return Err(AppError::with_message(
                        ErrorCode::InvalidRequest,
                        format!("Máximo {} imágenes por producto", upload::MAX_IMAGES),
                    ));
                }
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        AppError::with_message(
                            ErrorCode::InvalidRequest,
                            format!("Read error: {e}"),
                        )
                    })?
                    .to_vec();
                let ext = upload::validate_upload(&filename, data.len())?;
                form.files.push((ext, data));
            }
            _ => {
                let value = field.text().await.map_err(|e| {
                    AppError::with_message(ErrorCode::InvalidRequest, format!("Read error: {e}"))
                })?;
                match name.as_str() {
                    "name" => form.name = Some(value),
                    "description" => form.description = Some(value),
                    "price" => form.price = Some(value),
                    "sku" => form.sku = Some(value),
                    "category_id" => form.category_id = Some(value),
                    "stock" => form.stock = Some(value),
                    // Unknown fields are ignored
                    _ => {}
                }
            }
        }
    }

    Ok(form)
}

/// POST /api/products (multipart)
///
/// Product row, image rows, and initial stock rows commit atomically. The
/// image files themselves are written to disk first and removed again if the
/// transaction fails.
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let form = read_product_form(multipart).await?;

    let (Some(name), Some(price_raw), Some(category_raw), Some(stock_raw)) =
        (&form.name, &form.price, &form.category_id, &form.stock)
    else {
        return Err(AppError::validation("Faltan campos requeridos"));
    };
    let sku = form.sku.as_deref().unwrap_or_default();
    if name.trim().is_empty() || sku.trim().is_empty() {
        return Err(AppError::validation("Faltan campos requeridos"));
    }

    let price: Decimal = price_raw
        .parse()
        .map_err(|_| AppError::validation("Precio inválido"))?;
    let category_id: i64 = category_raw
        .parse()
        .map_err(|_| AppError::validation("Categoría inválida"))?;
    let stock = parse_stock_entries(stock_raw)?;

    // Persist the uploads only after all field validation passed
    let mut filenames = Vec::with_capacity(form.files.len());
    for (ext, data) in &form.files {
        match upload::save_image(&state.image_dir, ext, data) {
            Ok(filename) => filenames.push(filename),
            Err(e) => {
                upload::remove_images(&state.image_dir, &filenames);
                return Err(e);
            }
        }
    }

    let data = NewProduct {
        name: name.trim(),
        description: form.description.as_deref(),
        price,
        sku: sku.trim(),
        category_id,
    };

    match db::products::create_product(&state.pool, &data, &filenames, &stock).await {
        Ok(product_id) => Ok((
            StatusCode::CREATED,
            Json(serde_json::json!({
                "message": "Producto creado exitosamente",
                "productId": product_id,
            })),
        )),
        Err(e) => {
            // The rolled-back transaction must not leave orphan files behind
            upload::remove_images(&state.image_dir, &filenames);
            Err(internal(e))
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sku: String,
    pub category_id: i64,
}

/// PUT /api/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProductRequest>,
) -> ApiResult<ProductSummary> {
    let data = NewProduct {
        name: req.name.trim(),
        description: req.description.as_deref(),
        price: req.price,
        sku: req.sku.trim(),
        category_id: req.category_id,
    };
    let product = db::products::update(&state.pool, id, &data)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::not_found("Producto no encontrado"))?;
    Ok(Json(product))
}

/// DELETE /api/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let filenames = db::products::delete(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::not_found("Producto no encontrado"))?;

    upload::remove_images(&state.image_dir, &filenames);

    Ok(Json(serde_json::json!({ "message": "Producto eliminado" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_entries_parse_valid_json() {
        let entries =
            parse_stock_entries(r#"[{"store_id": 1, "quantity": 10}, {"store_id": 2, "quantity": 5}]"#)
                .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].store_id, 1);
        assert_eq!(entries[1].quantity, 5);
    }

    #[test]
    fn empty_stock_entries_are_valid() {
        assert!(parse_stock_entries("[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_stock_json_is_client_error() {
        let err = parse_stock_entries("not json").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(parse_stock_entries(r#"{"store_id": 1}"#).is_err());
    }

    #[test]
    fn negative_stock_quantity_is_rejected() {
        assert!(parse_stock_entries(r#"[{"store_id": 1, "quantity": -3}]"#).is_err());
    }
}
