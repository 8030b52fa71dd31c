//! PostgreSQL-backed illustrative image repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use url::Url;

use crate::domain::ports::{IllustrativeImageRepository, IllustrativeImageRepositoryError};
use crate::domain::{IllustrativeImage, ImageCategory, SearchKeyword};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::contains_pattern;
use super::models::{ImageRow, NewImageRow};
use super::pool::{DbPool, PoolError};
use super::schema::imagenes_ilustrativas;

/// Diesel-backed implementation of [`IllustrativeImageRepository`].
#[derive(Clone)]
pub struct DieselIllustrativeImageRepository {
    pool: DbPool,
}

impl DieselIllustrativeImageRepository {
    /// Create a repository using `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IllustrativeImageRepositoryError {
    map_basic_pool_error(error, IllustrativeImageRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> IllustrativeImageRepositoryError {
    map_basic_diesel_error(
        error,
        IllustrativeImageRepositoryError::query,
        IllustrativeImageRepositoryError::connection,
    )
}

/// Rows are written through [`ImageCategory`] and [`Url`], so a row failing
/// either parse was edited outside this service.
fn to_image(row: ImageRow) -> Result<IllustrativeImage, IllustrativeImageRepositoryError> {
    let category = ImageCategory::new(&row.categoria).map_err(|err| {
        IllustrativeImageRepositoryError::query(format!("stored category is invalid: {err}"))
    })?;
    let url = Url::parse(&row.url).map_err(|err| {
        IllustrativeImageRepositoryError::query(format!("stored url is invalid: {err}"))
    })?;
    Ok(IllustrativeImage { category, url })
}

#[async_trait]
impl IllustrativeImageRepository for DieselIllustrativeImageRepository {
    async fn upsert(
        &self,
        image: &IllustrativeImage,
    ) -> Result<(), IllustrativeImageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewImageRow {
            categoria: image.category.as_str(),
            url: image.url.as_str(),
        };

        diesel::insert_into(imagenes_ilustrativas::table)
            .values(&row)
            .on_conflict(imagenes_ilustrativas::categoria)
            .do_update()
            .set(imagenes_ilustrativas::url.eq(excluded(imagenes_ilustrativas::url)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn find_first_matching(
        &self,
        keyword: &SearchKeyword,
    ) -> Result<Option<IllustrativeImage>, IllustrativeImageRepositoryError> {
        let pattern = contains_pattern(keyword);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = imagenes_ilustrativas::table
            .filter(imagenes_ilustrativas::categoria.ilike(pattern.as_str()))
            .order(imagenes_ilustrativas::id.asc())
            .select(ImageRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(to_image).transpose()
    }
}
