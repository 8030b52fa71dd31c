//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer; repositories convert them
//! to and from domain types.

use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::PartRecord;

use super::schema::{imagenes_ilustrativas, repuestos};

/// Row struct for reading from the repuestos table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = repuestos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PartRow {
    pub id: i32,
    pub codigo: Option<String>,
    pub marca: Option<String>,
    pub entradas: i32,
    pub salidas: i32,
    pub stock: i32,
    pub precios: Option<Decimal>,
    pub importe_inventario: Option<Decimal>,
}

/// Insertable struct for one staged part.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = repuestos)]
pub(crate) struct NewPartRow<'a> {
    pub codigo: Option<&'a str>,
    pub marca: Option<&'a str>,
    pub entradas: i32,
    pub salidas: i32,
    pub stock: i32,
    pub precios: Option<Decimal>,
    pub importe_inventario: Option<Decimal>,
}

impl<'a> From<&'a PartRecord> for NewPartRow<'a> {
    fn from(record: &'a PartRecord) -> Self {
        Self {
            codigo: record.code.as_deref(),
            marca: record.brand.as_deref(),
            entradas: record.entries,
            salidas: record.exits,
            stock: record.stock,
            precios: record.unit_price,
            importe_inventario: record.inventory_value,
        }
    }
}

/// Row struct for reading from the imagenes_ilustrativas table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = imagenes_ilustrativas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ImageRow {
    pub categoria: String,
    pub url: String,
}

/// Insertable struct for upserting an image by category.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = imagenes_ilustrativas)]
pub(crate) struct NewImageRow<'a> {
    pub categoria: &'a str,
    pub url: &'a str,
}
