//! Diesel table definitions for the inventory schema.
//!
//! These must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Inventory parts loaded from stock workbooks.
    repuestos (id) {
        /// Surrogate key assigned on insert; preserves load order.
        id -> Int4,
        codigo -> Nullable<Text>,
        marca -> Nullable<Text>,
        entradas -> Int4,
        salidas -> Int4,
        stock -> Int4,
        precios -> Nullable<Numeric>,
        importe_inventario -> Nullable<Numeric>,
    }
}

diesel::table! {
    /// Hosted image URL per normalised category.
    imagenes_ilustrativas (id) {
        id -> Int4,
        /// Unique, lower-case category label.
        categoria -> Text,
        url -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(repuestos, imagenes_ilustrativas);
