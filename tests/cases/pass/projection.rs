// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Projections, pagination, runtime ordering and custom statements.

pub struct Product {
    #[id]
    pub sku: String,
    #[column(name = "title")]
    pub name: String,
    pub price: f64,
    pub stock: Stock,
}

pub struct Stock {
    pub warehouse: String,
    pub count: i32,
}

pub struct Listing {
    pub name: String,
    pub price: f64,
}

pub trait ProductRepository: Repository<Product> {
    fn find_by_stock_warehouse(&self, stock_warehouse: String, order: Order, pageable: Pageable) -> Page<Listing>;

    #[query("SELECT sku FROM product WHERE price > :min")]
    fn skus_above(&self, min: f64) -> Vec<String>;

    #[statement("UPDATE product SET price = price * :factor WHERE sku IN (:skus)")]
    fn reprice(&self, factor: f64, skus: Vec<String>);

    #[first]
    #[order_by("price DESC")]
    fn find_by_stock_count(&self, count: i32) -> Option<Product>;
}
