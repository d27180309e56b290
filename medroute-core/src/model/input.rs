//! The immutable input snapshot and product lookups over it.

use std::collections::{HashMap, HashSet};

use geo::Coord;

use super::{Driver, Office, Order, Product, Vehicle};
use crate::error::MissingDataError;

/// Everything a planning run needs, fully loaded and validated upstream.
///
/// Location index `0` is always the office; orders follow in input order, so
/// `orders[i]` sits at location `i + 1`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use medroute_core::{Office, Order, SchedulingInputData};
///
/// let mut input = SchedulingInputData::new(Office::new("hq", Coord { x: 0.0, y: 0.0 }));
/// input.orders.push(Order::new("o1", Coord { x: 1.0, y: 0.0 }));
/// let locations = input.locations();
/// assert_eq!(locations.len(), 2);
/// assert_eq!(locations[0], Coord { x: 0.0, y: 0.0 });
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchedulingInputData {
    /// Depot shared by every route.
    pub office: Office,
    /// Driver pool.
    pub drivers: Vec<Driver>,
    /// Vehicle pool.
    pub vehicles: Vec<Vehicle>,
    /// Product catalogue.
    pub products: Vec<Product>,
    /// Orders to plan.
    pub orders: Vec<Order>,
}

impl SchedulingInputData {
    /// Construct an input with only an office.
    pub const fn new(office: Office) -> Self {
        Self {
            office,
            drivers: Vec::new(),
            vehicles: Vec::new(),
            products: Vec::new(),
            orders: Vec::new(),
        }
    }

    /// Index products by identifier.
    pub fn catalog(&self) -> ProductCatalog<'_> {
        ProductCatalog::new(&self.products)
    }

    /// Depot followed by every order location.
    pub fn locations(&self) -> Vec<Coord<f64>> {
        std::iter::once(self.office.location)
            .chain(self.orders.iter().map(|order| order.location))
            .collect()
    }

    /// Look up an order by identifier.
    ///
    /// # Errors
    /// Returns [`MissingDataError::UnknownOrder`] when no order matches.
    pub fn order(&self, order_id: &str) -> Result<&Order, MissingDataError> {
        self.orders
            .iter()
            .find(|order| order.id == order_id)
            .ok_or_else(|| MissingDataError::UnknownOrder {
                order_id: order_id.to_owned(),
            })
    }

    /// Confirm every product referenced by an order exists.
    ///
    /// # Errors
    /// Returns the first [`MissingDataError::UnknownProduct`] encountered.
    pub fn validate(&self) -> Result<(), MissingDataError> {
        let catalog = self.catalog();
        for order in &self.orders {
            catalog.products_for(order)?;
        }
        Ok(())
    }
}

/// Product lookup by identifier, borrowed from a [`SchedulingInputData`].
#[derive(Debug, Clone)]
pub struct ProductCatalog<'a> {
    by_id: HashMap<&'a str, &'a Product>,
}

impl<'a> ProductCatalog<'a> {
    /// Index `products` by identifier. Later duplicates shadow earlier ones.
    pub fn new(products: &'a [Product]) -> Self {
        Self {
            by_id: products
                .iter()
                .map(|product| (product.id.as_str(), product))
                .collect(),
        }
    }

    /// Resolve a product referenced by `order_id`.
    ///
    /// # Errors
    /// Returns [`MissingDataError::UnknownProduct`] when the id is unknown.
    pub fn get(&self, order_id: &str, product_id: &str) -> Result<&'a Product, MissingDataError> {
        self.by_id
            .get(product_id)
            .copied()
            .ok_or_else(|| MissingDataError::UnknownProduct {
                order_id: order_id.to_owned(),
                product_id: product_id.to_owned(),
            })
    }

    /// Distinct products of `order`, in the order first referenced.
    ///
    /// # Errors
    /// Returns [`MissingDataError::UnknownProduct`] for the first unknown id.
    pub fn products_for(&self, order: &Order) -> Result<Vec<&'a Product>, MissingDataError> {
        let mut seen = HashSet::new();
        let mut products = Vec::with_capacity(order.product_ids.len());
        for product_id in &order.product_ids {
            let product = self.get(&order.id, product_id)?;
            if seen.insert(product.id.as_str()) {
                products.push(product);
            }
        }
        Ok(products)
    }

    /// Every product referenced by `order`, duplicates included.
    ///
    /// # Errors
    /// Returns [`MissingDataError::UnknownProduct`] for the first unknown id.
    pub fn line_items(&self, order: &Order) -> Result<Vec<&'a Product>, MissingDataError> {
        order
            .product_ids
            .iter()
            .map(|product_id| self.get(&order.id, product_id))
            .collect()
    }
}
