//! # Party Directories
//!
//! Lookup stores for the two parties on every sale: the customer it was
//! sold to and the seller who rang it up. The engine resolves both before
//! committing a sale, so a stored sale always references parties that
//! existed at commit time.

use std::collections::HashMap;
use std::sync::RwLock;

use vendo_core::{CoreError, CoreResult, Customer, Seller};

// =============================================================================
// Customer Directory
// =============================================================================

/// In-memory customer store.
#[derive(Debug, Default)]
pub struct CustomerDirectory {
    customers: RwLock<HashMap<String, Customer>>,
}

impl CustomerDirectory {
    pub fn new() -> Self {
        CustomerDirectory {
            customers: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a customer. Replaces any existing entry with the same id.
    pub fn insert(&self, customer: Customer) {
        let mut map = self.customers.write().expect("customer directory lock poisoned");
        map.insert(customer.id.clone(), customer);
    }

    pub fn get(&self, customer_id: &str) -> Option<Customer> {
        let map = self.customers.read().expect("customer directory lock poisoned");
        map.get(customer_id).cloned()
    }

    /// Resolves a customer or fails with [`CoreError::CustomerNotFound`].
    pub fn resolve(&self, customer_id: &str) -> CoreResult<Customer> {
        self.get(customer_id)
            .ok_or_else(|| CoreError::CustomerNotFound(customer_id.to_string()))
    }

    pub fn count(&self) -> usize {
        self.customers
            .read()
            .expect("customer directory lock poisoned")
            .len()
    }
}

// =============================================================================
// Seller Directory
// =============================================================================

/// In-memory seller (cashier) store.
#[derive(Debug, Default)]
pub struct SellerDirectory {
    sellers: RwLock<HashMap<String, Seller>>,
}

impl SellerDirectory {
    pub fn new() -> Self {
        SellerDirectory {
            sellers: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a seller. Replaces any existing entry with the same id.
    pub fn insert(&self, seller: Seller) {
        let mut map = self.sellers.write().expect("seller directory lock poisoned");
        map.insert(seller.id.clone(), seller);
    }

    pub fn get(&self, seller_id: &str) -> Option<Seller> {
        let map = self.sellers.read().expect("seller directory lock poisoned");
        map.get(seller_id).cloned()
    }

    /// Resolves a seller or fails with [`CoreError::SellerNotFound`].
    pub fn resolve(&self, seller_id: &str) -> CoreResult<Seller> {
        self.get(seller_id)
            .ok_or_else(|| CoreError::SellerNotFound(seller_id.to_string()))
    }

    pub fn count(&self) -> usize {
        self.sellers.read().expect("seller directory lock poisoned").len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_customer(id: &str) -> Customer {
        Customer {
            id: id.to_string(),
            first_name: "Juan".to_string(),
            last_name: "Pérez".to_string(),
            address: None,
            phone: None,
            email: None,
        }
    }

    #[test]
    fn test_customer_insert_get_resolve() {
        let directory = CustomerDirectory::new();
        directory.insert(test_customer("c-1"));

        assert!(directory.get("c-1").is_some());
        assert!(directory.resolve("c-1").is_ok());

        let err = directory.resolve("c-missing").unwrap_err();
        assert!(matches!(err, CoreError::CustomerNotFound(_)));
    }

    #[test]
    fn test_seller_resolve() {
        let directory = SellerDirectory::new();
        directory.insert(Seller {
            id: "u-1".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Martínez".to_string(),
            username: "ana".to_string(),
        });

        assert_eq!(directory.resolve("u-1").unwrap().username, "ana");
        assert!(matches!(
            directory.resolve("u-2").unwrap_err(),
            CoreError::SellerNotFound(_)
        ));
    }

    #[test]
    fn test_insert_replaces_existing() {
        let directory = CustomerDirectory::new();
        directory.insert(test_customer("c-1"));

        let mut updated = test_customer("c-1");
        updated.first_name = "Carlos".to_string();
        directory.insert(updated);

        assert_eq!(directory.count(), 1);
        assert_eq!(directory.get("c-1").unwrap().first_name, "Carlos");
    }
}
