//! Local caches that are kept in step with the stores.
//!
//! A client that shows lists of categories and transactions keeps a copy of
//! them so that it does not have to reload everything after each change.
//! Every mutating call here runs in the same order: validate the input, ask
//! the store to make the change, and only then update the cached list with
//! the record the store returned. If any step fails the cached list is left
//! exactly as it was and the error is returned to the caller.
//!
//! There is no locking between callers, the last call to finish wins.

use std::fmt::Display;

use time::OffsetDateTime;

use crate::{
    Error,
    category::{BatchDeletion, Category, CategoryStore},
    database_id::{CategoryId, DatabaseId, TransactionId},
    filter::TransactionFilter,
    transaction::{TransactionStore, TransactionWithCategory},
    validation::{
        CategoryCandidate, TransactionCandidate, check_batch_ids, parse_category_update,
        parse_new_category, parse_new_transaction, parse_transaction_update,
    },
};

/// Records that can be found in a [CachedList] by their database ID.
pub trait Keyed {
    /// The database ID of the record.
    fn key(&self) -> DatabaseId;
}

impl Keyed for Category {
    fn key(&self) -> DatabaseId {
        self.id
    }
}

impl Keyed for TransactionWithCategory {
    fn key(&self) -> DatabaseId {
        self.transaction.id
    }
}

/// An ordered list of records held by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedList<T> {
    items: Vec<T>,
}

impl<T> Default for CachedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Keyed> CachedList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The records in display order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The record with the ID `key`, if it is cached.
    pub fn get(&self, key: DatabaseId) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    /// Replace every record, e.g. after reloading from the store.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Add a newly created record to the front of the list.
    pub fn insert(&mut self, item: T) {
        self.items.insert(0, item);
    }

    /// Swap in a new version of a record at the position of the old one.
    ///
    /// Returns `false` if no record with the same ID is cached, in which case
    /// the list is unchanged.
    pub fn replace(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|cached| cached.key() == item.key()) {
            Some(cached) => {
                *cached = item;
                true
            }
            None => false,
        }
    }

    /// Remove the record with the ID `key`, returning it if it was cached.
    pub fn remove(&mut self, key: DatabaseId) -> Option<T> {
        let index = self.items.iter().position(|item| item.key() == key)?;

        Some(self.items.remove(index))
    }

    /// Keep only the records for which `predicate` returns `true`.
    pub fn retain(&mut self, predicate: impl FnMut(&T) -> bool) {
        self.items.retain(predicate);
    }

    /// The number of cached records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list has no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The client's copy of the categories.
#[derive(Debug, Clone)]
pub struct CategoryCache<C> {
    store: C,
    categories: CachedList<Category>,
}

impl<C: CategoryStore> CategoryCache<C> {
    /// The name shown for a category ID that is not in the cache.
    pub const UNKNOWN_NAME: &'static str = "Unknown";

    /// Create an empty cache over `store`. Call [CategoryCache::load] to fill it.
    pub fn new(store: C) -> Self {
        Self {
            store,
            categories: CachedList::new(),
        }
    }

    /// Replace the cached categories with those in the store.
    ///
    /// # Errors
    /// Returns the store's error, the cache is unchanged.
    pub fn load(&mut self) -> Result<&[Category], Error> {
        let categories = self
            .store
            .list()
            .inspect_err(|error| log_failure("load categories", error))?;

        self.categories.replace_all(categories);

        Ok(self.categories.items())
    }

    /// The cached categories.
    pub fn categories(&self) -> &[Category] {
        self.categories.items()
    }

    /// The cached category with `id`.
    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(id)
    }

    /// The name of the cached category with `id`, or [CategoryCache::UNKNOWN_NAME].
    pub fn name_of(&self, id: CategoryId) -> &str {
        self.get(id)
            .map(|category| category.name.as_ref())
            .unwrap_or(Self::UNKNOWN_NAME)
    }

    /// Validate and create a category, then add it to the front of the cache.
    ///
    /// # Errors
    /// Returns a validation error or the store's error, the cache is unchanged.
    pub fn add(&mut self, candidate: &CategoryCandidate) -> Result<Category, Error> {
        let category = parse_new_category(candidate)
            .map_err(Error::from)
            .and_then(|new_category| self.store.create(new_category))
            .inspect_err(|error| log_failure("add category", error))?;

        self.categories.insert(category.clone());

        Ok(category)
    }

    /// Validate and apply a partial update, then replace the cached category.
    ///
    /// A category that is not cached is left out of the cache.
    ///
    /// # Errors
    /// Returns a validation error or the store's error, the cache is unchanged.
    pub fn update(
        &mut self,
        id: CategoryId,
        candidate: &CategoryCandidate,
    ) -> Result<Category, Error> {
        let category = parse_category_update(candidate)
            .map_err(Error::from)
            .and_then(|update| self.store.update(id, update))
            .inspect_err(|error| log_failure("update category", error))?;

        self.categories.replace(category.clone());

        Ok(category)
    }

    /// Delete a category in the store and drop it from the cache.
    ///
    /// # Errors
    /// Returns the store's error, the cache is unchanged.
    pub fn remove(&mut self, id: CategoryId) -> Result<(), Error> {
        self.store
            .delete(id)
            .inspect_err(|error| log_failure("remove category", error))?;

        self.categories.remove(id);

        Ok(())
    }

    /// Delete several categories in the store and drop them from the cache.
    ///
    /// IDs the store did not know about are dropped from the cache as well.
    ///
    /// # Errors
    /// Returns a validation error if `ids` is empty, or the store's error. The
    /// cache is unchanged in both cases, even though the store may have
    /// deleted some categories before failing; call [CategoryCache::load] to
    /// resynchronise.
    pub fn remove_batch(&mut self, ids: &[CategoryId]) -> Result<BatchDeletion, Error> {
        let deletion = check_batch_ids(ids)
            .map_err(Error::from)
            .and_then(|()| self.store.delete_batch(ids))
            .inspect_err(|error| log_failure("remove categories", error))?;

        self.categories.retain(|category| !ids.contains(&category.id));

        Ok(deletion)
    }
}

/// The client's copy of a list of transactions.
#[derive(Debug, Clone)]
pub struct TransactionCache<T> {
    store: T,
    transactions: CachedList<TransactionWithCategory>,
}

impl<T: TransactionStore> TransactionCache<T> {
    /// Create an empty cache over `store`. Call [TransactionCache::load] to fill it.
    pub fn new(store: T) -> Self {
        Self {
            store,
            transactions: CachedList::new(),
        }
    }

    /// Replace the cached transactions with those in the store that match `filter`.
    ///
    /// # Errors
    /// Returns the store's error, the cache is unchanged.
    pub fn load(&mut self, filter: &TransactionFilter) -> Result<&[TransactionWithCategory], Error> {
        let transactions = self
            .store
            .list(filter)
            .inspect_err(|error| log_failure("load transactions", error))?;

        self.transactions.replace_all(transactions);

        Ok(self.transactions.items())
    }

    /// The cached transactions.
    pub fn transactions(&self) -> &[TransactionWithCategory] {
        self.transactions.items()
    }

    /// The cached transaction with `id`.
    pub fn get(&self, id: TransactionId) -> Option<&TransactionWithCategory> {
        self.transactions.get(id)
    }

    /// Validate and create a transaction, then add it to the front of the cache.
    ///
    /// A missing date defaults to now.
    ///
    /// # Errors
    /// Returns a validation error or the store's error, the cache is unchanged.
    pub fn add(&mut self, candidate: &TransactionCandidate) -> Result<TransactionWithCategory, Error> {
        let candidate = candidate
            .clone()
            .with_default_date(OffsetDateTime::now_utc());

        let transaction = parse_new_transaction(&candidate)
            .map_err(Error::from)
            .and_then(|builder| self.store.create(builder))
            .inspect_err(|error| log_failure("add transaction", error))?;

        self.transactions.insert(transaction.clone());

        Ok(transaction)
    }

    /// Validate and apply an update, then replace the cached transaction in place.
    ///
    /// A transaction that is not cached, e.g. one outside the loaded filter,
    /// is left out of the cache.
    ///
    /// # Errors
    /// Returns a validation error or the store's error, the cache is unchanged.
    pub fn update(
        &mut self,
        id: TransactionId,
        candidate: &TransactionCandidate,
    ) -> Result<TransactionWithCategory, Error> {
        let transaction = parse_transaction_update(candidate)
            .map_err(Error::from)
            .and_then(|update| self.store.update(id, update))
            .inspect_err(|error| log_failure("update transaction", error))?;

        self.transactions.replace(transaction.clone());

        Ok(transaction)
    }

    /// Delete a transaction in the store and drop it from the cache.
    ///
    /// # Errors
    /// Returns the store's error, the cache is unchanged.
    pub fn remove(&mut self, id: TransactionId) -> Result<(), Error> {
        self.store
            .delete(id)
            .inspect_err(|error| log_failure("remove transaction", error))?;

        self.transactions.remove(id);

        Ok(())
    }

    /// Drop the cached transactions of a category that has been deleted.
    ///
    /// This only touches the cache, the store deletes them together with the category.
    pub fn forget_category(&mut self, category_id: CategoryId) {
        self.transactions
            .retain(|transaction| transaction.transaction.category_id != category_id);
    }

    /// Swap in the current state of `category` for every cached transaction in it.
    pub fn refresh_category(&mut self, category: &Category) {
        for transaction in self.transactions.items.iter_mut() {
            if transaction.transaction.category_id == category.id {
                transaction.category = category.clone();
            }
        }
    }
}

/// The caches for both categories and transactions, kept consistent with each other.
#[derive(Debug, Clone)]
pub struct Ledger<C, T> {
    /// The cached categories.
    pub categories: CategoryCache<C>,
    /// The cached transactions.
    pub transactions: TransactionCache<T>,
}

impl<C: CategoryStore, T: TransactionStore> Ledger<C, T> {
    /// Create empty caches over the stores.
    pub fn new(category_store: C, transaction_store: T) -> Self {
        Self {
            categories: CategoryCache::new(category_store),
            transactions: TransactionCache::new(transaction_store),
        }
    }

    /// Load all categories and the transactions matching `filter`.
    ///
    /// # Errors
    /// Returns the first store error. The categories may already have been
    /// reloaded when loading the transactions fails.
    pub fn load(&mut self, filter: &TransactionFilter) -> Result<(), Error> {
        self.categories.load()?;
        self.transactions.load(filter)?;

        Ok(())
    }

    /// Update a category and the copies of it embedded in cached transactions.
    ///
    /// # Errors
    /// Returns a validation error or the store's error, both caches are unchanged.
    pub fn update_category(
        &mut self,
        id: CategoryId,
        candidate: &CategoryCandidate,
    ) -> Result<Category, Error> {
        let category = self.categories.update(id, candidate)?;
        self.transactions.refresh_category(&category);

        Ok(category)
    }

    /// Delete a category and drop it and its transactions from the caches.
    ///
    /// # Errors
    /// Returns the store's error, both caches are unchanged.
    pub fn remove_category(&mut self, id: CategoryId) -> Result<(), Error> {
        self.categories.remove(id)?;
        self.transactions.forget_category(id);

        Ok(())
    }

    /// Delete several categories and drop them and their transactions from the caches.
    ///
    /// # Errors
    /// Returns a validation error or the store's error, both caches are unchanged.
    pub fn remove_categories(&mut self, ids: &[CategoryId]) -> Result<BatchDeletion, Error> {
        let deletion = self.categories.remove_batch(ids)?;

        for &id in &deletion.deleted {
            self.transactions.forget_category(id);
        }

        Ok(deletion)
    }
}

fn log_failure(action: &str, error: &impl Display) {
    tracing::error!("could not {action}: {error}");
}

#[cfg(test)]
mod cached_list_tests {
    use crate::{
        category::{Category, CategoryColor, CategoryName},
        reconcile::CachedList,
    };

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: CategoryName::new_unchecked(name),
            color: CategoryColor::default(),
        }
    }

    #[test]
    fn insert_adds_to_front() {
        let mut list = CachedList::new();

        list.insert(category(1, "Food"));
        list.insert(category(2, "Rent"));

        assert_eq!(list.items(), &[category(2, "Rent"), category(1, "Food")]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut list = CachedList::new();
        list.replace_all(vec![category(1, "Food"), category(2, "Rent"), category(3, "Fun")]);

        let replaced = list.replace(category(2, "Housing"));

        assert!(replaced);
        assert_eq!(
            list.items(),
            &[category(1, "Food"), category(2, "Housing"), category(3, "Fun")]
        );
    }

    #[test]
    fn replace_missing_changes_nothing() {
        let mut list = CachedList::new();
        list.replace_all(vec![category(1, "Food")]);

        assert!(!list.replace(category(2, "Rent")));
        assert_eq!(list.items(), &[category(1, "Food")]);
    }

    #[test]
    fn remove_by_key() {
        let mut list = CachedList::new();
        list.replace_all(vec![category(1, "Food"), category(2, "Rent")]);

        assert_eq!(list.remove(1), Some(category(1, "Food")));
        assert_eq!(list.remove(1), None);
        assert_eq!(list.len(), 1);
        assert!(!list.is_empty());
    }
}


#[cfg(test)]
mod transaction_cache_tests {
    use serde_json::json;

    use crate::{
        Error,
        filter::TransactionFilter,
        reconcile::TransactionCache,
        test_utils::{FailingStore, create_test_category, create_test_transaction, get_test_stores},
        transaction::TransactionStore,
        validation::{TransactionCandidate, ValidationError},
    };

    fn candidate(amount: f64, category_id: i64, description: &str) -> TransactionCandidate {
        TransactionCandidate {
            amount: Some(json!(amount)),
            category_id: Some(json!(category_id)),
            description: Some(description.to_owned()),
            date: None,
        }
    }

    #[test]
    fn add_inserts_at_front() {
        let (categories, store) = get_test_stores();
        let food = create_test_category(&categories, "Food");
        create_test_transaction(&store, food.id, 4.5, "Coffee");
        let mut cache = TransactionCache::new(store);
        cache.load(&TransactionFilter::default()).unwrap();

        let lunch = cache.add(&candidate(12.5, food.id, "Lunch")).unwrap();

        assert_eq!(cache.transactions().len(), 2);
        assert_eq!(cache.transactions()[0], lunch);
        assert_eq!(lunch.category, food);
    }

    #[test]
    fn non_positive_amount_changes_nothing() {
        let (categories, store) = get_test_stores();
        let food = create_test_category(&categories, "Food");
        let coffee = create_test_transaction(&store, food.id, 4.5, "Coffee");
        let mut cache = TransactionCache::new(store.clone());
        cache.load(&TransactionFilter::default()).unwrap();

        let add = cache.add(&candidate(0.0, food.id, "Lunch"));
        let update = cache.update(coffee.transaction.id, &candidate(-1.0, food.id, "Coffee"));

        assert_eq!(add, Err(Error::Validation(ValidationError::NonPositiveAmount)));
        assert_eq!(update, Err(Error::Validation(ValidationError::NonPositiveAmount)));
        assert_eq!(cache.transactions(), &[coffee.clone()]);
        assert_eq!(store.list(&TransactionFilter::default()).unwrap(), vec![coffee]);
    }

    #[test]
    fn update_replaces_in_place() {
        let (categories, store) = get_test_stores();
        let food = create_test_category(&categories, "Food");
        let first = create_test_transaction(&store, food.id, 1.0, "First");
        let second = create_test_transaction(&store, food.id, 2.0, "Second");
        let mut cache = TransactionCache::new(store);
        cache.load(&TransactionFilter::default()).unwrap();
        let position = cache
            .transactions()
            .iter()
            .position(|transaction| transaction == &first)
            .unwrap();

        let updated = cache
            .update(first.transaction.id, &candidate(10.0, food.id, "First, edited"))
            .unwrap();

        assert_eq!(cache.transactions()[position], updated);
        assert_eq!(cache.get(second.transaction.id), Some(&second));
    }

    #[test]
    fn update_outside_loaded_filter_leaves_cache_unchanged() {
        let (categories, store) = get_test_stores();
        let food = create_test_category(&categories, "Food");
        let rent = create_test_category(&categories, "Rent");
        let lunch = create_test_transaction(&store, food.id, 12.5, "Lunch");
        let bond = create_test_transaction(&store, rent.id, 800.0, "Bond");
        let mut cache = TransactionCache::new(store);
        cache
            .load(&TransactionFilter {
                category_id: Some(food.id),
                ..Default::default()
            })
            .unwrap();

        let updated = cache
            .update(bond.transaction.id, &candidate(900.0, rent.id, "Bond"))
            .unwrap();

        assert_eq!(updated.transaction.amount, 900.0);
        assert_eq!(cache.transactions(), &[lunch]);
    }

    #[test]
    fn remove_twice_fails_the_second_time() {
        let (categories, store) = get_test_stores();
        let food = create_test_category(&categories, "Food");
        let coffee = create_test_transaction(&store, food.id, 4.5, "Coffee");
        let mut cache = TransactionCache::new(store);
        cache.load(&TransactionFilter::default()).unwrap();

        assert_eq!(cache.remove(coffee.transaction.id), Ok(()));
        assert_eq!(
            cache.remove(coffee.transaction.id),
            Err(Error::DeleteMissingTransaction)
        );
        assert!(cache.transactions().is_empty());
    }

    #[test]
    fn store_failure_leaves_cache_unchanged() {
        let mut cache = TransactionCache::new(FailingStore);

        assert_eq!(
            cache.load(&TransactionFilter::default()).map(|_| ()),
            Err(Error::DatabaseLockError)
        );
        assert_eq!(
            cache.add(&candidate(1.0, 1, "Lunch")),
            Err(Error::DatabaseLockError)
        );
        assert_eq!(cache.remove(1), Err(Error::DatabaseLockError));
        assert!(cache.transactions().is_empty());
    }
}
