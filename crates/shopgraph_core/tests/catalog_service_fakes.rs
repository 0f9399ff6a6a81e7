//! Exercises `CatalogService` against in-memory repositories, with no SQLite.

use shopgraph_core::{
    CatalogError, CatalogService, Category, CategoryId, CategoryRepository, CreateCategoryInput,
    CreateProductInput, CreateUserInput, EntityKind, Product, ProductId, ProductRepository,
    RepoError, RepoResult, User, UserId, UserRepository,
};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Minimal id-keyed table shared by the fake repositories.
struct MemTable<T> {
    rows: RefCell<BTreeMap<i64, T>>,
    next_id: Cell<i64>,
    entity: EntityKind,
}

impl<T: Clone> MemTable<T> {
    fn new(entity: EntityKind) -> Self {
        Self {
            rows: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
            entity,
        }
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.borrow().get(&id).cloned()
    }

    fn all(&self) -> Vec<T> {
        self.rows.borrow().values().cloned().collect()
    }

    fn contains(&self, id: i64) -> bool {
        self.rows.borrow().contains_key(&id)
    }

    fn remove(&self, id: i64) -> RepoResult<()> {
        self.rows
            .borrow_mut()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound {
                entity: self.entity,
                id,
            })
    }

    /// Assigns an id when missing and stores the row.
    fn upsert(&self, id: Option<i64>, build: impl FnOnce(i64) -> T) -> RepoResult<T> {
        let id = match id {
            Some(id) if !self.contains(id) => {
                return Err(RepoError::NotFound {
                    entity: self.entity,
                    id,
                })
            }
            Some(id) => id,
            None => {
                let id = self.next_id.get();
                self.next_id.set(id + 1);
                id
            }
        };
        let row = build(id);
        self.rows.borrow_mut().insert(id, row.clone());
        Ok(row)
    }
}

struct FakeUsers(MemTable<User>);
struct FakeCategories(MemTable<Category>);
struct FakeProducts(MemTable<Product>);

impl UserRepository for FakeUsers {
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.0.get(id))
    }
    fn find_all(&self) -> RepoResult<Vec<User>> {
        Ok(self.0.all())
    }
    fn exists_by_id(&self, id: UserId) -> RepoResult<bool> {
        Ok(self.0.contains(id))
    }
    fn delete_by_id(&self, id: UserId) -> RepoResult<()> {
        self.0.remove(id)
    }
    fn save(&self, user: &User) -> RepoResult<User> {
        self.0.upsert(user.id, |id| User {
            id: Some(id),
            ..user.clone()
        })
    }
}

impl CategoryRepository for FakeCategories {
    fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        Ok(self.0.get(id))
    }
    fn find_all(&self) -> RepoResult<Vec<Category>> {
        Ok(self.0.all())
    }
    fn exists_by_id(&self, id: CategoryId) -> RepoResult<bool> {
        Ok(self.0.contains(id))
    }
    fn delete_by_id(&self, id: CategoryId) -> RepoResult<()> {
        self.0.remove(id)
    }
    fn save(&self, category: &Category) -> RepoResult<Category> {
        self.0.upsert(category.id, |id| Category {
            id: Some(id),
            ..category.clone()
        })
    }
}

impl ProductRepository for FakeProducts {
    fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>> {
        Ok(self.0.get(id))
    }
    fn find_all(&self) -> RepoResult<Vec<Product>> {
        Ok(self.0.all())
    }
    fn exists_by_id(&self, id: ProductId) -> RepoResult<bool> {
        Ok(self.0.contains(id))
    }
    fn delete_by_id(&self, id: ProductId) -> RepoResult<()> {
        self.0.remove(id)
    }
    fn save(&self, product: &Product) -> RepoResult<Product> {
        self.0.upsert(product.id, |id| Product {
            id: Some(id),
            ..product.clone()
        })
    }
    fn find_all_by_order_by_price_asc(&self) -> RepoResult<Vec<Product>> {
        let mut products = self.0.all();
        products.sort_by(|a, b| a.price.total_cmp(&b.price).then(a.id.cmp(&b.id)));
        Ok(products)
    }
    fn find_by_category_id(&self, category_id: CategoryId) -> RepoResult<Vec<Product>> {
        Ok(self
            .0
            .all()
            .into_iter()
            .filter(|product| product.category_ids().contains(&category_id))
            .collect())
    }
    fn find_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<Product>> {
        Ok(self
            .0
            .all()
            .into_iter()
            .filter(|product| product.user_id() == Some(user_id))
            .collect())
    }
}

type FakeCatalog = CatalogService<FakeUsers, FakeCategories, FakeProducts>;

fn catalog() -> FakeCatalog {
    CatalogService::new(
        FakeUsers(MemTable::new(EntityKind::User)),
        FakeCategories(MemTable::new(EntityKind::Category)),
        FakeProducts(MemTable::new(EntityKind::Product)),
    )
}

fn user_input(fullname: &str) -> CreateUserInput {
    CreateUserInput {
        fullname: fullname.to_string(),
        email: "owner@example.com".to_string(),
        password: "pw".to_string(),
        phone: "0123".to_string(),
    }
}

fn category(catalog: &FakeCatalog, name: &str) -> CategoryId {
    catalog
        .create_category(&CreateCategoryInput {
            name: name.to_string(),
            images: Vec::new(),
        })
        .unwrap()
        .id
        .unwrap()
}

fn product_input(title: &str, price: f64) -> CreateProductInput {
    CreateProductInput {
        title: title.to_string(),
        quantity: 1,
        desc: String::new(),
        price,
        user_id: None,
        category_ids: None,
    }
}

#[test]
fn create_product_without_category_list_has_empty_set() {
    let catalog = catalog();
    let product = catalog.create_product(&product_input("Plain", 3.0)).unwrap();
    assert!(product.categories.is_empty());
    assert!(product.user.is_none());
}

#[test]
fn create_product_deduplicates_and_drops_unknown_category_ids() {
    let catalog = catalog();
    let tools = category(&catalog, "Tools");
    let paint = category(&catalog, "Paint");

    let product = catalog
        .create_product(&CreateProductInput {
            category_ids: Some(vec![paint, 99, tools, paint]),
            ..product_input("Brush", 2.0)
        })
        .unwrap();

    let ids: Vec<_> = product.categories.iter().map(|c| c.id.unwrap()).collect();
    assert_eq!(ids, vec![tools, paint]);
}

#[test]
fn update_product_with_missing_category_list_clears_categories() {
    let catalog = catalog();
    let tools = category(&catalog, "Tools");
    let product = catalog
        .create_product(&CreateProductInput {
            category_ids: Some(vec![tools]),
            ..product_input("Hammer", 10.0)
        })
        .unwrap();

    let updated = catalog
        .update_product(product.id.unwrap(), &product_input("Hammer", 11.0))
        .unwrap();
    assert!(updated.categories.is_empty());
    assert!(catalog.products_by_category(tools).unwrap().is_empty());
}

#[test]
fn update_product_switches_to_resolvable_owner() {
    let catalog = catalog();
    let first = catalog.create_user(&user_input("First")).unwrap();
    let second = catalog.create_user(&user_input("Second")).unwrap();
    let product = catalog
        .create_product(&CreateProductInput {
            user_id: first.id,
            ..product_input("Bike", 300.0)
        })
        .unwrap();

    let updated = catalog
        .update_product(
            product.id.unwrap(),
            &CreateProductInput {
                user_id: second.id,
                ..product_input("Bike", 280.0)
            },
        )
        .unwrap();
    assert_eq!(updated.user_id(), second.id);
    assert_eq!(catalog.products_by_user(second.id.unwrap()).unwrap().len(), 1);
    assert!(catalog
        .products_by_user(first.id.unwrap())
        .unwrap()
        .is_empty());
}

#[test]
fn update_on_missing_product_is_not_found() {
    let catalog = catalog();
    let err = catalog
        .update_product(5, &product_input("Nothing", 1.0))
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::NotFound {
            entity: EntityKind::Product,
            id: 5
        }
    ));
    assert!(catalog.products_sorted_by_price_asc().unwrap().is_empty());
}

#[test]
fn deletes_report_existence_without_erroring() {
    let catalog = catalog();
    let user = catalog.create_user(&user_input("Gone")).unwrap();
    let user_id = user.id.unwrap();
    let category_id = category(&catalog, "Gone");

    assert!(catalog.delete_user(user_id).unwrap());
    assert!(!catalog.delete_user(user_id).unwrap());
    assert!(catalog.delete_category(category_id).unwrap());
    assert!(!catalog.delete_category(category_id).unwrap());
    assert!(!catalog.delete_product(1).unwrap());
}

#[test]
fn queries_pass_through_repository_ordering() {
    let catalog = catalog();
    catalog.create_product(&product_input("B", 5.0)).unwrap();
    catalog.create_product(&product_input("A", 2.0)).unwrap();
    catalog.create_user(&user_input("U1")).unwrap();
    category(&catalog, "C1");

    let titles: Vec<_> = catalog
        .products_sorted_by_price_asc()
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["A", "B"]);
    assert_eq!(catalog.users().unwrap().len(), 1);
    assert_eq!(catalog.categories().unwrap().len(), 1);
}
