//! Query and mutation roots.

use crate::error::{graphql_error, not_found};
use crate::types::{
    parse_id, store, CategoryInputObject, CategoryNode, ProductInputObject, ProductNode,
    UserInputObject, UserNode,
};
use async_graphql::{Context, EmptySubscription, Object, Result, Schema, ID};
use log::debug;
use shopgraph_core::{
    CreateCategoryInput, CreateProductInput, CreateUserInput, EntityKind, RepoResult,
    SqliteCatalogService, Store,
};
use std::sync::Arc;

pub type CatalogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the executable schema over a shared store.
pub fn build_schema(store: Arc<Store>) -> CatalogSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .finish()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Every product, cheapest first.
    async fn products_sorted_by_price_asc(&self, ctx: &Context<'_>) -> Result<Vec<ProductNode>> {
        let products = store(ctx)?
            .read(|catalog| catalog.products_sorted_by_price_asc())
            .map_err(graphql_error)?;
        Ok(products.into_iter().map(ProductNode).collect())
    }

    /// Products in one category; empty for unknown or malformed ids.
    async fn products_by_category(
        &self,
        ctx: &Context<'_>,
        category_id: ID,
    ) -> Result<Vec<ProductNode>> {
        let Some(category_id) = parse_id(&category_id) else {
            return Ok(Vec::new());
        };
        let products = store(ctx)?
            .read(|catalog| catalog.products_by_category(category_id))
            .map_err(graphql_error)?;
        Ok(products.into_iter().map(ProductNode).collect())
    }

    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<UserNode>> {
        let users = store(ctx)?
            .read(|catalog| catalog.users())
            .map_err(graphql_error)?;
        Ok(users.into_iter().map(UserNode).collect())
    }

    async fn categories(&self, ctx: &Context<'_>) -> Result<Vec<CategoryNode>> {
        let categories = store(ctx)?
            .read(|catalog| catalog.categories())
            .map_err(graphql_error)?;
        Ok(categories.into_iter().map(CategoryNode).collect())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_user(&self, ctx: &Context<'_>, input: UserInputObject) -> Result<UserNode> {
        let input = CreateUserInput::from(input);
        let user = store(ctx)?
            .write("create_user", |catalog| catalog.create_user(&input))
            .map_err(graphql_error)?;
        Ok(UserNode(user))
    }

    async fn create_category(
        &self,
        ctx: &Context<'_>,
        input: CategoryInputObject,
    ) -> Result<CategoryNode> {
        let input = CreateCategoryInput::from(input);
        let category = store(ctx)?
            .write("create_category", |catalog| catalog.create_category(&input))
            .map_err(graphql_error)?;
        Ok(CategoryNode(category))
    }

    async fn create_product(
        &self,
        ctx: &Context<'_>,
        input: ProductInputObject,
    ) -> Result<ProductNode> {
        let input = CreateProductInput::from(input);
        let product = store(ctx)?
            .write("create_product", |catalog| catalog.create_product(&input))
            .map_err(graphql_error)?;
        Ok(ProductNode(product))
    }

    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UserInputObject,
    ) -> Result<UserNode> {
        let user_id = parse_id(&id).ok_or_else(|| not_found(EntityKind::User, id.as_str()))?;
        let input = CreateUserInput::from(input);
        let user = store(ctx)?
            .write("update_user", |catalog| catalog.update_user(user_id, &input))
            .map_err(graphql_error)?;
        Ok(UserNode(user))
    }

    async fn update_category(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: CategoryInputObject,
    ) -> Result<CategoryNode> {
        let category_id =
            parse_id(&id).ok_or_else(|| not_found(EntityKind::Category, id.as_str()))?;
        let input = CreateCategoryInput::from(input);
        let category = store(ctx)?
            .write("update_category", |catalog| {
                catalog.update_category(category_id, &input)
            })
            .map_err(graphql_error)?;
        Ok(CategoryNode(category))
    }

    async fn update_product(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: ProductInputObject,
    ) -> Result<ProductNode> {
        let product_id =
            parse_id(&id).ok_or_else(|| not_found(EntityKind::Product, id.as_str()))?;
        let input = CreateProductInput::from(input);
        let product = store(ctx)?
            .write("update_product", |catalog| {
                catalog.update_product(product_id, &input)
            })
            .map_err(graphql_error)?;
        Ok(ProductNode(product))
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        delete(ctx, &id, "delete_user", |catalog, id| catalog.delete_user(id))
    }

    async fn delete_category(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        delete(ctx, &id, "delete_category", |catalog, id| catalog.delete_category(id))
    }

    async fn delete_product(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        delete(ctx, &id, "delete_product", |catalog, id| catalog.delete_product(id))
    }
}

/// Shared delete path: malformed ids are simply absent rows.
fn delete(
    ctx: &Context<'_>,
    id: &ID,
    op: &'static str,
    run: impl FnOnce(&SqliteCatalogService<'_>, i64) -> RepoResult<bool>,
) -> Result<bool> {
    let Some(id) = parse_id(id) else {
        debug!("event=delete_skipped module=api op={op} reason=malformed_id");
        return Ok(false);
    };
    store(ctx)?
        .write(op, |catalog| run(catalog, id))
        .map_err(graphql_error)
}
