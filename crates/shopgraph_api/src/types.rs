//! GraphQL object and input types.

use crate::error::graphql_error;
use async_graphql::{Context, Error, InputObject, Object, Result, ID};
use shopgraph_core::{
    Category, CreateCategoryInput, CreateProductInput, CreateUserInput, EntityKind, Product,
    Store, User,
};
use std::sync::Arc;

/// Parses a wire id; `None` for anything that is not an integer.
pub(crate) fn parse_id(id: &ID) -> Option<i64> {
    id.trim().parse().ok()
}

fn wire_id(entity: EntityKind, id: Option<i64>) -> Result<ID> {
    id.map(ID::from)
        .ok_or_else(|| Error::new(format!("{entity} has not been saved")))
}

pub(crate) fn store<'ctx>(ctx: &Context<'ctx>) -> Result<&'ctx Arc<Store>> {
    ctx.data::<Arc<Store>>()
}

pub struct UserNode(pub User);

#[Object(name = "User")]
impl UserNode {
    async fn id(&self) -> Result<ID> {
        wire_id(EntityKind::User, self.0.id)
    }

    async fn fullname(&self) -> &str {
        &self.0.fullname
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn phone(&self) -> &str {
        &self.0.phone
    }

    /// Products owned by this user.
    async fn products(&self, ctx: &Context<'_>) -> Result<Vec<ProductNode>> {
        let Some(user_id) = self.0.id else {
            return Ok(Vec::new());
        };
        let products = store(ctx)?
            .read(|catalog| catalog.products_by_user(user_id))
            .map_err(graphql_error)?;
        Ok(products.into_iter().map(ProductNode).collect())
    }
}

pub struct CategoryNode(pub Category);

#[Object(name = "Category")]
impl CategoryNode {
    async fn id(&self) -> Result<ID> {
        wire_id(EntityKind::Category, self.0.id)
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn images(&self) -> &[String] {
        &self.0.images
    }
}

pub struct ProductNode(pub Product);

#[Object(name = "Product")]
impl ProductNode {
    async fn id(&self) -> Result<ID> {
        wire_id(EntityKind::Product, self.0.id)
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn quantity(&self) -> i32 {
        self.0.quantity
    }

    #[graphql(name = "desc")]
    async fn description(&self) -> &str {
        &self.0.description
    }

    async fn price(&self) -> f64 {
        self.0.price
    }

    async fn user(&self) -> Option<UserNode> {
        self.0.user.clone().map(UserNode)
    }

    async fn categories(&self) -> Vec<CategoryNode> {
        self.0.categories.iter().cloned().map(CategoryNode).collect()
    }
}

#[derive(Debug, Clone, InputObject)]
#[graphql(name = "CreateUserInput")]
pub struct UserInputObject {
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

impl From<UserInputObject> for CreateUserInput {
    fn from(value: UserInputObject) -> Self {
        Self {
            fullname: value.fullname,
            email: value.email,
            password: value.password,
            phone: value.phone,
        }
    }
}

#[derive(Debug, Clone, InputObject)]
#[graphql(name = "CreateCategoryInput")]
pub struct CategoryInputObject {
    pub name: String,
    #[graphql(default)]
    pub images: Vec<String>,
}

impl From<CategoryInputObject> for CreateCategoryInput {
    fn from(value: CategoryInputObject) -> Self {
        Self {
            name: value.name,
            images: value.images,
        }
    }
}

#[derive(Debug, Clone, InputObject)]
#[graphql(name = "CreateProductInput")]
pub struct ProductInputObject {
    pub title: String,
    pub quantity: i32,
    pub desc: String,
    pub price: f64,
    pub user_id: Option<ID>,
    pub category_ids: Option<Vec<ID>>,
}

impl From<ProductInputObject> for CreateProductInput {
    /// Non-integer ids are dropped here, the same way unknown ids are
    /// dropped during resolution.
    fn from(value: ProductInputObject) -> Self {
        Self {
            title: value.title,
            quantity: value.quantity,
            desc: value.desc,
            price: value.price,
            user_id: value.user_id.as_ref().and_then(parse_id),
            category_ids: value
                .category_ids
                .map(|ids| ids.iter().filter_map(parse_id).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_id, ProductInputObject};
    use async_graphql::ID;
    use shopgraph_core::CreateProductInput;

    #[test]
    fn parse_id_accepts_integers_only() {
        assert_eq!(parse_id(&ID::from("42")), Some(42));
        assert_eq!(parse_id(&ID::from(" 7 ")), Some(7));
        assert_eq!(parse_id(&ID::from("abc")), None);
        assert_eq!(parse_id(&ID::from("")), None);
    }

    #[test]
    fn product_input_drops_malformed_ids_but_keeps_absence() {
        let input = ProductInputObject {
            title: "t".to_string(),
            quantity: 1,
            desc: "d".to_string(),
            price: 1.0,
            user_id: Some(ID::from("nope")),
            category_ids: Some(vec![ID::from("1"), ID::from("x"), ID::from("3")]),
        };
        let converted = CreateProductInput::from(input.clone());
        assert_eq!(converted.user_id, None);
        assert_eq!(converted.category_ids, Some(vec![1, 3]));

        let without_list = CreateProductInput::from(ProductInputObject {
            category_ids: None,
            ..input
        });
        assert_eq!(without_list.category_ids, None);
    }
}
