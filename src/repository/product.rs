use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::category::Category as DomainCategory;
use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};
use crate::domain::tag::Tag as DomainTag;
use crate::models::category::Category as DbCategory;
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
};
use crate::domain::product_tag::NewProductTag as DomainNewProductTag;
use crate::models::product_tag::{
    NewProductTag as DbNewProductTag, ProductTag as DbProductTag,
};
use crate::models::tag::Tag as DbTag;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ProductReader, ProductWriter};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        match product {
            Some(db_product) => Ok(Some(with_associations(&mut conn, db_product)?)),
            None => Ok(None),
        }
    }

    fn list_products(&self) -> RepositoryResult<Vec<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_products = products::table
            .order(products::id.asc())
            .load::<DbProduct>(&mut conn)?;

        if db_products.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<i32> = db_products.iter().map(|product| product.id).collect();
        let mut tag_map = load_tags_for_products(&mut conn, &product_ids)?;
        let category_map = load_categories(&mut conn, &db_products)?;

        let mut domain_products = Vec::with_capacity(db_products.len());
        for db_product in db_products {
            let mut domain: DomainProduct = db_product.into();
            domain.tags = tag_map.remove(&domain.id).unwrap_or_default();
            domain.category = domain
                .category_id
                .and_then(|category_id| category_map.get(&category_id).cloned());
            domain_products.push(domain);
        }

        Ok(domain_products)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_new = DbNewProduct::from(new_product);

        let created = diesel::insert_into(products::table)
            .values(&db_new)
            .get_result::<DbProduct>(&mut conn)?;

        with_associations(&mut conn, created)
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateProduct::from(updates);

        let target = products::table.filter(products::id.eq(product_id));
        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbProduct>(&mut conn)?;

        with_associations(&mut conn, updated)
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let target = products::table.filter(products::id.eq(product_id));
        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn replace_product_tags(&self, product_id: i32, tag_ids: &[i32]) -> RepositoryResult<()> {
        use crate::schema::product_tags;

        let mut conn = self.conn()?;
        conn.transaction::<(), RepositoryError, _>(|conn| {
            diesel::delete(product_tags::table.filter(product_tags::product_id.eq(product_id)))
                .execute(conn)?;

            if tag_ids.is_empty() {
                return Ok(());
            }

            let new_links: Vec<DomainNewProductTag> = tag_ids
                .iter()
                .map(|&tag_id| DomainNewProductTag::new(product_id, tag_id))
                .collect();
            let rows: Vec<DbNewProductTag> = new_links.iter().map(DbNewProductTag::from).collect();

            diesel::insert_into(product_tags::table)
                .values(&rows)
                .execute(conn)?;

            Ok(())
        })
    }
}

/// Attach the eager-loaded category and tag set to a single product row.
fn with_associations(
    conn: &mut SqliteConnection,
    db_product: DbProduct,
) -> RepositoryResult<DomainProduct> {
    let mut tag_map = load_tags_for_products(conn, &[db_product.id])?;
    let category_map = load_categories(conn, std::slice::from_ref(&db_product))?;

    let mut domain: DomainProduct = db_product.into();
    domain.tags = tag_map.remove(&domain.id).unwrap_or_default();
    domain.category = domain
        .category_id
        .and_then(|category_id| category_map.get(&category_id).cloned());

    Ok(domain)
}

/// Load the tags attached to each of `product_ids` with a single query.
fn load_tags_for_products(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainTag>>> {
    use crate::schema::{product_tags, tags};

    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = product_tags::table
        .inner_join(tags::table)
        .filter(product_tags::product_id.eq_any(product_ids))
        .order(tags::name.asc())
        .select((DbProductTag::as_select(), DbTag::as_select()))
        .load::<(DbProductTag, DbTag)>(conn)?;

    let mut map: HashMap<i32, Vec<DomainTag>> = HashMap::new();
    for (link, tag) in rows {
        map.entry(link.product_id).or_default().push(tag.into());
    }

    Ok(map)
}

/// Load the categories referenced by the given product rows, keyed by id.
fn load_categories(
    conn: &mut SqliteConnection,
    db_products: &[DbProduct],
) -> RepositoryResult<HashMap<i32, DomainCategory>> {
    use crate::schema::categories;

    let category_ids: Vec<i32> = db_products
        .iter()
        .filter_map(|product| product.category_id)
        .collect();

    if category_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = categories::table
        .filter(categories::id.eq_any(category_ids))
        .load::<DbCategory>(conn)?;

    Ok(rows
        .into_iter()
        .map(|category| (category.id, category.into()))
        .collect())
}
