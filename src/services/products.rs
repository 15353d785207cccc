use crate::domain::product::Product;
use crate::forms::products::{CreateProductForm, UpdateProductForm};
use crate::repository::{ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};

/// Fetches all products with their category and tag associations.
pub fn list_products<R>(repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    repo.list_products().map_err(ServiceError::from)
}

/// Fetches a single product by id with its associations.
pub fn get_product<R>(repo: &R, product_id: i32) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    repo.get_product_by_id(product_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a product and attaches the requested tags.
///
/// If attaching tags fails the freshly created product is deleted again, so
/// a failed request does not leave a half-created product behind.
pub fn create_product<R>(repo: &R, form: CreateProductForm) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let payload = form
        .into_payload()
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let created = repo
        .create_product(&payload.product)
        .map_err(ServiceError::from)?;

    if payload.tag_ids.is_empty() {
        return Ok(created);
    }

    if let Err(err) = repo.replace_product_tags(created.id, &payload.tag_ids) {
        log::error!("Failed to attach tags to product {}: {err}", created.id);
        if let Err(delete_err) = repo.delete_product(created.id) {
            log::error!(
                "Failed to roll back product {} after tag error: {delete_err}",
                created.id
            );
        }
        return Err(ServiceError::from(err));
    }

    get_product(repo, created.id)
}

/// Applies an attribute patch and, when requested, replaces the tag set.
pub fn update_product<R>(
    repo: &R,
    product_id: i32,
    form: UpdateProductForm,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let patch = form
        .into_patch()
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let updated = repo
        .update_product(product_id, &patch.updates)
        .map_err(ServiceError::from)?;

    match patch.tag_ids {
        Some(tag_ids) => {
            repo.replace_product_tags(product_id, &tag_ids)
                .map_err(ServiceError::from)?;
            get_product(repo, product_id)
        }
        None => Ok(updated),
    }
}

/// Deletes a product; its join rows are removed by the database cascade.
pub fn delete_product<R>(repo: &R, product_id: i32) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    repo.delete_product(product_id).map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::product::{NewProduct, UpdateProduct};
    use crate::domain::tag::Tag;
    use crate::repository::RepositoryError;
    use crate::repository::errors::RepositoryResult;
    use crate::repository::mock::{MockProductReader, MockProductWriter};

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn sample_product(id: i32, name: &str, tags: Vec<Tag>) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: None,
            price_cents: 999,
            stock: 3,
            category_id: None,
            category: None,
            tags,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn sample_tag(id: i32, name: &str) -> Tag {
        Tag {
            id,
            name: name.to_string(),
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    struct FakeRepo {
        reader: MockProductReader,
        writer: MockProductWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                reader: MockProductReader::new(),
                writer: MockProductWriter::new(),
            }
        }
    }

    impl ProductReader for FakeRepo {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>> {
            self.reader.get_product_by_id(id)
        }

        fn list_products(&self) -> RepositoryResult<Vec<Product>> {
            self.reader.list_products()
        }
    }

    impl ProductWriter for FakeRepo {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product> {
            self.writer.create_product(new_product)
        }

        fn update_product(
            &self,
            product_id: i32,
            updates: &UpdateProduct,
        ) -> RepositoryResult<Product> {
            self.writer.update_product(product_id, updates)
        }

        fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
            self.writer.delete_product(product_id)
        }

        fn replace_product_tags(&self, product_id: i32, tag_ids: &[i32]) -> RepositoryResult<()> {
            self.writer.replace_product_tags(product_id, tag_ids)
        }
    }

    #[test]
    fn get_product_missing_row_is_not_found() {
        let mut repo = FakeRepo::new();
        repo.reader
            .expect_get_product_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let result = get_product(&repo, 42);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn create_product_without_tags_skips_reconciliation() {
        let mut repo = FakeRepo::new();

        repo.writer
            .expect_create_product()
            .times(1)
            .withf(|new_product| {
                assert_eq!(new_product.name, "Widget");
                assert_eq!(new_product.price_cents, 999);
                true
            })
            .returning(|_| Ok(sample_product(1, "Widget", Vec::new())));

        let form = CreateProductForm {
            name: "Widget".to_string(),
            description: None,
            price_cents: 999,
            stock: 3,
            category_id: None,
            tag_ids: Vec::new(),
        };

        let product = create_product(&repo, form).expect("expected success");
        assert_eq!(product.id, 1);
    }

    #[test]
    fn create_product_attaches_tags_and_refetches() {
        let mut repo = FakeRepo::new();

        repo.writer
            .expect_create_product()
            .times(1)
            .returning(|_| Ok(sample_product(7, "Widget", Vec::new())));

        repo.writer
            .expect_replace_product_tags()
            .times(1)
            .withf(|product_id, tag_ids| {
                assert_eq!(*product_id, 7);
                assert_eq!(tag_ids, &[1, 2][..]);
                true
            })
            .returning(|_, _| Ok(()));

        repo.reader
            .expect_get_product_by_id()
            .times(1)
            .returning(|_| {
                Ok(Some(sample_product(
                    7,
                    "Widget",
                    vec![sample_tag(1, "green"), sample_tag(2, "sale")],
                )))
            });

        let form = CreateProductForm {
            name: "Widget".to_string(),
            description: None,
            price_cents: 999,
            stock: 3,
            category_id: None,
            tag_ids: vec![1, 2, 2],
        };

        let product = create_product(&repo, form).expect("expected success");
        assert_eq!(product.tags.len(), 2);
    }

    #[test]
    fn create_product_rolls_back_when_tags_fail() {
        let mut repo = FakeRepo::new();

        repo.writer
            .expect_create_product()
            .returning(|_| Ok(sample_product(9, "Widget", Vec::new())));

        repo.writer
            .expect_replace_product_tags()
            .returning(|_, _| Err(RepositoryError::NotFound));

        repo.writer
            .expect_delete_product()
            .times(1)
            .withf(|product_id| {
                assert_eq!(*product_id, 9);
                true
            })
            .returning(|_| Ok(()));

        let form = CreateProductForm {
            name: "Widget".to_string(),
            description: None,
            price_cents: 999,
            stock: 0,
            category_id: None,
            tag_ids: vec![999],
        };

        let result = create_product(&repo, form);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn create_product_rejects_invalid_payload() {
        let repo = FakeRepo::new();

        let form = CreateProductForm {
            name: "   ".to_string(),
            description: None,
            price_cents: 999,
            stock: 0,
            category_id: None,
            tag_ids: Vec::new(),
        };

        let result = create_product(&repo, form);

        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn update_product_missing_row_is_not_found() {
        let mut repo = FakeRepo::new();

        repo.writer
            .expect_update_product()
            .times(1)
            .returning(|_, _| Err(RepositoryError::NotFound));

        let form = UpdateProductForm {
            name: Some("Renamed".to_string()),
            ..UpdateProductForm::default()
        };

        let result = update_product(&repo, 404, form);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn update_product_reconciles_tags_and_refetches() {
        let mut repo = FakeRepo::new();

        repo.writer
            .expect_update_product()
            .times(1)
            .withf(|product_id, updates| {
                assert_eq!(*product_id, 5);
                assert_eq!(updates.name.as_deref(), Some("Renamed"));
                true
            })
            .returning(|_, _| Ok(sample_product(5, "Renamed", vec![sample_tag(1, "old")])));

        repo.writer
            .expect_replace_product_tags()
            .times(1)
            .withf(|product_id, tag_ids| {
                assert_eq!(*product_id, 5);
                assert_eq!(tag_ids, &[2, 3][..]);
                true
            })
            .returning(|_, _| Ok(()));

        repo.reader
            .expect_get_product_by_id()
            .times(1)
            .returning(|_| {
                Ok(Some(sample_product(
                    5,
                    "Renamed",
                    vec![sample_tag(2, "new"), sample_tag(3, "sale")],
                )))
            });

        let form = UpdateProductForm {
            name: Some("Renamed".to_string()),
            tag_ids: Some(vec![2, 3]),
            ..UpdateProductForm::default()
        };

        let product = update_product(&repo, 5, form).expect("expected success");
        let tag_ids: Vec<i32> = product.tags.iter().map(|tag| tag.id).collect();
        assert_eq!(tag_ids, vec![2, 3]);
    }

    #[test]
    fn update_product_without_tag_ids_leaves_tags_untouched() {
        let mut repo = FakeRepo::new();

        repo.writer
            .expect_update_product()
            .times(1)
            .returning(|_, _| Ok(sample_product(5, "Renamed", vec![sample_tag(1, "kept")])));

        let form = UpdateProductForm {
            name: Some("Renamed".to_string()),
            ..UpdateProductForm::default()
        };

        let product = update_product(&repo, 5, form).expect("expected success");
        assert_eq!(product.tags.len(), 1);
    }

    #[test]
    fn delete_product_passes_through_not_found() {
        let mut repo = FakeRepo::new();

        repo.writer
            .expect_delete_product()
            .times(1)
            .returning(|_| Err(RepositoryError::NotFound));

        let result = delete_product(&repo, 404);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
