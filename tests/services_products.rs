use catalog_api::domain::category::NewCategory;
use catalog_api::domain::tag::NewTag;
use catalog_api::forms::products::{CreateProductForm, UpdateProductForm};
use catalog_api::repository::{CategoryWriter, DieselRepository, ProductReader, TagWriter};
use catalog_api::services::ServiceError;
use catalog_api::services::products;

mod common;

#[test]
fn create_product_attaches_tags() {
    let test_db = common::TestDb::new("service_create_product_attaches_tags.db");
    let repo = DieselRepository::new(test_db.pool());

    let category = repo
        .create_category(&NewCategory::new("Plants"))
        .expect("create category");
    let green = repo.create_tag(&NewTag::new("green")).expect("create tag");
    let sale = repo.create_tag(&NewTag::new("sale")).expect("create tag");

    let form = CreateProductForm {
        name: "Fern".to_string(),
        description: None,
        price_cents: 999,
        stock: 10,
        category_id: Some(category.id),
        tag_ids: vec![green.id, sale.id, green.id],
    };

    let product = products::create_product(&repo, form).expect("create product");
    assert_eq!(product.name, "Fern");
    assert_eq!(product.category.as_ref().map(|c| c.id), Some(category.id));

    let mut tag_ids: Vec<i32> = product.tags.iter().map(|tag| tag.id).collect();
    tag_ids.sort();
    assert_eq!(tag_ids, vec![green.id, sale.id]);
}

#[test]
fn create_product_with_unknown_tag_is_rolled_back() {
    let test_db = common::TestDb::new("service_create_product_unknown_tag.db");
    let repo = DieselRepository::new(test_db.pool());

    let form = CreateProductForm {
        name: "Fern".to_string(),
        description: None,
        price_cents: 999,
        stock: 10,
        category_id: None,
        tag_ids: vec![12345],
    };

    let result = products::create_product(&repo, form);
    assert!(result.is_err(), "unknown tag id should fail the request");

    let listed = products::list_products(&repo).expect("list products");
    assert!(listed.is_empty(), "failed create should leave no product");
}

#[test]
fn update_product_reconciles_tag_set() {
    let test_db = common::TestDb::new("service_update_product_reconciles.db");
    let repo = DieselRepository::new(test_db.pool());

    let t1 = repo.create_tag(&NewTag::new("one")).expect("create tag");
    let t2 = repo.create_tag(&NewTag::new("two")).expect("create tag");
    let t3 = repo.create_tag(&NewTag::new("three")).expect("create tag");

    let created = products::create_product(
        &repo,
        CreateProductForm {
            name: "Widget".to_string(),
            description: None,
            price_cents: 999,
            stock: 1,
            category_id: None,
            tag_ids: vec![t1.id, t2.id],
        },
    )
    .expect("create product");

    let updated = products::update_product(
        &repo,
        created.id,
        UpdateProductForm {
            tag_ids: Some(vec![t2.id, t3.id]),
            ..UpdateProductForm::default()
        },
    )
    .expect("update product");

    let mut tag_ids: Vec<i32> = updated.tags.iter().map(|tag| tag.id).collect();
    tag_ids.sort();
    assert_eq!(tag_ids, vec![t2.id, t3.id]);

    // Attributes untouched by the patch keep their values.
    assert_eq!(updated.name, "Widget");
    assert_eq!(updated.price_cents, 999);
}

#[test]
fn update_product_with_empty_tag_list_clears_tags() {
    let test_db = common::TestDb::new("service_update_product_clears_tags.db");
    let repo = DieselRepository::new(test_db.pool());

    let tag = repo.create_tag(&NewTag::new("solo")).expect("create tag");

    let created = products::create_product(
        &repo,
        CreateProductForm {
            name: "Widget".to_string(),
            description: None,
            price_cents: 500,
            stock: 1,
            category_id: None,
            tag_ids: vec![tag.id],
        },
    )
    .expect("create product");

    let updated = products::update_product(
        &repo,
        created.id,
        UpdateProductForm {
            tag_ids: Some(Vec::new()),
            ..UpdateProductForm::default()
        },
    )
    .expect("update product");

    assert!(updated.tags.is_empty());
}

#[test]
fn update_missing_product_is_not_found() {
    let test_db = common::TestDb::new("service_update_missing_product.db");
    let repo = DieselRepository::new(test_db.pool());

    let result = products::update_product(
        &repo,
        4242,
        UpdateProductForm {
            name: Some("ghost".to_string()),
            ..UpdateProductForm::default()
        },
    );

    assert!(matches!(result, Err(ServiceError::NotFound)));
}

#[test]
fn delete_product_then_get_is_not_found() {
    let test_db = common::TestDb::new("service_delete_product_then_get.db");
    let repo = DieselRepository::new(test_db.pool());

    let created = products::create_product(
        &repo,
        CreateProductForm {
            name: "Short-lived".to_string(),
            description: None,
            price_cents: 100,
            stock: 1,
            category_id: None,
            tag_ids: Vec::new(),
        },
    )
    .expect("create product");

    products::delete_product(&repo, created.id).expect("delete product");

    let result = products::get_product(&repo, created.id);
    assert!(matches!(result, Err(ServiceError::NotFound)));
    assert!(
        repo.get_product_by_id(created.id)
            .expect("get product")
            .is_none()
    );
}

#[test]
fn create_product_rejects_invalid_payload() {
    let test_db = common::TestDb::new("service_create_product_invalid.db");
    let repo = DieselRepository::new(test_db.pool());

    let form = CreateProductForm {
        name: "   ".to_string(),
        description: None,
        price_cents: 100,
        stock: 1,
        category_id: None,
        tag_ids: Vec::new(),
    };

    let result = products::create_product(&repo, form);
    assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
}
