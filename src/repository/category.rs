use diesel::prelude::*;

use crate::domain::category::{
    Category as DomainCategory, NewCategory as DomainNewCategory,
    UpdateCategory as DomainUpdateCategory,
};
use crate::models::category::{
    Category as DbCategory, NewCategory as DbNewCategory, UpdateCategory as DbUpdateCategory,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository};

impl CategoryReader for DieselRepository {
    fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let category = categories::table
            .filter(categories::id.eq(id))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(Into::into))
    }

    fn list_categories(&self) -> RepositoryResult<Vec<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_categories = categories::table
            .order(categories::name.asc())
            .load::<DbCategory>(&mut conn)?;

        Ok(db_categories.into_iter().map(Into::into).collect())
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, new_category: &DomainNewCategory) -> RepositoryResult<DomainCategory> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let insertable = DbNewCategory::from(new_category);

        let created = diesel::insert_into(categories::table)
            .values(&insertable)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.into())
    }

    fn update_category(
        &self,
        category_id: i32,
        updates: &DomainUpdateCategory,
    ) -> RepositoryResult<DomainCategory> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateCategory::from(updates);

        let target = categories::table.filter(categories::id.eq(category_id));
        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_category(&self, category_id: i32) -> RepositoryResult<()> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let target = categories::table.filter(categories::id.eq(category_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
