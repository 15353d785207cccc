use diesel::prelude::*;

use crate::domain::tag::{NewTag as DomainNewTag, Tag as DomainTag, UpdateTag as DomainUpdateTag};
use crate::models::tag::{NewTag as DbNewTag, Tag as DbTag, UpdateTag as DbUpdateTag};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, TagReader, TagWriter};

impl TagReader for DieselRepository {
    fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<DomainTag>> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let tag = tags::table
            .filter(tags::id.eq(id))
            .first::<DbTag>(&mut conn)
            .optional()?;

        Ok(tag.map(Into::into))
    }

    fn list_tags(&self) -> RepositoryResult<Vec<DomainTag>> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let db_tags = tags::table.order(tags::name.asc()).load::<DbTag>(&mut conn)?;

        Ok(db_tags.into_iter().map(Into::into).collect())
    }
}

impl TagWriter for DieselRepository {
    fn create_tag(&self, new_tag: &DomainNewTag) -> RepositoryResult<DomainTag> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let insertable = DbNewTag::from(new_tag);

        let created = diesel::insert_into(tags::table)
            .values(&insertable)
            .get_result::<DbTag>(&mut conn)?;

        Ok(created.into())
    }

    fn update_tag(&self, tag_id: i32, updates: &DomainUpdateTag) -> RepositoryResult<DomainTag> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateTag::from(updates);

        let target = tags::table.filter(tags::id.eq(tag_id));
        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbTag>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_tag(&self, tag_id: i32) -> RepositoryResult<()> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let target = tags::table.filter(tags::id.eq(tag_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
