use sea_orm_migration::{prelude::*, schema::*};

use crate::iden::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = table_auto(OrganizerSession::Table)
            .col(pk_auto(OrganizerSession::Id))
            .col(integer(OrganizerSession::OrganizerId))
            .col(string_uniq(OrganizerSession::Token))
            .col(timestamp(OrganizerSession::ExpiresAt))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_organizer_session_organizer")
                    .from(OrganizerSession::Table, OrganizerSession::OrganizerId)
                    .to(Organizer::Table, Organizer::OrganizerId)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        manager.create_table(table).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrganizerSession::Table).to_owned())
            .await?;

        Ok(())
    }
}
